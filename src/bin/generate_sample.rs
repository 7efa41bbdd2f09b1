use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use chrono::{Duration, NaiveDate, NaiveDateTime};
use parquet::arrow::ArrowWriter;

use tsplot::data::timestamp::ASCIITIME_FORMAT;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Uniform noise in `[-amplitude, amplitude)`.
    fn jitter(&mut self, amplitude: f64) -> f64 {
        (self.next_f64() * 2.0 - 1.0) * amplitude
    }
}

/// One simulated run: a warm-up ramp with a pressure oscillation.
struct Run {
    times: Vec<NaiveDateTime>,
    temperature: Vec<f64>,
    pressure: Vec<f64>,
    flow: Vec<f64>,
}

fn simulate(start: NaiveDateTime, samples: usize, setpoint: f64, rng: &mut SimpleRng) -> Run {
    let mut run = Run {
        times: Vec::with_capacity(samples),
        temperature: Vec::with_capacity(samples),
        pressure: Vec::with_capacity(samples),
        flow: Vec::with_capacity(samples),
    };
    for i in 0..samples {
        let minutes = i as f64;
        run.times.push(start + Duration::seconds(60 * i as i64));
        run.temperature
            .push(20.0 + (setpoint - 20.0) * (1.0 - (-minutes / 8.0).exp()) + rng.jitter(0.2));
        run.pressure
            .push(1.2 + 0.15 * (minutes / 3.0).sin() + rng.jitter(0.01));
        run.flow.push(4.0 + rng.jitter(0.3));
    }
    run
}

/// Header, units row, then samples. Rows are written in `order`.
fn write_csv(path: &Path, run: &Run, order: &[usize]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;
    writer.write_record(["asciitime", "temperature", "pressure", "flow"])?;
    writer.write_record(["", "degC", "bar", "l/min"])?;
    for &i in order {
        writer.write_record([
            run.times[i].format(ASCIITIME_FORMAT).to_string(),
            format!("{:.3}", run.temperature[i]),
            format!("{:.4}", run.pressure[i]),
            format!("{:.3}", run.flow[i]),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

/// Parquet has no units row and this run logs no flow.
fn write_parquet(path: &Path, run: &Run) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("asciitime", DataType::Utf8, false),
        Field::new("temperature", DataType::Float64, false),
        Field::new("pressure", DataType::Float64, false),
    ]));

    let times: Vec<String> = run
        .times
        .iter()
        .map(|t| t.format(ASCIITIME_FORMAT).to_string())
        .collect();

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(StringArray::from(times)),
            Arc::new(Float64Array::from(run.temperature.clone())),
            Arc::new(Float64Array::from(run.pressure.clone())),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let out_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;

    let mut rng = SimpleRng::new(42);
    let day = NaiveDate::from_ymd_opt(2012, 1, 2)
        .and_then(|d| d.and_hms_opt(9, 0, 0))
        .context("invalid start date")?;

    let run_a = simulate(day, 30, 80.0, &mut rng);
    let run_b = simulate(day + Duration::hours(3), 45, 95.0, &mut rng);
    let run_c = simulate(day + Duration::hours(6), 20, 70.0, &mut rng);

    // Run B is logged out of order, as a buffered logger would.
    let mut order_b: Vec<usize> = (0..45).collect();
    for i in (1..order_b.len()).rev() {
        let j = (rng.next_u64() % (i as u64 + 1)) as usize;
        order_b.swap(i, j);
    }

    let a_path = out_dir.join("run_a.csv");
    let b_path = out_dir.join("run_b.csv");
    let c_path = out_dir.join("run_c.parquet");
    write_csv(&a_path, &run_a, &(0..30).collect::<Vec<_>>())?;
    write_csv(&b_path, &run_b, &order_b)?;
    write_parquet(&c_path, &run_c)?;

    for path in [&a_path, &b_path, &c_path] {
        println!("Wrote {}", path.display());
    }
    Ok(())
}
