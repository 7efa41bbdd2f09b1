//! CSV export of extracted series.

use std::path::{Path, PathBuf};

use crate::data::align::ExtractionResult;
use crate::data::timestamp::{SECONDS_PER_DAY, format_instant};
use crate::error::{PlotError, Result};
use crate::request::Figure;

/// Render one axis as CSV: a `<label> time` / `<label>` column pair per
/// series, one line per packed row. Padding is written as empty fields.
///
/// Absolute times are written as `YYYY-mm-dd HH:MM:SS`; overlaid (relative)
/// times as elapsed seconds.
pub fn export_csv(result: &ExtractionResult, overlay: bool) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    let header = result
        .labels
        .iter()
        .flat_map(|label| [format!("{label} time"), label.clone()]);
    writer.write_record(header)?;

    for row in 0..result.y.rows() {
        let mut record = Vec::with_capacity(result.len() * 2);
        for col in 0..result.len() {
            let t = result.x.get(row, col).unwrap_or(f64::NAN);
            let v = result.y.get(row, col).unwrap_or(f64::NAN);
            record.push(if t.is_nan() {
                String::new()
            } else if overlay {
                format!("{}", (t * SECONDS_PER_DAY * 1000.0).round() / 1000.0)
            } else {
                format_instant(t)
            });
            record.push(if v.is_nan() {
                String::new()
            } else {
                v.to_string()
            });
        }
        writer.write_record(&record)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| PlotError::Io(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| PlotError::MalformedFile {
        path: "<export>".into(),
        reason: e.to_string(),
    })
}

/// Write `figure` next to `path`: the left axis to `path` itself and, for a
/// dual-axis figure, the right axis to `<stem>.right.<ext>`.
pub fn write_figure(figure: &Figure, path: &Path) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();

    std::fs::write(path, export_csv(figure.left(), figure.overlay)?)?;
    written.push(path.to_path_buf());

    if let Some(right) = figure.right() {
        let right_path = right_axis_path(path);
        std::fs::write(&right_path, export_csv(right, figure.overlay)?)?;
        written.push(right_path);
    }

    for p in &written {
        log::info!("Wrote {}", p.display());
    }
    Ok(written)
}

fn right_axis_path(path: &Path) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "export".into());
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().into_owned())
        .unwrap_or_else(|| "csv".into());
    path.with_file_name(format!("{stem}.right.{ext}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::align::{ExtractOptions, extract_data};
    use crate::data::model::RawDataset;

    fn result(overlay: bool) -> ExtractionResult {
        let datasets = vec![
            RawDataset::from_text_rows(
                "a",
                vec![
                    vec!["asciitime", "P"],
                    vec!["", "bar"],
                    vec!["Mon Jan 02 03:04:05 2012", "1.5"],
                ],
            ),
            RawDataset::from_text_rows(
                "b",
                vec![
                    vec!["asciitime", "P"],
                    vec!["", "bar"],
                    vec!["Mon Jan 02 03:04:05 2012", "2"],
                    vec!["Mon Jan 02 03:05:05 2012", "3"],
                ],
            ),
        ];
        let options = ExtractOptions {
            overlay,
            prefix: vec!["a:".into(), "b:".into()],
            ..Default::default()
        };
        extract_data(&datasets, &["P"], &options).unwrap()
    }

    #[test]
    fn test_export_absolute_times_with_padding() {
        let csv = export_csv(&result(false), false).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "a:P time,a:P,b:P time,b:P");
        assert_eq!(
            lines[1],
            "2012-01-02 03:04:05,1.5,2012-01-02 03:04:05,2"
        );
        assert_eq!(lines[2], ",,2012-01-02 03:05:05,3");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_export_overlay_as_elapsed_seconds() {
        let csv = export_csv(&result(true), true).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[1], "0,1.5,0,2");
        assert_eq!(lines[2], ",,60,3");
    }

    #[test]
    fn test_right_axis_path() {
        assert_eq!(
            right_axis_path(Path::new("/tmp/out.csv")),
            PathBuf::from("/tmp/out.right.csv")
        );
    }
}
