use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Result;

use super::extract::{extract_time, extract_variable};
use super::model::RawDataset;
use super::pack::{PackedMatrix, pack};

// ---------------------------------------------------------------------------
// Options and results
// ---------------------------------------------------------------------------

/// Per-call alignment switches. All default to off / empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractOptions {
    /// Shift every dataset's time axis so its first sample is at zero.
    pub overlay: bool,
    /// Reorder each column by ascending time (stable).
    pub sort: bool,
    /// One legend prefix per dataset; ignored unless the count matches.
    pub prefix: Vec<String>,
    /// Never prefix legend labels.
    pub hide_prefix: bool,
}

impl ExtractOptions {
    fn use_prefix(&self, dataset_count: usize) -> bool {
        !self.hide_prefix && !self.prefix.is_empty() && self.prefix.len() == dataset_count
    }
}

/// Non-fatal event recorded during extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    VariableNotFound { dataset: String, variable: String },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::VariableNotFound { dataset, variable } => {
                write!(f, "{dataset}: variable '{variable}' not found")
            }
        }
    }
}

/// Aligned output: column `i` of `x`, column `i` of `y` and `labels[i]`
/// describe the same (dataset, variable) pair.
#[derive(Debug, Clone, Default)]
pub struct ExtractionResult {
    pub x: PackedMatrix,
    pub y: PackedMatrix,
    pub labels: Vec<String>,
    pub diagnostics: Vec<Diagnostic>,
}

impl ExtractionResult {
    /// Number of series.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Extraction
// ---------------------------------------------------------------------------

/// Extract every requested variable from every dataset and pack the result.
///
/// Output columns follow dataset order, then variable order. A variable
/// missing from a dataset is skipped and recorded as a diagnostic; timestamp
/// and cell errors abort the whole call.
pub fn extract_data<V: AsRef<str>>(
    datasets: &[RawDataset],
    variables: &[V],
    options: &ExtractOptions,
) -> Result<ExtractionResult> {
    if datasets.is_empty() || variables.is_empty() {
        return Ok(ExtractionResult::default());
    }

    let use_prefix = options.use_prefix(datasets.len());
    let mut xs: Vec<Vec<f64>> = Vec::new();
    let mut ys: Vec<Vec<f64>> = Vec::new();
    let mut labels = Vec::new();
    let mut diagnostics = Vec::new();

    for (r, raw) in datasets.iter().enumerate() {
        let mut time = extract_time(raw)?;
        if options.overlay {
            shift_to_zero(&mut time);
        }
        let order = options.sort.then(|| ascending_order(&time));

        for variable in variables {
            let variable = variable.as_ref();
            let values = extract_variable(raw, variable)?;
            if values.is_empty() {
                log::debug!("{}: no column named '{variable}'", raw.name);
                diagnostics.push(Diagnostic::VariableNotFound {
                    dataset: raw.name.clone(),
                    variable: variable.to_string(),
                });
                continue;
            }

            match &order {
                Some(order) => {
                    xs.push(permute(&time, order));
                    ys.push(permute(&values, order));
                }
                None => {
                    xs.push(time.clone());
                    ys.push(values);
                }
            }

            labels.push(if use_prefix {
                format!("{}{variable}", options.prefix[r])
            } else {
                variable.to_string()
            });
        }
    }

    debug_assert!(
        xs.iter().zip(&ys).all(|(x, y)| x.len() == y.len()),
        "time and value columns must share lengths"
    );

    Ok(ExtractionResult {
        x: pack(&xs),
        y: pack(&ys),
        labels,
        diagnostics,
    })
}

fn shift_to_zero(time: &mut [f64]) {
    if let Some(&t0) = time.first() {
        time.iter_mut().for_each(|t| *t -= t0);
    }
}

/// Stable permutation that sorts `time` ascending.
fn ascending_order(time: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..time.len()).collect();
    order.sort_by(|&a, &b| time[a].total_cmp(&time[b]));
    order
}

fn permute(values: &[f64], order: &[usize]) -> Vec<f64> {
    order.iter().map(|&i| values[i]).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const T0: &str = "Mon Jan 02 03:04:05 2012";
    const T1: &str = "Mon Jan 02 03:04:06 2012";
    const T2: &str = "Mon Jan 02 03:04:07 2012";

    fn run(name: &str, rows: Vec<Vec<&str>>) -> RawDataset {
        RawDataset::from_text_rows(name, rows)
    }

    fn two_runs() -> Vec<RawDataset> {
        vec![
            run(
                "a",
                vec![vec!["asciitime", "P"], vec!["", ""], vec![T0, "1"], vec![T1, "2"]],
            ),
            run(
                "b",
                vec![vec!["asciitime", "P"], vec!["", ""], vec![T1, "3"], vec![T2, "4"]],
            ),
        ]
    }

    #[test]
    fn test_empty_inputs_yield_empty_result() {
        let none: &[&str] = &[];
        let r = extract_data(&two_runs(), none, &ExtractOptions::default()).unwrap();
        assert!(r.is_empty());
        assert_eq!(r.x.cols(), 0);
        assert_eq!(r.y.cols(), 0);

        let r = extract_data(&[], &["P"], &ExtractOptions::default()).unwrap();
        assert!(r.is_empty());
    }

    #[test]
    fn test_prefix_gate() {
        let datasets = two_runs();
        let mut options = ExtractOptions {
            prefix: vec!["a_".into(), "b_".into()],
            ..Default::default()
        };
        let r = extract_data(&datasets, &["P"], &options).unwrap();
        assert_eq!(r.labels, vec!["a_P", "b_P"]);

        options.hide_prefix = true;
        let r = extract_data(&datasets, &["P"], &options).unwrap();
        assert_eq!(r.labels, vec!["P", "P"]);

        options.hide_prefix = false;
        options.prefix = vec!["only_".into()];
        let r = extract_data(&datasets, &["P"], &options).unwrap();
        assert_eq!(r.labels, vec!["P", "P"]);
    }

    #[test]
    fn test_label_keeps_requested_spelling() {
        let r = extract_data(&two_runs(), &["p"], &ExtractOptions::default()).unwrap();
        assert_eq!(r.labels, vec!["p", "p"]);
    }

    #[test]
    fn test_overlay_starts_each_dataset_at_zero() {
        let options = ExtractOptions {
            overlay: true,
            ..Default::default()
        };
        let r = extract_data(&two_runs(), &["P"], &options).unwrap();
        for col in r.x.columns() {
            assert_eq!(col[0], 0.0);
            assert!(col[1] > 0.0);
        }
    }

    #[test]
    fn test_stable_sort_keeps_equal_timestamps_in_row_order() {
        let ds = run(
            "dup",
            vec![
                vec!["asciitime", "V"],
                vec!["", ""],
                vec![T1, "10"],
                vec![T0, "20"],
                vec![T1, "30"],
                vec![T0, "40"],
            ],
        );
        let options = ExtractOptions {
            sort: true,
            ..Default::default()
        };
        let r = extract_data(&[ds], &["V"], &options).unwrap();
        assert_eq!(r.y.column(0), &[20.0, 40.0, 10.0, 30.0]);
    }

    #[test]
    fn test_malformed_timestamp_aborts() {
        let mut datasets = two_runs();
        datasets.push(run(
            "broken",
            vec![vec!["asciitime", "P"], vec!["", ""], vec!["tomorrow", "1"]],
        ));
        assert!(extract_data(&datasets, &["P"], &ExtractOptions::default()).is_err());
    }

    #[test]
    fn test_diagnostic_display() {
        let d = Diagnostic::VariableNotFound {
            dataset: "run_b".into(),
            variable: "flow".into(),
        };
        assert_eq!(d.to_string(), "run_b: variable 'flow' not found");
    }
}
