//! End-to-end behaviour of extraction, alignment and packing.

use approx::assert_relative_eq;
use tsplot::data::timestamp::{SECONDS_PER_DAY, parse_timestamp};
use tsplot::{
    Diagnostic, ExtractOptions, PlotError, RawDataset, extract_data, extract_variable, pack,
};

fn stamp(second: u32) -> String {
    format!("Mon Jan 02 03:04:{second:02} 2012")
}

/// `asciitime` plus the given columns; `values[c][r]` is row `r` of column `c`.
fn dataset(name: &str, columns: &[&str], seconds: &[u32], values: &[Vec<f64>]) -> RawDataset {
    let mut rows: Vec<Vec<String>> = Vec::new();
    rows.push(
        std::iter::once("asciitime".to_string())
            .chain(columns.iter().map(|c| c.to_string()))
            .collect(),
    );
    rows.push(vec![String::new(); columns.len() + 1]);
    for (r, &s) in seconds.iter().enumerate() {
        let mut row = vec![stamp(s)];
        row.extend(values.iter().map(|col| col[r].to_string()));
        rows.push(row);
    }
    RawDataset::from_text_rows(name, rows)
}

#[test]
fn test_two_datasets_with_missing_variable() {
    let d1 = dataset(
        "run1",
        &["A", "B"],
        &[0, 1, 2],
        &[vec![1.0, 2.0, 3.0], vec![10.0, 20.0, 30.0]],
    );
    let d2 = dataset("run2", &["A"], &[0, 1, 2, 3, 4], &[vec![5.0, 6.0, 7.0, 8.0, 9.0]]);

    let result = extract_data(&[d1, d2], &["A", "B"], &ExtractOptions::default()).unwrap();

    assert_eq!(result.labels, vec!["A", "B", "A"]);
    assert_eq!(result.x.cols(), 3);
    assert_eq!(result.y.cols(), 3);
    assert_eq!(result.y.rows(), 5);
    assert_eq!(result.x.rows(), 5);

    assert_eq!(&result.y.column(0)[..3], &[1.0, 2.0, 3.0]);
    assert_eq!(&result.y.column(1)[..3], &[10.0, 20.0, 30.0]);
    assert_eq!(result.y.column(2), &[5.0, 6.0, 7.0, 8.0, 9.0]);
    for col in 0..2 {
        assert!(result.y.column(col)[3..].iter().all(|v| v.is_nan()));
        assert!(result.x.column(col)[3..].iter().all(|v| v.is_nan()));
        assert!(result.x.column(col)[..3].iter().all(|v| v.is_finite()));
    }

    assert_eq!(
        result.diagnostics,
        vec![Diagnostic::VariableNotFound {
            dataset: "run2".into(),
            variable: "B".into(),
        }]
    );
}

#[test]
fn test_sort_reorders_time_and_values_together() {
    let seconds = [30, 10, 50, 20, 40];
    let values = vec![3.0, 1.0, 5.0, 2.0, 4.0];
    let d = dataset("shuffled", &["V"], &seconds, &[values]);
    let options = ExtractOptions {
        sort: true,
        ..Default::default()
    };

    let result = extract_data(&[d], &["v"], &options).unwrap();

    let time = result.x.column(0);
    assert!(time.windows(2).all(|w| w[0] <= w[1]));
    let expected: Vec<f64> = [10, 20, 30, 40, 50]
        .iter()
        .map(|&s| parse_timestamp(&stamp(s)).unwrap())
        .collect();
    assert_eq!(time, expected.as_slice());
    assert_eq!(result.y.column(0), &[1.0, 2.0, 3.0, 4.0, 5.0]);
}

#[test]
fn test_overlay_and_sort_share_the_same_time_base() {
    let d = dataset("late", &["V"], &[20, 10, 30], &[vec![2.0, 1.0, 3.0]]);
    let options = ExtractOptions {
        overlay: true,
        sort: true,
        ..Default::default()
    };
    let result = extract_data(&[d], &["V"], &options).unwrap();
    let seconds: Vec<f64> = result
        .x
        .column(0)
        .iter()
        .map(|t| t * SECONDS_PER_DAY)
        .collect();
    // Shifted by the first recorded sample, then sorted.
    assert_relative_eq!(seconds[0], -10.0, epsilon = 1e-4);
    assert_relative_eq!(seconds[1], 0.0, epsilon = 1e-4);
    assert_relative_eq!(seconds[2], 10.0, epsilon = 1e-4);
    assert_eq!(result.y.column(0), &[1.0, 2.0, 3.0]);
}

#[test]
fn test_lengths_agree_under_every_option_combination() {
    let d1 = dataset("a", &["P", "Q"], &[3, 1, 2], &[vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]);
    let d2 = dataset("b", &["Q"], &[5, 4], &[vec![7.0, 8.0]]);
    let datasets = [d1, d2];

    for bits in 0..16u8 {
        let options = ExtractOptions {
            overlay: bits & 1 != 0,
            sort: bits & 2 != 0,
            hide_prefix: bits & 4 != 0,
            prefix: if bits & 8 != 0 {
                vec!["a.".into(), "b.".into()]
            } else {
                Vec::new()
            },
        };
        let result = extract_data(&datasets, &["P", "Q", "R"], &options).unwrap();
        assert_eq!(result.x.cols(), result.labels.len());
        assert_eq!(result.y.cols(), result.labels.len());
        assert_eq!(result.labels.len(), 3);
        assert_eq!(result.diagnostics.len(), 3);

        let prefixed = !options.hide_prefix && !options.prefix.is_empty();
        let expected = if prefixed {
            vec!["a.P", "a.Q", "b.Q"]
        } else {
            vec!["P", "Q", "Q"]
        };
        assert_eq!(result.labels, expected);

        if options.overlay && !options.sort {
            for col in result.x.columns() {
                assert_eq!(col[0], 0.0);
            }
        }
    }
}

#[test]
fn test_extract_variable_length_matches_data_rows() {
    let d = dataset("len", &["Temp"], &[0, 1, 2, 3], &[vec![1.0, 2.0, 3.0, 4.0]]);
    for name in ["Temp", "temp", "TEMP", "tEmP"] {
        let series = extract_variable(&d, name).unwrap();
        assert_eq!(series.len(), d.row_count() - 2);
        assert_eq!(series, vec![1.0, 2.0, 3.0, 4.0]);
    }
    assert!(extract_variable(&d, "Tem").unwrap().is_empty());
    assert!(extract_variable(&d, "").unwrap().is_empty());
}

#[test]
fn test_packing_a_rectangular_result_adds_nothing() {
    let d = dataset("rect", &["A", "B"], &[0, 1], &[vec![1.0, 2.0], vec![3.0, 4.0]]);
    let result = extract_data(&[d], &["A", "B"], &ExtractOptions::default()).unwrap();
    let columns: Vec<&[f64]> = result.y.columns().collect();
    let repacked = pack(&columns);
    assert_eq!(repacked.rows(), 2);
    assert_eq!(repacked.column(0), &[1.0, 2.0]);
    assert_eq!(repacked.column(1), &[3.0, 4.0]);
}

#[test]
fn test_malformed_timestamp_is_fatal_even_when_variable_missing() {
    let bad = RawDataset::from_text_rows(
        "bad",
        vec![
            vec!["asciitime", "A"],
            vec!["", ""],
            vec!["2012-01-02T03:04:05", "1"],
        ],
    );
    let err = extract_data(&[bad], &["Z"], &ExtractOptions::default()).unwrap_err();
    match err {
        PlotError::MalformedTimestamp { dataset, row, value } => {
            assert_eq!(dataset, "bad");
            assert_eq!(row, 3);
            assert_eq!(value, "2012-01-02T03:04:05");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_numeric_looking_column_names_are_found() {
    let d = RawDataset::from_text_rows(
        "bench",
        vec![
            vec!["asciitime", "1.0", "007", "1e3", ""],
            vec!["", "", "", "", ""],
            vec!["Mon Jan 02 03:04:05 2012", "1", "2", "3", "9"],
            vec!["Mon Jan 02 03:04:06 2012", "4", "5", "6", "9"],
        ],
    );

    let result = extract_data(&[d.clone()], &["1.0", "007", "1e3"], &ExtractOptions::default())
        .unwrap();
    assert_eq!(result.labels, vec!["1.0", "007", "1e3"]);
    assert!(result.diagnostics.is_empty());
    assert_eq!(result.y.column(1), &[2.0, 5.0]);

    assert!(extract_variable(&d, "").unwrap().is_empty());
}
