use crate::error::{PlotError, Result};

use super::model::{HEADER_ROWS, RawDataset, TIME_COLUMN};
use super::timestamp::parse_timestamps;

/// Numeric values of one column, one per data row.
pub type VariableSeries = Vec<f64>;

/// Parsed `asciitime` column, one instant (days) per data row.
pub type TimeSeries = Vec<f64>;

/// Pull the column named `name` (case-insensitive, first match) out of
/// `raw` as numbers.
///
/// A name absent from the header yields an empty series; reporting that is
/// the caller's job. Blank cells become NaN, non-numeric text is an error.
pub fn extract_variable(raw: &RawDataset, name: &str) -> Result<VariableSeries> {
    raw.ensure_shape()?;
    let Some(col) = raw.column_index(name) else {
        return Ok(Vec::new());
    };

    raw.data_cells(col)
        .map(|(row, cell)| {
            cell.as_f64().ok_or_else(|| PlotError::NonNumericCell {
                dataset: raw.name.clone(),
                column: name.to_string(),
                row: row + 1,
                value: cell.to_string(),
            })
        })
        .collect()
}

/// Parse the dataset's `asciitime` column. Any unparseable entry aborts the
/// extraction: a shifted time axis would corrupt every series plotted on it.
pub fn extract_time(raw: &RawDataset) -> Result<TimeSeries> {
    raw.ensure_shape()?;
    let col = raw
        .column_index(TIME_COLUMN)
        .ok_or_else(|| PlotError::MissingTimeColumn {
            dataset: raw.name.clone(),
        })?;

    parse_timestamps(raw.data_cells(col).map(|(_, cell)| cell.to_string())).map_err(|bad| {
        PlotError::MalformedTimestamp {
            dataset: raw.name.clone(),
            row: HEADER_ROWS + bad.index + 1,
            value: bad.value,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset(rows: Vec<Vec<&str>>) -> RawDataset {
        RawDataset::from_text_rows("bench", rows)
    }

    #[test]
    fn test_extracts_every_data_row() {
        let ds = dataset(vec![
            vec!["asciitime", "Pressure"],
            vec!["", "bar"],
            vec!["Mon Jan 02 03:04:05 2012", "1.0"],
            vec!["Mon Jan 02 03:04:06 2012", "1.5"],
            vec!["Mon Jan 02 03:04:07 2012", "2.0"],
        ]);
        for name in ["Pressure", "pressure", "PRESSURE"] {
            assert_eq!(extract_variable(&ds, name).unwrap(), vec![1.0, 1.5, 2.0]);
        }
    }

    #[test]
    fn test_absent_variable_is_empty_not_error() {
        let ds = dataset(vec![
            vec!["asciitime", "A"],
            vec!["", ""],
            vec!["Mon Jan 02 03:04:05 2012", "1"],
        ]);
        assert!(extract_variable(&ds, "B").unwrap().is_empty());
    }

    #[test]
    fn test_blank_cells_become_nan() {
        let ds = dataset(vec![
            vec!["asciitime", "A", "B"],
            vec!["", "", ""],
            vec!["Mon Jan 02 03:04:05 2012", "1", ""],
            vec!["Mon Jan 02 03:04:06 2012", "2"],
        ]);
        let b = extract_variable(&ds, "b").unwrap();
        assert_eq!(b.len(), 2);
        assert!(b.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn test_non_numeric_cell_is_reported_with_spreadsheet_row() {
        let ds = dataset(vec![
            vec!["asciitime", "A"],
            vec!["", ""],
            vec!["Mon Jan 02 03:04:05 2012", "1"],
            vec!["Mon Jan 02 03:04:06 2012", "valve open"],
        ]);
        match extract_variable(&ds, "A") {
            Err(PlotError::NonNumericCell { row, value, .. }) => {
                assert_eq!(row, 4);
                assert_eq!(value, "valve open");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_time_column_errors() {
        let no_time = dataset(vec![vec!["A"], vec![""], vec!["1"]]);
        assert!(matches!(
            extract_time(&no_time),
            Err(PlotError::MissingTimeColumn { .. })
        ));

        let bad = dataset(vec![
            vec!["AsciiTime", "A"],
            vec!["", ""],
            vec!["Mon Jan 02 03:04:05 2012", "1"],
            vec!["yesterday", "2"],
        ]);
        assert!(matches!(
            extract_time(&bad),
            Err(PlotError::MalformedTimestamp { row: 4, .. })
        ));
    }

    #[test]
    fn test_non_text_time_cells_are_malformed() {
        let blank = dataset(vec![
            vec!["asciitime", "A"],
            vec!["", ""],
            vec!["", "1"],
        ]);
        match extract_time(&blank) {
            Err(PlotError::MalformedTimestamp { row, value, .. }) => {
                assert_eq!(row, 3);
                assert_eq!(value, "");
            }
            other => panic!("unexpected result: {other:?}"),
        }

        let numeric = dataset(vec![vec!["asciitime"], vec![""], vec!["41000.5"]]);
        assert!(matches!(
            extract_time(&numeric),
            Err(PlotError::MalformedTimestamp { row: 3, .. })
        ));
    }
}
