use std::fmt;

use crate::error::{PlotError, Result};

/// Column holding the per-row acquisition timestamp.
pub const TIME_COLUMN: &str = "asciitime";

/// Rows before the first data row: column names, then units.
pub const HEADER_ROWS: usize = 2;

static EMPTY_CELL: Cell = Cell::Empty;

// ---------------------------------------------------------------------------
// Cell – a single value of the raw grid
// ---------------------------------------------------------------------------

/// A dynamically-typed grid cell, as read from a sheet or delimited file.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Number(f64),
    Text(String),
}

impl Cell {
    /// Classify a raw text cell: blank → `Empty`, numeric → `Number`,
    /// anything else is kept verbatim as `Text`.
    pub fn from_text(s: &str) -> Self {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Cell::Empty;
        }
        match trimmed.parse::<f64>() {
            Ok(v) => Cell::Number(v),
            Err(_) => Cell::Text(s.to_string()),
        }
    }

    /// Numeric view of the cell. Blank cells read as NaN; text that does not
    /// parse as a number has no numeric value.
    /// Classify a header cell. Column names stay text even when they look
    /// like numbers (`"1.0"`, `"007"`), so they match as written.
    pub fn name(s: &str) -> Self {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            Cell::Empty
        } else {
            Cell::Text(trimmed.to_string())
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Empty => Some(f64::NAN),
            Cell::Number(v) => Some(*v),
            Cell::Text(s) => s.trim().parse::<f64>().ok(),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Empty => Ok(()),
            Cell::Number(v) => write!(f, "{v}"),
            Cell::Text(s) => write!(f, "{s}"),
        }
    }
}

// ---------------------------------------------------------------------------
// RawDataset – one sheet / file of instrument data
// ---------------------------------------------------------------------------

/// Header-plus-data grid read from one input file (or one workbook sheet).
///
/// Row 0 names the columns, row 1 carries units and is never read as data,
/// rows 2.. hold samples. Rows may be ragged; missing trailing cells read as
/// [`Cell::Empty`].
#[derive(Debug, Clone, PartialEq)]
pub struct RawDataset {
    /// Display name used in diagnostics and the GUI (file stem or `file:sheet`).
    pub name: String,
    rows: Vec<Vec<Cell>>,
}

impl RawDataset {
    pub fn new(name: impl Into<String>, rows: Vec<Vec<Cell>>) -> Self {
        RawDataset {
            name: name.into(),
            rows,
        }
    }

    /// Build a dataset from textual rows. The header row goes through
    /// [`Cell::name`], every other row through [`Cell::from_text`].
    pub fn from_text_rows<I, R, S>(name: impl Into<String>, rows: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let rows = rows
            .into_iter()
            .enumerate()
            .map(|(i, row)| {
                let classify: fn(&str) -> Cell = if i == 0 { Cell::name } else { Cell::from_text };
                row.into_iter().map(|c| classify(c.as_ref())).collect()
            })
            .collect();
        RawDataset::new(name, rows)
    }

    /// Total number of grid rows, header and units rows included.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of data rows (everything after the units row).
    pub fn data_len(&self) -> usize {
        self.rows.len().saturating_sub(HEADER_ROWS)
    }

    /// Width of the widest row.
    pub fn column_count(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Column names from the header row, blanks skipped.
    pub fn column_names(&self) -> Vec<String> {
        self.rows
            .first()
            .map(|header| {
                header
                    .iter()
                    .filter(|c| !c.is_empty())
                    .map(ToString::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Index of the first header cell equal to `name`, ignoring case and
    /// surrounding whitespace. Blank header cells never match.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        let wanted = name.trim().to_lowercase();
        if wanted.is_empty() {
            return None;
        }
        self.rows.first()?.iter().position(|cell| {
            !cell.is_empty() && cell.to_string().trim().to_lowercase() == wanted
        })
    }

    /// Cell at (`row`, `col`), or `Empty` past the end of a short row.
    pub fn cell(&self, row: usize, col: usize) -> &Cell {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&EMPTY_CELL)
    }

    /// Data cells of column `col` paired with their grid row index.
    pub fn data_cells(&self, col: usize) -> impl Iterator<Item = (usize, &Cell)> + '_ {
        (HEADER_ROWS..self.rows.len()).map(move |row| (row, self.cell(row, col)))
    }

    /// Fail unless the grid has a header row, a units row and at least one
    /// data row.
    pub fn ensure_shape(&self) -> Result<()> {
        if self.rows.len() <= HEADER_ROWS {
            return Err(PlotError::TooFewRows {
                dataset: self.name.clone(),
                rows: self.rows.len(),
            });
        }
        Ok(())
    }
}
