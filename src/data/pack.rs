/// Fill value for rows past the end of a shorter series.
pub const MISSING: f64 = f64::NAN;

/// Column-major rectangular matrix built from variable-length series.
///
/// Every column has exactly `rows()` entries; a column shorter than the
/// longest input is padded with [`MISSING`] at the bottom.
#[derive(Debug, Clone, Default)]
pub struct PackedMatrix {
    rows: usize,
    columns: Vec<Vec<f64>>,
}

impl PackedMatrix {
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn column(&self, col: usize) -> &[f64] {
        &self.columns[col]
    }

    pub fn columns(&self) -> impl Iterator<Item = &[f64]> + '_ {
        self.columns.iter().map(Vec::as_slice)
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        self.columns.get(col)?.get(row).copied()
    }
}

/// Stack `series` side by side, NaN-padding short ones. Never truncates.
pub fn pack<S: AsRef<[f64]>>(series: &[S]) -> PackedMatrix {
    let rows = series.iter().map(|s| s.as_ref().len()).max().unwrap_or(0);
    let columns = series
        .iter()
        .map(|s| {
            let mut column = Vec::with_capacity(rows);
            column.extend_from_slice(s.as_ref());
            column.resize(rows, MISSING);
            column
        })
        .collect();
    PackedMatrix { rows, columns }
}
