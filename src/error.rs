use thiserror::Error;

/// Everything that can abort a plot request.
///
/// Variables missing from a dataset are not errors; they are reported as
/// [`Diagnostic`](crate::data::align::Diagnostic)s next to the result.
#[derive(Error, Debug)]
pub enum PlotError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("{dataset}: row {row}: malformed timestamp '{value}'")]
    MalformedTimestamp {
        dataset: String,
        row: usize,
        value: String,
    },

    #[error("{dataset}: no 'asciitime' column")]
    MissingTimeColumn { dataset: String },

    #[error("{dataset}: column '{column}', row {row}: '{value}' is not numeric")]
    NonNumericCell {
        dataset: String,
        column: String,
        row: usize,
        value: String,
    },

    #[error("{dataset}: expected a header row, a units row and data, found {rows} row(s)")]
    TooFewRows { dataset: String, rows: usize },

    #[error("unsupported file extension: .{0}")]
    UnsupportedFileFormat(String),

    #[error("{0}: workbook has no sheets")]
    EmptyWorkbook(String),

    #[error("{path}: {reason}")]
    MalformedFile { path: String, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("workbook error: {0}")]
    Workbook(#[from] calamine::Error),

    #[error("parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PlotError>;
