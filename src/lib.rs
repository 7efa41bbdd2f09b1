//! Time-series plotting for instrumentation logs.
//!
//! Raw tables (CSV, workbook sheets, Parquet, JSON) are loaded into
//! [`RawDataset`]s, the requested variables are pulled out of each one and
//! aligned on the `asciitime` axis, then packed into NaN-padded matrices
//! ready for the dual-axis viewer in the `tsplot` binary.
//!
//! ```no_run
//! use tsplot::{FileLoader, PlotInput, PlotOptions, prepare_figure};
//!
//! let options = PlotOptions {
//!     left: vec!["Temp".into()],
//!     right: vec!["Flow".into()],
//!     ..Default::default()
//! };
//! let figure = prepare_figure(
//!     PlotInput::path("run_a.csv"),
//!     &options,
//!     &FileLoader::default(),
//! )?;
//! println!("{} series", figure.series_count());
//! # Ok::<(), tsplot::PlotError>(())
//! ```

pub mod data;
pub mod error;
pub mod export;
pub mod request;

pub use data::align::{Diagnostic, ExtractOptions, ExtractionResult, extract_data};
pub use data::extract::{extract_time, extract_variable};
pub use data::model::{Cell, RawDataset};
pub use data::timestamp::{BadTimestamp, parse_timestamps};
pub use data::pack::{PackedMatrix, pack};
pub use error::{PlotError, Result};
pub use request::{
    DatasetLoader, Figure, FigureAxes, FileLoader, LegendLocation, PlotInput, PlotOptions,
    PlotRequest, prepare_figure,
};
