use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::data::align::{Diagnostic, ExtractOptions, ExtractionResult, extract_data};
use crate::data::loader;
use crate::data::model::RawDataset;
use crate::error::{PlotError, Result};

// ---------------------------------------------------------------------------
// Legend placement
// ---------------------------------------------------------------------------

/// Legend placement keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum LegendLocation {
    Best,
    #[default]
    BestOutside,
    NorthEast,
    NorthWest,
    SouthEast,
    SouthWest,
}

impl LegendLocation {
    pub const ALL: [LegendLocation; 6] = [
        LegendLocation::Best,
        LegendLocation::BestOutside,
        LegendLocation::NorthEast,
        LegendLocation::NorthWest,
        LegendLocation::SouthEast,
        LegendLocation::SouthWest,
    ];

    pub fn keyword(self) -> &'static str {
        match self {
            LegendLocation::Best => "best",
            LegendLocation::BestOutside => "best-outside",
            LegendLocation::NorthEast => "north-east",
            LegendLocation::NorthWest => "north-west",
            LegendLocation::SouthEast => "south-east",
            LegendLocation::SouthWest => "south-west",
        }
    }
}

impl fmt::Display for LegendLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

impl FromStr for LegendLocation {
    type Err = PlotError;

    /// Case-insensitive; `best-outside`, `bestoutside` and `best_outside`
    /// are the same keyword.
    fn from_str(s: &str) -> Result<Self> {
        let folded: String = s
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .flat_map(char::to_lowercase)
            .collect();
        LegendLocation::ALL
            .into_iter()
            .find(|loc| loc.keyword().replace('-', "") == folded)
            .ok_or_else(|| PlotError::Configuration(format!("unknown legend location '{s}'")))
    }
}

impl TryFrom<String> for LegendLocation {
    type Error = PlotError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<LegendLocation> for String {
    fn from(loc: LegendLocation) -> Self {
        loc.keyword().to_string()
    }
}

// ---------------------------------------------------------------------------
// Options and the validated request
// ---------------------------------------------------------------------------

/// Every option the plotting command recognises, with its default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotOptions {
    /// Variables for the primary (left) axis. Required.
    pub left: Vec<String>,
    /// Variables for the secondary (right) axis.
    pub right: Vec<String>,
    #[serde(flatten)]
    pub extract: ExtractOptions,
    pub location: LegendLocation,
    /// Replace the current figure instead of opening a new one.
    pub clear_figure: bool,
    /// Positional input is already-loaded datasets rather than paths.
    pub raw: bool,
    /// Read every sheet of a workbook, not only the first.
    pub all_sheets: bool,
}

/// Validated axis layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlotRequest {
    SingleAxis { left: Vec<String> },
    DualAxis { left: Vec<String>, right: Vec<String> },
}

impl PlotRequest {
    /// Check the options without touching any file.
    pub fn from_options(options: &PlotOptions) -> Result<Self> {
        if options.left.is_empty() {
            return Err(PlotError::Configuration(
                "no left-axis variables specified".into(),
            ));
        }
        let left = options.left.clone();
        Ok(if options.right.is_empty() {
            PlotRequest::SingleAxis { left }
        } else {
            PlotRequest::DualAxis {
                left,
                right: options.right.clone(),
            }
        })
    }
}

/// Positional input of the plotting command.
#[derive(Debug, Clone)]
pub enum PlotInput {
    Paths(Vec<PathBuf>),
    Datasets(Vec<RawDataset>),
}

impl PlotInput {
    pub fn path(path: impl Into<PathBuf>) -> Self {
        PlotInput::Paths(vec![path.into()])
    }
}

// ---------------------------------------------------------------------------
// Loading seam
// ---------------------------------------------------------------------------

/// Turns a path into one or more datasets.
pub trait DatasetLoader {
    fn load(&self, path: &Path) -> Result<Vec<RawDataset>>;
}

/// Reads datasets from disk via [`loader`].
#[derive(Debug, Clone, Copy, Default)]
pub struct FileLoader {
    pub all_sheets: bool,
}

impl DatasetLoader for FileLoader {
    fn load(&self, path: &Path) -> Result<Vec<RawDataset>> {
        if self.all_sheets {
            loader::load_all_sheets(path)
        } else {
            Ok(vec![loader::load_file(path)?])
        }
    }
}

// ---------------------------------------------------------------------------
// Figure
// ---------------------------------------------------------------------------

/// Extracted series for each axis of a figure.
#[derive(Debug, Clone)]
pub enum FigureAxes {
    Single {
        left: ExtractionResult,
    },
    Dual {
        left: ExtractionResult,
        right: ExtractionResult,
    },
}

/// Everything the renderer needs for one chart.
#[derive(Debug, Clone)]
pub struct Figure {
    pub title: String,
    pub axes: FigureAxes,
    pub location: LegendLocation,
    /// Time values are offsets from each dataset's first sample.
    pub overlay: bool,
}

impl Figure {
    pub fn left(&self) -> &ExtractionResult {
        match &self.axes {
            FigureAxes::Single { left } | FigureAxes::Dual { left, .. } => left,
        }
    }

    pub fn right(&self) -> Option<&ExtractionResult> {
        match &self.axes {
            FigureAxes::Single { .. } => None,
            FigureAxes::Dual { right, .. } => Some(right),
        }
    }

    pub fn diagnostics(&self) -> impl Iterator<Item = &Diagnostic> + '_ {
        self.left()
            .diagnostics
            .iter()
            .chain(self.right().into_iter().flat_map(|r| r.diagnostics.iter()))
    }

    /// Total number of plotted series on both axes.
    pub fn series_count(&self) -> usize {
        self.left().len() + self.right().map_or(0, ExtractionResult::len)
    }
}

/// Validate `options`, load the input and extract the series for each axis.
///
/// Option errors surface before any file is opened. Each distinct path is
/// loaded once even if listed twice. Diagnostics are logged and kept on the
/// returned figure.
pub fn prepare_figure(
    input: PlotInput,
    options: &PlotOptions,
    loader: &dyn DatasetLoader,
) -> Result<Figure> {
    let request = PlotRequest::from_options(options)?;

    let datasets = match input {
        PlotInput::Datasets(datasets) if options.raw => datasets,
        PlotInput::Paths(paths) if !options.raw => load_all(&paths, loader)?,
        PlotInput::Datasets(_) => {
            return Err(PlotError::Configuration(
                "pre-loaded datasets given but 'raw' is not set".into(),
            ));
        }
        PlotInput::Paths(_) => {
            return Err(PlotError::Configuration(
                "'raw' is set but the input is a list of paths".into(),
            ));
        }
    };

    let axes = match &request {
        PlotRequest::SingleAxis { left } => FigureAxes::Single {
            left: extract_data(&datasets, left, &options.extract)?,
        },
        PlotRequest::DualAxis { left, right } => FigureAxes::Dual {
            left: extract_data(&datasets, left, &options.extract)?,
            right: extract_data(&datasets, right, &options.extract)?,
        },
    };

    let figure = Figure {
        title: datasets
            .iter()
            .map(|d| d.name.as_str())
            .collect::<Vec<_>>()
            .join(", "),
        axes,
        location: options.location,
        overlay: options.extract.overlay,
    };

    for diagnostic in figure.diagnostics() {
        log::warn!("{diagnostic}");
    }
    log::info!(
        "Prepared '{}' with {} series",
        figure.title,
        figure.series_count()
    );
    Ok(figure)
}

fn load_all(paths: &[PathBuf], loader: &dyn DatasetLoader) -> Result<Vec<RawDataset>> {
    let mut cache: HashMap<&Path, Vec<RawDataset>> = HashMap::new();
    let mut datasets = Vec::new();
    for path in paths {
        if !cache.contains_key(path.as_path()) {
            let loaded = loader.load(path)?;
            log::info!("Loaded {} dataset(s) from {}", loaded.len(), path.display());
            cache.insert(path.as_path(), loaded);
        }
        datasets.extend(cache[path.as_path()].iter().cloned());
    }
    Ok(datasets)
}
