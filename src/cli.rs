//! Command-line interface.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use tsplot::{LegendLocation, PlotOptions};

#[derive(Parser, Debug)]
#[command(name = "tsplot")]
#[command(about = "Dual-axis time-series plots of instrumentation logs", version)]
pub struct Cli {
    /// Input files (.csv, .xlsx, .parquet, .json). Opens the browser when empty.
    pub files: Vec<PathBuf>,

    /// Variables on the left axis
    #[arg(short, long, value_delimiter = ',')]
    pub left: Vec<String>,

    /// Variables on the right axis
    #[arg(short, long, value_delimiter = ',')]
    pub right: Vec<String>,

    /// Start every file's time axis at zero
    #[arg(long)]
    pub overlay: bool,

    /// Sort samples by timestamp
    #[arg(long)]
    pub sort: bool,

    /// Legend prefix, one per input dataset
    #[arg(long = "prefix")]
    pub prefix: Vec<String>,

    /// Never prefix legend labels
    #[arg(long)]
    pub hide_prefix: bool,

    /// Legend placement (best, best-outside, north-east, ...)
    #[arg(long)]
    pub location: Option<LegendLocation>,

    /// Replace the current figure instead of opening a new one
    #[arg(long)]
    pub clear_figure: bool,

    /// Read every sheet of a workbook
    #[arg(long)]
    pub all_sheets: bool,

    /// JSON file with default plot options
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Write the extracted series to CSV instead of opening a window
    #[arg(short, long)]
    pub export: Option<PathBuf>,

    /// Increase verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Options from `--config` (if any), overridden by command-line flags.
    pub fn plot_options(&self) -> Result<PlotOptions> {
        let mut options = match &self.config {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("reading {}", path.display()))?;
                serde_json::from_str(&text)
                    .with_context(|| format!("parsing {}", path.display()))?
            }
            None => PlotOptions::default(),
        };

        if !self.left.is_empty() {
            options.left = self.left.clone();
        }
        if !self.right.is_empty() {
            options.right = self.right.clone();
        }
        if !self.prefix.is_empty() {
            options.extract.prefix = self.prefix.clone();
        }
        if let Some(location) = self.location {
            options.location = location;
        }
        options.extract.overlay |= self.overlay;
        options.extract.sort |= self.sort;
        options.extract.hide_prefix |= self.hide_prefix;
        options.clear_figure |= self.clear_figure;
        options.all_sheets |= self.all_sheets;
        options.raw = false;

        Ok(options)
    }

    pub fn init_logging(&self) {
        let mut builder = env_logger::Builder::from_default_env();
        if self.verbose > 0 {
            builder.filter_level(match self.verbose {
                1 => log::LevelFilter::Info,
                _ => log::LevelFilter::Debug,
            });
        } else if std::env::var_os("RUST_LOG").is_none() {
            builder.filter_level(log::LevelFilter::Warn);
        }
        builder.format_timestamp_secs().init();
    }
}
