use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use tsplot::data::catalog::{AxisSelection, variable_names};
use tsplot::data::loader;
use tsplot::{Figure, FileLoader, PlotInput, PlotOptions, RawDataset, prepare_figure};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// A dataset shown in the side panel.
pub struct LoadedDataset {
    pub dataset: RawDataset,
    pub source: PathBuf,
    /// Legend prefix typed by the user; blank means none.
    pub prefix: String,
}

/// The full UI state, independent of rendering.
#[derive(Default)]
pub struct AppState {
    /// Loaded datasets, in load order.
    pub datasets: Vec<LoadedDataset>,

    /// Union of variable names across `datasets`.
    pub variables: Vec<String>,

    /// Which variables go on which axis.
    pub selection: AxisSelection,

    /// Option toggles; `left`, `right` and `prefix` are filled at plot time.
    pub options: PlotOptions,

    /// Rendered figures, shown as tabs.
    pub figures: Vec<Figure>,

    /// Index into `figures` of the visible tab.
    pub active_figure: usize,

    /// Folder the next file dialog opens in.
    pub last_folder: Option<PathBuf>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// Non-fatal messages from the last plot.
    pub warnings: Vec<String>,
}

impl AppState {
    /// Start with a figure already prepared (command-line invocation).
    pub fn with_figure(options: PlotOptions, figure: Figure) -> Self {
        let mut state = AppState {
            options,
            ..Default::default()
        };
        state.show_figure(figure, false);
        state
    }

    /// Load `paths` and append the resulting datasets. Stops at the first
    /// failure; datasets loaded before it are kept.
    pub fn open_files(&mut self, paths: &[PathBuf]) -> Result<()> {
        for path in paths {
            let loaded = if self.options.all_sheets {
                loader::load_all_sheets(path)
            } else {
                loader::load_file(path).map(|ds| vec![ds])
            }
            .with_context(|| format!("loading {}", path.display()))?;

            for dataset in loaded {
                log::info!(
                    "Loaded {} ({} rows, columns {:?})",
                    dataset.name,
                    dataset.data_len(),
                    dataset.column_names()
                );
                self.datasets.push(LoadedDataset {
                    dataset,
                    source: path.clone(),
                    prefix: String::new(),
                });
            }
            self.remember_folder(path);
        }
        self.refresh_variables();
        Ok(())
    }

    /// Load every supported file in `folder`, in name order.
    pub fn open_folder(&mut self, folder: &Path) -> Result<()> {
        let mut paths: Vec<PathBuf> = std::fs::read_dir(folder)
            .with_context(|| format!("listing {}", folder.display()))?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.is_file() && loader::is_supported(p))
            .collect();
        paths.sort();
        self.last_folder = Some(folder.to_path_buf());
        self.open_files(&paths)
    }

    pub fn remove_dataset(&mut self, index: usize) {
        if index < self.datasets.len() {
            self.datasets.remove(index);
            self.refresh_variables();
        }
    }

    pub fn clear_datasets(&mut self) {
        self.datasets.clear();
        self.variables.clear();
        self.selection.clear();
    }

    fn refresh_variables(&mut self) {
        let raw: Vec<RawDataset> = self.datasets.iter().map(|d| d.dataset.clone()).collect();
        self.variables = variable_names(&raw);
        self.selection.retain(&self.variables);
    }

    fn remember_folder(&mut self, path: &Path) {
        if let Some(parent) = path.parent() {
            self.last_folder = Some(parent.to_path_buf());
        }
    }

    /// Options for the next plot, built from the toggles and the selection.
    /// Prefixes are only passed on when at least one is filled in.
    pub fn plot_options(&self) -> PlotOptions {
        let mut options = self.options.clone();
        options.left = self.selection.left_variables(&self.variables);
        options.right = self.selection.right_variables(&self.variables);
        options.extract.prefix = if self.datasets.iter().any(|d| !d.prefix.is_empty()) {
            self.datasets.iter().map(|d| d.prefix.clone()).collect()
        } else {
            Vec::new()
        };
        options.raw = true;
        options
    }

    /// Extract the selected variables and show the result.
    pub fn plot(&mut self) -> Result<()> {
        let options = self.plot_options();
        let input = PlotInput::Datasets(self.datasets.iter().map(|d| d.dataset.clone()).collect());
        let figure = prepare_figure(input, &options, &FileLoader::default())
            .context("preparing plot")?;

        self.warnings = figure.diagnostics().map(ToString::to_string).collect();
        self.show_figure(figure, options.clear_figure);
        self.status_message = None;
        Ok(())
    }

    /// Replace the visible figure when `clear` is set, otherwise open a new
    /// tab.
    pub fn show_figure(&mut self, figure: Figure, clear: bool) {
        if clear && !self.figures.is_empty() {
            self.figures[self.active_figure] = figure;
        } else {
            self.figures.push(figure);
            self.active_figure = self.figures.len() - 1;
        }
    }

    pub fn close_figure(&mut self, index: usize) {
        if index < self.figures.len() {
            self.figures.remove(index);
            self.active_figure = self.active_figure.min(self.figures.len().saturating_sub(1));
        }
    }

    pub fn active(&self) -> Option<&Figure> {
        self.figures.get(self.active_figure)
    }
}
