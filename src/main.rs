mod app;
mod cli;
mod color;
mod state;
mod ui;

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use eframe::egui;

use app::TsPlotApp;
use cli::Cli;
use state::AppState;
use tsplot::{FileLoader, PlotInput, prepare_figure};

fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.init_logging();

    let options = cli.plot_options()?;

    let state = if cli.files.is_empty() {
        if cli.export.is_some() {
            bail!("--export needs at least one input file");
        }
        AppState {
            options,
            ..Default::default()
        }
    } else {
        let loader = FileLoader {
            all_sheets: options.all_sheets,
        };
        let figure = prepare_figure(PlotInput::Paths(cli.files.clone()), &options, &loader)
            .context("preparing plot")?;

        if let Some(path) = &cli.export {
            tsplot::export::write_figure(&figure, path)
                .with_context(|| format!("writing {}", path.display()))?;
            return Ok(());
        }
        AppState::with_figure(options, figure)
    };

    run_viewer(state)
}

fn run_viewer(state: AppState) -> Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([640.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "tsplot – Time-Series Viewer",
        options,
        Box::new(move |_cc| Ok(Box::new(TsPlotApp::new(state)))),
    )
    .map_err(|e| anyhow!("viewer failed: {e}"))
}
