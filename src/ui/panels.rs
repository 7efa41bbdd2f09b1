use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};

use tsplot::LegendLocation;
use tsplot::data::loader::SUPPORTED_EXTENSIONS;

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – datasets, variables, options
// ---------------------------------------------------------------------------

/// Render the left panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Datasets");
    ui.separator();

    if state.datasets.is_empty() {
        ui.label("No files loaded.");
    } else {
        dataset_table(ui, state);
        if ui.small_button("Clear all").clicked() {
            state.clear_datasets();
        }
    }

    ui.add_space(8.0);
    ui.heading("Variables");
    ui.separator();

    ScrollArea::vertical()
        .id_salt("variables")
        .max_height(ui.available_height() * 0.5)
        .auto_shrink([false, true])
        .show(ui, |ui: &mut Ui| {
            egui::Grid::new("variable_grid")
                .num_columns(3)
                .striped(true)
                .show(ui, |ui: &mut Ui| {
                    ui.strong("Name");
                    ui.strong("Left");
                    ui.strong("Right");
                    ui.end_row();

                    for name in &state.variables {
                        ui.label(name);
                        let mut left = state.selection.is_left(name);
                        if ui.checkbox(&mut left, "").changed() {
                            state.selection.set_left(name, left);
                        }
                        let mut right = state.selection.is_right(name);
                        if ui.checkbox(&mut right, "").changed() {
                            state.selection.set_right(name, right);
                        }
                        ui.end_row();
                    }
                });
        });

    ui.add_space(8.0);
    ui.heading("Options");
    ui.separator();
    options(ui, state);

    ui.add_space(8.0);
    if ui
        .add_enabled(!state.datasets.is_empty(), egui::Button::new("Plot"))
        .clicked()
    {
        if let Err(e) = state.plot() {
            log::error!("Plot failed: {e:#}");
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }
}

fn dataset_table(ui: &mut Ui, state: &mut AppState) {
    let mut remove = None;

    TableBuilder::new(ui)
        .striped(true)
        .column(Column::auto().at_least(80.0))
        .column(Column::auto())
        .column(Column::auto())
        .column(Column::remainder().at_least(60.0))
        .column(Column::auto())
        .header(18.0, |mut header| {
            header.col(|ui| {
                ui.strong("Name");
            });
            header.col(|ui| {
                ui.strong("Rows");
            });
            header.col(|ui| {
                ui.strong("Cols");
            });
            header.col(|ui| {
                ui.strong("Prefix");
            });
            header.col(|_| {});
        })
        .body(|mut body| {
            for (i, loaded) in state.datasets.iter_mut().enumerate() {
                body.row(20.0, |mut row| {
                    row.col(|ui| {
                        ui.label(&loaded.dataset.name)
                            .on_hover_text(loaded.source.display().to_string());
                    });
                    row.col(|ui| {
                        ui.label(loaded.dataset.data_len().to_string());
                    });
                    row.col(|ui| {
                        ui.label(loaded.dataset.column_count().to_string());
                    });
                    row.col(|ui| {
                        ui.text_edit_singleline(&mut loaded.prefix);
                    });
                    row.col(|ui| {
                        if ui.small_button("×").on_hover_text("Remove").clicked() {
                            remove = Some(i);
                        }
                    });
                });
            }
        });

    if let Some(i) = remove {
        state.remove_dataset(i);
    }
}

fn options(ui: &mut Ui, state: &mut AppState) {
    let opts = &mut state.options;
    ui.checkbox(&mut opts.extract.overlay, "Overlay runs (start at zero)");
    ui.checkbox(&mut opts.extract.sort, "Sort by time");
    ui.checkbox(&mut opts.extract.hide_prefix, "Hide prefixes");
    ui.checkbox(&mut opts.clear_figure, "Replace current figure");
    ui.checkbox(&mut opts.all_sheets, "Load every workbook sheet");

    ui.horizontal(|ui: &mut Ui| {
        ui.label("Legend");
        egui::ComboBox::from_id_salt("legend_location")
            .selected_text(opts.location.keyword())
            .show_ui(ui, |ui: &mut Ui| {
                for loc in LegendLocation::ALL {
                    ui.selectable_value(&mut opts.location, loc, loc.keyword());
                }
            });
    });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open files…").clicked() {
                open_files_dialog(state);
                ui.close_menu();
            }
            if ui.button("Open folder…").clicked() {
                open_folder_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        ui.label(format!(
            "{} dataset(s), {} variable(s)",
            state.datasets.len(),
            state.variables.len()
        ));

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        } else if !state.warnings.is_empty() {
            ui.separator();
            ui.label(
                RichText::new(format!("{} warning(s)", state.warnings.len()))
                    .color(Color32::YELLOW),
            )
            .on_hover_text(state.warnings.join("\n"));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

fn dialog(state: &AppState, title: &str) -> rfd::FileDialog {
    let dialog = rfd::FileDialog::new().set_title(title);
    match &state.last_folder {
        Some(dir) => dialog.set_directory(dir),
        None => dialog,
    }
}

pub fn open_files_dialog(state: &mut AppState) {
    let files = dialog(state, "Open instrument data")
        .add_filter("Supported files", SUPPORTED_EXTENSIONS)
        .add_filter("CSV", &["csv", "txt"])
        .add_filter("Workbook", &["xlsx", "xlsm", "xls", "xlsb", "ods"])
        .add_filter("Parquet", &["parquet", "pq"])
        .add_filter("JSON", &["json"])
        .pick_files();

    if let Some(paths) = files {
        let result = state.open_files(&paths);
        show_load_result(state, result);
    }
}

pub fn open_folder_dialog(state: &mut AppState) {
    if let Some(folder) = dialog(state, "Open folder of runs").pick_folder() {
        let result = state.open_folder(&folder);
        show_load_result(state, result);
    }
}

fn show_load_result(state: &mut AppState, result: anyhow::Result<()>) {
    match result {
        Ok(()) => state.status_message = None,
        Err(e) => {
            log::error!("Failed to load file: {e:#}");
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }
}
