use std::ops::RangeInclusive;

use eframe::egui::{self, Color32, Ui};
use egui_plot::{AxisHints, Corner, GridMark, HPlacement, Legend, Line, Plot, PlotPoint, PlotPoints, PlotUi};

use tsplot::data::timestamp::{format_elapsed, format_instant, from_days};
use tsplot::{ExtractionResult, Figure, FigureAxes, LegendLocation};

use crate::color::SeriesColors;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Figure tabs (central panel)
// ---------------------------------------------------------------------------

/// Render the tab strip and the active figure.
pub fn figure_area(ui: &mut Ui, state: &mut AppState) {
    if state.figures.is_empty() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open files, tick variables and press Plot  (File → Open…)");
        });
        return;
    }

    let mut close = None;
    ui.horizontal_wrapped(|ui: &mut Ui| {
        for (i, figure) in state.figures.iter().enumerate() {
            ui.selectable_value(&mut state.active_figure, i, format!("{}: {}", i + 1, figure.title));
            if ui.small_button("×").on_hover_text("Close figure").clicked() {
                close = Some(i);
            }
            ui.separator();
        }
    });
    if let Some(i) = close {
        state.close_figure(i);
    }
    ui.separator();

    if let Some(figure) = state.active() {
        figure_plot(ui, figure, state.active_figure);
    }
}

// ---------------------------------------------------------------------------
// Time-series plot
// ---------------------------------------------------------------------------

/// Render one figure. A dual-axis figure is drawn as two stacked plots with
/// independent y scales and a linked time axis, each with its own legend.
pub fn figure_plot(ui: &mut Ui, figure: &Figure, id: usize) {
    let colors = SeriesColors::for_figure(figure);
    let corner = legend_corner(figure.location);

    match &figure.axes {
        FigureAxes::Single { left } => {
            time_plot(("left", id), figure.overlay)
                .legend(Legend::default().position(corner))
                .show(ui, |plot_ui| add_lines(plot_ui, left, |i| colors.left(i)));
        }
        FigureAxes::Dual { left, right } => {
            let link = egui::Id::new(("time_axis", id));
            let height = (ui.available_height() - ui.spacing().item_spacing.y) / 2.0;

            time_plot(("left", id), figure.overlay)
                .height(height)
                .link_axis(link, [true, false])
                .link_cursor(link, [true, false])
                .legend(Legend::default().position(corner))
                .show(ui, |plot_ui| add_lines(plot_ui, left, |i| colors.left(i)));

            time_plot(("right", id), figure.overlay)
                .height(height)
                .link_axis(link, [true, false])
                .link_cursor(link, [true, false])
                .custom_y_axes(vec![AxisHints::new_y().placement(HPlacement::Right)])
                .legend(Legend::default().position(mirrored(corner)))
                .show(ui, |plot_ui| add_lines(plot_ui, right, |i| colors.right(i)));
        }
    }
}

fn time_plot(id: impl std::hash::Hash, overlay: bool) -> Plot<'static> {
    let axis_time = move |days: f64| {
        if overlay {
            format_elapsed(days)
        } else {
            from_days(days)
                .map(|dt| dt.format("%m-%d %H:%M:%S").to_string())
                .unwrap_or_default()
        }
    };
    let hover_time = move |days: f64| {
        if overlay {
            format_elapsed(days)
        } else {
            format_instant(days)
        }
    };

    Plot::new(id)
        .x_axis_label(if overlay { "Elapsed" } else { "Time" })
        .x_axis_formatter(move |mark: GridMark, _range: &RangeInclusive<f64>| axis_time(mark.value))
        .label_formatter(move |name: &str, value: &PlotPoint| {
            if name.is_empty() {
                format!("{}\n{:.4}", hover_time(value.x), value.y)
            } else {
                format!("{name}\n{}\n{:.4}", hover_time(value.x), value.y)
            }
        })
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
}

/// One line per packed column; padding and blank cells are left out.
fn add_lines(plot_ui: &mut PlotUi, result: &ExtractionResult, color: impl Fn(usize) -> Color32) {
    for (col, label) in result.labels.iter().enumerate() {
        let points: PlotPoints = result
            .x
            .column(col)
            .iter()
            .zip(result.y.column(col))
            .filter(|(t, v)| t.is_finite() && v.is_finite())
            .map(|(&t, &v)| [t, v])
            .collect();

        plot_ui.line(Line::new(points).name(label).color(color(col)).width(1.5));
    }
}

fn legend_corner(location: LegendLocation) -> Corner {
    match location {
        LegendLocation::NorthWest => Corner::LeftTop,
        LegendLocation::SouthEast => Corner::RightBottom,
        LegendLocation::SouthWest => Corner::LeftBottom,
        LegendLocation::Best | LegendLocation::BestOutside | LegendLocation::NorthEast => {
            Corner::RightTop
        }
    }
}

/// Same vertical edge, opposite side, so the two legends of a dual-axis
/// figure never line up.
fn mirrored(corner: Corner) -> Corner {
    match corner {
        Corner::LeftTop => Corner::RightTop,
        Corner::RightTop => Corner::LeftTop,
        Corner::LeftBottom => Corner::RightBottom,
        Corner::RightBottom => Corner::LeftBottom,
    }
}
