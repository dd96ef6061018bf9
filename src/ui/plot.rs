use eframe::egui::{Color32, Ui};
use egui_plot::{Line, Plot, PlotPoints, Points, Polygon};

use crate::color::{peak_color, peak_fill};
use crate::state::{AppState, Selection};

// ---------------------------------------------------------------------------
// Spectrum plot (central panel)
// ---------------------------------------------------------------------------

/// Render the current spectrum with picked points and integrated peaks, and
/// forward clicks to the active selection.
pub fn spectrum_plot(ui: &mut Ui, state: &mut AppState) {
    let Some(spectrum) = &state.spectrum else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Load a data folder to view the spectrum  (Load Data)");
        });
        return;
    };

    let selecting = state.selection != Selection::Idle;

    let response = Plot::new("spectrum_plot")
        .legend(egui_plot::Legend::default())
        .x_axis_label("Binding Energy (eV)")
        .y_axis_label("Intensity (arbitrary units)")
        .allow_boxed_zoom(!selecting)
        .allow_drag(!selecting)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            // Each trapezoid is convex, so peaks are filled one step at a time.
            for (k, peak) in state.peaks.iter().enumerate() {
                let fill = peak_fill(k);
                for (n, pair) in peak.points.windows(2).enumerate() {
                    let quad: PlotPoints = vec![
                        [pair[0].energy, 0.0],
                        [pair[0].energy, pair[0].intensity],
                        [pair[1].energy, pair[1].intensity],
                        [pair[1].energy, 0.0],
                    ]
                    .into();
                    let mut polygon = Polygon::new(quad).fill_color(fill).width(0.0);
                    if n == 0 {
                        polygon = polygon.name(format!("Peak {}: {:.2}", k + 1, peak.result.area));
                    }
                    plot_ui.polygon(polygon);
                }
                let outline: PlotPoints = peak
                    .points
                    .iter()
                    .map(|p| [p.energy, p.intensity])
                    .collect();
                plot_ui.line(Line::new(outline).color(peak_color(k)).width(2.0));
            }

            let points: PlotPoints = spectrum.points().map(|p| [p.energy, p.intensity]).collect();
            plot_ui.line(
                Line::new(points)
                    .name("Intensity")
                    .color(Color32::LIGHT_BLUE)
                    .width(1.5),
            );

            if !state.picked.is_empty() {
                let picked: PlotPoints = state
                    .picked
                    .iter()
                    .map(|p| [p.energy, p.intensity])
                    .collect();
                plot_ui.points(
                    Points::new(picked)
                        .name("Selected")
                        .radius(5.0)
                        .color(Color32::RED),
                );
            }

            plot_ui.pointer_coordinate()
        });

    if selecting && response.response.clicked() {
        if let Some(coord) = response.inner {
            if let Err(e) = state.pick_point(coord.x, coord.y) {
                state.fail(e);
            }
        }
    }
}
