use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};

use crate::color::peak_color;
use crate::state::{AppState, Selection};

// ---------------------------------------------------------------------------
// Left side panel – actions, peaks, files
// ---------------------------------------------------------------------------

/// Render the left panel: the four actions, the peak table and the files
/// used for the current spectrum.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Actions");
    ui.separator();

    let has_data = state.spectrum.is_some();
    let wide = egui::vec2(ui.available_width(), 24.0);

    if ui.add(egui::Button::new("Load Data").min_size(wide)).clicked() {
        open_folder_dialog(state);
    }
    if ui
        .add_enabled(has_data, egui::Button::new("Remove Linear Background").min_size(wide))
        .clicked()
    {
        if let Err(e) = state.begin_background_selection() {
            state.fail(e);
        }
    }
    if ui
        .add_enabled(has_data, egui::Button::new("Calculate Intensities").min_size(wide))
        .clicked()
    {
        if let Err(e) = state.begin_interval_selection() {
            state.fail(e);
        }
    }
    if ui
        .add_enabled(has_data, egui::Button::new("Save Data").min_size(wide))
        .clicked()
    {
        save_file_dialog(state);
    }

    if state.selection != Selection::Idle {
        ui.add_space(4.0);
        let what = match state.selection {
            Selection::Background => "background anchor",
            _ => "interval bound",
        };
        ui.label(
            RichText::new(format!("Click {what} {} of 2", state.picked.len() + 1))
                .color(Color32::YELLOW),
        );
        if ui.small_button("Cancel").clicked() {
            state.cancel_selection();
        }
    }

    ui.add_space(8.0);
    ui.heading("Peaks");
    ui.separator();
    peak_table(ui, state);

    ui.add_space(8.0);
    if let Some(report) = &state.load_report {
        let header = format!(
            "Files  ({} used, {} skipped)",
            report.loaded.len(),
            report.faulty.len()
        );
        egui::CollapsingHeader::new(RichText::new(header).strong())
            .default_open(false)
            .show(ui, |ui: &mut Ui| {
                ui.weak(report.folder.display().to_string());
                for name in &report.loaded {
                    ui.label(name);
                }
                for (name, reason) in &report.faulty {
                    ui.label(RichText::new(name).color(Color32::RED))
                        .on_hover_text(reason);
                }
            });
    }
}

fn peak_table(ui: &mut Ui, state: &AppState) {
    if state.peaks.is_empty() {
        ui.label("No peaks integrated yet.");
        return;
    }

    TableBuilder::new(ui)
        .striped(true)
        .vscroll(false)
        .column(Column::auto())
        .column(Column::auto())
        .column(Column::remainder())
        .header(18.0, |mut header| {
            header.col(|ui: &mut Ui| {
                ui.strong("#");
            });
            header.col(|ui: &mut Ui| {
                ui.strong("Window (eV)");
            });
            header.col(|ui: &mut Ui| {
                ui.strong("Intensity");
            });
        })
        .body(|mut body| {
            for (k, peak) in state.peaks.iter().enumerate() {
                let r = &peak.result;
                body.row(18.0, |mut row| {
                    row.col(|ui: &mut Ui| {
                        ui.label(RichText::new(format!("{}", k + 1)).color(peak_color(k)));
                    });
                    row.col(|ui: &mut Ui| {
                        ui.label(format!("{:.2} – {:.2}", r.energy_low, r.energy_high));
                    });
                    row.col(|ui: &mut Ui| {
                        ui.label(format!("{:.2}", r.area));
                    });
                });
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / status bar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Load Data…").clicked() {
                open_folder_dialog(state);
                ui.close_menu();
            }
            if ui
                .add_enabled(state.spectrum.is_some(), egui::Button::new("Save Data…"))
                .clicked()
            {
                save_file_dialog(state);
                ui.close_menu();
            }
            ui.separator();
            if ui.button("Quit").clicked() {
                ui.ctx().send_viewport_cmd(egui::ViewportCommand::Close);
            }
        });

        ui.separator();

        if let Some(sp) = &state.spectrum {
            let (low, high) = sp.energy_range();
            ui.label(format!("{} samples, {low:.2} – {high:.2} eV", sp.len()));
        }

        ui.separator();

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Bottom panel – message log
// ---------------------------------------------------------------------------

pub fn message_panel(ui: &mut Ui, state: &AppState) {
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .stick_to_bottom(true)
        .show(ui, |ui: &mut Ui| {
            for msg in &state.messages {
                ui.label(msg);
            }
        });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_folder_dialog(state: &mut AppState) {
    let folder = rfd::FileDialog::new()
        .set_title("Select Data Folder")
        .pick_folder();

    if let Some(path) = folder {
        if let Err(e) = state.load_folder(&path) {
            state.fail(e);
        }
    }
}

pub fn save_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Save your data")
        .add_filter("CSV", &["csv"])
        .set_file_name("spectrum.csv")
        .save_file();

    match file {
        Some(path) => {
            if let Err(e) = state.save(&path) {
                state.fail(e);
            }
        }
        None => log::debug!("save cancelled"),
    }
}
