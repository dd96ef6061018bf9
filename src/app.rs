use eframe::egui;

use spectral_matters::config::AnalyzerConfig;

use crate::state::AppState;
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct SpectralMattersApp {
    pub state: AppState,
}

impl SpectralMattersApp {
    pub fn new(config: AnalyzerConfig) -> Self {
        Self {
            state: AppState::new(config),
        }
    }
}

impl eframe::App for SpectralMattersApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: actions and results ----
        egui::SidePanel::left("action_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Bottom panel: messages ----
        egui::TopBottomPanel::bottom("messages")
            .default_height(140.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::message_panel(ui, &self.state);
            });

        // ---- Central panel: plot ----
        egui::CentralPanel::default().show(ctx, |ui| {
            plot::spectrum_plot(ui, &mut self.state);
        });
    }
}
