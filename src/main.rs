mod app;
mod color;
mod state;
mod ui;

use app::SpectralMattersApp;
use eframe::egui;
use spectral_matters::config::AnalyzerConfig;

fn main() -> eframe::Result {
    env_logger::init();

    let config_path = AnalyzerConfig::default_path();
    let config = AnalyzerConfig::load_or_default(&config_path);
    log::info!("settings: {config:?}");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Spectral Matters Analyzer",
        options,
        Box::new(move |_cc| Ok(Box::new(SpectralMattersApp::new(config)))),
    )
}
