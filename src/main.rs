//! Customer Insights dashboard entry point.

use customer_insights::config::AppConfig;
use customer_insights::gui::InsightsApp;
use eframe::egui;

fn main() -> eframe::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = AppConfig::default();
    log::info!("starting dashboard with data source {}", config.data_path.display());

    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(config.window_size)
            .with_min_inner_size(config.min_window_size)
            .with_title(&config.window_title),
        ..Default::default()
    };

    // Run the application
    let title = config.window_title.clone();
    eframe::run_native(
        &title,
        options,
        Box::new(|cc| Ok(Box::new(InsightsApp::new(cc, config)))),
    )
}
