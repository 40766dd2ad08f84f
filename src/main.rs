use anyhow::Context;
use eframe::egui;
use exoplanet_explorer::app::ExoplanetApp;
use exoplanet_explorer::config::Config;

fn main() -> anyhow::Result<()> {
    // A missing .env file is fine; the environment may already be set.
    let _ = dotenvy::dotenv();
    env_logger::init();

    let config = Config::from_env().context("reading configuration")?;
    if config.summary.api_key.is_none() {
        log::warn!("GROQ_API_KEY is not set; AI summaries are disabled");
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 900.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Exoplanet Explorer",
        options,
        Box::new(|_cc| Ok(Box::new(ExoplanetApp::new(config)))),
    )
    .map_err(|e| anyhow::anyhow!("running the dashboard: {e}"))
}
