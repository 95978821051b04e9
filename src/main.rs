//! Gomoku GUI
//!
//! Play Ninuki-renju against the engine or another player. Rules and engine
//! tuning are read from `Gomoku.toml`; set `RUST_LOG=debug` for search logs.

use std::error::Error;
use std::process::ExitCode;

use env_logger::Env;
use log::error;

use gomoku::config::Config;
use gomoku::ui::GomokuApp;

fn main() -> ExitCode {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = Config::load_or_default();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1000.0, 750.0])
            .with_min_inner_size([800.0, 600.0])
            .with_title("Gomoku"),
        ..Default::default()
    };

    let result = eframe::run_native(
        "Gomoku",
        options,
        Box::new(move |cc| -> Result<Box<dyn eframe::App>, Box<dyn Error + Send + Sync>> {
            let app = GomokuApp::new(cc, &config)?;
            Ok(Box::new(app))
        }),
    );

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("GUI failed: {}", e);
            ExitCode::FAILURE
        }
    }
}
