#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app;
mod config;
mod effects;
mod error;
mod hotkeys;
mod media;
mod player;
mod project;
mod timeline;
mod ui;
mod utils;

use app::EditorApp;
use config::EditorConfig;
use eframe::egui;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = EditorConfig::load();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([900.0, 600.0])
            .with_title("Template Studio")
            .with_drag_and_drop(true),
        ..Default::default()
    };

    eframe::run_native(
        "Template Studio",
        options,
        Box::new(|cc| Ok(Box::new(EditorApp::new(cc, config)))),
    )
    .map_err(|e| anyhow::anyhow!("{}", e))
}
