mod analysis;
mod app;
mod color;
mod config;
mod data;
mod figures;
mod state;
mod ui;

use anyhow::{anyhow, Context};
use clap::Parser;
use eframe::egui;

use app::HadronSpectraApp;
use config::Cli;
use state::AppState;

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut state = AppState::new(cli.analysis_config());
    state
        .load(&cli.particle_list)
        .with_context(|| format!("loading {}", cli.particle_list.display()))?;

    if cli.no_display {
        for figure in &state.figures {
            println!("{figure}");
        }
        return Ok(());
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Hadron Spectra",
        options,
        Box::new(|_cc| Ok(Box::new(HadronSpectraApp::new(state)))),
    )
    .map_err(|e| anyhow!("viewer failed: {e}"))
}
