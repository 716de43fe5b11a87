mod app;
mod color;
mod state;
mod ui;

use app::HouseholdImpactApp;
use eframe::egui;
use household_impact::config::DataSource;

fn main() -> eframe::Result {
    env_logger::init();

    let mut app = HouseholdImpactApp::default();
    let source = DataSource::from_process();
    match source.path() {
        Some(path) => {
            log::info!("Loading {} ({source:?})", path.display());
            ui::panels::load_into(&mut app.state, path);
        }
        None => log::info!("No dataset given; waiting for File → Open"),
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Household Impact Explorer",
        options,
        Box::new(|_cc| Ok(Box::new(app))),
    )
}
