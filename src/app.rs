use std::path::Path;

use ballgame_filter::state::AppState;
use eframe::egui;

use crate::ui::{panels, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct BallgameApp {
    pub state: AppState,
}

impl BallgameApp {
    /// Build the app, loading the startup dataset and preset if given.
    pub fn new(data: Option<&Path>, preset: Option<&Path>) -> Self {
        let mut state = AppState::default();
        if let Some(path) = data {
            panels::load_dataset(&mut state, path);
        }
        if let Some(path) = preset {
            panels::load_preset(&mut state, path);
        }
        Self { state }
    }
}

impl eframe::App for BallgameApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filter controls ----
        egui::SidePanel::left("filter_panel")
            .default_width(260.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: results table ----
        egui::CentralPanel::default().show(ctx, |ui| {
            table::results_table(ui, &self.state);
        });
    }
}
