use ballgame_filter::state::AppState;
use eframe::egui::{self, Ui};
use egui_extras::{Column, TableBuilder};

const ROW_HEIGHT: f32 = 18.0;

// ---------------------------------------------------------------------------
// Results table (central panel)
// ---------------------------------------------------------------------------

/// Render the games currently visible, with the heading and count line.
pub fn results_table(ui: &mut Ui, state: &AppState) {
    let dataset = match &state.dataset {
        Some(ds) => ds,
        None => {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.heading("Open a game results file to begin  (File → Open…)");
            });
            return;
        }
    };

    let (title, count) = state.result_heading();
    ui.heading(title);
    ui.label(count);
    ui.separator();

    let has_pa = dataset.has_plate_appearances;
    let headers = dataset.column_headers();

    egui::ScrollArea::horizontal().show(ui, |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
            .columns(Column::auto().at_least(40.0), headers.len())
            .min_scrolled_height(0.0)
            .header(20.0, |mut header| {
                for name in &headers {
                    header.col(|ui: &mut Ui| {
                        ui.strong(*name);
                    });
                }
            })
            .body(|body| {
                body.rows(ROW_HEIGHT, state.visible_indices.len(), |mut row| {
                    let game = &dataset.games[state.visible_indices[row.index()]];
                    for text in game.cells(has_pa) {
                        row.col(|ui: &mut Ui| {
                            ui.label(text);
                        });
                    }
                });
            });
    });
}
