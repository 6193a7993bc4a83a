use std::path::Path;

use ballgame_filter::config;
use ballgame_filter::data::filter::{Era, Season, PA_MAX, PA_MIN};
use ballgame_filter::data::loader::load_file;
use ballgame_filter::data::model::GameType;
use ballgame_filter::state::{AppState, FilterControls};
use eframe::egui::{self, CollapsingHeader, Color32, ComboBox, DragValue, RichText, ScrollArea, Ui};
use egui_extras::DatePickerButton;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    let dataset = match &state.dataset {
        Some(ds) => ds,
        None => {
            ui.label("No dataset loaded.");
            return;
        }
    };

    // Clone what we need so we can mutate state inside the panel.
    let seasons = dataset.seasons.clone();
    let teams: Vec<String> = dataset.teams.iter().cloned().collect();
    let opponents: Vec<String> = dataset.opponents.iter().cloned().collect();
    let has_pa = dataset.has_plate_appearances;

    let mut apply = false;
    let mut reset = false;

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            let controls = &mut state.controls;
            timeframe_filters(ui, controls, &seasons, has_pa);
            team_filters(ui, controls, &teams, &opponents);
            score_filters(ui, controls);

            ui.separator();
            ui.horizontal(|ui: &mut Ui| {
                apply = ui.button("Apply Filters").clicked();
                reset = ui.button("Reset").clicked();
            });
        });

    if apply {
        state.apply_filters();
    } else if reset {
        state.reset_filters();
    }
}

fn timeframe_filters(ui: &mut Ui, c: &mut FilterControls, seasons: &[i32], has_pa: bool) {
    CollapsingHeader::new(RichText::new("Timeframe Filters").strong())
        .default_open(true)
        .show(ui, |ui: &mut Ui| {
            ui.label("Game Type");
            ComboBox::from_id_salt("game_type")
                .selected_text(c.game_type.label())
                .show_ui(ui, |ui: &mut Ui| {
                    for game_type in GameType::ALL {
                        ui.selectable_value(&mut c.game_type, game_type, game_type.label());
                    }
                });

            ui.label("Season");
            ComboBox::from_id_salt("season")
                .selected_text(c.season.to_string())
                .show_ui(ui, |ui: &mut Ui| {
                    ui.selectable_value(&mut c.season, Season::Any, "Any");
                    for &year in seasons {
                        ui.selectable_value(&mut c.season, Season::Year(year), year.to_string());
                    }
                    for era in Era::ALL {
                        ui.selectable_value(&mut c.season, Season::Era(era), era.label());
                    }
                });
            if let Season::Era(_) = c.season {
                ui.small("Eras are not mapped to seasons yet; this selection does not filter.");
            }

            ui.add_space(4.0);
            ui.checkbox(&mut c.last_n_days_enabled, "Last N Days");
            ui.add_enabled(
                c.last_n_days_enabled,
                DragValue::new(&mut c.last_n_days).range(1..=365).suffix(" days"),
            );

            ui.add_space(4.0);
            ui.checkbox(&mut c.date_range_enabled, "Custom Timeframe");
            ui.add_enabled_ui(c.date_range_enabled, |ui: &mut Ui| {
                ui.horizontal(|ui: &mut Ui| {
                    ui.label("Start Date");
                    ui.add(DatePickerButton::new(&mut c.start_date).id_salt("start_date"));
                });
                ui.horizontal(|ui: &mut Ui| {
                    ui.label("End Date");
                    ui.add(DatePickerButton::new(&mut c.end_date).id_salt("end_date"));
                });
            });

            if has_pa {
                ui.add_space(4.0);
                ui.label("Plate Appearances (PA)");
                ui.horizontal(|ui: &mut Ui| {
                    ui.add(DragValue::new(&mut c.min_pa).range(PA_MIN..=PA_MAX).prefix("min "));
                    ui.add(DragValue::new(&mut c.max_pa).range(PA_MIN..=PA_MAX).prefix("max "));
                });
            }
        });
}

fn team_filters(ui: &mut Ui, c: &mut FilterControls, teams: &[String], opponents: &[String]) {
    CollapsingHeader::new(RichText::new("Team Filters").strong())
        .default_open(true)
        .show(ui, |ui: &mut Ui| {
            ui.label("Team");
            choice_combo(ui, "team", &mut c.team, teams);
            ui.label("Opponent");
            choice_combo(ui, "opponent", &mut c.opponent, opponents);
        });
}

/// Combo box over `options` with a leading "Any" entry mapping to `None`.
fn choice_combo(ui: &mut Ui, id: &str, current: &mut Option<String>, options: &[String]) {
    let selected = current.clone().unwrap_or_else(|| "Any".to_string());
    ComboBox::from_id_salt(id)
        .selected_text(selected)
        .show_ui(ui, |ui: &mut Ui| {
            ui.selectable_value(current, None, "Any");
            for option in options {
                ui.selectable_value(current, Some(option.clone()), option.as_str());
            }
        });
}

fn score_filters(ui: &mut Ui, c: &mut FilterControls) {
    CollapsingHeader::new(RichText::new("Inning/Score/Margin Filters").strong())
        .default_open(true)
        .show(ui, |ui: &mut Ui| {
            ui.strong("Home Team");
            threshold(ui, "Runs Scored ≥", &mut c.home_runs_scored);
            threshold(ui, "Runs Allowed ≥", &mut c.home_runs_allowed);
            threshold(ui, "Margin ≥", &mut c.home_margin);

            ui.add_space(4.0);
            ui.strong("Away Team");
            threshold(ui, "Runs Scored ≥", &mut c.away_runs_scored);
            threshold(ui, "Runs Allowed ≥", &mut c.away_runs_allowed);
        });
}

/// A labelled "at least" input; zero disables the filter.
fn threshold(ui: &mut Ui, label: &str, value: &mut u32) {
    ui.horizontal(|ui: &mut Ui| {
        ui.label(label);
        ui.add(DragValue::new(value));
    });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            ui.separator();
            if ui.button("Load Preset…").clicked() {
                open_preset_dialog(state);
                ui.close_menu();
            }
            if ui.button("Save Preset…").clicked() {
                save_preset_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} games loaded, {} visible",
                ds.len(),
                state.visible_indices.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open game results")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        load_dataset(state, &path);
    }
}

/// Load a dataset into the state, reporting failure in the status line.
/// A failed load keeps the previous dataset.
pub fn load_dataset(state: &mut AppState, path: &Path) {
    match load_file(path) {
        Ok((dataset, report)) => {
            log::info!(
                "Kept {} of {} rows, columns {:?}",
                report.kept(),
                report.rows_read,
                dataset.extra_columns
            );
            state.set_dataset(dataset);
        }
        Err(e) => {
            log::error!("Failed to load file: {e:#}");
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }
}

fn open_preset_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Load filter preset")
        .add_filter("TOML", &["toml"])
        .pick_file();

    if let Some(path) = file {
        load_preset(state, &path);
    }
}

/// Load a preset into the side-panel controls.
pub fn load_preset(state: &mut AppState, path: &Path) {
    match config::load_preset(path) {
        Ok(criteria) => {
            state.controls.load_criteria(&criteria);
            state.status_message = None;
        }
        Err(e) => {
            log::error!("Failed to load preset: {e:#}");
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }
}

fn save_preset_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Save filter preset")
        .set_file_name("preset.toml")
        .add_filter("TOML", &["toml"])
        .save_file();

    if let Some(path) = file {
        if let Err(e) = config::save_preset(&path, &state.controls.to_criteria()) {
            log::error!("Failed to save preset: {e:#}");
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }
}
