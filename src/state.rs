use chrono::{Local, NaiveDate};

use crate::data::filter::{filtered_indices, FilterCriteria, PaRange, Season, PA_MAX, PA_MIN};
use crate::data::model::{GameDataset, GameType};

/// Default window of the "Last N Days" control.
pub const DEFAULT_LAST_N_DAYS: u32 = 30;

// ---------------------------------------------------------------------------
// Control panel values
// ---------------------------------------------------------------------------

/// Current values of the side-panel widgets. Unlike [`FilterCriteria`] every
/// widget always holds a value; the enable flags decide which ones are
/// turned into active criteria.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterControls {
    pub game_type: GameType,
    pub season: Season,

    pub last_n_days_enabled: bool,
    pub last_n_days: u32,

    pub date_range_enabled: bool,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,

    pub min_pa: u32,
    pub max_pa: u32,

    pub team: Option<String>,
    pub opponent: Option<String>,

    pub home_runs_scored: u32,
    pub home_runs_allowed: u32,
    pub home_margin: u32,
    pub away_runs_scored: u32,
    pub away_runs_allowed: u32,
}

impl Default for FilterControls {
    fn default() -> Self {
        let today = Local::now().date_naive();
        Self {
            game_type: GameType::default(),
            season: Season::Any,
            last_n_days_enabled: false,
            last_n_days: DEFAULT_LAST_N_DAYS,
            date_range_enabled: false,
            start_date: today,
            end_date: today,
            min_pa: PA_MIN,
            max_pa: PA_MAX,
            team: None,
            opponent: None,
            home_runs_scored: 0,
            home_runs_allowed: 0,
            home_margin: 0,
            away_runs_scored: 0,
            away_runs_allowed: 0,
        }
    }
}

impl FilterControls {
    /// Fresh controls for a dataset: the date pickers span its games.
    pub fn for_dataset(dataset: &GameDataset) -> Self {
        let mut controls = Self::default();
        if let Some((first, last)) = dataset.date_range {
            controls.start_date = first;
            controls.end_date = last;
        }
        controls
    }

    /// Snapshot the widgets as a filter request.
    pub fn to_criteria(&self) -> FilterCriteria {
        FilterCriteria {
            game_type: self.game_type,
            season: self.season,
            last_n_days: self.last_n_days_enabled.then_some(self.last_n_days),
            start_date: self.date_range_enabled.then_some(self.start_date),
            end_date: self.date_range_enabled.then_some(self.end_date),
            team: self.team.clone(),
            opponent: self.opponent.clone(),
            home_runs_scored: self.home_runs_scored,
            home_runs_allowed: self.home_runs_allowed,
            home_margin: self.home_margin,
            away_runs_scored: self.away_runs_scored,
            away_runs_allowed: self.away_runs_allowed,
            plate_appearances: Some(PaRange {
                min: self.min_pa,
                max: self.max_pa,
            }),
        }
    }

    /// Set the widgets from a preset. Widgets the preset leaves unset keep
    /// their current value but are disabled.
    pub fn load_criteria(&mut self, criteria: &FilterCriteria) {
        self.game_type = criteria.game_type;
        self.season = criteria.season;

        self.last_n_days_enabled = criteria.last_n_days.is_some();
        if let Some(days) = criteria.last_n_days {
            self.last_n_days = days;
        }

        self.date_range_enabled = criteria.start_date.is_some() && criteria.end_date.is_some();
        if let Some(start) = criteria.start_date {
            self.start_date = start;
        }
        if let Some(end) = criteria.end_date {
            self.end_date = end;
        }

        let pa = criteria.plate_appearances.unwrap_or_default();
        self.min_pa = pa.min;
        self.max_pa = pa.max;

        self.team = criteria.team.clone();
        self.opponent = criteria.opponent.clone();
        self.home_runs_scored = criteria.home_runs_scored;
        self.home_runs_allowed = criteria.home_runs_allowed;
        self.home_margin = criteria.home_margin;
        self.away_runs_scored = criteria.away_runs_scored;
        self.away_runs_allowed = criteria.away_runs_allowed;
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
#[derive(Default)]
pub struct AppState {
    /// Loaded dataset (None until a file is loaded).
    pub dataset: Option<GameDataset>,

    /// Side-panel widget values.
    pub controls: FilterControls,

    /// Indices of games shown in the results table (cached).
    pub visible_indices: Vec<usize>,

    /// Whether the table shows a filtered result rather than all games.
    pub filters_applied: bool,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    /// Ingest a newly loaded dataset and reset the controls to span it.
    pub fn set_dataset(&mut self, dataset: GameDataset) {
        self.controls = FilterControls::for_dataset(&dataset);
        self.visible_indices = (0..dataset.len()).collect();
        self.filters_applied = false;
        self.dataset = Some(dataset);
        self.status_message = None;
    }

    /// Run the filter pipeline on the current controls.
    pub fn apply_filters(&mut self) {
        self.apply_filters_as_of(Local::now().date_naive());
    }

    /// Run the filter pipeline with "today" fixed.
    pub fn apply_filters_as_of(&mut self, today: NaiveDate) {
        let Some(ds) = &self.dataset else {
            return;
        };
        let criteria = self.controls.to_criteria();
        self.visible_indices = filtered_indices(ds, &criteria, today);
        self.filters_applied = true;
        log::info!("Filter applied: {} of {} games", self.visible_indices.len(), ds.len());
    }

    /// Back to all games with default controls.
    pub fn reset_filters(&mut self) {
        if let Some(ds) = &self.dataset {
            self.controls = FilterControls::for_dataset(ds);
            self.visible_indices = (0..ds.len()).collect();
        } else {
            self.controls = FilterControls::default();
        }
        self.filters_applied = false;
    }

    /// Heading and count line for the results table.
    pub fn result_heading(&self) -> (&'static str, String) {
        let title = if self.filters_applied {
            "Filtered Games"
        } else {
            "All Games"
        };
        (title, format!("Showing {} games", self.visible_indices.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::GameRecord;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn dataset() -> GameDataset {
        GameDataset::from_games(
            vec![
                GameRecord::new(date(2024, 4, 1), "SEA", "BOS", 5, 2, "W 5-2"),
                GameRecord::new(date(2024, 4, 2), "SEA", "BOS", 0, 2, "L 0-2"),
                GameRecord::new(date(2024, 7, 16), "AL", "NL", 5, 3, "All-Star Game"),
                GameRecord::new(date(2024, 8, 9), "NYY", "SEA", 7, 6, "W 7-6"),
            ],
            false,
            Vec::new(),
        )
    }

    #[test]
    fn test_set_dataset_shows_all_games() {
        let mut state = AppState::default();
        state.set_dataset(dataset());

        assert_eq!(state.visible_indices, vec![0, 1, 2, 3]);
        assert_eq!(state.result_heading(), ("All Games", "Showing 4 games".to_string()));
        assert_eq!(state.controls.start_date, date(2024, 4, 1));
        assert_eq!(state.controls.end_date, date(2024, 8, 9));
    }

    #[test]
    fn test_apply_and_reset() {
        let mut state = AppState::default();
        state.set_dataset(dataset());
        state.controls.team = Some("SEA".to_string());

        state.apply_filters_as_of(date(2024, 10, 1));
        assert_eq!(state.visible_indices, vec![0]);
        assert_eq!(
            state.result_heading(),
            ("Filtered Games", "Showing 1 games".to_string())
        );

        state.reset_filters();
        assert_eq!(state.visible_indices.len(), 4);
        assert!(!state.filters_applied);
        assert_eq!(state.controls.team, None);
    }

    #[test]
    fn test_apply_without_dataset_is_noop() {
        let mut state = AppState::default();
        state.apply_filters_as_of(date(2024, 10, 1));
        assert!(state.visible_indices.is_empty());
        assert!(!state.filters_applied);
    }

    #[test]
    fn test_disabled_controls_are_inactive() {
        let controls = FilterControls::for_dataset(&dataset());
        let criteria = controls.to_criteria();

        assert_eq!(criteria.last_n_days, None);
        assert_eq!(criteria.start_date, None);
        assert_eq!(criteria.end_date, None);
        assert_eq!(criteria.plate_appearances, Some(PaRange::default()));
    }

    #[test]
    fn test_enabled_controls_become_criteria() {
        let mut controls = FilterControls::for_dataset(&dataset());
        controls.last_n_days_enabled = true;
        controls.last_n_days = 7;
        controls.date_range_enabled = true;
        controls.min_pa = 20;

        let criteria = controls.to_criteria();

        assert_eq!(criteria.last_n_days, Some(7));
        assert_eq!(criteria.start_date, Some(date(2024, 4, 1)));
        assert_eq!(criteria.end_date, Some(date(2024, 8, 9)));
        assert_eq!(criteria.plate_appearances, Some(PaRange { min: 20, max: PA_MAX }));
    }

    #[test]
    fn test_load_criteria_round_trips_active_fields() {
        let criteria = FilterCriteria {
            game_type: GameType::Postseason,
            season: Season::Year(2024),
            last_n_days: Some(14),
            start_date: Some(date(2024, 5, 1)),
            end_date: Some(date(2024, 6, 1)),
            team: Some("SEA".to_string()),
            home_margin: 2,
            plate_appearances: Some(PaRange { min: 10, max: 50 }),
            ..Default::default()
        };
        let mut controls = FilterControls::for_dataset(&dataset());
        controls.load_criteria(&criteria);

        assert_eq!(controls.to_criteria(), criteria);
    }
}
