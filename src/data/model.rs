use std::collections::BTreeSet;
use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::normalize::derive_game_type;

// ---------------------------------------------------------------------------
// GameType – derived classification of a game
// ---------------------------------------------------------------------------

/// Classification derived from the `Result`, `RS` and `RA` columns.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum GameType {
    #[default]
    RegularSeason,
    AllStarGame,
    Postseason,
}

impl GameType {
    /// Selector order used by the control panel.
    pub const ALL: [GameType; 3] = [
        GameType::RegularSeason,
        GameType::AllStarGame,
        GameType::Postseason,
    ];

    pub fn label(self) -> &'static str {
        match self {
            GameType::RegularSeason => "Regular Season",
            GameType::AllStarGame => "All-Star Game",
            GameType::Postseason => "Postseason",
        }
    }
}

impl fmt::Display for GameType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// GameRecord – one row of the dataset
// ---------------------------------------------------------------------------

/// A single normalized game (one row of the source table).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameRecord {
    pub date: NaiveDate,
    pub team: String,
    pub opponent: String,
    pub runs_scored: u32,
    pub runs_allowed: u32,
    /// Absent when the dataset has no `PA` column or the cell is blank.
    pub plate_appearances: Option<u32>,
    pub result: String,
    pub game_type: GameType,
    /// Remaining source columns as text, aligned with
    /// [`GameDataset::extra_columns`].
    #[serde(skip)]
    pub extra: Vec<String>,
}

impl GameRecord {
    /// Build a record, deriving `game_type` from the result and score.
    pub fn new(
        date: NaiveDate,
        team: impl Into<String>,
        opponent: impl Into<String>,
        runs_scored: u32,
        runs_allowed: u32,
        result: impl Into<String>,
    ) -> Self {
        let result = result.into();
        let game_type = derive_game_type(&result, runs_scored, runs_allowed);
        Self {
            date,
            team: team.into(),
            opponent: opponent.into(),
            runs_scored,
            runs_allowed,
            plate_appearances: None,
            result,
            game_type,
            extra: Vec::new(),
        }
    }

    pub fn with_plate_appearances(mut self, pa: u32) -> Self {
        self.plate_appearances = Some(pa);
        self
    }

    /// Runs scored minus runs allowed.
    pub fn margin(&self) -> i64 {
        i64::from(self.runs_scored) - i64::from(self.runs_allowed)
    }

    /// Cell texts in [`GameDataset::column_headers`] order.
    pub fn cells(&self, with_plate_appearances: bool) -> Vec<String> {
        let mut cells = vec![
            self.date.format("%Y-%m-%d").to_string(),
            self.team.clone(),
            self.opponent.clone(),
            self.runs_scored.to_string(),
            self.runs_allowed.to_string(),
            self.result.clone(),
            self.game_type.to_string(),
        ];
        if with_plate_appearances {
            cells.push(
                self.plate_appearances
                    .map(|pa| pa.to_string())
                    .unwrap_or_default(),
            );
        }
        cells.extend(self.extra.iter().cloned());
        cells
    }
}

// ---------------------------------------------------------------------------
// GameDataset – the complete normalized dataset
// ---------------------------------------------------------------------------

/// The normalized dataset with pre-computed selector indices. Built once at
/// load time and only ever read afterwards.
#[derive(Debug, Clone, Default)]
pub struct GameDataset {
    /// All games (rows) in source order.
    pub games: Vec<GameRecord>,
    /// Whether the source exposed a `PA` column.
    pub has_plate_appearances: bool,
    /// Names of the source columns not modelled as typed fields.
    pub extra_columns: Vec<String>,
    /// Sorted unique `Team` values.
    pub teams: BTreeSet<String>,
    /// Sorted unique `Opp` values.
    pub opponents: BTreeSet<String>,
    /// Calendar years present, newest first.
    pub seasons: Vec<i32>,
    /// Earliest and latest game date.
    pub date_range: Option<(NaiveDate, NaiveDate)>,
}

impl GameDataset {
    /// Build selector indices from the normalized games.
    pub fn from_games(
        games: Vec<GameRecord>,
        has_plate_appearances: bool,
        extra_columns: Vec<String>,
    ) -> Self {
        let mut teams = BTreeSet::new();
        let mut opponents = BTreeSet::new();
        let mut years = BTreeSet::new();
        let mut date_range: Option<(NaiveDate, NaiveDate)> = None;

        for game in &games {
            teams.insert(game.team.clone());
            opponents.insert(game.opponent.clone());
            years.insert(game.date.year());
            date_range = Some(match date_range {
                Some((lo, hi)) => (lo.min(game.date), hi.max(game.date)),
                None => (game.date, game.date),
            });
        }

        GameDataset {
            games,
            has_plate_appearances,
            extra_columns,
            teams,
            opponents,
            seasons: years.into_iter().rev().collect(),
            date_range,
        }
    }

    /// Number of games.
    pub fn len(&self) -> usize {
        self.games.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }

    /// Display column names: the modelled columns, `PA` when the source had
    /// it, then the extra source columns.
    pub fn column_headers(&self) -> Vec<&str> {
        let mut headers = vec!["Date", "Team", "Opp", "RS", "RA", "Result", "Game Type"];
        if self.has_plate_appearances {
            headers.push("PA");
        }
        headers.extend(self.extra_columns.iter().map(String::as_str));
        headers
    }
}
