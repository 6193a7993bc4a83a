use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Days, Local, NaiveDate};
use serde::{Deserialize, Serialize};

use super::model::{GameDataset, GameRecord, GameType};

/// Bounds of the plate-appearance controls.
pub const PA_MIN: u32 = 1;
pub const PA_MAX: u32 = 165;

// ---------------------------------------------------------------------------
// Season selector
// ---------------------------------------------------------------------------

/// Named historical eras offered by the season selector.
///
/// Eras are accepted as a selection but are not mapped to year ranges, so
/// selecting one does not narrow the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Era {
    WildCard,
    Divisional,
    Expansion,
    Integration,
    LiveBall,
}

impl Era {
    pub const ALL: [Era; 5] = [
        Era::WildCard,
        Era::Divisional,
        Era::Expansion,
        Era::Integration,
        Era::LiveBall,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Era::WildCard => "Wild-Card Era",
            Era::Divisional => "Divisional Era",
            Era::Expansion => "Expansion Era",
            Era::Integration => "Integration Era",
            Era::LiveBall => "Live-Ball Era",
        }
    }

    /// Short form used on the command line and in presets.
    pub fn slug(self) -> &'static str {
        match self {
            Era::WildCard => "wild-card",
            Era::Divisional => "divisional",
            Era::Expansion => "expansion",
            Era::Integration => "integration",
            Era::LiveBall => "live-ball",
        }
    }
}

/// Season selection: any season, one calendar year, or a named era.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Season {
    #[default]
    Any,
    Year(i32),
    Era(Era),
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Season::Any => f.write_str("Any"),
            Season::Year(year) => write!(f, "{year}"),
            Season::Era(era) => f.write_str(era.label()),
        }
    }
}

impl FromStr for Season {
    type Err = String;

    /// Accepts `any`, a four-digit year, an era slug (`wild-card`) or an era
    /// label (`Wild-Card Era`). Case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("any") {
            return Ok(Season::Any);
        }
        if !s.is_empty() && s.chars().all(|c| c.is_ascii_digit()) {
            return s
                .parse()
                .map(Season::Year)
                .map_err(|e| format!("invalid season year '{s}': {e}"));
        }
        Era::ALL
            .into_iter()
            .find(|era| s.eq_ignore_ascii_case(era.slug()) || s.eq_ignore_ascii_case(era.label()))
            .map(Season::Era)
            .ok_or_else(|| format!("unknown season '{s}'"))
    }
}

impl TryFrom<String> for Season {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Season> for String {
    fn from(season: Season) -> Self {
        match season {
            Season::Any => "any".to_string(),
            Season::Year(year) => year.to_string(),
            Season::Era(era) => era.slug().to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Filter criteria
// ---------------------------------------------------------------------------

/// Inclusive plate-appearance span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaRange {
    pub min: u32,
    pub max: u32,
}

impl Default for PaRange {
    fn default() -> Self {
        Self {
            min: PA_MIN,
            max: PA_MAX,
        }
    }
}

impl PaRange {
    pub fn contains(&self, pa: u32) -> bool {
        self.min <= pa && pa <= self.max
    }
}

/// One filter request, built from the control panel (or a preset) and
/// read-only once handed to [`apply`].
///
/// Optional fields skip their predicate when `None`; numeric thresholds
/// skip theirs when zero.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterCriteria {
    pub game_type: GameType,
    pub season: Season,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_n_days: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opponent: Option<String>,
    pub home_runs_scored: u32,
    pub home_runs_allowed: u32,
    pub home_margin: u32,
    pub away_runs_scored: u32,
    pub away_runs_allowed: u32,
    // Kept last so the TOML form writes it as a trailing table.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plate_appearances: Option<PaRange>,
}

impl FilterCriteria {
    /// Criteria that only pick a game type.
    pub fn for_game_type(game_type: GameType) -> Self {
        Self {
            game_type,
            ..Default::default()
        }
    }
}

// ---------------------------------------------------------------------------
// Filter pipeline
// ---------------------------------------------------------------------------

/// Games matching a [`FilterCriteria`], in dataset order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilteredGames {
    pub games: Vec<GameRecord>,
}

impl FilteredGames {
    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }

    /// Count line shown above the results table.
    pub fn summary(&self) -> String {
        format!("Showing {} games", self.len())
    }
}

/// Filter the dataset against today's local date.
pub fn apply(dataset: &GameDataset, criteria: &FilterCriteria) -> FilteredGames {
    apply_as_of(dataset, criteria, Local::now().date_naive())
}

/// Filter the dataset, resolving "last N days" relative to `today`.
pub fn apply_as_of(
    dataset: &GameDataset,
    criteria: &FilterCriteria,
    today: NaiveDate,
) -> FilteredGames {
    let games = filtered_indices(dataset, criteria, today)
        .into_iter()
        .map(|i| dataset.games[i].clone())
        .collect();
    FilteredGames { games }
}

/// Return indices of games that pass every active predicate.
///
/// Predicates run in a fixed order, each narrowing the survivors of the
/// previous one; the survivor count after each active step is logged at
/// debug level.
pub fn filtered_indices(
    dataset: &GameDataset,
    criteria: &FilterCriteria,
    today: NaiveDate,
) -> Vec<usize> {
    let mut survivors: Vec<usize> = (0..dataset.len()).collect();
    let games = dataset.games.as_slice();

    narrow(&mut survivors, games, "game type", |g: &GameRecord| {
        g.game_type == criteria.game_type
    });

    match criteria.season {
        Season::Any => {}
        Season::Year(year) => narrow(&mut survivors, games, "season", |g: &GameRecord| {
            g.date.year() == year
        }),
        Season::Era(era) => {
            log::debug!("season: {} has no year range, not filtering", era.label());
        }
    }

    if let Some(days) = criteria.last_n_days {
        // Whole-day window: a game on the cutoff date itself is kept.
        let cutoff = today
            .checked_sub_days(Days::new(u64::from(days)))
            .unwrap_or(NaiveDate::MIN);
        narrow(&mut survivors, games, "last n days", |g: &GameRecord| {
            g.date >= cutoff
        });
    }

    if let (Some(start), Some(end)) = (criteria.start_date, criteria.end_date) {
        narrow(&mut survivors, games, "date range", |g: &GameRecord| {
            start <= g.date && g.date <= end
        });
    }

    if dataset.has_plate_appearances {
        if let Some(range) = criteria.plate_appearances {
            narrow(&mut survivors, games, "plate appearances", |g: &GameRecord| {
                g.plate_appearances.is_some_and(|pa| range.contains(pa))
            });
        }
    }

    if let Some(team) = criteria.team.as_deref() {
        narrow(&mut survivors, games, "team", |g: &GameRecord| g.team == team);
    }

    let opponent = criteria.opponent.as_deref();
    let same_opponent = |g: &GameRecord| opponent.map_or(true, |opp| g.opponent == opp);
    if opponent.is_some() {
        narrow(&mut survivors, games, "opponent", same_opponent);
    }

    if criteria.home_runs_scored > 0 {
        let min = criteria.home_runs_scored;
        narrow(&mut survivors, games, "home runs scored", |g: &GameRecord| {
            g.runs_scored >= min
        });
    }

    if criteria.home_runs_allowed > 0 {
        let min = criteria.home_runs_allowed;
        narrow(&mut survivors, games, "home runs allowed", |g: &GameRecord| {
            g.runs_allowed >= min
        });
    }

    if criteria.home_margin > 0 {
        let min = i64::from(criteria.home_margin);
        narrow(&mut survivors, games, "home margin", |g: &GameRecord| {
            g.margin() >= min
        });
    }

    // The away thresholds re-check the opponent and then compare against the
    // home-side run columns: away runs scored reads RA, away runs allowed
    // reads RS.
    if criteria.away_runs_scored > 0 {
        let min = criteria.away_runs_scored;
        narrow(&mut survivors, games, "away runs scored", |g: &GameRecord| {
            same_opponent(g) && g.runs_allowed >= min
        });
    }

    if criteria.away_runs_allowed > 0 {
        let min = criteria.away_runs_allowed;
        narrow(&mut survivors, games, "away runs allowed", |g: &GameRecord| {
            same_opponent(g) && g.runs_scored >= min
        });
    }

    survivors
}

fn narrow(
    survivors: &mut Vec<usize>,
    games: &[GameRecord],
    step: &str,
    keep: impl Fn(&GameRecord) -> bool,
) {
    survivors.retain(|&i| keep(&games[i]));
    log::debug!("{step}: {} games remain", survivors.len());
}
