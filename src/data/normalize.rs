use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

use super::model::{GameDataset, GameRecord, GameType};

/// Doubleheader annotations such as `"2024-05-01 (1)"`.
static PAREN_SUFFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\(.*\)").expect("valid parenthesized suffix regex"));

/// Marker in the `Result` column identifying an All-Star game.
pub const ALL_STAR_MARKER: &str = "All-Star";

// ---------------------------------------------------------------------------
// Raw rows – text cells straight out of a loader
// ---------------------------------------------------------------------------

/// One source row with its cells still as text.
#[derive(Debug, Clone, Default)]
pub struct RawGame {
    pub date: String,
    pub team: String,
    pub opponent: String,
    pub runs_scored: String,
    pub runs_allowed: String,
    pub result: String,
    pub plate_appearances: Option<String>,
    pub extra: Vec<String>,
}

/// A loaded table before normalization.
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    pub has_plate_appearances: bool,
    pub extra_columns: Vec<String>,
    pub rows: Vec<RawGame>,
}

/// What normalization kept and dropped.
///
/// Runs are required counts, so a row with blank, negative or non-integral
/// `RS`/`RA` is dropped and counted in `dropped_bad_runs` rather than kept
/// with missing runs (where the score heuristic would have filed it as
/// postseason).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizeReport {
    pub rows_read: usize,
    pub dropped_bad_date: usize,
    pub dropped_bad_runs: usize,
}

impl NormalizeReport {
    pub fn kept(&self) -> usize {
        self.rows_read - self.dropped_bad_date - self.dropped_bad_runs
    }
}

// ---------------------------------------------------------------------------
// Field parsers
// ---------------------------------------------------------------------------

/// Parse a `Date` cell. Any parenthesized suffix is stripped first, then
/// `YYYY-MM-DD` is tried, then `MM/DD/YYYY`.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let cleaned = PAREN_SUFFIX_RE.replace_all(raw, "");
    let cleaned = cleaned.trim();
    NaiveDate::parse_from_str(cleaned, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(cleaned, "%m/%d/%Y"))
        .ok()
}

/// Classify a game from its result text and score.
///
/// Any game whose result mentions the All-Star marker is an All-Star game.
/// Otherwise a game where both sides scored counts as regular season, and
/// everything else (including any shutout) as postseason.
pub fn derive_game_type(result: &str, runs_scored: u32, runs_allowed: u32) -> GameType {
    if result.contains(ALL_STAR_MARKER) {
        GameType::AllStarGame
    } else if runs_scored > 0 && runs_allowed > 0 {
        GameType::RegularSeason
    } else {
        GameType::Postseason
    }
}

/// Parse a non-negative count such as `RS`, `RA` or `PA`.
///
/// Accepts integer text and integral float text (`"5.0"`, as written by
/// dataframe exports of columns that contained nulls).
pub fn parse_count(raw: &str) -> Option<u32> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(n) = s.parse::<u32>() {
        return Some(n);
    }
    let f = s.parse::<f64>().ok()?;
    if f.is_finite() && f >= 0.0 && f.fract() == 0.0 && f <= f64::from(u32::MAX) {
        Some(f as u32)
    } else {
        None
    }
}

// ---------------------------------------------------------------------------
// Table normalization
// ---------------------------------------------------------------------------

/// Turn raw rows into the working dataset. Rows with an unparseable date or
/// unusable run counts are dropped and counted in the report.
pub fn normalize(table: RawTable) -> (GameDataset, NormalizeReport) {
    let mut report = NormalizeReport {
        rows_read: table.rows.len(),
        ..Default::default()
    };
    let mut games = Vec::with_capacity(table.rows.len());

    for (row_no, raw) in table.rows.into_iter().enumerate() {
        let Some(date) = parse_date(&raw.date) else {
            log::debug!("row {row_no}: dropping unparseable date {:?}", raw.date);
            report.dropped_bad_date += 1;
            continue;
        };

        let (Some(runs_scored), Some(runs_allowed)) =
            (parse_count(&raw.runs_scored), parse_count(&raw.runs_allowed))
        else {
            log::debug!(
                "row {row_no}: dropping unusable runs RS={:?} RA={:?}",
                raw.runs_scored,
                raw.runs_allowed
            );
            report.dropped_bad_runs += 1;
            continue;
        };

        let mut game = GameRecord::new(
            date,
            raw.team,
            raw.opponent,
            runs_scored,
            runs_allowed,
            raw.result,
        );
        game.plate_appearances = raw.plate_appearances.as_deref().and_then(parse_count);
        game.extra = raw.extra;
        games.push(game);
    }

    if report.dropped_bad_date > 0 || report.dropped_bad_runs > 0 {
        log::warn!(
            "dropped {} rows with unparseable dates and {} rows with unusable runs",
            report.dropped_bad_date,
            report.dropped_bad_runs
        );
    }

    let dataset = GameDataset::from_games(games, table.has_plate_appearances, table.extra_columns);
    (dataset, report)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn raw(date: &str, rs: &str, ra: &str, result: &str) -> RawGame {
        RawGame {
            date: date.to_string(),
            team: "SEA".to_string(),
            opponent: "HOU".to_string(),
            runs_scored: rs.to_string(),
            runs_allowed: ra.to_string(),
            result: result.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_parse_date_strips_doubleheader_suffix() {
        assert_eq!(parse_date("2024-05-01 (1)"), Some(date(2024, 5, 1)));
        assert_eq!(parse_date("2024-05-01(2)"), Some(date(2024, 5, 1)));
    }

    #[test]
    fn test_parse_date_us_format() {
        assert_eq!(parse_date("05/01/2024"), Some(date(2024, 5, 1)));
        assert_eq!(parse_date("05/01/2024 (2)"), Some(date(2024, 5, 1)));
    }

    #[test]
    fn test_parse_date_rejects_garbage() {
        assert_eq!(parse_date("not-a-date"), None);
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("Thursday, Apr 1"), None);
        assert_eq!(parse_date("2024-02-30"), None);
    }

    #[test]
    fn test_derive_game_type_all_star_wins_over_score() {
        assert_eq!(
            derive_game_type("All-Star Game, AL 5-3", 5, 3),
            GameType::AllStarGame
        );
        assert_eq!(derive_game_type("All-Star", 0, 0), GameType::AllStarGame);
    }

    #[test]
    fn test_derive_game_type_score_heuristic() {
        assert_eq!(derive_game_type("W 5-2", 5, 2), GameType::RegularSeason);
        // A shutout either way is classified as postseason.
        assert_eq!(derive_game_type("W 3-0", 3, 0), GameType::Postseason);
        assert_eq!(derive_game_type("L 0-1", 0, 1), GameType::Postseason);
        assert_eq!(derive_game_type("", 0, 0), GameType::Postseason);
    }

    #[test]
    fn test_derive_game_type_is_deterministic() {
        for _ in 0..3 {
            assert_eq!(derive_game_type("L 4-6", 4, 6), GameType::RegularSeason);
        }
    }

    #[test]
    fn test_derive_game_type_marker_is_case_sensitive() {
        assert_eq!(derive_game_type("all-star", 2, 1), GameType::RegularSeason);
    }

    #[test]
    fn test_parse_count() {
        assert_eq!(parse_count("5"), Some(5));
        assert_eq!(parse_count(" 12 "), Some(12));
        assert_eq!(parse_count("7.0"), Some(7));
        assert_eq!(parse_count(""), None);
        assert_eq!(parse_count("-1"), None);
        assert_eq!(parse_count("2.5"), None);
        assert_eq!(parse_count("NaN"), None);
        assert_eq!(parse_count("x"), None);
    }

    #[test]
    fn test_normalize_drops_and_counts_bad_rows() {
        let table = RawTable {
            has_plate_appearances: false,
            extra_columns: Vec::new(),
            rows: vec![
                raw("2024-04-01", "5", "2", "W 5-2"),
                raw("garbage", "5", "2", "W 5-2"),
                raw("2024-04-02", "", "2", "L"),
                raw("04/03/2024 (1)", "1.0", "0", "W 1-0"),
            ],
        };

        let (ds, report) = normalize(table);

        assert_eq!(
            report,
            NormalizeReport {
                rows_read: 4,
                dropped_bad_date: 1,
                dropped_bad_runs: 1,
            }
        );
        assert_eq!(report.kept(), 2);
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.games[0].game_type, GameType::RegularSeason);
        assert_eq!(ds.games[1].date, date(2024, 4, 3));
        assert_eq!(ds.games[1].game_type, GameType::Postseason);
    }

    #[test]
    fn test_normalize_drops_every_kind_of_unusable_runs() {
        let table = RawTable {
            rows: vec![
                raw("2024-04-01", "", "2", "L"),
                raw("2024-04-02", "3", "-1", "W"),
                raw("2024-04-03", "2.5", "1", "W"),
                raw("2024-04-04", "NaN", "NaN", ""),
                raw("2024-04-05", "0", "0", ""),
            ],
            ..Default::default()
        };

        let (ds, report) = normalize(table);

        assert_eq!(report.dropped_bad_runs, 4);
        assert_eq!(report.kept(), 1);
        // Only the real 0-0 row reaches the postseason bucket.
        assert_eq!(ds.games[0].date, date(2024, 4, 5));
        assert_eq!(ds.games[0].game_type, GameType::Postseason);
    }

    #[test]
    fn test_normalize_keeps_plate_appearances_and_extras() {
        let mut row = raw("2024-04-01", "5", "2", "W 5-2");
        row.plate_appearances = Some("38".to_string());
        row.extra = vec!["1".to_string(), "D".to_string()];
        let mut blank_pa = raw("2024-04-02", "3", "4", "L 3-4");
        blank_pa.plate_appearances = Some(String::new());
        blank_pa.extra = vec!["2".to_string(), "N".to_string()];

        let table = RawTable {
            has_plate_appearances: true,
            extra_columns: vec!["Gm#".to_string(), "D/N".to_string()],
            rows: vec![row, blank_pa],
        };
        let (ds, _) = normalize(table);

        assert!(ds.has_plate_appearances);
        assert_eq!(ds.extra_columns, vec!["Gm#", "D/N"]);
        assert_eq!(ds.games[0].plate_appearances, Some(38));
        assert_eq!(ds.games[0].extra, vec!["1", "D"]);
        assert_eq!(ds.games[1].plate_appearances, None);
    }
}
