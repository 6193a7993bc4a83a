use std::fs;
use std::path::PathBuf;
use std::process::Command;

use ballgame_filter::config::parse_preset;
use ballgame_filter::data::filter::{apply_as_of, FilterCriteria, PaRange, Season};
use ballgame_filter::data::loader::load_file;
use ballgame_filter::data::model::{GameDataset, GameType};
use chrono::NaiveDate;
use tempfile::TempDir;

const GAMES_CSV: &str = "\
Date,Team,Opp,RS,RA,Result,PA
2023-04-01,SEA,BOS,5,2,W 5-2,38
2023-04-02 (1),SEA,BOS,3,0,W 3-0,33
2023-04-02 (2),SEA,BOS,1,6,L 1-6,35
2023-07-11,AL,NL,3,2,All-Star Game,70
2024-04-10,SEA,HOU,8,7,W 8-7,44
2024-04-11,NYY,HOU,2,9,L 2-9,37
2024-09-28,NYY,BOS,4,3,W 4-3,
10/05/2024,SEA,TEX,0,1,L 0-1,31
";

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn today() -> NaiveDate {
    date(2024, 10, 10)
}

fn fixture() -> (TempDir, PathBuf, GameDataset) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("merged_dataset.csv");
    fs::write(&path, GAMES_CSV).unwrap();
    let (ds, _) = load_file(&path).unwrap();
    (dir, path, ds)
}

#[test]
fn test_regular_season_never_returns_other_types() {
    let (_dir, _, ds) = fixture();
    let result = apply_as_of(&ds, &FilterCriteria::default(), today());

    assert_eq!(result.len(), 5);
    assert!(result
        .games
        .iter()
        .all(|g| g.game_type == GameType::RegularSeason));
}

#[test]
fn test_preset_drives_pipeline() {
    let (_dir, _, ds) = fixture();
    let criteria = parse_preset(
        r#"
        season = "2024"
        team = "SEA"
        home_runs_scored = 5

        [plate_appearances]
        min = 40
        max = 165
        "#,
    )
    .unwrap();

    let result = apply_as_of(&ds, &criteria, today());

    assert_eq!(result.len(), 1);
    assert_eq!(result.games[0].date, date(2024, 4, 10));
    assert_eq!(result.games[0].opponent, "HOU");
}

#[test]
fn test_postseason_bucket_holds_shutouts() {
    let (_dir, _, ds) = fixture();
    let result = apply_as_of(&ds, &FilterCriteria::for_game_type(GameType::Postseason), today());

    let dates: Vec<_> = result.games.iter().map(|g| g.date).collect();
    assert_eq!(dates, vec![date(2023, 4, 2), date(2024, 10, 5)]);
}

#[test]
fn test_pa_filter_drops_blank_pa_and_is_idempotent() {
    let (_dir, _, ds) = fixture();
    let criteria = FilterCriteria {
        plate_appearances: Some(PaRange::default()),
        ..Default::default()
    };

    let once = apply_as_of(&ds, &criteria, today());
    // 2024-09-28 has no PA value.
    assert_eq!(once.len(), 4);

    let refiltered = GameDataset::from_games(once.games.clone(), true, Vec::new());
    assert_eq!(apply_as_of(&refiltered, &criteria, today()), once);
}

#[test]
fn test_last_n_days_and_inverted_range() {
    let (_dir, _, ds) = fixture();
    let recent = FilterCriteria {
        last_n_days: Some(30),
        ..Default::default()
    };
    let result = apply_as_of(&ds, &recent, today());
    assert_eq!(result.len(), 1);
    assert_eq!(result.games[0].team, "NYY");

    let inverted = FilterCriteria {
        start_date: Some(date(2024, 12, 1)),
        end_date: Some(date(2023, 1, 1)),
        ..Default::default()
    };
    assert!(apply_as_of(&ds, &inverted, today()).is_empty());
}

#[test]
fn test_era_selection_does_not_filter() {
    let (_dir, _, ds) = fixture();
    let era: Season = "integration".parse().unwrap();
    let criteria = FilterCriteria {
        season: era,
        ..Default::default()
    };
    assert_eq!(
        apply_as_of(&ds, &criteria, today()),
        apply_as_of(&ds, &FilterCriteria::default(), today())
    );
}

#[test]
fn test_away_runs_scored_uses_runs_allowed_column() {
    let (_dir, _, ds) = fixture();
    let criteria = FilterCriteria {
        opponent: Some("HOU".to_string()),
        away_runs_scored: 9,
        ..Default::default()
    };

    let result = apply_as_of(&ds, &criteria, today());

    assert_eq!(result.len(), 1);
    assert_eq!(result.games[0].team, "NYY");
    assert_eq!(result.games[0].runs_allowed, 9);
}

#[test]
fn test_filter_games_cli_csv_output() {
    let (_dir, path, _) = fixture();

    let output = Command::new(env!("CARGO_BIN_EXE_filter_games"))
        .arg("--data")
        .arg(&path)
        .args(["--team", "SEA", "--season", "2023"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("Showing 2 games"), "{stderr}");

    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<_> = stdout.lines().collect();
    assert_eq!(lines[0], "Date,Team,Opp,RS,RA,Result,Game Type,PA");
    assert_eq!(lines[1], "2023-04-01,SEA,BOS,5,2,W 5-2,Regular Season,38");
    assert_eq!(lines[2], "2023-04-02,SEA,BOS,1,6,L 1-6,Regular Season,35");
    assert_eq!(lines.len(), 3);
}

#[test]
fn test_filter_games_cli_count_only_with_preset() {
    let (dir, path, _) = fixture();
    let preset = dir.path().join("all_star.toml");
    fs::write(&preset, "game_type = \"all-star-game\"\n").unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_filter_games"))
        .arg("--data")
        .arg(&path)
        .arg("--preset")
        .arg(&preset)
        .arg("--count-only")
        .output()
        .unwrap();

    assert!(output.status.success());
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Showing 1 games"));
}

#[test]
fn test_filter_games_cli_missing_file_fails() {
    let output = Command::new(env!("CARGO_BIN_EXE_filter_games"))
        .args(["--data", "/nonexistent/games.csv"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Error"));
}
