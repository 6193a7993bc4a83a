//! filter_games - run the game filter without the desktop UI
//!
//! Usage:
//!   filter_games --data <file> [--preset <preset.toml>] [filter flags] [--format csv|json]
//!
//! Examples:
//!   filter_games --data merged_dataset.csv --team SEA --season 2023
//!   filter_games --data games.parquet --preset playoffs.toml --count-only
//!   filter_games --data merged_dataset.csv --game-type all-star --format json

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use ballgame_filter::config::load_preset;
use ballgame_filter::data::filter::{apply, FilterCriteria, FilteredGames, PaRange, Season};
use ballgame_filter::data::loader::load_file;
use ballgame_filter::data::model::{GameDataset, GameType};
use chrono::NaiveDate;
use clap::{Parser, ValueEnum};

#[derive(Parser)]
#[command(name = "filter_games")]
#[command(about = "Filter baseball game results and print the matching rows")]
#[command(version)]
struct Cli {
    /// Game results file (.csv, .json or .parquet)
    #[arg(short, long)]
    data: PathBuf,

    /// Filter preset (TOML); flags below override its values
    #[arg(short, long)]
    preset: Option<PathBuf>,

    /// Game type to keep
    #[arg(long)]
    game_type: Option<GameTypeArg>,

    /// any, a year (2023) or an era (wild-card, divisional, expansion, integration, live-ball)
    #[arg(long)]
    season: Option<Season>,

    /// Keep games from the last N days
    #[arg(long)]
    last_n_days: Option<u32>,

    /// Start of a custom date range (YYYY-MM-DD); needs --end-date
    #[arg(long, requires = "end_date")]
    start_date: Option<NaiveDate>,

    /// End of a custom date range (YYYY-MM-DD); needs --start-date
    #[arg(long, requires = "start_date")]
    end_date: Option<NaiveDate>,

    /// Minimum plate appearances
    #[arg(long)]
    min_pa: Option<u32>,

    /// Maximum plate appearances
    #[arg(long)]
    max_pa: Option<u32>,

    #[arg(long)]
    team: Option<String>,

    #[arg(long)]
    opponent: Option<String>,

    /// Home runs scored at least
    #[arg(long)]
    home_runs_scored: Option<u32>,

    /// Home runs allowed at least
    #[arg(long)]
    home_runs_allowed: Option<u32>,

    /// Home margin (RS - RA) at least
    #[arg(long)]
    home_margin: Option<u32>,

    /// Away runs scored at least
    #[arg(long)]
    away_runs_scored: Option<u32>,

    /// Away runs allowed at least
    #[arg(long)]
    away_runs_allowed: Option<u32>,

    /// Output format for the matching rows
    #[arg(short, long, default_value = "csv")]
    format: OutputFormat,

    /// Print only the count line
    #[arg(long)]
    count_only: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum GameTypeArg {
    Regular,
    AllStar,
    Postseason,
}

impl From<GameTypeArg> for GameType {
    fn from(arg: GameTypeArg) -> Self {
        match arg {
            GameTypeArg::Regular => GameType::RegularSeason,
            GameTypeArg::AllStar => GameType::AllStarGame,
            GameTypeArg::Postseason => GameType::Postseason,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Header row plus one row per game
    Csv,
    /// Array of game records
    Json,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut criteria = match &cli.preset {
        Some(path) => load_preset(path)?,
        None => FilterCriteria::default(),
    };
    apply_overrides(&mut criteria, &cli);
    log::debug!("criteria: {criteria:?}");

    let (dataset, _report) = load_file(&cli.data)
        .with_context(|| format!("loading {}", cli.data.display()))?;
    let result = apply(&dataset, &criteria);

    eprintln!("{}", result.summary());
    if cli.count_only {
        return Ok(());
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match cli.format {
        OutputFormat::Csv => write_csv(&mut out, &dataset, &result)?,
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut out, &result.games).context("writing JSON")?;
            writeln!(out)?;
        }
    }
    Ok(())
}

/// Command-line flags win over preset values.
fn apply_overrides(criteria: &mut FilterCriteria, cli: &Cli) {
    if let Some(game_type) = cli.game_type {
        criteria.game_type = game_type.into();
    }
    if let Some(season) = cli.season {
        criteria.season = season;
    }
    if cli.last_n_days.is_some() {
        criteria.last_n_days = cli.last_n_days;
    }
    if cli.start_date.is_some() {
        criteria.start_date = cli.start_date;
        criteria.end_date = cli.end_date;
    }
    if cli.min_pa.is_some() || cli.max_pa.is_some() {
        let base = criteria.plate_appearances.unwrap_or_default();
        criteria.plate_appearances = Some(PaRange {
            min: cli.min_pa.unwrap_or(base.min),
            max: cli.max_pa.unwrap_or(base.max),
        });
    }
    if cli.team.is_some() {
        criteria.team = cli.team.clone();
    }
    if cli.opponent.is_some() {
        criteria.opponent = cli.opponent.clone();
    }

    let thresholds = [
        (cli.home_runs_scored, &mut criteria.home_runs_scored),
        (cli.home_runs_allowed, &mut criteria.home_runs_allowed),
        (cli.home_margin, &mut criteria.home_margin),
        (cli.away_runs_scored, &mut criteria.away_runs_scored),
        (cli.away_runs_allowed, &mut criteria.away_runs_allowed),
    ];
    for (flag, field) in thresholds {
        if let Some(value) = flag {
            *field = value;
        }
    }
}

fn write_csv(out: impl Write, dataset: &GameDataset, result: &FilteredGames) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    writer
        .write_record(dataset.column_headers())
        .context("writing CSV header")?;
    for game in &result.games {
        writer
            .write_record(game.cells(dataset.has_plate_appearances))
            .context("writing CSV row")?;
    }
    writer.flush().context("flushing CSV output")?;
    Ok(())
}
