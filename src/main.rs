mod app;
mod ui;

use std::path::PathBuf;

use app::BallgameApp;
use clap::Parser;
use eframe::egui;

/// Dataset opened at startup when `--data` is not given.
const DEFAULT_DATASET: &str = "merged_dataset.csv";

#[derive(Parser)]
#[command(name = "ballgame-filter")]
#[command(about = "Filter and browse baseball game results")]
#[command(version)]
struct Args {
    /// Game results to open at startup (.csv, .json or .parquet)
    #[arg(short, long)]
    data: Option<PathBuf>,

    /// Filter preset (TOML) to load into the controls
    #[arg(short, long)]
    preset: Option<PathBuf>,
}

fn main() -> eframe::Result {
    env_logger::init();
    let args = Args::parse();

    let data = args.data.or_else(|| {
        let fallback = PathBuf::from(DEFAULT_DATASET);
        fallback.exists().then_some(fallback)
    });
    let app = BallgameApp::new(data.as_deref(), args.preset.as_deref());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Ballgame Filter",
        options,
        Box::new(|_cc| Ok(Box::new(app))),
    )
}
