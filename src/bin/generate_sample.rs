//! Writes a deterministic `merged_dataset.csv` for trying out the filter panel.
//!
//! The file mixes both accepted date formats, doubleheader suffixes, a few
//! unparseable dates, All-Star games and shutouts.

use anyhow::{Context, Result};
use chrono::{Datelike, Days, NaiveDate};

const TEAMS: [&str; 6] = ["SEA", "HOU", "TEX", "LAA", "OAK", "NYY"];
const SEASONS: [i32; 3] = [2022, 2023, 2024];
const GAMES_PER_TEAM: u32 = 40;

/// Minimal deterministic PRNG (64-bit LCG, high bits).
struct SimpleRng(u64);

impl SimpleRng {
    fn next_u32(&mut self) -> u32 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (self.0 >> 33) as u32
    }

    fn below(&mut self, n: u32) -> u32 {
        self.next_u32() % n
    }
}

fn main() -> Result<()> {
    let mut rng = SimpleRng(42);

    let output_path = "merged_dataset.csv";
    let mut writer = csv::Writer::from_path(output_path).context("creating output file")?;
    writer.write_record(["Gm#", "Date", "Team", "Opp", "W/L", "RS", "RA", "Result", "PA", "D/N"])?;

    let mut rows = 0usize;
    for &season in &SEASONS {
        let opening_day = NaiveDate::from_ymd_opt(season, 3, 28).context("valid opening day")?;

        for (t, team) in TEAMS.iter().enumerate() {
            for gm in 1..=GAMES_PER_TEAM {
                let opp = TEAMS[(t + 1 + rng.below(TEAMS.len() as u32 - 1) as usize) % TEAMS.len()];
                let date = opening_day + Days::new(u64::from(gm * 4 + rng.below(3)));
                let rs = rng.below(11);
                let mut ra = rng.below(11);
                if ra == rs {
                    ra += 1;
                }
                let wl = if rs > ra { "W" } else { "L" };

                // A couple of doubleheaders, US-style dates and broken dates.
                let date_text = match gm % 17 {
                    3 => format!("{} (1)", date.format("%Y-%m-%d")),
                    4 => format!("{} (2)", date.format("%Y-%m-%d")),
                    9 => date.format("%m/%d/%Y").to_string(),
                    16 => format!("{}, {}", date.format("%A"), date.format("%b %-d")),
                    _ => date.format("%Y-%m-%d").to_string(),
                };

                writer.write_record([
                    gm.to_string(),
                    date_text,
                    team.to_string(),
                    opp.to_string(),
                    wl.to_string(),
                    rs.to_string(),
                    ra.to_string(),
                    format!("{wl} {rs}-{ra}"),
                    (30 + rng.below(20)).to_string(),
                    if rng.below(3) == 0 { "D" } else { "N" }.to_string(),
                ])?;
                rows += 1;
            }
        }

        // Midsummer classic.
        let all_star = NaiveDate::from_ymd_opt(season, 7, 16).context("valid All-Star date")?;
        let (al, nl) = (rng.below(8) + 1, rng.below(8) + 1);
        writer.write_record([
            "1".to_string(),
            all_star.format("%Y-%m-%d").to_string(),
            "AL".to_string(),
            "NL".to_string(),
            if al > nl { "W" } else { "L" }.to_string(),
            al.to_string(),
            nl.to_string(),
            format!("All-Star Game {} {al}-{nl}", all_star.year()),
            (60 + rng.below(20)).to_string(),
            "N".to_string(),
        ])?;
        rows += 1;
    }

    writer.flush().context("flushing output")?;
    println!("Wrote {rows} games to {output_path}");
    Ok(())
}
