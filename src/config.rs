//! Filter presets: a [`FilterCriteria`] saved as TOML.
//!
//! Every field is optional in the file; missing fields take the same
//! defaults as a freshly opened control panel.
//!
//! ```toml
//! game_type = "regular-season"
//! season = "2023"
//! team = "SEA"
//! home_margin = 3
//!
//! [plate_appearances]
//! min = 30
//! max = 45
//! ```

use std::path::Path;

use anyhow::{Context, Result};

use crate::data::filter::FilterCriteria;

/// Parse a preset from TOML text.
pub fn parse_preset(text: &str) -> Result<FilterCriteria> {
    toml::from_str(text).context("parsing filter preset")
}

/// Read a preset file.
pub fn load_preset(path: &Path) -> Result<FilterCriteria> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading preset {}", path.display()))?;
    let criteria = parse_preset(&text)?;
    log::info!("Loaded filter preset from {}", path.display());
    Ok(criteria)
}

/// Write the criteria to a preset file, replacing it if present.
pub fn save_preset(path: &Path, criteria: &FilterCriteria) -> Result<()> {
    let text = toml::to_string_pretty(criteria).context("serializing filter preset")?;
    std::fs::write(path, text).with_context(|| format!("writing preset {}", path.display()))?;
    log::info!("Saved filter preset to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::data::filter::{Era, PaRange, Season};
    use crate::data::model::GameType;

    #[test]
    fn test_empty_preset_is_default() {
        assert_eq!(parse_preset("").unwrap(), FilterCriteria::default());
    }

    #[test]
    fn test_partial_preset() {
        let criteria = parse_preset(
            r#"
            game_type = "postseason"
            season = "wild-card"
            start_date = "2023-04-01"
            end_date = "2023-10-31"
            opponent = "HOU"
            away_runs_scored = 4

            [plate_appearances]
            min = 30
            max = 45
            "#,
        )
        .unwrap();

        assert_eq!(criteria.game_type, GameType::Postseason);
        assert_eq!(criteria.season, Season::Era(Era::WildCard));
        assert_eq!(criteria.start_date, NaiveDate::from_ymd_opt(2023, 4, 1));
        assert_eq!(criteria.end_date, NaiveDate::from_ymd_opt(2023, 10, 31));
        assert_eq!(criteria.opponent.as_deref(), Some("HOU"));
        assert_eq!(criteria.away_runs_scored, 4);
        assert_eq!(criteria.plate_appearances, Some(PaRange { min: 30, max: 45 }));
        assert_eq!(criteria.team, None);
        assert_eq!(criteria.home_margin, 0);
    }

    #[test]
    fn test_unknown_season_is_rejected() {
        let err = parse_preset(r#"season = "dead-ball""#).unwrap_err();
        assert!(format!("{err:#}").contains("unknown season"));
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preset.toml");
        let criteria = FilterCriteria {
            game_type: GameType::AllStarGame,
            season: Season::Year(2019),
            last_n_days: Some(30),
            team: Some("AL".to_string()),
            home_runs_scored: 2,
            ..Default::default()
        };

        save_preset(&path, &criteria).unwrap();
        let loaded = load_preset(&path).unwrap();

        assert_eq!(loaded, criteria);
    }

    #[test]
    fn test_missing_preset_file() {
        let err = load_preset(Path::new("/nonexistent/preset.toml")).unwrap_err();
        assert!(format!("{err:#}").contains("reading preset"));
    }
}
