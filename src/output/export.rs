use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use serde::Serialize;
use std::path::Path;

use crate::optimize::{Formation, Squad};
use crate::scoring::ScoredPlayer;

/// JSON shape of a picked squad
#[derive(Debug, Serialize)]
pub struct SquadReport<'a> {
    pub formation: String,
    pub lineup: &'a Formation,
    pub captain_id: u32,
    pub vice_captain_id: u32,
    /// Cost units (tenths of a million)
    pub total_cost: u32,
    pub bank: u32,
    pub budget: u32,
    /// Starting lineup total with the captain counted twice
    pub predicted_points: f64,
    pub starting: &'a [ScoredPlayer],
    pub bench: &'a [ScoredPlayer],
}

impl<'a> From<&'a Squad> for SquadReport<'a> {
    fn from(squad: &'a Squad) -> Self {
        Self {
            formation: squad.formation.to_string(),
            lineup: &squad.formation,
            captain_id: squad.captain_id,
            vice_captain_id: squad.vice_captain_id,
            total_cost: squad.total_cost(),
            bank: squad.bank(),
            budget: squad.budget,
            predicted_points: squad.predicted_points(),
            starting: &squad.starting,
            bench: &squad.bench,
        }
    }
}

pub fn format_squad_json(squad: &Squad) -> Result<String> {
    serde_json::to_string_pretty(&SquadReport::from(squad)).context("Failed to serialize squad")
}

pub fn format_players_json(players: &[ScoredPlayer]) -> Result<String> {
    serde_json::to_string_pretty(players).context("Failed to serialize players")
}

/// Write the squad as JSON atomically
///
/// The file is either fully written or left untouched.
pub fn write_squad_json(path: &Path, squad: &Squad) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;

    serde_json::to_writer_pretty(&mut file, &SquadReport::from(squad))
        .context("Failed to serialize squad")?;

    file.commit()
        .with_context(|| format!("Failed to save squad to {}", path.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fpl::{Player, Position};
    use crate::scoring::{ScoreBreakdown, ScoreResult};
    use std::env;

    fn scored(id: u32, position: Position, cost: u32, predicted: f64) -> ScoredPlayer {
        ScoredPlayer {
            player: Player {
                id,
                web_name: format!("P{}", id),
                team: "Liverpool".to_string(),
                team_short: "LIV".to_string(),
                team_id: 12,
                position,
                cost,
                total_points: 80,
                minutes: 1500,
                goals_scored: 3,
                assists: 2,
                clean_sheets: 0,
                saves: 0,
                bonus: 4,
                status: "a".to_string(),
                chance_of_playing: None,
                recent_points: vec![2, 6, 8],
            },
            form: 5.33,
            fixture_multiplier: 1.5,
            score: ScoreResult {
                predicted,
                breakdown: ScoreBreakdown { factors: vec![] },
            },
        }
    }

    fn sample_squad() -> Squad {
        Squad {
            formation: Formation {
                defenders: 0,
                midfielders: 1,
                forwards: 1,
            },
            starting: vec![
                scored(1, Position::Midfielder, 130, 8.0),
                scored(2, Position::Forward, 90, 6.0),
            ],
            bench: vec![scored(3, Position::Goalkeeper, 40, 1.0)],
            captain_id: 1,
            vice_captain_id: 2,
            budget: 300,
        }
    }

    #[test]
    fn test_format_squad_json_fields() {
        let json = format_squad_json(&sample_squad()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["formation"], "0-1-1");
        assert_eq!(value["captain_id"], 1);
        assert_eq!(value["total_cost"], 260);
        assert_eq!(value["bank"], 40);
        assert_eq!(value["predicted_points"], 22.0);
        // Player fields are flattened next to the score
        assert_eq!(value["starting"][0]["web_name"], "P1");
        assert_eq!(value["starting"][0]["position"], "MID");
        assert_eq!(value["starting"][0]["score"]["predicted"], 8.0);
        assert_eq!(value["bench"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_format_players_json() {
        let players = vec![scored(1, Position::Midfielder, 130, 8.0)];
        let json = format_players_json(&players).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["team_short"], "LIV");
        assert_eq!(value[0]["fixture_multiplier"], 1.5);
    }

    #[test]
    fn test_write_squad_json() {
        let dir = env::temp_dir().join("fpl_picker_test_export");
        let path = dir.join("squad.json");
        let _ = std::fs::remove_dir_all(&dir);

        write_squad_json(&path, &sample_squad()).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(value["vice_captain_id"], 2);

        let _ = std::fs::remove_dir_all(&dir);
    }
}
