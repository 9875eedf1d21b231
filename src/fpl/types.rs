use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use super::models::RawElement;

/// Playing position, from FPL's `element_type` (1..=4)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Position {
    #[serde(rename = "GK")]
    Goalkeeper,
    #[serde(rename = "DEF")]
    Defender,
    #[serde(rename = "MID")]
    Midfielder,
    #[serde(rename = "FWD")]
    Forward,
}

impl Position {
    /// All positions in squad display order
    pub const ALL: [Position; 4] = [
        Position::Goalkeeper,
        Position::Defender,
        Position::Midfielder,
        Position::Forward,
    ];

    pub fn from_element_type(element_type: u8) -> Option<Self> {
        match element_type {
            1 => Some(Position::Goalkeeper),
            2 => Some(Position::Defender),
            3 => Some(Position::Midfielder),
            4 => Some(Position::Forward),
            _ => None,
        }
    }

    pub fn short_name(&self) -> &'static str {
        match self {
            Position::Goalkeeper => "GK",
            Position::Defender => "DEF",
            Position::Midfielder => "MID",
            Position::Forward => "FWD",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.short_name())
    }
}

impl FromStr for Position {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "GK" | "GKP" | "GOALKEEPER" => Ok(Position::Goalkeeper),
            "DEF" | "DEFENDER" => Ok(Position::Defender),
            "MID" | "MIDFIELDER" => Ok(Position::Midfielder),
            "FWD" | "FORWARD" => Ok(Position::Forward),
            other => Err(format!(
                "unknown position '{}' (expected GK, DEF, MID or FWD)",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub short_name: String,
}

/// A gameweek ("event" in the FPL API)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gameweek {
    pub id: u32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub deadline_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub finished: bool,
    #[serde(default)]
    pub is_current: bool,
    #[serde(default)]
    pub is_next: bool,
}

/// A scheduled or played match. `team_h_difficulty` is the difficulty the
/// home side faces, `team_a_difficulty` the away side's.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fixture {
    pub id: u32,
    #[serde(default)]
    pub event: Option<u32>,
    pub team_h: u32,
    pub team_a: u32,
    pub team_h_difficulty: u8,
    pub team_a_difficulty: u8,
    #[serde(default)]
    pub kickoff_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub finished: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Player {
    pub id: u32,
    pub web_name: String,
    pub team: String,
    pub team_short: String,
    pub team_id: u32,
    pub position: Position,
    pub cost: u32, // tenths of a million, as FPL's now_cost
    pub total_points: i32,
    pub minutes: u32,
    pub goals_scored: u32,
    pub assists: u32,
    pub clean_sheets: u32,
    pub saves: u32,
    pub bonus: u32,
    pub status: String, // "a" available, "d" doubtful, "i" injured, ...
    pub chance_of_playing: Option<u8>,
    pub recent_points: Vec<i32>, // per-gameweek points, oldest first
}

impl Player {
    /// Build a player from the bootstrap element, resolving its team.
    /// Returns an error message for unknown positions or teams.
    pub fn from_raw(raw: RawElement, teams: &HashMap<u32, Team>) -> Result<Self, String> {
        let position = Position::from_element_type(raw.element_type).ok_or_else(|| {
            format!(
                "player {} ({}) has unknown element_type {}",
                raw.id, raw.web_name, raw.element_type
            )
        })?;
        let team = teams.get(&raw.team).ok_or_else(|| {
            format!(
                "player {} ({}) references unknown team {}",
                raw.id, raw.web_name, raw.team
            )
        })?;

        Ok(Player {
            id: raw.id,
            web_name: raw.web_name,
            team: team.name.clone(),
            team_short: team.short_name.clone(),
            team_id: team.id,
            position,
            cost: raw.now_cost,
            total_points: raw.total_points,
            minutes: raw.minutes,
            goals_scored: raw.goals_scored,
            assists: raw.assists,
            clean_sheets: raw.clean_sheets,
            saves: raw.saves,
            bonus: raw.bonus,
            status: raw.status,
            chance_of_playing: raw.chance_of_playing_next_round,
            recent_points: Vec::new(),
        })
    }

    /// Price in millions
    pub fn price(&self) -> f64 {
        f64::from(self.cost) / 10.0
    }

    /// Season points per 90 minutes played, 0 for players without minutes
    pub fn points_per_90(&self) -> f64 {
        if self.minutes == 0 {
            0.0
        } else {
            f64::from(self.total_points) / (f64::from(self.minutes) / 90.0)
        }
    }

    pub fn is_available(&self) -> bool {
        self.status == "a" && self.chance_of_playing != Some(0)
    }
}
