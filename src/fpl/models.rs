//! Wire shapes of the FPL endpoints we read. Only the fields we use are
//! declared; everything else in the payload is ignored.

use serde::Deserialize;

use super::types::{Gameweek, Team};

/// `GET bootstrap-static/`
#[derive(Debug, Clone, Deserialize)]
pub struct BootstrapStatic {
    pub elements: Vec<RawElement>,
    pub teams: Vec<Team>,
    #[serde(default)]
    pub events: Vec<Gameweek>,
}

/// A player entry in `bootstrap-static/`
#[derive(Debug, Clone, Deserialize)]
pub struct RawElement {
    pub id: u32,
    pub web_name: String,
    pub team: u32,
    pub element_type: u8,
    #[serde(default)]
    pub now_cost: u32,
    #[serde(default)]
    pub total_points: i32,
    #[serde(default)]
    pub minutes: u32,
    #[serde(default)]
    pub goals_scored: u32,
    #[serde(default)]
    pub assists: u32,
    #[serde(default)]
    pub clean_sheets: u32,
    #[serde(default)]
    pub saves: u32,
    #[serde(default)]
    pub bonus: u32,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub chance_of_playing_next_round: Option<u8>,
}

/// `GET element-summary/{id}/`
#[derive(Debug, Clone, Deserialize)]
pub struct ElementSummary {
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
}

/// One played gameweek in a player's season history
#[derive(Debug, Clone, Deserialize)]
pub struct HistoryEntry {
    pub round: u32,
    pub total_points: i32,
    #[serde(default)]
    pub minutes: u32,
}

impl ElementSummary {
    /// Gameweek points ordered oldest first
    pub fn points_by_round(&self) -> Vec<i32> {
        let mut entries: Vec<&HistoryEntry> = self.history.iter().collect();
        entries.sort_by_key(|e| e.round);
        entries.iter().map(|e| e.total_points).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bootstrap_parse_ignores_unknown_fields() {
        let json = r#"{
            "elements": [{
                "id": 1, "web_name": "Raya", "team": 1, "element_type": 1,
                "now_cost": 55, "total_points": 120, "minutes": 3060,
                "goals_scored": 0, "assists": 0, "clean_sheets": 16,
                "saves": 80, "bonus": 9, "status": "a",
                "chance_of_playing_next_round": null,
                "form": "4.2", "selected_by_percent": "20.1"
            }],
            "teams": [{"id": 1, "name": "Arsenal", "short_name": "ARS", "strength": 5}],
            "events": [{"id": 1, "name": "Gameweek 1", "finished": true,
                        "is_current": false, "is_next": false,
                        "deadline_time": "2024-08-16T17:30:00Z"}],
            "element_types": []
        }"#;
        let bootstrap: BootstrapStatic = serde_json::from_str(json).unwrap();
        assert_eq!(bootstrap.elements.len(), 1);
        assert_eq!(bootstrap.elements[0].now_cost, 55);
        assert_eq!(bootstrap.elements[0].chance_of_playing_next_round, None);
        assert_eq!(bootstrap.teams[0].short_name, "ARS");
        assert!(bootstrap.events[0].finished);
    }

    #[test]
    fn test_points_by_round_sorts() {
        let json = r#"{"history": [
            {"round": 3, "total_points": 8, "minutes": 90},
            {"round": 1, "total_points": 2, "minutes": 90},
            {"round": 2, "total_points": 5, "minutes": 60}
        ], "fixtures": []}"#;
        let summary: ElementSummary = serde_json::from_str(json).unwrap();
        assert_eq!(summary.points_by_round(), vec![2, 5, 8]);
    }

    #[test]
    fn test_element_summary_without_history() {
        let summary: ElementSummary = serde_json::from_str("{}").unwrap();
        assert!(summary.points_by_round().is_empty());
    }
}
