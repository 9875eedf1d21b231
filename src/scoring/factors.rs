use std::collections::HashMap;

use crate::fpl::{Fixture, Gameweek};

/// FDR of an average fixture; a single fixture at this rating is neutral
pub const NEUTRAL_FDR: f64 = 3.0;

/// Gameweeks in a Premier League season, the longest useful fixture horizon
pub const SEASON_GAMEWEEKS: u32 = 38;

/// Mean of the last `window` gameweek points, 0.0 without history
pub fn calculate_form(points: &[i32], window: usize) -> f64 {
    if points.is_empty() || window == 0 {
        return 0.0;
    }
    let recent = &points[points.len().saturating_sub(window)..];
    recent.iter().map(|&p| f64::from(p)).sum::<f64>() / recent.len() as f64
}

/// Min-max normalize to 0..=1. A constant series maps to all zeros.
pub fn normalize(values: &[f64]) -> Vec<f64> {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let span = max - min;

    values
        .iter()
        .map(|&v| if span > 0.0 { (v - min) / span } else { 0.0 })
        .collect()
}

/// The gameweek to pick for: the one flagged `is_next`, else the first
/// unfinished one. None once the season is over.
pub fn target_gameweek(events: &[Gameweek]) -> Option<&Gameweek> {
    events
        .iter()
        .find(|gw| gw.is_next)
        .or_else(|| {
            let mut open: Vec<&Gameweek> = events.iter().filter(|gw| !gw.finished).collect();
            open.sort_by_key(|gw| gw.id);
            open.into_iter().next()
        })
}

/// Per-team difficulty ratings of each gameweek's fixtures
#[derive(Debug, Clone, Default)]
pub struct FixtureTable {
    ratings: HashMap<(u32, u32), Vec<u8>>, // (team, gameweek) -> FDR per fixture
}

impl FixtureTable {
    pub fn new(fixtures: &[Fixture]) -> Self {
        let mut ratings: HashMap<(u32, u32), Vec<u8>> = HashMap::new();
        for fixture in fixtures {
            // Unscheduled fixtures have no gameweek yet
            let Some(gameweek) = fixture.event else {
                continue;
            };
            ratings
                .entry((fixture.team_h, gameweek))
                .or_default()
                .push(fixture.team_h_difficulty);
            ratings
                .entry((fixture.team_a, gameweek))
                .or_default()
                .push(fixture.team_a_difficulty);
        }
        Self { ratings }
    }

    /// Difficulty ratings for `team` in `gameweek`; empty for a blank
    pub fn ratings(&self, team: u32, gameweek: u32) -> &[u8] {
        self.ratings
            .get(&(team, gameweek))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Fixture multiplier for `team` over `horizon` gameweeks from `target`.
    ///
    /// Each gameweek contributes the sum of `1 / fdr` over its fixtures, so
    /// doubles add up and blanks count zero. The horizon mean is scaled by
    /// `NEUTRAL_FDR` and damped towards 1.0 by `weight`. A team without any
    /// fixture in the horizon gets 0.0. Without a target gameweek the
    /// multiplier is neutral.
    pub fn multiplier(&self, team: u32, target: Option<u32>, horizon: u32, weight: f64) -> f64 {
        let Some(start) = target else {
            return 1.0;
        };
        let horizon = horizon.clamp(1, SEASON_GAMEWEEKS);

        let mut total = 0.0;
        let mut fixture_count = 0;
        for gameweek in start..start.saturating_add(horizon) {
            for &fdr in self.ratings(team, gameweek) {
                total += 1.0 / f64::from(fdr.max(1));
                fixture_count += 1;
            }
        }

        if fixture_count == 0 {
            return 0.0;
        }

        let raw = NEUTRAL_FDR * total / f64::from(horizon);
        1.0 + weight * (raw - 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture(id: u32, event: Option<u32>, home: u32, away: u32, h_fdr: u8, a_fdr: u8) -> Fixture {
        Fixture {
            id,
            event,
            team_h: home,
            team_a: away,
            team_h_difficulty: h_fdr,
            team_a_difficulty: a_fdr,
            kickoff_time: None,
            finished: false,
        }
    }

    fn gameweek(id: u32, finished: bool, is_next: bool) -> Gameweek {
        Gameweek {
            id,
            name: format!("Gameweek {}", id),
            deadline_time: None,
            finished,
            is_current: false,
            is_next,
        }
    }

    #[test]
    fn test_form_uses_last_window() {
        let points = [2, 4, 6, 8, 10, 1, 3, 5];
        // Last 7: 4+6+8+10+1+3+5 = 37
        assert!((calculate_form(&points, 7) - 37.0 / 7.0).abs() < 1e-9);
    }

    #[test]
    fn test_form_short_history() {
        assert!((calculate_form(&[6, 2], 7) - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_form_empty_history() {
        assert_eq!(calculate_form(&[], 7), 0.0);
    }

    #[test]
    fn test_form_negative_points() {
        assert!((calculate_form(&[-1, 1, -3], 3) + 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_normalize() {
        let normalized = normalize(&[10.0, 20.0, 15.0]);
        assert_eq!(normalized, vec![0.0, 1.0, 0.5]);
    }

    #[test]
    fn test_normalize_constant_series() {
        assert_eq!(normalize(&[4.0, 4.0, 4.0]), vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_normalize_empty() {
        assert!(normalize(&[]).is_empty());
    }

    #[test]
    fn test_target_gameweek_prefers_is_next() {
        let events = vec![gameweek(1, true, false), gameweek(2, false, false), gameweek(3, false, true)];
        assert_eq!(target_gameweek(&events).map(|gw| gw.id), Some(3));
    }

    #[test]
    fn test_target_gameweek_falls_back_to_first_unfinished() {
        let events = vec![gameweek(3, false, false), gameweek(1, true, false), gameweek(2, false, false)];
        assert_eq!(target_gameweek(&events).map(|gw| gw.id), Some(2));
    }

    #[test]
    fn test_target_gameweek_season_over() {
        let events = vec![gameweek(37, true, false), gameweek(38, true, false)];
        assert!(target_gameweek(&events).is_none());
    }

    #[test]
    fn test_home_and_away_difficulty() {
        let table = FixtureTable::new(&[fixture(1, Some(5), 1, 2, 2, 4)]);
        assert_eq!(table.ratings(1, 5), &[2]);
        assert_eq!(table.ratings(2, 5), &[4]);
        assert!(table.ratings(1, 6).is_empty());
    }

    #[test]
    fn test_easier_fixture_scores_higher() {
        let table = FixtureTable::new(&[fixture(1, Some(5), 1, 2, 2, 4)]);
        let home = table.multiplier(1, Some(5), 1, 1.0);
        let away = table.multiplier(2, Some(5), 1, 1.0);
        assert!((home - 1.5).abs() < 1e-9);
        assert!((away - 0.75).abs() < 1e-9);
        assert!(home > away);
    }

    #[test]
    fn test_neutral_fixture() {
        let table = FixtureTable::new(&[fixture(1, Some(5), 1, 2, 3, 3)]);
        assert!((table.multiplier(1, Some(5), 1, 1.0) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_double_gameweek_adds() {
        let table = FixtureTable::new(&[
            fixture(1, Some(5), 1, 2, 3, 3),
            fixture(2, Some(5), 3, 1, 3, 3),
        ]);
        assert!((table.multiplier(1, Some(5), 1, 1.0) - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_blank_gameweek_is_zero() {
        let table = FixtureTable::new(&[fixture(1, Some(5), 1, 2, 3, 3)]);
        assert_eq!(table.multiplier(7, Some(5), 1, 1.0), 0.0);
        // Weight does not rescue a blank
        assert_eq!(table.multiplier(7, Some(5), 1, 0.0), 0.0);
    }

    #[test]
    fn test_horizon_averages_gameweeks() {
        let table = FixtureTable::new(&[
            fixture(1, Some(5), 1, 2, 2, 3),
            fixture(2, Some(6), 2, 1, 3, 4),
        ]);
        // GW5: 1/2, GW6: 1/4 -> mean 0.375 -> x3 = 1.125
        assert!((table.multiplier(1, Some(5), 2, 1.0) - 1.125).abs() < 1e-9);
    }

    #[test]
    fn test_horizon_capped_at_season_length() {
        let table = FixtureTable::new(&[
            fixture(1, Some(5), 1, 2, 2, 3),
            fixture(2, Some(20), 2, 1, 3, 4),
        ]);
        let capped = table.multiplier(1, Some(5), u32::MAX, 1.0);
        assert!(capped.is_finite());
        assert_eq!(capped, table.multiplier(1, Some(5), SEASON_GAMEWEEKS, 1.0));
        // A target near u32::MAX must not wrap around
        assert_eq!(table.multiplier(1, Some(u32::MAX - 1), 5, 1.0), 0.0);
    }

    #[test]
    fn test_fixture_weight_damps() {
        let table = FixtureTable::new(&[fixture(1, Some(5), 1, 2, 2, 4)]);
        assert!((table.multiplier(1, Some(5), 1, 0.5) - 1.25).abs() < 1e-9);
        assert!((table.multiplier(1, Some(5), 1, 0.0) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_no_target_is_neutral() {
        let table = FixtureTable::new(&[]);
        assert_eq!(table.multiplier(1, None, 1, 1.0), 1.0);
    }

    #[test]
    fn test_unscheduled_fixtures_ignored() {
        let table = FixtureTable::new(&[fixture(1, None, 1, 2, 2, 4)]);
        assert_eq!(table.multiplier(1, Some(5), 1, 1.0), 0.0);
    }
}
