use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

use super::error::SelectionError;
use super::rules::LineupRules;
use crate::fpl::Position;
use crate::scoring::{compare_scored, ScoredPlayer};

/// Outfield shape of a starting lineup, e.g. 3-4-3
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Formation {
    pub defenders: u32,
    pub midfielders: u32,
    pub forwards: u32,
}

impl Formation {
    fn count(&self, position: Position, goalkeepers: u32) -> u32 {
        match position {
            Position::Goalkeeper => goalkeepers,
            Position::Defender => self.defenders,
            Position::Midfielder => self.midfielders,
            Position::Forward => self.forwards,
        }
    }
}

impl fmt::Display for Formation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.defenders, self.midfielders, self.forwards)
    }
}

/// Legal formations in a fixed order (fewest defenders first, then fewest
/// midfielders). Earlier formations win ties.
pub fn legal_formations(rules: &LineupRules) -> Vec<Formation> {
    let mut formations = Vec::new();
    for defenders in rules.defenders.min..=rules.defenders.max {
        for midfielders in rules.midfielders.min..=rules.midfielders.max {
            for forwards in rules.forwards.min..=rules.forwards.max {
                if rules.goalkeepers + defenders + midfielders + forwards == rules.size {
                    formations.push(Formation {
                        defenders,
                        midfielders,
                        forwards,
                    });
                }
            }
        }
    }
    formations
}

#[derive(Debug, Clone)]
pub struct Lineup {
    pub formation: Formation,
    pub starting: Vec<ScoredPlayer>,
    pub bench: Vec<ScoredPlayer>,
}

/// Pick the starting lineup with the highest total predicted points.
///
/// Within a position the best-ranked players start. The bench lists spare
/// goalkeepers first, then outfield players best first.
pub fn pick_starting_xi(
    squad: Vec<ScoredPlayer>,
    rules: &LineupRules,
) -> Result<Lineup, SelectionError> {
    let mut by_position: HashMap<Position, Vec<ScoredPlayer>> = HashMap::new();
    for scored in squad {
        by_position
            .entry(scored.player.position)
            .or_default()
            .push(scored);
    }
    for players in by_position.values_mut() {
        players.sort_by(compare_scored);
    }

    let available = |position: Position| by_position.get(&position).map_or(0, Vec::len);
    let top_sum = |position: Position, n: u32| -> f64 {
        by_position
            .get(&position)
            .map(|players| players.iter().take(n as usize).map(|p| p.predicted()).sum())
            .unwrap_or(0.0)
    };

    let mut best: Option<(f64, Formation)> = None;
    for formation in legal_formations(rules) {
        let fits = Position::ALL
            .iter()
            .all(|&pos| available(pos) >= formation.count(pos, rules.goalkeepers) as usize);
        if !fits {
            continue;
        }
        let total: f64 = Position::ALL
            .iter()
            .map(|&pos| top_sum(pos, formation.count(pos, rules.goalkeepers)))
            .sum();
        if best.map_or(true, |(best_total, _)| total > best_total + 1e-9) {
            best = Some((total, formation));
        }
    }

    let (_, formation) = best.ok_or(SelectionError::NoLegalLineup)?;

    let mut starting = Vec::new();
    let mut bench_keepers = Vec::new();
    let mut bench_outfield = Vec::new();
    for position in Position::ALL {
        let players = by_position.remove(&position).unwrap_or_default();
        let starters = formation.count(position, rules.goalkeepers) as usize;
        for (i, scored) in players.into_iter().enumerate() {
            if i < starters {
                starting.push(scored);
            } else if position == Position::Goalkeeper {
                bench_keepers.push(scored);
            } else {
                bench_outfield.push(scored);
            }
        }
    }
    bench_outfield.sort_by(compare_scored);
    bench_keepers.extend(bench_outfield);

    Ok(Lineup {
        formation,
        starting,
        bench: bench_keepers,
    })
}

/// Captain and vice-captain ids: the two best-ranked starters
pub fn select_captain(starting: &[ScoredPlayer]) -> Option<(u32, u32)> {
    let mut ranked: Vec<&ScoredPlayer> = starting.iter().collect();
    ranked.sort_by(|a, b| compare_scored(a, b));
    match ranked.as_slice() {
        [captain, vice, ..] => Some((captain.player.id, vice.player.id)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fpl::Player;
    use crate::optimize::rules::CountRange;
    use crate::scoring::{ScoreBreakdown, ScoreResult};

    fn scored(id: u32, position: Position, cost: u32, predicted: f64) -> ScoredPlayer {
        ScoredPlayer {
            player: Player {
                id,
                web_name: format!("P{}", id),
                team: "Team".to_string(),
                team_short: "TEA".to_string(),
                team_id: id,
                position,
                cost,
                total_points: 0,
                minutes: 900,
                goals_scored: 0,
                assists: 0,
                clean_sheets: 0,
                saves: 0,
                bonus: 0,
                status: "a".to_string(),
                chance_of_playing: None,
                recent_points: vec![],
            },
            form: 0.0,
            fixture_multiplier: 1.0,
            score: ScoreResult {
                predicted,
                breakdown: ScoreBreakdown { factors: vec![] },
            },
        }
    }

    /// 2 GK, 5 DEF, 5 MID, 3 FWD with forwards far ahead
    fn forward_heavy_squad() -> Vec<ScoredPlayer> {
        vec![
            scored(1, Position::Goalkeeper, 50, 4.0),
            scored(2, Position::Goalkeeper, 40, 2.0),
            scored(3, Position::Defender, 50, 3.0),
            scored(4, Position::Defender, 50, 2.9),
            scored(5, Position::Defender, 50, 2.8),
            scored(6, Position::Defender, 50, 1.0),
            scored(7, Position::Defender, 50, 0.5),
            scored(8, Position::Midfielder, 80, 5.0),
            scored(9, Position::Midfielder, 80, 4.8),
            scored(10, Position::Midfielder, 80, 4.6),
            scored(11, Position::Midfielder, 80, 4.4),
            scored(12, Position::Midfielder, 80, 1.2),
            scored(13, Position::Forward, 100, 9.0),
            scored(14, Position::Forward, 100, 8.0),
            scored(15, Position::Forward, 100, 7.0),
        ]
    }

    fn ids(players: &[ScoredPlayer]) -> Vec<u32> {
        players.iter().map(|p| p.player.id).collect()
    }

    #[test]
    fn test_legal_formations_default() {
        let formations = legal_formations(&LineupRules::default());
        let names: Vec<String> = formations.iter().map(|f| f.to_string()).collect();
        assert_eq!(
            names,
            vec!["3-4-3", "3-5-2", "4-3-3", "4-4-2", "4-5-1", "5-2-3", "5-3-2", "5-4-1"]
        );
    }

    #[test]
    fn test_picks_three_forwards_when_they_dominate() {
        let lineup = pick_starting_xi(forward_heavy_squad(), &LineupRules::default()).unwrap();
        assert_eq!(lineup.formation.to_string(), "3-4-3");
        assert_eq!(lineup.starting.len(), 11);
        assert_eq!(ids(&lineup.starting), vec![1, 3, 4, 5, 8, 9, 10, 11, 13, 14, 15]);
    }

    #[test]
    fn test_bench_order() {
        let lineup = pick_starting_xi(forward_heavy_squad(), &LineupRules::default()).unwrap();
        // Spare keeper first, then outfield best first
        assert_eq!(ids(&lineup.bench), vec![2, 12, 6, 7]);
    }

    #[test]
    fn test_respects_minimum_defenders() {
        let mut squad = forward_heavy_squad();
        // Make every defender worthless: still need three
        for p in squad.iter_mut().filter(|p| p.player.position == Position::Defender) {
            p.score.predicted = 0.0;
        }
        let lineup = pick_starting_xi(squad, &LineupRules::default()).unwrap();
        assert_eq!(lineup.formation.defenders, 3);
    }

    #[test]
    fn test_tie_prefers_earlier_formation() {
        let squad: Vec<ScoredPlayer> = forward_heavy_squad()
            .into_iter()
            .map(|mut p| {
                p.score.predicted = 1.0;
                p
            })
            .collect();
        let lineup = pick_starting_xi(squad, &LineupRules::default()).unwrap();
        assert_eq!(lineup.formation.to_string(), "3-4-3");
    }

    #[test]
    fn test_no_legal_lineup() {
        let squad: Vec<ScoredPlayer> = forward_heavy_squad()
            .into_iter()
            .filter(|p| p.player.position != Position::Defender || p.player.id == 3)
            .collect();
        let err = pick_starting_xi(squad, &LineupRules::default()).unwrap_err();
        assert_eq!(err, SelectionError::NoLegalLineup);
    }

    #[test]
    fn test_custom_lineup_rules() {
        let rules = LineupRules {
            size: 5,
            goalkeepers: 1,
            defenders: CountRange::new(1, 2),
            midfielders: CountRange::new(1, 2),
            forwards: CountRange::new(1, 2),
        };
        let lineup = pick_starting_xi(forward_heavy_squad(), &rules).unwrap();
        assert_eq!(lineup.formation.to_string(), "1-1-2");
        assert_eq!(lineup.starting.len(), 5);
        assert_eq!(lineup.bench.len(), 10);
    }

    #[test]
    fn test_select_captain() {
        let lineup = pick_starting_xi(forward_heavy_squad(), &LineupRules::default()).unwrap();
        assert_eq!(select_captain(&lineup.starting), Some((13, 14)));
    }

    #[test]
    fn test_captain_tie_prefers_cheaper() {
        let starting = vec![
            scored(1, Position::Forward, 120, 8.0),
            scored(2, Position::Forward, 90, 8.0),
            scored(3, Position::Midfielder, 90, 7.0),
        ];
        assert_eq!(select_captain(&starting), Some((2, 1)));
    }

    #[test]
    fn test_captain_needs_two_starters() {
        let starting = vec![scored(1, Position::Forward, 120, 8.0)];
        assert_eq!(select_captain(&starting), None);
    }
}
