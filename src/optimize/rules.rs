use serde::{Deserialize, Serialize};

use crate::fpl::Position;

/// Squad composition rules. Defaults are the official FPL ones.
///
/// Example YAML:
/// ```yaml
/// squad:
///   budget: 100.0
///   max_per_team: 3
///   quotas: { goalkeepers: 2, defenders: 5, midfielders: 5, forwards: 3 }
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct SquadRules {
    /// Budget in millions
    pub budget: f64,

    /// Maximum players from a single club
    pub max_per_team: u32,

    /// Exact number of players per position in the squad
    pub quotas: PositionQuotas,

    /// Starting XI formation limits
    pub lineup: LineupRules,
}

impl Default for SquadRules {
    fn default() -> Self {
        Self {
            budget: 100.0,
            max_per_team: 3,
            quotas: PositionQuotas::default(),
            lineup: LineupRules::default(),
        }
    }
}

impl SquadRules {
    /// Budget in FPL cost units (tenths of a million)
    pub fn budget_units(&self) -> u32 {
        (self.budget * 10.0).round().max(0.0) as u32
    }

    /// Collect every rule violation
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if !self.budget.is_finite() || self.budget <= 0.0 {
            errors.push("squad.budget: must be positive".to_string());
        }
        if self.max_per_team == 0 {
            errors.push("squad.max_per_team: must be at least 1".to_string());
        }
        if self.quotas.total() == 0 {
            errors.push("squad.quotas: squad cannot be empty".to_string());
        }

        let lineup = &self.lineup;
        if lineup.size > self.quotas.total() {
            errors.push(format!(
                "squad.lineup.size: {} exceeds squad size {}",
                lineup.size,
                self.quotas.total()
            ));
        }
        if lineup.size < 2 {
            errors.push("squad.lineup.size: need at least 2 starters for captain and vice".to_string());
        }
        if lineup.goalkeepers > self.quotas.goalkeepers {
            errors.push(format!(
                "squad.lineup.goalkeepers: {} exceeds goalkeeper quota {}",
                lineup.goalkeepers, self.quotas.goalkeepers
            ));
        }

        for (name, range, quota) in [
            ("defenders", lineup.defenders, self.quotas.defenders),
            ("midfielders", lineup.midfielders, self.quotas.midfielders),
            ("forwards", lineup.forwards, self.quotas.forwards),
        ] {
            if range.min > range.max {
                errors.push(format!(
                    "squad.lineup.{}: min {} is above max {}",
                    name, range.min, range.max
                ));
            }
            if range.min > quota {
                errors.push(format!(
                    "squad.lineup.{}: min {} exceeds squad quota {}",
                    name, range.min, quota
                ));
            }
        }

        let min_total = lineup.goalkeepers
            + lineup.defenders.min
            + lineup.midfielders.min
            + lineup.forwards.min;
        let max_total = lineup.goalkeepers
            + lineup.defenders.max.min(self.quotas.defenders)
            + lineup.midfielders.max.min(self.quotas.midfielders)
            + lineup.forwards.max.min(self.quotas.forwards);
        if lineup.size < min_total || lineup.size > max_total {
            errors.push(format!(
                "squad.lineup: no formation of {} players fits the position limits ({}..={})",
                lineup.size, min_total, max_total
            ));
        }

        errors
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct PositionQuotas {
    pub goalkeepers: u32,
    pub defenders: u32,
    pub midfielders: u32,
    pub forwards: u32,
}

impl Default for PositionQuotas {
    fn default() -> Self {
        Self {
            goalkeepers: 2,
            defenders: 5,
            midfielders: 5,
            forwards: 3,
        }
    }
}

impl PositionQuotas {
    pub fn get(&self, position: Position) -> u32 {
        match position {
            Position::Goalkeeper => self.goalkeepers,
            Position::Defender => self.defenders,
            Position::Midfielder => self.midfielders,
            Position::Forward => self.forwards,
        }
    }

    pub fn total(&self) -> u32 {
        self.goalkeepers + self.defenders + self.midfielders + self.forwards
    }
}

/// Inclusive count range
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct CountRange {
    pub min: u32,
    pub max: u32,
}

impl CountRange {
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct LineupRules {
    /// Number of starters
    pub size: u32,
    /// Starting goalkeepers (exact)
    pub goalkeepers: u32,
    pub defenders: CountRange,
    pub midfielders: CountRange,
    pub forwards: CountRange,
}

impl Default for LineupRules {
    fn default() -> Self {
        Self {
            size: 11,
            goalkeepers: 1,
            defenders: CountRange::new(3, 5),
            midfielders: CountRange::new(2, 5),
            forwards: CountRange::new(1, 3),
        }
    }
}
