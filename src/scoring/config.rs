use serde::{Deserialize, Serialize};

/// Main scoring configuration.
///
/// The prediction blends min-max normalized form and season points, then
/// scales the blend by how kind the upcoming fixtures are.
///
/// Example YAML:
/// ```yaml
/// scoring:
///   form_weight: 0.28
///   total_points_weight: 0.72
///   form_window: 7
///   fixture_horizon: 1
///   fixture_weight: 1.0
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ScoringConfig {
    /// Weight of normalized form in the blend
    pub form_weight: f64,

    /// Weight of normalized season total points in the blend
    pub total_points_weight: f64,

    /// Number of most recent gameweeks averaged into form
    pub form_window: usize,

    /// Number of gameweeks, starting at the next one, whose fixtures count
    pub fixture_horizon: u32,

    /// 0.0 ignores fixtures entirely, 1.0 applies the full FDR multiplier
    pub fixture_weight: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            form_weight: 0.28,
            total_points_weight: 0.72,
            form_window: 7,
            fixture_horizon: 1,
            fixture_weight: 1.0,
        }
    }
}

/// Which players may enter the pool at all.
///
/// Example YAML:
/// ```yaml
/// filters:
///   min_minutes: 450
///   skip_unavailable: true
///   exclude: ["Haaland", "*son"]
///   include: ["Palmer"]
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FilterConfig {
    /// Minimum season minutes (450 = five full matches)
    pub min_minutes: u32,

    /// Drop injured, suspended and otherwise unavailable players
    pub skip_unavailable: bool,

    /// Glob patterns on player web names, matched case-insensitively
    pub exclude: Vec<String>,

    /// Web names that must be in the squad. They bypass the minutes and
    /// availability filters but not `exclude`.
    pub include: Vec<String>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            min_minutes: 450,
            skip_unavailable: true,
            exclude: Vec::new(),
            include: Vec::new(),
        }
    }
}
