use serde::Serialize;
use std::cmp::Ordering;

use super::config::ScoringConfig;
use super::factors::{calculate_form, normalize, FixtureTable};
use crate::fpl::Player;

/// Blend values (0..=1) are scaled by this to read like match points
pub const POINTS_SCALE: f64 = 10.0;

#[derive(Debug, Clone, Serialize)]
pub struct FactorContribution {
    pub label: String,       // e.g. "Form", "Season points", "Fixtures"
    pub description: String, // e.g. "avg 6.3 over last 7 (norm 0.71) x0.28"
    pub before: f64,         // Score before this factor
    pub after: f64,          // Score after this factor
}

#[derive(Debug, Clone, Serialize)]
pub struct ScoreBreakdown {
    pub factors: Vec<FactorContribution>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScoreResult {
    pub predicted: f64,
    pub breakdown: ScoreBreakdown,
}

/// A player with the inputs and output of its prediction
#[derive(Debug, Clone, Serialize)]
pub struct ScoredPlayer {
    #[serde(flatten)]
    pub player: Player,
    pub form: f64,
    pub fixture_multiplier: f64,
    pub score: ScoreResult,
}

impl ScoredPlayer {
    pub fn predicted(&self) -> f64 {
        self.score.predicted
    }
}

/// Where fixtures are looked up for a scoring run
#[derive(Debug, Clone, Copy)]
pub struct FixtureContext<'a> {
    pub table: &'a FixtureTable,
    pub target_gameweek: Option<u32>,
}

/// Score a pool of players.
///
/// Form and season points are min-max normalized across the pool, so the
/// result depends on who else is in it. Scores are floored at zero.
pub fn score_players(
    players: Vec<Player>,
    fixtures: FixtureContext<'_>,
    config: &ScoringConfig,
) -> Vec<ScoredPlayer> {
    let forms: Vec<f64> = players
        .iter()
        .map(|p| calculate_form(&p.recent_points, config.form_window))
        .collect();
    let totals: Vec<f64> = players.iter().map(|p| f64::from(p.total_points)).collect();
    let form_norm = normalize(&forms);
    let totals_norm = normalize(&totals);

    players
        .into_iter()
        .enumerate()
        .map(|(i, player)| {
            let multiplier = fixtures.table.multiplier(
                player.team_id,
                fixtures.target_gameweek,
                config.fixture_horizon,
                config.fixture_weight,
            );
            let score = calculate_score(
                forms[i],
                form_norm[i],
                player.total_points,
                totals_norm[i],
                multiplier,
                config,
            );
            ScoredPlayer {
                player,
                form: forms[i],
                fixture_multiplier: multiplier,
                score,
            }
        })
        .collect()
}

fn calculate_score(
    form: f64,
    form_norm: f64,
    total_points: i32,
    total_points_norm: f64,
    multiplier: f64,
    config: &ScoringConfig,
) -> ScoreResult {
    let mut score = 0.0;
    let mut factors = Vec::new();

    let before = score;
    score += POINTS_SCALE * config.form_weight * form_norm;
    factors.push(FactorContribution {
        label: "Form".to_string(),
        description: format!(
            "avg {:.1} over last {} (norm {:.2}) x{}",
            form, config.form_window, form_norm, config.form_weight
        ),
        before,
        after: score,
    });

    let before = score;
    score += POINTS_SCALE * config.total_points_weight * total_points_norm;
    factors.push(FactorContribution {
        label: "Season points".to_string(),
        description: format!(
            "{} pts (norm {:.2}) x{}",
            total_points, total_points_norm, config.total_points_weight
        ),
        before,
        after: score,
    });

    let before = score;
    score *= multiplier;
    factors.push(FactorContribution {
        label: "Fixtures".to_string(),
        description: if multiplier == 0.0 {
            "no fixture in range -> x0".to_string()
        } else {
            format!(
                "x{:.2} over {} gameweek(s)",
                multiplier, config.fixture_horizon
            )
        },
        before,
        after: score,
    });

    // Floor at zero
    ScoreResult {
        predicted: score.max(0.0),
        breakdown: ScoreBreakdown { factors },
    }
}

/// Order used for ranking and tie-breaks: predicted descending, then
/// cheaper first, then lower id.
pub fn compare_scored(a: &ScoredPlayer, b: &ScoredPlayer) -> Ordering {
    b.predicted()
        .partial_cmp(&a.predicted())
        .unwrap_or(Ordering::Equal)
        .then_with(|| a.player.cost.cmp(&b.player.cost))
        .then_with(|| a.player.id.cmp(&b.player.id))
}

pub fn rank_players(players: &mut [ScoredPlayer]) {
    players.sort_by(compare_scored);
}
