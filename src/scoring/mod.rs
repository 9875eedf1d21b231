pub mod config;
pub mod engine;
pub mod factors;
pub mod filter;
pub mod validation;

pub use config::*;
pub use engine::{
    compare_scored, rank_players, score_players, FactorContribution, FixtureContext,
    ScoreBreakdown, ScoreResult, ScoredPlayer,
};
pub use factors::{calculate_form, normalize, target_gameweek, FixtureTable, SEASON_GAMEWEEKS};
pub use filter::{filter_eligible, is_included};
pub use validation::validate_scoring;
