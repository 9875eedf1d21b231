pub mod error;
pub mod lineup;
pub mod rules;
pub mod solver;
pub mod squad;

pub use error::SelectionError;
pub use lineup::{legal_formations, pick_starting_xi, select_captain, Formation, Lineup};
pub use rules::{CountRange, LineupRules, PositionQuotas, SquadRules};
pub use solver::select_squad;
pub use squad::{pick_team, Squad};
