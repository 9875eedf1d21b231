use std::fmt;

use crate::fpl::Position;

#[derive(Debug, Clone, PartialEq)]
pub enum SelectionError {
    EmptyPool,
    NotEnoughPlayers {
        position: Position,
        available: usize,
        required: u32,
    },
    UnknownInclude(String),
    AmbiguousInclude {
        name: String,
        matches: usize,
    },
    Infeasible,
    NoLegalLineup,
    Solver(String),
}

impl fmt::Display for SelectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionError::EmptyPool => write!(f, "No eligible players to pick from"),
            SelectionError::NotEnoughPlayers {
                position,
                available,
                required,
            } => write!(
                f,
                "Only {} eligible {} players, squad needs {}",
                available, position, required
            ),
            SelectionError::UnknownInclude(name) => write!(
                f,
                "Included player '{}' is not in the eligible pool (check spelling or exclude patterns)",
                name
            ),
            SelectionError::AmbiguousInclude { name, matches } => write!(
                f,
                "Included player '{}' matches {} eligible players; exclude the ones you don't mean",
                name, matches
            ),
            SelectionError::Infeasible => write!(
                f,
                "No squad satisfies the budget, position and club limits"
            ),
            SelectionError::NoLegalLineup => {
                write!(f, "Squad cannot field a legal starting lineup")
            }
            SelectionError::Solver(msg) => write!(f, "Solver failed: {}", msg),
        }
    }
}

impl std::error::Error for SelectionError {}
