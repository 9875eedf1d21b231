use good_lp::{
    constraint, microlp, variable, Expression, ProblemVariables, ResolutionError, Solution,
    SolutionStatus, SolverModel, Variable, WithTimeLimit,
};
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, warn};

use super::error::SelectionError;
use super::rules::SquadRules;
use crate::fpl::Position;
use crate::scoring::{is_included, ScoredPlayer};

/// Wall-clock cap on one solve
pub const SOLVE_TIME_LIMIT: Duration = Duration::from_secs(30);

/// Choose the squad maximizing total predicted points.
///
/// One binary variable per player. Constraints: total cost within budget,
/// exact squad size and per-position quotas, at most `max_per_team` from any
/// club, and every `include` name forced in.
pub fn select_squad(
    pool: &[ScoredPlayer],
    rules: &SquadRules,
    include: &[String],
) -> Result<Vec<ScoredPlayer>, SelectionError> {
    select_squad_within(pool, rules, include, SOLVE_TIME_LIMIT)
}

/// [`select_squad`] with an explicit time limit. When the limit runs out
/// the best squad found so far is returned, or `SelectionError::Solver` if
/// there is none yet.
pub fn select_squad_within(
    pool: &[ScoredPlayer],
    rules: &SquadRules,
    include: &[String],
    time_limit: Duration,
) -> Result<Vec<ScoredPlayer>, SelectionError> {
    if pool.is_empty() {
        return Err(SelectionError::EmptyPool);
    }

    for position in Position::ALL {
        let available = pool
            .iter()
            .filter(|p| p.player.position == position)
            .count();
        let required = rules.quotas.get(position);
        if available < required as usize {
            return Err(SelectionError::NotEnoughPlayers {
                position,
                available,
                required,
            });
        }
    }

    let mut forced = Vec::new();
    for name in include {
        let matched: Vec<usize> = pool
            .iter()
            .enumerate()
            .filter(|(_, p)| is_included(&p.player, std::slice::from_ref(name)))
            .map(|(i, _)| i)
            .collect();
        match matched.as_slice() {
            [] => return Err(SelectionError::UnknownInclude(name.clone())),
            [index] => forced.push(*index),
            _ => {
                return Err(SelectionError::AmbiguousInclude {
                    name: name.clone(),
                    matches: matched.len(),
                })
            }
        }
    }

    let mut vars = ProblemVariables::new();
    let picks: Vec<Variable> = pool.iter().map(|_| vars.add(variable().binary())).collect();

    let mut objective = Expression::with_capacity(pool.len());
    let mut cost = Expression::with_capacity(pool.len());
    let mut size = Expression::with_capacity(pool.len());
    let mut by_position: HashMap<Position, Expression> = HashMap::new();
    let mut by_team: HashMap<u32, Expression> = HashMap::new();

    for (scored, &pick) in pool.iter().zip(&picks) {
        objective.add_mul(scored.predicted(), pick);
        cost.add_mul(f64::from(scored.player.cost), pick);
        size.add_mul(1.0, pick);
        by_position
            .entry(scored.player.position)
            .or_insert_with(|| Expression::with_capacity(pool.len()))
            .add_mul(1.0, pick);
        by_team
            .entry(scored.player.team_id)
            .or_insert_with(|| Expression::with_capacity(8))
            .add_mul(1.0, pick);
    }

    let budget = f64::from(rules.budget_units());
    let squad_size = f64::from(rules.quotas.total());
    let max_per_team = f64::from(rules.max_per_team);

    let mut model = vars
        .maximise(objective)
        .using(microlp)
        .with_time_limit(time_limit.as_secs_f64())
        .with(constraint!(cost <= budget))
        .with(constraint!(size == squad_size));

    for (position, count) in by_position {
        let quota = f64::from(rules.quotas.get(position));
        model = model.with(constraint!(count == quota));
    }

    for (_, count) in by_team {
        model = model.with(constraint!(count <= max_per_team));
    }

    for index in forced {
        let pick = picks[index];
        model = model.with(constraint!(pick == 1.0));
    }

    debug!(players = pool.len(), "solving squad selection");
    let solution = model.solve().map_err(|e| match e {
        ResolutionError::Infeasible => SelectionError::Infeasible,
        other => SelectionError::Solver(other.to_string()),
    })?;
    if !matches!(solution.status(), SolutionStatus::Optimal) {
        warn!(
            limit = ?time_limit,
            "squad search stopped at the time limit; the squad may not be optimal"
        );
    }

    Ok(pool
        .iter()
        .zip(&picks)
        .filter(|(_, pick)| solution.value(**pick) > 0.5)
        .map(|(scored, _)| scored.clone())
        .collect())
}
