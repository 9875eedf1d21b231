use serde::Serialize;
use tracing::info;

use super::error::SelectionError;
use super::lineup::{pick_starting_xi, select_captain, Formation};
use super::rules::SquadRules;
use super::solver::select_squad;
use crate::scoring::ScoredPlayer;

/// A selected squad with its starting lineup and armband holders
#[derive(Debug, Clone, Serialize)]
pub struct Squad {
    pub formation: Formation,
    pub starting: Vec<ScoredPlayer>,
    pub bench: Vec<ScoredPlayer>,
    pub captain_id: u32,
    pub vice_captain_id: u32,
    /// Budget in cost units (tenths of a million)
    pub budget: u32,
}

impl Squad {
    /// Starters followed by the bench
    pub fn players(&self) -> impl Iterator<Item = &ScoredPlayer> {
        self.starting.iter().chain(self.bench.iter())
    }

    pub fn total_cost(&self) -> u32 {
        self.players().map(|p| p.player.cost).sum()
    }

    /// Unspent budget in cost units
    pub fn bank(&self) -> u32 {
        self.budget.saturating_sub(self.total_cost())
    }

    pub fn captain(&self) -> Option<&ScoredPlayer> {
        self.starting.iter().find(|p| p.player.id == self.captain_id)
    }

    pub fn vice_captain(&self) -> Option<&ScoredPlayer> {
        self.starting
            .iter()
            .find(|p| p.player.id == self.vice_captain_id)
    }

    pub fn is_captain(&self, id: u32) -> bool {
        id == self.captain_id
    }

    pub fn is_vice_captain(&self, id: u32) -> bool {
        id == self.vice_captain_id
    }

    /// Predicted points of the starting lineup, captain counted twice
    pub fn predicted_points(&self) -> f64 {
        let starters: f64 = self.starting.iter().map(|p| p.predicted()).sum();
        starters + self.captain().map_or(0.0, |c| c.predicted())
    }
}

/// Select the squad, then its lineup and captain
pub fn pick_team(
    pool: &[ScoredPlayer],
    rules: &SquadRules,
    include: &[String],
) -> Result<Squad, SelectionError> {
    let selected = select_squad(pool, rules, include)?;
    let lineup = pick_starting_xi(selected, &rules.lineup)?;
    let (captain_id, vice_captain_id) =
        select_captain(&lineup.starting).ok_or(SelectionError::NoLegalLineup)?;

    let squad = Squad {
        formation: lineup.formation,
        starting: lineup.starting,
        bench: lineup.bench,
        captain_id,
        vice_captain_id,
        budget: rules.budget_units(),
    };
    info!(
        formation = %squad.formation,
        cost = squad.total_cost(),
        predicted = squad.predicted_points(),
        "picked squad"
    );
    Ok(squad)
}
