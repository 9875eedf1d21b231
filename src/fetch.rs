use anyhow::Result;
use std::collections::HashMap;
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::fpl::{enrich_with_history, BootstrapStatic, Fixture, FplClient, Gameweek, Player, Team};
use crate::scoring::{
    filter_eligible, rank_players, score_players, target_gameweek, FilterConfig, FixtureContext,
    FixtureTable, ScoredPlayer, ScoringConfig,
};

/// Ranked, scored players and the gameweek they were scored for
#[derive(Debug, Clone)]
pub struct PlayerPool {
    pub players: Vec<ScoredPlayer>,
    pub target_gameweek: Option<Gameweek>,
}

/// Fetch everything, filter, score and rank. Called once per run.
pub async fn fetch_and_score_players(client: &FplClient, config: &Config) -> Result<PlayerPool> {
    let start = Instant::now();

    let (bootstrap, fixtures) =
        tokio::try_join!(client.fetch_bootstrap(), client.fetch_fixtures())?;
    info!(
        players = bootstrap.elements.len(),
        fixtures = fixtures.len(),
        "fetched season data"
    );

    let events = bootstrap.events.clone();
    let eligible = eligible_players(bootstrap, &config.filters)?;
    info!(eligible = eligible.len(), "filtered player pool");

    let enriched = enrich_with_history(client, eligible, config.api.max_concurrent_requests).await;
    let with_history = enriched.iter().filter(|p| !p.recent_points.is_empty()).count();
    if with_history < enriched.len() {
        warn!(
            "{} of {} players have no history; their form counts as 0",
            enriched.len() - with_history,
            enriched.len()
        );
    }

    let pool = build_pool(enriched, &events, &fixtures, &config.scoring);
    debug!(elapsed = ?start.elapsed(), "player pool ready");
    Ok(pool)
}

/// Convert bootstrap elements into players and keep the eligible ones.
/// Elements with an unknown position or team are skipped with a warning.
pub fn eligible_players(bootstrap: BootstrapStatic, filters: &FilterConfig) -> Result<Vec<Player>> {
    let teams: HashMap<u32, Team> = bootstrap.teams.into_iter().map(|t| (t.id, t)).collect();

    let players: Vec<Player> = bootstrap
        .elements
        .into_iter()
        .filter_map(|raw| match Player::from_raw(raw, &teams) {
            Ok(player) => Some(player),
            Err(e) => {
                warn!("Skipping {}", e);
                None
            }
        })
        .collect();

    filter_eligible(players, filters)
}

/// Score players against the fixtures of the target gameweek and rank them
pub fn build_pool(
    players: Vec<Player>,
    events: &[Gameweek],
    fixtures: &[Fixture],
    scoring: &ScoringConfig,
) -> PlayerPool {
    let target = target_gameweek(events).cloned();
    match &target {
        Some(gw) => info!(gameweek = gw.id, "scoring for {}", gw.name),
        None => warn!("No upcoming gameweek; fixtures are ignored"),
    }

    let table = FixtureTable::new(fixtures);
    let context = FixtureContext {
        table: &table,
        target_gameweek: target.as_ref().map(|gw| gw.id),
    };

    let mut players = score_players(players, context, scoring);
    rank_players(&mut players);

    PlayerPool {
        players,
        target_gameweek: target,
    }
}
