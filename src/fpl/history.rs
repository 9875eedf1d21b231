use futures::stream::{FuturesUnordered, StreamExt};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};

use super::client::{ApiError, FplClient};
use super::types::Player;

/// Helper for concurrent history enrichment
async fn enrich_player_with_rate_limit_check(
    client: FplClient,
    mut player: Player,
    rate_limited: Arc<AtomicBool>,
) -> Player {
    if rate_limited.load(Ordering::Relaxed) {
        return player; // Skip enrichment if rate limited
    }

    match client.fetch_player_history(player.id).await {
        Ok(summary) => {
            player.recent_points = summary.points_by_round();
            debug!(
                player = %player.web_name,
                gameweeks = player.recent_points.len(),
                "history loaded"
            );
        }
        Err(e) => {
            if is_rate_limit(&e) {
                warn!("Rate limit hit while fetching histories. Remaining players get no form data.");
                rate_limited.store(true, Ordering::Relaxed);
            } else {
                warn!("Failed to fetch history for {} ({}): {:#}", player.web_name, player.id, e);
            }
        }
    }
    player
}

fn is_rate_limit(e: &anyhow::Error) -> bool {
    e.chain()
        .any(|cause| matches!(cause.downcast_ref::<ApiError>(), Some(ApiError::RateLimited)))
}

/// Fill in `recent_points` for every player, fetching at most
/// `max_concurrent` histories at a time.
///
/// A failed fetch leaves that player's history empty (form 0) instead of
/// failing the run. Output order is not the input order.
pub async fn enrich_with_history(
    client: &FplClient,
    players: Vec<Player>,
    max_concurrent: usize,
) -> Vec<Player> {
    let max_concurrent = max_concurrent.max(1);

    // Rate limit flag shared across concurrent tasks
    let rate_limited = Arc::new(AtomicBool::new(false));

    let mut futures = FuturesUnordered::new();
    let mut players_iter = players.into_iter();
    let mut enriched = Vec::new();

    // Fill initial batch
    for _ in 0..max_concurrent {
        if let Some(player) = players_iter.next() {
            futures.push(enrich_player_with_rate_limit_check(
                client.clone(),
                player,
                rate_limited.clone(),
            ));
        }
    }

    // Process results and feed new tasks
    while let Some(player) = futures.next().await {
        enriched.push(player);

        if !rate_limited.load(Ordering::Relaxed) {
            if let Some(next_player) = players_iter.next() {
                futures.push(enrich_player_with_rate_limit_check(
                    client.clone(),
                    next_player,
                    rate_limited.clone(),
                ));
            }
        }
    }

    // Players never submitted because of rate limiting keep empty history
    enriched.extend(players_iter);

    enriched
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fpl::{Position, ResponseCache};
    use anyhow::Context;
    use std::sync::Mutex;
    use std::time::Duration;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn player(id: u32, recent_points: Vec<i32>) -> Player {
        Player {
            id,
            web_name: format!("Player{}", id),
            team: "Arsenal".to_string(),
            team_short: "ARS".to_string(),
            team_id: 1,
            position: Position::Midfielder,
            cost: 60,
            total_points: 50,
            minutes: 900,
            goals_scored: 0,
            assists: 0,
            clean_sheets: 0,
            saves: 0,
            bonus: 0,
            status: "a".to_string(),
            chance_of_playing: None,
            recent_points,
        }
    }

    /// Serve `429 Too Many Requests` to every request, recording request paths
    async fn rate_limited_server() -> (String, Arc<Mutex<Vec<String>>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let paths = Arc::new(Mutex::new(Vec::new()));
        let seen = paths.clone();
        tokio::spawn(async move {
            loop {
                let Ok((mut socket, _)) = listener.accept().await else {
                    return;
                };
                let mut request = Vec::new();
                let mut buf = [0u8; 1024];
                while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                    match socket.read(&mut buf).await {
                        Ok(0) | Err(_) => break,
                        Ok(n) => request.extend_from_slice(&buf[..n]),
                    }
                }
                let text = String::from_utf8_lossy(&request);
                if let Some(path) = text.split_whitespace().nth(1) {
                    seen.lock().unwrap().push(path.to_string());
                }
                let _ = socket
                    .write_all(
                        b"HTTP/1.1 429 Too Many Requests\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
                    )
                    .await;
                let _ = socket.shutdown().await;
            }
        });
        (format!("http://{}", addr), paths)
    }

    #[test]
    fn test_is_rate_limit_through_context() {
        let err: anyhow::Result<()> = Err(ApiError::RateLimited).context("Failed to fetch history");
        assert!(is_rate_limit(&err.unwrap_err()));
    }

    #[test]
    fn test_other_errors_are_not_rate_limit() {
        let err: anyhow::Result<()> =
            Err(ApiError::NotFound("https://example.test".to_string())).context("outer");
        assert!(!is_rate_limit(&err.unwrap_err()));
        assert!(!is_rate_limit(&anyhow::anyhow!("rate limit in text only")));
    }

    #[tokio::test]
    async fn test_failed_fetch_keeps_player() {
        let client = FplClient::new("http://127.0.0.1:1", Duration::from_secs(1), None).unwrap();
        let players = enrich_with_history(&client, vec![player(3, vec![9])], 4).await;
        assert_eq!(players.len(), 1);
        assert_eq!(players[0].id, 3);
        assert_eq!(players[0].recent_points, vec![9]);
    }

    #[tokio::test]
    async fn test_history_loaded_from_cache() {
        let dir = std::env::temp_dir().join("fpl_picker_test_history_cache");
        let _ = std::fs::remove_dir_all(&dir);
        let cache = ResponseCache::new(dir.clone(), Duration::from_secs(3600));
        let client =
            FplClient::new("http://127.0.0.1:1", Duration::from_secs(1), Some(cache.clone())).unwrap();
        let body = serde_json::json!({
            "history": [{"round": 1, "total_points": 2}, {"round": 2, "total_points": 8}]
        });
        cache.write(&client.url("element-summary/5/"), &body).unwrap();

        let players = enrich_with_history(&client, vec![player(5, vec![])], 2).await;
        assert_eq!(players[0].recent_points, vec![2, 8]);

        // Once rate limited, even a cached history is not looked up
        let flag = Arc::new(AtomicBool::new(true));
        let skipped = enrich_player_with_rate_limit_check(client.clone(), player(5, vec![]), flag).await;
        assert!(skipped.recent_points.is_empty());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn test_rate_limit_stops_remaining_fetches() {
        let (base_url, paths) = rate_limited_server().await;
        let client = FplClient::new(&base_url, Duration::from_secs(5), None).unwrap();
        let players = vec![player(1, vec![]), player(2, vec![]), player(3, vec![])];

        let enriched = enrich_with_history(&client, players, 1).await;

        let mut ids: Vec<u32> = enriched.iter().map(|p| p.id).collect();
        ids.sort();
        assert_eq!(ids, vec![1, 2, 3]);
        assert!(enriched.iter().all(|p| p.recent_points.is_empty()));

        // The first player used up every attempt; nobody else was requested
        let paths = paths.lock().unwrap().clone();
        assert_eq!(paths.len(), 3);
        assert!(paths.iter().all(|p| p == "/element-summary/1/"));
    }
}
