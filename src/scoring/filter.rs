use anyhow::{Context, Result};
use glob::{MatchOptions, Pattern};

use super::config::FilterConfig;
use crate::fpl::Player;

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: false,
    require_literal_separator: false,
    require_literal_leading_dot: false,
};

/// Compile the `exclude` globs
pub fn compile_patterns(patterns: &[String]) -> Result<Vec<Pattern>> {
    patterns
        .iter()
        .map(|p| Pattern::new(p).with_context(|| format!("Invalid exclude pattern '{}'", p)))
        .collect()
}

fn is_excluded(player: &Player, patterns: &[Pattern]) -> bool {
    patterns
        .iter()
        .any(|p| p.matches_with(&player.web_name, MATCH_OPTIONS))
}

/// Whether `player` is named in the `include` list (case-insensitive)
pub fn is_included(player: &Player, include: &[String]) -> bool {
    include
        .iter()
        .any(|name| name.trim().eq_ignore_ascii_case(&player.web_name))
}

/// Keep players that may enter the squad pool
pub fn filter_eligible(players: Vec<Player>, filters: &FilterConfig) -> Result<Vec<Player>> {
    let patterns = compile_patterns(&filters.exclude)?;

    Ok(players
        .into_iter()
        .filter(|player| !is_excluded(player, &patterns))
        .filter(|player| {
            is_included(player, &filters.include)
                || (player.minutes >= filters.min_minutes
                    && (!filters.skip_unavailable || player.is_available()))
        })
        .collect())
}
