use super::config::{FilterConfig, ScoringConfig};
use super::factors::SEASON_GAMEWEEKS;
use glob::Pattern;

/// Validate scoring and filter configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_scoring(config: &ScoringConfig, filters: &FilterConfig) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    // Validate weights
    for (name, weight) in [
        ("form_weight", config.form_weight),
        ("total_points_weight", config.total_points_weight),
    ] {
        if !weight.is_finite() || weight < 0.0 {
            errors.push(format!("scoring.{}: must be a non-negative number", name));
        }
    }
    if config.form_weight == 0.0 && config.total_points_weight == 0.0 {
        errors.push(
            "scoring: form_weight and total_points_weight cannot both be zero".to_string(),
        );
    }

    if config.form_window == 0 {
        errors.push("scoring.form_window: must be at least 1".to_string());
    }

    if config.fixture_horizon == 0 {
        errors.push("scoring.fixture_horizon: must be at least 1".to_string());
    } else if config.fixture_horizon > SEASON_GAMEWEEKS {
        errors.push(format!(
            "scoring.fixture_horizon: must be at most {} (one season), got {}",
            SEASON_GAMEWEEKS, config.fixture_horizon
        ));
    }

    if !(0.0..=1.0).contains(&config.fixture_weight) {
        errors.push(format!(
            "scoring.fixture_weight: must be between 0 and 1, got {}",
            config.fixture_weight
        ));
    }

    // Validate exclude globs
    for (i, pattern) in filters.exclude.iter().enumerate() {
        if let Err(e) = Pattern::new(pattern) {
            errors.push(format!(
                "filters.exclude[{}]: invalid pattern '{}' - {}",
                i, pattern, e
            ));
        }
    }

    for (i, name) in filters.include.iter().enumerate() {
        if name.trim().is_empty() {
            errors.push(format!("filters.include[{}]: name cannot be empty", i));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
