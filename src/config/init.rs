use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::fmt::Display;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::str::FromStr;

use crate::config::{ensure_parent_dir, get_config_path, validate_config, ApiConfig, Config};
use crate::optimize::SquadRules;
use crate::scoring::{FilterConfig, ScoringConfig, SEASON_GAMEWEEKS};

/// Line-based prompts over any reader and writer
struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    /// Prompt user with a message and return their trimmed input.
    fn prompt(&mut self, message: &str) -> Result<String> {
        write!(self.output, "{}", message).context("Failed to write prompt")?;
        self.output.flush().context("Failed to flush stdout")?;
        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .context("Failed to read input")?;
        if read == 0 {
            anyhow::bail!("Input closed before the wizard finished");
        }
        Ok(line.trim().to_string())
    }

    fn say(&mut self, message: &str) -> Result<()> {
        writeln!(self.output, "{}", message).context("Failed to write output")
    }

    /// Prompt with a default, re-asking until the answer parses and passes `check`
    fn prompt_value<T>(
        &mut self,
        message: &str,
        default: T,
        check: impl Fn(&T) -> Result<(), String>,
    ) -> Result<T>
    where
        T: FromStr + Display,
        T::Err: Display,
    {
        loop {
            let input = self.prompt(&format!("{} [{}]: ", message, default))?;
            if input.is_empty() {
                return Ok(default);
            }
            match input.parse::<T>() {
                Ok(value) => match check(&value) {
                    Ok(()) => return Ok(value),
                    Err(e) => self.say(&format!("  Invalid: {}. Try again.", e))?,
                },
                Err(e) => self.say(&format!("  Invalid: {}. Try again.", e))?,
            }
        }
    }

    /// Prompt user with a yes/no question. Returns bool based on input and default.
    fn prompt_yes_no(&mut self, message: &str, default_yes: bool) -> Result<bool> {
        let hint = if default_yes { "Y/n" } else { "y/N" };
        let input = self.prompt(&format!("{} [{}]: ", message, hint))?.to_lowercase();
        if input.is_empty() {
            Ok(default_yes)
        } else {
            Ok(input == "y" || input == "yes")
        }
    }

    /// Comma-separated list, empty input for none
    fn prompt_list(&mut self, message: &str) -> Result<Vec<String>> {
        let input = self.prompt(&format!("{} (comma-separated, blank for none): ", message))?;
        Ok(input
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect())
    }
}

fn non_negative(value: &f64) -> Result<(), String> {
    if value.is_finite() && *value >= 0.0 {
        Ok(())
    } else {
        Err("must be a non-negative number".to_string())
    }
}

fn at_least_one<T: PartialOrd + From<u8>>(value: &T) -> Result<(), String> {
    if *value >= T::from(1) {
        Ok(())
    } else {
        Err("must be at least 1".to_string())
    }
}

fn ask_config<R: BufRead, W: Write>(p: &mut Prompter<R, W>) -> Result<Config> {
    let squad_defaults = SquadRules::default();
    p.say("")?;
    p.say("Squad rules. The defaults are the official game rules.")?;
    let budget = p.prompt_value("Budget in millions", squad_defaults.budget, |v: &f64| {
        if v.is_finite() && *v > 0.0 {
            Ok(())
        } else {
            Err("must be positive".to_string())
        }
    })?;
    let max_per_team = p.prompt_value(
        "Maximum players from one club",
        squad_defaults.max_per_team,
        at_least_one,
    )?;

    let filter_defaults = FilterConfig::default();
    p.say("")?;
    p.say("Players below the minutes threshold are ignored (450 is five full matches).")?;
    let min_minutes = p.prompt_value("Minimum minutes played", filter_defaults.min_minutes, |_: &u32| Ok(()))?;
    let skip_unavailable =
        p.prompt_yes_no("Skip injured, suspended and doubtful players?", true)?;
    let exclude = p.prompt_list("Players to exclude (globs like '*son' work)")?;
    let include = p.prompt_list("Players who must be picked")?;

    let scoring_defaults = ScoringConfig::default();
    let scoring = if p.prompt_yes_no("Configure scoring? (n accepts defaults)", false)? {
        p.say("")?;
        p.say("Predictions blend recent form with season points. Weights need not sum to 1.")?;
        let (form_weight, total_points_weight) = loop {
            let form_weight =
                p.prompt_value("Form weight", scoring_defaults.form_weight, non_negative)?;
            let total_points_weight = p.prompt_value(
                "Season points weight",
                scoring_defaults.total_points_weight,
                non_negative,
            )?;
            if form_weight == 0.0 && total_points_weight == 0.0 {
                p.say("  Invalid: both weights are zero. Try again.")?;
                continue;
            }
            break (form_weight, total_points_weight);
        };
        let form_window = p.prompt_value(
            "Gameweeks averaged into form",
            scoring_defaults.form_window,
            at_least_one,
        )?;
        let fixture_horizon = p.prompt_value(
            "Upcoming gameweeks whose fixtures count",
            scoring_defaults.fixture_horizon,
            |v: &u32| {
                if (1..=SEASON_GAMEWEEKS).contains(v) {
                    Ok(())
                } else {
                    Err(format!("must be between 1 and {}", SEASON_GAMEWEEKS))
                }
            },
        )?;
        let fixture_weight = p.prompt_value(
            "Fixture difficulty weight (0 ignores fixtures)",
            scoring_defaults.fixture_weight,
            |v: &f64| {
                if (0.0..=1.0).contains(v) {
                    Ok(())
                } else {
                    Err("must be between 0 and 1".to_string())
                }
            },
        )?;
        ScoringConfig {
            form_weight,
            total_points_weight,
            form_window,
            fixture_horizon,
            fixture_weight,
        }
    } else {
        scoring_defaults
    };

    let api_defaults = ApiConfig::default();
    p.say("")?;
    let cache_ttl = loop {
        let input = p.prompt(&format!(
            "How long to reuse downloaded data [{}]: ",
            api_defaults.cache_ttl
        ))?;
        let value = if input.is_empty() {
            api_defaults.cache_ttl.clone()
        } else {
            input
        };
        match humantime::parse_duration(&value) {
            Ok(_) => break value,
            Err(e) => p.say(&format!("  Invalid: {}. Try again.", e))?,
        }
    };

    Ok(Config {
        api: ApiConfig {
            cache_ttl,
            ..api_defaults
        },
        scoring,
        filters: FilterConfig {
            min_minutes,
            skip_unavailable,
            exclude,
            include,
        },
        squad: SquadRules {
            budget,
            max_per_team,
            ..squad_defaults
        },
    })
}

fn run_wizard<R: BufRead, W: Write>(
    p: &mut Prompter<R, W>,
    default_path: Option<PathBuf>,
) -> Result<Option<PathBuf>> {
    p.say("")?;
    p.say("FPL Picker Configuration Wizard")?;
    p.say("===============================")?;

    let config = ask_config(p)?;
    if let Err(errors) = validate_config(&config) {
        anyhow::bail!("Generated config is invalid: {}", errors.join("; "));
    }

    let default_config_path = default_path.unwrap_or_else(get_config_path);
    p.say("")?;
    let path_str = p.prompt(&format!(
        "Where should the config be saved? [{}]: ",
        default_config_path.display()
    ))?;
    let config_path = if path_str.is_empty() {
        default_config_path
    } else {
        PathBuf::from(path_str)
    };

    if config_path.exists() {
        let overwrite = p.prompt_yes_no(
            &format!(
                "Config already exists at {}. Overwrite?",
                config_path.display()
            ),
            false,
        )?;
        if !overwrite {
            p.say("Aborted.")?;
            return Ok(None);
        }
    }

    let yaml = serde_saphyr::to_string(&config)
        .map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))?;

    ensure_parent_dir(&config_path)?;
    let mut file = AtomicWriteFile::open(&config_path)
        .with_context(|| format!("Failed to open atomic write file at {}", config_path.display()))?;
    file.write_all(yaml.as_bytes())
        .with_context(|| format!("Failed to write config to {}", config_path.display()))?;
    file.commit()
        .with_context(|| format!("Failed to write config to {}", config_path.display()))?;

    p.say("")?;
    p.say(&format!("Config written to {}", config_path.display()))?;
    p.say("Run `fpl-picker` to pick a squad.")?;

    Ok(Some(config_path))
}

/// Run the interactive init wizard to create a config file.
///
/// If `default_path` is Some, it is offered as the save location.
/// Otherwise the default config path is offered.
pub fn run_init_wizard(default_path: Option<PathBuf>) -> Result<()> {
    let stdin = std::io::stdin();
    let mut prompter = Prompter {
        input: stdin.lock(),
        output: std::io::stdout(),
    };
    run_wizard(&mut prompter, default_path)?;
    Ok(())
}
