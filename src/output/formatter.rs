use owo_colors::OwoColorize;
use std::io::IsTerminal;
use terminal_size::{terminal_size, Width};

use crate::optimize::Squad;
use crate::scoring::{ScoreBreakdown, ScoredPlayer};

/// Columns after the name: mark, team, position, price, form, predicted
/// with their separators
const FIXED_ROW_WIDTH: usize = 35;
const MIN_NAME_WIDTH: usize = 8;

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Cost units (tenths of a million) as "12.5"
pub fn format_price(cost: u32) -> String {
    format!("{:.1}", f64::from(cost) / 10.0)
}

pub fn format_points(points: f64) -> String {
    format!("{:.1}", points)
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate a name to fit available width, counting chars not bytes
fn truncate_name(name: &str, max_width: usize) -> String {
    let chars: Vec<char> = name.chars().collect();
    if chars.len() <= max_width {
        name.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

/// Width of the name column given the longest name and the terminal
fn name_column_width<'a>(
    names: impl Iterator<Item = &'a str>,
    reserved: usize,
    term_width: Option<usize>,
) -> usize {
    let longest = names.map(|n| n.chars().count()).max().unwrap_or(0);
    match term_width {
        Some(width) if width > reserved + MIN_NAME_WIDTH => longest.min(width - reserved),
        Some(_) => longest.min(MIN_NAME_WIDTH),
        None => longest,
    }
}

fn pad_name(name: &str, width: usize) -> String {
    let truncated = truncate_name(name, width);
    let len = truncated.chars().count();
    format!("{}{}", truncated, " ".repeat(width.saturating_sub(len)))
}

/// One player row: name, team, position, price, form, predicted
fn format_player_row(
    mark: &str,
    scored: &ScoredPlayer,
    name_width: usize,
    use_colors: bool,
) -> String {
    let player = &scored.player;
    let name = pad_name(&player.web_name, name_width);
    let team = format!("{:<3}", player.team_short);
    let position = format!("{:<3}", player.position.short_name());
    let price = format!("{:>5}", format_price(player.cost));
    let form = format!("{:>5}", format_points(scored.form));
    let predicted = format!("{:>6}", format_points(scored.predicted()));
    let mark = format!("{:<2}", mark);

    if use_colors {
        format!(
            "{} {}  {}  {}  {}  {}  {}",
            mark.yellow().bold(),
            name.bold(),
            team.cyan(),
            position.dimmed(),
            price.green(),
            form,
            predicted.bold()
        )
    } else {
        format!(
            "{} {}  {}  {}  {}  {}  {}",
            mark, name, team, position, price, form, predicted
        )
    }
}

fn header_row(name_width: usize) -> String {
    format!(
        "   {}  {:<3}  {:<3}  {:>5}  {:>5}  {:>6}",
        pad_name("Player", name_width),
        "Tm",
        "Pos",
        "Price",
        "Form",
        "Pred"
    )
}

fn armband(squad: &Squad, id: u32) -> &'static str {
    if squad.is_captain(id) {
        "C"
    } else if squad.is_vice_captain(id) {
        "V"
    } else {
        ""
    }
}

/// Format the squad: starting lineup grouped by position, then the bench
/// in substitution order, then totals.
pub fn format_squad(squad: &Squad, use_colors: bool) -> String {
    let name_width = name_column_width(
        squad.players().map(|p| p.player.web_name.as_str()),
        FIXED_ROW_WIDTH,
        get_terminal_width(),
    )
    .max("Player".len());

    let mut starting: Vec<&ScoredPlayer> = squad.starting.iter().collect();
    starting.sort_by_key(|p| p.player.position);

    let mut lines = Vec::new();
    let title = format!("Starting XI ({})", squad.formation);
    lines.push(if use_colors {
        title.bold().to_string()
    } else {
        title
    });
    let header = header_row(name_width);
    lines.push(if use_colors {
        header.dimmed().to_string()
    } else {
        header
    });

    let mut previous = None;
    for scored in starting {
        if previous.is_some_and(|pos| pos != scored.player.position) {
            lines.push(String::new());
        }
        previous = Some(scored.player.position);
        lines.push(format_player_row(
            armband(squad, scored.player.id),
            scored,
            name_width,
            use_colors,
        ));
    }

    lines.push(String::new());
    lines.push(if use_colors {
        "Bench".bold().to_string()
    } else {
        "Bench".to_string()
    });
    for (idx, scored) in squad.bench.iter().enumerate() {
        let order = format!("{}", idx + 1);
        lines.push(format_player_row(&order, scored, name_width, use_colors));
    }

    lines.push(String::new());
    lines.push(format_totals(squad));
    if let (Some(captain), Some(vice)) = (squad.captain(), squad.vice_captain()) {
        lines.push(format!(
            "Captain: {}  Vice: {}",
            captain.player.web_name, vice.player.web_name
        ));
    }

    lines.join("\n")
}

/// "Cost 99.5  Bank 0.5  Predicted 64.2 (captain doubled)"
pub fn format_totals(squad: &Squad) -> String {
    format!(
        "Cost {}  Bank {}  Predicted {} (captain doubled)",
        format_price(squad.total_cost()),
        format_price(squad.bank()),
        format_points(squad.predicted_points())
    )
}

/// Squad as tab-separated values for scripting
/// Columns: role, armband, id, name, team, position, price, form, predicted
pub fn format_squad_tsv(squad: &Squad) -> String {
    let starting = squad.starting.iter().map(|p| ("XI", p));
    let bench = squad.bench.iter().map(|p| ("BENCH", p));
    starting
        .chain(bench)
        .map(|(role, scored)| {
            let player = &scored.player;
            format!(
                "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{:.2}\t{:.2}",
                role,
                armband(squad, player.id),
                player.id,
                player.web_name,
                player.team_short,
                player.position,
                format_price(player.cost),
                scored.form,
                scored.predicted()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Ranked players with columns: Index, Name, Team, Position, Price, Form,
/// Predicted
pub fn format_player_table(players: &[ScoredPlayer], use_colors: bool) -> String {
    if players.is_empty() {
        return "No eligible players found.".to_string();
    }

    // Index column "999." plus one space
    let index_width = 5;
    let name_width = name_column_width(
        players.iter().map(|p| p.player.web_name.as_str()),
        FIXED_ROW_WIDTH + index_width,
        get_terminal_width(),
    );

    players
        .iter()
        .enumerate()
        .map(|(idx, scored)| {
            let index_str = format!("{:>3}.", idx + 1);
            let row = format_player_row("", scored, name_width, use_colors);
            if use_colors {
                format!("{} {}", index_str.dimmed(), row)
            } else {
                format!("{} {}", index_str, row)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Ranked players as tab-separated values
/// Columns: rank, id, name, team, position, price, form, points per 90, predicted
pub fn format_players_tsv(players: &[ScoredPlayer]) -> String {
    players
        .iter()
        .enumerate()
        .map(|(idx, scored)| {
            let player = &scored.player;
            format!(
                "{}\t{}\t{}\t{}\t{}\t{}\t{:.2}\t{:.2}\t{:.2}",
                idx + 1,
                player.id,
                player.web_name,
                player.team_short,
                player.position,
                format_price(player.cost),
                scored.form,
                player.points_per_90(),
                scored.predicted()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Score breakdown, one indented line per factor (verbose mode)
pub fn format_breakdown(breakdown: &ScoreBreakdown, use_colors: bool) -> String {
    breakdown
        .factors
        .iter()
        .map(|factor| {
            let change = format!("{:.2} -> {:.2}", factor.before, factor.after);
            if use_colors {
                format!(
                    "      {}: {} ({})",
                    factor.label.cyan(),
                    factor.description,
                    change.dimmed()
                )
            } else {
                format!("      {}: {} ({})", factor.label, factor.description, change)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
