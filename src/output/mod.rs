pub mod export;
pub mod formatter;

pub use export::{format_players_json, format_squad_json, write_squad_json, SquadReport};
pub use formatter::{
    format_breakdown, format_player_table, format_players_tsv, format_points, format_price,
    format_squad, format_squad_tsv, format_totals, should_use_colors,
};
