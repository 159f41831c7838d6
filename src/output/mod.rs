pub mod formatter;

pub use formatter::{
    format_age, format_detail, format_geojson, format_json, format_rent, format_score,
    format_scored_table, format_top_pick, format_tsv, should_use_colors, truncate_name,
};

/// Output layout for `list`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Tsv,
    Json,
    Geojson,
}
