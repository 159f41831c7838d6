use std::io::IsTerminal;

use chrono::{Duration, NaiveDate};
use owo_colors::OwoColorize;
use serde_json::{json, Value};
use terminal_size::{terminal_size, Width};

use crate::scoring::ScoredNeighborhood;

const EMPTY_RANKING: &str = "No neighborhoods to rank.";

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Format a score for display.
///
/// Large scores use compact notation (1.5k, 2.3M); small ones keep three
/// significant digits so per-rupee scores like 0.00115 stay readable.
pub fn format_score(score: f64) -> String {
    if !score.is_finite() {
        return score.to_string();
    }
    let formatted = if score >= 1_000_000.0 {
        format!("{:.1}M", score / 1_000_000.0)
    } else if score >= 1_000.0 {
        format!("{:.1}k", score / 1_000.0)
    } else if score >= 100.0 {
        format!("{:.0}", score)
    } else if score == 0.0 {
        "0".to_string()
    } else {
        let decimals = (2 - score.abs().log10().floor() as i32).max(0) as usize;
        trim_zeros(format!("{:.*}", decimals, score))
    };

    // Trim trailing .0 (e.g., "1.0k" -> "1k")
    formatted.replace(".0M", "M").replace(".0k", "k")
}

fn trim_zeros(s: String) -> String {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s
    }
}

/// Format a rent amount as whole rupees with thousands separators: ₹35,000
pub fn format_rent(rent: f64) -> String {
    let rupees = rent.round() as i64;
    let digits = rupees.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    let sign = if rupees < 0 { "-" } else { "" };
    format!("{}₹{}", sign, grouped)
}

/// Format a duration into a human-readable age string
/// "2h" for hours, "3d" for days, "1w" for weeks
pub fn format_age(duration: Duration) -> String {
    let hours = duration.num_hours();
    let days = duration.num_days();
    let weeks = days / 7;

    if weeks >= 1 {
        format!("{}w", weeks)
    } else if days >= 1 {
        format!("{}d", days)
    } else if hours >= 1 {
        format!("{}h", hours)
    } else {
        let minutes = duration.num_minutes();
        if minutes >= 1 {
            format!("{}m", minutes)
        } else {
            "now".to_string()
        }
    }
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate a name to fit available width, accounting for Unicode
pub fn truncate_name(name: &str, max_width: usize) -> String {
    let chars: Vec<char> = name.chars().collect();
    if chars.len() <= max_width {
        name.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

fn metrics_summary(entry: &ScoredNeighborhood) -> String {
    let r = &entry.record;
    format!(
        "cafes {:>3}  metro {:>5.1}  safety {:>4.1}",
        r.cafe_count, r.metro_proximity, r.safety_index
    )
}

/// Format the ranking as a table with columns: Rank, Score, Name, Rent, Metrics
/// No headers. Names are truncated to the terminal width; pipes get them whole.
pub fn format_scored_table(entries: &[ScoredNeighborhood], use_colors: bool) -> String {
    if entries.is_empty() {
        return EMPTY_RANKING.to_string();
    }

    let term_width = get_terminal_width();

    let index_width = 4; // "999."
    let score_width = 8;
    let rent_width = 10; // "₹100,000" fits
    let separator = "  ";

    entries
        .iter()
        .map(|entry| {
            let index_str = format!("{:>3}.", entry.rank);
            let score_padded = format!("{:>width$}", format_score(entry.value_score), width = score_width);
            let rent_padded = format!("{:>width$}", format_rent(entry.record.rent), width = rent_width);
            let metrics = metrics_summary(entry);

            let fixed_width = index_width
                + 1
                + score_width
                + rent_width
                + metrics.chars().count()
                + separator.len() * 3;

            let name = match term_width {
                Some(width) if width > fixed_width + 10 => {
                    truncate_name(&entry.record.name, width - fixed_width)
                }
                Some(_) => truncate_name(&entry.record.name, 20),
                None => entry.record.name.clone(),
            };

            if use_colors {
                format!(
                    "{} {}{}{}{}{}{}{}",
                    index_str.dimmed(),
                    score_padded.bold(),
                    separator,
                    name,
                    separator,
                    rent_padded.green(),
                    separator,
                    metrics.dimmed()
                )
            } else {
                format!(
                    "{} {}{}{}{}{}{}{}",
                    index_str, score_padded, separator, name, separator, rent_padded, separator, metrics
                )
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format the ranking as tab-separated values for scripting
/// Columns: rank, score, name, rent, cafes, metro, safety (no headers, no colors)
pub fn format_tsv(entries: &[ScoredNeighborhood]) -> String {
    entries
        .iter()
        .map(|entry| {
            let r = &entry.record;
            format!(
                "{}\t{}\t{}\t{}\t{}\t{}\t{}",
                entry.rank,
                entry.value_score,
                r.name,
                r.rent,
                r.cafe_count,
                r.metro_proximity,
                r.safety_index
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Ranking as a pretty-printed JSON array, breakdowns included.
pub fn format_json(entries: &[ScoredNeighborhood]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(entries)
}

/// Ranking as a GeoJSON FeatureCollection of points, for map renderers.
///
/// Records without a location are left out.
pub fn format_geojson(entries: &[ScoredNeighborhood]) -> serde_json::Result<String> {
    let features: Vec<Value> = entries
        .iter()
        .filter_map(|entry| {
            let location = entry.record.location?;
            let r = &entry.record;
            Some(json!({
                "type": "Feature",
                "geometry": {
                    "type": "Point",
                    "coordinates": [location.longitude, location.latitude],
                },
                "properties": {
                    "name": r.name,
                    "neighborhood": r.neighborhood(),
                    "rank": entry.rank,
                    "value_score": entry.value_score,
                    "rent": r.rent,
                    "cafe_count": r.cafe_count,
                    "metro_proximity": r.metro_proximity,
                    "safety_index": r.safety_index,
                },
            }))
        })
        .collect();

    serde_json::to_string_pretty(&json!({
        "type": "FeatureCollection",
        "features": features,
    }))
}

/// One-line summary of the best entry: "Top pick: Indiranagar at ₹28,000 (score 1.42)"
pub fn format_top_pick(entry: &ScoredNeighborhood, use_colors: bool) -> String {
    let name = &entry.record.name;
    let rent = format_rent(entry.record.rent);
    let score = format_score(entry.value_score);
    if use_colors {
        format!("Top pick: {} at {} (score {})", name.bold(), rent.green(), score.bold())
    } else {
        format!("Top pick: {} at {} (score {})", name, rent, score)
    }
}

/// Multi-line detail view with the score breakdown.
///
/// `today` is used to show how long ago a listing was posted.
pub fn format_detail(entry: &ScoredNeighborhood, use_colors: bool, today: NaiveDate) -> String {
    let r = &entry.record;
    let mut lines = Vec::new();

    let title = format!("{}. {}", entry.rank, r.name);
    lines.push(if use_colors {
        title.bold().to_string()
    } else {
        title
    });
    lines.push(format!("  Score: {}", format_score(entry.value_score)));
    lines.push(format!("  Rent: {}", format_rent(r.rent)));

    for factor in &entry.breakdown.factors {
        lines.push(format!(
            "  {}: {} x {} = {}",
            factor.label,
            format_score(factor.value),
            factor.weight,
            format_score(factor.weighted)
        ));
    }
    lines.push(format!(
        "  Weighted sum {} / rent {} = {}",
        format_score(entry.breakdown.numerator()),
        entry.breakdown.rent_divisor,
        format_score(entry.value_score)
    ));

    if let Some(location) = r.location {
        lines.push(format!(
            "  Location: {:.4}, {:.4}",
            location.latitude, location.longitude
        ));
    }

    if let Some(details) = &r.details {
        if let Some(neighborhood) = &details.neighborhood {
            lines.push(format!("  Neighborhood: {}", neighborhood));
        }
        if let Some(km) = details.metro_distance_km {
            lines.push(format!("  Metro distance: {:.1} km", km));
        }
        let mut listing = Vec::new();
        if let Some(bhk) = details.bhk {
            listing.push(format!("{} BHK", bhk));
        }
        if let Some(size) = details.size_sqft {
            listing.push(format!("{} sqft", size));
        }
        if let Some(furnishing) = &details.furnishing {
            listing.push(furnishing.clone());
        }
        if !listing.is_empty() {
            lines.push(format!("  Listing: {}", listing.join(", ")));
        }
        if let Some(posted) = details.posted_on {
            lines.push(format!(
                "  Posted: {} ({} ago)",
                posted,
                format_age(today.signed_duration_since(posted))
            ));
        }
    }

    lines.join("\n")
}
