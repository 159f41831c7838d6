use anyhow::{Context, Result};
use std::io::{BufRead, Write};
use std::path::PathBuf;

use crate::config::{get_config_path, save_config, Config};
use crate::dataset::{DatasetConfig, DatasetFormat, ListingFilter};
use crate::scoring::{Normalization, ScoringOptions, WeightConfig};

/// Prompt user with a message and return their trimmed input.
fn prompt(message: &str) -> Result<String> {
    print!("{}", message);
    std::io::stdout().flush().context("Failed to flush stdout")?;
    let mut input = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut input)
        .context("Failed to read input")?;
    Ok(input.trim().to_string())
}

/// Prompt user with a message and a default value. Returns default if input is empty.
fn prompt_with_default(message: &str, default: &str) -> Result<String> {
    let input = prompt(&format!("{} [{}]: ", message, default))?;
    if input.is_empty() {
        Ok(default.to_string())
    } else {
        Ok(input)
    }
}

/// Prompt user with a yes/no question. Returns bool based on input and default.
fn prompt_yes_no(message: &str, default_yes: bool) -> Result<bool> {
    let hint = if default_yes { "Y/n" } else { "y/N" };
    let input = prompt(&format!("{} [{}]: ", message, hint))?;
    let input = input.to_lowercase();
    if input.is_empty() {
        Ok(default_yes)
    } else {
        Ok(input == "y" || input == "yes")
    }
}

/// Parse a number and check it against `accept`. Empty input never reaches here.
fn parse_number(input: &str, accept: impl Fn(f64) -> bool) -> Result<f64, String> {
    match input.parse::<f64>() {
        Ok(v) if v.is_finite() && accept(v) => Ok(v),
        Ok(_) => Err("out of range".to_string()),
        Err(_) => Err("not a number".to_string()),
    }
}

/// Keep prompting until the answer parses and passes `accept`.
fn prompt_number(message: &str, default: f64, accept: impl Fn(f64) -> bool) -> Result<f64> {
    loop {
        let input = prompt_with_default(message, &default.to_string())?;
        match parse_number(&input, &accept) {
            Ok(v) => break Ok(v),
            Err(e) => println!("  Invalid: {}. Try again.", e),
        }
    }
}

/// Like [`prompt_number`], but "none" (or empty when there is no default) means unset.
fn prompt_optional_number(
    message: &str,
    default: Option<f64>,
    accept: impl Fn(f64) -> bool,
) -> Result<Option<f64>> {
    let default_str = default.map_or_else(|| "none".to_string(), |v| v.to_string());
    loop {
        let input = prompt_with_default(message, &default_str)?;
        if input.eq_ignore_ascii_case("none") {
            break Ok(None);
        }
        match parse_number(&input, &accept) {
            Ok(v) => break Ok(Some(v)),
            Err(e) => println!("  Invalid: {}. Try again.", e),
        }
    }
}

fn parse_format(input: &str) -> Option<DatasetFormat> {
    match input.to_lowercase().as_str() {
        "neighborhoods" | "n" => Some(DatasetFormat::Neighborhoods),
        "house-rent" | "h" => Some(DatasetFormat::HouseRent),
        _ => None,
    }
}

/// Run the interactive init wizard to create a config file.
///
/// If `default_path` is Some, uses that as the config file path.
/// Otherwise, prompts the user with the default config path.
pub fn run_init_wizard(default_path: Option<PathBuf>) -> Result<()> {
    println!();
    println!("Rent Optimizer Configuration Wizard");
    println!("===================================");
    println!();

    // 1. Dataset
    println!("Point the optimizer at a CSV file. Two layouts are understood:");
    println!("  neighborhoods -- name, rent, cafe_count, metro_proximity, safety_index");
    println!("  house-rent    -- the House Rent Dataset listings (geocoded on import)");
    let path = loop {
        let p = prompt("Dataset path: ")?;
        if !p.is_empty() {
            break PathBuf::from(p);
        }
        println!("  Dataset path is required.");
    };
    let format = loop {
        let input = prompt_with_default("Dataset format (neighborhoods/house-rent)", "neighborhoods")?;
        match parse_format(&input) {
            Some(f) => break f,
            None => println!("  Invalid: expected 'neighborhoods' or 'house-rent'. Try again."),
        }
    };
    let mut dataset = DatasetConfig {
        path: Some(path),
        format,
        ..DatasetConfig::default()
    };
    if format == DatasetFormat::HouseRent {
        dataset.city = prompt_with_default("City to keep", &dataset.city)?;
        dataset.aggregate = prompt_yes_no("Rank whole neighborhoods instead of single listings?", true)?;
    }

    // 2. Weights
    println!();
    let defaults = WeightConfig::default();
    let weights = if prompt_yes_no("Configure weights? (n accepts defaults)", true)? {
        println!("Weights set how much each metric matters. 0 ignores a metric entirely.");
        let non_negative = |v: f64| v >= 0.0;
        WeightConfig {
            cafe: prompt_number("Importance of cafes", defaults.cafe, non_negative)?,
            metro: prompt_number("Importance of metro proximity", defaults.metro, non_negative)?,
            safety: prompt_number("Importance of safety", defaults.safety, non_negative)?,
        }
    } else {
        defaults
    };

    // 3. Filters
    println!();
    println!("Filters drop neighborhoods before ranking. Type 'none' to skip one.");
    let filters = ListingFilter {
        max_rent: prompt_optional_number("Max budget (₹)", Some(35000.0), |v| v > 0.0)?,
        min_safety: prompt_optional_number("Minimum safety score (0-10)", Some(7.0), |v| {
            (0.0..=10.0).contains(&v)
        })?,
    };

    // 4. Scoring options
    println!();
    let normalization = if prompt_yes_no(
        "Rescale metrics to 0-1 before weighting (min-max normalization)?",
        false,
    )? {
        Normalization::MinMax
    } else {
        Normalization::None
    };
    let rent_unit = prompt_number("Rent unit (1000 shows scores per thousand rupees)", 1000.0, |v| v > 0.0)?;

    // 5. Config path
    let default_config_path = match default_path {
        Some(p) => p,
        None => get_config_path()?,
    };
    println!();
    let path_str = prompt_with_default(
        "Where should the config be saved?",
        &default_config_path.display().to_string(),
    )?;
    let config_path = PathBuf::from(&path_str);

    // Check if file already exists
    if config_path.exists() {
        let overwrite = prompt_yes_no(
            &format!("Config already exists at {}. Overwrite?", config_path.display()),
            false,
        )?;
        if !overwrite {
            println!("Aborted.");
            return Ok(());
        }
    }

    // 6. Write config
    let config = Config {
        dataset,
        weights,
        filters,
        scoring: ScoringOptions {
            normalization,
            rent_unit,
        },
    };
    save_config(&config_path, &config)?;

    println!();
    println!("Config written to {}", config_path.display());
    println!("Run `rent-optimizer` to see the ranking, or `rent-optimizer dashboard` for sliders.");

    Ok(())
}
