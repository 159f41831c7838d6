use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Instant;

use rent_optimizer::config::{self, Config};
use rent_optimizer::dataset::{Dataset, DatasetFormat};
use rent_optimizer::output::{self, OutputFormat};
use rent_optimizer::pipeline;
use rent_optimizer::scoring::{Normalization, ScoreError};
use rent_optimizer::tui::{self, Theme};
use tracing_subscriber::EnvFilter;

const EXIT_SUCCESS: i32 = 0;
const EXIT_FAILURE: i32 = 1;
const EXIT_DATA: i32 = 2;
const EXIT_SCORING: i32 = 3;
const EXIT_CONFIG: i32 = 4;

#[derive(Subcommand, Debug, Clone)]
enum Commands {
    /// Print the ranked neighborhoods (default if no subcommand)
    List {
        /// Output layout
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,

        /// Only show the best N neighborhoods
        #[arg(short = 'n', long)]
        top: Option<usize>,
    },
    /// Show the score breakdown for one neighborhood by its rank
    Show {
        /// Rank of the neighborhood (1-based, as shown in list)
        index: usize,
    },
    /// Interactive dashboard with sliders for weights and filters
    Dashboard {
        #[arg(long, value_enum, default_value_t = Theme::Auto)]
        theme: Theme,
    },
    /// Create a config file interactively
    Init,
}

#[derive(Parser, Debug)]
#[command(name = "rent-optimizer")]
#[command(about = "Rank neighborhoods by value for money", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/rent-optimizer/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Dataset CSV (overrides dataset.path)
    #[arg(short, long, global = true)]
    data: Option<PathBuf>,

    /// Dataset layout (overrides dataset.format)
    #[arg(long, value_enum, global = true)]
    dataset_format: Option<DatasetFormat>,

    /// Collapse listings into one row per neighborhood
    #[arg(long, global = true)]
    aggregate: bool,

    /// Weight for cafe count
    #[arg(long, global = true)]
    cafe: Option<f64>,

    /// Weight for metro proximity
    #[arg(long, global = true)]
    metro: Option<f64>,

    /// Weight for safety index
    #[arg(long, global = true)]
    safety: Option<f64>,

    /// Drop neighborhoods with rent above this
    #[arg(long, global = true)]
    max_rent: Option<f64>,

    /// Drop neighborhoods with a safety index below this
    #[arg(long, global = true)]
    min_safety: Option<f64>,

    /// Min-max normalize the metrics before weighting
    #[arg(long, global = true)]
    normalize: bool,

    /// Divide rent by this before scoring (1000 = score per thousand)
    #[arg(long, global = true)]
    rent_unit: Option<f64>,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl Cli {
    /// Fold command-line overrides into the loaded config.
    fn apply_overrides(&self, config: &mut Config) {
        if let Some(path) = &self.data {
            config.dataset.path = Some(path.clone());
        }
        if let Some(format) = self.dataset_format {
            config.dataset.format = format;
        }
        if self.aggregate {
            config.dataset.aggregate = true;
        }
        if let Some(cafe) = self.cafe {
            config.weights.cafe = cafe;
        }
        if let Some(metro) = self.metro {
            config.weights.metro = metro;
        }
        if let Some(safety) = self.safety {
            config.weights.safety = safety;
        }
        if let Some(max_rent) = self.max_rent {
            config.filters.max_rent = Some(max_rent);
        }
        if let Some(min_safety) = self.min_safety {
            config.filters.min_safety = Some(min_safety);
        }
        if self.normalize {
            config.scoring.normalization = Normalization::MinMax;
        }
        if let Some(rent_unit) = self.rent_unit {
            config.scoring.rent_unit = rent_unit;
        }
    }
}

fn init_logging(verbose: bool) {
    let default_directive = if verbose {
        "warn,rent_optimizer=debug"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(rent_optimizer::stderr_buffer::writer)
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config_path = cli.config.as_ref().map(PathBuf::from);

    let command = cli.command.clone().unwrap_or(Commands::List {
        format: OutputFormat::Table,
        top: None,
    });

    if let Commands::Init = command {
        if let Err(e) = config::init::run_init_wizard(config_path) {
            eprintln!("Init failed: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
        std::process::exit(EXIT_SUCCESS);
    }
    let start_time = Instant::now();

    // Load config
    let mut config = match config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };
    cli.apply_overrides(&mut config);

    // Validate the effective config at startup
    if let Err(errors) = config::validate_config(&config) {
        eprintln!("Config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    let Some(data_path) = config.dataset.path.clone() else {
        eprintln!("No dataset configured.");
        eprintln!("Pass --data <file.csv>, run `rent-optimizer init`, or add to ~/.config/rent-optimizer/config.yaml:");
        eprintln!("  dataset:");
        eprintln!("    path: neighborhoods.csv");
        std::process::exit(EXIT_CONFIG);
    };

    let dataset = match Dataset::load(&data_path, &config.dataset) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("Dataset error: {:#}", anyhow::Error::from(e));
            std::process::exit(EXIT_DATA);
        }
    };

    if cli.verbose {
        eprintln!(
            "Loaded {} neighborhoods from {} ({} rows dropped)",
            dataset.len(),
            data_path.display(),
            dataset.dropped
        );
    }

    if let Commands::Dashboard { theme } = &command {
        let app = tui::App::new(
            dataset,
            Some((data_path, config.dataset.clone())),
            &config,
            tui::resolve_theme(*theme),
        );
        if let Err(e) = tui::run_tui(app).await {
            eprintln!("Dashboard error: {:#}", e);
            std::process::exit(EXIT_FAILURE);
        }
        std::process::exit(EXIT_SUCCESS);
    }

    let request = config.rank_request();
    let ranking = match pipeline::rank(&dataset, &request) {
        Ok(r) => r,
        Err(ScoreError::EmptyDataset) if !dataset.is_empty() => {
            // Filters removed everything: not an error, just nothing to show
            rent_optimizer::buffered_eprintln!("{}", pipeline::no_match_hint(&request.filter));
            std::process::exit(EXIT_SUCCESS);
        }
        Err(e) => {
            eprintln!("Scoring error: {}", e);
            std::process::exit(EXIT_SCORING);
        }
    };

    let use_colors = output::should_use_colors();

    match &command {
        Commands::List { format, top } => {
            let shown = match top {
                Some(n) => &ranking.entries[..(*n).min(ranking.entries.len())],
                None => &ranking.entries[..],
            };

            let rendered = match format {
                OutputFormat::Table if cli.verbose => {
                    let today = chrono::Local::now().date_naive();
                    Ok(shown
                        .iter()
                        .map(|entry| output::format_detail(entry, use_colors, today))
                        .collect::<Vec<_>>()
                        .join("\n\n"))
                }
                OutputFormat::Table => {
                    let mut table = output::format_scored_table(shown, use_colors);
                    if let Some(top) = ranking.top() {
                        table = format!("{}\n\n{}", output::format_top_pick(top, use_colors), table);
                    }
                    Ok(table)
                }
                OutputFormat::Tsv => Ok(output::format_tsv(shown)),
                OutputFormat::Json => output::format_json(shown),
                OutputFormat::Geojson => output::format_geojson(shown),
            };

            match rendered {
                Ok(text) => println!("{}", text),
                Err(e) => {
                    eprintln!("Failed to render output: {}", e);
                    std::process::exit(EXIT_FAILURE);
                }
            }

            if cli.verbose {
                eprintln!();
                eprintln!(
                    "Total: {} ranked, {} filtered out, in {:?}",
                    ranking.entries.len(),
                    ranking.filtered_out,
                    start_time.elapsed()
                );
            }
        }
        Commands::Show { index } => {
            // Validate index bounds (1-based)
            let index = *index;
            if index < 1 || index > ranking.entries.len() {
                eprintln!(
                    "Invalid index {}. Must be between 1 and {}.",
                    index,
                    ranking.entries.len()
                );
                std::process::exit(EXIT_CONFIG);
            }

            let today = chrono::Local::now().date_naive();
            println!(
                "{}",
                output::format_detail(&ranking.entries[index - 1], use_colors, today)
            );
        }
        Commands::Dashboard { .. } | Commands::Init => {}
    }

    std::process::exit(EXIT_SUCCESS);
}
