use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use grocer::config::Config;
use grocer_shopping::Resolution;

/// grocer - Shopping list consolidation
#[derive(Parser)]
#[command(name = "grocer")]
#[command(about = "Consolidate recipe ingredients into a shopping list", long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse ingredient lines into quantity, unit, name and notes
    Parse {
        /// Ingredient lines, e.g. "1 1/2 cups flour (sifted)"
        #[arg(required = true)]
        lines: Vec<String>,
    },
    /// Combine two quantity/unit pairs ("-" for an absent value)
    Combine {
        quantity_a: String,
        unit_a: String,
        quantity_b: String,
        unit_b: String,
    },
    /// Classify recipe ingredients against an existing shopping list
    Reconcile {
        /// JSON array of recipes: recipe_id, recipe_title, multiplier, lines
        #[arg(long)]
        recipes: PathBuf,

        /// JSON array of current list items
        #[arg(long)]
        list: PathBuf,

        /// Also print the list mutations that accept every result
        #[arg(long)]
        plan: bool,
    },
    /// Find items on a shopping list that look like the same ingredient
    Duplicates {
        /// JSON array of current list items
        #[arg(long)]
        list: PathBuf,

        /// Print the mutations for this resolution (merge, keep_separate)
        #[arg(long)]
        resolve: Option<Resolution>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(cli.config.clone())?;
    config.validate().map_err(|e| anyhow::anyhow!(e))?;

    // Initialize observability (tracing + logging)
    grocer::observability::init_observability(
        "grocer",
        env!("CARGO_PKG_VERSION"),
        &config.observability.log_level,
        config.observability.log_format().map_err(|e| anyhow::anyhow!(e))?,
    )?;

    let mut stdout = std::io::stdout().lock();

    match cli.command {
        Commands::Parse { lines } => grocer::cli::parse(&config, &lines, &mut stdout),
        Commands::Combine {
            quantity_a,
            unit_a,
            quantity_b,
            unit_b,
        } => grocer::cli::combine(&config, &quantity_a, &unit_a, &quantity_b, &unit_b, &mut stdout),
        Commands::Reconcile { recipes, list, plan } => {
            grocer::cli::reconcile(&config, &recipes, &list, plan, &mut stdout)
        }
        Commands::Duplicates { list, resolve } => grocer::cli::duplicates(&config, &list, resolve, &mut stdout),
    }
}
