//! locc-sampler CLI: count and sample library volumes by LOCC category.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};
use rand::SeedableRng;

use locc_sampler::category::{validate_category_string, FallbackPolicy};
use locc_sampler::config::SamplerConfig;
use locc_sampler::engine::Sampler;

#[derive(Parser)]
#[command(name = "locc-sampler", version, about = "Stratified sampling over an LOCC outline")]
struct Cli {
    /// TOML config file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Outline file (one category per line). Overrides the config.
    #[arg(long, global = true)]
    outline: Option<PathBuf>,

    /// Volume call-number listing. Overrides the config.
    #[arg(long, global = true)]
    volumes: Option<PathBuf>,

    /// Report a miss instead of degrading to the enclosing category.
    #[arg(long, global = true)]
    strict: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Count the volumes under a category.
    Count {
        /// Category, e.g. "QH301-705.5".
        category: String,
    },

    /// Draw a stratified random sample of volumes from a category.
    Sample {
        /// Category, e.g. "QH301-705.5".
        category: String,

        /// Number of volumes to draw.
        size: usize,

        /// Seed for a reproducible draw.
        #[arg(long)]
        seed: Option<u64>,

        /// Print the sample as a JSON array.
        #[arg(long)]
        json: bool,
    },

    /// Show which outline node a category resolves to.
    Find {
        category: String,
    },

    /// Check a string against the category grammar.
    Validate {
        category: String,
    },

    /// Show outline and load statistics.
    Info {
        /// Print as JSON.
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))
    .ok(); // Ignore error if hook already set (e.g., in tests)

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Commands::Validate { category } = &cli.command {
        let verdict = if validate_category_string(category) {
            "valid"
        } else {
            "malformed"
        };
        println!("{category}: {verdict}");
        return Ok(());
    }

    let mut config = match &cli.config {
        Some(path) => SamplerConfig::load(path)?,
        None => SamplerConfig::default(),
    };
    if cli.outline.is_some() {
        config.outline = cli.outline.clone();
    }
    if cli.volumes.is_some() {
        config.volumes = cli.volumes.clone();
    }
    if cli.strict {
        config.fallback = FallbackPolicy::Strict;
    }

    let sampler = Sampler::open(config)?;

    match cli.command {
        Commands::Count { category } => {
            let count = sampler.count(&category)?;
            println!("{category}: {count}");
        }

        Commands::Sample {
            category,
            size,
            seed,
            json,
        } => {
            let volumes = match seed {
                Some(seed) => {
                    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
                    sampler.tree().sample_with(&category, size, &mut rng)?
                }
                None => sampler.sample(&category, size)?,
            };
            if json {
                println!("{}", serde_json::to_string_pretty(&volumes).into_diagnostic()?);
            } else {
                for id in &volumes {
                    println!("{id}");
                }
            }
        }

        Commands::Find { category } => {
            let node = sampler.tree().resolve(&category)?;
            println!("{category} -> {node}");
            if let Some(range) = node.range() {
                println!("  range:    {range}");
            }
            println!("  children: {}", node.children_count());
            for child in node.children() {
                println!("    {child} ({})", child.id_count());
            }
            println!("  volumes:  {} ({} here)", node.id_count(), node.own_ids().len());
        }

        Commands::Info { json } => {
            let info = sampler.info();
            if json {
                println!("{}", serde_json::to_string_pretty(&info).into_diagnostic()?);
            } else {
                println!("{info}");
            }
        }

        Commands::Validate { .. } => {}
    }

    Ok(())
}
