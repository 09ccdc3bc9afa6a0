use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use stockpile_catalog::{CatalogError, CatalogRow, Config, Inventory};
use stockpile_store::StoreError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "stockpile", version, about = "CSV-backed inventory catalog")]
struct Cli {
    /// Configuration file, layered over config/default and the environment
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Catalog file (overrides inventory.catalog_path)
    #[arg(long)]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print every product in the catalog
    List,

    /// Append low-stock products to the report file
    Report,

    /// Look a product up by name
    Search {
        name: String,
    },

    /// Overwrite the quantity of a product
    UpdateStock {
        product_id: String,

        #[arg(allow_negative_numbers = true)]
        quantity: i64,

        /// Rewrite the catalog file afterwards
        #[arg(long)]
        save: bool,
    },

    /// Add a product
    Add {
        #[arg(long)]
        id: String,

        #[arg(long)]
        name: String,

        #[arg(long, allow_hyphen_values = true)]
        quantity: String,

        #[arg(long, allow_hyphen_values = true)]
        price: String,

        /// regular, food or electronic
        #[arg(long = "type")]
        product_type: String,

        #[arg(long)]
        days_to_expire: Option<String>,

        /// yes or no
        #[arg(long)]
        vegetarian: Option<String>,

        /// Warranty period in years
        #[arg(long)]
        warranty: Option<String>,

        /// Rewrite the catalog file afterwards
        #[arg(long)]
        save: bool,
    },

    /// Check a raw quantity against the low-stock threshold
    Check {
        #[arg(allow_hyphen_values = true)]
        quantity: String,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stockpile=info,stockpile_catalog=info,stockpile_store=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();

    let config = Config::load_from(cli.config.as_deref()).context("Failed to load config")?;
    let catalog_path = cli
        .catalog
        .clone()
        .unwrap_or_else(|| config.inventory.catalog_path.clone());
    tracing::debug!(catalog = %catalog_path.display(), threshold = config.low_quantity_threshold(), "configuration loaded");

    let mut inventory = Inventory::new(Arc::new(config));
    let mut out = io::stdout().lock();

    match cli.command {
        Commands::List => {
            load(&mut inventory, &catalog_path, false)?;
            commands::list(&inventory, chrono::Local::now().date_naive(), &mut out)?;
        }
        Commands::Report => {
            load(&mut inventory, &catalog_path, false)?;
            commands::report(&inventory, &mut out)?;
        }
        Commands::Search { name } => {
            load(&mut inventory, &catalog_path, false)?;
            commands::search(&inventory, &name, &mut out)?;
        }
        Commands::UpdateStock {
            product_id,
            quantity,
            save,
        } => {
            load(&mut inventory, &catalog_path, false)?;
            commands::update_stock(&mut inventory, &product_id, quantity, &mut out)?;
            if save {
                inventory
                    .save_to_csv(&catalog_path)
                    .with_context(|| format!("Failed to save {}", catalog_path.display()))?;
            }
        }
        Commands::Add {
            id,
            name,
            quantity,
            price,
            product_type,
            days_to_expire,
            vegetarian,
            warranty,
            save,
        } => {
            load(&mut inventory, &catalog_path, true)?;
            let row = CatalogRow {
                days_to_expire: days_to_expire.unwrap_or_default(),
                is_vegetarian: vegetarian.unwrap_or_default(),
                warranty_period_in_years: warranty.unwrap_or_default(),
                ..CatalogRow::new(id, name, quantity, price, product_type)
            };
            let added = commands::add(&mut inventory, &row, &mut out)?;
            if save && added {
                inventory
                    .save_to_csv(&catalog_path)
                    .with_context(|| format!("Failed to save {}", catalog_path.display()))?;
            }
        }
        Commands::Check { quantity } => {
            commands::check(&inventory, &quantity, &mut out)?;
        }
    }

    Ok(())
}

/// Loads the catalog. With `allow_missing`, an absent file leaves the
/// inventory empty instead of failing.
fn load(inventory: &mut Inventory, path: &std::path::Path, allow_missing: bool) -> Result<()> {
    match inventory.load_from_csv(path) {
        Ok(_) => Ok(()),
        Err(CatalogError::Store(StoreError::FileAccess { ref source, .. }))
            if allow_missing && source.kind() == io::ErrorKind::NotFound =>
        {
            tracing::warn!(path = %path.display(), "catalog not found, starting empty");
            Ok(())
        }
        Err(err) => Err(err).with_context(|| format!("Failed to load {}", path.display())),
    }
}
