use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};

pub const DEFAULT_LOW_QUANTITY_THRESHOLD: u32 = 10;
pub const DEFAULT_CATALOG_PATH: &str = "inventory.csv";
pub const DEFAULT_REPORT_PATH: &str = "low_stock_report.txt";

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Config {
    pub inventory: InventoryConfig,
    pub report: ReportConfig,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct InventoryConfig {
    pub catalog_path: PathBuf,
    /// Quantities strictly below this value are flagged as low stock
    pub low_quantity_threshold: u32,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ReportConfig {
    pub path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            inventory: InventoryConfig {
                catalog_path: PathBuf::from(DEFAULT_CATALOG_PATH),
                low_quantity_threshold: DEFAULT_LOW_QUANTITY_THRESHOLD,
            },
            report: ReportConfig {
                path: PathBuf::from(DEFAULT_REPORT_PATH),
            },
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from(None)
    }

    /// Same layering as [`Config::load`], with `explicit` merged on top of the
    /// `config/` files. An explicit file must exist.
    pub fn load_from(explicit: Option<&Path>) -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let mut builder = config::Config::builder()
            .set_default("inventory.catalog_path", DEFAULT_CATALOG_PATH)?
            .set_default(
                "inventory.low_quantity_threshold",
                i64::from(DEFAULT_LOW_QUANTITY_THRESHOLD),
            )?
            .set_default("report.path", DEFAULT_REPORT_PATH)?
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            .add_source(config::File::with_name("config/local").required(false));

        if let Some(path) = explicit {
            builder = builder.add_source(config::File::from(path));
        }

        // Eg.. `STOCKPILE__INVENTORY__LOW_QUANTITY_THRESHOLD=5`
        let s = builder
            .add_source(
                config::Environment::with_prefix("STOCKPILE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        s.try_deserialize()
    }

    pub fn low_quantity_threshold(&self) -> u32 {
        self.inventory.low_quantity_threshold
    }
}
