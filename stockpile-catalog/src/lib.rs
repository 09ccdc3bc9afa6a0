pub mod error;
pub mod inventory;
pub mod product;
pub mod report;

pub use error::{CatalogError, CatalogResult};
pub use inventory::{AddOutcome, Inventory, LoadSummary};
pub use product::{Product, ProductKind, ProductType};
pub use report::{LowStockReporter, StockStatus};
pub use stockpile_store::{CatalogRow, Config};
