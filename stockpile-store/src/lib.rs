pub mod app_config;
pub mod catalog_file;
pub mod error;
pub mod report_file;

pub use app_config::Config;
pub use catalog_file::{read_catalog, write_catalog, CatalogRecord, CatalogRow, COLUMNS};
pub use error::{StoreError, StoreResult};
pub use report_file::{append_line, append_lines};
