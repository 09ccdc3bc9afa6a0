use std::path::Path;
use std::sync::Arc;

use stockpile_store::{append_line, append_lines, Config};
use tracing::{debug, info};

use crate::error::{CatalogError, CatalogResult};
use crate::product::Product;

/// Outcome of looking at a single product's stock
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StockStatus {
    /// Below the threshold; the product has been appended to the report
    Low,
    OutOfStock,
    /// Enough stock, with a one-line summary for display
    Available(String),
}

/// Flags products whose quantity is under the configured threshold
#[derive(Debug, Clone)]
pub struct LowStockReporter {
    config: Arc<Config>,
}

impl LowStockReporter {
    pub fn new(config: Arc<Config>) -> Self {
        Self { config }
    }

    pub fn threshold(&self) -> u32 {
        self.config.low_quantity_threshold()
    }

    pub fn report_path(&self) -> &Path {
        &self.config.report.path
    }

    /// `quantity == threshold` is not low
    pub fn check_low_stock(&self, quantity: u32) -> bool {
        quantity < self.threshold()
    }

    /// Untyped variant of [`check_low_stock`](Self::check_low_stock) for raw
    /// user or file input.
    pub fn check_low_stock_value(&self, raw: &str) -> CatalogResult<bool> {
        let quantity = raw
            .trim()
            .parse::<i64>()
            .map_err(|_| CatalogError::TypeMismatch(raw.to_string()))?;
        Ok(quantity < i64::from(self.threshold()))
    }

    pub fn low_stock<'a>(&self, products: &'a [Product]) -> Vec<&'a Product> {
        products
            .iter()
            .filter(|product| self.check_low_stock(product.quantity))
            .collect()
    }

    /// Appends every low-stock product to the configured report file and
    /// returns their ids in catalog order.
    pub fn write_report(&self, products: &[Product]) -> CatalogResult<Vec<String>> {
        self.write_report_to(products, self.report_path())
    }

    pub fn write_report_to(&self, products: &[Product], path: &Path) -> CatalogResult<Vec<String>> {
        let flagged = self.low_stock(products);
        let written = append_lines(path, flagged.iter().map(|product| product.report_line()))?;
        info!(
            path = %path.display(),
            flagged = written,
            threshold = self.threshold(),
            "low stock report written"
        );
        Ok(flagged
            .into_iter()
            .map(|product| product.product_id.clone())
            .collect())
    }

    /// Single-product lookup: a low product is appended to the report, any
    /// other product gets a displayable summary.
    pub fn check_low_stock_or_print_details(&self, product: &Product) -> CatalogResult<StockStatus> {
        // Zero stock is kept out of the report on this path only. Earlier
        // revisions of the lookup disagreed: the typed check treated 0 as
        // "nothing to report", while the raw-string check reported it.
        if product.quantity == 0 {
            debug!(product_id = %product.product_id, "out of stock");
            return Ok(StockStatus::OutOfStock);
        }
        if self.check_low_stock(product.quantity) {
            append_line(self.report_path(), &product.report_line())?;
            info!(
                product_id = %product.product_id,
                quantity = product.quantity,
                "product is low on stock"
            );
            return Ok(StockStatus::Low);
        }
        Ok(StockStatus::Available(product.availability()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::product::ProductKind;
    use std::fs;

    fn reporter_writing_to(path: &Path) -> LowStockReporter {
        let mut config = Config::default();
        config.report.path = path.to_path_buf();
        LowStockReporter::new(Arc::new(config))
    }

    fn regular(id: &str, quantity: u32) -> Product {
        Product::new(id, format!("Item {}", id), quantity, 5.0, ProductKind::Regular).unwrap()
    }

    #[test]
    fn test_threshold_boundary() {
        let reporter = LowStockReporter::new(Arc::new(Config::default()));
        assert!(reporter.check_low_stock(0));
        assert!(reporter.check_low_stock(9));
        assert!(!reporter.check_low_stock(10));
        assert!(!reporter.check_low_stock(11));
    }

    #[test]
    fn test_custom_threshold() {
        let mut config = Config::default();
        config.inventory.low_quantity_threshold = 3;
        let reporter = LowStockReporter::new(Arc::new(config));
        assert!(reporter.check_low_stock(2));
        assert!(!reporter.check_low_stock(3));
    }

    #[test]
    fn test_check_low_stock_value_rejects_text() {
        let reporter = LowStockReporter::new(Arc::new(Config::default()));
        assert!(reporter.check_low_stock_value(" 9 ").unwrap());
        assert!(!reporter.check_low_stock_value("10").unwrap());
        assert!(matches!(
            reporter.check_low_stock_value("abc"),
            Err(CatalogError::TypeMismatch(ref raw)) if raw == "abc"
        ));
    }

    #[test]
    fn test_write_report_appends_flagged_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("low_stock_report.txt");
        let reporter = reporter_writing_to(&path);
        let products = vec![regular("P001", 150), regular("P002", 4), regular("P003", 10), regular("P004", 0)];

        let flagged = reporter.write_report(&products).unwrap();
        assert_eq!(flagged, vec!["P002", "P004"]);

        reporter.write_report(&products).unwrap();
        let contents = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("product_id: P002, "));
        assert!(lines[1].starts_with("product_id: P004, "));
        assert!(contents.ends_with('\n'));
    }

    #[test]
    fn test_lookup_statuses() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.txt");
        let reporter = reporter_writing_to(&path);

        assert_eq!(
            reporter.check_low_stock_or_print_details(&regular("P001", 0)).unwrap(),
            StockStatus::OutOfStock
        );
        assert!(!path.exists());

        match reporter.check_low_stock_or_print_details(&regular("P002", 40)).unwrap() {
            StockStatus::Available(summary) => assert_eq!(summary, "Item P002 is $5.00, available quantity 40"),
            other => panic!("unexpected status {:?}", other),
        }

        assert_eq!(
            reporter.check_low_stock_or_print_details(&regular("P003", 2)).unwrap(),
            StockStatus::Low
        );
        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("product_id: P003, product_name: Item P003, quantity: 2"));
    }
}
