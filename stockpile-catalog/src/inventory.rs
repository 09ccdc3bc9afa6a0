use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use stockpile_store::{read_catalog, write_catalog, CatalogRow, Config};
use tracing::{debug, error, info, warn};

use crate::error::{CatalogError, CatalogResult};
use crate::product::{Product, ProductType};
use crate::report::LowStockReporter;

/// Result of a single insertion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    /// The id was already present; nothing changed
    Duplicate,
}

/// Row counts from a bulk load
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadSummary {
    pub loaded: usize,
    pub invalid: usize,
    pub duplicates: usize,
}

/// In-memory product catalog, kept in insertion order and keyed by `product_id`
pub struct Inventory {
    products: Vec<Product>,
    index: HashMap<String, usize>,
    reporter: LowStockReporter,
}

impl Inventory {
    pub fn new(config: Arc<Config>) -> Self {
        Self {
            products: Vec::new(),
            index: HashMap::new(),
            reporter: LowStockReporter::new(config),
        }
    }

    /// Bulk load. Rows that fail to decode or validate are logged and
    /// skipped; only an unreadable file fails the call.
    pub fn load_from_csv(&mut self, path: impl AsRef<Path>) -> CatalogResult<LoadSummary> {
        let path = path.as_ref();
        let mut summary = LoadSummary::default();

        for record in read_catalog(path)? {
            let row = match record.row {
                Ok(row) => row,
                Err(err) => {
                    warn!(line = record.line, error = %err, "skipping undecodable catalog row");
                    summary.invalid += 1;
                    continue;
                }
            };

            match self.add_product(&row) {
                Ok(AddOutcome::Added) => summary.loaded += 1,
                Ok(AddOutcome::Duplicate) => summary.duplicates += 1,
                Err(err) => {
                    error!(
                        line = record.line,
                        product_id = %row.product_id,
                        message = %err,
                        "skipping invalid catalog row"
                    );
                    summary.invalid += 1;
                }
            }
        }

        info!(
            path = %path.display(),
            loaded = summary.loaded,
            invalid = summary.invalid,
            duplicates = summary.duplicates,
            "catalog loaded"
        );
        Ok(summary)
    }

    /// Validates and appends a row. Validation failures are returned; a
    /// duplicate id is logged and reported as [`AddOutcome::Duplicate`].
    pub fn add_product(&mut self, row: &CatalogRow) -> CatalogResult<AddOutcome> {
        let product = Product::try_from(row)?;
        Ok(self.insert(product))
    }

    pub fn insert(&mut self, product: Product) -> AddOutcome {
        if self.index.contains_key(&product.product_id) {
            warn!(product_id = %product.product_id, "product already exists, not added");
            return AddOutcome::Duplicate;
        }

        debug!(product_id = %product.product_id, product_type = %product.product_type(), "product added");
        self.index.insert(product.product_id.clone(), self.products.len());
        self.products.push(product);
        AddOutcome::Added
    }

    /// Overwrites the quantity of an existing product. Negative quantities
    /// are rejected.
    pub fn update_stock(&mut self, product_id: &str, new_quantity: i64) -> CatalogResult<()> {
        let position = self.position(product_id)?;
        let quantity =
            u32::try_from(new_quantity).map_err(|_| CatalogError::InvalidQuantity(new_quantity))?;

        let product = &mut self.products[position];
        let previous = std::mem::replace(&mut product.quantity, quantity);
        info!(product_id, previous, quantity, "stock updated");
        Ok(())
    }

    /// Appends the low-stock products to the configured report and returns
    /// their ids.
    pub fn generate_low_quantity_report(&self) -> CatalogResult<Vec<String>> {
        self.reporter.write_report(&self.products)
    }

    pub fn low_stock(&self) -> Vec<&Product> {
        self.reporter.low_stock(&self.products)
    }

    pub fn reporter(&self) -> &LowStockReporter {
        &self.reporter
    }

    pub fn get(&self, product_id: &str) -> CatalogResult<&Product> {
        self.position(product_id).map(|position| &self.products[position])
    }

    pub fn find_by_name(&self, product_name: &str) -> Option<&Product> {
        let wanted = product_name.trim();
        self.products
            .iter()
            .find(|product| product.product_name == wanted)
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Distinct product types, in the order they first appear
    pub fn product_types(&self) -> Vec<ProductType> {
        let mut seen = Vec::new();
        for product in &self.products {
            let product_type = product.product_type();
            if !seen.contains(&product_type) {
                seen.push(product_type);
            }
        }
        seen
    }

    /// Rewrites `path` with the full catalog
    pub fn save_to_csv(&self, path: impl AsRef<Path>) -> CatalogResult<()> {
        let rows: Vec<CatalogRow> = self.products.iter().map(Product::to_row).collect();
        write_catalog(path.as_ref(), &rows)?;
        info!(path = %path.as_ref().display(), products = rows.len(), "catalog saved");
        Ok(())
    }

    fn position(&self, product_id: &str) -> CatalogResult<usize> {
        self.index
            .get(product_id)
            .copied()
            .ok_or_else(|| CatalogError::NotFound(product_id.to_string()))
    }
}

impl Default for Inventory {
    fn default() -> Self {
        Self::new(Arc::new(Config::default()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::product::ProductKind;

    #[test]
    fn test_inventory_lifecycle() {
        let mut inventory = Inventory::default();
        assert!(inventory.is_empty());

        // Add
        let row = CatalogRow::new("P001", "Widget", 150, "20.00", "regular");
        assert_eq!(inventory.add_product(&row).unwrap(), AddOutcome::Added);
        assert_eq!(inventory.len(), 1);

        // Duplicate
        let again = CatalogRow::new("P001", "Other widget", 1, "2.00", "food");
        assert_eq!(inventory.add_product(&again).unwrap(), AddOutcome::Duplicate);
        assert_eq!(inventory.len(), 1);
        assert_eq!(inventory.get("P001").unwrap().product_name, "Widget");

        // Update
        inventory.update_stock("P001", 200).unwrap();
        let product = inventory.get("P001").unwrap();
        assert_eq!(product.quantity, 200);
        assert_eq!(product.price, 20.0);
        assert_eq!(product.kind, ProductKind::Regular);
    }

    #[test]
    fn test_update_stock_unknown_id() {
        let mut inventory = Inventory::default();
        inventory
            .add_product(&CatalogRow::new("P001", "Widget", 150, "20.00", "regular"))
            .unwrap();

        let err = inventory.update_stock("P999", 200).unwrap_err();
        assert!(matches!(err, CatalogError::NotFound(ref id) if id == "P999"));
        assert_eq!(inventory.get("P001").unwrap().quantity, 150);
    }

    #[test]
    fn test_update_stock_rejects_negative() {
        let mut inventory = Inventory::default();
        inventory
            .add_product(&CatalogRow::new("P001", "Widget", 150, "20.00", "regular"))
            .unwrap();

        let err = inventory.update_stock("P001", -1).unwrap_err();
        assert!(matches!(err, CatalogError::InvalidQuantity(-1)));
        assert_eq!(inventory.get("P001").unwrap().quantity, 150);

        inventory.update_stock("P001", 0).unwrap();
        assert_eq!(inventory.get("P001").unwrap().quantity, 0);
    }

    #[test]
    fn test_add_product_surfaces_validation_errors() {
        let mut inventory = Inventory::default();
        let row = CatalogRow::new("P001", "Widget", 150, "20.00", "gadget");
        assert!(matches!(
            inventory.add_product(&row),
            Err(CatalogError::UnknownProductType(_))
        ));
        assert!(inventory.is_empty());
    }

    #[test]
    fn test_queries() {
        let mut inventory = Inventory::default();
        for row in [
            CatalogRow::new("P001", "Widget", 150, "20.00", "regular"),
            CatalogRow::new("P002", "Snack Bar", 5, "3.50", "food"),
            CatalogRow::new("P003", "Apple", 80, "0.50", "food"),
            CatalogRow::new("P004", "Kettle", 12, "45.00", "electronic"),
        ] {
            inventory.add_product(&row).unwrap();
        }

        assert_eq!(inventory.find_by_name("Snack Bar").unwrap().product_id, "P002");
        assert!(inventory.find_by_name("Toaster").is_none());
        assert_eq!(
            inventory.product_types(),
            vec![ProductType::Regular, ProductType::Food, ProductType::Electronic]
        );
        let low: Vec<&str> = inventory.low_stock().iter().map(|p| p.product_id.as_str()).collect();
        assert_eq!(low, vec!["P002"]);
        assert!(matches!(inventory.get("P404"), Err(CatalogError::NotFound(_))));
    }
}
