use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{StoreError, StoreResult};

/// Catalog columns in file order
pub const COLUMNS: [&str; 8] = [
    "product_id",
    "product_name",
    "quantity",
    "price",
    "type",
    "days_to_expire",
    "is_vegetarian",
    "warranty_period_in_years",
];

/// Columns a catalog header must name. The type-specific columns may be left out.
pub const REQUIRED_COLUMNS: [&str; 5] = ["product_id", "product_name", "quantity", "price", "type"];

/// One undecoded catalog row. Every field is kept as text; absence is the
/// empty string, as in the file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogRow {
    pub product_id: String,
    pub product_name: String,
    pub quantity: String,
    pub price: String,
    #[serde(rename = "type")]
    pub product_type: String,
    #[serde(default)]
    pub days_to_expire: String,
    #[serde(default)]
    pub is_vegetarian: String,
    #[serde(default)]
    pub warranty_period_in_years: String,
}

impl CatalogRow {
    pub fn new(
        product_id: impl Into<String>,
        product_name: impl Into<String>,
        quantity: impl ToString,
        price: impl ToString,
        product_type: impl Into<String>,
    ) -> Self {
        Self {
            product_id: product_id.into(),
            product_name: product_name.into(),
            quantity: quantity.to_string(),
            price: price.to_string(),
            product_type: product_type.into(),
            ..Default::default()
        }
    }

    pub fn with_days_to_expire(mut self, days: impl ToString) -> Self {
        self.days_to_expire = days.to_string();
        self
    }

    pub fn with_is_vegetarian(mut self, value: impl Into<String>) -> Self {
        self.is_vegetarian = value.into();
        self
    }

    pub fn with_warranty_period_in_years(mut self, years: impl ToString) -> Self {
        self.warranty_period_in_years = years.to_string();
        self
    }

    /// Field values in [`COLUMNS`] order
    pub fn values(&self) -> [&str; 8] {
        [
            &self.product_id,
            &self.product_name,
            &self.quantity,
            &self.price,
            &self.product_type,
            &self.days_to_expire,
            &self.is_vegetarian,
            &self.warranty_period_in_years,
        ]
    }
}

/// A data row together with the line it was read from
#[derive(Debug)]
pub struct CatalogRecord {
    pub line: u64,
    pub row: Result<CatalogRow, csv::Error>,
}

/// Reads every data row of a catalog file.
///
/// Failing to open the file, or a header without one of [`REQUIRED_COLUMNS`],
/// fails the whole read. A row that cannot be decoded is returned as an
/// `Err` in its [`CatalogRecord`] so the caller can skip it.
pub fn read_catalog(path: impl AsRef<Path>) -> StoreResult<Vec<CatalogRecord>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| StoreError::FileAccess {
        path: path.to_path_buf(),
        source,
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(BufReader::new(file));

    let headers = reader.headers()?.clone();
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|header| header == column) {
            return Err(StoreError::MissingColumn {
                path: path.to_path_buf(),
                column,
            });
        }
    }

    let mut records = Vec::new();
    for (index, result) in reader.records().enumerate() {
        // header occupies line 1
        let fallback_line = index as u64 + 2;
        match result {
            Ok(record) => {
                let line = record.position().map_or(fallback_line, |pos| pos.line());
                records.push(CatalogRecord {
                    line,
                    row: record.deserialize(Some(&headers)),
                });
            }
            Err(err) if err.is_io_error() => return Err(err.into()),
            Err(err) => {
                let line = err.position().map_or(fallback_line, |pos| pos.line());
                records.push(CatalogRecord { line, row: Err(err) });
            }
        }
    }

    debug!(path = %path.display(), rows = records.len(), "read catalog");
    Ok(records)
}

/// Writes a full catalog (header plus rows), replacing the file if it exists.
pub fn write_catalog(path: impl AsRef<Path>, rows: &[CatalogRow]) -> StoreResult<()> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|source| StoreError::FileAccess {
        path: path.to_path_buf(),
        source,
    })?;

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(BufWriter::new(file));
    writer.write_record(COLUMNS)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    debug!(path = %path.display(), rows = rows.len(), "wrote catalog");
    Ok(())
}
