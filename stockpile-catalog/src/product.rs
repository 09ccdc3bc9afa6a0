use std::fmt;
use std::str::FromStr;

use chrono::{Days, NaiveDate};
use stockpile_store::{CatalogRow, COLUMNS};

use crate::error::{CatalogError, CatalogResult};

/// Product types in the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProductType {
    Regular,
    Food,
    Electronic,
}

impl ProductType {
    pub const ALL: [ProductType; 3] = [ProductType::Regular, ProductType::Food, ProductType::Electronic];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProductType::Regular => "regular",
            ProductType::Food => "food",
            ProductType::Electronic => "electronic",
        }
    }
}

impl fmt::Display for ProductType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProductType {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim();
        ProductType::ALL
            .into_iter()
            .find(|kind| kind.as_str() == value)
            .ok_or_else(|| CatalogError::UnknownProductType(value.to_string()))
    }
}

/// Type tag plus the attributes that only make sense for that type
#[derive(Debug, Clone, PartialEq)]
pub enum ProductKind {
    Regular,
    Food {
        days_to_expire: Option<u32>,
        is_vegetarian: Option<bool>,
    },
    Electronic {
        warranty_period_in_years: Option<f64>,
    },
}

impl ProductKind {
    pub fn product_type(&self) -> ProductType {
        match self {
            ProductKind::Regular => ProductType::Regular,
            ProductKind::Food { .. } => ProductType::Food,
            ProductKind::Electronic { .. } => ProductType::Electronic,
        }
    }
}

/// A validated catalog entry
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub product_id: String,
    pub product_name: String,
    pub quantity: u32,
    pub price: f64,
    pub kind: ProductKind,
}

impl Product {
    /// Builds a product from already-typed values, applying the same rules as
    /// [`Product::from_row`].
    pub fn new(
        product_id: impl Into<String>,
        product_name: impl Into<String>,
        quantity: u32,
        price: f64,
        kind: ProductKind,
    ) -> CatalogResult<Self> {
        let product_id = product_id.into();
        let product_name = product_name.into();
        require_text(&product_id, "product_id", &product_id)?;
        require_text(&product_id, "product_name", &product_name)?;
        check_price(&product_id, price)?;
        if let ProductKind::Electronic {
            warranty_period_in_years: Some(years),
        } = kind
        {
            check_warranty(&product_id, years)?;
        }

        Ok(Self {
            product_id: product_id.trim().to_string(),
            product_name: product_name.trim().to_string(),
            quantity,
            price,
            kind,
        })
    }

    /// Validates a raw catalog row.
    ///
    /// Empty type-specific fields become `None`. Fields belonging to another
    /// product type are dropped without being looked at.
    pub fn from_row(row: &CatalogRow) -> CatalogResult<Self> {
        let id = row.product_id.trim();
        require_text(id, "product_id", id)?;
        require_text(id, "product_name", &row.product_name)?;

        let quantity = row.quantity.trim().parse::<u32>().map_err(|_| {
            CatalogError::validation(
                id,
                format!("quantity must be a non-negative integer, got `{}`", row.quantity),
            )
        })?;
        let price = row.price.trim().parse::<f64>().map_err(|_| {
            CatalogError::validation(id, format!("price must be a number, got `{}`", row.price))
        })?;
        check_price(id, price)?;

        let kind = match row.product_type.parse::<ProductType>()? {
            ProductType::Regular => ProductKind::Regular,
            ProductType::Food => ProductKind::Food {
                days_to_expire: parse_optional(id, "days_to_expire", &row.days_to_expire, |raw| {
                    raw.parse::<u32>().ok()
                })?,
                is_vegetarian: parse_optional(id, "is_vegetarian", &row.is_vegetarian, parse_flag)?,
            },
            ProductType::Electronic => {
                let warranty = parse_optional(
                    id,
                    "warranty_period_in_years",
                    &row.warranty_period_in_years,
                    |raw| raw.parse::<f64>().ok(),
                )?;
                if let Some(years) = warranty {
                    check_warranty(id, years)?;
                }
                ProductKind::Electronic {
                    warranty_period_in_years: warranty,
                }
            }
        };

        Ok(Self {
            product_id: id.to_string(),
            product_name: row.product_name.trim().to_string(),
            quantity,
            price,
            kind,
        })
    }

    pub fn product_type(&self) -> ProductType {
        self.kind.product_type()
    }

    pub fn days_to_expire(&self) -> Option<u32> {
        match self.kind {
            ProductKind::Food { days_to_expire, .. } => days_to_expire,
            _ => None,
        }
    }

    pub fn is_vegetarian(&self) -> Option<bool> {
        match self.kind {
            ProductKind::Food { is_vegetarian, .. } => is_vegetarian,
            _ => None,
        }
    }

    pub fn warranty_period_in_years(&self) -> Option<f64> {
        match self.kind {
            ProductKind::Electronic {
                warranty_period_in_years,
            } => warranty_period_in_years,
            _ => None,
        }
    }

    /// Date the product expires when stocked on `today`. Only food with a
    /// known shelf life has one.
    pub fn expiry_date(&self, today: NaiveDate) -> Option<NaiveDate> {
        self.days_to_expire()
            .and_then(|days| today.checked_add_days(Days::new(u64::from(days))))
    }

    pub fn expiry_date_string(&self, today: NaiveDate) -> Option<String> {
        self.expiry_date(today)
            .map(|date| date.format("%d-%m-%Y").to_string())
    }

    /// Multi-line description for display
    pub fn details(&self) -> String {
        let mut out = format!(
            "ID: {}\nName: {}\nQuantity: {}\nPrice: {}\nType: {}",
            self.product_id,
            self.product_name,
            self.quantity,
            self.price,
            self.product_type()
        );
        match &self.kind {
            ProductKind::Regular => {}
            ProductKind::Food {
                days_to_expire,
                is_vegetarian,
            } => {
                out.push_str(&format!(
                    "\nDays to expire: {}\nIs vegetarian: {}",
                    days_to_expire.map_or_else(|| "unknown".to_string(), |d| d.to_string()),
                    is_vegetarian.map_or("unknown", flag_text)
                ));
            }
            ProductKind::Electronic {
                warranty_period_in_years,
            } => {
                out.push_str(&format!(
                    "\nWarranty period: {}",
                    warranty_period_in_years
                        .map_or_else(|| "unknown".to_string(), |y| format!("{} years", y))
                ));
            }
        }
        out
    }

    /// `column: value` pairs over every catalog column, on one line
    pub fn report_line(&self) -> String {
        let row = self.to_row();
        COLUMNS
            .iter()
            .zip(row.values())
            .map(|(column, value)| format!("{}: {}", column, value))
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn availability(&self) -> String {
        format!(
            "{} is ${:.2}, available quantity {}",
            self.product_name, self.price, self.quantity
        )
    }

    pub fn to_row(&self) -> CatalogRow {
        let row = CatalogRow::new(
            self.product_id.as_str(),
            self.product_name.as_str(),
            self.quantity,
            self.price,
            self.product_type().as_str(),
        );
        match &self.kind {
            ProductKind::Regular => row,
            ProductKind::Food {
                days_to_expire,
                is_vegetarian,
            } => CatalogRow {
                days_to_expire: days_to_expire.map(|d| d.to_string()).unwrap_or_default(),
                is_vegetarian: is_vegetarian.map(flag_text).unwrap_or_default().to_string(),
                ..row
            },
            ProductKind::Electronic {
                warranty_period_in_years,
            } => CatalogRow {
                warranty_period_in_years: warranty_period_in_years
                    .map(|y| y.to_string())
                    .unwrap_or_default(),
                ..row
            },
        }
    }
}

impl TryFrom<&CatalogRow> for Product {
    type Error = CatalogError;

    fn try_from(row: &CatalogRow) -> Result<Self, Self::Error> {
        Product::from_row(row)
    }
}

fn require_text(product_id: &str, field: &str, value: &str) -> CatalogResult<()> {
    if value.trim().is_empty() {
        return Err(CatalogError::validation(product_id, format!("{} must not be empty", field)));
    }
    // report lines are one product per line
    if value.chars().any(char::is_control) {
        return Err(CatalogError::validation(
            product_id,
            format!("{} must not contain control characters", field),
        ));
    }
    Ok(())
}

fn check_price(product_id: &str, price: f64) -> CatalogResult<()> {
    if !price.is_finite() || price <= 0.0 {
        return Err(CatalogError::validation(
            product_id,
            format!("price must be greater than 0, got {}", price),
        ));
    }
    Ok(())
}

fn check_warranty(product_id: &str, years: f64) -> CatalogResult<()> {
    if !years.is_finite() || years < 0.0 {
        return Err(CatalogError::validation(
            product_id,
            format!("warranty_period_in_years must not be negative, got {}", years),
        ));
    }
    Ok(())
}

fn parse_optional<T>(
    product_id: &str,
    field: &str,
    raw: &str,
    parse: impl Fn(&str) -> Option<T>,
) -> CatalogResult<Option<T>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    parse(raw)
        .map(Some)
        .ok_or_else(|| CatalogError::validation(product_id, format!("invalid {}: `{}`", field, raw)))
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "yes" | "true" => Some(true),
        "no" | "false" => Some(false),
        _ => None,
    }
}

fn flag_text(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}
