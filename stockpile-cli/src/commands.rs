//! Subcommand bodies. Each writes its user-facing output to `out`.

use std::io::Write;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use stockpile_catalog::{AddOutcome, CatalogRow, Inventory, StockStatus};

pub fn list(inventory: &Inventory, today: NaiveDate, out: &mut impl Write) -> Result<()> {
    for product in inventory.products() {
        writeln!(out, "{}", product.details())?;
        if let Some(expiry) = product.expiry_date_string(today) {
            writeln!(out, "Expires on: {}", expiry)?;
        }
        writeln!(out)?;
    }
    writeln!(out, "{} products", inventory.len())?;
    Ok(())
}

pub fn report(inventory: &Inventory, out: &mut impl Write) -> Result<()> {
    let flagged = inventory
        .generate_low_quantity_report()
        .context("Failed to write low stock report")?;
    if flagged.is_empty() {
        writeln!(out, "No products below {}", inventory.reporter().threshold())?;
    } else {
        writeln!(
            out,
            "{} low stock products written to {}: {}",
            flagged.len(),
            inventory.reporter().report_path().display(),
            flagged.join(", ")
        )?;
    }
    Ok(())
}

pub fn search(inventory: &Inventory, name: &str, out: &mut impl Write) -> Result<()> {
    let Some(product) = inventory.find_by_name(name) else {
        writeln!(out, "Cannot find product {} in inventory", name)?;
        return Ok(());
    };

    match inventory.reporter().check_low_stock_or_print_details(product)? {
        StockStatus::Low => writeln!(
            out,
            "{} is low on stock ({} left), added to {}",
            product.product_name,
            product.quantity,
            inventory.reporter().report_path().display()
        )?,
        StockStatus::OutOfStock => writeln!(out, "{} is out of stock", product.product_name)?,
        StockStatus::Available(summary) => writeln!(out, "{}", summary)?,
    }
    Ok(())
}

pub fn update_stock(
    inventory: &mut Inventory,
    product_id: &str,
    quantity: i64,
    out: &mut impl Write,
) -> Result<()> {
    inventory.update_stock(product_id, quantity)?;
    writeln!(out, "{} now has quantity {}", product_id, quantity)?;
    Ok(())
}

/// Returns whether the product was stored
pub fn add(inventory: &mut Inventory, row: &CatalogRow, out: &mut impl Write) -> Result<bool> {
    match inventory.add_product(row)? {
        AddOutcome::Added => {
            writeln!(out, "Added {}", row.product_id.trim())?;
            Ok(true)
        }
        AddOutcome::Duplicate => {
            writeln!(out, "Product {} already exists", row.product_id.trim())?;
            Ok(false)
        }
    }
}

pub fn check(inventory: &Inventory, raw: &str, out: &mut impl Write) -> Result<()> {
    let low = inventory.reporter().check_low_stock_value(raw)?;
    let threshold = inventory.reporter().threshold();
    if low {
        writeln!(out, "{} is below the threshold of {}", raw.trim(), threshold)?;
    } else {
        writeln!(out, "{} is not below the threshold of {}", raw.trim(), threshold)?;
    }
    Ok(())
}
