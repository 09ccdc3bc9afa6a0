use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

const CATALOG: &str = "\
product_id,product_name,quantity,price,type,days_to_expire,is_vegetarian,warranty_period_in_years
P001,Widget,150,20.00,regular,,,
P002,Snack Bar,5,3.50,food,30,yes,
P003,Kettle,12,45.00,electronic,,,2
P004,Sofa,1,300.00,furniture,,,
";

fn stockpile(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_stockpile"))
        .current_dir(dir)
        .env("RUST_LOG", "off")
        .env("STOCKPILE__REPORT__PATH", dir.join("report.txt"))
        .arg("--catalog")
        .arg(dir.join("inventory.csv"))
        .args(args)
        .output()
        .expect("failed to run stockpile")
}

fn setup() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("inventory.csv"), CATALOG).unwrap();
    dir
}

#[test]
fn test_list_skips_invalid_rows() {
    let dir = setup();
    let output = stockpile(dir.path(), &["list"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("ID: P003"));
    assert!(!stdout.contains("P004"));
    assert!(stdout.trim_end().ends_with("3 products"));
}

#[test]
fn test_report_writes_file() {
    let dir = setup();
    let output = stockpile(dir.path(), &["report"]);

    assert!(output.status.success());
    let report = fs::read_to_string(dir.path().join("report.txt")).unwrap();
    assert_eq!(report.lines().count(), 1);
    assert!(report.starts_with("product_id: P002, "));
}

#[test]
fn test_update_stock_with_save() {
    let dir = setup();
    let output = stockpile(dir.path(), &["update-stock", "P002", "75", "--save"]);
    assert!(output.status.success());

    let saved = fs::read_to_string(dir.path().join("inventory.csv")).unwrap();
    assert!(saved.contains("P002,Snack Bar,75,3.5,food,30,yes,"));
    assert!(!saved.contains("P004"));
}

#[test]
fn test_update_stock_failures() {
    let dir = setup();

    let missing = stockpile(dir.path(), &["update-stock", "P999", "5"]);
    assert!(!missing.status.success());
    assert!(String::from_utf8_lossy(&missing.stderr).contains("Product not found: P999"));

    let negative = stockpile(dir.path(), &["update-stock", "P001", "-3"]);
    assert!(!negative.status.success());
    assert!(String::from_utf8_lossy(&negative.stderr).contains("Invalid quantity: -3"));
}

#[test]
fn test_add_to_missing_catalog_starts_empty() {
    let dir = TempDir::new().unwrap();
    let output = stockpile(
        dir.path(),
        &[
            "add", "--id", "P70983", "--name", "Cashew cookies", "--quantity", "10000", "--price", "5.00",
            "--type", "food", "--days-to-expire", "90", "--vegetarian", "yes", "--save",
        ],
    );
    assert!(output.status.success());

    let saved = fs::read_to_string(dir.path().join("inventory.csv")).unwrap();
    assert_eq!(saved.lines().count(), 2);
    assert!(saved.contains("P70983,Cashew cookies,10000,5,food,90,yes,"));
}

#[test]
fn test_missing_catalog_is_an_error_for_list() {
    let dir = TempDir::new().unwrap();
    let output = stockpile(dir.path(), &["list"]);
    assert!(!output.status.success());
}
