//! Demonstration driver for the stockbook ledger.

use anyhow::Result;

use stockbook_ledger::{DEFAULT_INVENTORY_PATH, DEFAULT_LOW_STOCK_THRESHOLD, Ledger, store};

fn main() -> Result<()> {
    stockbook_observability::init();

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_INVENTORY_PATH.to_string());
    tracing::info!("using inventory file {path}");

    let mut ledger = Ledger::new();
    let mut journal = Vec::new();

    ledger.add("apple", 10, Some(&mut journal))?;
    ledger.remove("apple", 3)?;

    println!("Apple stock: {}", ledger.get_quantity("apple")?);
    println!(
        "Low items: {:?}",
        ledger.list_low_stock(DEFAULT_LOW_STOCK_THRESHOLD)?
    );

    store::save(&ledger, &path)?;
    store::load(&mut ledger, &path);
    ledger.print_report();

    Ok(())
}
