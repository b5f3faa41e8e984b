use std::collections::{BTreeMap, BTreeSet};
use std::io::{self, Write};

use chrono::Utc;

use stockbook_core::{DomainError, DomainResult};

/// Conventional threshold for low-stock reporting.
pub const DEFAULT_LOW_STOCK_THRESHOLD: i64 = 5;

/// In-memory inventory ledger: item name -> quantity on hand.
///
/// Quantities are never negative at any observable point. A removal that
/// drains an item to zero deletes the entry outright rather than leaving a
/// zero-valued key. `BTreeMap` keeps iteration (and therefore reports and
/// persisted JSON) in lexicographic key order.
///
/// The ledger is a plain value owned by the caller; it carries no locking.
/// Callers sharing it across threads must add their own synchronization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ledger {
    items: BTreeMap<String, i64>,
}

impl Ledger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self {
            items: BTreeMap::new(),
        }
    }

    pub(crate) fn from_items(items: BTreeMap<String, i64>) -> Self {
        Self { items }
    }

    pub(crate) fn items(&self) -> &BTreeMap<String, i64> {
        &self.items
    }

    /// Number of distinct items currently tracked.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Add `qty` units of `item`, creating the item if absent.
    ///
    /// `qty` of zero is accepted; the add succeeds and may leave a
    /// zero-valued entry in place (only `remove` cleans those up). An add
    /// that would overflow the stored quantity is rejected and leaves the
    /// entry unchanged.
    ///
    /// Emits one info event with a timestamp, the delta, and the item name.
    /// If `journal` is supplied, the same message is appended to it.
    pub fn add(
        &mut self,
        item: &str,
        qty: i64,
        journal: Option<&mut Vec<String>>,
    ) -> DomainResult<()> {
        validate_item_name(item)?;
        if qty < 0 {
            return Err(DomainError::invalid_argument(
                "qty must be a non-negative integer",
            ));
        }

        let current = self.items.get(item).copied().unwrap_or(0);
        let total = current.checked_add(qty).ok_or_else(|| {
            DomainError::invalid_argument("qty would overflow the stored quantity")
        })?;
        self.items.insert(item.to_string(), total);

        let message = format!("{}: added {qty} of {item}", Utc::now());
        if let Some(journal) = journal {
            journal.push(message.clone());
        }
        tracing::info!("{message}");
        Ok(())
    }

    /// Remove `qty` units of `item` without going below zero.
    ///
    /// Removing more than is on hand clamps to zero rather than erroring,
    /// and an item whose quantity reaches zero is deleted entirely.
    ///
    /// Unlike `add`, a zero `qty` is rejected. Unlike [`Ledger::get_quantity`],
    /// an absent item is an error here.
    pub fn remove(&mut self, item: &str, qty: i64) -> DomainResult<()> {
        validate_item_name(item)?;
        if qty <= 0 {
            return Err(DomainError::invalid_argument(
                "qty must be a positive integer",
            ));
        }

        let current = match self.items.get(item) {
            Some(current) => *current,
            None => return Err(DomainError::not_found(item)),
        };

        let remaining = (current - qty).max(0);
        if remaining == 0 {
            self.items.remove(item);
            tracing::info!("removed {item} completely (stock hit zero)");
        } else {
            self.items.insert(item.to_string(), remaining);
            tracing::info!("removed {qty} of {item}, remaining={remaining}");
        }
        Ok(())
    }

    /// Current quantity for `item`; 0 if not present.
    ///
    /// Absence is deliberately not an error here, in contrast to
    /// [`Ledger::remove`].
    pub fn get_quantity(&self, item: &str) -> DomainResult<i64> {
        validate_item_name(item)?;
        Ok(self.items.get(item).copied().unwrap_or(0))
    }

    /// Names of items whose quantity is strictly below `threshold`, sorted.
    pub fn list_low_stock(&self, threshold: i64) -> DomainResult<BTreeSet<String>> {
        if threshold < 0 {
            return Err(DomainError::invalid_argument(
                "threshold must be a non-negative integer",
            ));
        }
        Ok(self
            .items
            .iter()
            .filter(|&(_, &qty)| qty < threshold)
            .map(|(name, _)| name.clone())
            .collect())
    }

    /// Write the inventory report to `out`: a header line, then one
    /// `<name> -> <quantity>` line per item in lexicographic order.
    pub fn write_report<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "Items Report")?;
        for (name, qty) in &self.items {
            writeln!(out, "{name} -> {qty}")?;
        }
        Ok(())
    }

    /// Print the inventory report to stdout.
    pub fn print_report(&self) {
        if let Err(err) = self.write_report(&mut io::stdout()) {
            tracing::error!("failed to write report to stdout: {err}");
        }
    }
}

/// Item names must be non-empty after trimming whitespace.
fn validate_item_name(item: &str) -> DomainResult<()> {
    if item.trim().is_empty() {
        return Err(DomainError::invalid_argument(
            "item must be a non-empty string",
        ));
    }
    Ok(())
}
