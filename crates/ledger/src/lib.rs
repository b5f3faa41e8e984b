//! Inventory ledger domain module.
//!
//! This crate contains the in-memory quantity ledger (add/remove/query and
//! low-stock reporting) plus its JSON persistence layer. Domain logic is
//! deterministic and synchronous; only `store` touches the filesystem.

pub mod ledger;
pub mod store;

pub use ledger::{DEFAULT_LOW_STOCK_THRESHOLD, Ledger};
pub use store::{DEFAULT_INVENTORY_PATH, StoreError};
