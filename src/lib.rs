pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;

pub use crate::adapters::storage::{LocalStorage, MemoryStorage, SnapshotStore};
pub use crate::core::calculator::{calculate, duration_in_weeks, ExpenseCalculator};
pub use crate::core::session::Session;
pub use crate::domain::model::{
    CatalogEntry, Category, ExpenseSummary, LaundryStats, Product, ProductDuration, ProductId,
};
pub use crate::utils::error::{CalcError, Result};
