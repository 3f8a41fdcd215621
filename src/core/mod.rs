pub mod calculator;
pub mod flow;
pub mod format;
pub mod report;
pub mod selection;
pub mod session;

pub use crate::domain::model::{ExpenseSummary, LaundryStats, Product};
pub use crate::domain::ports::{CatalogProvider, ProductStore, Storage};
pub use crate::utils::error::Result;
