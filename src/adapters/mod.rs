// Adapters layer: concrete implementations for external systems (storage, catalogs, exports).

pub mod catalog;
pub mod export;
pub mod storage;
