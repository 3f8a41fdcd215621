use crate::domain::model::{CatalogEntry, Product};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Byte-level key/value storage used for snapshots and exports.
pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// 保存與載入目前選擇的產品清單
pub trait ProductStore: Send + Sync {
    fn load(&self) -> impl std::future::Future<Output = Vec<Product>> + Send;
    fn save(&self, products: &[Product]) -> impl std::future::Future<Output = Result<()>> + Send;
}

#[async_trait]
pub trait CatalogProvider: Send + Sync {
    async fn load(&self) -> Result<Vec<CatalogEntry>>;
}
