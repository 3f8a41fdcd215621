use crate::domain::model::Product;
use crate::domain::ports::{ProductStore, Storage};
use crate::utils::error::{CalcError, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;

/// 產品清單快照的固定鍵值
pub const STORAGE_KEY: &str = "cleanCalc_products";

#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }
}

impl Storage for LocalStorage {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let full_path = self.base_path.join(path);
        let data = tokio::fs::read(full_path).await?;
        Ok(data)
    }

    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = self.base_path.join(path);

        if let Some(parent) = full_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        tokio::fs::write(full_path, data).await?;
        Ok(())
    }
}

/// In-process storage, used for dry runs and tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get_file(&self, path: &str) -> Option<Vec<u8>> {
        self.files.lock().await.get(path).cloned()
    }
}

impl Storage for MemoryStorage {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let files = self.files.lock().await;
        files.get(path).cloned().ok_or_else(|| {
            CalcError::IoError(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("File not found: {}", path),
            ))
        })
    }

    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let mut files = self.files.lock().await;
        files.insert(path.to_string(), data.to_vec());
        Ok(())
    }
}

/// Saves the product list as JSON under [`STORAGE_KEY`].
///
/// Loading never fails: a missing snapshot is an empty list and an unreadable
/// one is logged and treated the same way.
#[derive(Debug, Clone)]
pub struct SnapshotStore<S: Storage> {
    storage: S,
}

impl<S: Storage> SnapshotStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn file_name() -> String {
        format!("{}.json", STORAGE_KEY)
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }
}

impl<S: Storage> ProductStore for SnapshotStore<S> {
    async fn load(&self) -> Vec<Product> {
        let data = match self.storage.read_file(&Self::file_name()).await {
            Ok(data) => data,
            Err(CalcError::IoError(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No saved products found");
                return Vec::new();
            }
            Err(e) => {
                tracing::error!("Error loading products from storage: {}", e);
                return Vec::new();
            }
        };

        match serde_json::from_slice::<Vec<Product>>(&data) {
            Ok(products) => {
                tracing::debug!("Loaded {} saved products", products.len());
                products
            }
            Err(e) => {
                tracing::warn!("Saved products are unreadable, starting empty: {}", e);
                Vec::new()
            }
        }
    }

    async fn save(&self, products: &[Product]) -> Result<()> {
        let data = serde_json::to_vec_pretty(products)?;
        self.storage.write_file(&Self::file_name(), &data).await?;
        tracing::debug!("Saved {} products", products.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{Category, ProductDuration};
    use tempfile::TempDir;

    fn sample_products() -> Vec<Product> {
        let mut catalog_product = Product::new("MAS Original - Líquido 1.83L", 72.0, Category::Detergent)
            .with_duration(ProductDuration::OneMonth);
        catalog_product.brand = Some("MAS".to_string());
        catalog_product.kind = Some("Líquido".to_string());
        catalog_product.size = Some(1.83);
        catalog_product.unit = Some("L".to_string());

        vec![
            catalog_product,
            Product::new("Vinagre", 25.5, Category::Enhancer).with_usage(20, 4),
        ]
    }

    #[tokio::test]
    async fn test_missing_snapshot_is_empty() {
        let store = SnapshotStore::new(MemoryStorage::new());
        assert!(store.load().await.is_empty());
    }

    #[tokio::test]
    async fn test_round_trip_is_lossless() {
        let store = SnapshotStore::new(MemoryStorage::new());
        let products = sample_products();

        store.save(&products).await.unwrap();
        assert_eq!(store.load().await, products);

        let raw = store.storage().get_file("cleanCalc_products.json").await;
        assert!(raw.is_some());
    }

    #[tokio::test]
    async fn test_corrupt_snapshot_is_empty() {
        let storage = MemoryStorage::new();
        storage
            .write_file("cleanCalc_products.json", b"{not json")
            .await
            .unwrap();

        let store = SnapshotStore::new(storage);
        assert!(store.load().await.is_empty());
    }

    #[tokio::test]
    async fn test_local_storage_creates_directories() {
        let temp_dir = TempDir::new().unwrap();
        let base = temp_dir.path().join("nested").join("data");
        let store = SnapshotStore::new(LocalStorage::new(&base));

        store.save(&sample_products()).await.unwrap();
        assert!(base.join("cleanCalc_products.json").exists());
        assert_eq!(store.load().await.len(), 2);
    }
}
