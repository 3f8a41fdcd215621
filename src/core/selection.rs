use crate::domain::model::{CatalogEntry, Product, ProductId};
use crate::utils::error::{CalcError, Result};
use crate::utils::validation::validate_product;

/// 使用者目前選擇的產品（保留加入順序）
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductSelection {
    products: Vec<Product>,
}

impl ProductSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// 從快照重建清單；不合規則的產品會被略過
    pub fn from_products(products: Vec<Product>) -> Self {
        let products = products
            .into_iter()
            .filter(|product| match validate_product(product) {
                Ok(()) => true,
                Err(e) => {
                    tracing::warn!("Dropping saved product '{}': {}", product.id, e);
                    false
                }
            })
            .collect();
        Self { products }
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn get(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|p| &p.id == id)
    }

    pub fn contains_name(&self, name: &str) -> bool {
        self.products.iter().any(|p| p.name == name)
    }

    pub fn add(&mut self, product: Product) -> Result<&Product> {
        validate_product(&product)?;
        if self.get(&product.id).is_some() {
            return Err(CalcError::validation(
                "id",
                format!("product {} is already selected", product.id),
            ));
        }
        tracing::debug!("Adding product '{}' ({})", product.name, product.category);
        self.products.push(product);
        Ok(&self.products[self.products.len() - 1])
    }

    /// Adds a catalog entry unless a product with the same display name is
    /// already selected. Returns `None` for duplicates.
    pub fn add_from_catalog(&mut self, entry: &CatalogEntry) -> Result<Option<&Product>> {
        if self.contains_name(&entry.display_name()) {
            tracing::debug!("'{}' already selected, skipping", entry.display_name());
            return Ok(None);
        }
        self.add(Product::from_catalog(entry)).map(Some)
    }

    pub fn remove(&mut self, id: &ProductId) -> Option<Product> {
        let index = self.products.iter().position(|p| &p.id == id)?;
        Some(self.products.remove(index))
    }

    /// 以新的內容覆蓋既有產品，id 保持不變
    pub fn replace(&mut self, id: &ProductId, mut product: Product) -> Result<()> {
        validate_product(&product)?;
        let slot = self
            .products
            .iter_mut()
            .find(|p| &p.id == id)
            .ok_or_else(|| CalcError::ProductNotFound { id: id.to_string() })?;
        product.id = id.clone();
        *slot = product;
        Ok(())
    }

    pub fn clear(&mut self) {
        self.products.clear();
    }

    pub fn into_products(self) -> Vec<Product> {
        self.products
    }
}
