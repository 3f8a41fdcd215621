use crate::core::calculator::ExpenseCalculator;
use crate::core::flow::{FlowStep, StepValidation};
use crate::core::selection::ProductSelection;
use crate::domain::model::{CatalogEntry, ExpenseSummary, LaundryStats, Product, ProductId};
use crate::domain::ports::ProductStore;
use crate::utils::error::Result;
use crate::utils::validation::Validate;

/// Current product selection and habits, persisted after every change.
pub struct Session<S: ProductStore> {
    store: S,
    selection: ProductSelection,
    stats: Option<LaundryStats>,
    calculator: ExpenseCalculator,
}

impl<S: ProductStore> Session<S> {
    /// 從儲存區載入先前的產品清單
    pub async fn open(store: S) -> Self {
        let products = store.load().await;
        tracing::debug!("Session opened with {} products", products.len());
        Self {
            store,
            selection: ProductSelection::from_products(products),
            stats: None,
            calculator: ExpenseCalculator::new(),
        }
    }

    pub fn with_calculator(mut self, calculator: ExpenseCalculator) -> Self {
        self.calculator = calculator;
        self
    }

    pub fn products(&self) -> &[Product] {
        self.selection.products()
    }

    pub fn stats(&self) -> Option<&LaundryStats> {
        self.stats.as_ref()
    }

    pub fn set_stats(&mut self, stats: LaundryStats) -> Result<()> {
        stats.validate()?;
        self.stats = Some(stats);
        Ok(())
    }

    pub async fn add_product(&mut self, product: Product) -> Result<ProductId> {
        let mut next = self.selection.clone();
        let id = next.add(product)?.id.clone();
        self.commit(next).await?;
        Ok(id)
    }

    /// Returns `None` when the catalog entry is already selected.
    pub async fn add_from_catalog(&mut self, entry: &CatalogEntry) -> Result<Option<ProductId>> {
        let mut next = self.selection.clone();
        let id = next.add_from_catalog(entry)?.map(|product| product.id.clone());
        if id.is_some() {
            self.commit(next).await?;
        }
        Ok(id)
    }

    pub async fn remove_product(&mut self, id: &ProductId) -> Result<Option<Product>> {
        let mut next = self.selection.clone();
        let removed = next.remove(id);
        if removed.is_some() {
            self.commit(next).await?;
        }
        Ok(removed)
    }

    pub async fn replace_product(&mut self, id: &ProductId, product: Product) -> Result<()> {
        let mut next = self.selection.clone();
        next.replace(id, product)?;
        self.commit(next).await
    }

    pub async fn clear(&mut self) -> Result<()> {
        self.commit(ProductSelection::new()).await
    }

    pub fn summary(&self) -> ExpenseSummary {
        self.calculator
            .calculate(self.selection.products(), self.stats.as_ref())
    }

    /// 驗證步驟；尚未輸入洗衣習慣時以預設值檢查
    pub fn validate(&self, step: FlowStep) -> StepValidation {
        let stats = self.stats.unwrap_or_default();
        step.validate(self.selection.products(), &stats)
    }

    /// 先寫入儲存區，成功後才替換記憶體中的清單
    async fn commit(&mut self, next: ProductSelection) -> Result<()> {
        self.store.save(next.products()).await?;
        self.selection = next;
        Ok(())
    }
}
