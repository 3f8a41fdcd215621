use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// 產品類別（封閉集合）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Detergent,
    Softener,
    Disinfectant,
    Enhancer,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Detergent,
        Category::Softener,
        Category::Disinfectant,
        Category::Enhancer,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Detergent => "detergent",
            Category::Softener => "softener",
            Category::Disinfectant => "disinfectant",
            Category::Enhancer => "enhancer",
        }
    }

    /// Plural display label used in reports.
    pub fn label(&self) -> &'static str {
        match self {
            Category::Detergent => "Detergentes",
            Category::Softener => "Suavizantes",
            Category::Disinfectant => "Desinfectantes",
            Category::Enhancer => "Potenciadores",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "detergent" => Ok(Category::Detergent),
            "softener" => Ok(Category::Softener),
            "disinfectant" => Ok(Category::Disinfectant),
            "enhancer" => Ok(Category::Enhancer),
            other => Err(format!(
                "unknown category '{}' (expected detergent, softener, disinfectant or enhancer)",
                other
            )),
        }
    }
}

/// 產品可使用多久才需要再買一次
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProductDuration {
    #[serde(rename = "1week")]
    OneWeek,
    #[serde(rename = "2weeks")]
    TwoWeeks,
    #[serde(rename = "1month")]
    OneMonth,
    #[serde(rename = "2months")]
    TwoMonths,
    #[serde(rename = "3months")]
    ThreeMonths,
    #[serde(rename = "6months")]
    SixMonths,
    #[serde(rename = "1year")]
    OneYear,
}

impl ProductDuration {
    pub const ALL: [ProductDuration; 7] = [
        ProductDuration::OneWeek,
        ProductDuration::TwoWeeks,
        ProductDuration::OneMonth,
        ProductDuration::TwoMonths,
        ProductDuration::ThreeMonths,
        ProductDuration::SixMonths,
        ProductDuration::OneYear,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProductDuration::OneWeek => "1week",
            ProductDuration::TwoWeeks => "2weeks",
            ProductDuration::OneMonth => "1month",
            ProductDuration::TwoMonths => "2months",
            ProductDuration::ThreeMonths => "3months",
            ProductDuration::SixMonths => "6months",
            ProductDuration::OneYear => "1year",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ProductDuration::OneWeek => "1 semana",
            ProductDuration::TwoWeeks => "2 semanas",
            ProductDuration::OneMonth => "1 mes",
            ProductDuration::TwoMonths => "2 meses",
            ProductDuration::ThreeMonths => "3 meses",
            ProductDuration::SixMonths => "6 meses",
            ProductDuration::OneYear => "1 año",
        }
    }
}

impl fmt::Display for ProductDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProductDuration {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProductDuration::ALL
            .into_iter()
            .find(|d| d.as_str() == s.trim())
            .ok_or_else(|| format!("unknown duration '{}'", s))
    }
}

/// 快照中的 duration：空值視為未設定，無法辨識的值視為一個月
fn deserialize_duration<'de, D>(deserializer: D) -> Result<Option<ProductDuration>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(match raw.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(value) => Some(value.parse().unwrap_or_else(|_| {
            tracing::warn!("Unknown duration '{}', treating it as one month", value);
            ProductDuration::OneMonth
        })),
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ProductId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&str> for ProductId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A cleaning product the user currently buys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    /// Price of one package.
    pub price: f64,
    /// Uses obtainable from one package.
    pub quantity: u32,
    /// Uses per month.
    pub usage_frequency: u32,
    pub category: Category,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(
        default,
        deserialize_with = "deserialize_duration",
        skip_serializing_if = "Option::is_none"
    )]
    pub duration: Option<ProductDuration>,
}

impl Product {
    pub fn new(name: impl Into<String>, price: f64, category: Category) -> Self {
        Self {
            id: ProductId::new(),
            name: name.into(),
            price,
            quantity: 1,
            usage_frequency: 1,
            category,
            brand: None,
            kind: None,
            size: None,
            unit: None,
            duration: None,
        }
    }

    pub fn with_usage(mut self, quantity: u32, usage_frequency: u32) -> Self {
        self.quantity = quantity;
        self.usage_frequency = usage_frequency;
        self
    }

    pub fn with_duration(mut self, duration: ProductDuration) -> Self {
        self.duration = Some(duration);
        self
    }

    /// 由目錄項目建立產品，預設每月更換一次
    pub fn from_catalog(entry: &CatalogEntry) -> Self {
        Self {
            id: ProductId::new(),
            name: entry.display_name(),
            price: entry.price,
            quantity: 1,
            usage_frequency: 1,
            category: entry.category,
            brand: Some(entry.brand.clone()),
            kind: Some(entry.kind.clone()),
            size: Some(entry.size),
            unit: Some(entry.unit.clone()),
            duration: Some(ProductDuration::OneMonth),
        }
    }
}

/// 洗衣習慣
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LaundryStats {
    pub loads_per_week: u32,
    /// Minutes per load.
    pub time_per_load: f64,
    /// Liters per load.
    pub water_per_load: f64,
}

impl Default for LaundryStats {
    fn default() -> Self {
        Self {
            loads_per_week: 3,
            time_per_load: 80.0,
            water_per_load: 60.0,
        }
    }
}

/// Derived spending figures. Category subtotals and `total_expense` are monthly,
/// everything else is yearly. Savings can be negative.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseSummary {
    pub total_expense: f64,
    pub detergent_expense: f64,
    pub softener_expense: f64,
    pub disinfectant_expense: f64,
    pub enhancer_expense: f64,
    pub yearly_expense: f64,
    /// Liters.
    pub yearly_water_usage: f64,
    /// Hours.
    pub yearly_time_spent: f64,

    pub geco_yearly_expense: f64,
    pub geco_yearly_water_usage: f64,
    pub geco_yearly_time_spent: f64,

    pub saved_money: f64,
    pub saved_water: f64,
    pub saved_time: f64,
}

impl ExpenseSummary {
    pub fn category_expense(&self, category: Category) -> f64 {
        match category {
            Category::Detergent => self.detergent_expense,
            Category::Softener => self.softener_expense,
            Category::Disinfectant => self.disinfectant_expense,
            Category::Enhancer => self.enhancer_expense,
        }
    }
}

/// 產品目錄中的一筆資料
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub brand: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub size: f64,
    pub unit: String,
    pub price: f64,
    pub category: Category,
}

impl CatalogEntry {
    /// e.g. `MAS Original - Líquido 1.83L`
    pub fn display_name(&self) -> String {
        format!(
            "{} {} - {} {}{}",
            self.brand, self.name, self.kind, self.size, self.unit
        )
    }

    /// Key used to group package sizes of the same product line.
    pub fn group_key(&self) -> String {
        format!("{}-{}", self.brand, self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_snapshot_uses_camel_case() {
        let product = Product::new("Ariel", 120.0, Category::Detergent)
            .with_usage(30, 12)
            .with_duration(ProductDuration::TwoMonths);

        let json = serde_json::to_value(&product).unwrap();
        assert_eq!(json["usageFrequency"], 12);
        assert_eq!(json["category"], "detergent");
        assert_eq!(json["duration"], "2months");
        assert!(json.get("brand").is_none());
    }

    #[test]
    fn test_duration_deserialization_edge_cases() {
        let base = r#"{"id":"1","name":"X","price":10,"quantity":1,"usageFrequency":1,"category":"softener""#;

        let missing: Product = serde_json::from_str(&format!("{}}}", base)).unwrap();
        assert_eq!(missing.duration, None);

        let empty: Product =
            serde_json::from_str(&format!("{},\"duration\":\"\"}}", base)).unwrap();
        assert_eq!(empty.duration, None);

        let unknown: Product =
            serde_json::from_str(&format!("{},\"duration\":\"fortnight\"}}", base)).unwrap();
        assert_eq!(unknown.duration, Some(ProductDuration::OneMonth));

        let known: Product =
            serde_json::from_str(&format!("{},\"duration\":\"1year\"}}", base)).unwrap();
        assert_eq!(known.duration, Some(ProductDuration::OneYear));
    }

    #[test]
    fn test_from_catalog_entry() {
        let entry = CatalogEntry {
            brand: "MAS".to_string(),
            name: "Original".to_string(),
            kind: "Líquido".to_string(),
            size: 1.83,
            unit: "L".to_string(),
            price: 72.0,
            category: Category::Detergent,
        };

        let product = Product::from_catalog(&entry);
        assert_eq!(product.name, "MAS Original - Líquido 1.83L");
        assert_eq!(product.duration, Some(ProductDuration::OneMonth));
        assert_eq!(product.quantity, 1);
        assert_eq!(product.usage_frequency, 1);
        assert_eq!(product.brand.as_deref(), Some("MAS"));
        assert_eq!(entry.group_key(), "MAS-Original");
    }

    #[test]
    fn test_category_parsing() {
        assert_eq!("Softener".parse::<Category>().unwrap(), Category::Softener);
        assert!("bleach".parse::<Category>().is_err());
        assert_eq!(Category::Enhancer.label(), "Potenciadores");
    }

    #[test]
    fn test_product_ids_are_unique() {
        assert_ne!(ProductId::new(), ProductId::new());
    }
}
