//! Product catalogs: the built-in list plus delimited-text catalog files read
//! from a directory or fetched from an HTTP base URL.

use crate::adapters::storage::LocalStorage;
use crate::domain::model::{CatalogEntry, Category};
use crate::domain::ports::{CatalogProvider, Storage};
use crate::utils::error::{CalcError, Result};
use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use std::path::PathBuf;
use std::sync::OnceLock;
use url::Url;

/// Catalog file name and the category its rows belong to.
pub const CATALOG_FILES: [(&str, Category); 5] = [
    ("Detergentes.csv", Category::Detergent),
    ("Suavizante.csv", Category::Softener),
    ("Desinfectante.csv", Category::Disinfectant),
    ("Potenciadores.csv", Category::Enhancer),
    // 去漬劑歸類為增效劑
    ("Desmanchadores.csv", Category::Enhancer),
];

const HEADER_LINES: usize = 2;
const DEFAULT_BRAND: &str = "Genérico";
const DEFAULT_TYPE: &str = "Líquido";
const DEFAULT_UNIT: &str = "L";

// brand, name, type, size (L), price
const BUILTIN_DETERGENTS: &[(&str, &str, &str, f64, f64)] = &[
    ("MAS", "Original", "Líquido", 0.83, 34.5),
    ("MAS", "Original", "Líquido", 1.83, 72.0),
    ("MAS", "Original", "Líquido", 3.0, 133.0),
    ("MAS", "Original", "Líquido", 4.65, 185.0),
    ("MAS", "Original", "Líquido", 6.64, 225.0),
    ("MAS", "Renueva y Florece", "Líquido", 4.65, 185.0),
    ("MAS", "Ropa Oscura", "Líquido", 6.64, 225.0),
    ("MAS", "Bebé", "Líquido", 1.83, 72.0),
    ("MAS", "Frescura Intensa", "Líquido", 4.65, 185.0),
    ("ACE", "Original", "Polvo", 0.648, 35.5),
    ("ACE", "Original", "Polvo", 1.72, 98.0),
    ("ACE", "Original", "Polvo", 4.86, 265.0),
    ("ACE", "Original", "Polvo", 5.83, 318.0),
    ("ACE", "Original", "Líquido", 5.0, 199.0),
    ("PERSIL", "Original", "Polvo", 0.9, 39.9),
    ("PERSIL", "Original", "Polvo", 4.5, 183.0),
    ("PERSIL", "Original", "Líquido", 3.0, 115.0),
    ("PERSIL", "Original", "Líquido", 4.0, 185.0),
    ("PERSIL", "Original", "Líquido", 6.64, 243.0),
    ("PERSIL", "Color", "Líquido", 0.83, 51.9),
    ("PERSIL", "Color", "Líquido", 3.0, 115.0),
    ("PERSIL", "Color", "Líquido", 4.65, 185.0),
    ("PERSIL", "Color", "Líquido", 6.64, 243.0),
    ("123", "Color", "Líquido", 4.65, 130.0),
    ("ARIEL", "Original", "Polvo", 0.75, 40.5),
    ("ARIEL", "Original", "Polvo", 2.0, 103.5),
    ("ARIEL", "Original", "Polvo", 5.5, 291.5),
    ("ARIEL", "Original", "Polvo", 6.0, 318.0),
    ("ARIEL", "Revita Color (Mezclilla)", "Líquido", 5.0, 209.5),
    ("ARIEL", "Ropa Color", "Líquido", 0.8, 40.0),
    ("ARIEL", "Ropa Color", "Líquido", 1.8, 89.0),
    ("ARIEL", "Ropa Color", "Líquido", 2.8, 147.0),
    ("ARIEL", "Ropa Color", "Líquido", 5.0, 210.0),
    ("ARIEL", "Dark & Colors", "Líquido", 8.0, 355.0),
];

pub fn builtin_catalog() -> Vec<CatalogEntry> {
    BUILTIN_DETERGENTS
        .iter()
        .map(|&(brand, name, kind, size, price)| CatalogEntry {
            brand: brand.to_string(),
            name: name.to_string(),
            kind: kind.to_string(),
            size,
            unit: DEFAULT_UNIT.to_string(),
            price,
            category: Category::Detergent,
        })
        .collect()
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinCatalog;

#[async_trait]
impl CatalogProvider for BuiltinCatalog {
    async fn load(&self) -> Result<Vec<CatalogEntry>> {
        Ok(builtin_catalog())
    }
}

/// Leading decimal number of a cell, like `parseFloat`: `"3.5 L"` -> 3.5.
fn parse_leading_number(cell: &str) -> Option<f64> {
    static NUMBER: OnceLock<Regex> = OnceLock::new();
    let re = NUMBER.get_or_init(|| {
        Regex::new(r"^[+-]?(\d+(\.\d*)?|\.\d+)").expect("number pattern is valid")
    });
    let cell = cell.trim().trim_start_matches('$');
    re.find(cell).and_then(|m| m.as_str().parse().ok())
}

fn default_name(category: Category) -> &'static str {
    match category {
        Category::Detergent => "Detergente",
        Category::Softener => "Suavizante",
        other => other.as_str(),
    }
}

/// 解析目錄 CSV；前兩行是標題
///
/// Detergent files start with the brand column, the other files carry a
/// leading column before it. Rows without a positive price are dropped.
pub fn parse_catalog_csv(text: &str, category: Category) -> Result<Vec<CatalogEntry>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let offset = match category {
        Category::Detergent => 0,
        _ => 1,
    };

    let mut entries = Vec::new();
    for record in reader.records().skip(HEADER_LINES) {
        let record = record?;
        if record.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }

        let text_cell = |index: usize, default: &str| -> String {
            record
                .get(index + offset)
                .map(str::trim)
                .filter(|cell| !cell.is_empty())
                .unwrap_or(default)
                .to_string()
        };
        let number_cell = |index: usize| record.get(index + offset).and_then(parse_leading_number);

        let brand = text_cell(0, DEFAULT_BRAND);
        let price = number_cell(4).unwrap_or(0.0);
        if brand.is_empty() || price <= 0.0 {
            continue;
        }

        entries.push(CatalogEntry {
            brand,
            name: text_cell(1, default_name(category)),
            kind: text_cell(2, DEFAULT_TYPE),
            size: number_cell(3).filter(|size| *size != 0.0).unwrap_or(1.0),
            unit: DEFAULT_UNIT.to_string(),
            price,
            category,
        });
    }

    Ok(entries)
}

/// Reads the catalog files through a [`Storage`] (usually a local directory).
pub struct FileCatalog<S: Storage> {
    storage: S,
}

impl<S: Storage> FileCatalog<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }
}

#[async_trait]
impl<S: Storage> CatalogProvider for FileCatalog<S> {
    async fn load(&self) -> Result<Vec<CatalogEntry>> {
        let mut all = Vec::new();
        for (file_name, category) in CATALOG_FILES {
            tracing::debug!("Loading catalog file {}", file_name);
            let data = match self.storage.read_file(file_name).await {
                Ok(data) => data,
                Err(e) => {
                    tracing::warn!("Skipping catalog file {}: {}", file_name, e);
                    continue;
                }
            };
            let entries = parse_catalog_csv(&String::from_utf8_lossy(&data), category)?;
            tracing::info!("Loaded {} products from {}", entries.len(), file_name);
            all.extend(entries);
        }
        Ok(all)
    }
}

/// Fetches `{base_url}/{file}` for every catalog file.
pub struct RemoteCsvCatalog {
    base_url: Url,
    client: Client,
}

impl RemoteCsvCatalog {
    pub fn new(base_url: &str) -> Result<Self> {
        crate::utils::validation::validate_url("catalog.base_url", base_url)?;
        let mut base_url = Url::parse(base_url).map_err(|e| CalcError::ConfigError {
            message: format!("Invalid catalog URL '{}': {}", base_url, e),
        })?;
        // 確保 join 時保留最後一段路徑
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self {
            base_url,
            client: Client::new(),
        })
    }

    async fn fetch(&self, file_name: &str) -> Result<String> {
        let url = self.base_url.join(file_name).map_err(|e| CalcError::CatalogError {
            message: format!("Cannot build URL for {}: {}", file_name, e),
        })?;
        tracing::debug!("Fetching catalog file {}", url);

        let response = self.client.get(url.clone()).send().await?;
        if !response.status().is_success() {
            return Err(CalcError::CatalogError {
                message: format!("{} returned {}", url, response.status()),
            });
        }
        Ok(response.text().await?)
    }
}

#[async_trait]
impl CatalogProvider for RemoteCsvCatalog {
    async fn load(&self) -> Result<Vec<CatalogEntry>> {
        let mut all = Vec::new();
        for (file_name, category) in CATALOG_FILES {
            match self.fetch(file_name).await {
                Ok(text) => {
                    let entries = parse_catalog_csv(&text, category)?;
                    tracing::info!("Loaded {} products from {}", entries.len(), file_name);
                    all.extend(entries);
                }
                Err(e) => tracing::warn!("Skipping catalog file {}: {}", file_name, e),
            }
        }
        Ok(all)
    }
}

/// Uses the built-in catalog when the primary source fails or is empty.
pub struct FallbackCatalog<P: CatalogProvider> {
    primary: P,
}

impl<P: CatalogProvider> FallbackCatalog<P> {
    pub fn new(primary: P) -> Self {
        Self { primary }
    }
}

#[async_trait]
impl<P: CatalogProvider> CatalogProvider for FallbackCatalog<P> {
    async fn load(&self) -> Result<Vec<CatalogEntry>> {
        match self.primary.load().await {
            Ok(entries) if !entries.is_empty() => Ok(entries),
            Ok(_) => {
                tracing::info!("Catalog source is empty, using built-in products");
                Ok(builtin_catalog())
            }
            Err(e) => {
                tracing::warn!("Catalog source failed ({}), using built-in products", e);
                Ok(builtin_catalog())
            }
        }
    }
}

/// Where the product catalog comes from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CatalogSource {
    #[default]
    Builtin,
    Directory(PathBuf),
    Remote(String),
}

impl CatalogSource {
    /// Loads the catalog, falling back to the built-in list.
    pub async fn load(&self) -> Result<Vec<CatalogEntry>> {
        match self {
            CatalogSource::Builtin => BuiltinCatalog.load().await,
            CatalogSource::Directory(dir) => {
                tracing::info!("Loading catalog files from {}", dir.display());
                FallbackCatalog::new(FileCatalog::new(LocalStorage::new(dir.clone())))
                    .load()
                    .await
            }
            CatalogSource::Remote(base_url) => {
                tracing::info!("Fetching catalog files from {}", base_url);
                FallbackCatalog::new(RemoteCsvCatalog::new(base_url)?)
                    .load()
                    .await
            }
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CatalogQuery {
    pub category: Option<Category>,
    pub term: Option<String>,
}

/// 依類別與關鍵字篩選，再依品牌與名稱分組（保留首次出現順序）
pub fn search<'a>(
    entries: &'a [CatalogEntry],
    query: &CatalogQuery,
) -> Vec<(String, Vec<&'a CatalogEntry>)> {
    let term = query
        .term
        .as_deref()
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty());

    let mut groups: Vec<(String, Vec<&CatalogEntry>)> = Vec::new();
    for entry in entries {
        if query.category.is_some_and(|c| c != entry.category) {
            continue;
        }
        if let Some(term) = &term {
            let label = format!("{} {}", entry.brand, entry.name).to_lowercase();
            if !label.contains(term.as_str()) {
                continue;
            }
        }

        let key = entry.group_key();
        match groups.iter_mut().find(|(k, _)| *k == key) {
            Some((_, members)) => members.push(entry),
            None => groups.push((key, vec![entry])),
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::MemoryStorage;

    const DETERGENT_CSV: &str = "\
Detergentes,,,,
Marca,Nombre,Tipo,Litros,Precio
Roma,Multiusos,Polvo,1,28.50
,,,,
Foca,,,,19.9

Zote,Barra,,abc,
";

    const SOFTENER_CSV: &str = "\
Suavizantes,,,,,
#,Marca,Nombre,Tipo,Litros,Precio
1,Downy,Libre Enjuague,Líquido,2.8L,$89.00
2,Suavitel,Complete,Líquido,0,45
";

    #[test]
    fn test_parse_detergent_layout() {
        let entries = parse_catalog_csv(DETERGENT_CSV, Category::Detergent).unwrap();
        assert_eq!(entries.len(), 2);

        assert_eq!(entries[0].brand, "Roma");
        assert_eq!(entries[0].name, "Multiusos");
        assert_eq!(entries[0].kind, "Polvo");
        assert_eq!(entries[0].size, 1.0);
        assert_eq!(entries[0].price, 28.5);
        assert_eq!(entries[0].unit, "L");

        // defaults for missing columns
        assert_eq!(entries[1].brand, "Foca");
        assert_eq!(entries[1].name, "Detergente");
        assert_eq!(entries[1].kind, "Líquido");
        assert_eq!(entries[1].size, 1.0);
    }

    #[test]
    fn test_parse_shifted_layout() {
        let entries = parse_catalog_csv(SOFTENER_CSV, Category::Softener).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].brand, "Downy");
        assert_eq!(entries[0].size, 2.8);
        assert_eq!(entries[0].price, 89.0);
        assert_eq!(entries[0].category, Category::Softener);
        assert_eq!(entries[1].size, 1.0);
    }

    #[test]
    fn test_default_name_for_other_categories() {
        let csv = "a\nb\n1,Lysol,,,,55\n";
        let entries = parse_catalog_csv(csv, Category::Disinfectant).unwrap();
        assert_eq!(entries[0].name, "disinfectant");
    }

    #[test]
    fn test_header_only_file_is_empty() {
        let entries = parse_catalog_csv("a,b\nc,d\n", Category::Enhancer).unwrap();
        assert!(entries.is_empty());
        assert!(parse_catalog_csv("", Category::Enhancer).unwrap().is_empty());
    }

    #[test]
    fn test_parse_leading_number() {
        assert_eq!(parse_leading_number("3.5 L"), Some(3.5));
        assert_eq!(parse_leading_number(" $45 "), Some(45.0));
        assert_eq!(parse_leading_number(".5"), Some(0.5));
        assert_eq!(parse_leading_number("abc"), None);
    }

    #[test]
    fn test_search_filters_and_groups() {
        let catalog = builtin_catalog();

        let all = search(&catalog, &CatalogQuery::default());
        assert_eq!(all[0].0, "MAS-Original");
        assert_eq!(all[0].1.len(), 5);

        let query = CatalogQuery {
            category: None,
            term: Some("ariel ropa".to_string()),
        };
        let groups = search(&catalog, &query);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].0, "ARIEL-Ropa Color");
        assert_eq!(groups[0].1.len(), 4);

        let softeners = CatalogQuery {
            category: Some(Category::Softener),
            term: None,
        };
        assert!(search(&catalog, &softeners).is_empty());
    }

    #[tokio::test]
    async fn test_file_catalog_skips_missing_files() {
        let storage = MemoryStorage::new();
        storage
            .write_file("Detergentes.csv", DETERGENT_CSV.as_bytes())
            .await
            .unwrap();
        storage
            .write_file("Suavizante.csv", SOFTENER_CSV.as_bytes())
            .await
            .unwrap();

        let entries = FileCatalog::new(storage).load().await.unwrap();
        assert_eq!(entries.len(), 4);
    }

    #[tokio::test]
    async fn test_fallback_uses_builtin_when_empty() {
        let catalog = FallbackCatalog::new(FileCatalog::new(MemoryStorage::new()));
        let entries = catalog.load().await.unwrap();
        assert_eq!(entries.len(), builtin_catalog().len());
    }

    #[test]
    fn test_remote_catalog_rejects_bad_url() {
        assert!(RemoteCsvCatalog::new("ftp://example.com/data").is_err());
        assert!(RemoteCsvCatalog::new("https://example.com/data").is_ok());
    }
}
