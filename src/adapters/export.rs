use crate::core::calculator::{product_yearly_cost, MONTHS_PER_YEAR, WEEKS_PER_YEAR};
use crate::core::format::{format_currency, format_number, format_percentage};
use crate::core::report::savings_percentages;
use crate::domain::model::{Category, ExpenseSummary, LaundryStats, Product};
use crate::domain::ports::Storage;
use crate::utils::error::{CalcError, Result};
use chrono::NaiveDate;
use std::io::Write;
use zip::write::{FileOptions, ZipWriter};

pub const COMPARISON_FILE: &str = "comparacion.csv";
pub const PRODUCTS_FILE: &str = "productos.csv";
pub const STATS_FILE: &str = "estadisticas.csv";

type Table = Vec<Vec<String>>;

fn row<const N: usize>(cells: [&str; N]) -> Vec<String> {
    cells.iter().map(|c| c.to_string()).collect()
}

pub fn report_file_name(date: NaiveDate) -> String {
    format!("analisis-geco-{}.zip", date.format("%Y-%m-%d"))
}

pub fn savings_file_name(date: NaiveDate) -> String {
    format!("resumen-ahorros-geco-{}.csv", date.format("%Y-%m-%d"))
}

pub const GECO_ADVANTAGES: [&str; 6] = [
    "✓ TODO EN UNO: detergente + suavizante + desinfectante + aroma",
    "✓ Solo 2 tabletas por carga (no más productos adicionales)",
    "✓ Fórmula eco-friendly concentrada",
    "✓ Reduce tiempo de lavado en 30 minutos",
    "✓ Menor consumo de agua (50% menos)",
    "✓ Más económico vs comprar múltiples productos",
];

/// 報表中的分類名稱
fn breakdown_label(category: Category) -> &'static str {
    match category {
        Category::Detergent => "Detergente",
        Category::Softener => "Suavizante",
        Category::Disinfectant => "Desinfectante",
        Category::Enhancer => "Potenciadores",
    }
}

/// Traditional vs GECO table with the yearly category breakdown.
pub fn comparison_table(summary: &ExpenseSummary) -> Table {
    let mut rows = vec![
        row(["CONCEPTO", "PRODUCTOS TRADICIONALES", "GECO", "AHORRO"]),
        vec![
            "Gasto Anual".to_string(),
            format_currency(summary.yearly_expense),
            format_currency(summary.geco_yearly_expense),
            format_currency(summary.saved_money),
        ],
        vec![
            "Consumo de Agua (L/año)".to_string(),
            format_number(summary.yearly_water_usage, "L"),
            format_number(summary.geco_yearly_water_usage, "L"),
            format_number(summary.saved_water, "L"),
        ],
        vec![
            "Tiempo Invertido (horas/año)".to_string(),
            format!("{:.1}", summary.yearly_time_spent),
            format!("{:.1}", summary.geco_yearly_time_spent),
            format!("{:.1}", summary.saved_time),
        ],
        row(["DESGLOSE POR CATEGORÍA", "", "", ""]),
    ];

    for category in Category::ALL {
        rows.push(vec![
            breakdown_label(category).to_string(),
            format_currency(summary.category_expense(category) * MONTHS_PER_YEAR),
            "Incluido en GECO".to_string(),
            String::new(),
        ]);
    }

    rows.push(row(["", "", "", ""]));
    rows.push(row(["VENTAJAS DE GECO", "", "", ""]));
    rows.extend(GECO_ADVANTAGES.map(|line| row([line, "", "", ""])));
    rows
}

pub fn products_table(products: &[Product]) -> Table {
    let mut rows = vec![row([
        "PRODUCTO",
        "CATEGORÍA",
        "PRECIO",
        "CANTIDAD",
        "DURACIÓN",
        "COSTO ANUAL",
    ])];
    rows.extend(products.iter().map(|product| {
        vec![
            product.name.clone(),
            product.category.to_string(),
            format_currency(product.price),
            product.quantity.to_string(),
            product
                .duration
                .map(|d| d.to_string())
                .unwrap_or_else(|| "N/A".to_string()),
            format_currency(product_yearly_cost(product)),
        ]
    }));
    rows
}

pub fn stats_table(stats: &LaundryStats) -> Table {
    let yearly_loads = f64::from(stats.loads_per_week) * WEEKS_PER_YEAR;
    vec![
        row(["CONCEPTO", "VALOR", "UNIDAD"]),
        vec![
            "Cargas por semana".to_string(),
            stats.loads_per_week.to_string(),
            "cargas".to_string(),
        ],
        vec![
            "Tiempo por carga".to_string(),
            stats.time_per_load.to_string(),
            "minutos".to_string(),
        ],
        vec![
            "Agua por carga".to_string(),
            stats.water_per_load.to_string(),
            "litros".to_string(),
        ],
        row(["CÁLCULOS ANUALES", "", ""]),
        vec![
            "Total de cargas al año".to_string(),
            yearly_loads.to_string(),
            "cargas".to_string(),
        ],
        vec![
            "Tiempo total al año".to_string(),
            ((yearly_loads * stats.time_per_load) / 60.0).round().to_string(),
            "horas".to_string(),
        ],
        vec![
            "Agua total al año".to_string(),
            (yearly_loads * stats.water_per_load).to_string(),
            "litros".to_string(),
        ],
    ]
}

pub fn savings_table(summary: &ExpenseSummary) -> Table {
    let pct = savings_percentages(summary);
    // 分母為 0 時顯示 0%
    let percent = |value: f64, whole: f64| {
        if whole > 0.0 {
            format_percentage(value, 1)
        } else {
            "0%".to_string()
        }
    };

    vec![
        row(["CONCEPTO", "AHORRO ANUAL", "PORCENTAJE"]),
        vec![
            "Ahorro Económico".to_string(),
            format_currency(summary.saved_money),
            percent(pct.money, summary.yearly_expense),
        ],
        vec![
            "Ahorro de Agua".to_string(),
            format_number(summary.saved_water, "litros"),
            percent(pct.water, summary.yearly_water_usage),
        ],
        vec![
            "Ahorro de Tiempo".to_string(),
            format!("{:.1} horas", summary.saved_time),
            percent(pct.time, summary.yearly_time_spent),
        ],
    ]
}

pub fn table_to_csv(rows: &Table) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .from_writer(Vec::new());
    for record in rows {
        writer.write_record(record)?;
    }
    writer
        .into_inner()
        .map_err(|e| CalcError::IoError(e.into_error()))
}

/// Writes report archives and savings summaries through a [`Storage`].
pub struct ReportExporter<S: Storage> {
    storage: S,
}

impl<S: Storage> ReportExporter<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// 匯出完整分析（比較、產品、洗衣統計），回傳檔名
    pub async fn export_report(
        &self,
        summary: &ExpenseSummary,
        products: &[Product],
        stats: Option<&LaundryStats>,
        date: NaiveDate,
    ) -> Result<String> {
        let file_name = report_file_name(date);

        let zip_data = {
            let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));

            zip.start_file::<_, ()>(COMPARISON_FILE, FileOptions::default())?;
            zip.write_all(&table_to_csv(&comparison_table(summary))?)?;

            zip.start_file::<_, ()>(PRODUCTS_FILE, FileOptions::default())?;
            zip.write_all(&table_to_csv(&products_table(products))?)?;

            if let Some(stats) = stats {
                zip.start_file::<_, ()>(STATS_FILE, FileOptions::default())?;
                zip.write_all(&table_to_csv(&stats_table(stats))?)?;
            }

            zip.finish()?.into_inner()
        };

        tracing::debug!("Writing report archive ({} bytes)", zip_data.len());
        self.storage.write_file(&file_name, &zip_data).await?;
        tracing::info!("Report exported to {}", file_name);
        Ok(file_name)
    }

    pub async fn export_savings_summary(
        &self,
        summary: &ExpenseSummary,
        date: NaiveDate,
    ) -> Result<String> {
        let file_name = savings_file_name(date);
        let data = table_to_csv(&savings_table(summary))?;
        self.storage.write_file(&file_name, &data).await?;
        tracing::info!("Savings summary exported to {}", file_name);
        Ok(file_name)
    }
}
