use clap::Parser;
use geco_calc::adapters::catalog::{search, CatalogQuery, CatalogSource};
use geco_calc::adapters::export::ReportExporter;
use geco_calc::config::toml_config::ProfileConfig;
use geco_calc::config::{Command, HabitArgs, ProductAction};
use geco_calc::core::flow::FLOW_STEPS;
use geco_calc::core::format::{format_currency, format_number, format_percentage};
use geco_calc::core::report::{
    category_breakdown, comparison_rows, five_year_expense, five_year_projection,
    savings_percentages, Savings,
};
use geco_calc::utils::error::ErrorSeverity;
use geco_calc::utils::{logger, validation::Validate};
use geco_calc::{
    CalcError, CliConfig, LaundryStats, LocalStorage, Product, ProductId, Result, Session,
    SnapshotStore,
};
use std::path::PathBuf;

type CliSession = Session<SnapshotStore<LocalStorage>>;

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    // 載入設定檔（未指定時使用預設值）
    let profile = match &cli.config {
        Some(path) => match ProfileConfig::from_file(path) {
            Ok(profile) => profile,
            Err(e) => {
                eprintln!("❌ Failed to load config file '{}': {}", path, e);
                eprintln!("💡 Make sure the file exists and is valid TOML format");
                std::process::exit(1);
            }
        },
        None => ProfileConfig::default(),
    };

    // 初始化日誌
    if cli.json_logs || profile.json_logs() {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose, profile.log_level());
    }

    tracing::debug!("CLI config: {:?}", cli);

    // 驗證配置
    if let Err(e) = profile.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    if let Err(e) = run(&cli, &profile).await {
        tracing::error!(
            "❌ Command failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 建議: {}", e.recovery_suggestion());

        let exit_code = match e.severity() {
            ErrorSeverity::Low => 2,
            ErrorSeverity::Medium => 3,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 4,
        };
        std::process::exit(exit_code);
    }

    Ok(())
}

async fn run(cli: &CliConfig, profile: &ProfileConfig) -> Result<()> {
    let data_dir = cli
        .data_dir
        .as_ref()
        .map(PathBuf::from)
        .unwrap_or_else(|| profile.data_dir());
    tracing::debug!("Using data directory {}", data_dir.display());

    let mut session = Session::open(SnapshotStore::new(LocalStorage::new(data_dir))).await;

    match &cli.command {
        Command::Calculate { habits, json } => {
            apply_habits(&mut session, habits, profile)?;
            if *json {
                println!("{}", serde_json::to_string_pretty(&session.summary())?);
            } else {
                print_summary(&session);
            }
        }
        Command::Products { action } => {
            run_product_action(&mut session, action, cli, profile).await?;
        }
        Command::Catalog { search: term, category } => {
            let entries = catalog_source(cli, profile).load().await?;
            let query = CatalogQuery {
                category: *category,
                term: term.clone(),
            };
            let groups = search(&entries, &query);
            if groups.is_empty() {
                println!("No catalog products match.");
            }
            for (_, members) in groups {
                let first = members[0];
                println!("{} {} ({})", first.brand, first.name, first.category.label());
                for entry in members {
                    println!(
                        "    {} {}{}  {}",
                        entry.kind,
                        entry.size,
                        entry.unit,
                        format_currency(entry.price)
                    );
                }
            }
        }
        Command::Export {
            habits,
            output,
            summary_only,
        } => {
            apply_habits(&mut session, habits, profile)?;
            let output_path = output
                .as_ref()
                .map(PathBuf::from)
                .unwrap_or_else(|| profile.export_path());
            let exporter = ReportExporter::new(LocalStorage::new(output_path.clone()));
            let today = chrono::Local::now().date_naive();
            let summary = session.summary();

            let file_name = if *summary_only {
                exporter.export_savings_summary(&summary, today).await?
            } else {
                exporter
                    .export_report(&summary, session.products(), session.stats(), today)
                    .await?
            };
            println!("📁 Output saved to: {}", output_path.join(file_name).display());
        }
        Command::Flow { habits } => {
            apply_habits(&mut session, habits, profile)?;
            for step in FLOW_STEPS {
                let validation = session.validate(step);
                let mark = if validation.is_valid { "✅" } else { "⛔" };
                println!(
                    "{} [{:>3.0}%] {} - {}",
                    mark,
                    step.progress(),
                    step.title(),
                    step.description()
                );
                if let Some(message) = validation.message {
                    println!("      {}", message);
                }
            }
        }
    }

    Ok(())
}

async fn run_product_action(
    session: &mut CliSession,
    action: &ProductAction,
    cli: &CliConfig,
    profile: &ProfileConfig,
) -> Result<()> {
    match action {
        ProductAction::List => {
            if session.products().is_empty() {
                println!("No products saved yet.");
            }
            for product in session.products() {
                let sizing = match product.duration {
                    Some(duration) => format!("lasts {}", duration.label()),
                    None => format!(
                        "{} uses/package, {} uses/month",
                        product.quantity, product.usage_frequency
                    ),
                };
                println!(
                    "{}  {} [{}] {} ({})",
                    product.id,
                    product.name,
                    product.category,
                    format_currency(product.price),
                    sizing
                );
            }
        }
        ProductAction::Add {
            name,
            price,
            category,
            quantity,
            frequency,
            duration,
        } => {
            let mut product = Product::new(name.clone(), *price, *category)
                .with_usage(*quantity, *frequency);
            product.duration = *duration;
            let id = session.add_product(product).await?;
            println!("✅ Added {} ({})", name, id);
        }
        ProductAction::Pick {
            term,
            category,
            size,
        } => {
            let entries = catalog_source(cli, profile).load().await?;
            let query = CatalogQuery {
                category: *category,
                term: Some(term.clone()),
            };
            let groups = search(&entries, &query);
            let (_, members) = groups.first().ok_or_else(|| CalcError::CatalogError {
                message: format!("No catalog product matches '{}'", term),
            })?;

            let entry = match size {
                Some(size) => members
                    .iter()
                    .find(|e| (e.size - size).abs() < f64::EPSILON)
                    .ok_or_else(|| CalcError::CatalogError {
                        message: format!("No {} package for '{}'", size, term),
                    })?,
                None => &members[0],
            };

            match session.add_from_catalog(entry).await? {
                Some(id) => println!("✅ Added {} ({})", entry.display_name(), id),
                None => println!("ℹ️  {} is already selected", entry.display_name()),
            }
        }
        ProductAction::Remove { id } => {
            let id = ProductId::from(id.as_str());
            match session.remove_product(&id).await? {
                Some(product) => println!("🗑️  Removed {}", product.name),
                None => return Err(CalcError::ProductNotFound { id: id.to_string() }),
            }
        }
        ProductAction::Clear => {
            session.clear().await?;
            println!("🗑️  Product list cleared");
        }
    }
    Ok(())
}

fn catalog_source(cli: &CliConfig, profile: &ProfileConfig) -> CatalogSource {
    if let Some(url) = &cli.catalog_url {
        CatalogSource::Remote(url.clone())
    } else if let Some(dir) = &cli.catalog_dir {
        CatalogSource::Directory(PathBuf::from(dir))
    } else {
        profile.catalog_source()
    }
}

fn apply_habits(session: &mut CliSession, habits: &HabitArgs, profile: &ProfileConfig) -> Result<()> {
    if let Some(stats) = habits.merge(profile.laundry_stats()) {
        session.set_stats(stats)?;
    }
    Ok(())
}

fn print_summary(session: &CliSession) {
    let summary = session.summary();

    println!("Gastos mensuales: {}", format_currency(summary.total_expense));
    println!("Gastos anuales:   {}", format_currency(summary.yearly_expense));
    for share in category_breakdown(&summary) {
        println!(
            "  {:<15} {:>12}  {:>6}",
            share.category.label(),
            format_currency(share.monthly),
            format_percentage(share.percentage, 0)
        );
    }

    let Some(stats) = session.stats() else {
        println!();
        println!("Add laundry habits (--loads/--time/--water or [habits]) to compare with GECO.");
        return;
    };
    print_comparison(&summary, stats);
}

fn print_comparison(summary: &geco_calc::ExpenseSummary, stats: &LaundryStats) {
    println!();
    println!(
        "Comparación con GECO ({} cargas/semana, {} min, {} L):",
        stats.loads_per_week, stats.time_per_load, stats.water_per_load
    );
    let saved = Savings::from_summary(summary).clamped();
    let saved_pct = savings_percentages(summary).clamped();
    for row in comparison_rows(summary) {
        let amount = saved.of(row.kind);
        let (traditional, geco, saved_text) = match row.kind.unit() {
            "$" => (
                format_currency(row.traditional),
                format_currency(row.geco),
                format_currency(amount),
            ),
            unit => (
                format_number(row.traditional, unit),
                format_number(row.geco, unit),
                format_number(amount, unit),
            ),
        };
        println!(
            "  {:<17} {:>14} -> {:>14}  ahorro {} ({})",
            row.kind.title(),
            traditional,
            geco,
            saved_text,
            format_percentage(saved_pct.of(row.kind), 0)
        );
    }

    let savings = Savings::from_summary(summary);
    if savings.money < 0.0 {
        println!(
            "  GECO costs {} more per year for your current products.",
            format_currency(-savings.money)
        );
    }

    println!(
        "En 5 años gastarías {} con tus productos actuales.",
        format_currency(five_year_expense(summary))
    );
    let projection = five_year_projection(summary);
    println!(
        "En 5 años: {}, {}, {}",
        format_currency(projection.money),
        format_number(projection.water, "litros"),
        format_number(projection.time, "horas")
    );
}
