use crate::domain::model::{Category, LaundryStats, ProductDuration};
use clap::{Args, Parser, Subcommand};

#[derive(Debug, Clone, Parser)]
#[command(name = "geco-calc")]
#[command(about = "Laundry product expense calculator with GECO savings comparison")]
pub struct CliConfig {
    /// Path to a TOML profile
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Directory holding the saved product list
    #[arg(long, global = true)]
    pub data_dir: Option<String>,

    /// Directory with catalog CSV files
    #[arg(long, global = true)]
    pub catalog_dir: Option<String>,

    /// Base URL serving catalog CSV files
    #[arg(long, global = true)]
    pub catalog_url: Option<String>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Show current spending and the GECO comparison
    Calculate {
        #[command(flatten)]
        habits: HabitArgs,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },
    /// Manage the saved product list
    Products {
        #[command(subcommand)]
        action: ProductAction,
    },
    /// Browse the product catalog
    Catalog {
        #[arg(short, long)]
        search: Option<String>,

        #[arg(long)]
        category: Option<Category>,
    },
    /// Export the analysis as CSV files
    Export {
        #[command(flatten)]
        habits: HabitArgs,

        /// Output directory (overrides the profile)
        #[arg(short, long)]
        output: Option<String>,

        /// Only write the savings summary
        #[arg(long)]
        summary_only: bool,
    },
    /// Show each step of the guided flow and whether it can be completed
    Flow {
        #[command(flatten)]
        habits: HabitArgs,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum ProductAction {
    List,
    /// Add a custom product
    Add {
        #[arg(long)]
        name: String,

        #[arg(long)]
        price: f64,

        #[arg(long)]
        category: Category,

        /// Uses per package
        #[arg(long, default_value = "1")]
        quantity: u32,

        /// Uses per month
        #[arg(long, default_value = "1")]
        frequency: u32,

        /// 1week, 2weeks, 1month, 2months, 3months, 6months or 1year
        #[arg(long)]
        duration: Option<ProductDuration>,
    },
    /// Add the first catalog group matching a search term
    Pick {
        term: String,

        #[arg(long)]
        category: Option<Category>,

        /// Package size to pick within the group
        #[arg(long)]
        size: Option<f64>,
    },
    Remove {
        id: String,
    },
    Clear,
}

#[derive(Debug, Clone, Default, Args)]
pub struct HabitArgs {
    /// Loads per week
    #[arg(long)]
    pub loads: Option<u32>,

    /// Minutes per load
    #[arg(long)]
    pub time: Option<f64>,

    /// Liters per load
    #[arg(long)]
    pub water: Option<f64>,
}

impl HabitArgs {
    /// 命令列參數覆蓋設定檔中的洗衣習慣
    pub fn merge(&self, profile: Option<LaundryStats>) -> Option<LaundryStats> {
        let no_overrides = self.loads.is_none() && self.time.is_none() && self.water.is_none();
        if profile.is_none() && no_overrides {
            return None;
        }
        let base = profile.unwrap_or_default();
        Some(LaundryStats {
            loads_per_week: self.loads.unwrap_or(base.loads_per_week),
            time_per_load: self.time.unwrap_or(base.time_per_load),
            water_per_load: self.water.unwrap_or(base.water_per_load),
        })
    }
}
