use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use loomcraft_catalog::{Category, Choice, Material, ProductId, SortBy, StockStatus};
use loomcraft_observability::LogFormat;

/// Browse and administer the LoomCraft textile catalog (in memory, seeded on start).
#[derive(Debug, Parser)]
#[command(name = "loomcraft", version)]
pub struct Cli {
    /// Log line format on stderr.
    #[arg(long, value_enum, default_value_t = LogArg::Json, global = true)]
    pub log_format: LogArg,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogArg {
    Json,
    Pretty,
}

impl From<LogArg> for LogFormat {
    fn from(value: LogArg) -> Self {
        match value {
            LogArg::Json => LogFormat::Json,
            LogArg::Pretty => LogFormat::Pretty,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List catalog products matching the given filters.
    List(ListArgs),
    /// Show one product with its inquiry links.
    Show { id: ProductId },
    /// Dashboard counts and stock value.
    Stats,
    /// Products highlighted on the home page.
    Featured {
        #[arg(long, default_value_t = 4)]
        limit: usize,
    },
    /// Apply a JSON script of admin operations, then print the resulting catalog.
    Apply { script: PathBuf },
}

#[derive(Debug, Default, clap::Args)]
pub struct ListArgs {
    /// Case-insensitive text matched against name, description and category.
    #[arg(long, default_value = "")]
    pub search: String,

    /// Category label, or `all`.
    #[arg(long, default_value = "all")]
    pub category: Choice<Category>,

    /// `in_stock`, `low_stock`, `out_of_stock`, or `all`.
    #[arg(long, default_value = "all")]
    pub status: Choice<StockStatus>,

    /// Material label, or `all`.
    #[arg(long, default_value = "all")]
    pub material: Choice<Material>,

    #[arg(long)]
    pub min_price: Option<f64>,

    #[arg(long)]
    pub max_price: Option<f64>,

    /// `newest`, `price-asc`, `price-desc` or `name`.
    #[arg(long, default_value = "newest")]
    pub sort: SortBy,
}
