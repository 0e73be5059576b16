//! `petstock`: command-line shell over the inventory service.

mod render;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;

use petstock_core::SystemClock;
use petstock_infra::{CsvTableStore, InventoryService, ServiceError, StoreConfig};
use petstock_inventory::LotPolicy;
use petstock_observability::LogFormat;

#[derive(Parser)]
#[command(name = "petstock")]
#[command(about = "Pet-food stock and movement ledger backed by two CSV tables")]
#[command(version)]
struct Cli {
    /// Directory holding the stock and movement tables [env: PETSTOCK_DATA_DIR]
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// How repeated registrations are stored: first-lot, fifo or merge [env: PETSTOCK_LOT_POLICY]
    #[arg(long)]
    lot_policy: Option<LotPolicy>,

    /// Log format on stderr: pretty or json
    #[arg(long, env = "PETSTOCK_LOG_FORMAT", default_value = "pretty")]
    log_format: LogFormat,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Register incoming stock
    Register {
        #[arg(long, default_value = "")]
        category: String,
        #[arg(long)]
        product: String,
        #[arg(long)]
        quantity: u64,
        #[arg(long)]
        unit_value: Decimal,
    },

    /// Record an outgoing sale
    Dispense {
        #[arg(long)]
        product: String,
        #[arg(long)]
        quantity: u64,
    },

    /// Show every stock row
    Stock,

    /// List distinct products
    Products,

    /// Row count, total quantity and total value
    Totals,

    /// Per-product quantity, mean unit value and total value
    Stats,

    /// Movements recorded on one day
    Report {
        /// Day to report (YYYY-MM-DD); defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    petstock_observability::init(cli.log_format);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => match err.downcast_ref::<ServiceError>() {
            Some(ServiceError::Ledger(rejection)) => {
                eprintln!("{rejection}");
                ExitCode::from(1)
            }
            _ => {
                tracing::error!(error = %format!("{err:#}"), "fatal");
                eprintln!("error: {err:#}");
                ExitCode::from(2)
            }
        },
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = StoreConfig::from_env().context("invalid PETSTOCK_* configuration")?;
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }
    if let Some(policy) = cli.lot_policy {
        config.lot_policy = policy;
    }
    config.validate()?;

    let store = CsvTableStore::from_config(&config);
    let mut service = InventoryService::open(store, SystemClock, config.lot_policy)
        .with_context(|| format!("failed to load inventory from {}", config.data_dir.display()))?;

    let json = cli.json;
    match cli.command {
        Command::Register {
            category,
            product,
            quantity,
            unit_value,
        } => {
            let event = service.register(&category, &product, quantity, unit_value)?;
            if json {
                print_json(&event)?;
            } else {
                println!("Product registered: {} x {}", quantity, product);
                print!("{}", render::stock_table(service.ledger().entries()));
            }
        }
        Command::Dispense { product, quantity } => {
            let event = service.dispense(&product, quantity)?;
            if json {
                print_json(&event)?;
            } else {
                println!("Dispensed {quantity} of {product}.");
            }
        }
        Command::Stock => {
            let entries = service.ledger().entries();
            if json {
                print_json(&entries)?;
            } else {
                print!("{}", render::stock_table(entries));
            }
        }
        Command::Products => {
            let products = service.products();
            if json {
                print_json(&products)?;
            } else {
                for product in products {
                    println!("{product}");
                }
            }
        }
        Command::Totals => {
            let totals = service.totals();
            if json {
                print_json(&totals)?;
            } else {
                print!("{}", render::totals(&totals));
            }
        }
        Command::Stats => {
            let stats = service.per_product_stats();
            if json {
                print_json(&stats)?;
            } else {
                print!("{}", render::product_stats(&stats));
            }
        }
        Command::Report { date } => {
            let date = date.unwrap_or_else(|| service.today());
            let movements = service.daily_report(date);
            if json {
                print_json(&movements)?;
            } else {
                print!("{}", render::daily_report(date, &movements));
            }
        }
    }

    Ok(())
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    let text = serde_json::to_string_pretty(value).context("failed to encode JSON output")?;
    println!("{text}");
    Ok(())
}
