//! pred-book - prediction market snapshot reader
//!
//! Reads order book and fill log snapshots from a snapshot directory and
//! prints their public views as JSON.

use clap::{Parser, Subcommand};
use serde_json::{json, Value};
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use pred_market_data::price::{
    complement_tick, cost_per_unit, format_currency, is_valid_tick, tick_to_fraction,
    CURRENCY_DECIMALS,
};
use pred_market_data::{BookReader, Config, FileSource, OrderBookView, RecordAddress, Result};

#[derive(Debug, Parser)]
#[command(name = "pred-book", about = "Decode prediction market order book snapshots")]
struct Cli {
    /// Snapshot directory (overrides SNAPSHOT_DIR)
    #[arg(long, global = true)]
    snapshot_dir: Option<PathBuf>,

    /// Price levels to print per side (overrides DEPTH_LEVELS)
    #[arg(long, global = true)]
    depth: Option<usize>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Aggregated depth of one order book
    Book { address: RecordAddress },
    /// Identity of a fill log
    FillLog { address: RecordAddress },
    /// YES and NO order books of a market leg
    Leg {
        yes: RecordAddress,
        no: RecordAddress,
    },
    /// Conversions for a price tick
    Price { tick: u16 },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so stdout stays pure JSON
    tracing_subscriber::registry()
        .with(fmt::layer().json().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .init();

    let cli = Cli::parse();

    let mut config = Config::load()?;
    if let Some(dir) = cli.snapshot_dir {
        config.snapshot_dir = dir;
    }
    if let Some(depth) = cli.depth {
        config.depth_levels = depth;
    }
    info!(snapshot_dir = %config.snapshot_dir.display(), "Configuration loaded");

    let reader = BookReader::new(FileSource::new(
        &config.snapshot_dir,
        &config.snapshot_extension,
    ));

    let output = match cli.command {
        Command::Book { address } => {
            let view = reader.order_book(&address).await?;
            book_json(view, config.depth_levels)?
        }
        Command::FillLog { address } => {
            let view = reader.fill_log(&address).await?;
            json!({ "fill_log": serde_json::to_value(view)? })
        }
        Command::Leg { yes, no } => {
            let legs = reader.leg_books(&yes, &no).await?;
            json!({
                "yes": book_json(legs.yes, config.depth_levels)?,
                "no": book_json(legs.no, config.depth_levels)?,
            })
        }
        Command::Price { tick } => {
            anyhow::ensure!(is_valid_tick(tick), "tick must be between 1 and 999, got {tick}");
            price_json(tick)?
        }
    };

    let document = json!({
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "result": output,
    });
    println!("{}", serde_json::to_string_pretty(&document)?);

    Ok(())
}

/// Book, metrics and display notional; totals past `u64` are written as strings
fn book_json(view: Option<OrderBookView>, depth_levels: usize) -> Result<Value> {
    match view {
        Some(mut view) => {
            let metrics = view.metrics();
            view.trim_depth(depth_levels);
            Ok(json!({
                "notional_display": format_currency(metrics.notional, CURRENCY_DECIMALS),
                "book": serde_json::to_value(view)?,
                "metrics": serde_json::to_value(metrics)?,
            }))
        }
        None => Ok(json!({ "book": null })),
    }
}

fn price_json(tick: u16) -> Result<Value> {
    let cost = cost_per_unit(tick);
    Ok(json!({
        "tick": tick,
        "price": serde_json::to_value(tick_to_fraction(tick))?,
        "complement": complement_tick(tick),
        "cost_per_share": cost,
        "cost_display": format_currency(u128::from(cost), CURRENCY_DECIMALS),
    }))
}
