//! Market event ingestion daemon
//!
//! Starts one processor per configured market, each consuming that market's
//! event partition, and drains them all on SIGINT/SIGTERM. The in-memory
//! partition stands in for the external log; `--demo` feeds it synthetic
//! trades so the pipeline can be observed end to end.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use tracing::info;

use common::Market;
use config::Config;
use ingest::{
    MarketEventProcessor, ProcessorSupervisor, ShutdownController, TracingSink,
};
use protocol::wire::envelope::Payload;
use protocol::wire::{self, EventEnvelope, TradeEvent};
use stream::MemoryPartition;

#[derive(Debug, Parser)]
#[command(name = "feedd", about = "Market event ingestion daemon", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Start ingestion for every configured market
    Start {
        /// Path to the configuration file
        #[arg(short, long, env = "FEEDD_CONFIG", default_value = "feedd.yaml")]
        config: PathBuf,
        /// Feed synthetic trades into each market's partition
        #[arg(long)]
        demo: bool,
    },
    /// Load and validate a configuration file
    Validate {
        #[arg(short, long, env = "FEEDD_CONFIG", default_value = "feedd.yaml")]
        config: PathBuf,
    },
    /// Write a sample configuration file
    Init {
        #[arg(short, long, default_value = "feedd.yaml")]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Start { config, demo } => start(config, demo).await,
        Commands::Validate { config } => validate(config),
        Commands::Init { output } => init(output),
    }
}

async fn start(config_path: PathBuf, demo: bool) -> Result<()> {
    let config = Config::load(&config_path)
        .with_context(|| format!("loading {}", config_path.display()))?;
    observability::init_logging("feedd", &config.log)?;
    info!(
        markets = config.markets.len(),
        config = %config_path.display(),
        "starting ingestion"
    );

    let shutdown = ShutdownController::with_signals();
    let sink = Arc::new(TracingSink);
    let mut supervisor = ProcessorSupervisor::new(shutdown.token());

    for market in &config.markets {
        let partition = MemoryPartition::new();
        if demo {
            spawn_demo_feed(market.clone(), partition.clone(), shutdown.child_token());
        }
        supervisor.spawn(MarketEventProcessor::new(
            market.clone(),
            partition,
            sink.clone(),
        ));
    }

    shutdown.wait_for_shutdown().await;
    supervisor.join().await;
    info!("all processors stopped");
    Ok(())
}

fn validate(config_path: PathBuf) -> Result<()> {
    let config = Config::load(&config_path)
        .with_context(|| format!("loading {}", config_path.display()))?;
    println!(
        "{}: ok ({} markets)",
        config_path.display(),
        config.markets.len()
    );
    Ok(())
}

fn init(output: PathBuf) -> Result<()> {
    const SAMPLE: &str = "\
markets:
  - id: BTC-USD
    market_precision: 8
    quote_precision: 2
    market_coin_symbol: BTC
    quote_coin_symbol: USD
stream:
  brokers:
    - localhost:9092
  use_tls: false
writer:
  queue_capacity: 100
  batch_size: 20000
  batch_timeout_ms: 100
log:
  format: pretty
";
    std::fs::write(&output, SAMPLE)
        .with_context(|| format!("writing {}", output.display()))?;
    println!("wrote sample config to {}", output.display());
    Ok(())
}

/// Publish a synthetic trade into `partition` every interval until shutdown.
fn spawn_demo_feed(market: Market, partition: MemoryPartition, cancel: CancellationToken) {
    tokio::spawn(async move {
        let mut seq_id: u64 = 0;
        let price = 5u64.saturating_mul(10u64.pow(u32::from(market.quote_precision) + 3));
        let amount = 10u64.pow(u32::from(market.market_precision));
        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(Duration::from_secs(1)) => {}
            }
            seq_id += 1;
            let payload = protocol::encode_envelope(&EventEnvelope {
                seq_id,
                market: market.id.clone(),
                payload: Some(Payload::Trade(TradeEvent {
                    price,
                    amount,
                    taker_side: if seq_id % 2 == 0 {
                        wire::Side::Buy as i32
                    } else {
                        wire::Side::Sell as i32
                    },
                    ask_id: seq_id,
                    ask_owner_id: 1,
                    bid_id: seq_id + 1,
                    bid_owner_id: 2,
                })),
            });
            partition.push(payload);
        }
    });
}
