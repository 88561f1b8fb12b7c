//! # Warp-Chain Node
//!
//! Runs one node on a durable store, treating every line on stdin as a
//! message to include in the next block.
//!
//! ## Startup Sequence
//!
//! 1. Load configuration (defaults, then `WC_*` environment variables)
//! 2. Open the durable store (file-backed if `WC_DATA_DIR` is set)
//! 3. Create genesis block (if not exists)
//! 4. Start the driver loop and the stdin reader
//! 5. Stop on Ctrl+C, or once end of input has been fully included

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use shared_types::{hash256, ChainState};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use node_runtime::{run_driver, wait_for_drain, Vm, VmConfig};
use wc_01_state_storage::{FileBackedKVStore, InMemoryKVStore, KeyValueStore, SystemTimeSource};
use wc_02_chain::Genesis;

fn log_level() -> Level {
    std::env::var("WC_LOG_LEVEL")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(Level::INFO)
}

fn open_store(config: &VmConfig) -> Result<Arc<dyn KeyValueStore>> {
    match config.store_path() {
        Some(path) => {
            if let Some(dir) = path.parent() {
                std::fs::create_dir_all(dir)
                    .with_context(|| format!("Failed to create data dir {}", dir.display()))?;
            }
            let store = FileBackedKVStore::open(&path)
                .with_context(|| format!("Failed to open store at {}", path.display()))?;
            info!("Data Dir: {:?}", path);
            Ok(Arc::new(store))
        }
        None => {
            warn!("WC_DATA_DIR not set, state will not survive restart");
            Ok(Arc::new(InMemoryKVStore::new()))
        }
    }
}

async fn read_messages(vm: Arc<Vm>, shutdown: CancellationToken) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = tokio::select! {
            line = lines.next_line() => line.context("Failed to read stdin")?,
            _ = shutdown.cancelled() => return Ok(()),
        };
        let Some(line) = line else {
            info!("End of input");
            return Ok(());
        };
        if line.is_empty() {
            continue;
        }
        let bytes = line.into_bytes();
        if let Err(e) = vm.add_message(hash256(&bytes), bytes) {
            warn!("Dropped message: {}", e);
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level())
        .with_target(true)
        .with_thread_ids(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("===========================================");
    info!("  Warp-Chain Node v{}", env!("CARGO_PKG_VERSION"));
    info!("===========================================");

    let config = VmConfig::from_env();
    let store = open_store(&config)?;
    let genesis = Genesis {
        timestamp: config.genesis_timestamp,
    };
    let vm = Arc::new(
        Vm::initialize(store, Arc::new(SystemTimeSource), &genesis, &config)
            .context("Failed to initialize chain")?,
    );
    vm.set_state(ChainState::NormalOp);

    let shutdown = CancellationToken::new();
    let mut driver = tokio::spawn(run_driver(
        Arc::clone(&vm),
        Duration::from_millis(config.block_interval_ms),
        shutdown.clone(),
    ));
    let reader = tokio::spawn(read_messages(Arc::clone(&vm), shutdown.clone()));

    info!("Node is running. Press Ctrl+C to stop.");
    let finished = tokio::select! {
        result = tokio::signal::ctrl_c() => {
            result?;
            None
        }
        result = &mut driver => Some(result),
        _ = reader => wait_for_drain(&vm, &mut driver).await,
    };

    info!("Initiating graceful shutdown...");
    shutdown.cancel();
    let accepted = match finished {
        Some(result) => result??,
        None => driver.await??,
    };
    info!(
        "Shutdown complete ({} blocks accepted, tip {})",
        accepted,
        vm.last_accepted()
    );

    Ok(())
}
