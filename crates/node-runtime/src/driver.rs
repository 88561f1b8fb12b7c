//! Single-node driver loop
//!
//! Stands in for a consensus engine on a one-validator network: whenever
//! messages arrive it builds a block on the tip, then verifies and accepts it.
//! Shutdown interrupts the wait; a round that has started building runs to
//! completion. A round whose block fails to verify or accept puts the
//! block's messages back in the queue before the driver halts.

use crate::error::VmError;
use crate::vm::Vm;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::{JoinError, JoinHandle};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// Task running [`run_driver`]
pub type DriverHandle = JoinHandle<Result<u64, VmError>>;

/// Run until `shutdown` is cancelled; returns the number of blocks accepted
pub async fn run_driver(
    vm: Arc<Vm>,
    interval: Duration,
    shutdown: CancellationToken,
) -> Result<u64, VmError> {
    let mut accepted = 0u64;
    info!("Driver started at {}", vm.last_accepted());

    loop {
        match step(&vm, interval, &shutdown).await {
            Ok(()) => accepted += 1,
            Err(e) if e.is_cancelled() => break,
            Err(e) => {
                error!("Driver halted after {} blocks: {}", accepted, e);
                return Err(e);
            }
        }
    }

    info!("Driver stopped after {} blocks", accepted);
    Ok(accepted)
}

async fn step(vm: &Vm, interval: Duration, shutdown: &CancellationToken) -> Result<(), VmError> {
    vm.wait_for_event(shutdown).await?;

    if !interval.is_zero() {
        tokio::select! {
            _ = tokio::time::sleep(interval) => {}
            _ = shutdown.cancelled() => return Err(VmError::Chain(wc_02_chain::ChainError::Cancelled)),
        }
    }

    let round = CancellationToken::new();
    let block = vm.build_block(&round)?;
    if let Err(e) = block.verify(&round).and_then(|()| block.accept(&round)) {
        if let Err(reject) = block.reject(&round) {
            warn!("Failed to drop block {}: {}", block.id(), reject);
        }
        vm.builder().requeue(block.block());
        return Err(e.into());
    }
    vm.set_preference(block.id());
    Ok(())
}

/// Wait until every pending message has been included
///
/// Returns early with the driver's result if it exits first, since nothing
/// would drain the queue after that.
pub async fn wait_for_drain(
    vm: &Vm,
    driver: &mut DriverHandle,
) -> Option<Result<Result<u64, VmError>, JoinError>> {
    let drained = async {
        while vm.builder().pending_len() > 0 {
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
    };
    tokio::select! {
        _ = drained => None,
        result = driver => Some(result),
    }
}
