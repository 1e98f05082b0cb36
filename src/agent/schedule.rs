//! Fixed-interval scheduling for the agent loops

use crate::error::Result;
use async_trait::async_trait;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{error, info};

/// A unit of periodic work
#[async_trait]
pub trait PollTask: Send + Sync {
    /// Name used in logs
    fn name(&self) -> &'static str;

    /// Delay after one tick completes and before the next one starts
    fn interval(&self) -> Duration;

    /// Run one cycle
    async fn tick(&self) -> Result<()>;
}

/// Run `task` back to back with its interval in between.
///
/// The first tick runs immediately. The interval is a sleep after each tick,
/// so a slow tick pushes the next one back and ticks never overlap. An error
/// from a tick stops the schedule and is returned; ticks handle their own
/// recoverable failures. With `max_cycles` set the schedule returns after that
/// many ticks without sleeping after the last one.
///
/// Returns the number of completed ticks.
pub async fn run_schedule<T: PollTask + ?Sized>(task: &T, max_cycles: Option<u64>) -> Result<u64> {
    let mut cycles = 0u64;
    info!("🚀 Starting {} (every {:?})", task.name(), task.interval());

    loop {
        if let Err(e) = task.tick().await {
            error!("🛑 {} stopped after {} cycles: {}", task.name(), cycles, e);
            return Err(e);
        }
        cycles += 1;

        if max_cycles.map_or(false, |max| cycles >= max) {
            info!("⏹️ {} finished after {} cycles", task.name(), cycles);
            return Ok(cycles);
        }
        sleep(task.interval()).await;
    }
}
