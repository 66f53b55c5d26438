//! Per-address serialization table.
//!
//! [`LaneTable`] maps each actor address to an async mutex. Holding the
//! mutex is what it means for an actor to be "executing": operations sent to
//! the same address run one at a time in arrival order (tokio's mutex is
//! fair), while different addresses run in parallel. Records are created on
//! first use and reclaimed by a periodic idle sweep.

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

use super::address::ActorAddress;

/// Serialization records for every live actor lane.
///
/// Uses `DashMap` for concurrent access from every executing lane.
#[derive(Debug, Default)]
pub struct LaneTable {
    lanes: DashMap<ActorAddress, Arc<Mutex<()>>>,
}

impl LaneTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits for exclusive use of `address`.
    ///
    /// The returned guard keeps the lane busy until it is dropped. The map
    /// shard lock is released before awaiting so waiting never blocks other
    /// addresses.
    pub async fn acquire(&self, address: &ActorAddress) -> OwnedMutexGuard<()> {
        let lane = {
            let entry = self
                .lanes
                .entry(address.clone())
                .or_insert_with(|| Arc::new(Mutex::new(())));
            Arc::clone(entry.value())
        };
        lane.lock_owned().await
    }

    /// Number of lane records currently held.
    pub fn len(&self) -> usize {
        self.lanes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lanes.is_empty()
    }

    /// Returns `true` if an operation currently holds `address`.
    pub fn is_busy(&self, address: &ActorAddress) -> bool {
        self.lanes
            .get(address)
            .map(|lane| lane.try_lock().is_err())
            .unwrap_or(false)
    }

    /// Removes records nobody holds or waits on, returning their addresses.
    pub fn sweep_idle(&self) -> Vec<ActorAddress> {
        let mut removed = Vec::new();
        self.lanes.retain(|address, lane| {
            // The table's own Arc is the only reference: no holder, no waiter.
            let idle = Arc::strong_count(lane) == 1 && lane.try_lock().is_ok();
            if idle {
                removed.push(address.clone());
            }
            !idle
        });
        removed
    }

    /// Spawns a background tokio task that periodically sweeps idle lanes.
    pub fn start_idle_sweep(self: &Arc<Self>, interval: Duration) {
        let table = Arc::clone(self);
        tokio::spawn(async move {
            let mut tick = tokio::time::interval(interval);
            loop {
                tick.tick().await;
                let removed = table.sweep_idle();
                if !removed.is_empty() {
                    tracing::debug!("Swept {} idle actor lane(s)", removed.len());
                }
            }
        });
    }
}
