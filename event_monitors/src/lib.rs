//! Background event monitors (component C9): duty poller/dumper, chain-reorg
//! subscriber, and per-epoch reward scraper. Each runs on its own task
//! spawned through the shared `TaskExecutor` so a single shutdown signal
//! tears all three down alongside the RPC/OpenAPI servers.

mod duty_monitor;
mod reorg_monitor;
mod reward_monitor;

use attacker_store::Store;
use beacon_client::BeaconClient;
use hook_engine::Engine;
use std::path::PathBuf;
use task_executor::TaskExecutor;

/// Starts all C9 monitors. `store`/`reward_file` are optional: a
/// deployment with no `[mysql]` section simply runs without reorg/reward
/// persistence (spec.md §4.14 — both sinks are best-effort collaborators,
/// never required for the hook surface to function).
pub fn spawn_all(
    executor: &TaskExecutor,
    engine: Engine,
    client: BeaconClient,
    store: Option<Store>,
    reward_file: Option<PathBuf>,
) {
    duty_monitor::spawn(executor, engine.clone(), client.clone());
    if let Some(store) = store {
        reorg_monitor::spawn(executor, client.clone(), store.clone());
        reward_monitor::spawn(executor, client, store, engine.slots_per_epoch.max(1) as u64, reward_file);
    }
}
