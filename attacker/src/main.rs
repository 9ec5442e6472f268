//! Entry point (spec.md §8), grounded on `cmd/attacker/rootcmd.go`'s
//! startup sequence: parse CLI flags, load config and strategy, build the
//! shared `Engine`, spawn the C9 monitors and the RPC/OpenAPI servers,
//! then block until shutdown.

use attacker_config::{parse_config, Cli, Command};
use beacon_client::{BeaconClient, SECONDS_PER_SLOT_KEY, SLOTS_PER_EPOCH_KEY};
use clap::Parser;
use hook_engine::{Dispatcher, Engine};
use sensitive_url::SensitiveUrl;
use slot_clock::SystemTimeSlotClock;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use strategy::StrategyFile;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Some(Command::Version { detail }) = &cli.command {
        println!("attacker {}", env!("CARGO_PKG_VERSION"));
        if *detail {
            println!("commit: unknown (source build)");
        }
        return Ok(());
    }

    if cli.config.is_empty() {
        anyhow::bail!("--config is required");
    }
    let config = parse_config(std::path::Path::new(&cli.config))?;

    let log_dir = (!cli.logpath.is_empty()).then(|| PathBuf::from(&cli.logpath));
    let _logging_guard = logging::init(&cli.loglevel, log_dir.as_deref())?;

    let env = environment::Environment::new()?;
    let executor = env.executor();

    let strategy_file = StrategyFile::load(&config.strategy)?;

    let beacon_url = SensitiveUrl::parse(&config.beacon_rpc)?;
    let beacon = BeaconClient::new(beacon_url);

    let (slots_per_epoch, seconds_per_slot) = env.runtime().block_on(async {
        let spe = beacon.int_config(SLOTS_PER_EPOCH_KEY).await.ok().flatten().unwrap_or(32);
        let sps = beacon.int_config(SECONDS_PER_SLOT_KEY).await.ok().flatten().unwrap_or(12);
        (spe, sps)
    });

    // The service never anchors its clock to genesis (see
    // `Engine::latest_observed_slot`): every hook call carries its own slot
    // number, and delay actions only ever measure elapsed wall time since a
    // recorded slot start. The clock's slot-number arithmetic exists for
    // test symmetry with `ManualSlotClock`, not for runtime decisions.
    let clock = Arc::new(SystemTimeSlotClock::new(Duration::from_secs(0), Duration::from_secs(seconds_per_slot)));

    let engine = Engine::new(
        Arc::new(artifact_cache::ArtifactCache::new()),
        clock,
        executor.clone(),
        slots_per_epoch as i64,
        seconds_per_slot,
        128,
    );
    engine.update_strategy(strategy_file)?;

    let store = match &config.db_config {
        Some(mysql) => Some(env.runtime().block_on(attacker_store::Store::connect(mysql))?),
        None => None,
    };

    event_monitors::spawn_all(&executor, engine.clone(), beacon.clone(), store.clone(), config.reward_file.clone());

    let rpc_addr = format!("{}:{}", config.http_host, config.http_port).parse()?;
    rpc_server::spawn(&executor, rpc_addr, Dispatcher::new(engine.clone()))?;

    let openapi_addr = format!("{}:{}", config.http_host, config.openapi_port()).parse()?;
    openapi_server::spawn(&executor, openapi_addr, engine, store, beacon);

    tracing::info!(http_port = config.http_port, openapi_port = config.openapi_port(), "attacker service started");
    env.block_until_shutdown();
    tracing::info!("shutdown complete");
    Ok(())
}
