//! Duty poller + duty dumper (spec.md §4.9), grounded on
//! `server/server.go`'s `monitorDuties`: a ~100ms attest-duty tick that
//! backs off to 2s after a successful round, and a 1min proposer-duty
//! dump tick that fires once per newly observed epoch. The fast tick also
//! refreshes `Engine`'s proposer-duty cache every round (not just the slow
//! dumper) since `SlotContext::propose_duties` reads that cache
//! synchronously from the core's predicate matching, not just for logging.

use beacon_client::BeaconClient;
use hook_engine::Engine;
use metrics::{try_create_int_counter, IntCounter};
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::LazyLock;
use std::time::Duration;
use task_executor::TaskExecutor;

static DUTY_POLL_ERRORS: LazyLock<Option<IntCounter>> =
    LazyLock::new(|| try_create_int_counter("attacker_duty_poll_errors_total", "failed duty poll rounds").ok());

/// The attester-duty endpoint is queried by validator index; the original
/// service hardcodes the first 64 indices as the universe it tracks.
const VALIDATOR_UNIVERSE: usize = 64;

fn validator_indices() -> Vec<i64> {
    (0..VALIDATOR_UNIVERSE as i64).collect()
}

pub fn spawn(executor: &TaskExecutor, engine: Engine, client: BeaconClient) {
    executor.spawn(duty_poll_loop(executor.clone(), engine.clone(), client.clone()), "duty-poller");
    executor.spawn(duty_dump_loop(executor.clone(), engine, client), "duty-dumper");
}

async fn duty_poll_loop(executor: TaskExecutor, engine: Engine, client: BeaconClient) {
    let mut interval = Duration::from_millis(100);
    loop {
        if !executor.cancellable_sleep(interval).await {
            return;
        }
        match poll_once(&engine, &client).await {
            Ok(()) => interval = Duration::from_secs(2),
            Err(err) => {
                tracing::debug!(error = %err, "duty poll round failed");
                if let Some(counter) = DUTY_POLL_ERRORS.as_ref() {
                    counter.inc();
                }
                interval = Duration::from_millis(100);
            }
        }
    }
}

async fn poll_once(engine: &Engine, client: &BeaconClient) -> Result<(), beacon_client::BeaconClientError> {
    let slots_per_epoch = engine.slots_per_epoch as u64;
    let epoch = client.current_epoch(slots_per_epoch).await?;
    let indices = validator_indices();

    for (idx, pubkey) in client.attester_duties(epoch, &indices).await? {
        engine.cache().add_validator(idx, &pubkey);
    }
    for (idx, pubkey) in client.attester_duties(epoch + 1, &indices).await? {
        engine.cache().add_validator(idx, &pubkey);
    }

    // Also keep the proposer-duty cache `SlotContext::propose_duties` reads
    // fresh on this same fast tick, not just on `duty_dump_loop`'s once-a-
    // minute cadence — `attackerSlot` and friends resolve off this cache
    // synchronously and must not silently read "no duties" for an epoch the
    // slow dumper hasn't reached yet.
    engine.record_duties(epoch as i64, client.proposer_duties(epoch).await?);
    engine.record_duties(epoch as i64 + 1, client.proposer_duties(epoch + 1).await?);
    Ok(())
}

async fn duty_dump_loop(executor: TaskExecutor, engine: Engine, client: BeaconClient) {
    let dumped = Mutex::new(HashSet::<i64>::new());
    loop {
        if !executor.cancellable_sleep(Duration::from_secs(60)).await {
            return;
        }
        let slots_per_epoch = engine.slots_per_epoch as u64;
        let epoch = match client.current_epoch(slots_per_epoch).await {
            Ok(epoch) => epoch as i64,
            Err(err) => {
                tracing::debug!(error = %err, "duty dump tick failed to read latest header");
                continue;
            }
        };
        let next_epoch = epoch + 1;

        if epoch == 0 && !dumped.lock().contains(&epoch) {
            if dump_epoch(&engine, &client, epoch).await.is_ok() {
                dumped.lock().insert(epoch);
            }
        }
        if !dumped.lock().contains(&next_epoch) && dump_epoch(&engine, &client, next_epoch).await.is_ok() {
            dumped.lock().insert(next_epoch);
        }
    }
}

async fn dump_epoch(engine: &Engine, client: &BeaconClient, epoch: i64) -> Result<(), beacon_client::BeaconClientError> {
    let duties = client.proposer_duties(epoch.max(0) as u64).await?;
    for duty in &duties {
        tracing::info!(epoch, slot = duty.slot, validator = duty.validator_index, "epoch duty");
    }
    engine.record_duties(epoch, duties);
    Ok(())
}
