//! Chain-reorg subscriber (spec.md §4.9/§4.15), grounded on
//! `server/server.go`'s `monitorEvent`: retry opening the SSE subscription
//! every 2min while it's down, then durably record every event the stream
//! yields via `attacker_store`.

use attacker_store::{NewChainReorg, Store};
use beacon_client::{BeaconClient, ChainReorgEvent};
use futures::StreamExt;
use metrics::{try_create_int_counter, IntCounter};
use std::sync::LazyLock;
use std::time::Duration;
use task_executor::TaskExecutor;

static REORGS_RECORDED: LazyLock<Option<IntCounter>> =
    LazyLock::new(|| try_create_int_counter("attacker_reorgs_recorded_total", "chain reorgs persisted to storage").ok());

pub fn spawn(executor: &TaskExecutor, client: BeaconClient, store: Store) {
    executor.spawn(retry_loop(executor.clone(), client, store), "reorg-monitor");
}

async fn retry_loop(executor: TaskExecutor, client: BeaconClient, store: Store) {
    loop {
        let mut stream = std::pin::pin!(client.subscribe_reorgs());
        let mut saw_event = false;
        while let Some(next) = stream.next().await {
            match next {
                Ok(event) => {
                    saw_event = true;
                    handle_event(&client, &store, event).await;
                }
                Err(err) => {
                    tracing::warn!(error = %err, "reorg event stream error");
                }
            }
        }
        // Stream ended (gateway dropped the connection): back off before
        // re-subscribing. A stream that never yielded anything backs off
        // the same amount as a failed subscribe attempt.
        let _ = saw_event;
        if !executor.cancellable_sleep(Duration::from_secs(120)).await {
            return;
        }
    }
}

async fn handle_event(client: &BeaconClient, store: &Store, event: ChainReorgEvent) {
    let slot: i64 = event.slot.parse().unwrap_or(0);
    let epoch: i64 = event.epoch.parse().unwrap_or(0);
    let depth: i64 = event.depth.parse().unwrap_or(0);
    tracing::info!(slot, "reorg event");

    let mut record = NewChainReorg {
        epoch,
        slot,
        depth,
        old_block_slot: 0,
        new_block_slot: 0,
        old_block_proposer_index: 0,
        new_block_proposer_index: 0,
        old_head_state: event.old_head_state.clone(),
        new_head_state: event.new_head_state.clone(),
    };

    if let Ok(header) = client.header_by_id(&event.old_head_block).await {
        record.old_block_slot = header.header.message.slot.parse().unwrap_or(0);
        record.old_block_proposer_index = header.header.message.proposer_index.parse().unwrap_or(0);
    }
    if let Ok(header) = client.header_by_id(&event.new_head_block).await {
        record.new_block_slot = header.header.message.slot.parse().unwrap_or(0);
        record.new_block_proposer_index = header.header.message.proposer_index.parse().unwrap_or(0);
    }

    match store.insert_chain_reorg(&record).await {
        Ok(()) => {
            if let Some(counter) = REORGS_RECORDED.as_ref() {
                counter.inc();
            }
        }
        Err(err) => tracing::warn!(error = %err, "failed to persist reorg event"),
    }
}
