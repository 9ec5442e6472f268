//! Reward scraper (spec.md §4.16, supplemented from `reward/reward.go`):
//! once per epoch rollover, pulls `[next_unscraped_epoch, latest_epoch-2]`
//! of attestation rewards from the beacon gateway and writes them to
//! `t_block_reward`, optionally mirroring the same rows to a CSV file.

use attacker_store::{NewBlockReward, Store};
use beacon_client::BeaconClient;
use metrics::{try_create_int_counter, IntCounter};
use std::path::PathBuf;
use std::sync::LazyLock;
use std::time::Duration;
use task_executor::TaskExecutor;

static REWARDS_RECORDED: LazyLock<Option<IntCounter>> =
    LazyLock::new(|| try_create_int_counter("attacker_rewards_recorded_total", "validator reward rows persisted to storage").ok());

pub fn spawn(executor: &TaskExecutor, client: BeaconClient, store: Store, slots_per_epoch: u64, reward_file: Option<PathBuf>) {
    executor.spawn(scrape_loop(executor.clone(), client, store, slots_per_epoch, reward_file), "reward-scraper");
}

async fn scrape_loop(
    executor: TaskExecutor,
    client: BeaconClient,
    store: Store,
    slots_per_epoch: u64,
    reward_file: Option<PathBuf>,
) {
    loop {
        if let Err(err) = scrape_once(&client, &store, slots_per_epoch, reward_file.as_deref()).await {
            tracing::warn!(error = %err, "reward scrape round failed");
        }
        if !executor.cancellable_sleep(Duration::from_secs(slots_per_epoch.saturating_mul(12))).await {
            return;
        }
    }
}

#[derive(Debug, thiserror::Error)]
enum ScrapeError {
    #[error("beacon gateway: {0}")]
    Beacon(#[from] beacon_client::BeaconClientError),
    #[error("store: {0}")]
    Store(#[from] attacker_store::StoreError),
    #[error("reward file: {0}")]
    Io(#[from] std::io::Error),
    #[error("reward file: {0}")]
    Csv(#[from] csv::Error),
}

/// Scrapes every epoch from `max_reward_epoch()+1` up to `latest_epoch-2`
/// (the original service's margin so a scraped epoch's rewards are final).
async fn scrape_once(
    client: &BeaconClient,
    store: &Store,
    slots_per_epoch: u64,
    reward_file: Option<&std::path::Path>,
) -> Result<(), ScrapeError> {
    let latest_epoch = client.current_epoch(slots_per_epoch).await? as i64;
    let max_epoch = store.max_reward_epoch().await?;
    let mut epoch = if max_epoch < 0 { 0 } else { max_epoch + 1 };

    let mut csv_rows: Vec<(i64, NewBlockReward)> = Vec::new();
    while epoch <= latest_epoch - 2 {
        let rewards = client.all_validator_rewards(epoch as u64).await?;
        for reward in rewards {
            let record = NewBlockReward {
                epoch,
                validator_index: reward.validator_index.parse().unwrap_or(0),
                head_amount: reward.head.parse().unwrap_or(0),
                target_amount: reward.target.parse().unwrap_or(0),
            };
            store.insert_block_reward(&record).await?;
            if let Some(counter) = REWARDS_RECORDED.as_ref() {
                counter.inc();
            }
            csv_rows.push((epoch, record));
        }
        epoch += 1;
    }

    if let Some(path) = reward_file {
        if !csv_rows.is_empty() {
            append_csv(path, &csv_rows)?;
        }
    }
    Ok(())
}

fn append_csv(path: &std::path::Path, rows: &[(i64, NewBlockReward)]) -> Result<(), ScrapeError> {
    let write_header = !path.exists();
    let file = std::fs::OpenOptions::new().create(true).append(true).open(path)?;
    let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(file);
    if write_header {
        writer.write_record(["epoch", "validator_index", "head", "target"])?;
    }
    for (epoch, record) in rows {
        writer.write_record([
            epoch.to_string(),
            record.validator_index.to_string(),
            record.head_amount.to_string(),
            record.target_amount.to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_csv_writes_header_once_across_calls() {
        let path = std::env::temp_dir().join(format!("event_monitors_reward_test_{}.csv", std::process::id()));
        let _ = std::fs::remove_file(&path);

        let row = NewBlockReward {
            epoch: 1,
            validator_index: 7,
            head_amount: 10,
            target_amount: 20,
        };
        append_csv(&path, &[(1, row.clone())]).unwrap();
        append_csv(&path, &[(2, row)]).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines[0], "epoch,validator_index,head,target");
        assert_eq!(lines.len(), 3);

        std::fs::remove_file(&path).unwrap();
    }
}
