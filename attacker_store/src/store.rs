//! MySQL persistence for reward/reorg observations (spec.md §4.14),
//! grounded on `dbmodel/db.go`'s `DbInit` and the two repositories in
//! `dbmodel/blockReward.go` / `dbmodel/chainReorg.go`.

use crate::models::{BlockReward, ChainReorg, NewBlockReward, NewChainReorg};
use attacker_config::MysqlConfig;
use sqlx::mysql::{MySqlPool, MySqlPoolOptions};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Db(#[from] sqlx::Error),
}

#[derive(Clone)]
pub struct Store {
    pool: MySqlPool,
}

impl Store {
    /// Connects and creates `t_block_reward` / `t_chain_reorg` if they don't
    /// already exist, mirroring `DbInit`'s `orm.RunSyncdb("default", true, true)`.
    pub async fn connect(cfg: &MysqlConfig) -> Result<Self, StoreError> {
        let url = format!(
            "mysql://{}:{}@{}:{}/{}",
            cfg.user, cfg.password, cfg.host, cfg.port, cfg.database
        );
        let pool = MySqlPoolOptions::new().max_connections(10).connect(&url).await?;
        let store = Store { pool };
        store.run_migrations().await?;
        Ok(store)
    }

    async fn run_migrations(&self) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS t_block_reward (
                id BIGINT NOT NULL AUTO_INCREMENT PRIMARY KEY,
                epoch BIGINT NOT NULL,
                validator_index BIGINT NOT NULL,
                head_amount BIGINT NOT NULL,
                target_amount BIGINT NOT NULL,
                KEY idx_epoch (epoch),
                KEY idx_validator_index (validator_index)
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS t_chain_reorg (
                id BIGINT NOT NULL AUTO_INCREMENT PRIMARY KEY,
                epoch BIGINT NOT NULL,
                slot BIGINT NOT NULL,
                depth BIGINT NOT NULL,
                old_block_slot BIGINT NOT NULL,
                new_block_slot BIGINT NOT NULL,
                old_block_proposer_index BIGINT NOT NULL,
                new_block_proposer_index BIGINT NOT NULL,
                old_head_state VARCHAR(128) NOT NULL,
                new_head_state VARCHAR(128) NOT NULL,
                KEY idx_slot (slot)
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn insert_block_reward(&self, reward: &NewBlockReward) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO t_block_reward (epoch, validator_index, head_amount, target_amount) VALUES (?, ?, ?, ?)",
        )
        .bind(reward.epoch)
        .bind(reward.validator_index)
        .bind(reward.head_amount)
        .bind(reward.target_amount)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn rewards_by_epoch(&self, epoch: i64) -> Result<Vec<BlockReward>, StoreError> {
        let rows = sqlx::query_as::<_, BlockReward>(
            "SELECT id, epoch, validator_index, head_amount, target_amount FROM t_block_reward WHERE epoch = ? ORDER BY epoch DESC",
        )
        .bind(epoch)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn rewards_by_validator(&self, validator_index: i64) -> Result<Vec<BlockReward>, StoreError> {
        let rows = sqlx::query_as::<_, BlockReward>(
            "SELECT id, epoch, validator_index, head_amount, target_amount FROM t_block_reward WHERE validator_index = ? ORDER BY epoch DESC",
        )
        .bind(validator_index)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// `GetMaxEpoch`: the highest epoch with a recorded reward, or `-1` if
    /// the table is empty.
    pub async fn max_reward_epoch(&self) -> Result<i64, StoreError> {
        let max: Option<i64> = sqlx::query_scalar("SELECT MAX(epoch) FROM t_block_reward")
            .fetch_one(&self.pool)
            .await?;
        Ok(max.unwrap_or(-1))
    }

    pub async fn insert_chain_reorg(&self, reorg: &NewChainReorg) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO t_chain_reorg
                (epoch, slot, depth, old_block_slot, new_block_slot, old_block_proposer_index, new_block_proposer_index, old_head_state, new_head_state)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(reorg.epoch)
        .bind(reorg.slot)
        .bind(reorg.depth)
        .bind(reorg.old_block_slot)
        .bind(reorg.new_block_slot)
        .bind(reorg.old_block_proposer_index)
        .bind(reorg.new_block_proposer_index)
        .bind(&reorg.old_head_state)
        .bind(&reorg.new_head_state)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn all_reorgs(&self) -> Result<Vec<ChainReorg>, StoreError> {
        let rows = sqlx::query_as::<_, ChainReorg>(
            r#"
            SELECT id, epoch, slot, depth, old_block_slot, new_block_slot,
                   old_block_proposer_index, new_block_proposer_index, old_head_state, new_head_state
            FROM t_chain_reorg ORDER BY slot DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// `t_block_reward.id` is assigned by MySQL, never by the caller — the
    /// insert-side type has no `id` field so callers can't fabricate one.
    #[test]
    fn new_block_reward_has_no_id_field() {
        let _new = NewBlockReward {
            epoch: 1,
            validator_index: 7,
            head_amount: 100,
            target_amount: 50,
        };
    }
}
