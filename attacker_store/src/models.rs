//! Row types for `t_block_reward` / `t_chain_reorg`, grounded field-for-field
//! on `dbmodel/blockReward.go` and `dbmodel/chainReorg.go` so an existing
//! deployment's tables read back unchanged.

use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct BlockReward {
    pub id: i64,
    pub epoch: i64,
    pub validator_index: i64,
    pub head_amount: i64,
    pub target_amount: i64,
}

/// A reward observation not yet assigned a row id (`insert_block_reward`
/// fills in `id` from the autoincrement key).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBlockReward {
    pub epoch: i64,
    pub validator_index: i64,
    pub head_amount: i64,
    pub target_amount: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct ChainReorg {
    pub id: i64,
    pub epoch: i64,
    pub slot: i64,
    pub depth: i64,
    pub old_block_slot: i64,
    pub new_block_slot: i64,
    pub old_block_proposer_index: i64,
    pub new_block_proposer_index: i64,
    pub old_head_state: String,
    pub new_head_state: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewChainReorg {
    pub epoch: i64,
    pub slot: i64,
    pub depth: i64,
    pub old_block_slot: i64,
    pub new_block_slot: i64,
    pub old_block_proposer_index: i64,
    pub new_block_proposer_index: i64,
    pub old_head_state: String,
    pub new_head_state: String,
}
