//! Reward and reorg persistence, grounded on `dbmodel/` in the original
//! service. MySQL via `sqlx`, the teacher's database crate of choice.

mod models;
mod store;

pub use models::{BlockReward, ChainReorg, NewBlockReward, NewChainReorg};
pub use store::{Store, StoreError};
