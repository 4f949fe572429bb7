//! Yield Farming - linear reward emission to stakers
//!
//! Stakers lock the stake token and earn the reward token, which the admin
//! deposits for fixed emission periods.

pub mod reward_pool;
pub mod ledger;
pub mod errors;
pub mod events;

#[cfg(test)]
mod tests;

pub use reward_pool::RewardPool;
pub use ledger::{Participant, PoolState, PoolStatus};
pub use errors::FarmError;
pub use events::*;
