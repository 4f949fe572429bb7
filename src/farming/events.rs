//! Events for the reward pool

use odra::prelude::*;
use odra::casper_types::U256;

/// Event emitted when a new emission period is opened
#[odra::event]
pub struct RewardFunded {
    pub funder: Address,
    pub amount: U256,
    pub reward_rate: U256,
    pub duration: u64,
    pub period_finish: u64,
}

/// Event emitted when stake tokens are locked
#[odra::event]
pub struct Staked {
    pub user: Address,
    pub amount: U256,
    pub timestamp: u64,
}

/// Event emitted when stake tokens are released
#[odra::event]
pub struct Withdrawn {
    pub user: Address,
    pub amount: U256,
    pub timestamp: u64,
}

/// Event emitted when rewards are paid out
#[odra::event]
pub struct RewardPaid {
    pub user: Address,
    pub reward_amount: U256,
    pub timestamp: u64,
}

/// Event emitted when unallocated rewards return to the admin
#[odra::event]
pub struct UnallocatedRecovered {
    pub recipient: Address,
    pub amount: U256,
    pub timestamp: u64,
}
