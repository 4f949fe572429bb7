//! Reward ledger - accounting core of the reward pool
//!
//! `PoolState` holds the emission schedule and the global reward-per-token
//! accumulator, `Participant` holds one staker's position. Every transition
//! runs on copies and commits only when all checked arithmetic succeeded, so
//! an `Err` leaves both values exactly as they were.
//!
//! Time is expressed in seconds. Reward-per-token is scaled by
//! [`PRECISION`](crate::math::PRECISION) and every division truncates toward
//! zero.

use core::cmp::min;
use odra::prelude::*;
use odra::casper_types::U256;
use super::errors::FarmError;
use crate::math::{RewardMath, SafeMath, PRECISION};

/// Lifecycle of a pool
#[odra::odra_type]
pub enum PoolStatus {
    /// Never funded
    Uninitialized,
    /// Emission period is live
    Funded,
    /// Last period has finished, the pool may be funded again
    Expired,
}

/// Global emission and treasury state
#[odra::odra_type]
pub struct PoolState {
    /// Reward units emitted per second during the current period
    pub reward_rate: U256,
    /// End of the current emission period
    pub period_finish: u64,
    /// Time of the last global accrual
    pub last_update_time: u64,
    /// Accumulated reward per staked unit (scaled by 1e18)
    pub reward_per_token_stored: U256,
    /// Sum of all staked balances
    pub total_staked: U256,
    /// Reward tokens accepted by `fund`
    pub total_funded: U256,
    /// Emission assigned to stakers
    pub total_distributed: U256,
    /// Rewards paid out to stakers
    pub total_claimed: U256,
    /// Rewards never assigned to anyone (idle intervals and truncation dust)
    pub unallocated: U256,
    /// Unallocated rewards already returned to the admin
    pub total_recovered: U256,
}

/// One staker's position
#[odra::odra_type]
pub struct Participant {
    /// Amount currently locked
    pub staked_balance: U256,
    /// Reward-per-token at the last settlement
    pub reward_per_token_paid: U256,
    /// Reward settled but not yet claimed
    pub accrued_reward: U256,
}

impl Participant {
    /// Position of an address that never staked
    pub fn empty() -> Self {
        Self {
            staked_balance: U256::zero(),
            reward_per_token_paid: U256::zero(),
            accrued_reward: U256::zero(),
        }
    }
}

impl PoolState {
    /// State of a freshly deployed pool
    pub fn empty() -> Self {
        Self {
            reward_rate: U256::zero(),
            period_finish: 0,
            last_update_time: 0,
            reward_per_token_stored: U256::zero(),
            total_staked: U256::zero(),
            total_funded: U256::zero(),
            total_distributed: U256::zero(),
            total_claimed: U256::zero(),
            unallocated: U256::zero(),
            total_recovered: U256::zero(),
        }
    }

    pub fn status(&self, now: u64) -> PoolStatus {
        if self.total_funded.is_zero() {
            PoolStatus::Uninitialized
        } else if now < self.period_finish {
            PoolStatus::Funded
        } else {
            PoolStatus::Expired
        }
    }

    /// Last instant at which rewards accrue: `min(now, period_finish)`
    pub fn last_time_reward_applicable(&self, now: u64) -> u64 {
        min(now, self.period_finish)
    }

    /// Reward tokens the pool should hold: funded minus paid out minus recovered
    pub fn treasury(&self) -> Result<U256, FarmError> {
        SafeMath::sub(
            SafeMath::sub(self.total_funded, self.total_claimed)?,
            self.total_recovered,
        )
    }

    /// Reward-per-token as of `now`, without committing the accrual
    pub fn reward_per_token(&self, now: u64) -> Result<U256, FarmError> {
        let mut pool = self.clone();
        pool.accrue(now)?;
        Ok(pool.reward_per_token_stored)
    }

    /// Reward `participant` would receive from a claim at `now`
    pub fn claimable(&self, participant: &Participant, now: u64) -> Result<U256, FarmError> {
        let mut pool = self.clone();
        let mut account = participant.clone();
        pool.settle(&mut account, now)?;
        Ok(account.accrued_reward)
    }

    /// Opens a new emission period of `duration` seconds.
    ///
    /// `amount` sets the rate, `deposited` is what actually reached the
    /// treasury and must cover `reward_rate * duration`. Whatever the rate
    /// cannot schedule is booked as unallocated. Returns the new rate.
    pub fn fund(
        &mut self,
        now: u64,
        amount: U256,
        deposited: U256,
        duration: u64,
    ) -> Result<U256, FarmError> {
        if duration == 0 {
            return Err(FarmError::ZeroDuration);
        }
        if amount.is_zero() {
            return Err(FarmError::ZeroAmount);
        }
        if now < self.period_finish {
            return Err(FarmError::PeriodActive);
        }

        let mut pool = self.clone();
        pool.accrue(now)?;

        let reward_rate = RewardMath::reward_rate(amount, duration)?;
        if reward_rate.is_zero() {
            return Err(FarmError::InsufficientTreasury);
        }
        let scheduled = RewardMath::emission(reward_rate, duration)?;
        // Largest accrual the period can produce must stay representable
        SafeMath::mul(scheduled, U256::from(PRECISION))?;
        if deposited < scheduled {
            return Err(FarmError::InsufficientTreasury);
        }
        let dust = SafeMath::sub(deposited, scheduled)?;

        pool.unallocated = SafeMath::add(pool.unallocated, dust)?;
        pool.total_funded = SafeMath::add(pool.total_funded, deposited)?;
        pool.reward_rate = reward_rate;
        pool.period_finish = now.checked_add(duration).ok_or(FarmError::Overflow)?;
        pool.last_update_time = now;

        *self = pool;
        Ok(reward_rate)
    }

    pub fn stake(
        &mut self,
        participant: &mut Participant,
        now: u64,
        amount: U256,
    ) -> Result<(), FarmError> {
        if amount.is_zero() {
            return Err(FarmError::ZeroAmount);
        }

        let mut pool = self.clone();
        let mut account = participant.clone();
        pool.settle(&mut account, now)?;

        account.staked_balance = SafeMath::add(account.staked_balance, amount)?;
        pool.total_staked = SafeMath::add(pool.total_staked, amount)?;

        *self = pool;
        *participant = account;
        Ok(())
    }

    pub fn withdraw(
        &mut self,
        participant: &mut Participant,
        now: u64,
        amount: U256,
    ) -> Result<(), FarmError> {
        if amount.is_zero() {
            return Err(FarmError::ZeroAmount);
        }
        if amount > participant.staked_balance {
            return Err(FarmError::InsufficientBalance);
        }

        let mut pool = self.clone();
        let mut account = participant.clone();
        pool.settle(&mut account, now)?;

        account.staked_balance = SafeMath::sub(account.staked_balance, amount)?;
        pool.total_staked = SafeMath::sub(pool.total_staked, amount)?;

        *self = pool;
        *participant = account;
        Ok(())
    }

    /// Settles `participant` and empties its accrued reward.
    ///
    /// Returns the payout; the caller transfers it only after committing the
    /// updated state. Nothing is committed when there is nothing to pay.
    pub fn claim(&mut self, participant: &mut Participant, now: u64) -> Result<U256, FarmError> {
        let mut pool = self.clone();
        let mut account = participant.clone();
        pool.settle(&mut account, now)?;

        let reward = account.accrued_reward;
        if reward.is_zero() {
            return Ok(reward);
        }
        account.accrued_reward = U256::zero();
        pool.total_claimed = SafeMath::add(pool.total_claimed, reward)?;

        *self = pool;
        *participant = account;
        Ok(reward)
    }

    /// Withdraws the whole balance and claims in one transition.
    /// Returns `(withdrawn, reward)`.
    pub fn exit(
        &mut self,
        participant: &mut Participant,
        now: u64,
    ) -> Result<(U256, U256), FarmError> {
        let mut pool = self.clone();
        let mut account = participant.clone();
        pool.settle(&mut account, now)?;

        let withdrawn = account.staked_balance;
        let reward = account.accrued_reward;
        if withdrawn.is_zero() && reward.is_zero() {
            return Err(FarmError::ZeroAmount);
        }
        pool.total_staked = SafeMath::sub(pool.total_staked, withdrawn)?;
        pool.total_claimed = SafeMath::add(pool.total_claimed, reward)?;
        account.staked_balance = U256::zero();
        account.accrued_reward = U256::zero();

        *self = pool;
        *participant = account;
        Ok((withdrawn, reward))
    }

    /// Releases every unallocated reward accrued up to `now`
    pub fn recover_unallocated(&mut self, now: u64) -> Result<U256, FarmError> {
        let mut pool = self.clone();
        pool.accrue(now)?;

        let amount = pool.unallocated;
        pool.unallocated = U256::zero();
        pool.total_recovered = SafeMath::add(pool.total_recovered, amount)?;

        *self = pool;
        Ok(amount)
    }

    /// Global accrual up to `min(now, period_finish)`.
    /// Emission over an interval with nothing staked becomes unallocated, and
    /// so does whatever the accumulator truncates away.
    fn accrue(&mut self, now: u64) -> Result<(), FarmError> {
        let effective_time = self.last_time_reward_applicable(now);
        if effective_time <= self.last_update_time {
            return Ok(());
        }

        let elapsed = effective_time - self.last_update_time;
        let emission = RewardMath::emission(self.reward_rate, elapsed)?;
        let (increment, credited) = if self.total_staked.is_zero() {
            (U256::zero(), U256::zero())
        } else {
            let increment = RewardMath::reward_per_token_increment(emission, self.total_staked)?;
            (increment, RewardMath::credited(increment, self.total_staked)?)
        };
        let reward_per_token = SafeMath::add(self.reward_per_token_stored, increment)?;
        let distributed = SafeMath::add(self.total_distributed, credited)?;
        let unallocated = SafeMath::add(self.unallocated, SafeMath::sub(emission, credited)?)?;

        self.reward_per_token_stored = reward_per_token;
        self.total_distributed = distributed;
        self.unallocated = unallocated;
        self.last_update_time = effective_time;
        Ok(())
    }

    /// Accrues globally, then moves the participant's fresh earnings into
    /// `accrued_reward` and snapshots the accumulator.
    fn settle(&mut self, participant: &mut Participant, now: u64) -> Result<(), FarmError> {
        self.accrue(now)?;
        participant.accrued_reward = RewardMath::earned(
            participant.staked_balance,
            self.reward_per_token_stored,
            participant.reward_per_token_paid,
            participant.accrued_reward,
        )?;
        participant.reward_per_token_paid = self.reward_per_token_stored;
        Ok(())
    }
}
