//! Mathematical utilities for the reward pool
//! Implements checked math and the fixed-point reward formulas
use odra::casper_types::U256;
use crate::farming::errors::FarmError;

/// Fixed-point scale of reward-per-token values (1e18)
pub const PRECISION: u128 = 1_000_000_000_000_000_000;

/// Safe math operations for U256
pub struct SafeMath;

impl SafeMath {
    /// Safe addition with overflow check
    pub fn add(a: U256, b: U256) -> Result<U256, FarmError> {
        a.checked_add(b).ok_or(FarmError::Overflow)
    }

    /// Safe subtraction, fails when the result would be negative
    pub fn sub(a: U256, b: U256) -> Result<U256, FarmError> {
        a.checked_sub(b).ok_or(FarmError::Overflow)
    }

    /// Safe multiplication with overflow check
    pub fn mul(a: U256, b: U256) -> Result<U256, FarmError> {
        a.checked_mul(b).ok_or(FarmError::Overflow)
    }

    /// Safe division with zero check, truncates toward zero
    pub fn div(a: U256, b: U256) -> Result<U256, FarmError> {
        if b.is_zero() {
            return Err(FarmError::DivisionByZero);
        }
        Ok(a / b)
    }
}

/// Linear emission formulas
pub struct RewardMath;

impl RewardMath {
    /// Reward units emitted per second for `amount` spread over `duration` seconds
    pub fn reward_rate(amount: U256, duration: u64) -> Result<U256, FarmError> {
        if duration == 0 {
            return Err(FarmError::ZeroDuration);
        }
        SafeMath::div(amount, U256::from(duration))
    }

    /// Total reward emitted at `rate` over `elapsed` seconds
    pub fn emission(rate: U256, elapsed: u64) -> Result<U256, FarmError> {
        SafeMath::mul(rate, U256::from(elapsed))
    }

    /// Increase of reward-per-token when `emission` is shared by `total_staked`
    /// emission * 1e18 / total_staked
    pub fn reward_per_token_increment(
        emission: U256,
        total_staked: U256,
    ) -> Result<U256, FarmError> {
        SafeMath::div(SafeMath::mul(emission, U256::from(PRECISION))?, total_staked)
    }

    /// Upper bound of what `increment` hands out to `total_staked`
    /// ceil(increment * total_staked / 1e18), never above the emission that
    /// produced `increment`
    pub fn credited(increment: U256, total_staked: U256) -> Result<U256, FarmError> {
        let scaled = SafeMath::mul(increment, total_staked)?;
        let precision = U256::from(PRECISION);
        let credited = SafeMath::div(scaled, precision)?;
        if (scaled % precision).is_zero() {
            Ok(credited)
        } else {
            SafeMath::add(credited, U256::one())
        }
    }

    /// Reward owed to a balance since its last settlement
    /// accrued + balance * (reward_per_token - paid) / 1e18
    pub fn earned(
        balance: U256,
        reward_per_token: U256,
        reward_per_token_paid: U256,
        accrued: U256,
    ) -> Result<U256, FarmError> {
        let delta = SafeMath::sub(reward_per_token, reward_per_token_paid)?;
        let fresh = SafeMath::div(SafeMath::mul(balance, delta)?, U256::from(PRECISION))?;
        SafeMath::add(accrued, fresh)
    }
}
