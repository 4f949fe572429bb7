//! Error types for the reward pool

use odra::prelude::*;

#[odra::odra_error]
pub enum FarmError {
    /// Funding attempted while an emission period is still live
    PeriodActive = 1,
    /// Emission period of zero seconds
    ZeroDuration = 2,
    /// Zero amount not allowed
    ZeroAmount = 3,
    /// Withdrawal exceeds the staked balance
    InsufficientBalance = 4,
    /// Deposit cannot back the computed reward rate
    InsufficientTreasury = 5,
    /// Arithmetic left the numeric range
    Overflow = 6,
    /// Unauthorized access
    Unauthorized = 7,
    /// Pool storage not initialized
    NotInitialized = 8,
    /// Division by zero
    DivisionByZero = 9,
}
