//! Error definitions for the CEP-18 token
use odra::prelude::*;

/// Custom errors for the token contract
#[odra::odra_error]
pub enum TokenError {
    /// Insufficient allowance for transfer
    InsufficientAllowance = 100,

    /// Insufficient balance for operation
    InsufficientBalance = 101,

    /// Caller is not the minter
    Unauthorized = 102,

    /// Minting would overflow the total supply
    SupplyOverflow = 103,
}
