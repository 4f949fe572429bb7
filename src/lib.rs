#![cfg_attr(not(test), no_std)]
#![cfg_attr(not(test), no_main)]
extern crate alloc;

// Reward emission pool
pub mod farming;

// CEP-18 token used for rewards and stakes
pub mod token;
pub mod errors;
pub mod events;

pub mod math;
pub mod units;
