//! Reward Pool - stake tokens to earn a linearly emitted reward
//!
//! The admin opens an emission period with `fund(amount, duration)`. The
//! deposited reward is emitted at a constant rate until the period ends and
//! is shared among stakers in proportion to their stake at every instant.
//!
//! Each entry point loads the ledger, runs one transition, commits it and
//! only then moves tokens out of the pool.

use odra::prelude::*;
use odra::casper_types::U256;
use odra::ContractRef;
use super::errors::FarmError;
use super::events::*;
use super::ledger::{Participant, PoolState, PoolStatus};
use crate::math::SafeMath;
use crate::token::Cep18TokenContractRef;

/// Reward Pool contract
#[odra::module]
pub struct RewardPool {
    /// Token paid out as reward
    reward_token: Var<Address>,
    /// Token locked by stakers
    stake_token: Var<Address>,
    /// Account allowed to fund and recover
    admin: Var<Address>,
    /// Emission schedule and treasury bookkeeping
    state: Var<PoolState>,
    /// Staker positions
    participants: Mapping<Address, Participant>,
}

#[odra::module]
impl RewardPool {
    /// Initialize the pool; the deployer becomes the admin
    pub fn init(&mut self, reward_token: Address, stake_token: Address) {
        self.reward_token.set(reward_token);
        self.stake_token.set(stake_token);
        self.admin.set(self.env().caller());
        self.state.set(PoolState::empty());
    }

    // ========================================
    // Emission
    // ========================================

    /// Pull `amount` reward tokens from the admin and emit them over
    /// `duration` seconds. The admin must approve the pool beforehand.
    pub fn fund(&mut self, amount: U256, duration: u64) {
        let funder = self.only_admin();
        let now = self.now();
        let mut state = self.load_state();

        // Reject before touching the token so the caller sees the pool error
        let mut preview = state.clone();
        self.or_revert(preview.fund(now, amount, amount, duration));

        let this = self.self_address();
        let mut reward_token = self.reward_token_ref();
        let balance_before = reward_token.balance_of(this);
        reward_token.transfer_from(funder, this, amount);
        let balance_after = reward_token.balance_of(this);
        let deposited = self.or_revert(SafeMath::sub(balance_after, balance_before));

        let reward_rate = self.or_revert(state.fund(now, amount, deposited, duration));
        let period_finish = state.period_finish;
        self.state.set(state);

        self.env().emit_event(RewardFunded {
            funder,
            amount,
            reward_rate,
            duration,
            period_finish,
        });
    }

    /// Send every unallocated reward to the admin
    pub fn recover_unallocated(&mut self) -> U256 {
        let admin = self.only_admin();
        let now = self.now();
        let mut state = self.load_state();
        let amount = self.or_revert(state.recover_unallocated(now));
        self.state.set(state);

        if !amount.is_zero() {
            self.reward_token_ref().transfer(admin, amount);
            self.env().emit_event(UnallocatedRecovered {
                recipient: admin,
                amount,
                timestamp: now,
            });
        }
        amount
    }

    // ========================================
    // Staking Functions
    // ========================================

    /// Lock stake tokens; requires an approval for `amount`
    pub fn stake(&mut self, amount: U256) {
        let caller = self.env().caller();
        let now = self.now();
        let mut state = self.load_state();
        let mut participant = self.load_participant(caller);

        self.or_revert(state.stake(&mut participant, now, amount));
        self.state.set(state);
        self.participants.set(&caller, participant);

        let this = self.self_address();
        self.stake_token_ref().transfer_from(caller, this, amount);

        self.env().emit_event(Staked {
            user: caller,
            amount,
            timestamp: now,
        });
    }

    /// Release locked stake tokens
    pub fn withdraw(&mut self, amount: U256) {
        let caller = self.env().caller();
        let now = self.now();
        let mut state = self.load_state();
        let mut participant = self.load_participant(caller);

        self.or_revert(state.withdraw(&mut participant, now, amount));
        self.state.set(state);
        self.participants.set(&caller, participant);

        self.stake_token_ref().transfer(caller, amount);

        self.env().emit_event(Withdrawn {
            user: caller,
            amount,
            timestamp: now,
        });
    }

    /// Pay out the caller's reward. Returns zero when nothing has accrued.
    pub fn claim(&mut self) -> U256 {
        let caller = self.env().caller();
        let now = self.now();
        let mut state = self.load_state();
        let mut participant = self.load_participant(caller);

        let reward = self.or_revert(state.claim(&mut participant, now));
        if reward.is_zero() {
            return reward;
        }
        self.state.set(state);
        self.participants.set(&caller, participant);

        self.pay_reward(caller, reward, now);
        reward
    }

    /// Withdraw the whole stake and claim the reward. Returns the reward paid.
    pub fn exit(&mut self) -> U256 {
        let caller = self.env().caller();
        let now = self.now();
        let mut state = self.load_state();
        let mut participant = self.load_participant(caller);

        let (withdrawn, reward) = self.or_revert(state.exit(&mut participant, now));
        self.state.set(state);
        self.participants.set(&caller, participant);

        if !withdrawn.is_zero() {
            self.stake_token_ref().transfer(caller, withdrawn);
            self.env().emit_event(Withdrawn {
                user: caller,
                amount: withdrawn,
                timestamp: now,
            });
        }
        if !reward.is_zero() {
            self.pay_reward(caller, reward, now);
        }
        reward
    }

    // ========================================
    // View Functions
    // ========================================

    /// Reward `user` would receive from `claim` right now
    pub fn claimable(&self, user: Address) -> U256 {
        let state = self.load_state();
        let participant = self.load_participant(user);
        self.or_revert(state.claimable(&participant, self.now()))
    }

    /// Accumulated reward per staked unit, scaled by 1e18
    pub fn reward_per_token(&self) -> U256 {
        self.or_revert(self.load_state().reward_per_token(self.now()))
    }

    /// Last instant rewards accrue: the earlier of now and the period end
    pub fn last_time_reward_applicable(&self) -> u64 {
        self.load_state().last_time_reward_applicable(self.now())
    }

    /// Lifecycle of the pool at the current block time
    pub fn status(&self) -> PoolStatus {
        self.load_state().status(self.now())
    }

    /// Full emission and treasury bookkeeping
    pub fn get_pool_state(&self) -> PoolState {
        self.load_state()
    }

    /// Stored position of `user`, `None` if it never staked
    pub fn get_participant(&self, user: Address) -> Option<Participant> {
        self.participants.get(&user)
    }

    /// Stake currently locked by `user`
    pub fn balance_of(&self, user: Address) -> U256 {
        self.load_participant(user).staked_balance
    }

    /// Sum of all staked balances
    pub fn total_staked(&self) -> U256 {
        self.load_state().total_staked
    }

    /// Reward units emitted per second in the current period
    pub fn reward_rate(&self) -> U256 {
        self.load_state().reward_rate
    }

    /// End of the current emission period in seconds
    pub fn period_finish(&self) -> u64 {
        self.load_state().period_finish
    }

    /// Get reward token address
    pub fn reward_token(&self) -> Address {
        self.reward_token.get_or_revert_with(FarmError::NotInitialized)
    }

    /// Get stake token address
    pub fn stake_token(&self) -> Address {
        self.stake_token.get_or_revert_with(FarmError::NotInitialized)
    }

    /// Get admin address
    pub fn admin(&self) -> Address {
        self.admin.get_or_revert_with(FarmError::NotInitialized)
    }
}

impl RewardPool {
    /// Block time in seconds; the host reports milliseconds
    fn now(&self) -> u64 {
        self.env().get_block_time() / 1_000
    }

    fn self_address(&self) -> Address {
        Address::from(self.env().self_address())
    }

    fn or_revert<T>(&self, result: Result<T, FarmError>) -> T {
        result.unwrap_or_else(|err| self.env().revert(err))
    }

    fn load_state(&self) -> PoolState {
        self.state.get_or_revert_with(FarmError::NotInitialized)
    }

    fn load_participant(&self, user: Address) -> Participant {
        self.participants.get(&user).unwrap_or_else(Participant::empty)
    }

    fn reward_token_ref(&self) -> Cep18TokenContractRef {
        Cep18TokenContractRef::new(self.env(), self.reward_token())
    }

    fn stake_token_ref(&self) -> Cep18TokenContractRef {
        Cep18TokenContractRef::new(self.env(), self.stake_token())
    }

    /// Transfer a reward whose ledger entry is already committed
    fn pay_reward(&mut self, user: Address, reward: U256, now: u64) {
        self.reward_token_ref().transfer(user, reward);
        self.env().emit_event(RewardPaid {
            user,
            reward_amount: reward,
            timestamp: now,
        });
    }

    fn only_admin(&self) -> Address {
        let caller = self.env().caller();
        if caller != self.admin() {
            self.env().revert(FarmError::Unauthorized);
        }
        caller
    }
}
