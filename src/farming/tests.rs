//! Tests for the reward pool running against the host test environment

#[cfg(test)]
mod tests {
    use odra::host::{Deployer, HostEnv};
    use odra::prelude::*;
    use odra::casper_types::U256;
    use crate::errors::TokenError;
    use crate::farming::reward_pool::{RewardPool, RewardPoolHostRef, RewardPoolInitArgs};
    use crate::farming::{FarmError, PoolStatus};
    use crate::math::PRECISION;
    use crate::token::{FarmToken, FarmTokenHostRef, FarmTokenInitArgs};

    const HALF_YEAR: u64 = 15_552_000;

    struct Farm {
        env: HostEnv,
        pool: RewardPoolHostRef,
        reward: FarmTokenHostRef,
        lp: FarmTokenHostRef,
        admin: Address,
    }

    impl Farm {
        fn pool_address(&self) -> Address {
            self.pool.address()
        }

        fn advance(&self, seconds: u64) {
            self.env.advance_block_time(seconds * 1_000);
        }

        fn fund(&mut self, amount: U256, duration: u64) {
            let pool = self.pool_address();
            self.env.set_caller(self.admin);
            self.reward.mint(self.admin, amount);
            self.reward.approve(pool, amount);
            self.pool.fund(amount, duration);
        }

        fn stake(&mut self, user: Address, amount: U256) {
            let pool = self.pool_address();
            self.env.set_caller(self.admin);
            self.lp.mint(user, amount);
            self.env.set_caller(user);
            self.lp.approve(pool, amount);
            self.pool.stake(amount);
        }
    }

    fn setup() -> Farm {
        let env = odra_test::env();
        let admin = env.get_account(0);
        env.set_caller(admin);

        let reward = FarmToken::deploy(&env, FarmTokenInitArgs {
            name: String::from("Jennifer"),
            symbol: String::from("JENNIFER"),
            decimals: 18,
        });
        let lp = FarmToken::deploy(&env, FarmTokenInitArgs {
            name: String::from("USDT-JENNIFER LP"),
            symbol: String::from("LP"),
            decimals: 18,
        });
        let pool = RewardPool::deploy(&env, RewardPoolInitArgs {
            reward_token: reward.address(),
            stake_token: lp.address(),
        });

        Farm { env, pool, reward, lp, admin }
    }

    fn tokens(whole: u64) -> U256 {
        U256::from(whole) * U256::from(PRECISION)
    }

    #[test]
    fn test_pool_initialization() {
        let farm = setup();
        assert_eq!(farm.pool.reward_token(), farm.reward.address());
        assert_eq!(farm.pool.stake_token(), farm.lp.address());
        assert_eq!(farm.pool.admin(), farm.admin);
        assert_eq!(farm.pool.status(), PoolStatus::Uninitialized);
        assert_eq!(farm.pool.total_staked(), U256::zero());
        assert_eq!(farm.pool.reward_rate(), U256::zero());
        assert_eq!(farm.pool.reward_per_token(), U256::zero());
    }

    #[test]
    fn test_single_staker_earns_whole_period() {
        let mut farm = setup();
        let amount = tokens(1_000_000);
        farm.fund(amount, HALF_YEAR);

        let rate = amount / U256::from(HALF_YEAR);
        assert_eq!(farm.pool.reward_rate(), rate);
        assert_eq!(farm.pool.status(), PoolStatus::Funded);
        assert_eq!(farm.reward.balance_of(farm.pool_address()), amount);

        let alice = farm.env.get_account(1);
        farm.stake(alice, U256::from(100));
        farm.advance(HALF_YEAR);

        let expected = rate * U256::from(HALF_YEAR);
        assert_eq!(farm.pool.status(), PoolStatus::Expired);
        assert_eq!(farm.pool.claimable(alice), expected);

        farm.env.set_caller(alice);
        assert_eq!(farm.pool.claim(), expected);
        assert_eq!(farm.reward.balance_of(alice), expected);
        assert_eq!(farm.reward.balance_of(farm.pool_address()), amount - expected);
        assert_eq!(farm.pool.claimable(alice), U256::zero());
    }

    #[test]
    fn test_two_stakers_share_second_half() {
        let mut farm = setup();
        farm.fund(tokens(1_000_000), HALF_YEAR);
        let rate = farm.pool.reward_rate();
        let half = HALF_YEAR / 2;

        let alice = farm.env.get_account(1);
        let bob = farm.env.get_account(2);
        farm.stake(alice, U256::from(100));
        farm.advance(half);
        farm.stake(bob, U256::from(100));
        farm.advance(HALF_YEAR - half);

        let a = farm.pool.claimable(alice);
        let b = farm.pool.claimable(bob);
        assert_eq!(a, rate * U256::from(half) + rate * U256::from(half / 2));
        assert_eq!(b, rate * U256::from(half / 2));
        assert_eq!(a + b, rate * U256::from(HALF_YEAR));
    }

    #[test]
    fn test_fund_during_live_period_fails() {
        let mut farm = setup();
        farm.fund(U256::from(10_000u64), 100);
        farm.advance(99);

        let before = farm.pool.get_pool_state();
        let pool = farm.pool_address();
        farm.reward.mint(farm.admin, U256::from(10_000u64));
        farm.reward.approve(pool, U256::from(10_000u64));
        assert_eq!(
            farm.pool.try_fund(U256::from(10_000u64), 100),
            Err(FarmError::PeriodActive.into())
        );
        assert_eq!(farm.pool.get_pool_state(), before);
        assert_eq!(farm.reward.balance_of(pool), U256::from(10_000u64));
    }

    #[test]
    fn test_fund_validation() {
        let mut farm = setup();
        let pool = farm.pool_address();
        farm.reward.mint(farm.admin, U256::from(1_000u64));
        farm.reward.approve(pool, U256::from(1_000u64));

        assert_eq!(
            farm.pool.try_fund(U256::from(1_000u64), 0),
            Err(FarmError::ZeroDuration.into())
        );
        assert_eq!(
            farm.pool.try_fund(U256::zero(), 100),
            Err(FarmError::ZeroAmount.into())
        );
        assert_eq!(
            farm.pool.try_fund(U256::from(99u64), 100),
            Err(FarmError::InsufficientTreasury.into())
        );
        assert_eq!(
            farm.pool.try_fund(U256::from(2_000u64), 100),
            Err(TokenError::InsufficientAllowance.into())
        );
        // rejected before any token moves
        assert_eq!(
            farm.pool.try_fund(U256::MAX, 1),
            Err(FarmError::Overflow.into())
        );

        let stranger = farm.env.get_account(3);
        farm.env.set_caller(stranger);
        assert_eq!(
            farm.pool.try_fund(U256::from(1_000u64), 100),
            Err(FarmError::Unauthorized.into())
        );
        assert_eq!(farm.pool.status(), PoolStatus::Uninitialized);
    }

    #[test]
    fn test_refund_after_expiry() {
        let mut farm = setup();
        let alice = farm.env.get_account(1);
        farm.fund(U256::from(1_000u64), 100);
        farm.stake(alice, U256::from(10));
        farm.advance(150);

        assert_eq!(farm.pool.status(), PoolStatus::Expired);
        farm.fund(U256::from(2_000u64), 100);
        assert_eq!(farm.pool.status(), PoolStatus::Funded);
        assert_eq!(farm.pool.reward_rate(), U256::from(20));

        farm.advance(100);
        assert_eq!(farm.pool.claimable(alice), U256::from(3_000));
    }

    #[test]
    fn test_stake_and_withdraw_move_tokens() {
        let mut farm = setup();
        let alice = farm.env.get_account(1);
        farm.stake(alice, U256::from(500));
        assert_eq!(farm.pool.balance_of(alice), U256::from(500));
        assert_eq!(farm.lp.balance_of(farm.pool_address()), U256::from(500));

        farm.env.set_caller(alice);
        farm.pool.withdraw(U256::from(200));
        assert_eq!(farm.pool.balance_of(alice), U256::from(300));
        assert_eq!(farm.pool.total_staked(), U256::from(300));
        assert_eq!(farm.lp.balance_of(alice), U256::from(200));

        assert_eq!(
            farm.pool.try_stake(U256::zero()),
            Err(FarmError::ZeroAmount.into())
        );
    }

    #[test]
    fn test_withdraw_above_balance_fails() {
        let mut farm = setup();
        let alice = farm.env.get_account(1);
        farm.fund(U256::from(1_000u64), 100);
        farm.stake(alice, U256::from(50));
        farm.advance(10);

        let state = farm.pool.get_pool_state();
        let position = farm.pool.get_participant(alice);
        farm.env.set_caller(alice);
        assert_eq!(
            farm.pool.try_withdraw(U256::from(51)),
            Err(FarmError::InsufficientBalance.into())
        );
        assert_eq!(farm.pool.get_pool_state(), state);
        assert_eq!(farm.pool.get_participant(alice), position);
        assert_eq!(farm.lp.balance_of(alice), U256::zero());
    }

    #[test]
    fn test_stake_without_approval_reverts_whole_call() {
        let mut farm = setup();
        let alice = farm.env.get_account(1);
        farm.fund(U256::from(1_000u64), 100);
        farm.lp.mint(alice, U256::from(10));
        farm.advance(5);

        let state = farm.pool.get_pool_state();
        farm.env.set_caller(alice);
        assert_eq!(
            farm.pool.try_stake(U256::from(10)),
            Err(TokenError::InsufficientAllowance.into())
        );
        assert_eq!(farm.pool.get_pool_state(), state);
        assert_eq!(farm.pool.get_participant(alice), None);
    }

    #[test]
    fn test_claim_with_nothing_accrued() {
        let mut farm = setup();
        let alice = farm.env.get_account(1);
        farm.env.set_caller(alice);
        assert_eq!(farm.pool.claim(), U256::zero());

        farm.fund(U256::from(1_000u64), 100);
        farm.stake(alice, U256::from(10));
        assert_eq!(farm.pool.claim(), U256::zero());
        assert_eq!(farm.reward.balance_of(alice), U256::zero());
    }

    #[test]
    fn test_repeated_claim_pays_once() {
        let mut farm = setup();
        let alice = farm.env.get_account(1);
        farm.fund(U256::from(1_000u64), 100);
        farm.stake(alice, U256::from(10));
        farm.advance(40);

        let first = farm.pool.claimable(alice);
        assert_eq!(first, farm.pool.claimable(alice));
        assert_eq!(first, U256::from(400));

        farm.env.set_caller(alice);
        assert_eq!(farm.pool.claim(), first);
        assert_eq!(farm.pool.claim(), U256::zero());
        assert_eq!(farm.reward.balance_of(alice), first);
        assert_eq!(farm.pool.get_participant(alice).unwrap().accrued_reward, U256::zero());
    }

    #[test]
    fn test_exit_returns_stake_and_reward() {
        let mut farm = setup();
        let alice = farm.env.get_account(1);
        farm.fund(U256::from(1_000u64), 100);
        farm.stake(alice, U256::from(10));
        farm.advance(100);

        farm.env.set_caller(alice);
        assert_eq!(farm.pool.exit(), U256::from(1_000));
        assert_eq!(farm.lp.balance_of(alice), U256::from(10));
        assert_eq!(farm.reward.balance_of(alice), U256::from(1_000));
        assert_eq!(farm.pool.total_staked(), U256::zero());
        assert_eq!(farm.pool.try_exit(), Err(FarmError::ZeroAmount.into()));
    }

    #[test]
    fn test_idle_emission_recovered_by_admin() {
        let mut farm = setup();
        let alice = farm.env.get_account(1);
        farm.fund(U256::from(1_000u64), 100);
        farm.advance(40);
        farm.stake(alice, U256::from(5));
        farm.advance(60);

        assert_eq!(farm.pool.get_pool_state().unallocated, U256::from(400));

        farm.env.set_caller(alice);
        assert_eq!(
            farm.pool.try_recover_unallocated(),
            Err(FarmError::Unauthorized.into())
        );

        farm.env.set_caller(farm.admin);
        assert_eq!(farm.pool.recover_unallocated(), U256::from(400));
        assert_eq!(farm.reward.balance_of(farm.admin), U256::from(400));

        farm.env.set_caller(alice);
        assert_eq!(farm.pool.claim(), U256::from(600));
        assert_eq!(farm.reward.balance_of(farm.pool_address()), U256::zero());
    }

    #[test]
    fn test_total_staked_matches_positions() {
        let mut farm = setup();
        farm.fund(U256::from(1_000_000u64), 1_000);
        let users = [farm.env.get_account(1), farm.env.get_account(2), farm.env.get_account(3)];

        for (i, user) in users.iter().enumerate() {
            farm.stake(*user, U256::from((i as u64 + 1) * 10));
            farm.advance(7);
        }
        farm.env.set_caller(users[1]);
        farm.pool.withdraw(U256::from(15));
        farm.advance(7);
        farm.env.set_caller(users[0]);
        farm.pool.withdraw(U256::from(10));

        let sum = users
            .iter()
            .fold(U256::zero(), |acc, user| acc + farm.pool.balance_of(*user));
        assert_eq!(farm.pool.total_staked(), sum);
        assert_eq!(sum, U256::from(35));
    }
}
