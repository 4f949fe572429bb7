//! CLI tool for deploying, funding and inspecting the reward pool.

use std::str::FromStr;

use emission_farm::farming::reward_pool::{RewardPool, RewardPoolInitArgs};
use emission_farm::token::Cep18TokenHostRef;
use emission_farm::units::{format_units, parse_units};
use odra::casper_types::U256;
use odra::host::{HostEnv, HostRef};
use odra::prelude::{Address, Addressable};
use odra::schema::casper_contract_schema::NamedCLType;
use odra_cli::{
    deploy::DeployScript,
    scenario::{Args, Error, Scenario, ScenarioMetadata},
    CommandArg, ContractProvider, DeployedContractsContainer, DeployerExt,
    OdraCli,
};

/// Address of the token paid out as reward
const REWARD_TOKEN_VAR: &str = "FARM_REWARD_TOKEN";
/// Address of the token stakers lock (usually an LP token)
const STAKE_TOKEN_VAR: &str = "FARM_STAKE_TOKEN";

fn token_from_env(name: &str) -> Option<Address> {
    let value = std::env::var(name).ok()?;
    Address::from_str(value.trim()).ok()
}

/// Deploys the RewardPool for the configured reward and stake tokens.
pub struct RewardPoolDeployScript;

impl DeployScript for RewardPoolDeployScript {
    fn deploy(
        &self,
        env: &HostEnv,
        container: &mut DeployedContractsContainer
    ) -> Result<(), odra_cli::deploy::Error> {
        let (Some(reward_token), Some(stake_token)) =
            (token_from_env(REWARD_TOKEN_VAR), token_from_env(STAKE_TOKEN_VAR))
        else {
            println!("Steps:");
            println!("1. Provide liquidity for the reward token to obtain the LP token");
            println!("2. Look up both contract package hashes");
            println!("3. Put them into {} and {}", REWARD_TOKEN_VAR, STAKE_TOKEN_VAR);
            return Err(odra_cli::deploy::Error::OdraError {
                message: format!("Set {} and {} in .env first", REWARD_TOKEN_VAR, STAKE_TOKEN_VAR),
            });
        };

        println!("Deploying RewardPool...");
        println!("  reward token: {:?}", reward_token);
        println!("  stake token:  {:?}", stake_token);

        let pool = RewardPool::load_or_deploy(
            &env,
            RewardPoolInitArgs {
                reward_token,
                stake_token,
            },
            container,
            400_000_000_000 // Gas limit for pool deployment
        )?;

        println!("RewardPool deployed at {:?}", Addressable::address(&pool));
        println!("Next: run the fund scenario to approve the reward and open an emission period");
        Ok(())
    }
}

/// Scenario that approves the reward and opens an emission period.
pub struct FundScenario;

impl Scenario for FundScenario {
    fn args(&self) -> Vec<CommandArg> {
        vec![
            CommandArg::new(
                "amount",
                "Reward amount in whole tokens, e.g. 1000000 or 0.5",
                NamedCLType::String,
            ),
            CommandArg::new(
                "duration",
                "Emission period in seconds",
                NamedCLType::U64,
            ),
        ]
    }

    fn run(
        &self,
        env: &HostEnv,
        container: &DeployedContractsContainer,
        args: Args
    ) -> Result<(), Error> {
        let mut pool = container.contract_ref::<RewardPool>(env)?;
        let amount = args.get_single::<String>("amount")?;
        let duration = args.get_single::<u64>("duration")?;

        let mut reward_token = Cep18TokenHostRef::new(pool.reward_token(), env.clone());
        let decimals = reward_token.decimals();
        let symbol = reward_token.symbol();
        let amount: U256 = parse_units(&amount, decimals).map_err(|err| Error::OdraError {
            message: format!("Invalid amount {:?}: {}", amount, err),
        })?;

        println!("Approving {} {} for the pool...", format_units(amount, decimals), symbol);
        env.set_gas(50_000_000_000);
        reward_token.try_approve(Addressable::address(&pool), amount)?;

        println!("Funding {} {} over {} seconds...", format_units(amount, decimals), symbol, duration);
        env.set_gas(300_000_000_000);
        pool.try_fund(amount, duration)?;

        println!("Emission started!");
        println!("Per second: {} {}", format_units(pool.reward_rate(), decimals), symbol);
        Ok(())
    }
}

impl ScenarioMetadata for FundScenario {
    const NAME: &'static str = "fund";
    const DESCRIPTION: &'static str = "Approves the reward and opens an emission period";
}

/// Scenario printing the caller's wallet and pool position.
pub struct CheckBalanceScenario;

impl Scenario for CheckBalanceScenario {
    fn args(&self) -> Vec<CommandArg> {
        vec![]
    }

    fn run(
        &self,
        env: &HostEnv,
        container: &DeployedContractsContainer,
        _args: Args
    ) -> Result<(), Error> {
        let pool = container.contract_ref::<RewardPool>(env)?;
        let owner = env.caller();

        let reward_token = Cep18TokenHostRef::new(pool.reward_token(), env.clone());
        let stake_token = Cep18TokenHostRef::new(pool.stake_token(), env.clone());
        let reward_decimals = reward_token.decimals();
        let reward_symbol = reward_token.symbol();

        println!("Wallet: {:?}", owner);
        println!(
            "{} balance: {}",
            reward_symbol,
            format_units(reward_token.balance_of(owner), reward_decimals)
        );
        println!(
            "Staked {}: {}",
            stake_token.symbol(),
            format_units(pool.balance_of(owner), stake_token.decimals())
        );
        println!(
            "Claimable {}: {}",
            reward_symbol,
            format_units(pool.claimable(owner), reward_decimals)
        );
        Ok(())
    }
}

impl ScenarioMetadata for CheckBalanceScenario {
    const NAME: &'static str = "check-balance";
    const DESCRIPTION: &'static str = "Prints the reward token balance and pool position of the caller";
}

/// Scenario claiming the caller's accrued reward.
pub struct ClaimScenario;

impl Scenario for ClaimScenario {
    fn args(&self) -> Vec<CommandArg> {
        vec![]
    }

    fn run(
        &self,
        env: &HostEnv,
        container: &DeployedContractsContainer,
        _args: Args
    ) -> Result<(), Error> {
        let mut pool = container.contract_ref::<RewardPool>(env)?;
        let reward_token = Cep18TokenHostRef::new(pool.reward_token(), env.clone());

        env.set_gas(100_000_000_000);
        let reward = pool.try_claim()?;

        println!(
            "Claimed {} {}",
            format_units(reward, reward_token.decimals()),
            reward_token.symbol()
        );
        Ok(())
    }
}

impl ScenarioMetadata for ClaimScenario {
    const NAME: &'static str = "claim";
    const DESCRIPTION: &'static str = "Claims the caller's accrued reward";
}

/// Main function to run the CLI tool.
pub fn main() {
    OdraCli::new()
        .about("CLI tool for the reward emission farm")
        // Deploy scripts
        .deploy(RewardPoolDeployScript)
        // Contract references
        .contract::<RewardPool>()
        // Scenarios
        .scenario(FundScenario)
        .scenario(CheckBalanceScenario)
        .scenario(ClaimScenario)
        .build()
        .run();
}
