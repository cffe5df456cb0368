use adapter_interface::{
    AdapterKind, AdapterQueryMsg, Erc20ExecuteMsg, Erc20QueryMsg, RouterExecuteMsg,
    RouterQueryMsg, ShareVaultExecuteMsg, ShareVaultQueryMsg, StakingRewardsExecuteMsg,
    StakingRewardsQueryMsg, TEST_DEFI_ADAPTER,
};
use alloy::primitives::Address;
use chain_client::{ArtifactStore, ChainBackend, ChainError};
use cosmwasm_std::{to_json_binary, Uint256};
use pool_registry::{pangolin_stake_pools, sushi_bar_pools};

use crate::adapter::{AdapterFault, BOGUS_REWARD_TOKEN};
use crate::chain::SimulatedChain;
use crate::fork::{liquidity_provider, FORK_STAKE, FORK_VAULT_DEPOSIT, FORK_VAULT_YIELD};
use crate::testing_mocks::setup_contract_query_mock;

fn uint(value: u128) -> Uint256 {
    Uint256::from(value)
}

fn balance(chain: &SimulatedChain, token: &Address, account: &Address) -> Uint256 {
    chain
        .query(token, &Erc20QueryMsg::BalanceOf { account: *account })
        .unwrap()
}

struct Deployed {
    admin: Address,
    adapter: Address,
    router: Address,
}

fn deploy(chain: &SimulatedChain, kind: AdapterKind) -> Deployed {
    let admin = chain.accounts().unwrap()[0];
    let store = ArtifactStore::in_memory();
    let adapter = chain
        .deploy(&admin, &store.find(kind.contract_name()).unwrap(), &[])
        .unwrap();
    let router = chain
        .deploy(&admin, &store.find(TEST_DEFI_ADAPTER).unwrap(), &[])
        .unwrap();
    Deployed {
        admin,
        adapter,
        router,
    }
}

#[test]
fn failed_transaction_leaves_no_trace() {
    let chain = SimulatedChain::new();
    let alice = chain.accounts().unwrap()[3];
    let bob = chain.accounts().unwrap()[4];
    let token = chain.create_token(18);
    chain.mint(&token, &alice, uint(100)).unwrap();

    chain
        .execute(
            &alice,
            &token,
            &Erc20ExecuteMsg::Transfer {
                recipient: bob,
                amount: uint(40),
            },
        )
        .unwrap();
    let block = chain.block_number().unwrap();

    let err = chain
        .submit(
            &alice,
            &token,
            &Erc20ExecuteMsg::Transfer {
                recipient: bob,
                amount: uint(61),
            },
        )
        .unwrap_err();
    assert!(matches!(err, ChainError::CallReverted { contract, .. } if contract == token));

    assert_eq!(chain.block_number().unwrap(), block);
    assert_eq!(balance(&chain, &token, &alice), uint(60));
    assert_eq!(balance(&chain, &token, &bob), uint(40));
}

#[test]
fn unknown_sender_is_rejected() {
    let chain = SimulatedChain::new();
    let token = chain.create_token(6);
    let stranger = Address::new([9u8; 20]);

    let err = chain
        .submit(
            &stranger,
            &token,
            &Erc20ExecuteMsg::Approve {
                spender: stranger,
                amount: uint(1),
            },
        )
        .unwrap_err();
    assert!(matches!(err, ChainError::Rpc { .. }));
}

#[test]
fn share_vault_rounds_down_both_ways() {
    let chain = SimulatedChain::new();
    let alice = chain.accounts().unwrap()[3];
    let sushi = chain.create_token(18);
    let bar = chain.create_share_vault(sushi);

    chain
        .provide_vault_liquidity(&bar, &liquidity_provider(), uint(1000))
        .unwrap();
    chain.accrue_vault_yield(&bar, uint(234)).unwrap();

    chain.mint(&sushi, &alice, uint(100)).unwrap();
    chain
        .execute(
            &alice,
            &sushi,
            &Erc20ExecuteMsg::Approve {
                spender: bar,
                amount: uint(100),
            },
        )
        .unwrap();
    chain
        .execute(&alice, &bar, &ShareVaultExecuteMsg::Enter { amount: uint(100) })
        .unwrap();

    // 100 * 1000 / 1234
    let shares: Uint256 = chain
        .query(&bar, &ShareVaultQueryMsg::BalanceOf { account: alice })
        .unwrap();
    assert_eq!(shares, uint(81));
    let total: Uint256 = chain.query(&bar, &ShareVaultQueryMsg::TotalSupply {}).unwrap();
    assert_eq!(total, uint(1081));

    chain
        .execute(&alice, &bar, &ShareVaultExecuteMsg::Leave { share: shares })
        .unwrap();

    // 81 * 1334 / 1081
    assert_eq!(balance(&chain, &sushi, &alice), uint(99));
    assert_eq!(balance(&chain, &bar, &alice), Uint256::zero());
}

#[test]
fn entering_without_allowance_reverts() {
    let chain = SimulatedChain::new();
    let alice = chain.accounts().unwrap()[3];
    let sushi = chain.create_token(18);
    let bar = chain.create_share_vault(sushi);
    chain.mint(&sushi, &alice, uint(10)).unwrap();

    let err = chain
        .execute(&alice, &bar, &ShareVaultExecuteMsg::Enter { amount: uint(10) })
        .unwrap_err();
    assert!(matches!(err, ChainError::CallReverted { .. }));
    assert_eq!(balance(&chain, &bar, &alice), Uint256::zero());
}

#[test]
fn staking_rewards_accrue_per_block() {
    let chain = SimulatedChain::new();
    let alice = chain.accounts().unwrap()[3];
    let staking_token = chain.create_token(18);
    let rewards_token = chain.create_token(18);
    let pool = chain.create_staking_rewards(staking_token, rewards_token, uint(10));
    chain.mint(&rewards_token, &pool, uint(1_000)).unwrap();
    chain.mint(&staking_token, &alice, uint(100)).unwrap();

    chain
        .execute(
            &alice,
            &staking_token,
            &Erc20ExecuteMsg::Approve {
                spender: pool,
                amount: uint(100),
            },
        )
        .unwrap();
    chain
        .execute(&alice, &pool, &StakingRewardsExecuteMsg::Stake { amount: uint(100) })
        .unwrap();

    chain.advance_blocks(3);
    let earned: Uint256 = chain
        .query(&pool, &StakingRewardsQueryMsg::Earned { account: alice })
        .unwrap();
    assert_eq!(earned, uint(30));

    // claiming mines one more block
    chain
        .execute(&alice, &pool, &StakingRewardsExecuteMsg::GetReward {})
        .unwrap();
    assert_eq!(balance(&chain, &rewards_token, &alice), uint(40));

    chain
        .execute(&alice, &pool, &StakingRewardsExecuteMsg::Exit {})
        .unwrap();
    assert_eq!(balance(&chain, &staking_token, &alice), uint(100));
    assert_eq!(balance(&chain, &rewards_token, &alice), uint(50));
    let staked: Uint256 = chain
        .query(&pool, &StakingRewardsQueryMsg::TotalSupply {})
        .unwrap();
    assert_eq!(staked, Uint256::zero());
}

#[test]
fn rewards_are_shared_pro_rata() {
    let chain = SimulatedChain::new();
    let alice = chain.accounts().unwrap()[3];
    let token = chain.create_token(18);
    let pool = chain.create_staking_rewards(token, token, uint(100));

    chain.provide_stake(&pool, &liquidity_provider(), uint(300)).unwrap();
    chain.provide_stake(&pool, &alice, uint(100)).unwrap();
    chain.advance_blocks(4);

    let earned: Uint256 = chain
        .query(&pool, &StakingRewardsQueryMsg::Earned { account: alice })
        .unwrap();
    assert_eq!(earned, uint(100));
}

#[test]
fn deployment_by_artifact_name() {
    let chain = SimulatedChain::new();
    let deployed = deploy(&chain, AdapterKind::PangolinStake);
    assert_ne!(deployed.adapter, deployed.router);
    assert!(chain.is_contract(&deployed.adapter));
    assert!(chain.is_contract(&deployed.router));

    let err = chain
        .deploy(
            &deployed.admin,
            &ArtifactStore::in_memory().find("UniswapV2Adapter").unwrap(),
            &[],
        )
        .unwrap_err();
    assert!(matches!(err, ChainError::UnknownArtifact { .. }));
}

#[test]
fn router_round_trip_through_sushi_bar_fork() {
    let registry = sushi_bar_pools().unwrap();
    let pool = registry.get("SUSHI").unwrap().clone();
    let chain = SimulatedChain::fork_of(AdapterKind::SushiBar, &registry).unwrap();
    let deployed = deploy(&chain, AdapterKind::SushiBar);
    let sushi = pool.tokens[0];

    let total_shares: Uint256 = chain
        .query(&pool.pool, &ShareVaultQueryMsg::TotalSupply {})
        .unwrap();
    assert_eq!(total_shares, uint(FORK_VAULT_DEPOSIT));
    assert_eq!(
        balance(&chain, &sushi, &pool.pool),
        uint(FORK_VAULT_DEPOSIT + FORK_VAULT_YIELD)
    );

    let seeded = uint(200_000_000_000_000_000_000);
    chain.seed_balance(&sushi, &deployed.router, seeded).unwrap();
    chain
        .execute(
            &deployed.admin,
            &deployed.router,
            &RouterExecuteMsg::TestGetDepositAllCodes {
                underlying_token: sushi,
                liquidity_pool: pool.pool,
                adapter: deployed.adapter,
            },
        )
        .unwrap();

    let lp_balance: Uint256 = chain
        .query(
            &deployed.adapter,
            &AdapterQueryMsg::GetLiquidityPoolTokenBalance {
                holder: deployed.router,
                placeholder: deployed.router,
                liquidity_pool: pool.pool,
            },
        )
        .unwrap();
    assert!(!lp_balance.is_zero());
    assert_eq!(lp_balance, balance(&chain, &pool.pool, &deployed.router));

    let underlying: Uint256 = chain
        .query(
            &deployed.router,
            &RouterQueryMsg::GetErc20TokenBalance {
                token: sushi,
                holder: deployed.router,
            },
        )
        .unwrap();
    assert_eq!(underlying, Uint256::zero());

    let reward_token: Address = chain
        .query(
            &deployed.adapter,
            &AdapterQueryMsg::GetRewardToken {
                liquidity_pool: pool.pool,
            },
        )
        .unwrap();
    assert!(reward_token.is_zero());

    chain
        .execute(
            &deployed.admin,
            &deployed.router,
            &RouterExecuteMsg::TestGetWithdrawAllCodes {
                underlying_token: sushi,
                liquidity_pool: pool.pool,
                adapter: deployed.adapter,
            },
        )
        .unwrap();
    assert_eq!(balance(&chain, &pool.pool, &deployed.router), Uint256::zero());
    let returned = balance(&chain, &sushi, &deployed.router);
    // two floor divisions may cost at most a couple of wei
    assert!(returned <= seeded && returned + uint(2) >= seeded);
}

#[test]
fn pangolin_fork_pays_rewards_in_png() {
    let registry = pangolin_stake_pools().unwrap();
    let pool = registry.get("PNG").unwrap().clone();
    let chain = SimulatedChain::fork_of(AdapterKind::PangolinStake, &registry).unwrap();
    let deployed = deploy(&chain, AdapterKind::PangolinStake);
    let png = pool.tokens[0];

    let staked: Uint256 = chain
        .query(&pool.pool, &StakingRewardsQueryMsg::TotalSupply {})
        .unwrap();
    assert_eq!(staked, uint(FORK_STAKE));
    let rewards_token: Address = chain
        .query(&pool.pool, &StakingRewardsQueryMsg::RewardsToken {})
        .unwrap();
    assert_eq!(rewards_token, png);

    chain.seed_balance(&png, &deployed.router, uint(200)).unwrap();
    chain
        .execute(
            &deployed.admin,
            &deployed.router,
            &RouterExecuteMsg::TestGetDepositAllCodes {
                underlying_token: png,
                liquidity_pool: pool.pool,
                adapter: deployed.adapter,
            },
        )
        .unwrap();
    chain.mine_block(&deployed.admin).unwrap();

    let unclaimed: Uint256 = chain
        .query(
            &deployed.adapter,
            &AdapterQueryMsg::GetUnclaimedRewardTokenAmount {
                holder: deployed.router,
                liquidity_pool: pool.pool,
                underlying_token: png,
            },
        )
        .unwrap();
    let earned: Uint256 = chain
        .query(
            &pool.pool,
            &StakingRewardsQueryMsg::Earned {
                account: deployed.router,
            },
        )
        .unwrap();
    assert_eq!(unclaimed, earned);
}

#[test]
fn query_mock_overrides_selected_views() {
    let chain = SimulatedChain::new();
    let deployed = deploy(&chain, AdapterKind::SushiBar);
    let sushi = chain.create_token(18);
    let bar = chain.create_share_vault(sushi);
    let fake = Address::new([0x11; 20]);

    chain.update_contract_mock(setup_contract_query_mock(
        deployed.adapter,
        move |msg: &AdapterQueryMsg| match msg {
            AdapterQueryMsg::GetRewardToken { .. } => Some(to_json_binary(&fake)),
            _ => None,
        },
    ));

    let reward_token: Address = chain
        .query(
            &deployed.adapter,
            &AdapterQueryMsg::GetRewardToken {
                liquidity_pool: bar,
            },
        )
        .unwrap();
    assert_eq!(reward_token, fake);

    let underlying: Vec<Address> = chain
        .query(
            &deployed.adapter,
            &AdapterQueryMsg::GetUnderlyingTokens {
                liquidity_pool: bar,
                lp_token: bar,
            },
        )
        .unwrap();
    assert_eq!(underlying, vec![sushi]);

    chain.remove_contract_mock(&deployed.adapter);
    let reward_token: Address = chain
        .query(
            &deployed.adapter,
            &AdapterQueryMsg::GetRewardToken {
                liquidity_pool: bar,
            },
        )
        .unwrap();
    assert!(reward_token.is_zero());
}

#[test]
fn adapter_faults() {
    let chain = SimulatedChain::new();
    let deployed = deploy(&chain, AdapterKind::PangolinStake);
    let png = chain.create_token(18);
    let pool = chain.create_staking_rewards(png, png, uint(1));
    chain.seed_balance(&png, &deployed.router, uint(50)).unwrap();

    chain
        .set_adapter_fault(&deployed.adapter, Some(AdapterFault::RevertOnDeposit))
        .unwrap();
    let deposit = RouterExecuteMsg::TestGetDepositAllCodes {
        underlying_token: png,
        liquidity_pool: pool,
        adapter: deployed.adapter,
    };
    assert!(chain
        .execute(&deployed.admin, &deployed.router, &deposit)
        .is_err());
    assert_eq!(balance(&chain, &png, &deployed.router), uint(50));

    chain.set_adapter_fault(&deployed.adapter, None).unwrap();
    chain
        .execute(&deployed.admin, &deployed.router, &deposit)
        .unwrap();

    chain
        .set_adapter_fault(&deployed.adapter, Some(AdapterFault::OverstatedValuation))
        .unwrap();
    let amount: Uint256 = chain
        .query(
            &deployed.adapter,
            &AdapterQueryMsg::GetAllAmountInToken {
                holder: deployed.router,
                underlying_token: png,
                liquidity_pool: pool,
            },
        )
        .unwrap();
    assert_eq!(amount, uint(51));

    chain
        .set_adapter_fault(&deployed.adapter, Some(AdapterFault::WrongRewardToken))
        .unwrap();
    let reward_token: Address = chain
        .query(
            &deployed.adapter,
            &AdapterQueryMsg::GetRewardToken {
                liquidity_pool: pool,
            },
        )
        .unwrap();
    assert_eq!(reward_token, BOGUS_REWARD_TOKEN);
}

#[test]
fn backend_calls_are_counted() {
    let chain = SimulatedChain::new();
    let token = chain.create_token(18);
    assert_eq!(chain.call_count(), 0);

    let admin = chain.accounts().unwrap()[0];
    let _: u8 = chain.query(&token, &Erc20QueryMsg::Decimals {}).unwrap();
    chain.mine_block(&admin).unwrap();
    // accounts, query, submit_transfer, wait_for_confirmation
    assert_eq!(chain.call_count(), 4);

    chain.reset_call_count();
    assert_eq!(chain.call_count(), 0);
}
