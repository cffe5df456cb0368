use adapter_interface::AdapterKind;
use alloy::primitives::Address;
use cosmwasm_std::Uint256;
use proptest::prelude::*;

use crate::error::HarnessError;
use crate::protocol::{share_amount_in_token, Protocol, PANGOLIN_REWARD_TOKEN};
use crate::scenario::seed_amount;

#[test]
fn protocol_per_adapter() {
    let sushi = Protocol::for_adapter(AdapterKind::SushiBar);
    assert_eq!(sushi, Protocol::ShareVault);
    assert!(!sushi.accrues_rewards());
    assert_eq!(sushi.reward_token(), Address::ZERO);

    let pangolin = Protocol::for_adapter(AdapterKind::PangolinStake);
    assert!(pangolin.accrues_rewards());
    assert_eq!(pangolin.reward_token(), PANGOLIN_REWARD_TOKEN);
}

#[test]
fn pangolin_reward_token_address() {
    assert_eq!(
        PANGOLIN_REWARD_TOKEN.to_string(),
        "0x60781C2586D68229fde47564546784ab3fACA982"
    );
    assert_eq!(
        "0x60781c2586d68229fde47564546784ab3faca982"
            .parse::<Address>()
            .unwrap(),
        PANGOLIN_REWARD_TOKEN
    );
    // one letter of the checksummed form in the wrong case
    assert!(
        Address::parse_checksummed("0x60781c2586D68229fde47564546784ab3fACA982", None).is_err()
    );
}

#[test]
fn share_valuation_rounds_down() {
    let value = share_amount_in_token(
        Uint256::from(81u128),
        Uint256::from(1334u128),
        Uint256::from(1081u128),
    )
    .unwrap();
    assert_eq!(value, Uint256::from(99u128));

    let value =
        share_amount_in_token(Uint256::zero(), Uint256::from(5u128), Uint256::from(7u128))
            .unwrap();
    assert_eq!(value, Uint256::zero());
}

#[test]
fn share_valuation_errors() {
    let err = share_amount_in_token(Uint256::MAX, Uint256::from(2u128), Uint256::one())
        .unwrap_err();
    assert!(matches!(err, HarnessError::OverflowError(_)));

    let err = share_amount_in_token(Uint256::one(), Uint256::one(), Uint256::zero()).unwrap_err();
    assert!(matches!(err, HarnessError::DivideByZeroError(_)));
}

#[test]
fn seed_amount_scales_with_decimals() {
    assert_eq!(seed_amount(0).unwrap(), Uint256::from(200u128));
    assert_eq!(seed_amount(6).unwrap(), Uint256::from(200_000_000u128));
    assert_eq!(
        seed_amount(18).unwrap(),
        Uint256::from(200_000_000_000_000_000_000u128)
    );
    assert!(seed_amount(u8::MAX).is_err());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1000))]
    #[test]
    fn share_valuation_is_floor_division(
        shares in any::<u128>(),
        total_underlying in any::<u128>(),
        total_shares in 1..=u128::MAX,
    ) {
        let shares = Uint256::from(shares);
        let total_underlying = Uint256::from(total_underlying);
        let total_shares = Uint256::from(total_shares);

        let value = share_amount_in_token(shares, total_underlying, total_shares).unwrap();

        // value * total_shares <= shares * total_underlying < (value + 1) * total_shares
        let exact = shares * total_underlying;
        let floor = value * total_shares;
        prop_assert!(floor <= exact);
        prop_assert!(exact - floor < total_shares);
    }
}
