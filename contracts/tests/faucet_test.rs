//! Integration tests for the TCO2 faucet.
//!
//! These tests reproduce the deposit flow end to end: a holder funded with
//! TCO2, a freshly deployed faucet, the approve-then-deposit handshake, and
//! the balance checks on both sides.

use tco2_contracts::{
    approve_and_deposit, approve_and_deposit_units, Erc20Token, FaucetError, TokenFaucet,
};
use tco2_protocol::config::{
    DEFAULT_DEPOSITOR_ADDRESS, DEFAULT_TCO2_ADDRESS, ONE_TCO2, TCO2_DECIMALS, TCO2_NAME,
    TCO2_SYMBOL,
};
use tco2_protocol::{format_units, parse_units, Address, FungibleToken};

/// Helper: a TCO2 token where the default depositor holds `supply` whole tokens,
/// plus a faucet deployed for it.
fn deployment(supply: &str) -> (Erc20Token, TokenFaucet) {
    let mut token = Erc20Token::new(DEFAULT_TCO2_ADDRESS, TCO2_NAME, TCO2_SYMBOL, TCO2_DECIMALS);
    token
        .mint(&DEFAULT_DEPOSITOR_ADDRESS, parse_units(supply, TCO2_DECIMALS).unwrap())
        .unwrap();
    let faucet = TokenFaucet::new(DEFAULT_TCO2_ADDRESS).unwrap();
    (token, faucet)
}

// ---------------------------------------------------------------------------
// Deposit Flow
// ---------------------------------------------------------------------------

#[test]
fn should_deposit_one_tco2() {
    let (mut tco, mut faucet) = deployment("5.0");
    let me = DEFAULT_DEPOSITOR_ADDRESS;

    let before = tco.balance_of(&me);

    let receipt = approve_and_deposit_units(&mut tco, &mut faucet, &me, "1.0").unwrap();
    assert!(receipt.confirmations > 0);

    // The holder is down exactly the deposited amount.
    let expected = before - parse_units("1.0", TCO2_DECIMALS).unwrap();
    assert_eq!(tco.balance_of(&me), expected);
    assert_eq!(format_units(tco.balance_of(&me), TCO2_DECIMALS), "4.0");

    // Each test deploys a fresh faucet, so it holds exactly the one deposit.
    let held = faucet.get_token_balance(&DEFAULT_TCO2_ADDRESS);
    assert_eq!(format_units(held, TCO2_DECIMALS), "1.0");
}

#[test]
fn sequential_deposits_equal_one_combined_deposit() {
    let (mut split_token, mut split) = deployment("5.0");
    let (mut whole_token, mut whole) = deployment("5.0");
    let me = DEFAULT_DEPOSITOR_ADDRESS;

    approve_and_deposit(&mut split_token, &mut split, &me, ONE_TCO2).unwrap();
    approve_and_deposit(&mut split_token, &mut split, &me, 2 * ONE_TCO2).unwrap();
    approve_and_deposit(&mut whole_token, &mut whole, &me, 3 * ONE_TCO2).unwrap();

    assert_eq!(
        split.get_token_balance(&DEFAULT_TCO2_ADDRESS),
        whole.get_token_balance(&DEFAULT_TCO2_ADDRESS)
    );
    assert_eq!(split_token.balance_of(&me), whole_token.balance_of(&me));
    assert_eq!(split.deposit_count(), 2);
    assert_eq!(whole.deposit_count(), 1);
}

#[test]
fn deposits_from_several_holders_are_tracked_per_depositor() {
    let (mut tco, mut faucet) = deployment("5.0");
    let me = DEFAULT_DEPOSITOR_ADDRESS;
    let friend = Address::from_seed("friend");
    tco.mint(&friend, 2 * ONE_TCO2).unwrap();

    approve_and_deposit(&mut tco, &mut faucet, &me, ONE_TCO2).unwrap();
    approve_and_deposit(&mut tco, &mut faucet, &friend, 2 * ONE_TCO2).unwrap();
    approve_and_deposit(&mut tco, &mut faucet, &me, ONE_TCO2).unwrap();

    let totals = faucet.deposits_by_depositor();
    assert_eq!(totals.get(&me), Some(&(2 * ONE_TCO2)));
    assert_eq!(totals.get(&friend), Some(&(2 * ONE_TCO2)));
    assert_eq!(faucet.get_token_balance(&DEFAULT_TCO2_ADDRESS), 4 * ONE_TCO2);
    assert!(faucet.reconcile(&tco).unwrap().is_balanced());
}

#[test]
fn independent_faucets_do_not_share_balances() {
    let (mut tco, mut first) = deployment("5.0");
    let second = TokenFaucet::new(DEFAULT_TCO2_ADDRESS).unwrap();
    let me = DEFAULT_DEPOSITOR_ADDRESS;

    approve_and_deposit(&mut tco, &mut first, &me, ONE_TCO2).unwrap();

    assert_eq!(first.get_token_balance(&DEFAULT_TCO2_ADDRESS), ONE_TCO2);
    assert_eq!(second.get_token_balance(&DEFAULT_TCO2_ADDRESS), 0);
}

// ---------------------------------------------------------------------------
// Error Cases
// ---------------------------------------------------------------------------

#[test]
fn deposit_without_approval_leaves_everything_untouched() {
    let (mut tco, mut faucet) = deployment("5.0");
    let me = DEFAULT_DEPOSITOR_ADDRESS;

    let result = faucet.deposit(&mut tco, &me, ONE_TCO2);
    assert_eq!(
        result.unwrap_err(),
        FaucetError::InsufficientAllowance {
            allowance: 0,
            requested: ONE_TCO2
        }
    );
    assert_eq!(tco.balance_of(&me), 5 * ONE_TCO2);
    assert_eq!(faucet.get_token_balance(&DEFAULT_TCO2_ADDRESS), 0);
}

#[test]
fn partial_approval_is_not_enough() {
    let (mut tco, mut faucet) = deployment("5.0");
    let me = DEFAULT_DEPOSITOR_ADDRESS;

    tco.approve(&me, &faucet.address(), ONE_TCO2 / 2).unwrap();
    let result = faucet.deposit(&mut tco, &me, ONE_TCO2);
    assert!(matches!(result, Err(FaucetError::InsufficientAllowance { .. })));
    assert_eq!(tco.allowance(&me, &faucet.address()), ONE_TCO2 / 2);
}

#[test]
fn depositing_more_than_held_fails() {
    let (mut tco, mut faucet) = deployment("5.0");
    let me = DEFAULT_DEPOSITOR_ADDRESS;

    let result = approve_and_deposit_units(&mut tco, &mut faucet, &me, "5.000000000000000001");
    assert!(matches!(
        result,
        Err(FaucetError::InsufficientCallerBalance { .. })
    ));
    assert_eq!(faucet.get_token_balance(&DEFAULT_TCO2_ADDRESS), 0);
}

#[test]
fn zero_deposit_fails() {
    let (mut tco, mut faucet) = deployment("5.0");
    let result = faucet.deposit(&mut tco, &DEFAULT_DEPOSITOR_ADDRESS, 0);
    assert_eq!(result.unwrap_err(), FaucetError::ZeroAmount);
}

#[test]
fn faucet_requires_a_token() {
    let result = TokenFaucet::new(Address::ZERO);
    assert!(matches!(result, Err(FaucetError::InvalidConfiguration(_))));
}

#[test]
fn balance_of_unconfigured_token_is_zero() {
    let (mut tco, mut faucet) = deployment("5.0");
    approve_and_deposit(&mut tco, &mut faucet, &DEFAULT_DEPOSITOR_ADDRESS, ONE_TCO2).unwrap();

    let bct: Address = "0x2F800Db0fdb5223b3C3f354886d907A671414A7F".parse().unwrap();
    assert_eq!(faucet.get_token_balance(&bct), 0);
}

// ---------------------------------------------------------------------------
// Persistence
// ---------------------------------------------------------------------------

#[test]
fn faucet_state_survives_a_json_snapshot() {
    let (mut tco, mut faucet) = deployment("5.0");
    approve_and_deposit(&mut tco, &mut faucet, &DEFAULT_DEPOSITOR_ADDRESS, ONE_TCO2).unwrap();

    let json = serde_json::to_string(&(&faucet, &tco)).unwrap();
    let (mut faucet, mut tco): (TokenFaucet, Erc20Token) = serde_json::from_str(&json).unwrap();

    assert_eq!(faucet.get_token_balance(&DEFAULT_TCO2_ADDRESS), ONE_TCO2);
    approve_and_deposit(&mut tco, &mut faucet, &DEFAULT_DEPOSITOR_ADDRESS, ONE_TCO2).unwrap();
    assert_eq!(faucet.get_token_balance(&DEFAULT_TCO2_ADDRESS), 2 * ONE_TCO2);
    assert_eq!(tco.balance_of(&DEFAULT_DEPOSITOR_ADDRESS), 3 * ONE_TCO2);
}
