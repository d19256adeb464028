//! # Deposit Orchestration
//!
//! The two-step handshake a depositor performs: approve the faucet on the
//! token, then ask the faucet to pull. Kept out of [`TokenFaucet`] because the
//! approval is the depositor's action, not the faucet's.

use tco2_protocol::{parse_units, Address, Amount, FungibleToken};

use crate::faucet::{DepositReceipt, FaucetError, TokenFaucet};

/// Approves the faucet for exactly `amount` and deposits it.
///
/// The approval overwrites any allowance the depositor had granted the
/// faucet before. If the deposit then fails, the fresh approval remains in
/// place and no tokens move.
///
/// # Errors
///
/// Propagates the token's approval error or the faucet's deposit error.
pub fn approve_and_deposit<T: FungibleToken + ?Sized>(
    token: &mut T,
    faucet: &mut TokenFaucet,
    depositor: &Address,
    amount: Amount,
) -> Result<DepositReceipt, FaucetError> {
    if !token.approve(depositor, &faucet.address(), amount)? {
        return Err(FaucetError::TransferRejected);
    }
    faucet.deposit(token, depositor, amount)
}

/// Like [`approve_and_deposit`], with the amount given in whole tokens
/// (e.g. `"1.0"`) and scaled by the token's decimals.
///
/// # Errors
///
/// Returns [`FaucetError::Units`] if `amount` does not parse.
pub fn approve_and_deposit_units<T: FungibleToken + ?Sized>(
    token: &mut T,
    faucet: &mut TokenFaucet,
    depositor: &Address,
    amount: &str,
) -> Result<DepositReceipt, FaucetError> {
    let amount = parse_units(amount, token.decimals())?;
    approve_and_deposit(token, faucet, depositor, amount)
}
