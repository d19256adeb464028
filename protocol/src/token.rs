//! # Fungible Token Interface
//!
//! The faucet never owns a token contract; it pulls funds through one. This
//! module defines the surface it relies on, which is the standard
//! allowance-then-pull pattern:
//!
//! 1. The owner calls `approve(spender, amount)`, which *sets* the allowance.
//! 2. The spender calls `transfer_from(owner, recipient, amount)`, which
//!    decrements the allowance and moves the balance as one step, or fails
//!    and does neither.
//!
//! The boolean results mirror tokens that signal failure by returning
//! `false` instead of reverting. Well-behaved implementations return
//! `Ok(true)` or an error.

use thiserror::Error;

use crate::address::Address;
use crate::units::Amount;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors a token contract can raise.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// The spender's allowance is smaller than the requested pull.
    #[error("insufficient allowance: approved {allowance}, requested {requested}")]
    InsufficientAllowance {
        /// Allowance currently granted to the spender.
        allowance: Amount,
        /// Amount the spender tried to pull.
        requested: Amount,
    },

    /// The source account does not hold enough tokens.
    #[error("insufficient balance: account has {balance}, requested {requested}")]
    InsufficientBalance {
        /// Current balance of the source account.
        balance: Amount,
        /// Amount that was requested.
        requested: Amount,
    },

    /// The zero address was used as a source, recipient, or spender.
    #[error("zero address is not a valid participant")]
    ZeroAddress,

    /// A balance or supply would exceed `u128::MAX`.
    #[error("token arithmetic overflow")]
    Overflow,
}

// ---------------------------------------------------------------------------
// Interface
// ---------------------------------------------------------------------------

/// A fungible token contract with standard allowance semantics.
///
/// Callers are passed explicitly because there is no ambient `msg.sender`:
/// `owner` in [`approve`](Self::approve) and `spender` in
/// [`transfer_from`](Self::transfer_from) are the authenticated caller.
pub trait FungibleToken {
    /// Address this contract is deployed at.
    fn address(&self) -> Address;

    /// Display precision.
    fn decimals(&self) -> u8;

    /// Ticker symbol.
    fn symbol(&self) -> &str;

    /// Balance of `owner` in smallest units. Unknown accounts hold zero.
    fn balance_of(&self, owner: &Address) -> Amount;

    /// Remaining amount `spender` may pull from `owner`.
    fn allowance(&self, owner: &Address, spender: &Address) -> Amount;

    /// Sets the allowance of `spender` over the caller's (`owner`) tokens.
    fn approve(
        &mut self,
        owner: &Address,
        spender: &Address,
        amount: Amount,
    ) -> Result<bool, TokenError>;

    /// Moves `amount` from the caller (`from`) to `to`.
    fn transfer(&mut self, from: &Address, to: &Address, amount: Amount)
        -> Result<bool, TokenError>;

    /// Pulls `amount` from `from` to `to` on behalf of `spender`.
    ///
    /// Implementations check the allowance before the balance.
    fn transfer_from(
        &mut self,
        spender: &Address,
        from: &Address,
        to: &Address,
        amount: Amount,
    ) -> Result<bool, TokenError>;
}
