//! # Shared Faucet Handle
//!
//! A cloneable, thread-safe handle to one faucet and its token contract.
//! Both live behind a single mutex, so every state change (approval, deposit,
//! direct token mutation) is applied in one total order and a read always
//! sees the state after the last applied change. A deposit can never
//! interleave with another operation halfway through.

use parking_lot::Mutex;
use std::sync::Arc;
use tco2_protocol::{Address, Amount, FungibleToken};

use crate::deposit;
use crate::faucet::{DepositReceipt, FaucetError, Reconciliation, TokenFaucet};

#[derive(Debug)]
struct Inner<T> {
    faucet: TokenFaucet,
    token: T,
}

/// Thread-safe handle over a [`TokenFaucet`] and the token it accepts.
#[derive(Debug)]
pub struct SharedFaucet<T> {
    inner: Arc<Mutex<Inner<T>>>,
    faucet_address: Address,
    token_address: Address,
}

impl<T> Clone for SharedFaucet<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            faucet_address: self.faucet_address,
            token_address: self.token_address,
        }
    }
}

impl<T: FungibleToken> SharedFaucet<T> {
    /// Wraps a faucet together with its token contract.
    ///
    /// # Errors
    ///
    /// Returns [`FaucetError::UnsupportedToken`] if `token` is not the
    /// faucet's configured token.
    pub fn new(faucet: TokenFaucet, token: T) -> Result<Self, FaucetError> {
        if token.address() != faucet.token() {
            return Err(FaucetError::UnsupportedToken {
                expected: faucet.token(),
                actual: token.address(),
            });
        }

        Ok(Self {
            faucet_address: faucet.address(),
            token_address: faucet.token(),
            inner: Arc::new(Mutex::new(Inner { faucet, token })),
        })
    }

    /// The faucet's custody address.
    pub fn faucet_address(&self) -> Address {
        self.faucet_address
    }

    /// The configured token.
    pub fn token_address(&self) -> Address {
        self.token_address
    }

    /// `owner` approves the faucet for `amount`.
    ///
    /// # Errors
    ///
    /// Returns [`FaucetError::Token`] if the token rejects the approval.
    pub fn approve(&self, owner: &Address, amount: Amount) -> Result<bool, FaucetError> {
        let mut inner = self.inner.lock();
        Ok(inner.token.approve(owner, &self.faucet_address, amount)?)
    }

    /// Deposits on behalf of `caller`, who must already have approved.
    ///
    /// # Errors
    ///
    /// Returns the same errors as [`TokenFaucet::deposit`].
    pub fn deposit(&self, caller: &Address, amount: Amount) -> Result<DepositReceipt, FaucetError> {
        let mut guard = self.inner.lock();
        let Inner { faucet, token } = &mut *guard;
        faucet.deposit(token, caller, amount)
    }

    /// Approves and deposits under one lock acquisition.
    ///
    /// # Errors
    ///
    /// Returns the same errors as [`deposit::approve_and_deposit`].
    pub fn approve_and_deposit(
        &self,
        caller: &Address,
        amount: Amount,
    ) -> Result<DepositReceipt, FaucetError> {
        let mut guard = self.inner.lock();
        let Inner { faucet, token } = &mut *guard;
        deposit::approve_and_deposit(token, faucet, caller, amount)
    }

    /// Held balance for `token` (zero for anything but the configured token).
    pub fn get_token_balance(&self, token: &Address) -> Amount {
        self.inner.lock().faucet.get_token_balance(token)
    }

    /// Token balance of `owner`.
    pub fn balance_of(&self, owner: &Address) -> Amount {
        self.inner.lock().token.balance_of(owner)
    }

    /// Number of successful deposits.
    pub fn deposit_count(&self) -> usize {
        self.inner.lock().faucet.deposit_count()
    }

    /// See [`TokenFaucet::reconcile`].
    pub fn reconcile(&self) -> Result<Reconciliation, FaucetError> {
        let inner = self.inner.lock();
        inner.faucet.reconcile(&inner.token)
    }

    /// Runs `f` with exclusive access to the token contract.
    ///
    /// The faucet cannot observe anything `f` does until it returns.
    pub fn with_token_mut<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        f(&mut self.inner.lock().token)
    }
}

impl<T: FungibleToken + Clone> SharedFaucet<T> {
    /// A consistent copy of the faucet and token state.
    pub fn snapshot(&self) -> (TokenFaucet, T) {
        let inner = self.inner.lock();
        (inner.faucet.clone(), inner.token.clone())
    }
}
