//! # TCO2 Faucet Contract
//!
//! A custodial ledger for exactly one fungible token. Depositors approve the
//! faucet for an amount, the faucet pulls that amount into its own address,
//! and it records the running total it holds. The lifecycle is:
//!
//! 1. **Construct** — the faucet is bound to a token address, immutably.
//! 2. **Deposit** — an approved amount is pulled from the caller and added to
//!    the held balance, as one step.
//! 3. **Query** — anyone reads the held balance for a token address.
//!
//! There is no withdrawal path. The held balance only ever grows.
//!
//! ## Held Balance vs. Token Balance
//!
//! The held balance is the faucet's own accounting. It normally equals the
//! token contract's `balance_of(faucet)`, but tokens sent to the faucet with a
//! plain transfer bypass the ledger. [`TokenFaucet::reconcile`] reports the
//! difference without folding it in.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tco2_protocol::config::LOCAL_CONFIRMATIONS;
use tco2_protocol::{Address, Amount, FungibleToken, TokenError, UnitsError};
use thiserror::Error;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors that can occur during faucet operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FaucetError {
    /// The faucet cannot be constructed with these parameters.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A deposit of zero tokens was attempted.
    #[error("deposit amount must be greater than zero")]
    ZeroAmount,

    /// The caller cannot deposit: it is the zero address or the faucet itself.
    #[error("invalid depositor: {0}")]
    InvalidDepositor(Address),

    /// The depositor has not approved the faucet for enough tokens.
    #[error("insufficient allowance: approved {allowance}, deposit requires {requested}")]
    InsufficientAllowance {
        /// Allowance the depositor granted the faucet.
        allowance: Amount,
        /// Amount the deposit needed.
        requested: Amount,
    },

    /// The depositor does not hold enough tokens.
    #[error("insufficient caller balance: holds {balance}, deposit requires {requested}")]
    InsufficientCallerBalance {
        /// Depositor's token balance.
        balance: Amount,
        /// Amount the deposit needed.
        requested: Amount,
    },

    /// The token contract is not the one this faucet is configured for.
    #[error("unsupported token: faucet accepts {expected}, got {actual}")]
    UnsupportedToken {
        /// The configured token.
        expected: Address,
        /// The token that was offered.
        actual: Address,
    },

    /// The held balance would exceed `u128::MAX`.
    #[error("held balance overflow")]
    BalanceOverflow,

    /// The token contract returned `false` from `transfer_from`.
    #[error("token transfer was rejected")]
    TransferRejected,

    /// Any other failure raised by the token contract.
    #[error("token error: {0}")]
    Token(TokenError),

    /// A human-readable amount could not be parsed.
    #[error("invalid amount: {0}")]
    Units(#[from] UnitsError),
}

impl From<TokenError> for FaucetError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::InsufficientAllowance {
                allowance,
                requested,
            } => FaucetError::InsufficientAllowance {
                allowance,
                requested,
            },
            TokenError::InsufficientBalance { balance, requested } => {
                FaucetError::InsufficientCallerBalance { balance, requested }
            }
            other => FaucetError::Token(other),
        }
    }
}

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A successful deposit, as recorded in the faucet's event log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositEvent {
    /// Account the tokens were pulled from.
    pub depositor: Address,
    /// Token that was deposited.
    pub token: Address,
    /// Amount deposited, in smallest units.
    pub amount: Amount,
    /// Held balance immediately after this deposit.
    pub held_after: Amount,
    /// When the deposit was applied.
    pub at: DateTime<Utc>,
}

/// Confirmation returned to the caller of a successful deposit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepositReceipt {
    /// Unique identifier for this deposit.
    pub tx_id: Uuid,
    /// Account the tokens were pulled from.
    pub depositor: Address,
    /// Token that was deposited.
    pub token: Address,
    /// Amount deposited, in smallest units.
    pub amount: Amount,
    /// Held balance immediately after this deposit.
    pub held_after: Amount,
    /// Number of confirmations. Always at least one for an applied deposit.
    pub confirmations: u64,
    /// When the deposit was applied.
    pub timestamp: DateTime<Utc>,
}

/// Comparison of the faucet's held balance with the token's view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reconciliation {
    /// What the faucet's ledger says it holds.
    pub held: Amount,
    /// What the token contract says the faucet's address holds.
    pub on_chain: Amount,
}

impl Reconciliation {
    /// `true` when the ledger and the token agree.
    pub fn is_balanced(&self) -> bool {
        self.held == self.on_chain
    }

    /// Tokens held on-chain but never deposited through the ledger.
    pub fn surplus(&self) -> Amount {
        self.on_chain.saturating_sub(self.held)
    }

    /// Tokens the ledger counts but the faucet's address no longer holds.
    pub fn deficit(&self) -> Amount {
        self.held.saturating_sub(self.on_chain)
    }
}

/// The faucet contract.
///
/// Bound to one token at construction. The token contract itself is passed
/// into each call that needs it and is matched against the configured
/// address, the same way a deployed contract resolves its collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenFaucet {
    /// The faucet's own custody address.
    address: Address,
    /// The only token this faucet accepts.
    token: Address,
    /// Net amount deposited and not withdrawn.
    held_balance: Amount,
    /// Append-only log of successful deposits.
    events: Vec<DepositEvent>,
    /// When the faucet was constructed.
    deployed_at: DateTime<Utc>,
}

impl TokenFaucet {
    /// Deploys a faucet for `token` at a freshly generated address.
    ///
    /// # Errors
    ///
    /// Returns [`FaucetError::InvalidConfiguration`] if `token` is the zero address.
    pub fn new(token: Address) -> Result<Self, FaucetError> {
        let mut address = Address::random();
        while address == token {
            address = Address::random();
        }
        Self::with_address(address, token)
    }

    /// Deploys a faucet for `token` at a known `address`.
    ///
    /// # Errors
    ///
    /// Returns [`FaucetError::InvalidConfiguration`] if either address is
    /// zero, or if the faucet would share the token's address.
    pub fn with_address(address: Address, token: Address) -> Result<Self, FaucetError> {
        let faucet = Self {
            address,
            token,
            held_balance: 0,
            events: Vec::new(),
            deployed_at: Utc::now(),
        };
        faucet.validate()?;

        tracing::info!(faucet = %address, token = %token, "faucet deployed");
        Ok(faucet)
    }

    /// Checks the construction invariants on an existing faucet, such as one
    /// restored from a snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`FaucetError::InvalidConfiguration`] if either address is
    /// zero, or if the faucet shares the token's address.
    pub fn validate(&self) -> Result<(), FaucetError> {
        if self.token.is_zero() {
            return Err(FaucetError::InvalidConfiguration(
                "token address must not be the zero address".into(),
            ));
        }
        if self.address.is_zero() {
            return Err(FaucetError::InvalidConfiguration(
                "faucet address must not be the zero address".into(),
            ));
        }
        if self.address == self.token {
            return Err(FaucetError::InvalidConfiguration(
                "faucet address must differ from the token address".into(),
            ));
        }
        Ok(())
    }

    /// The faucet's custody address.
    pub fn address(&self) -> Address {
        self.address
    }

    /// The configured token.
    pub fn token(&self) -> Address {
        self.token
    }

    /// When the faucet was constructed.
    pub fn deployed_at(&self) -> DateTime<Utc> {
        self.deployed_at
    }

    /// Pulls `amount` of the configured token from `caller` into custody.
    ///
    /// The caller must already have approved the faucet's address for at
    /// least `amount` on `token`. Every check runs before the pull, and the
    /// held balance is only updated after the pull succeeds, so a failed
    /// deposit has no effect on any balance.
    ///
    /// # Errors
    ///
    /// Returns [`FaucetError::ZeroAmount`] if `amount` is zero.
    /// Returns [`FaucetError::InvalidDepositor`] if `caller` is the zero
    /// address or the faucet itself.
    /// Returns [`FaucetError::UnsupportedToken`] if `token` is not the configured token.
    /// Returns [`FaucetError::BalanceOverflow`] if the held balance would overflow.
    /// Returns [`FaucetError::InsufficientAllowance`] or
    /// [`FaucetError::InsufficientCallerBalance`] as raised by the token.
    /// Returns [`FaucetError::TransferRejected`] if the token returns `false`.
    pub fn deposit<T: FungibleToken + ?Sized>(
        &mut self,
        token: &mut T,
        caller: &Address,
        amount: Amount,
    ) -> Result<DepositReceipt, FaucetError> {
        let result = self.try_deposit(token, caller, amount);
        if let Err(ref err) = result {
            tracing::warn!(
                faucet = %self.address,
                depositor = %caller,
                amount,
                error = %err,
                "deposit rejected"
            );
        }
        result
    }

    fn try_deposit<T: FungibleToken + ?Sized>(
        &mut self,
        token: &mut T,
        caller: &Address,
        amount: Amount,
    ) -> Result<DepositReceipt, FaucetError> {
        if amount == 0 {
            return Err(FaucetError::ZeroAmount);
        }
        // A self-pull moves nothing, so it must not be credited.
        if caller.is_zero() || *caller == self.address {
            return Err(FaucetError::InvalidDepositor(*caller));
        }

        self.ensure_configured(token.address())?;

        let held_after = self
            .held_balance
            .checked_add(amount)
            .ok_or(FaucetError::BalanceOverflow)?;

        tracing::debug!(
            faucet = %self.address,
            depositor = %caller,
            amount,
            "pulling deposit"
        );

        if !token.transfer_from(&self.address, caller, &self.address, amount)? {
            return Err(FaucetError::TransferRejected);
        }

        let now = Utc::now();
        self.held_balance = held_after;
        self.events.push(DepositEvent {
            depositor: *caller,
            token: self.token,
            amount,
            held_after,
            at: now,
        });

        tracing::info!(
            faucet = %self.address,
            depositor = %caller,
            amount,
            held = held_after,
            "deposit accepted"
        );

        Ok(DepositReceipt {
            tx_id: Uuid::new_v4(),
            depositor: *caller,
            token: self.token,
            amount,
            held_after,
            confirmations: LOCAL_CONFIRMATIONS,
            timestamp: now,
        })
    }

    /// Held balance for `token`, or zero if it is not the configured token.
    pub fn get_token_balance(&self, token: &Address) -> Amount {
        if *token == self.token {
            self.held_balance
        } else {
            0
        }
    }

    /// Compares the held balance against `token.balance_of(faucet)`.
    ///
    /// # Errors
    ///
    /// Returns [`FaucetError::UnsupportedToken`] if `token` is not the configured token.
    pub fn reconcile<T: FungibleToken + ?Sized>(
        &self,
        token: &T,
    ) -> Result<Reconciliation, FaucetError> {
        self.ensure_configured(token.address())?;
        Ok(Reconciliation {
            held: self.held_balance,
            on_chain: token.balance_of(&self.address),
        })
    }

    /// Number of successful deposits.
    pub fn deposit_count(&self) -> usize {
        self.events.len()
    }

    /// Every successful deposit, oldest first.
    pub fn events(&self) -> &[DepositEvent] {
        &self.events
    }

    /// Total each depositor has put in, keyed by depositor.
    pub fn deposits_by_depositor(&self) -> HashMap<Address, Amount> {
        let mut totals: HashMap<Address, Amount> = HashMap::new();
        for event in &self.events {
            let entry = totals.entry(event.depositor).or_insert(0);
            *entry = entry.saturating_add(event.amount);
        }
        totals
    }

    /// Total deposited by `depositor`.
    pub fn total_deposited_by(&self, depositor: &Address) -> Amount {
        self.events
            .iter()
            .filter(|e| e.depositor == *depositor)
            .fold(0, |acc: Amount, e| acc.saturating_add(e.amount))
    }

    fn ensure_configured(&self, actual: Address) -> Result<(), FaucetError> {
        if actual != self.token {
            return Err(FaucetError::UnsupportedToken {
                expected: self.token,
                actual,
            });
        }
        Ok(())
    }
}
