//! # ERC-20 Token Contract
//!
//! An in-memory fungible token with the allowance semantics of the ERC-20
//! standard. It stands in for a deployed TCO2 contract: balances and
//! allowances live in hash maps, and every operation validates fully before
//! touching either.
//!
//! Minting is open to whoever holds the `&mut` handle. That is the fixture's
//! equivalent of funding an account on a forked network.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tco2_protocol::{Address, Amount, FungibleToken, TokenError};

/// An ERC-20 token held entirely in memory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Erc20Token {
    /// Contract address.
    address: Address,
    /// Human-readable name (e.g., "Toucan Protocol: TCO2").
    name: String,
    /// Ticker symbol.
    symbol: String,
    /// Display precision.
    decimals: u8,
    /// Sum of all balances.
    total_supply: Amount,
    /// `owner -> balance`. Accounts that never held tokens are absent.
    balances: HashMap<Address, Amount>,
    /// `owner -> (spender -> remaining allowance)`.
    allowances: HashMap<Address, HashMap<Address, Amount>>,
}

impl Erc20Token {
    /// Deploys an empty token at `address`.
    pub fn new(
        address: Address,
        name: impl Into<String>,
        symbol: impl Into<String>,
        decimals: u8,
    ) -> Self {
        Self {
            address,
            name: name.into(),
            symbol: symbol.into(),
            decimals,
            total_supply: 0,
            balances: HashMap::new(),
            allowances: HashMap::new(),
        }
    }

    /// Token name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current total supply in smallest units.
    pub fn total_supply(&self) -> Amount {
        self.total_supply
    }

    /// Creates `amount` new tokens in `to`'s account.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::ZeroAddress`] when minting to the null identity.
    /// Returns [`TokenError::Overflow`] if supply or balance would overflow.
    pub fn mint(&mut self, to: &Address, amount: Amount) -> Result<(), TokenError> {
        if to.is_zero() {
            return Err(TokenError::ZeroAddress);
        }

        let new_supply = self
            .total_supply
            .checked_add(amount)
            .ok_or(TokenError::Overflow)?;
        let new_balance = self
            .balance_of(to)
            .checked_add(amount)
            .ok_or(TokenError::Overflow)?;

        self.total_supply = new_supply;
        self.balances.insert(*to, new_balance);

        tracing::debug!(token = %self.address, to = %to, amount, "minted");
        Ok(())
    }

    /// Moves `amount` between accounts after checking every precondition.
    fn move_balance(
        &mut self,
        from: &Address,
        to: &Address,
        amount: Amount,
    ) -> Result<(), TokenError> {
        if from.is_zero() || to.is_zero() {
            return Err(TokenError::ZeroAddress);
        }

        let from_balance = self.balance_of(from);
        let new_from = from_balance
            .checked_sub(amount)
            .ok_or(TokenError::InsufficientBalance {
                balance: from_balance,
                requested: amount,
            })?;

        if from == to {
            return Ok(());
        }

        let new_to = self
            .balance_of(to)
            .checked_add(amount)
            .ok_or(TokenError::Overflow)?;

        self.balances.insert(*from, new_from);
        self.balances.insert(*to, new_to);
        Ok(())
    }
}

impl FungibleToken for Erc20Token {
    fn address(&self) -> Address {
        self.address
    }

    fn decimals(&self) -> u8 {
        self.decimals
    }

    fn symbol(&self) -> &str {
        &self.symbol
    }

    fn balance_of(&self, owner: &Address) -> Amount {
        self.balances.get(owner).copied().unwrap_or(0)
    }

    fn allowance(&self, owner: &Address, spender: &Address) -> Amount {
        self.allowances
            .get(owner)
            .and_then(|s| s.get(spender))
            .copied()
            .unwrap_or(0)
    }

    fn approve(
        &mut self,
        owner: &Address,
        spender: &Address,
        amount: Amount,
    ) -> Result<bool, TokenError> {
        if owner.is_zero() || spender.is_zero() {
            return Err(TokenError::ZeroAddress);
        }

        self.allowances
            .entry(*owner)
            .or_default()
            .insert(*spender, amount);

        tracing::debug!(
            token = %self.address,
            owner = %owner,
            spender = %spender,
            amount,
            "approval"
        );
        Ok(true)
    }

    fn transfer(
        &mut self,
        from: &Address,
        to: &Address,
        amount: Amount,
    ) -> Result<bool, TokenError> {
        self.move_balance(from, to, amount)?;
        tracing::debug!(token = %self.address, from = %from, to = %to, amount, "transfer");
        Ok(true)
    }

    fn transfer_from(
        &mut self,
        spender: &Address,
        from: &Address,
        to: &Address,
        amount: Amount,
    ) -> Result<bool, TokenError> {
        if spender.is_zero() {
            return Err(TokenError::ZeroAddress);
        }

        let allowance = self.allowance(from, spender);
        let remaining_after = allowance
            .checked_sub(amount)
            .ok_or(TokenError::InsufficientAllowance {
                allowance,
                requested: amount,
            })?;

        self.move_balance(from, to, amount)?;

        // Balance moved, so the allowance entry necessarily exists.
        if let Some(remaining) = self
            .allowances
            .get_mut(from)
            .and_then(|s| s.get_mut(spender))
        {
            *remaining = remaining_after;
        }

        tracing::debug!(
            token = %self.address,
            spender = %spender,
            from = %from,
            to = %to,
            amount,
            "transfer_from"
        );
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token() -> Erc20Token {
        Erc20Token::new(Address::from_seed("tco2"), "Carbon", "TCO2", 18)
    }

    #[test]
    fn mint_increases_supply_and_balance() {
        let mut t = token();
        let alice = Address::from_seed("alice");
        t.mint(&alice, 1_000).unwrap();
        assert_eq!(t.total_supply(), 1_000);
        assert_eq!(t.balance_of(&alice), 1_000);
    }

    #[test]
    fn mint_to_zero_address_rejected() {
        let mut t = token();
        assert_eq!(t.mint(&Address::ZERO, 1), Err(TokenError::ZeroAddress));
    }

    #[test]
    fn mint_overflow_rejected() {
        let mut t = token();
        let alice = Address::from_seed("alice");
        t.mint(&alice, Amount::MAX).unwrap();
        assert_eq!(t.mint(&alice, 1), Err(TokenError::Overflow));
        assert_eq!(t.total_supply(), Amount::MAX);
    }

    #[test]
    fn approve_overwrites_allowance() {
        let mut t = token();
        let alice = Address::from_seed("alice");
        let bob = Address::from_seed("bob");
        assert!(t.approve(&alice, &bob, 500).unwrap());
        assert!(t.approve(&alice, &bob, 200).unwrap());
        assert_eq!(t.allowance(&alice, &bob), 200);
        assert_eq!(t.allowance(&bob, &alice), 0);
    }

    #[test]
    fn transfer_moves_balance() {
        let mut t = token();
        let alice = Address::from_seed("alice");
        let bob = Address::from_seed("bob");
        t.mint(&alice, 100).unwrap();
        assert!(t.transfer(&alice, &bob, 40).unwrap());
        assert_eq!(t.balance_of(&alice), 60);
        assert_eq!(t.balance_of(&bob), 40);
        assert_eq!(t.total_supply(), 100);
    }

    #[test]
    fn transfer_to_self_is_a_no_op() {
        let mut t = token();
        let alice = Address::from_seed("alice");
        t.mint(&alice, 100).unwrap();
        t.transfer(&alice, &alice, 100).unwrap();
        assert_eq!(t.balance_of(&alice), 100);
    }

    #[test]
    fn transfer_from_decrements_allowance() {
        let mut t = token();
        let alice = Address::from_seed("alice");
        let vault = Address::from_seed("vault");
        t.mint(&alice, 100).unwrap();
        t.approve(&alice, &vault, 70).unwrap();
        t.transfer_from(&vault, &alice, &vault, 30).unwrap();
        assert_eq!(t.allowance(&alice, &vault), 40);
        assert_eq!(t.balance_of(&alice), 70);
        assert_eq!(t.balance_of(&vault), 30);
    }

    #[test]
    fn allowance_checked_before_balance() {
        let mut t = token();
        let alice = Address::from_seed("alice");
        let vault = Address::from_seed("vault");
        t.mint(&alice, 10).unwrap();
        t.approve(&alice, &vault, 5).unwrap();
        let result = t.transfer_from(&vault, &alice, &vault, 50);
        assert_eq!(
            result,
            Err(TokenError::InsufficientAllowance {
                allowance: 5,
                requested: 50
            })
        );
    }

    #[test]
    fn failed_transfer_from_changes_nothing() {
        let mut t = token();
        let alice = Address::from_seed("alice");
        let vault = Address::from_seed("vault");
        t.mint(&alice, 10).unwrap();
        t.approve(&alice, &vault, 50).unwrap();
        let result = t.transfer_from(&vault, &alice, &vault, 20);
        assert_eq!(
            result,
            Err(TokenError::InsufficientBalance {
                balance: 10,
                requested: 20
            })
        );
        assert_eq!(t.allowance(&alice, &vault), 50);
        assert_eq!(t.balance_of(&alice), 10);
        assert_eq!(t.balance_of(&vault), 0);
    }

    #[test]
    fn zero_address_participants_rejected() {
        let mut t = token();
        let alice = Address::from_seed("alice");
        t.mint(&alice, 10).unwrap();
        assert_eq!(t.approve(&alice, &Address::ZERO, 1), Err(TokenError::ZeroAddress));
        assert_eq!(t.transfer(&alice, &Address::ZERO, 1), Err(TokenError::ZeroAddress));
    }
}
