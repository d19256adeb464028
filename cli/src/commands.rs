//! # Command Handlers
//!
//! Each handler loads the state file, applies one operation through the
//! contracts crate, writes the state back if anything changed, and returns
//! the text to print. Keeping output as a return value lets the handlers be
//! tested without capturing stdout.

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::path::Path;

use tco2_contracts::{approve_and_deposit, Erc20Token, TokenFaucet};
use tco2_protocol::config::STATE_FORMAT_VERSION;
use tco2_protocol::{format_units, parse_units, Amount, FungibleToken};

use crate::cli::{ApproveArgs, BalanceArgs, BalanceOfArgs, DepositArgs, InitArgs};

/// Everything the CLI persists between invocations.
#[derive(Debug, Serialize, Deserialize)]
pub struct FaucetState {
    /// Layout version of this file.
    pub version: u32,
    /// When `init` created the file.
    pub created_at: DateTime<Utc>,
    /// The token contract.
    pub token: Erc20Token,
    /// The faucet deployed for it.
    pub faucet: TokenFaucet,
}

impl FaucetState {
    /// Reads and validates a state file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read state file {}", path.display()))?;
        let state: FaucetState = serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse state file {}", path.display()))?;

        if state.version != STATE_FORMAT_VERSION {
            bail!(
                "unsupported state file version {} (expected {})",
                state.version,
                STATE_FORMAT_VERSION
            );
        }
        if state.token.address() != state.faucet.token() {
            bail!(
                "state file is inconsistent: faucet accepts {}, token is {}",
                state.faucet.token(),
                state.token.address()
            );
        }
        state
            .faucet
            .validate()
            .with_context(|| format!("state file {} holds an invalid faucet", path.display()))?;

        tracing::debug!(path = %path.display(), "state loaded");
        Ok(state)
    }

    /// Writes the state file, replacing it as a whole.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize state")?;

        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, json)
            .with_context(|| format!("failed to write {}", tmp.display()))?;
        std::fs::rename(&tmp, path)
            .with_context(|| format!("failed to replace state file {}", path.display()))?;

        tracing::debug!(path = %path.display(), "state saved");
        Ok(())
    }

    fn amount(&self, text: &str) -> Result<Amount> {
        parse_units(text, self.token.decimals())
            .with_context(|| format!("invalid amount '{text}'"))
    }

    fn display(&self, amount: Amount) -> String {
        format!("{} {}", format_units(amount, self.token.decimals()), self.token.symbol())
    }
}

/// `init`: deploys a token, mints the holder's supply, and deploys a faucet.
pub fn init(path: &Path, args: InitArgs) -> Result<String> {
    if path.exists() && !args.force {
        bail!(
            "state file {} already exists (use --force to overwrite)",
            path.display()
        );
    }

    let supply = parse_units(&args.supply, args.decimals)
        .with_context(|| format!("invalid supply '{}'", args.supply))?;

    let mut token = Erc20Token::new(args.token, args.name, args.symbol, args.decimals);
    token
        .mint(&args.holder, supply)
        .context("failed to mint initial supply")?;

    let faucet = match args.faucet {
        Some(address) => TokenFaucet::with_address(address, args.token),
        None => TokenFaucet::new(args.token),
    }
    .context("failed to deploy faucet")?;

    let state = FaucetState {
        version: STATE_FORMAT_VERSION,
        created_at: Utc::now(),
        token,
        faucet,
    };
    state.save(path)?;

    tracing::info!(
        state = %path.display(),
        token = %state.token.address(),
        faucet = %state.faucet.address(),
        "faucet initialized"
    );

    let mut out = String::new();
    writeln!(out, "Faucet deployed.")?;
    writeln!(out, "  State file : {}", path.display())?;
    writeln!(
        out,
        "  Token      : {} ({}, {})",
        state.token.address(),
        state.token.name(),
        state.token.symbol()
    )?;
    writeln!(out, "  Faucet     : {}", state.faucet.address())?;
    writeln!(out, "  Deployed   : {}", state.faucet.deployed_at().to_rfc3339())?;
    write!(out, "  Holder     : {} with {}", args.holder, state.display(supply))?;
    Ok(out)
}

/// `approve`: sets the faucet's allowance over an account's tokens.
pub fn approve(path: &Path, args: ApproveArgs) -> Result<String> {
    let mut state = FaucetState::load(path)?;
    let amount = state.amount(&args.amount)?;
    let spender = state.faucet.address();

    state
        .token
        .approve(&args.owner, &spender, amount)
        .context("approval failed")?;
    state.save(path)?;

    Ok(format!(
        "{} approved faucet {} for {}",
        args.owner,
        spender,
        state.display(amount)
    ))
}

/// `deposit`: pulls tokens into the faucet, approving first unless told not to.
pub fn deposit(path: &Path, args: DepositArgs) -> Result<String> {
    let mut state = FaucetState::load(path)?;
    let amount = state.amount(&args.amount)?;

    let FaucetState { token, faucet, .. } = &mut state;
    let receipt = if args.no_approve {
        faucet.deposit(token, &args.from, amount)
    } else {
        approve_and_deposit(token, faucet, &args.from, amount)
    }
    .context("deposit failed")?;

    state.save(path)?;

    let mut out = String::new();
    writeln!(out, "Deposit confirmed ({} confirmation(s)).", receipt.confirmations)?;
    writeln!(out, "  Tx         : {}", receipt.tx_id)?;
    writeln!(out, "  From       : {}", receipt.depositor)?;
    writeln!(out, "  Amount     : {}", state.display(receipt.amount))?;
    write!(out, "  Held       : {}", state.display(receipt.held_after))?;
    Ok(out)
}

/// `balance`: the faucet's held balance for a token.
pub fn balance(path: &Path, args: BalanceArgs) -> Result<String> {
    let state = FaucetState::load(path)?;
    let token = args.token.unwrap_or_else(|| state.faucet.token());
    let held = state.faucet.get_token_balance(&token);
    Ok(format_units(held, state.token.decimals()))
}

/// `balance-of`: an account's token balance.
pub fn balance_of(path: &Path, args: BalanceOfArgs) -> Result<String> {
    let state = FaucetState::load(path)?;
    Ok(format_units(
        state.token.balance_of(&args.account),
        state.token.decimals(),
    ))
}

/// `reconcile`: ledger vs. token balance of the faucet address.
pub fn reconcile(path: &Path) -> Result<String> {
    let state = FaucetState::load(path)?;
    let r = state
        .faucet
        .reconcile(&state.token)
        .context("reconciliation failed")?;

    if !r.is_balanced() {
        tracing::warn!(held = r.held, on_chain = r.on_chain, "faucet ledger is out of balance");
    }

    let mut out = String::new();
    writeln!(out, "  Held       : {}", state.display(r.held))?;
    writeln!(out, "  On-chain   : {}", state.display(r.on_chain))?;
    let status = if r.is_balanced() {
        "balanced".to_string()
    } else if r.deficit() > 0 {
        format!("deficit of {}", state.display(r.deficit()))
    } else {
        format!("surplus of {}", state.display(r.surplus()))
    };
    write!(out, "  Status     : {status}")?;
    Ok(out)
}

/// `events`: one line per accepted deposit, oldest first.
pub fn events(path: &Path) -> Result<String> {
    let state = FaucetState::load(path)?;
    if state.faucet.events().is_empty() {
        return Ok("no deposits".to_string());
    }

    let mut out = String::new();
    for (i, e) in state.faucet.events().iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        write!(
            out,
            "{}  {}  +{}  held {}",
            e.at.to_rfc3339(),
            e.depositor,
            state.display(e.amount),
            state.display(e.held_after)
        )?;
    }
    Ok(out)
}
