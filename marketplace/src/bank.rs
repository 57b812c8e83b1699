//! # Host Value Environment
//!
//! The marketplace runs inside a host ledger that owns the native token.
//! This module models the slice of that environment the program can see:
//! per-identity balances, the program's own held balance, and the fact that
//! a transfer's recipient is externally-controlled code that may refuse the
//! money or try to call back in while it has control.
//!
//! Value only ever enters the program as the `value` parameter of an entry
//! point: the caller's balance is debited into the held balance at dispatch,
//! and settlement legs pay back out of it. Sending value at the program
//! directly, with no operation attached, always fails.
//!
//! The [`Bank`] itself is mechanical. Behavior consultation and reentrant
//! dispatch happen in [`crate::market`], where the recursion has something
//! to recurse into.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::MarketplaceError;
use crate::ledger::Address;
use crate::market::Call;

/// Name of the program's own account, used only to label rejected direct
/// transfers. The held balance is tracked separately from the balance table.
pub const PROGRAM_ACCOUNT: &str = "atelier:program";

// ---------------------------------------------------------------------------
// Recipient Behavior
// ---------------------------------------------------------------------------

/// What an identity's receive hook does when a transfer leg reaches it.
///
/// Real recipients are externally-controlled code; this enum is the
/// program's model of the three things that code can do with control.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub enum RecipientBehavior {
    /// Take the money. What almost everyone does.
    #[default]
    Accept,
    /// Refuse the transfer. The leg fails with
    /// [`MarketplaceError::TransferFailed`] and the operation reverts.
    Reject,
    /// Re-invoke a marketplace entry point before accepting, as the
    /// recipient of an in-flight operation's outbound transfer. The inner
    /// call's failure propagates, so reentering a guarded operation sinks
    /// the outer one with [`MarketplaceError::ReentrantCall`].
    Reenter(Box<Call>),
}

// ---------------------------------------------------------------------------
// Bank
// ---------------------------------------------------------------------------

/// Balance table for every identity the marketplace has seen, plus the
/// program's own held balance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bank {
    /// Spendable balance per identity, in base units.
    balances: HashMap<Address, u64>,
    /// Value currently held by the program itself.
    held: u64,
    /// Receive hooks per identity. Absent means [`RecipientBehavior::Accept`].
    behaviors: HashMap<Address, RecipientBehavior>,
}

impl Bank {
    /// Creates an empty bank.
    pub fn new() -> Self {
        Self {
            balances: HashMap::new(),
            held: 0,
            behaviors: HashMap::new(),
        }
    }

    /// Credits an identity's balance from outside the marketplace (genesis
    /// allocation, faucet, inbound bridge -- the host's business).
    ///
    /// # Errors
    ///
    /// Returns [`MarketplaceError::TransferFailed`] when aimed at the
    /// program account: the program accepts value only through an entry
    /// point. Returns [`MarketplaceError::AmountOverflow`] past `u64::MAX`.
    pub fn deposit(&mut self, identity: &str, amount: u64) -> Result<u64, MarketplaceError> {
        if identity == PROGRAM_ACCOUNT {
            return Err(MarketplaceError::TransferFailed {
                to: PROGRAM_ACCOUNT.to_string(),
                amount,
            });
        }
        let balance = self.balances.entry(identity.to_string()).or_insert(0);
        *balance = balance
            .checked_add(amount)
            .ok_or(MarketplaceError::AmountOverflow)?;
        Ok(*balance)
    }

    /// Spendable balance of an identity. Zero for identities never seen.
    pub fn balance_of(&self, identity: &str) -> u64 {
        self.balances.get(identity).copied().unwrap_or(0)
    }

    /// Value currently held by the program.
    pub fn held_balance(&self) -> u64 {
        self.held
    }

    /// Moves value attached to a call from the caller into the held
    /// balance. This is the only way value enters the program.
    ///
    /// # Errors
    ///
    /// Returns [`MarketplaceError::TransferFailed`] if the caller cannot
    /// cover `amount`.
    pub(crate) fn collect(&mut self, from: &str, amount: u64) -> Result<(), MarketplaceError> {
        if amount == 0 {
            return Ok(());
        }
        let balance = self.balances.entry(from.to_string()).or_insert(0);
        if *balance < amount {
            return Err(MarketplaceError::TransferFailed {
                to: PROGRAM_ACCOUNT.to_string(),
                amount,
            });
        }
        *balance -= amount;
        self.held = self
            .held
            .checked_add(amount)
            .ok_or(MarketplaceError::AmountOverflow)?;
        Ok(())
    }

    /// Moves value from the held balance to a recipient. The caller has
    /// already consulted the recipient's behavior; this is the mechanical
    /// half of a leg.
    ///
    /// # Errors
    ///
    /// Returns [`MarketplaceError::AmountOverflow`] if the held balance
    /// cannot cover the leg (an accounting bug, not a user error) or the
    /// recipient balance would overflow.
    pub(crate) fn release(&mut self, to: &str, amount: u64) -> Result<(), MarketplaceError> {
        self.held = self
            .held
            .checked_sub(amount)
            .ok_or(MarketplaceError::AmountOverflow)?;
        let balance = self.balances.entry(to.to_string()).or_insert(0);
        *balance = balance
            .checked_add(amount)
            .ok_or(MarketplaceError::AmountOverflow)?;
        Ok(())
    }

    /// Credits the held balance directly. Models value stranded in the
    /// program account by the host (the sweep in [`crate::admin`] exists
    /// for exactly this).
    #[cfg(test)]
    pub(crate) fn strand(&mut self, amount: u64) {
        self.held += amount;
    }

    /// Installs a receive hook for an identity.
    pub fn set_behavior(&mut self, identity: &str, behavior: RecipientBehavior) {
        self.behaviors.insert(identity.to_string(), behavior);
    }

    /// The receive hook of an identity, [`RecipientBehavior::Accept`] if
    /// none was installed.
    pub(crate) fn behavior(&self, identity: &str) -> RecipientBehavior {
        self.behaviors.get(identity).cloned().unwrap_or_default()
    }
}

impl Default for Bank {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
