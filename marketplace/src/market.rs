//! # The Marketplace Aggregate
//!
//! One struct owns everything: the ledger tables, the bank, the reentrancy
//! guard, the event log, and the admin configuration. Entry points live in
//! the operation modules ([`crate::registry`], [`crate::lifecycle`],
//! [`crate::settlement`], [`crate::admin`], [`crate::view`]); this module
//! provides the machinery they share.
//!
//! ## Transaction Boundary
//!
//! The host ledger executes invocations serially and all-or-nothing: an
//! operation either commits every effect or none. We reproduce that with an
//! explicit boundary -- [`Marketplace::transact`] snapshots the whole state,
//! runs the operation body, and restores the snapshot on any error. No
//! partial state (ownership flip, event, balance move) ever survives a
//! failed operation, including effects of inner calls made by reentrant
//! receive hooks before the outer operation failed.
//!
//! ## Outbound Transfers
//!
//! [`Marketplace::pay_out`] is the single choke point for outbound value.
//! It consults the recipient's receive hook first: a rejecting recipient
//! fails the leg, and a reentering recipient gets its call dispatched
//! against the live (locked) marketplace before the credit lands. That is
//! where [`MarketplaceError::ReentrantCall`] comes from in practice.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::bank::{Bank, RecipientBehavior};
use crate::config;
use crate::error::MarketplaceError;
use crate::event::Event;
use crate::guard::ReentrancyGuard;
use crate::ledger::{Address, Artwork, Ledger, TokenId};

// ---------------------------------------------------------------------------
// Call
// ---------------------------------------------------------------------------

/// A marketplace entry point with its parameters, as data.
///
/// Hosts dispatch these via [`Marketplace::dispatch`]; reentrant receive
/// hooks ([`RecipientBehavior::Reenter`]) carry one to replay while an
/// operation is in flight. `value` fields are the amount attached to the
/// call, debited from the caller at dispatch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Call {
    /// Register the caller as an artist.
    Register {
        /// Opaque off-chain profile pointer.
        profile_reference: String,
    },
    /// Pay the verification fee.
    Verify {
        /// Value attached; at least [`config::VERIFICATION_FEE`].
        value: u64,
    },
    /// Mint a new artwork.
    Mint {
        /// Title of the piece.
        title: String,
        /// Free-form description.
        description: String,
        /// Opaque content-addressed asset reference.
        content_hash: String,
        /// Initial listing price in base units.
        price: u64,
        /// Creator royalty in whole percent.
        royalty_percentage: u8,
    },
    /// Relist an owned artwork.
    List {
        /// The token to list.
        token_id: TokenId,
        /// Asking price in base units.
        price: u64,
    },
    /// Take an owned artwork off the market.
    Unlist {
        /// The token to unlist.
        token_id: TokenId,
    },
    /// Change the asking price of a listed artwork.
    UpdatePrice {
        /// The token to reprice.
        token_id: TokenId,
        /// New asking price in base units.
        new_price: u64,
    },
    /// Buy a listed artwork.
    Purchase {
        /// The token to buy.
        token_id: TokenId,
        /// Value attached; at least the asking price.
        value: u64,
    },
    /// Admin: change the platform fee.
    SetPlatformFee {
        /// New fee in whole percent.
        new_fee: u8,
    },
    /// Admin: sweep the program-held balance.
    WithdrawPlatformFees,
    /// Admin: hand administrative control to another identity.
    TransferAdmin {
        /// The identity taking over.
        new_admin: Address,
    },
}

// ---------------------------------------------------------------------------
// Marketplace
// ---------------------------------------------------------------------------

/// The whole marketplace program state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Marketplace {
    /// The singular privileged administrator identity.
    pub(crate) admin: Address,
    /// Platform fee in whole percent, `0..=10`.
    pub(crate) platform_fee_percentage: u8,
    /// Mapping tables and indices.
    pub(crate) ledger: Ledger,
    /// Host value environment.
    pub(crate) bank: Bank,
    /// The in-flight flag for guarded operations.
    pub(crate) guard: ReentrancyGuard,
    /// Append-only emitted-event log.
    pub(crate) events: Vec<Event>,
}

impl Marketplace {
    /// Creates a marketplace administered by `admin`, with the launch fee
    /// schedule and empty tables.
    pub fn new(admin: impl Into<Address>) -> Self {
        Self {
            admin: admin.into(),
            platform_fee_percentage: config::DEFAULT_PLATFORM_FEE_PERCENTAGE,
            ledger: Ledger::new(),
            bank: Bank::new(),
            guard: ReentrancyGuard::default(),
            events: Vec::new(),
        }
    }

    /// The current administrator identity.
    pub fn admin(&self) -> &str {
        &self.admin
    }

    /// The current platform fee in whole percent.
    pub fn platform_fee_percentage(&self) -> u8 {
        self.platform_fee_percentage
    }

    /// Everything the marketplace has ever emitted, oldest first.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Credits an identity's spendable balance from the host side.
    ///
    /// # Errors
    ///
    /// Rejects deposits aimed at the program account; see
    /// [`Bank::deposit`].
    pub fn fund(&mut self, identity: &str, amount: u64) -> Result<u64, MarketplaceError> {
        self.bank.deposit(identity, amount)
    }

    /// Spendable balance of an identity.
    pub fn balance_of(&self, identity: &str) -> u64 {
        self.bank.balance_of(identity)
    }

    /// Value currently held by the program itself.
    pub fn held_balance(&self) -> u64 {
        self.bank.held_balance()
    }

    /// Installs a receive hook for an identity. The default is
    /// [`RecipientBehavior::Accept`].
    pub fn set_recipient_behavior(&mut self, identity: &str, behavior: RecipientBehavior) {
        self.bank.set_behavior(identity, behavior);
    }

    /// Executes an entry point described as data, as `caller`.
    ///
    /// This is how a host drives the marketplace and how a reentering
    /// receive hook replays a call mid-operation. Results are discarded
    /// down to `()`; errors propagate unchanged.
    pub fn dispatch(&mut self, caller: &str, call: Call) -> Result<(), MarketplaceError> {
        match call {
            Call::Register { profile_reference } => self.register(caller, &profile_reference),
            Call::Verify { value } => self.verify(caller, value),
            Call::Mint {
                title,
                description,
                content_hash,
                price,
                royalty_percentage,
            } => self
                .mint(caller, &title, &description, &content_hash, price, royalty_percentage)
                .map(|_| ()),
            Call::List { token_id, price } => self.list(caller, token_id, price),
            Call::Unlist { token_id } => self.unlist(caller, token_id),
            Call::UpdatePrice { token_id, new_price } => {
                self.update_price(caller, token_id, new_price)
            }
            Call::Purchase { token_id, value } => {
                self.purchase(caller, token_id, value).map(|_| ())
            }
            Call::SetPlatformFee { new_fee } => self.set_platform_fee(caller, new_fee),
            Call::WithdrawPlatformFees => self.withdraw_platform_fees(caller).map(|_| ()),
            Call::TransferAdmin { new_admin } => self.transfer_admin(caller, &new_admin),
        }
    }

    // -- transaction boundary ---------------------------------------------

    /// Runs `op` against `self` all-or-nothing: on error, every effect the
    /// body had on the marketplace (ledger, bank, events, guard, config)
    /// is rolled back to the pre-call state.
    pub(crate) fn transact<T>(
        &mut self,
        op: impl FnOnce(&mut Self) -> Result<T, MarketplaceError>,
    ) -> Result<T, MarketplaceError> {
        let checkpoint = self.clone();
        match op(self) {
            Ok(value) => Ok(value),
            Err(error) => {
                debug!(error = %error, "operation reverted");
                *self = checkpoint;
                Err(error)
            }
        }
    }

    // -- authorization predicates -----------------------------------------

    /// Caller must be the administrator.
    pub(crate) fn ensure_admin(&self, caller: &str) -> Result<(), MarketplaceError> {
        if caller != self.admin {
            return Err(MarketplaceError::Unauthorized {
                caller: caller.to_string(),
            });
        }
        Ok(())
    }

    /// The artwork must exist.
    pub(crate) fn existing_artwork(&self, token_id: TokenId) -> Result<&Artwork, MarketplaceError> {
        self.ledger
            .artwork(token_id)
            .ok_or(MarketplaceError::NotFound {
                entity: "artwork",
                id: token_id.to_string(),
            })
    }

    /// The artwork must exist and the caller must be its current owner.
    pub(crate) fn ensure_token_owner(
        &self,
        caller: &str,
        token_id: TokenId,
    ) -> Result<(), MarketplaceError> {
        self.existing_artwork(token_id)?;
        match self.ledger.owner_of(token_id) {
            Some(owner) if owner == caller => Ok(()),
            _ => Err(MarketplaceError::Unauthorized {
                caller: caller.to_string(),
            }),
        }
    }

    // -- value movement ----------------------------------------------------

    /// Debits the value attached to a call from the caller into the held
    /// balance.
    pub(crate) fn collect_value(
        &mut self,
        caller: &str,
        value: u64,
    ) -> Result<(), MarketplaceError> {
        self.bank.collect(caller, value)
    }

    /// Pays one settlement leg out of the held balance.
    ///
    /// The recipient's receive hook runs before the credit lands: a
    /// [`RecipientBehavior::Reject`] hook fails the leg, and a
    /// [`RecipientBehavior::Reenter`] hook has its call dispatched here,
    /// with any inner failure propagated as this leg's failure. Zero-amount
    /// legs are skipped without consulting the hook.
    pub(crate) fn pay_out(&mut self, to: &str, amount: u64) -> Result<(), MarketplaceError> {
        if amount == 0 {
            return Ok(());
        }
        match self.bank.behavior(to) {
            RecipientBehavior::Accept => {}
            RecipientBehavior::Reject => {
                return Err(MarketplaceError::TransferFailed {
                    to: to.to_string(),
                    amount,
                });
            }
            RecipientBehavior::Reenter(call) => {
                debug!(recipient = to, "receive hook reentering the marketplace");
                self.dispatch(to, *call)?;
            }
        }
        self.bank.release(to, amount)
    }

    // -- events ------------------------------------------------------------

    /// Appends to the event log.
    pub(crate) fn emit(&mut self, event: Event) {
        self.events.push(event);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transact_commits_on_success() {
        let mut market = Marketplace::new("admin");
        market.fund("alice", 1_000).unwrap();

        let result = market.transact(|m| m.bank.collect("alice", 400));
        assert!(result.is_ok());
        assert_eq!(market.balance_of("alice"), 600);
        assert_eq!(market.held_balance(), 400);
    }

    #[test]
    fn transact_rolls_back_on_error() {
        let mut market = Marketplace::new("admin");
        market.fund("alice", 1_000).unwrap();

        let result: Result<(), _> = market.transact(|m| {
            m.bank.collect("alice", 400)?;
            m.emit(Event::FeesWithdrawn { amount: 400 });
            Err(MarketplaceError::NothingToWithdraw)
        });

        assert_eq!(result, Err(MarketplaceError::NothingToWithdraw));
        // Every effect of the body is gone.
        assert_eq!(market.balance_of("alice"), 1_000);
        assert_eq!(market.held_balance(), 0);
        assert!(market.events().is_empty());
    }

    #[test]
    fn pay_out_rejecting_recipient_fails_the_leg() {
        let mut market = Marketplace::new("admin");
        market.fund("alice", 500).unwrap();
        market.bank.collect("alice", 500).unwrap();
        market.set_recipient_behavior("bob", RecipientBehavior::Reject);

        let result = market.pay_out("bob", 500);
        assert_eq!(
            result,
            Err(MarketplaceError::TransferFailed {
                to: "bob".into(),
                amount: 500,
            })
        );
    }

    #[test]
    fn pay_out_skips_zero_legs() {
        let mut market = Marketplace::new("admin");
        market.set_recipient_behavior("bob", RecipientBehavior::Reject);
        // A zero leg never reaches the hook.
        assert!(market.pay_out("bob", 0).is_ok());
    }

    #[test]
    fn ensure_admin_rejects_everyone_else() {
        let market = Marketplace::new("admin");
        assert!(market.ensure_admin("admin").is_ok());
        assert_eq!(
            market.ensure_admin("mallory"),
            Err(MarketplaceError::Unauthorized {
                caller: "mallory".into()
            })
        );
    }

    #[test]
    fn existing_artwork_misses_with_not_found() {
        let market = Marketplace::new("admin");
        assert_eq!(
            market.existing_artwork(7).err(),
            Some(MarketplaceError::NotFound {
                entity: "artwork",
                id: "7".into()
            })
        );
    }
}
