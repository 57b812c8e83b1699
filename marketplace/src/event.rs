//! # Emitted Events
//!
//! The marketplace appends one of these to its event log for every state
//! change it commits. The log is the program's outward-facing notification
//! stream: indexers and front-ends tail it instead of diffing ledger tables.
//!
//! Events participate in the transaction boundary. A failed operation leaves
//! no events behind, so the log never mentions anything that didn't happen.

use serde::{Deserialize, Serialize};

use crate::ledger::Address;

/// A notification emitted by a committed marketplace operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    /// A new artist joined the registry.
    ArtistRegistered {
        /// The registered identity.
        artist: Address,
        /// Opaque off-chain profile pointer recorded at registration.
        profile_reference: String,
    },

    /// An artist paid the verification fee and received the badge.
    ArtistVerified {
        /// The now-verified identity.
        artist: Address,
        /// Value forwarded to the admin, including any forfeited excess.
        fee_paid: u64,
    },

    /// A new artwork entered the ledger.
    Minted {
        /// The freshly assigned token id.
        token_id: u64,
        /// The creator (initial owner).
        artist: Address,
        /// Listing price at mint.
        price: u64,
        /// Royalty percentage fixed for the life of the token.
        royalty_percentage: u8,
    },

    /// An artwork became available for purchase.
    Listed {
        /// The listed token.
        token_id: u64,
        /// Asking price.
        price: u64,
    },

    /// An artwork was taken off the market.
    Unlisted {
        /// The unlisted token.
        token_id: u64,
    },

    /// A listed artwork's asking price changed.
    PriceUpdated {
        /// The repriced token.
        token_id: u64,
        /// Price before the update.
        old_price: u64,
        /// Price after the update.
        new_price: u64,
    },

    /// A sale settled: ownership moved and all payment legs cleared.
    Purchased {
        /// Sale record id.
        sale_id: u64,
        /// The token that changed hands.
        token_id: u64,
        /// Previous owner.
        seller: Address,
        /// New owner.
        buyer: Address,
        /// The price the legs were computed from.
        price: u64,
        /// Whether a royalty leg was paid.
        is_secondary_sale: bool,
    },

    /// A royalty leg was paid to the original artist on a secondary sale.
    RoyaltyPaid {
        /// The token that sold.
        token_id: u64,
        /// The original creator receiving the royalty.
        artist: Address,
        /// Royalty amount in base units.
        amount: u64,
    },

    /// Overpayment returned to a buyer after settlement.
    Refunded {
        /// The buyer who overpaid.
        buyer: Address,
        /// Exact excess returned.
        amount: u64,
    },

    /// The admin changed the platform fee.
    PlatformFeeUpdated {
        /// Fee before the change, whole percent.
        old_fee: u8,
        /// Fee after the change, whole percent.
        new_fee: u8,
    },

    /// The admin swept the program-held balance.
    FeesWithdrawn {
        /// Amount swept to the admin.
        amount: u64,
    },

    /// Administrative control moved to a new identity.
    AdminTransferred {
        /// Previous admin.
        old_admin: Address,
        /// New admin.
        new_admin: Address,
    },
}
