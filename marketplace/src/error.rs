//! # Error Taxonomy
//!
//! Every way a marketplace operation can fail, in one enum. The whole
//! program shares this taxonomy: a failed entry point returns exactly one of
//! these variants and leaves no state change behind (the transaction boundary
//! in [`crate::market`] guarantees the second half).
//!
//! Callers must not assume any side effect occurred on failure. There is no
//! retry inside the program; resubmitting is the caller's decision.

use thiserror::Error;

/// Errors returned by marketplace entry points.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MarketplaceError {
    /// The caller lacks the required role or token ownership.
    #[error("unauthorized: {caller} may not perform this operation")]
    Unauthorized {
        /// The identity that attempted the operation.
        caller: String,
    },

    /// The referenced entity does not exist.
    #[error("not found: {entity} {id}")]
    NotFound {
        /// What kind of entity was looked up ("artwork", "artist", "sale").
        entity: &'static str,
        /// The key that missed.
        id: String,
    },

    /// A parameter is malformed or out of range.
    #[error("invalid input: {reason}")]
    InvalidInput {
        /// What was wrong with it.
        reason: String,
    },

    /// The caller already has an artist record.
    #[error("already registered: {artist}")]
    AlreadyRegistered {
        /// The identity that tried to register twice.
        artist: String,
    },

    /// The artist already carries the verified badge.
    #[error("already verified: {artist}")]
    AlreadyVerified {
        /// The identity that tried to verify twice.
        artist: String,
    },

    /// The artwork is already listed for sale.
    #[error("already listed: token {token_id}")]
    AlreadyListed {
        /// The token in question.
        token_id: u64,
    },

    /// The artwork is not currently listed.
    #[error("not listed: token {token_id}")]
    NotListed {
        /// The token in question.
        token_id: u64,
    },

    /// The artwork is not available for purchase.
    #[error("not for sale: token {token_id}")]
    NotForSale {
        /// The token in question.
        token_id: u64,
    },

    /// The caller has no artist record.
    #[error("not registered: {caller}")]
    NotRegistered {
        /// The identity that needed to be registered first.
        caller: String,
    },

    /// The submitted value does not cover the requirement.
    #[error("insufficient payment: submitted {submitted}, required {required}")]
    InsufficientPayment {
        /// Value attached to the call.
        submitted: u64,
        /// Value the operation demands.
        required: u64,
    },

    /// The current owner tried to buy their own artwork.
    #[error("self purchase: {caller} already owns token {token_id}")]
    SelfPurchase {
        /// The owner-buyer.
        caller: String,
        /// The token they already hold.
        token_id: u64,
    },

    /// A guarded operation was invoked while another one was in flight.
    #[error("reentrant call rejected")]
    ReentrantCall,

    /// An outbound value transfer was rejected by its recipient, or the
    /// caller could not cover the value attached to the call.
    #[error("transfer failed: {amount} to {to}")]
    TransferFailed {
        /// Intended recipient of the leg.
        to: String,
        /// Amount that failed to move.
        amount: u64,
    },

    /// The program holds no balance to sweep.
    #[error("nothing to withdraw")]
    NothingToWithdraw,

    /// A price fell below [`crate::config::MIN_PRICE`].
    #[error("price too low: {price}, minimum {minimum}")]
    PriceTooLow {
        /// The offending price.
        price: u64,
        /// The floor it missed.
        minimum: u64,
    },

    /// A royalty percentage exceeded [`crate::config::MAX_ROYALTY_PERCENTAGE`].
    #[error("royalty too high: {royalty}%, maximum {maximum}%")]
    RoyaltyTooHigh {
        /// The offending percentage.
        royalty: u8,
        /// The ceiling it broke.
        maximum: u8,
    },

    /// Arithmetic overflow on a monetary or counter path. Reaching this
    /// means someone is moving more than u64::MAX base units; treat as an
    /// attack and revert.
    #[error("amount overflow")]
    AmountOverflow,
}
