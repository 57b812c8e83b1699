//! # Ledger Storage
//!
//! The authoritative mapping tables for the marketplace: artworks, artists,
//! sales, and the ownership indices. This module is deliberately dumb -- it
//! stores, indexes, and counts, and leaves every business rule to the
//! operation modules. Flat keyed lookups only; if you find yourself wanting
//! a join, you're holding it wrong.
//!
//! ## Index Semantics
//!
//! - `owner_of` holds the single current owner per token and is overwritten
//!   on transfer.
//! - `created_by` and `collection` are append-only. `collection` keeps a
//!   duplicate entry when an identity re-acquires a token it once sold;
//!   that history is the point, so it is not deduplicated.
//! - `provenance` is the chronological list of every owner a token has had,
//!   with the artist at index 0.
//! - The sales table is an append-only historical log. Nothing in it is
//!   ever mutated or deleted.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config;
use crate::error::MarketplaceError;

/// An externally-controlled account reference, used for authorization and
/// as the key of every per-identity table. Hex-encoded key material by
/// convention; the ledger treats it as opaque. The empty string is the null
/// identity and never owns anything.
pub type Address = String;

/// Identifier of an artwork. Monotonic from [`config::FIRST_TOKEN_ID`],
/// dense, never reused.
pub type TokenId = u64;

/// Identifier of a sale record. Monotonic from [`config::FIRST_SALE_ID`].
pub type SaleId = u64;

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// Registration lifecycle of an artist.
///
/// Registration is a one-time, irrevocable act per identity; verification is
/// a one-way upgrade. There is no unregistered-but-known state and no way
/// back down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArtistStatus {
    /// Registered, not yet verified. May mint and sell.
    Registered,
    /// Paid the verification fee and carries the badge.
    Verified,
}

impl std::fmt::Display for ArtistStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ArtistStatus::Registered => write!(f, "Registered"),
            ArtistStatus::Verified => write!(f, "Verified"),
        }
    }
}

/// A minted artwork.
///
/// Presence in the artworks table is existence: tokens are never burned, so
/// the table is append-only and a missing key means the id was never minted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artwork {
    /// This artwork's token id.
    pub token_id: TokenId,
    /// The creator. Immutable; distinct from the current owner once the
    /// piece has sold.
    pub artist: Address,
    /// Title of the piece.
    pub title: String,
    /// Free-form description.
    pub description: String,
    /// Opaque content-addressed reference to the off-chain asset. The
    /// marketplace never fetches or validates it.
    pub content_hash: String,
    /// Current asking price in base units. Meaningful while listed.
    pub price: u64,
    /// Creator royalty in whole percent, `0..=30`. Fixed at mint.
    pub royalty_percentage: u8,
    /// Whether the piece is currently available for purchase.
    pub is_listed: bool,
    /// When the piece was minted.
    pub created_at: DateTime<Utc>,
    /// Completed sales of this token. Zero means the primary sale has not
    /// happened yet; that boundary decides whether a royalty leg is paid.
    pub sales_count: u64,
}

/// A registered artist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artist {
    /// Registration lifecycle state.
    pub status: ArtistStatus,
    /// Number of artworks this identity has minted.
    pub artworks_created: u64,
    /// Cumulative value credited to this artist from primary sales and
    /// royalties, in base units. Monotonically increasing.
    pub total_earnings: u64,
    /// Reputation score. Monotonically increasing.
    pub reputation: u64,
    /// Opaque off-chain profile pointer, set once at registration.
    pub profile_reference: String,
    /// When the artist registered.
    pub registered_at: DateTime<Utc>,
}

/// An immutable record of one completed sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sale {
    /// This record's id.
    pub sale_id: SaleId,
    /// The token that changed hands.
    pub token_id: TokenId,
    /// Owner before the sale.
    pub seller: Address,
    /// Owner after the sale.
    pub buyer: Address,
    /// The settled price in base units.
    pub price: u64,
    /// When settlement committed.
    pub timestamp: DateTime<Utc>,
    /// Whether a royalty leg was paid (false exactly for the primary sale).
    pub is_secondary_sale: bool,
}

// ---------------------------------------------------------------------------
// Ledger
// ---------------------------------------------------------------------------

/// The marketplace's mapping tables and side indices.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ledger {
    /// Artworks keyed by token id. Append-only.
    artworks: HashMap<TokenId, Artwork>,
    /// Artists keyed by identity.
    artists: HashMap<Address, Artist>,
    /// Historical sales keyed by sale id. Append-only.
    sales: HashMap<SaleId, Sale>,
    /// Current owner per token.
    owner_of: HashMap<TokenId, Address>,
    /// Token ids each identity has minted. Append-only.
    created_by: HashMap<Address, Vec<TokenId>>,
    /// Token ids each identity has held, in acquisition order. Append-only,
    /// duplicates preserved across re-acquisition.
    collection: HashMap<Address, Vec<TokenId>>,
    /// Chronological owner history per token, artist first.
    provenance: HashMap<TokenId, Vec<Address>>,
    /// Next token id to assign.
    next_token_id: TokenId,
    /// Next sale id to assign.
    next_sale_id: SaleId,
    /// Sum of all settled sale prices, in base units.
    total_volume: u64,
}

impl Ledger {
    /// Creates an empty ledger with counters at their starting ids.
    pub fn new() -> Self {
        Self {
            artworks: HashMap::new(),
            artists: HashMap::new(),
            sales: HashMap::new(),
            owner_of: HashMap::new(),
            created_by: HashMap::new(),
            collection: HashMap::new(),
            provenance: HashMap::new(),
            next_token_id: config::FIRST_TOKEN_ID,
            next_sale_id: config::FIRST_SALE_ID,
            total_volume: 0,
        }
    }

    // -- artworks ----------------------------------------------------------

    /// Hands out the next token id. Ids are dense: every id returned here is
    /// immediately used by the caller, inside the same transaction boundary.
    pub fn allocate_token_id(&mut self) -> TokenId {
        let id = self.next_token_id;
        self.next_token_id += 1;
        id
    }

    /// Inserts a freshly minted artwork and wires up its initial indices:
    /// the artist becomes the current owner, the first collection entry,
    /// and provenance index 0.
    pub fn insert_artwork(&mut self, artwork: Artwork) {
        let token_id = artwork.token_id;
        let artist = artwork.artist.clone();

        self.owner_of.insert(token_id, artist.clone());
        self.created_by
            .entry(artist.clone())
            .or_default()
            .push(token_id);
        self.collection
            .entry(artist.clone())
            .or_default()
            .push(token_id);
        self.provenance.entry(token_id).or_default().push(artist);
        self.artworks.insert(token_id, artwork);
    }

    /// Looks up an artwork.
    pub fn artwork(&self, token_id: TokenId) -> Option<&Artwork> {
        self.artworks.get(&token_id)
    }

    /// Mutable artwork lookup.
    pub fn artwork_mut(&mut self, token_id: TokenId) -> Option<&mut Artwork> {
        self.artworks.get_mut(&token_id)
    }

    /// Number of artworks ever minted.
    pub fn artwork_count(&self) -> u64 {
        self.artworks.len() as u64
    }

    // -- artists -----------------------------------------------------------

    /// Inserts a new artist record.
    pub fn insert_artist(&mut self, identity: Address, artist: Artist) {
        self.artists.insert(identity, artist);
    }

    /// Looks up an artist.
    pub fn artist(&self, identity: &str) -> Option<&Artist> {
        self.artists.get(identity)
    }

    /// Mutable artist lookup.
    pub fn artist_mut(&mut self, identity: &str) -> Option<&mut Artist> {
        self.artists.get_mut(identity)
    }

    // -- ownership ---------------------------------------------------------

    /// Current owner of a token, if it exists.
    pub fn owner_of(&self, token_id: TokenId) -> Option<&Address> {
        self.owner_of.get(&token_id)
    }

    /// Moves current ownership to `new_owner` and appends the acquisition
    /// to the buyer's collection and the token's provenance.
    pub fn transfer_ownership(&mut self, token_id: TokenId, new_owner: Address) {
        self.owner_of.insert(token_id, new_owner.clone());
        self.collection
            .entry(new_owner.clone())
            .or_default()
            .push(token_id);
        self.provenance
            .entry(token_id)
            .or_default()
            .push(new_owner);
    }

    /// Token ids minted by an identity, in mint order.
    pub fn creations(&self, identity: &str) -> &[TokenId] {
        self.created_by.get(identity).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Token ids an identity has held, in acquisition order.
    pub fn collection(&self, identity: &str) -> &[TokenId] {
        self.collection.get(identity).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Chronological owner history of a token, artist first. Empty for a
    /// token that was never minted.
    pub fn provenance(&self, token_id: TokenId) -> &[Address] {
        self.provenance
            .get(&token_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    // -- sales -------------------------------------------------------------

    /// Appends a sale record and folds the price into total volume.
    ///
    /// # Errors
    ///
    /// Returns [`MarketplaceError::AmountOverflow`] if total volume would
    /// exceed `u64::MAX`.
    pub fn record_sale(
        &mut self,
        token_id: TokenId,
        seller: Address,
        buyer: Address,
        price: u64,
        is_secondary_sale: bool,
    ) -> Result<SaleId, MarketplaceError> {
        let new_volume = self
            .total_volume
            .checked_add(price)
            .ok_or(MarketplaceError::AmountOverflow)?;

        let sale_id = self.next_sale_id;
        self.next_sale_id += 1;

        self.sales.insert(
            sale_id,
            Sale {
                sale_id,
                token_id,
                seller,
                buyer,
                price,
                timestamp: Utc::now(),
                is_secondary_sale,
            },
        );
        self.total_volume = new_volume;

        Ok(sale_id)
    }

    /// Looks up a sale record.
    pub fn sale(&self, sale_id: SaleId) -> Option<&Sale> {
        self.sales.get(&sale_id)
    }

    /// Number of sales ever recorded.
    pub fn sale_count(&self) -> u64 {
        self.sales.len() as u64
    }

    /// Sum of all settled sale prices.
    pub fn total_volume(&self) -> u64 {
        self.total_volume
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
