//! # Marketplace Configuration & Constants
//!
//! Every magic number in the marketplace lives here. If you're hardcoding a
//! constant somewhere else, you're doing it wrong and you owe the team coffee.
//!
//! Amounts are denominated in base units (the smallest indivisible unit of
//! the host ledger's native token). Percentages are whole percents, not basis
//! points; the original fee schedule was drawn up by humans, for humans.

// ---------------------------------------------------------------------------
// Pricing
// ---------------------------------------------------------------------------

/// The smallest price an artwork may ever be listed at, in base units.
///
/// Listing below this is rejected at mint, list, and price-update time.
/// Keeps dust listings out of the order flow.
pub const MIN_PRICE: u64 = 100;

// ---------------------------------------------------------------------------
// Fees & Royalties
// ---------------------------------------------------------------------------

/// Platform fee applied to every sale, in whole percent, unless the admin
/// has changed it. 2% is the launch schedule.
pub const DEFAULT_PLATFORM_FEE_PERCENTAGE: u8 = 2;

/// Hard ceiling on the platform fee. The admin can move the fee anywhere
/// in `[0, 10]`; anything above is rejected no matter who asks.
pub const MAX_PLATFORM_FEE_PERCENTAGE: u8 = 10;

/// Hard ceiling on the creator royalty, in whole percent. Fixed per artwork
/// at mint time and immutable for the life of the token.
pub const MAX_ROYALTY_PERCENTAGE: u8 = 30;

/// Flat fee an artist pays to get the verified badge, in base units.
///
/// The entire submitted value is forwarded to the admin. Overpayment is
/// forfeited, not refunded; see [`crate::registry`] for the gory details.
pub const VERIFICATION_FEE: u64 = 5_000;

// ---------------------------------------------------------------------------
// Reputation
// ---------------------------------------------------------------------------

/// Reputation points an artist earns for each artwork they mint.
pub const MINT_REPUTATION_BONUS: u64 = 10;

/// Reputation points an artist earns each time one of their artworks sells,
/// primary and secondary sales alike.
pub const SALE_REPUTATION_BONUS: u64 = 5;

// ---------------------------------------------------------------------------
// Token Space
// ---------------------------------------------------------------------------

/// The first token id ever assigned. Ids are dense and gapless from here;
/// id 0 is reserved as "never a token".
pub const FIRST_TOKEN_ID: u64 = 1;

/// The first sale id ever assigned. Same deal as token ids.
pub const FIRST_SALE_ID: u64 = 1;
