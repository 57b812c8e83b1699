//! # Atelier Marketplace
//!
//! The on-chain half of Atelier: one program that mints art, tracks who
//! made it and who holds it, and settles sales with creator royalties
//! baked in. The interesting part is not the art, it's the money: several
//! outbound transfers per sale, each one handing control to code we don't
//! own, on a ledger where half the callers are adversarial on a good day.
//!
//! ## Architecture
//!
//! The program is a single state machine behind atomic entry points:
//!
//! - **ledger** -- the mapping tables: artworks, artists, sales, ownership
//!   and provenance indices. Dumb on purpose.
//! - **bank** -- the host value environment: balances, the program-held
//!   balance, and recipient receive hooks (the adversarial bit).
//! - **guard** -- one reentrancy flag for the whole program.
//! - **market** -- the aggregate and its transaction boundary; every entry
//!   point commits everything or nothing.
//! - **registry / lifecycle / settlement / admin / view** -- the entry
//!   points themselves, one module per concern.
//!
//! ## Design Philosophy
//!
//! 1. All monetary operations check for overflow; wrapping arithmetic and
//!    money do not mix.
//! 2. State transitions are explicit enum variants, not boolean flags.
//! 3. Failed operations leave nothing behind: no table rows, no balance
//!    moves, no events. Callers see one error and an untouched ledger.
//! 4. If it touches money, it has tests. Plural.

pub mod admin;
pub mod bank;
pub mod config;
pub mod error;
pub mod event;
pub mod guard;
pub mod ledger;
pub mod lifecycle;
pub mod market;
pub mod registry;
pub mod settlement;
pub mod view;

pub use bank::{Bank, RecipientBehavior, PROGRAM_ACCOUNT};
pub use error::MarketplaceError;
pub use event::Event;
pub use ledger::{Address, Artist, ArtistStatus, Artwork, Sale, SaleId, TokenId};
pub use market::{Call, Marketplace};
pub use settlement::{split_payment, PaymentSplit};
pub use view::MarketStats;
