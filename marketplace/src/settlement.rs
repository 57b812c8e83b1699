//! # Settlement Engine
//!
//! Purchase execution: fee and royalty computation, the payment legs,
//! ownership transfer, sale recording, and the overpayment refund. This is
//! the one place where several outbound transfers have to land in sequence,
//! so the whole operation runs under the reentrancy lock and inside the
//! transaction boundary: any failed leg, including the refund, unwinds
//! everything.
//!
//! ## Split Arithmetic
//!
//! Fees are whole-percent integer math with truncating division. For small
//! prices the truncated legs do not add up to the price on their own; the
//! seller amount is defined by subtraction, so the three legs always
//! reconcile exactly: `seller + fee + royalty == price`. What truncation
//! actually shaves off lands with the seller, not the platform.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config;
use crate::error::MarketplaceError;
use crate::event::Event;
use crate::ledger::{SaleId, TokenId};
use crate::market::Marketplace;

// ---------------------------------------------------------------------------
// Payment Split
// ---------------------------------------------------------------------------

/// How one sale's price divides across the three legs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentSplit {
    /// Platform's cut, `price * fee% / 100`, truncated.
    pub platform_fee: u64,
    /// Original artist's cut on a secondary sale, `price * royalty% / 100`,
    /// truncated. Zero on a primary sale.
    pub royalty_fee: u64,
    /// What the seller keeps: the price minus the other two legs.
    pub seller_amount: u64,
}

/// Splits `price` into platform fee, royalty, and seller legs.
///
/// Primary sales (`is_secondary == false`) pay no royalty regardless of the
/// artwork's royalty percentage. Both percentage cuts truncate toward zero.
///
/// # Errors
///
/// Returns [`MarketplaceError::AmountOverflow`] if a percentage product
/// exceeds `u64::MAX` before division.
pub fn split_payment(
    price: u64,
    platform_fee_percentage: u8,
    royalty_percentage: u8,
    is_secondary: bool,
) -> Result<PaymentSplit, MarketplaceError> {
    let percentage_of = |percent: u8| -> Result<u64, MarketplaceError> {
        Ok(price
            .checked_mul(u64::from(percent))
            .ok_or(MarketplaceError::AmountOverflow)?
            / 100)
    };

    let platform_fee = percentage_of(platform_fee_percentage)?;
    let royalty_fee = if is_secondary {
        percentage_of(royalty_percentage)?
    } else {
        0
    };
    let seller_amount = price
        .checked_sub(platform_fee)
        .and_then(|rest| rest.checked_sub(royalty_fee))
        .ok_or(MarketplaceError::AmountOverflow)?;

    Ok(PaymentSplit {
        platform_fee,
        royalty_fee,
        seller_amount,
    })
}

// ---------------------------------------------------------------------------
// Purchase
// ---------------------------------------------------------------------------

impl Marketplace {
    /// Buys a listed artwork for its asking price, attaching `value`.
    /// Returns the id of the recorded sale.
    ///
    /// Whether this is the primary sale is decided solely by the artwork's
    /// completed-sales counter. On a secondary sale the original artist is
    /// paid the royalty; on the primary sale the artist is the seller and
    /// their earnings are credited with the seller amount. Overpayment
    /// beyond the asking price is refunded to the buyer, and the legs are
    /// computed from the price, never from the submitted value.
    ///
    /// All payment legs, the ownership flip, the listing flip, and the sale
    /// record commit together or not at all.
    ///
    /// # Errors
    ///
    /// Returns [`MarketplaceError::NotFound`] for an unknown token,
    /// [`MarketplaceError::NotForSale`] if unlisted,
    /// [`MarketplaceError::SelfPurchase`] when the owner bids on their own
    /// piece, [`MarketplaceError::InsufficientPayment`] below the asking
    /// price, and [`MarketplaceError::TransferFailed`] when any leg or the
    /// refund is rejected.
    pub fn purchase(
        &mut self,
        buyer: &str,
        token_id: TokenId,
        value: u64,
    ) -> Result<SaleId, MarketplaceError> {
        self.transact(|m| {
            m.guard.enter()?;
            let result = m.purchase_locked(buyer, token_id, value);
            m.guard.exit();
            result
        })
    }

    fn purchase_locked(
        &mut self,
        buyer: &str,
        token_id: TokenId,
        value: u64,
    ) -> Result<SaleId, MarketplaceError> {
        self.collect_value(buyer, value)?;

        let artwork = self.existing_artwork(token_id)?;
        if !artwork.is_listed {
            return Err(MarketplaceError::NotForSale { token_id });
        }
        let price = artwork.price;
        let artist = artwork.artist.clone();
        let royalty_percentage = artwork.royalty_percentage;
        let is_secondary = artwork.sales_count > 0;

        let seller = self
            .ledger
            .owner_of(token_id)
            .cloned()
            .ok_or(MarketplaceError::NotFound {
                entity: "artwork",
                id: token_id.to_string(),
            })?;
        if seller == buyer {
            return Err(MarketplaceError::SelfPurchase {
                caller: buyer.to_string(),
                token_id,
            });
        }
        if value < price {
            return Err(MarketplaceError::InsufficientPayment {
                submitted: value,
                required: price,
            });
        }

        let split = split_payment(
            price,
            self.platform_fee_percentage(),
            royalty_percentage,
            is_secondary,
        )?;

        // Royalty leg: secondary sales only, paid to the original artist,
        // who is not necessarily (and after the primary sale, never) the
        // seller.
        if split.royalty_fee > 0 {
            self.pay_out(&artist, split.royalty_fee)?;
            self.credit_earnings(&artist, split.royalty_fee)?;
            self.emit(Event::RoyaltyPaid {
                token_id,
                artist: artist.clone(),
                amount: split.royalty_fee,
            });
        }

        // Seller leg, then the platform's cut to the admin.
        self.pay_out(&seller, split.seller_amount)?;
        let admin = self.admin().to_string();
        self.pay_out(&admin, split.platform_fee)?;

        // On the primary sale the artist is the seller; the seller amount
        // is what they earned.
        if !is_secondary {
            self.credit_earnings(&artist, split.seller_amount)?;
        }

        // Ownership, listing state, counters.
        self.ledger.transfer_ownership(token_id, buyer.to_string());
        if let Some(artwork) = self.ledger.artwork_mut(token_id) {
            artwork.is_listed = false;
            artwork.sales_count += 1;
        }
        if let Some(artist_record) = self.ledger.artist_mut(&artist) {
            artist_record.reputation += config::SALE_REPUTATION_BONUS;
        }

        let sale_id =
            self.ledger
                .record_sale(token_id, seller.clone(), buyer.to_string(), price, is_secondary)?;
        self.emit(Event::Purchased {
            sale_id,
            token_id,
            seller,
            buyer: buyer.to_string(),
            price,
            is_secondary_sale: is_secondary,
        });

        // Refund the excess, if any. The legs above were computed from the
        // price; the buyer gets back exactly what they oversent.
        let excess = value - price;
        if excess > 0 {
            self.pay_out(buyer, excess)?;
            self.emit(Event::Refunded {
                buyer: buyer.to_string(),
                amount: excess,
            });
        }

        info!(
            sale_id = sale_id,
            token_id = token_id,
            buyer = buyer,
            price = price,
            secondary = is_secondary,
            "purchase settled"
        );
        Ok(sale_id)
    }

    /// Adds to an artist's cumulative earnings.
    fn credit_earnings(&mut self, artist: &str, amount: u64) -> Result<(), MarketplaceError> {
        if let Some(record) = self.ledger.artist_mut(artist) {
            record.total_earnings = record
                .total_earnings
                .checked_add(amount)
                .ok_or(MarketplaceError::AmountOverflow)?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
