//! # Artwork Lifecycle
//!
//! Minting and the listing state: list, unlist, reprice. Pure state
//! mutations with no value transfer, so none of these take the reentrancy
//! lock. Minting is open to any registered artist; the verified badge is
//! not required to create.

use tracing::{debug, info};

use crate::config;
use crate::error::MarketplaceError;
use crate::event::Event;
use crate::ledger::{Artwork, TokenId};
use crate::market::Marketplace;

impl Marketplace {
    /// Mints a new artwork owned by the caller, immediately listed at
    /// `price`. Returns the assigned token id.
    ///
    /// The caller becomes both the immutable artist and the initial owner;
    /// their creation counter and reputation are bumped, and the token is
    /// wired into the creation, collection, and provenance indices.
    ///
    /// # Errors
    ///
    /// Returns [`MarketplaceError::NotRegistered`] for unknown callers,
    /// [`MarketplaceError::InvalidInput`] on an empty title or content
    /// hash, [`MarketplaceError::PriceTooLow`] below
    /// [`config::MIN_PRICE`], and [`MarketplaceError::RoyaltyTooHigh`]
    /// above [`config::MAX_ROYALTY_PERCENTAGE`].
    pub fn mint(
        &mut self,
        caller: &str,
        title: &str,
        description: &str,
        content_hash: &str,
        price: u64,
        royalty_percentage: u8,
    ) -> Result<TokenId, MarketplaceError> {
        self.transact(|m| {
            if m.ledger.artist(caller).is_none() {
                return Err(MarketplaceError::NotRegistered {
                    caller: caller.to_string(),
                });
            }
            if title.is_empty() {
                return Err(MarketplaceError::InvalidInput {
                    reason: "title must not be empty".into(),
                });
            }
            if content_hash.is_empty() {
                return Err(MarketplaceError::InvalidInput {
                    reason: "content hash must not be empty".into(),
                });
            }
            if price < config::MIN_PRICE {
                return Err(MarketplaceError::PriceTooLow {
                    price,
                    minimum: config::MIN_PRICE,
                });
            }
            if royalty_percentage > config::MAX_ROYALTY_PERCENTAGE {
                return Err(MarketplaceError::RoyaltyTooHigh {
                    royalty: royalty_percentage,
                    maximum: config::MAX_ROYALTY_PERCENTAGE,
                });
            }

            let token_id = m.ledger.allocate_token_id();
            m.ledger.insert_artwork(Artwork {
                token_id,
                artist: caller.to_string(),
                title: title.to_string(),
                description: description.to_string(),
                content_hash: content_hash.to_string(),
                price,
                royalty_percentage,
                is_listed: true,
                created_at: chrono::Utc::now(),
                sales_count: 0,
            });

            // The artist exists; checked above.
            if let Some(artist) = m.ledger.artist_mut(caller) {
                artist.artworks_created += 1;
                artist.reputation += config::MINT_REPUTATION_BONUS;
            }

            m.emit(Event::Minted {
                token_id,
                artist: caller.to_string(),
                price,
                royalty_percentage,
            });
            m.emit(Event::Listed { token_id, price });
            info!(
                token_id = token_id,
                artist = caller,
                price = price,
                royalty = royalty_percentage,
                "artwork minted"
            );
            Ok(token_id)
        })
    }

    /// Lists an owned artwork for sale at `price`.
    ///
    /// # Errors
    ///
    /// Returns [`MarketplaceError::NotFound`] / [`MarketplaceError::Unauthorized`]
    /// from the ownership check, [`MarketplaceError::AlreadyListed`] if
    /// already on the market, and [`MarketplaceError::PriceTooLow`] below
    /// the minimum.
    pub fn list(
        &mut self,
        caller: &str,
        token_id: TokenId,
        price: u64,
    ) -> Result<(), MarketplaceError> {
        self.transact(|m| {
            m.ensure_token_owner(caller, token_id)?;
            let artwork = m.existing_artwork(token_id)?;
            if artwork.is_listed {
                return Err(MarketplaceError::AlreadyListed { token_id });
            }
            if price < config::MIN_PRICE {
                return Err(MarketplaceError::PriceTooLow {
                    price,
                    minimum: config::MIN_PRICE,
                });
            }

            if let Some(artwork) = m.ledger.artwork_mut(token_id) {
                artwork.price = price;
                artwork.is_listed = true;
            }
            m.emit(Event::Listed { token_id, price });
            debug!(token_id = token_id, price = price, "artwork listed");
            Ok(())
        })
    }

    /// Takes an owned artwork off the market.
    ///
    /// # Errors
    ///
    /// Returns [`MarketplaceError::NotListed`] if it isn't on the market,
    /// plus the ownership-check failures.
    pub fn unlist(&mut self, caller: &str, token_id: TokenId) -> Result<(), MarketplaceError> {
        self.transact(|m| {
            m.ensure_token_owner(caller, token_id)?;
            let artwork = m.existing_artwork(token_id)?;
            if !artwork.is_listed {
                return Err(MarketplaceError::NotListed { token_id });
            }

            if let Some(artwork) = m.ledger.artwork_mut(token_id) {
                artwork.is_listed = false;
            }
            m.emit(Event::Unlisted { token_id });
            debug!(token_id = token_id, "artwork unlisted");
            Ok(())
        })
    }

    /// Changes the asking price of a currently listed artwork.
    ///
    /// # Errors
    ///
    /// Returns [`MarketplaceError::NotListed`] if the piece is off the
    /// market, [`MarketplaceError::PriceTooLow`] below the minimum, plus
    /// the ownership-check failures.
    pub fn update_price(
        &mut self,
        caller: &str,
        token_id: TokenId,
        new_price: u64,
    ) -> Result<(), MarketplaceError> {
        self.transact(|m| {
            m.ensure_token_owner(caller, token_id)?;
            let artwork = m.existing_artwork(token_id)?;
            if !artwork.is_listed {
                return Err(MarketplaceError::NotListed { token_id });
            }
            if new_price < config::MIN_PRICE {
                return Err(MarketplaceError::PriceTooLow {
                    price: new_price,
                    minimum: config::MIN_PRICE,
                });
            }

            let old_price = artwork.price;
            if let Some(artwork) = m.ledger.artwork_mut(token_id) {
                artwork.price = new_price;
            }
            m.emit(Event::PriceUpdated {
                token_id,
                old_price,
                new_price,
            });
            debug!(
                token_id = token_id,
                old_price = old_price,
                new_price = new_price,
                "price updated"
            );
            Ok(())
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::ArtistStatus;

    fn market_with_artist(artist: &str) -> Marketplace {
        let mut market = Marketplace::new("admin");
        market.register(artist, "ipfs://profile").unwrap();
        market
    }

    fn mint_default(market: &mut Marketplace, artist: &str) -> TokenId {
        market
            .mint(artist, "Dusk", "Oil on canvas", "bafy-dusk", 100, 10)
            .unwrap()
    }

    #[test]
    fn mint_assigns_sequential_ids() {
        let mut market = market_with_artist("alice");
        market.register("bob", "ipfs://bob").unwrap();

        assert_eq!(mint_default(&mut market, "alice"), 1);
        assert_eq!(mint_default(&mut market, "bob"), 2);
        assert_eq!(mint_default(&mut market, "alice"), 3);
    }

    #[test]
    fn mint_sets_artist_as_owner() {
        let mut market = market_with_artist("alice");
        let id = mint_default(&mut market, "alice");

        let artwork = market.artwork(id).unwrap();
        assert_eq!(artwork.artist, "alice");
        assert!(artwork.is_listed);
        assert_eq!(artwork.sales_count, 0);
        assert_eq!(market.owner_of(id).unwrap(), "alice");
        assert_eq!(market.provenance(id).unwrap(), &["alice".to_string()]);
    }

    #[test]
    fn mint_bumps_creation_counter_and_reputation() {
        let mut market = market_with_artist("alice");
        mint_default(&mut market, "alice");
        mint_default(&mut market, "alice");

        let artist = market.artist("alice").unwrap();
        assert_eq!(artist.artworks_created, 2);
        assert_eq!(artist.reputation, 2 * config::MINT_REPUTATION_BONUS);
    }

    #[test]
    fn unverified_artist_can_mint() {
        let mut market = market_with_artist("alice");
        assert_eq!(market.artist("alice").unwrap().status, ArtistStatus::Registered);
        assert!(market.mint("alice", "Dawn", "", "bafy-dawn", 100, 0).is_ok());
    }

    #[test]
    fn mint_unregistered_rejected() {
        let mut market = Marketplace::new("admin");
        let result = market.mint("mallory", "Fake", "", "bafy-fake", 100, 10);
        assert_eq!(
            result,
            Err(MarketplaceError::NotRegistered {
                caller: "mallory".into()
            })
        );
    }

    #[test]
    fn mint_validation_rejects_bad_parameters() {
        let mut market = market_with_artist("alice");

        assert!(matches!(
            market.mint("alice", "", "", "bafy", 100, 10),
            Err(MarketplaceError::InvalidInput { .. })
        ));
        assert!(matches!(
            market.mint("alice", "Dusk", "", "", 100, 10),
            Err(MarketplaceError::InvalidInput { .. })
        ));
        assert_eq!(
            market.mint("alice", "Dusk", "", "bafy", config::MIN_PRICE - 1, 10),
            Err(MarketplaceError::PriceTooLow {
                price: config::MIN_PRICE - 1,
                minimum: config::MIN_PRICE,
            })
        );
        assert_eq!(
            market.mint("alice", "Dusk", "", "bafy", 100, config::MAX_ROYALTY_PERCENTAGE + 1),
            Err(MarketplaceError::RoyaltyTooHigh {
                royalty: config::MAX_ROYALTY_PERCENTAGE + 1,
                maximum: config::MAX_ROYALTY_PERCENTAGE,
            })
        );

        // Nothing was minted along the way.
        assert!(market.artwork(1).is_err());
        assert_eq!(market.artist("alice").unwrap().artworks_created, 0);
    }

    #[test]
    fn list_already_listed_rejected() {
        let mut market = market_with_artist("alice");
        let id = mint_default(&mut market, "alice");
        // Minting lists the piece.
        assert_eq!(
            market.list("alice", id, 200),
            Err(MarketplaceError::AlreadyListed { token_id: id })
        );
    }

    #[test]
    fn unlist_then_relist() {
        let mut market = market_with_artist("alice");
        let id = mint_default(&mut market, "alice");

        market.unlist("alice", id).unwrap();
        assert!(!market.is_listed(id).unwrap());

        market.list("alice", id, 250).unwrap();
        let artwork = market.artwork(id).unwrap();
        assert!(artwork.is_listed);
        assert_eq!(artwork.price, 250);
    }

    #[test]
    fn unlist_not_listed_rejected() {
        let mut market = market_with_artist("alice");
        let id = mint_default(&mut market, "alice");
        market.unlist("alice", id).unwrap();
        assert_eq!(
            market.unlist("alice", id),
            Err(MarketplaceError::NotListed { token_id: id })
        );
    }

    #[test]
    fn lifecycle_requires_token_owner() {
        let mut market = market_with_artist("alice");
        let id = mint_default(&mut market, "alice");

        for result in [
            market.list("bob", id, 200),
            market.unlist("bob", id),
            market.update_price("bob", id, 200),
        ] {
            assert_eq!(
                result,
                Err(MarketplaceError::Unauthorized {
                    caller: "bob".into()
                })
            );
        }
    }

    #[test]
    fn lifecycle_missing_token_is_not_found() {
        let mut market = market_with_artist("alice");
        assert!(matches!(
            market.list("alice", 42, 200),
            Err(MarketplaceError::NotFound { .. })
        ));
        assert!(matches!(
            market.unlist("alice", 42),
            Err(MarketplaceError::NotFound { .. })
        ));
    }

    #[test]
    fn update_price_requires_listing() {
        let mut market = market_with_artist("alice");
        let id = mint_default(&mut market, "alice");
        market.unlist("alice", id).unwrap();

        assert_eq!(
            market.update_price("alice", id, 300),
            Err(MarketplaceError::NotListed { token_id: id })
        );
    }

    #[test]
    fn update_price_below_minimum_rejected() {
        let mut market = market_with_artist("alice");
        let id = mint_default(&mut market, "alice");
        assert!(matches!(
            market.update_price("alice", id, config::MIN_PRICE - 1),
            Err(MarketplaceError::PriceTooLow { .. })
        ));
        // Price unchanged.
        assert_eq!(market.artwork(id).unwrap().price, 100);
    }

    #[test]
    fn update_price_emits_old_and_new() {
        let mut market = market_with_artist("alice");
        let id = mint_default(&mut market, "alice");
        market.update_price("alice", id, 500).unwrap();

        assert!(market.events().contains(&Event::PriceUpdated {
            token_id: id,
            old_price: 100,
            new_price: 500,
        }));
    }
}
