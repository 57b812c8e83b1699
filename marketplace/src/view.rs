//! # Read Accessors
//!
//! The query surface. Nothing here mutates, nothing takes the lock, and
//! everything that names a specific entity misses with `NotFound`.

use serde::{Deserialize, Serialize};

use crate::error::MarketplaceError;
use crate::ledger::{Address, Artist, Artwork, Sale, SaleId, TokenId};
use crate::market::Marketplace;

/// Aggregate marketplace figures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketStats {
    /// Artworks ever minted.
    pub total_artworks: u64,
    /// Sales ever settled.
    pub total_sales: u64,
    /// Sum of all settled sale prices, in base units.
    pub total_volume: u64,
    /// Current platform fee, whole percent.
    pub platform_fee_percentage: u8,
    /// Value currently held by the program.
    pub held_balance: u64,
}

impl Marketplace {
    /// Full record of an artwork.
    ///
    /// # Errors
    ///
    /// [`MarketplaceError::NotFound`] for a token that was never minted.
    pub fn artwork(&self, token_id: TokenId) -> Result<&Artwork, MarketplaceError> {
        self.existing_artwork(token_id)
    }

    /// Full record of a registered artist.
    ///
    /// # Errors
    ///
    /// [`MarketplaceError::NotFound`] for an identity that never registered.
    pub fn artist(&self, identity: &str) -> Result<&Artist, MarketplaceError> {
        self.ledger.artist(identity).ok_or(MarketplaceError::NotFound {
            entity: "artist",
            id: identity.to_string(),
        })
    }

    /// Token ids an artist has minted, in mint order.
    ///
    /// # Errors
    ///
    /// [`MarketplaceError::NotFound`] for an identity that never registered.
    pub fn creations(&self, identity: &str) -> Result<&[TokenId], MarketplaceError> {
        self.artist(identity)?;
        Ok(self.ledger.creations(identity))
    }

    /// Token ids an identity has held, in acquisition order, duplicates
    /// preserved across re-acquisition. Empty for identities that never
    /// held anything; collecting does not require registration.
    pub fn collection(&self, identity: &str) -> &[TokenId] {
        self.ledger.collection(identity)
    }

    /// Chronological owner history of a token, the artist at index 0.
    ///
    /// # Errors
    ///
    /// [`MarketplaceError::NotFound`] for a token that was never minted.
    pub fn provenance(&self, token_id: TokenId) -> Result<&[Address], MarketplaceError> {
        self.existing_artwork(token_id)?;
        Ok(self.ledger.provenance(token_id))
    }

    /// One settled sale.
    ///
    /// # Errors
    ///
    /// [`MarketplaceError::NotFound`] for an id never recorded.
    pub fn sale(&self, sale_id: SaleId) -> Result<&Sale, MarketplaceError> {
        self.ledger.sale(sale_id).ok_or(MarketplaceError::NotFound {
            entity: "sale",
            id: sale_id.to_string(),
        })
    }

    /// Current owner of a token.
    ///
    /// # Errors
    ///
    /// [`MarketplaceError::NotFound`] for a token that was never minted.
    pub fn owner_of(&self, token_id: TokenId) -> Result<&str, MarketplaceError> {
        self.existing_artwork(token_id)?;
        self.ledger
            .owner_of(token_id)
            .map(String::as_str)
            .ok_or(MarketplaceError::NotFound {
                entity: "artwork",
                id: token_id.to_string(),
            })
    }

    /// Whether a token is currently listed for sale.
    ///
    /// # Errors
    ///
    /// [`MarketplaceError::NotFound`] for a token that was never minted.
    pub fn is_listed(&self, token_id: TokenId) -> Result<bool, MarketplaceError> {
        Ok(self.existing_artwork(token_id)?.is_listed)
    }

    /// Aggregate marketplace figures.
    pub fn stats(&self) -> MarketStats {
        MarketStats {
            total_artworks: self.ledger.artwork_count(),
            total_sales: self.ledger.sale_count(),
            total_volume: self.ledger.total_volume(),
            platform_fee_percentage: self.platform_fee_percentage(),
            held_balance: self.held_balance(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_entities_miss_with_not_found() {
        let market = Marketplace::new("admin");
        assert!(market.artwork(1).is_err());
        assert!(market.artist("ghost").is_err());
        assert!(market.creations("ghost").is_err());
        assert!(market.provenance(1).is_err());
        assert!(market.sale(1).is_err());
        assert!(market.owner_of(1).is_err());
        assert!(market.is_listed(1).is_err());
    }

    #[test]
    fn collection_of_unknown_identity_is_empty() {
        let market = Marketplace::new("admin");
        assert!(market.collection("ghost").is_empty());
    }

    #[test]
    fn stats_reflect_activity() {
        let mut market = Marketplace::new("admin");
        market.register("alice", "ipfs://alice").unwrap();
        market
            .mint("alice", "Dusk", "", "bafy-dusk", 100, 10)
            .unwrap();
        market.fund("bob", 500).unwrap();
        market.purchase("bob", 1, 100).unwrap();

        let stats = market.stats();
        assert_eq!(stats.total_artworks, 1);
        assert_eq!(stats.total_sales, 1);
        assert_eq!(stats.total_volume, 100);
        assert_eq!(stats.held_balance, 0);
    }

    #[test]
    fn stats_serialization_roundtrip() {
        let stats = Marketplace::new("admin").stats();
        let json = serde_json::to_string(&stats).expect("serialize");
        let restored: MarketStats = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(stats, restored);
    }
}
