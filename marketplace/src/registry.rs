//! # Artist Registry
//!
//! Registration and verification lifecycle. Registration is free, one-time,
//! and irrevocable; verification costs a flat fee and is a one-way upgrade
//! to the badge. Anyone registered may mint -- verification is a trust
//! signal, not a capability gate.

use tracing::{debug, info};

use crate::config;
use crate::error::MarketplaceError;
use crate::event::Event;
use crate::ledger::{Artist, ArtistStatus};
use crate::market::Marketplace;

impl Marketplace {
    /// Registers the caller as an artist.
    ///
    /// # Errors
    ///
    /// Returns [`MarketplaceError::AlreadyRegistered`] if the caller already
    /// has an artist record (registration cannot be repeated or undone), and
    /// [`MarketplaceError::InvalidInput`] if `profile_reference` is empty.
    pub fn register(
        &mut self,
        caller: &str,
        profile_reference: &str,
    ) -> Result<(), MarketplaceError> {
        self.transact(|m| {
            if m.ledger.artist(caller).is_some() {
                return Err(MarketplaceError::AlreadyRegistered {
                    artist: caller.to_string(),
                });
            }
            if profile_reference.is_empty() {
                return Err(MarketplaceError::InvalidInput {
                    reason: "profile reference must not be empty".into(),
                });
            }

            m.ledger.insert_artist(
                caller.to_string(),
                Artist {
                    status: ArtistStatus::Registered,
                    artworks_created: 0,
                    total_earnings: 0,
                    reputation: 0,
                    profile_reference: profile_reference.to_string(),
                    registered_at: chrono::Utc::now(),
                },
            );
            m.emit(Event::ArtistRegistered {
                artist: caller.to_string(),
                profile_reference: profile_reference.to_string(),
            });
            debug!(artist = caller, "artist registered");
            Ok(())
        })
    }

    /// Pays the verification fee and grants the caller the verified badge.
    ///
    /// The entire submitted value is forwarded to the admin. Overpayment is
    /// forfeited, not refunded -- unlike the purchase path, which refunds
    /// the excess. The asymmetry is inherited behavior, kept as is.
    ///
    /// Reentrancy-guarded: the forward to the admin is an outbound transfer.
    ///
    /// # Errors
    ///
    /// Returns [`MarketplaceError::NotRegistered`] for unknown callers,
    /// [`MarketplaceError::AlreadyVerified`] on a repeat,
    /// [`MarketplaceError::InsufficientPayment`] below the fee, and
    /// [`MarketplaceError::TransferFailed`] if the admin refuses the
    /// forward.
    pub fn verify(&mut self, caller: &str, value: u64) -> Result<(), MarketplaceError> {
        self.transact(|m| {
            m.guard.enter()?;
            let result = m.verify_locked(caller, value);
            m.guard.exit();
            result
        })
    }

    fn verify_locked(&mut self, caller: &str, value: u64) -> Result<(), MarketplaceError> {
        self.collect_value(caller, value)?;

        let artist = self
            .ledger
            .artist(caller)
            .ok_or(MarketplaceError::NotRegistered {
                caller: caller.to_string(),
            })?;
        if artist.status == ArtistStatus::Verified {
            return Err(MarketplaceError::AlreadyVerified {
                artist: caller.to_string(),
            });
        }
        if value < config::VERIFICATION_FEE {
            return Err(MarketplaceError::InsufficientPayment {
                submitted: value,
                required: config::VERIFICATION_FEE,
            });
        }

        // Forward everything that was submitted, excess included.
        let admin = self.admin().to_string();
        self.pay_out(&admin, value)?;

        self.ledger
            .artist_mut(caller)
            .ok_or(MarketplaceError::NotRegistered {
                caller: caller.to_string(),
            })?
            .status = ArtistStatus::Verified;

        self.emit(Event::ArtistVerified {
            artist: caller.to_string(),
            fee_paid: value,
        });
        info!(artist = caller, fee_paid = value, "artist verified");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bank::RecipientBehavior;

    fn market_with_artist(artist: &str) -> Marketplace {
        let mut market = Marketplace::new("admin");
        market.register(artist, "ipfs://profile").unwrap();
        market
    }

    #[test]
    fn register_creates_zeroed_record() {
        let market = market_with_artist("alice");
        let artist = market.artist("alice").unwrap();
        assert_eq!(artist.status, ArtistStatus::Registered);
        assert_eq!(artist.artworks_created, 0);
        assert_eq!(artist.total_earnings, 0);
        assert_eq!(artist.reputation, 0);
        assert_eq!(artist.profile_reference, "ipfs://profile");
    }

    #[test]
    fn register_twice_rejected() {
        let mut market = market_with_artist("alice");
        let result = market.register("alice", "ipfs://other");
        assert_eq!(
            result,
            Err(MarketplaceError::AlreadyRegistered {
                artist: "alice".into()
            })
        );
        // The original profile reference is untouched.
        assert_eq!(market.artist("alice").unwrap().profile_reference, "ipfs://profile");
    }

    #[test]
    fn register_empty_reference_rejected() {
        let mut market = Marketplace::new("admin");
        let result = market.register("alice", "");
        assert!(matches!(
            result,
            Err(MarketplaceError::InvalidInput { .. })
        ));
        assert!(market.artist("alice").is_err());
    }

    #[test]
    fn verify_grants_badge_and_pays_admin() {
        let mut market = market_with_artist("alice");
        market.fund("alice", 10_000).unwrap();

        market.verify("alice", config::VERIFICATION_FEE).unwrap();

        assert_eq!(market.artist("alice").unwrap().status, ArtistStatus::Verified);
        assert_eq!(market.balance_of("admin"), config::VERIFICATION_FEE);
        assert_eq!(market.balance_of("alice"), 10_000 - config::VERIFICATION_FEE);
        assert_eq!(market.held_balance(), 0);
    }

    #[test]
    fn verify_overpayment_is_forfeited() {
        let mut market = market_with_artist("alice");
        market.fund("alice", 10_000).unwrap();

        // 2_000 over the fee: all of it goes to the admin, none comes back.
        market.verify("alice", config::VERIFICATION_FEE + 2_000).unwrap();

        assert_eq!(market.balance_of("admin"), config::VERIFICATION_FEE + 2_000);
        assert_eq!(
            market.balance_of("alice"),
            10_000 - config::VERIFICATION_FEE - 2_000
        );
    }

    #[test]
    fn verify_unregistered_rejected() {
        let mut market = Marketplace::new("admin");
        market.fund("mallory", 10_000).unwrap();
        let result = market.verify("mallory", config::VERIFICATION_FEE);
        assert_eq!(
            result,
            Err(MarketplaceError::NotRegistered {
                caller: "mallory".into()
            })
        );
        // Rolled back: the submitted value is back with the caller.
        assert_eq!(market.balance_of("mallory"), 10_000);
        assert_eq!(market.held_balance(), 0);
    }

    #[test]
    fn verify_twice_rejected() {
        let mut market = market_with_artist("alice");
        market.fund("alice", 20_000).unwrap();
        market.verify("alice", config::VERIFICATION_FEE).unwrap();

        let result = market.verify("alice", config::VERIFICATION_FEE);
        assert_eq!(
            result,
            Err(MarketplaceError::AlreadyVerified {
                artist: "alice".into()
            })
        );
        // The second fee came back on rollback.
        assert_eq!(market.balance_of("admin"), config::VERIFICATION_FEE);
    }

    #[test]
    fn verify_below_fee_rejected() {
        let mut market = market_with_artist("alice");
        market.fund("alice", 10_000).unwrap();
        let result = market.verify("alice", config::VERIFICATION_FEE - 1);
        assert_eq!(
            result,
            Err(MarketplaceError::InsufficientPayment {
                submitted: config::VERIFICATION_FEE - 1,
                required: config::VERIFICATION_FEE,
            })
        );
        assert_eq!(market.artist("alice").unwrap().status, ArtistStatus::Registered);
        assert_eq!(market.balance_of("alice"), 10_000);
    }

    #[test]
    fn verify_admin_rejecting_forward_reverts() {
        let mut market = market_with_artist("alice");
        market.fund("alice", 10_000).unwrap();
        market.set_recipient_behavior("admin", RecipientBehavior::Reject);

        let result = market.verify("alice", config::VERIFICATION_FEE);
        assert!(matches!(
            result,
            Err(MarketplaceError::TransferFailed { .. })
        ));
        assert_eq!(market.artist("alice").unwrap().status, ArtistStatus::Registered);
        assert_eq!(market.balance_of("alice"), 10_000);
        assert_eq!(market.held_balance(), 0);
    }
}
