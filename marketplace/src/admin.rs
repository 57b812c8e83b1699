//! # Administrative Operations
//!
//! The three levers reserved for the administrator: the platform fee, the
//! sweep of the program-held balance, and handing the admin role itself to
//! another identity.
//!
//! The sweep takes the whole held balance, not a tracked fee accumulator.
//! Purchases pay the fee leg straight to the admin, so in normal operation
//! there is nothing here to sweep and the call fails with
//! `NothingToWithdraw`; the operation exists for value the host strands in
//! the program account. Anything sitting there gets swept along. Inherited
//! behavior, kept as is.

use tracing::info;

use crate::config;
use crate::error::MarketplaceError;
use crate::event::Event;
use crate::market::Marketplace;

impl Marketplace {
    /// Changes the platform fee, in whole percent.
    ///
    /// # Errors
    ///
    /// Returns [`MarketplaceError::Unauthorized`] for non-admin callers and
    /// [`MarketplaceError::InvalidInput`] above
    /// [`config::MAX_PLATFORM_FEE_PERCENTAGE`].
    pub fn set_platform_fee(&mut self, caller: &str, new_fee: u8) -> Result<(), MarketplaceError> {
        self.transact(|m| {
            m.ensure_admin(caller)?;
            if new_fee > config::MAX_PLATFORM_FEE_PERCENTAGE {
                return Err(MarketplaceError::InvalidInput {
                    reason: format!(
                        "platform fee {new_fee}% exceeds the {}% ceiling",
                        config::MAX_PLATFORM_FEE_PERCENTAGE
                    ),
                });
            }

            let old_fee = m.platform_fee_percentage;
            m.platform_fee_percentage = new_fee;
            m.emit(Event::PlatformFeeUpdated { old_fee, new_fee });
            info!(old_fee = old_fee, new_fee = new_fee, "platform fee updated");
            Ok(())
        })
    }

    /// Sweeps the entire program-held balance to the admin. Returns the
    /// amount swept. Reentrancy-guarded: the sweep is an outbound transfer.
    ///
    /// # Errors
    ///
    /// Returns [`MarketplaceError::Unauthorized`] for non-admin callers,
    /// [`MarketplaceError::NothingToWithdraw`] when the held balance is
    /// zero, and [`MarketplaceError::TransferFailed`] if the admin's own
    /// receive hook rejects the sweep.
    pub fn withdraw_platform_fees(&mut self, caller: &str) -> Result<u64, MarketplaceError> {
        self.transact(|m| {
            m.guard.enter()?;
            let result = m.withdraw_locked(caller);
            m.guard.exit();
            result
        })
    }

    fn withdraw_locked(&mut self, caller: &str) -> Result<u64, MarketplaceError> {
        self.ensure_admin(caller)?;

        let amount = self.bank.held_balance();
        if amount == 0 {
            return Err(MarketplaceError::NothingToWithdraw);
        }

        let admin = self.admin().to_string();
        self.pay_out(&admin, amount)?;
        self.emit(Event::FeesWithdrawn { amount });
        info!(amount = amount, "held balance swept to admin");
        Ok(amount)
    }

    /// Hands administrative control to `new_admin`.
    ///
    /// # Errors
    ///
    /// Returns [`MarketplaceError::Unauthorized`] for non-admin callers and
    /// [`MarketplaceError::InvalidInput`] for the null identity.
    pub fn transfer_admin(&mut self, caller: &str, new_admin: &str) -> Result<(), MarketplaceError> {
        self.transact(|m| {
            m.ensure_admin(caller)?;
            if new_admin.is_empty() {
                return Err(MarketplaceError::InvalidInput {
                    reason: "new admin must not be the null identity".into(),
                });
            }

            let old_admin = std::mem::replace(&mut m.admin, new_admin.to_string());
            m.emit(Event::AdminTransferred {
                old_admin,
                new_admin: new_admin.to_string(),
            });
            info!(new_admin = new_admin, "admin role transferred");
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
    use crate::bank::RecipientBehavior;

    #[test]
    fn set_platform_fee_within_ceiling() {
        let mut market = Marketplace::new("admin");
        market.set_platform_fee("admin", 5).unwrap();
        assert_eq!(market.platform_fee_percentage(), 5);

        market.set_platform_fee("admin", 0).unwrap();
        assert_eq!(market.platform_fee_percentage(), 0);

        market
            .set_platform_fee("admin", config::MAX_PLATFORM_FEE_PERCENTAGE)
            .unwrap();
    }

    #[test]
    fn set_platform_fee_above_ceiling_rejected() {
        let mut market = Marketplace::new("admin");
        let result = market.set_platform_fee("admin", config::MAX_PLATFORM_FEE_PERCENTAGE + 1);
        assert!(matches!(
            result,
            Err(MarketplaceError::InvalidInput { .. })
        ));
        assert_eq!(
            market.platform_fee_percentage(),
            config::DEFAULT_PLATFORM_FEE_PERCENTAGE
        );
    }

    #[test]
    fn set_platform_fee_requires_admin() {
        let mut market = Marketplace::new("admin");
        assert_eq!(
            market.set_platform_fee("mallory", 5),
            Err(MarketplaceError::Unauthorized {
                caller: "mallory".into()
            })
        );
    }

    #[test]
    fn withdraw_with_empty_held_balance_rejected() {
        let mut market = Marketplace::new("admin");
        assert_eq!(
            market.withdraw_platform_fees("admin"),
            Err(MarketplaceError::NothingToWithdraw)
        );
    }

    #[test]
    fn withdraw_sweeps_stranded_value() {
        let mut market = Marketplace::new("admin");
        market.bank.strand(750);

        let swept = market.withdraw_platform_fees("admin").unwrap();
        assert_eq!(swept, 750);
        assert_eq!(market.balance_of("admin"), 750);
        assert_eq!(market.held_balance(), 0);
        assert!(market.events().contains(&Event::FeesWithdrawn { amount: 750 }));
    }

    #[test]
    fn withdraw_requires_admin() {
        let mut market = Marketplace::new("admin");
        market.bank.strand(750);
        assert_eq!(
            market.withdraw_platform_fees("mallory"),
            Err(MarketplaceError::Unauthorized {
                caller: "mallory".into()
            })
        );
        assert_eq!(market.held_balance(), 750);
    }

    #[test]
    fn withdraw_rejected_by_admin_hook_reverts() {
        let mut market = Marketplace::new("admin");
        market.bank.strand(750);
        market.set_recipient_behavior("admin", RecipientBehavior::Reject);

        let result = market.withdraw_platform_fees("admin");
        assert!(matches!(
            result,
            Err(MarketplaceError::TransferFailed { .. })
        ));
        assert_eq!(market.held_balance(), 750);
        assert_eq!(market.balance_of("admin"), 0);
    }

    #[test]
    fn transfer_admin_moves_the_role() {
        let mut market = Marketplace::new("admin");
        market.transfer_admin("admin", "successor").unwrap();
        assert_eq!(market.admin(), "successor");

        // The new admin has the lever, the old one doesn't.
        assert!(market.set_platform_fee("successor", 3).is_ok());
        assert_eq!(
            market.set_platform_fee("admin", 3),
            Err(MarketplaceError::Unauthorized {
                caller: "admin".into()
            })
        );
    }

    #[test]
    fn transfer_admin_to_null_identity_rejected() {
        let mut market = Marketplace::new("admin");
        assert!(matches!(
            market.transfer_admin("admin", ""),
            Err(MarketplaceError::InvalidInput { .. })
        ));
        assert_eq!(market.admin(), "admin");
    }
}
