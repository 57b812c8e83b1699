//! # Reentrancy Guard
//!
//! A single program-wide lock flag. Every operation that performs an
//! outbound value transfer takes the lock before touching anything and
//! drops it on every exit path, success or failure. Outbound transfers hand
//! control to externally-controlled code, and that code re-invoking an
//! entry point mid-flight is the one concurrency hazard this program has.
//!
//! Coarse on purpose: one flag for the whole program, not per-resource.

use serde::{Deserialize, Serialize};

use crate::error::MarketplaceError;

/// The in-flight flag for guarded operations.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct ReentrancyGuard {
    locked: bool,
}

impl ReentrancyGuard {
    /// Takes the lock.
    ///
    /// # Errors
    ///
    /// Returns [`MarketplaceError::ReentrantCall`] if a guarded operation
    /// is already in flight.
    pub(crate) fn enter(&mut self) -> Result<(), MarketplaceError> {
        if self.locked {
            return Err(MarketplaceError::ReentrantCall);
        }
        self.locked = true;
        Ok(())
    }

    /// Drops the lock. Must run on every exit path of a guarded operation.
    pub(crate) fn exit(&mut self) {
        self.locked = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enter_twice_rejected() {
        let mut guard = ReentrancyGuard::default();
        guard.enter().unwrap();
        assert_eq!(guard.enter(), Err(MarketplaceError::ReentrantCall));
    }

    #[test]
    fn exit_releases_the_lock() {
        let mut guard = ReentrancyGuard::default();
        guard.enter().unwrap();
        guard.exit();
        assert!(guard.enter().is_ok());
    }
}
