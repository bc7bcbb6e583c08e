//! Running record of claimed pins.

use std::collections::BTreeMap;

use ecpsoc_catalog::PinBinding;

use crate::error::ComposeError;

/// Pins claimed so far, each with its first claimant.
#[derive(Debug, Default)]
pub(crate) struct PinLedger {
    claims: BTreeMap<String, String>,
}

impl PinLedger {
    /// Claims `pin` for `claimant`, failing if it is already taken.
    pub(crate) fn claim(&mut self, pin: &str, claimant: String) -> Result<(), ComposeError> {
        if let Some(first) = self.claims.get(pin) {
            return Err(ComposeError::PinConflict {
                pin: pin.to_string(),
                first: first.clone(),
                second: claimant,
            });
        }
        self.claims.insert(pin.to_string(), claimant);
        Ok(())
    }

    /// Claims every binding of `instance`.
    ///
    /// Checks the whole set before recording any of it, so a failed claim
    /// leaves the ledger unchanged.
    pub(crate) fn claim_all(
        &mut self,
        instance: &str,
        bindings: &[PinBinding],
    ) -> Result<(), ComposeError> {
        let mut pending: BTreeMap<&str, String> = BTreeMap::new();
        for binding in bindings {
            let claimant = format!("{instance}.{}", binding.signal);
            let earlier = self
                .claims
                .get(binding.pin.as_str())
                .or_else(|| pending.get(binding.pin.as_str()));
            if let Some(first) = earlier {
                return Err(ComposeError::PinConflict {
                    pin: binding.pin.clone(),
                    first: first.clone(),
                    second: claimant,
                });
            }
            pending.insert(binding.pin.as_str(), claimant);
        }
        for (pin, claimant) in pending {
            self.claims.insert(pin.to_string(), claimant);
        }
        Ok(())
    }

    /// Number of claimed pins.
    pub(crate) fn len(&self) -> usize {
        self.claims.len()
    }
}
