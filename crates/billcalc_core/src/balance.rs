//! Account balance

use serde::{Deserialize, Serialize};

use crate::error::CollaboratorError;

/// Running total credited by recalculation runs
pub trait Balance {
    /// Add `amount` to the running total
    fn update_balance(&mut self, amount: f64) -> Result<(), CollaboratorError>;
}

/// In-memory balance
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RunningBalance {
    total: f64,
    /// Number of updates received, including zero-amount ones
    updates: u64,
}

impl RunningBalance {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_total(total: f64) -> Self {
        Self { total, updates: 0 }
    }

    #[must_use]
    pub fn total(&self) -> f64 {
        self.total
    }

    #[must_use]
    pub fn updates(&self) -> u64 {
        self.updates
    }
}

impl Balance for RunningBalance {
    fn update_balance(&mut self, amount: f64) -> Result<(), CollaboratorError> {
        if !amount.is_finite() {
            return Err(CollaboratorError::new(format!(
                "refusing to add non-finite amount {amount} to balance"
            )));
        }
        self.total += amount;
        self.updates += 1;
        Ok(())
    }
}
