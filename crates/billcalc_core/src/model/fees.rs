//! Usage fee records and the recalculations applied against them

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::ids::ServiceId;
use crate::error::DataIntegrityError;

/// A single dated usage fee produced by metering
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeeRecord {
    pub date: Timestamp,
    pub amount: f64,
}

impl FeeRecord {
    #[must_use]
    pub fn new(date: Timestamp, amount: f64) -> Self {
        Self { date, amount }
    }
}

pub(crate) fn validate_fee_amount(date: Timestamp, amount: f64) -> Result<(), DataIntegrityError> {
    if !amount.is_finite() {
        return Err(DataIntegrityError::NonFiniteAmount { field: "amount" });
    }
    if amount < 0.0 {
        return Err(DataIntegrityError::NegativeFeeAmount { date, amount });
    }
    Ok(())
}

/// The outcome of one service step, handed to the ledger to settle its fees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Recalculation {
    pub service_id: ServiceId,
    /// Cutoff the amount was computed against
    pub cutoff: Timestamp,
    /// Highest tariff total for the service
    pub amount: f64,
}

/// Audit entry kept by a ledger for every applied recalculation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppliedRecalculation {
    pub cutoff: Timestamp,
    pub amount: f64,
    /// Fees removed from the unapplied set by this recalculation
    pub settled_fees: Vec<FeeRecord>,
}

impl AppliedRecalculation {
    /// Fees that were dated after the cutoff and therefore charged
    pub fn charged_fees(&self) -> impl Iterator<Item = &FeeRecord> {
        self.settled_fees.iter().filter(|f| f.date > self.cutoff)
    }
}
