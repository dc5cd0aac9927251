//! Tariff definitions
//!
//! A tariff is an immutable pricing rule: a rate classification applied to
//! every usage fee plus a flat additional fee charged once per fee record.

use serde::{Deserialize, Serialize};

use crate::error::DataIntegrityError;

/// Rate classification of a tariff
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RateClass {
    /// Usage is charged at the discounted unit rate (0.8x by default)
    UnitBased,
    /// Usage is charged at face value
    Flat,
}

impl RateClass {
    /// Default multiplier for unit-based usage
    pub const UNIT_RATE: f64 = 0.8;
    /// Default multiplier for flat usage
    pub const FLAT_RATE: f64 = 1.0;
}

impl std::fmt::Display for RateClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnitBased => write!(f, "UnitBased"),
            Self::Flat => write!(f, "Flat"),
        }
    }
}

/// Pricing rule offered by a service
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tariff {
    pub classification: RateClass,
    /// Charged once for every qualifying fee record
    #[serde(default)]
    pub additional_fee: f64,
}

impl Tariff {
    #[must_use]
    pub const fn new(classification: RateClass, additional_fee: f64) -> Self {
        Self {
            classification,
            additional_fee,
        }
    }

    #[must_use]
    pub const fn unit_based(additional_fee: f64) -> Self {
        Self::new(RateClass::UnitBased, additional_fee)
    }

    #[must_use]
    pub const fn flat(additional_fee: f64) -> Self {
        Self::new(RateClass::Flat, additional_fee)
    }

    #[must_use]
    pub fn classification(&self) -> RateClass {
        self.classification
    }

    #[must_use]
    pub fn additional_fee(&self) -> f64 {
        self.additional_fee
    }

    /// Reject additional fees that could turn a charge negative or NaN
    pub fn validate(&self) -> Result<(), DataIntegrityError> {
        if !self.additional_fee.is_finite() {
            return Err(DataIntegrityError::NonFiniteAmount {
                field: "additional_fee",
            });
        }
        if self.additional_fee < 0.0 {
            return Err(DataIntegrityError::NegativeAdditionalFee(
                self.additional_fee,
            ));
        }
        Ok(())
    }
}
