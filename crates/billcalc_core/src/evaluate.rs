//! Tariff evaluation
//!
//! Scores a single tariff against the unapplied fees of one service. Every
//! fee dated strictly after the cutoff is charged `amount * rate` plus the
//! tariff's additional fee; the tariff total is the sum of those charges.
//! Evaluation is pure: nothing is read or written besides the arguments.

use std::collections::BTreeMap;
use std::ops::Bound;

use jiff::Timestamp;

use crate::config::EngineConfig;
use crate::error::DataIntegrityError;
use crate::model::{ChargeBreakdown, RateClass, Tariff, validate_fee_amount};

/// Computes tariff totals using the configured usage rates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TariffEvaluator {
    unit_rate: f64,
    flat_rate: f64,
}

impl Default for TariffEvaluator {
    fn default() -> Self {
        Self {
            unit_rate: RateClass::UNIT_RATE,
            flat_rate: RateClass::FLAT_RATE,
        }
    }
}

impl TariffEvaluator {
    /// Fails when either rate is negative or not finite.
    pub fn new(config: &EngineConfig) -> Result<Self, DataIntegrityError> {
        config.validate()?;
        Ok(Self {
            unit_rate: config.unit_rate,
            flat_rate: config.flat_rate,
        })
    }

    /// Usage multiplier for a rate classification
    #[must_use]
    pub fn rate(&self, classification: RateClass) -> f64 {
        match classification {
            RateClass::UnitBased => self.unit_rate,
            RateClass::Flat => self.flat_rate,
        }
    }

    /// Total chargeable amount of `tariff` for all fees dated after `cutoff`.
    ///
    /// Returns `0.0` when no fee qualifies; the additional fee is only charged
    /// per qualifying fee.
    pub fn evaluate(
        &self,
        tariff: &Tariff,
        fees: &BTreeMap<Timestamp, f64>,
        cutoff: Timestamp,
    ) -> Result<f64, DataIntegrityError> {
        Ok(self.evaluate_breakdown(tariff, fees, cutoff)?.total)
    }

    /// Like [`evaluate`](Self::evaluate) but keeps the parts of the total
    pub fn evaluate_breakdown(
        &self,
        tariff: &Tariff,
        fees: &BTreeMap<Timestamp, f64>,
        cutoff: Timestamp,
    ) -> Result<ChargeBreakdown, DataIntegrityError> {
        tariff.validate()?;
        let rate = self.rate(tariff.classification);

        let mut breakdown = ChargeBreakdown::default();
        for (&date, &amount) in fees.range((Bound::Excluded(cutoff), Bound::Unbounded)) {
            validate_fee_amount(date, amount)?;

            let rated = amount * rate;
            breakdown.qualifying_fees += 1;
            breakdown.usage += amount;
            breakdown.rated_usage += rated;
            breakdown.additional_fees += tariff.additional_fee;
            breakdown.total += rated + tariff.additional_fee;
        }

        if !breakdown.total.is_finite() {
            return Err(DataIntegrityError::NonFiniteAmount { field: "total" });
        }

        Ok(breakdown)
    }
}

/// Evaluate with the default rates (0.8 unit-based, 1.0 flat)
pub fn evaluate(
    tariff: &Tariff,
    fees: &BTreeMap<Timestamp, f64>,
    cutoff: Timestamp,
) -> Result<f64, DataIntegrityError> {
    TariffEvaluator::default().evaluate(tariff, fees, cutoff)
}
