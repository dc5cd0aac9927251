//! Recalculation results
//!
//! Output types of the evaluator and the engine. Every committed amount can be
//! traced back to the tariff evaluations it was selected from.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::ids::ServiceId;
use super::tariff::RateClass;

/// How a tariff total was built from the qualifying fees
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ChargeBreakdown {
    /// Fee records dated after the cutoff
    pub qualifying_fees: usize,
    /// Sum of qualifying fee amounts before the rate is applied
    pub usage: f64,
    /// `usage` multiplied by the tariff rate
    pub rated_usage: f64,
    /// Additional fee times the number of qualifying fees
    pub additional_fees: f64,
    pub total: f64,
}

/// One tariff scored against a service's unapplied fees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TariffEvaluation {
    /// Position of the tariff in the service's tariff list
    pub tariff_index: usize,
    pub classification: RateClass,
    pub breakdown: ChargeBreakdown,
}

impl TariffEvaluation {
    #[must_use]
    pub fn amount(&self) -> f64 {
        self.breakdown.total
    }
}

/// Result of the per-service step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceRecalculation {
    pub service_id: ServiceId,
    pub cutoff: Timestamp,
    pub evaluations: Vec<TariffEvaluation>,
    /// Amount applied to the ledger and credited to the balance
    pub committed: f64,
    /// Tariff that produced `committed`, if any tariff charged more than zero
    pub winning_tariff: Option<usize>,
}

/// Result of a full account run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecalculationReport {
    pub cutoff: Timestamp,
    pub services: Vec<ServiceRecalculation>,
}

impl RecalculationReport {
    /// Total credited to the balance across all services
    #[must_use]
    pub fn total_committed(&self) -> f64 {
        self.services.iter().map(|s| s.committed).sum()
    }

    /// Amount committed for a specific service
    #[must_use]
    pub fn committed_for(&self, service_id: ServiceId) -> Option<f64> {
        self.services
            .iter()
            .find(|s| s.service_id == service_id)
            .map(|s| s.committed)
    }
}
