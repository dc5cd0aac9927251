use jiff::Timestamp;
use thiserror::Error;

use crate::model::ServiceId;

/// Fee or tariff data that would make the engine charge a negative or
/// undefined amount
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DataIntegrityError {
    #[error("fee dated {date} has negative amount {amount}")]
    NegativeFeeAmount { date: Timestamp, amount: f64 },

    #[error("tariff has negative additional fee {0}")]
    NegativeAdditionalFee(f64),

    #[error("{field} is not a finite number")]
    NonFiniteAmount { field: &'static str },

    #[error("ledger already holds a fee dated {0}")]
    DuplicateFeeDate(Timestamp),

    #[error("rate {field} must be finite and non-negative, got {value}")]
    InvalidRate { field: &'static str, value: f64 },
}

/// Failure reported by a ledger or balance implementation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct CollaboratorError {
    pub message: String,
}

impl CollaboratorError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Errors surfaced by a recalculation run
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RecalcError {
    /// No fee ledger is available for the service; aborts the run
    #[error("no fee ledger available for service {0:?}")]
    LedgerNotFound(ServiceId),

    #[error(transparent)]
    DataIntegrity(#[from] DataIntegrityError),

    /// The ledger refused the recalculation; nothing was committed for the service
    #[error("ledger commit failed for service {service_id:?}: {source}")]
    LedgerCommit {
        service_id: ServiceId,
        #[source]
        source: CollaboratorError,
    },

    /// The ledger already settled its fees but the balance was not credited
    #[error(
        "balance commit of {amount} failed for service {service_id:?} after its ledger was settled: {source}"
    )]
    BalanceCommit {
        service_id: ServiceId,
        amount: f64,
        #[source]
        source: CollaboratorError,
    },

    #[error("invalid account configuration: {0}")]
    Config(String),
}

impl RecalcError {
    /// Whether the ledger and balance disagree after this error and need
    /// reconciliation before the service is billed again
    #[must_use]
    pub fn is_divergent(&self) -> bool {
        matches!(self, RecalcError::BalanceCommit { .. })
    }
}

pub type Result<T> = std::result::Result<T, RecalcError>;
