//! Account, Service and PaymentDate definitions
//!
//! An account owns the dates of its completed payments and the services it
//! is subscribed to. Ledgers and the balance live outside the account and are
//! handed to the engine for each run.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::ids::ServiceId;
use super::tariff::Tariff;

/// Moment a payment was completed
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PaymentDate(pub Timestamp);

impl PaymentDate {
    #[must_use]
    pub fn timestamp(&self) -> Timestamp {
        self.0
    }
}

impl From<Timestamp> for PaymentDate {
    fn from(ts: Timestamp) -> Self {
        Self(ts)
    }
}

/// A subscribed service and the tariffs it can be billed under
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    pub service_id: ServiceId,
    #[serde(default)]
    pub tariffs: Vec<Tariff>,
}

impl Service {
    #[must_use]
    pub fn new(service_id: ServiceId, tariffs: Vec<Tariff>) -> Self {
        Self {
            service_id,
            tariffs,
        }
    }

    #[must_use]
    pub fn tariffs(&self) -> &[Tariff] {
        &self.tariffs
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Account {
    /// Completed payments, in no particular order
    #[serde(default)]
    pub payment_dates: Vec<PaymentDate>,
    /// Subscribed services, recalculated in this order. IDs must be unique.
    #[serde(default)]
    pub services: Vec<Service>,
}

impl Account {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Latest completed payment, or the Unix epoch when nothing was paid yet.
    ///
    /// Only fees dated strictly after this moment are charged.
    #[must_use]
    pub fn cutoff_date(&self) -> Timestamp {
        self.payment_dates
            .iter()
            .map(PaymentDate::timestamp)
            .fold(Timestamp::UNIX_EPOCH, Ord::max)
    }

    /// Find a service by ID
    #[must_use]
    pub fn service(&self, id: ServiceId) -> Option<&Service> {
        self.services.iter().find(|s| s.service_id == id)
    }
}
