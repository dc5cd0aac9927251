//! Engine and account configuration
//!
//! `EngineConfig` holds the usage rates the evaluator applies. `AccountConfig`
//! describes a whole account (payments, services, tariffs and unbilled fees)
//! and can be loaded from YAML or JSON, then resolved into the objects a run
//! needs.
//!
//! # Example
//!
//! ```ignore
//! use billcalc_core::config::AccountConfig;
//!
//! let yaml = r#"
//! payment_dates: ["2001-05-19T00:00:00Z"]
//! services:
//!   - name: Internet
//!     tariffs:
//!       - classification: UnitBased
//!         additional_fee: 0
//!     fees:
//!       - { date: "2001-05-20T00:00:00Z", amount: 200 }
//! "#;
//!
//! let mut setup = AccountConfig::from_yaml(yaml)?.into_setup()?;
//! let report = setup.recalculate()?;
//! ```

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::balance::RunningBalance;
use crate::engine::RecalculationEngine;
use crate::error::{DataIntegrityError, RecalcError, Result};
use crate::ledger::{LedgerBook, MemoryLedger};
use crate::model::{
    Account, FeeRecord, PaymentDate, RateClass, RecalculationReport, Service, ServiceId, Tariff,
};

pub mod builder;
pub mod metadata;

pub use builder::{AccountBuilder, ServiceBuilder};
pub use metadata::{BillingMetadata, EntityMetadata};

fn default_unit_rate() -> f64 {
    RateClass::UNIT_RATE
}

fn default_flat_rate() -> f64 {
    RateClass::FLAT_RATE
}

/// Usage rates applied by the evaluator
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Multiplier for unit-based tariffs
    #[serde(default = "default_unit_rate")]
    pub unit_rate: f64,
    /// Multiplier for flat tariffs
    #[serde(default = "default_flat_rate")]
    pub flat_rate: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            unit_rate: default_unit_rate(),
            flat_rate: default_flat_rate(),
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> std::result::Result<(), DataIntegrityError> {
        for (field, value) in [("unit_rate", self.unit_rate), ("flat_rate", self.flat_rate)] {
            if !value.is_finite() || value < 0.0 {
                return Err(DataIntegrityError::InvalidRate { field, value });
            }
        }
        Ok(())
    }
}

/// A service as written in an account file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub tariffs: Vec<Tariff>,
    /// Unbilled usage fees of this service
    #[serde(default)]
    pub fees: Vec<FeeRecord>,
}

/// Complete description of an account to recalculate
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccountConfig {
    #[serde(default)]
    pub engine: EngineConfig,
    /// Balance before the first run
    #[serde(default)]
    pub opening_balance: f64,
    #[serde(default)]
    pub payment_dates: Vec<Timestamp>,
    #[serde(default)]
    pub services: Vec<ServiceConfig>,
}

impl AccountConfig {
    pub fn from_yaml(yaml: &str) -> std::result::Result<Self, serde_saphyr::Error> {
        serde_saphyr::from_str(yaml)
    }

    pub fn from_json(json: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Assign service IDs in declaration order and build the ledgers.
    ///
    /// Fails on invalid rates, negative tariffs or fees, duplicate fee dates
    /// and duplicate service names.
    pub fn into_setup(self) -> Result<BillingSetup> {
        self.engine.validate()?;
        if !self.opening_balance.is_finite() {
            return Err(DataIntegrityError::NonFiniteAmount {
                field: "opening_balance",
            }
            .into());
        }

        let mut account = Account {
            payment_dates: self.payment_dates.into_iter().map(PaymentDate).collect(),
            services: Vec::with_capacity(self.services.len()),
        };
        let mut ledgers = LedgerBook::new();
        let mut metadata = BillingMetadata::new();

        for (index, service) in self.services.into_iter().enumerate() {
            let service_id = u16::try_from(index)
                .map(ServiceId)
                .map_err(|_| RecalcError::Config("too many services".to_string()))?;

            if metadata.service_id(&service.name).is_some() {
                return Err(RecalcError::Config(format!(
                    "service '{}' is defined more than once",
                    service.name
                )));
            }

            for tariff in &service.tariffs {
                tariff.validate()?;
            }

            ledgers.insert(service_id, MemoryLedger::with_fees(service.fees)?);
            metadata.register_service(service_id, Some(service.name), service.description);
            account
                .services
                .push(Service::new(service_id, service.tariffs));
        }

        Ok(BillingSetup {
            engine: RecalculationEngine::new(&self.engine)?,
            account,
            ledgers,
            balance: RunningBalance::with_total(self.opening_balance),
            metadata,
        })
    }
}

/// Everything needed to run recalculations for one account
#[derive(Debug, Clone)]
pub struct BillingSetup {
    pub engine: RecalculationEngine,
    pub account: Account,
    pub ledgers: LedgerBook,
    pub balance: RunningBalance,
    pub metadata: BillingMetadata,
}

impl BillingSetup {
    /// Run one recalculation against the owned ledgers and balance
    pub fn recalculate(&mut self) -> Result<RecalculationReport> {
        self.engine
            .recalculate_balance(&self.account, &mut self.ledgers, &mut self.balance)
    }

    /// Record a completed payment, moving the cutoff of later runs
    pub fn record_payment(&mut self, at: Timestamp) {
        self.account.payment_dates.push(PaymentDate(at));
    }

    /// Ledger of a service by name
    #[must_use]
    pub fn ledger(&self, service_name: &str) -> Option<&MemoryLedger> {
        self.ledgers.ledger(self.metadata.service_id(service_name)?)
    }

    pub fn ledger_mut(&mut self, service_name: &str) -> Option<&mut MemoryLedger> {
        let id = self.metadata.service_id(service_name)?;
        self.ledgers.ledger_mut(id)
    }
}
