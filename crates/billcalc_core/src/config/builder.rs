//! Account Builder
//!
//! Fluent API for setting up an account with its services, tariffs and
//! unbilled fees. Services get IDs automatically and are looked up by name.
//!
//! # Example
//!
//! ```ignore
//! use billcalc_core::config::{AccountBuilder, ServiceBuilder};
//!
//! let mut setup = AccountBuilder::new()
//!     .payment(2001, 5, 19)
//!     .service(
//!         ServiceBuilder::new("Internet")
//!             .unit_based(0.0)
//!             .flat(10.0)
//!             .fee(2001, 5, 20, 200.0)
//!             .fee(2001, 6, 22, 150.0),
//!     )
//!     .build()?;
//!
//! let report = setup.recalculate()?;
//! ```

use jiff::Timestamp;
use jiff::civil::Date;
use jiff::tz::TimeZone;

use super::{AccountConfig, BillingSetup, EngineConfig, ServiceConfig};
use crate::error::{RecalcError, Result};
use crate::model::{FeeRecord, Tariff};

/// A fee or payment date given as a civil date (midnight UTC) or an exact instant
#[derive(Debug, Clone, Copy)]
enum PendingDate {
    Civil(Date),
    Exact(Timestamp),
}

impl PendingDate {
    fn resolve(self) -> Result<Timestamp> {
        match self {
            PendingDate::Exact(ts) => Ok(ts),
            PendingDate::Civil(date) => date
                .to_zoned(TimeZone::UTC)
                .map(|zoned| zoned.timestamp())
                .map_err(|e| RecalcError::Config(format!("invalid date {date}: {e}"))),
        }
    }
}

/// Builder for a single service
#[derive(Debug, Clone)]
pub struct ServiceBuilder {
    name: String,
    description: Option<String>,
    tariffs: Vec<Tariff>,
    fees: Vec<(PendingDate, f64)>,
}

impl ServiceBuilder {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            tariffs: Vec::new(),
            fees: Vec::new(),
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn tariff(mut self, tariff: Tariff) -> Self {
        self.tariffs.push(tariff);
        self
    }

    /// Add a unit-based tariff with the given additional fee
    #[must_use]
    pub fn unit_based(self, additional_fee: f64) -> Self {
        self.tariff(Tariff::unit_based(additional_fee))
    }

    /// Add a flat tariff with the given additional fee
    #[must_use]
    pub fn flat(self, additional_fee: f64) -> Self {
        self.tariff(Tariff::flat(additional_fee))
    }

    /// Add an unbilled fee dated at midnight UTC
    #[must_use]
    pub fn fee(mut self, year: i16, month: i8, day: i8, amount: f64) -> Self {
        self.fees
            .push((PendingDate::Civil(jiff::civil::date(year, month, day)), amount));
        self
    }

    /// Add an unbilled fee at an exact instant
    #[must_use]
    pub fn fee_at(mut self, date: Timestamp, amount: f64) -> Self {
        self.fees.push((PendingDate::Exact(date), amount));
        self
    }

    fn into_config(self) -> Result<ServiceConfig> {
        let fees = self
            .fees
            .into_iter()
            .map(|(date, amount)| -> Result<FeeRecord> {
                Ok(FeeRecord::new(date.resolve()?, amount))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(ServiceConfig {
            name: self.name,
            description: self.description,
            tariffs: self.tariffs,
            fees,
        })
    }
}

/// Builder for an account and everything a recalculation run needs
#[derive(Debug, Clone, Default)]
pub struct AccountBuilder {
    engine: EngineConfig,
    opening_balance: f64,
    payments: Vec<PendingDate>,
    services: Vec<ServiceBuilder>,
}

impl AccountBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn engine(mut self, config: EngineConfig) -> Self {
        self.engine = config;
        self
    }

    /// Override the unit-based usage rate
    #[must_use]
    pub fn unit_rate(mut self, rate: f64) -> Self {
        self.engine.unit_rate = rate;
        self
    }

    #[must_use]
    pub fn opening_balance(mut self, amount: f64) -> Self {
        self.opening_balance = amount;
        self
    }

    /// Record a completed payment at midnight UTC
    #[must_use]
    pub fn payment(mut self, year: i16, month: i8, day: i8) -> Self {
        self.payments
            .push(PendingDate::Civil(jiff::civil::date(year, month, day)));
        self
    }

    /// Record a completed payment at an exact instant
    #[must_use]
    pub fn payment_at(mut self, at: Timestamp) -> Self {
        self.payments.push(PendingDate::Exact(at));
        self
    }

    #[must_use]
    pub fn service(mut self, service: ServiceBuilder) -> Self {
        self.services.push(service);
        self
    }

    /// Resolve dates, assign service IDs and validate all amounts
    pub fn build(self) -> Result<BillingSetup> {
        let payment_dates = self
            .payments
            .into_iter()
            .map(PendingDate::resolve)
            .collect::<Result<Vec<_>>>()?;
        let services = self
            .services
            .into_iter()
            .map(ServiceBuilder::into_config)
            .collect::<Result<Vec<_>>>()?;

        AccountConfig {
            engine: self.engine,
            opening_balance: self.opening_balance,
            payment_dates,
            services,
        }
        .into_setup()
    }
}
