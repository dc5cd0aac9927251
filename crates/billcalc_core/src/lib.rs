//! Tariff recalculation library
//!
//! This crate recalculates an account balance from the unbilled usage fees of
//! its subscribed services. For every service it:
//! - Determines the cutoff (latest completed payment, or the Unix epoch)
//! - Scores every tariff against the fees dated after the cutoff
//! - Picks the highest total (not the highest rate)
//! - Settles the service's fee ledger and credits the balance with that total
//!
//! Ledgers and the balance are collaborators behind the [`FeeLedger`],
//! [`LedgerProvider`] and [`Balance`] traits; in-memory implementations are
//! provided.
//!
//! # Builder DSL
//!
//! ```ignore
//! use billcalc_core::{AccountBuilder, ServiceBuilder};
//!
//! let mut setup = AccountBuilder::new()
//!     .payment(2001, 5, 19)
//!     .service(
//!         ServiceBuilder::new("Internet")
//!             .unit_based(50.0)
//!             .flat(0.0)
//!             .fee(2001, 5, 20, 200.0),
//!     )
//!     .build()?;
//!
//! let report = setup.recalculate()?;
//! assert_eq!(report.total_committed(), 210.0);
//! ```

#![warn(clippy::all)]

// ============================================================================
// Core modules
// ============================================================================

pub mod balance;
pub mod engine;
pub mod error;
pub mod evaluate;
pub mod ledger;

// ============================================================================
// Type definition modules
// ============================================================================

pub mod config;
pub mod model;

// ============================================================================
// Test modules
// ============================================================================

#[cfg(test)]
mod tests;

// ============================================================================
// Public re-exports for convenience
// ============================================================================

pub use balance::{Balance, RunningBalance};
pub use config::{AccountBuilder, AccountConfig, BillingSetup, EngineConfig, ServiceBuilder};
pub use engine::RecalculationEngine;
pub use error::{CollaboratorError, DataIntegrityError, RecalcError};
pub use evaluate::TariffEvaluator;
pub use ledger::{FeeLedger, LedgerBook, LedgerProvider, MemoryLedger};
