//! Fee ledgers
//!
//! A ledger holds the usage fees of one service that have not been billed
//! yet, and remembers every recalculation applied against it. Reading the
//! unapplied fees and settling them are two operations on the same entity so
//! the applied/unapplied split is enforced in one place.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use jiff::Timestamp;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::{CollaboratorError, DataIntegrityError};
use crate::model::{
    AppliedRecalculation, FeeRecord, Recalculation, Service, ServiceId, validate_fee_amount,
};

/// Per-service store of unbilled usage fees
pub trait FeeLedger {
    /// Fees not settled by any earlier recalculation, keyed by date
    fn unapplied_fees(&self) -> &BTreeMap<Timestamp, f64>;

    /// Settle every unapplied fee and record the amount charged for them.
    ///
    /// After this returns `Ok`, `unapplied_fees` must not contain any fee
    /// dated at or before `recalculation.cutoff`.
    fn apply_recalculation(&mut self, recalculation: &Recalculation)
    -> Result<(), CollaboratorError>;
}

/// Source of the fee ledger belonging to each service
pub trait LedgerProvider {
    type Ledger: FeeLedger;

    /// `None` when the service has no ledger
    fn retrieve_history(&mut self, service: &Service) -> Option<&mut Self::Ledger>;
}

/// In-memory fee ledger
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemoryLedger {
    fees: BTreeMap<Timestamp, f64>,
    applied_total: f64,
    history: Vec<AppliedRecalculation>,
}

impl MemoryLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a ledger from fee records, rejecting invalid or duplicate entries
    pub fn with_fees(
        fees: impl IntoIterator<Item = FeeRecord>,
    ) -> Result<Self, DataIntegrityError> {
        let mut ledger = Self::new();
        for fee in fees {
            ledger.record_fee(fee.date, fee.amount)?;
        }
        Ok(ledger)
    }

    /// Add an unbilled usage fee.
    ///
    /// Fee dates are unique within a ledger; a second fee on the same date is
    /// rejected instead of replacing the first one.
    pub fn record_fee(&mut self, date: Timestamp, amount: f64) -> Result<(), DataIntegrityError> {
        validate_fee_amount(date, amount)?;

        match self.fees.entry(date) {
            Entry::Occupied(_) => Err(DataIntegrityError::DuplicateFeeDate(date)),
            Entry::Vacant(slot) => {
                slot.insert(amount);
                Ok(())
            }
        }
    }

    /// Total of every amount applied so far
    #[must_use]
    pub fn applied_total(&self) -> f64 {
        self.applied_total
    }

    /// Applied recalculations, oldest first
    #[must_use]
    pub fn history(&self) -> &[AppliedRecalculation] {
        &self.history
    }

    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.fees.is_empty()
    }
}

impl FeeLedger for MemoryLedger {
    fn unapplied_fees(&self) -> &BTreeMap<Timestamp, f64> {
        &self.fees
    }

    fn apply_recalculation(
        &mut self,
        recalculation: &Recalculation,
    ) -> Result<(), CollaboratorError> {
        if !recalculation.amount.is_finite() || recalculation.amount < 0.0 {
            return Err(CollaboratorError::new(format!(
                "refusing to apply amount {} to ledger of service {:?}",
                recalculation.amount, recalculation.service_id
            )));
        }

        let settled_fees = std::mem::take(&mut self.fees)
            .into_iter()
            .map(|(date, amount)| FeeRecord::new(date, amount))
            .collect();

        self.applied_total += recalculation.amount;
        self.history.push(AppliedRecalculation {
            cutoff: recalculation.cutoff,
            amount: recalculation.amount,
            settled_fees,
        });

        Ok(())
    }
}

/// Ledgers for every service of an account
#[derive(Debug, Clone, Default)]
pub struct LedgerBook {
    ledgers: FxHashMap<ServiceId, MemoryLedger>,
}

impl LedgerBook {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the ledger of a service, returning the one it replaces
    pub fn insert(&mut self, service_id: ServiceId, ledger: MemoryLedger) -> Option<MemoryLedger> {
        self.ledgers.insert(service_id, ledger)
    }

    /// Ledger of a service, creating an empty one if needed
    pub fn ledger_entry(&mut self, service_id: ServiceId) -> &mut MemoryLedger {
        self.ledgers.entry(service_id).or_default()
    }

    #[must_use]
    pub fn ledger(&self, service_id: ServiceId) -> Option<&MemoryLedger> {
        self.ledgers.get(&service_id)
    }

    pub fn ledger_mut(&mut self, service_id: ServiceId) -> Option<&mut MemoryLedger> {
        self.ledgers.get_mut(&service_id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ledgers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ledgers.is_empty()
    }
}

impl LedgerProvider for LedgerBook {
    type Ledger = MemoryLedger;

    fn retrieve_history(&mut self, service: &Service) -> Option<&mut MemoryLedger> {
        self.ledgers.get_mut(&service.service_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(s: &str) -> Timestamp {
        s.parse().unwrap()
    }

    #[test]
    fn test_record_fee_rejects_duplicate_dates() {
        let mut ledger = MemoryLedger::new();
        let date = ts("2001-05-20T00:00:00Z");

        ledger.record_fee(date, 200.0).unwrap();
        let err = ledger.record_fee(date, 150.0).unwrap_err();

        assert_eq!(err, DataIntegrityError::DuplicateFeeDate(date));
        // The first fee is kept untouched
        assert_eq!(ledger.unapplied_fees().get(&date), Some(&200.0));
        assert_eq!(ledger.unapplied_fees().len(), 1);
    }

    #[test]
    fn test_record_fee_rejects_negative_amount() {
        let mut ledger = MemoryLedger::new();
        let date = ts("2001-05-20T00:00:00Z");

        assert_eq!(
            ledger.record_fee(date, -1.0),
            Err(DataIntegrityError::NegativeFeeAmount { date, amount: -1.0 })
        );
        assert!(matches!(
            ledger.record_fee(date, f64::INFINITY),
            Err(DataIntegrityError::NonFiniteAmount { .. })
        ));
        assert!(ledger.is_settled());
    }

    #[test]
    fn test_apply_settles_all_fees_and_keeps_history() {
        let cutoff = ts("2001-05-19T00:00:00Z");
        let mut ledger = MemoryLedger::with_fees([
            FeeRecord::new(ts("2001-05-01T00:00:00Z"), 90.0),
            FeeRecord::new(cutoff, 40.0),
            FeeRecord::new(ts("2001-05-20T00:00:00Z"), 200.0),
        ])
        .unwrap();

        ledger
            .apply_recalculation(&Recalculation {
                service_id: ServiceId(0),
                cutoff,
                amount: 160.0,
            })
            .unwrap();

        assert!(ledger.is_settled());
        assert_eq!(ledger.applied_total(), 160.0);
        assert_eq!(ledger.history().len(), 1);

        let entry = &ledger.history()[0];
        assert_eq!(entry.settled_fees.len(), 3);
        let charged: Vec<_> = entry.charged_fees().collect();
        assert_eq!(charged.len(), 1);
        assert_eq!(charged[0].amount, 200.0);
    }

    #[test]
    fn test_apply_refuses_negative_amount() {
        let mut ledger =
            MemoryLedger::with_fees([FeeRecord::new(ts("2001-05-20T00:00:00Z"), 10.0)]).unwrap();

        let result = ledger.apply_recalculation(&Recalculation {
            service_id: ServiceId(3),
            cutoff: Timestamp::UNIX_EPOCH,
            amount: -4.0,
        });

        assert!(result.is_err());
        assert!(!ledger.is_settled());
        assert!(ledger.history().is_empty());
    }

    #[test]
    fn test_ledger_book_lookup() {
        let mut book = LedgerBook::new();
        book.insert(ServiceId(1), MemoryLedger::new());

        let known = Service::new(ServiceId(1), vec![]);
        let unknown = Service::new(ServiceId(2), vec![]);

        assert!(book.retrieve_history(&known).is_some());
        assert!(book.retrieve_history(&unknown).is_none());

        book.ledger_entry(ServiceId(2));
        assert_eq!(book.len(), 2);
        assert!(book.retrieve_history(&unknown).is_some());
    }
}
