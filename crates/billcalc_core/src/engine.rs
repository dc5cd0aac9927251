//! Balance recalculation
//!
//! The engine walks an account's services in order. For each one it scores
//! every tariff against the service's unapplied fees, keeps the highest
//! total, settles the ledger with it and credits the same amount to the
//! balance. The cutoff (latest payment, or epoch) is computed once per run.
//!
//! Runs are not transactional: when a service fails, services committed
//! before it stay committed and the error is returned to the caller.

use std::collections::BTreeMap;

use jiff::Timestamp;
use rustc_hash::FxHashSet;
use tracing::{debug, info, warn};

use crate::balance::Balance;
use crate::config::EngineConfig;
use crate::error::{DataIntegrityError, RecalcError, Result};
use crate::evaluate::TariffEvaluator;
use crate::ledger::{FeeLedger, LedgerProvider};
use crate::model::{
    Account, Recalculation, RecalculationReport, Service, ServiceRecalculation, TariffEvaluation,
};

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RecalculationEngine {
    evaluator: TariffEvaluator,
}

impl RecalculationEngine {
    pub fn new(config: &EngineConfig) -> std::result::Result<Self, DataIntegrityError> {
        Ok(Self {
            evaluator: TariffEvaluator::new(config)?,
        })
    }

    /// Recalculate every service of `account` and credit the results to `balance`.
    ///
    /// The ledgers and the balance are borrowed exclusively for the whole run.
    /// Service IDs must be unique within the account, otherwise the run is
    /// refused before anything is committed.
    pub fn recalculate_balance<P, B>(
        &self,
        account: &Account,
        ledgers: &mut P,
        balance: &mut B,
    ) -> Result<RecalculationReport>
    where
        P: LedgerProvider,
        B: Balance,
    {
        let mut seen = FxHashSet::default();
        for service in &account.services {
            if !seen.insert(service.service_id) {
                return Err(RecalcError::Config(format!(
                    "service {:?} appears more than once in the account",
                    service.service_id
                )));
            }
        }

        let cutoff = account.cutoff_date();

        let mut services = Vec::with_capacity(account.services.len());
        for service in &account.services {
            services.push(self.recalculate_service(service, ledgers, balance, cutoff)?);
        }

        let report = RecalculationReport { cutoff, services };

        info!(
            %cutoff,
            services = report.services.len(),
            total = report.total_committed(),
            "Balance recalculated"
        );

        Ok(report)
    }

    /// Score every tariff of `service`, then commit the highest total to the
    /// service's ledger and to the balance.
    ///
    /// A service without tariffs commits zero to both.
    pub fn recalculate_service<P, B>(
        &self,
        service: &Service,
        ledgers: &mut P,
        balance: &mut B,
        cutoff: Timestamp,
    ) -> Result<ServiceRecalculation>
    where
        P: LedgerProvider,
        B: Balance,
    {
        let service_id = service.service_id;
        let ledger = ledgers
            .retrieve_history(service)
            .ok_or(RecalcError::LedgerNotFound(service_id))?;

        let evaluations = self.evaluate_tariffs(service, ledger.unapplied_fees(), cutoff)?;

        // Highest total wins, not highest rate: a large additional fee can
        // outweigh a better usage rate.
        let mut committed = 0.0;
        let mut winning_tariff = None;
        for evaluation in &evaluations {
            if evaluation.amount() > committed {
                committed = evaluation.amount();
                winning_tariff = Some(evaluation.tariff_index);
            }
        }

        ledger
            .apply_recalculation(&Recalculation {
                service_id,
                cutoff,
                amount: committed,
            })
            .map_err(|source| RecalcError::LedgerCommit { service_id, source })?;

        balance.update_balance(committed).map_err(|source| {
            warn!(
                service_id = service_id.0,
                amount = committed,
                error = %source,
                "Ledger settled but balance update failed"
            );
            RecalcError::BalanceCommit {
                service_id,
                amount: committed,
                source,
            }
        })?;

        info!(
            service_id = service_id.0,
            tariffs = evaluations.len(),
            ?winning_tariff,
            committed,
            "Service recalculated"
        );

        Ok(ServiceRecalculation {
            service_id,
            cutoff,
            evaluations,
            committed,
            winning_tariff,
        })
    }

    fn evaluate_tariffs(
        &self,
        service: &Service,
        fees: &BTreeMap<Timestamp, f64>,
        cutoff: Timestamp,
    ) -> Result<Vec<TariffEvaluation>> {
        service
            .tariffs()
            .iter()
            .enumerate()
            .map(|(tariff_index, tariff)| -> Result<TariffEvaluation> {
                let breakdown = self.evaluator.evaluate_breakdown(tariff, fees, cutoff)?;
                debug!(
                    service_id = service.service_id.0,
                    tariff_index,
                    classification = %tariff.classification,
                    qualifying_fees = breakdown.qualifying_fees,
                    total = breakdown.total,
                    "Tariff evaluated"
                );
                Ok(TariffEvaluation {
                    tariff_index,
                    classification: tariff.classification,
                    breakdown,
                })
            })
            .collect()
    }
}
