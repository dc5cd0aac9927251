mod account;
mod fees;
mod ids;
mod results;
mod tariff;

pub use account::{Account, PaymentDate, Service};
pub use fees::{AppliedRecalculation, FeeRecord, Recalculation};
pub(crate) use fees::validate_fee_amount;
pub use ids::ServiceId;
pub use results::{ChargeBreakdown, RecalculationReport, ServiceRecalculation, TariffEvaluation};
pub use tariff::{RateClass, Tariff};
