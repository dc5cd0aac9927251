//! Integration tests for the recalculation engine
//!
//! Tests are organized by topic:
//! - `scenarios` - Tariff selection on concrete accounts
//! - `properties` - Cutoff boundary, idempotence and zero-effect runs
//! - `failures` - Error taxonomy and non-transactional behaviour
//! - `builder_dsl` - Builder DSL and YAML/JSON account files

mod builder_dsl;

use jiff::Timestamp;

/// Midnight UTC on the given day
pub(crate) fn day(year: i16, month: i8, day: i8) -> Timestamp {
    jiff::civil::date(year, month, day)
        .to_zoned(jiff::tz::TimeZone::UTC)
        .unwrap()
        .timestamp()
}

pub(crate) fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "Expected {expected:.4}, got {actual:.4}"
    );
}

/// Route engine logs to the test writer; `RUST_LOG=billcalc_core=debug` shows them
pub(crate) fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
