//! Tests for the Builder DSL and account files
//!
//! These tests demonstrate and verify the fluent builder API and loading
//! accounts from YAML and JSON.

use super::{assert_close, day};
use crate::config::{AccountBuilder, AccountConfig, ServiceBuilder};
use crate::error::{DataIntegrityError, RecalcError};
use crate::ledger::FeeLedger;
use crate::model::{RateClass, ServiceId, Tariff};

/// Test basic AccountBuilder usage
#[test]
fn test_account_builder_basic() {
    let setup = AccountBuilder::new()
        .payment(2001, 3, 22)
        .payment(2001, 5, 19)
        .opening_balance(15.0)
        .build()
        .unwrap();

    assert_eq!(setup.account.payment_dates.len(), 2);
    assert_eq!(setup.account.cutoff_date(), day(2001, 5, 19));
    assert_eq!(setup.balance.total(), 15.0);
    assert!(setup.account.services.is_empty());
    assert!(setup.metadata.services.is_empty());
}

/// Services get sequential IDs and are registered by name
#[test]
fn test_service_ids_and_metadata() {
    let setup = AccountBuilder::new()
        .service(
            ServiceBuilder::new("Internet")
                .description("Fibre 100")
                .unit_based(0.0),
        )
        .service(ServiceBuilder::new("Phone").flat(2.5))
        .build()
        .unwrap();

    assert_eq!(setup.metadata.service_id("Internet"), Some(ServiceId(0)));
    assert_eq!(setup.metadata.service_id("Phone"), Some(ServiceId(1)));
    assert_eq!(setup.metadata.service_name(ServiceId(1)), Some("Phone"));
    assert_eq!(
        setup.metadata.services[&ServiceId(0)].description.as_deref(),
        Some("Fibre 100")
    );

    let phone = setup.account.service(ServiceId(1)).unwrap();
    assert_eq!(phone.tariffs(), &[Tariff::flat(2.5)]);
    assert_eq!(setup.ledgers.len(), 2);
}

#[test]
fn test_builder_rejects_negative_fee() {
    let result = AccountBuilder::new()
        .service(ServiceBuilder::new("Internet").flat(0.0).fee(2001, 5, 20, -10.0))
        .build();

    assert!(matches!(
        result,
        Err(RecalcError::DataIntegrity(
            DataIntegrityError::NegativeFeeAmount { .. }
        ))
    ));
}

#[test]
fn test_builder_rejects_duplicate_fee_dates() {
    let result = AccountBuilder::new()
        .service(
            ServiceBuilder::new("Internet")
                .flat(0.0)
                .fee(2001, 5, 20, 200.0)
                .fee(2001, 5, 20, 150.0),
        )
        .build();

    assert!(matches!(
        result,
        Err(RecalcError::DataIntegrity(DataIntegrityError::DuplicateFeeDate(_)))
    ));
}

#[test]
fn test_custom_unit_rate() {
    let mut setup = AccountBuilder::new()
        .unit_rate(0.5)
        .service(ServiceBuilder::new("Internet").unit_based(0.0).fee(2001, 5, 20, 200.0))
        .build()
        .unwrap();

    let report = setup.recalculate().unwrap();
    assert_close(report.total_committed(), 100.0);
}

#[test]
fn test_exact_instants() {
    let payment: jiff::Timestamp = "2001-05-19T12:00:00Z".parse().unwrap();
    let mut setup = AccountBuilder::new()
        .payment_at(payment)
        .service(
            ServiceBuilder::new("Internet")
                .flat(0.0)
                .fee_at("2001-05-19T11:59:59Z".parse().unwrap(), 30.0)
                .fee_at("2001-05-19T12:00:01Z".parse().unwrap(), 40.0),
        )
        .build()
        .unwrap();

    let report = setup.recalculate().unwrap();
    assert_eq!(report.cutoff, payment);
    assert_close(report.total_committed(), 40.0);
}

#[test]
fn test_account_from_yaml() {
    let yaml = r#"
opening_balance: 10
payment_dates:
  - "2001-03-22T00:00:00Z"
  - "2001-05-19T00:00:00Z"
services:
  - name: Internet
    tariffs:
      - classification: Flat
        additional_fee: 0
      - classification: UnitBased
        additional_fee: 50
    fees:
      - date: "2001-05-20T00:00:00Z"
        amount: 200
  - name: Phone
    tariffs:
      - classification: UnitBased
    fees:
      - date: "2001-06-25T00:00:00Z"
        amount: 180
      - date: "2001-07-25T00:00:00Z"
        amount: 120
"#;

    let config = AccountConfig::from_yaml(yaml).unwrap();
    assert_eq!(config.engine.unit_rate, 0.8);
    assert_eq!(config.services[1].tariffs[0].classification, RateClass::UnitBased);
    assert_eq!(config.services[1].tariffs[0].additional_fee, 0.0);

    let mut setup = config.into_setup().unwrap();
    let report = setup.recalculate().unwrap();

    assert_close(report.committed_for(ServiceId(0)).unwrap(), 210.0);
    assert_close(report.committed_for(ServiceId(1)).unwrap(), 240.0);
    assert_close(setup.balance.total(), 10.0 + 210.0 + 240.0);
    assert!(setup.ledger("Phone").unwrap().unapplied_fees().is_empty());
}

#[test]
fn test_account_from_json() {
    let json = r#"{
        "engine": { "unit_rate": 0.9 },
        "services": [
            {
                "name": "Storage",
                "tariffs": [{ "classification": "UnitBased", "additional_fee": 1.0 }],
                "fees": [{ "date": "2001-05-20T00:00:00Z", "amount": 100.0 }]
            }
        ]
    }"#;

    let mut setup = AccountConfig::from_json(json).unwrap().into_setup().unwrap();
    let report = setup.recalculate().unwrap();

    assert_close(report.total_committed(), 91.0);
}

#[test]
fn test_invalid_rate_in_config() {
    let json = r#"{ "engine": { "flat_rate": -1.0 } }"#;

    let result = AccountConfig::from_json(json).unwrap().into_setup();

    assert!(matches!(
        result,
        Err(RecalcError::DataIntegrity(DataIntegrityError::InvalidRate {
            field: "flat_rate",
            ..
        }))
    ));
}

#[test]
fn test_report_serializes() {
    let mut setup = AccountBuilder::new()
        .service(ServiceBuilder::new("Internet").flat(0.0).fee(2001, 5, 20, 200.0))
        .build()
        .unwrap();

    let report = setup.recalculate().unwrap();
    let json = serde_json::to_value(&report).unwrap();

    assert_eq!(json["cutoff"], "1970-01-01T00:00:00Z");
    assert_eq!(json["services"][0]["committed"], 200.0);
    assert_eq!(json["services"][0]["evaluations"][0]["classification"], "Flat");
}
