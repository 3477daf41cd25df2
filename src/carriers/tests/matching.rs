use super::common::*;
use crate::carriers::domain::DestinationRule;

#[test]
fn empty_rule_matches_every_address() {
    let rule = DestinationRule::default();
    assert!(rule.accepts(&madrid()));
    assert!(rule.accepts(&lisbon()));
    assert!(rule.accepts(&chicago()));
}

#[test]
fn country_matching_ignores_case() {
    let rule = destination(&["es", "PT"]);
    assert!(rule.accepts(&madrid()));
    assert!(rule.accepts(&lisbon()));
    assert!(!rule.accepts(&chicago()));
}

#[test]
fn state_criterion_rejects_addresses_without_a_state() {
    let rule = DestinationRule {
        states: vec!["Madrid".to_string()],
        ..DestinationRule::default()
    };

    assert!(rule.accepts(&madrid()));

    let mut stateless = madrid();
    stateless.state = None;
    assert!(!rule.accepts(&stateless));

    assert!(!rule.accepts(&lisbon()));
}

#[test]
fn zip_criterion_matches_on_prefix() {
    let rule = DestinationRule {
        zip_prefixes: vec!["28".to_string()],
        ..DestinationRule::default()
    };

    assert!(rule.accepts(&madrid()));

    let mut elsewhere = madrid();
    elsewhere.zip = Some("08001".to_string());
    assert!(!rule.accepts(&elsewhere));

    let mut ziploss = madrid();
    ziploss.zip = None;
    assert!(!rule.accepts(&ziploss));
}

#[test]
fn every_populated_criterion_must_accept() {
    let rule = DestinationRule {
        countries: vec!["ES".to_string()],
        zip_prefixes: vec!["28".to_string()],
        ..DestinationRule::default()
    };

    assert!(rule.accepts(&madrid()));

    let mut wrong_zip = madrid();
    wrong_zip.zip = Some("41001".to_string());
    assert!(!rule.accepts(&wrong_zip));
}
