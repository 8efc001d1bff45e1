//! Tests for configuration validation

use std::collections::HashMap;

use railway_reservation::config::ReservationConfig;

#[test]
fn test_default_config_is_valid() {
    let config = ReservationConfig::default();
    assert!(config.validate().is_ok());
    assert_eq!(config.initial_coaches, 1);
    assert_eq!(config.initial_confirmed_seats, 14);
    assert_eq!(config.rac_limit, 2);
}

#[test]
fn test_config_invalid_rac_limit() {
    let invalid = ReservationConfig {
        rac_limit: 0,
        ..ReservationConfig::default()
    };
    assert!(invalid.validate().is_err());
}

#[test]
fn test_config_invalid_queue_depth() {
    let invalid = ReservationConfig {
        command_queue_depth: 0,
        ..ReservationConfig::default()
    };
    assert!(invalid.validate().is_err());
}

#[test]
fn test_config_confirmed_seats_exceed_physical() {
    let invalid = ReservationConfig {
        initial_confirmed_seats: 17,
        ..ReservationConfig::default()
    };
    assert!(invalid.validate().is_err());

    let valid = ReservationConfig {
        initial_coaches: 2,
        initial_confirmed_seats: 32,
        ..ReservationConfig::default()
    };
    assert!(valid.validate().is_ok());
}

#[test]
fn test_config_zero_coaches() {
    let valid = ReservationConfig {
        initial_coaches: 0,
        initial_confirmed_seats: 0,
        ..ReservationConfig::default()
    };
    assert!(valid.validate().is_ok());
}

#[test]
fn test_config_from_json() {
    let json = r#"{
        "initial_coaches": 2,
        "initial_confirmed_seats": 30,
        "rac_limit": 4
    }"#;

    let config = ReservationConfig::from_json_str(json).unwrap();
    assert_eq!(config.initial_coaches, 2);
    assert_eq!(config.rac_limit, 4);
    assert_eq!(config.audit_capacity, 256);
}

#[test]
fn test_config_from_json_invalid() {
    assert!(ReservationConfig::from_json_str("{").is_err());
    assert!(ReservationConfig::from_json_str(r#"{"rac_limit": 0}"#).is_err());
}

#[test]
fn test_config_from_lookup() {
    let vars: HashMap<&str, &str> = HashMap::from([
        ("RESERVATION_RAC_LIMIT", "3"),
        ("RESERVATION_INITIAL_CONFIRMED_SEATS", " 16 "),
    ]);
    let config =
        ReservationConfig::from_lookup(|name| vars.get(name).map(|v| (*v).to_string())).unwrap();
    assert_eq!(config.rac_limit, 3);
    assert_eq!(config.initial_confirmed_seats, 16);
    assert_eq!(config.initial_coaches, 1);
}

#[test]
fn test_config_from_lookup_rejects_garbage() {
    let err = ReservationConfig::from_lookup(|name| {
        (name == "RESERVATION_RAC_LIMIT").then(|| "many".to_string())
    })
    .unwrap_err();
    assert!(err.to_string().contains("RESERVATION_RAC_LIMIT"));
}
