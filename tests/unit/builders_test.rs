//! Tests for builder modules

use railway_reservation::builders::ReservationBuilder;
use railway_reservation::config::ReservationConfig;
use railway_reservation::core::{PassengerKey, ReservationError};
use railway_reservation::infra::InMemoryQueue;

#[test]
fn test_builder_defaults() {
    let builder = ReservationBuilder::default();
    assert_eq!(builder.config().rac_limit, 2);

    let system = builder.build().unwrap();
    let counters = system.counters();
    assert_eq!(counters.total_confirmed_seats, 14);
    assert_eq!(system.engine().inventory().seat_count(), 16);
}

#[test]
fn test_builder_rejects_invalid_config() {
    let config = ReservationConfig {
        initial_confirmed_seats: 100,
        ..ReservationConfig::default()
    };
    assert!(matches!(
        ReservationBuilder::new(config).build(),
        Err(ReservationError::InvalidConfig(_))
    ));
}

#[test]
fn test_builder_with_queue_factory() {
    let config = ReservationConfig {
        initial_coaches: 3,
        initial_confirmed_seats: 40,
        rac_limit: 5,
        ..ReservationConfig::default()
    };
    let mut calls = 0;
    let system = ReservationBuilder::new(config)
        .without_audit()
        .build_with_queues(|| {
            calls += 1;
            InMemoryQueue::<PassengerKey>::new()
        })
        .unwrap();

    assert_eq!(calls, 2);
    assert_eq!(system.engine().inventory().coaches().len(), 3);
    assert_eq!(system.counters().rac_limit, 5);
}
