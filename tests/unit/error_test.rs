//! Tests for error types

use railway_reservation::core::{ReservationError, SeatId};

#[test]
fn test_pnr_not_found_error() {
    let err = ReservationError::PnrNotFound("PNR42".to_string());
    assert_eq!(format!("{}", err), "invalid PNR: PNR42");
}

#[test]
fn test_no_coaches_error() {
    let err = ReservationError::NoCoaches;
    assert_eq!(format!("{}", err), "no coaches available, add a coach first");
}

#[test]
fn test_invalid_command_error() {
    let err = ReservationError::InvalidCommand("fly".to_string());
    assert_eq!(format!("{}", err), "invalid command: fly");
}

#[test]
fn test_seat_errors() {
    let err = ReservationError::SeatOccupied(SeatId::new(1, 2, 3));
    assert_eq!(format!("{}", err), "seat Coach 1 | Cabin 2 | Seat 3 already occupied");
}

#[test]
fn test_errors_convert_into_anyhow() {
    let err: anyhow::Error = ReservationError::ServiceStopped.into();
    assert_eq!(err.to_string(), "reservation service stopped");
}
