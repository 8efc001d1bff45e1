//! Configuration models for the reservation engine.

pub mod reservation;

pub use reservation::{ReservationConfig, ENV_PREFIX};
