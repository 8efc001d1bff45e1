//! Builders to construct the reservation engine from configuration.

pub mod reservation_builder;

pub use reservation_builder::ReservationBuilder;
