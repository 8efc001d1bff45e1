//! Error types for reservation operations.

use thiserror::Error;

use crate::core::seat_inventory::SeatId;

/// Errors produced by the reservation engine and its command surface.
///
/// Every variant is reported once to the caller; the engine is left in the
/// state it had before the failing operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReservationError {
    /// No booking exists for the given PNR.
    #[error("invalid PNR: {0}")]
    PnrNotFound(String),
    /// A capacity operation needs at least one coach.
    #[error("no coaches available, add a coach first")]
    NoCoaches,
    /// Command text or arguments were not recognised.
    #[error("invalid command: {0}")]
    InvalidCommand(String),
    /// Coach index does not exist in the inventory.
    #[error("coach index {0} out of range")]
    CoachNotFound(usize),
    /// Seat does not exist in the inventory.
    #[error("seat {0} not found")]
    SeatNotFound(SeatId),
    /// Seat is already held by another passenger.
    #[error("seat {0} already occupied")]
    SeatOccupied(SeatId),
    /// Configuration failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// Counters, seats and queues disagree.
    #[error("invariant violated: {0}")]
    InvariantViolated(String),
    /// The serialized command service is no longer accepting commands.
    #[error("reservation service stopped")]
    ServiceStopped,
}

/// Application-facing result using anyhow for higher-level contexts.
pub type AppResult<T> = Result<T, anyhow::Error>;
