//! Seat inventory, admission, waitlists and the booking registry.

pub mod error;
pub mod seat_inventory;
pub mod booking;
pub mod allocation;
pub mod waitlist;
pub mod audit;
pub mod reservation_system;

pub use error::{AppResult, ReservationError};
pub use seat_inventory::{BerthKind, Coach, Seat, SeatId, SeatInventory};
pub use booking::{
    Booking, BookingRegistry, Gender, Passenger, PassengerKey, PassengerRequest, PassengerStatus,
    Pnr, SeatAssignment,
};
pub use allocation::AllocationEngine;
pub use waitlist::{Promotion, PromotionKind, WaitQueue, WaitlistManager};
pub use audit::{
    build_audit_event, AuditAction, AuditEvent, AuditSink, InMemoryAuditSink, SharedAuditSink,
};
pub use reservation_system::{
    AvailabilityReport, CancelOutcome, CapacityCounters, CoachAvailability, ReservationSystem,
    SeatAvailability,
};
