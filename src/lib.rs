//! # Railway Reservation
//!
//! Seat inventory management for a train reservation service: fixed-capacity
//! seats are allocated to passengers grouped into bookings, overflow goes to
//! a two-tier waitlist (RAC, then Waiting), and waitlisted passengers are
//! promoted automatically when a cancellation frees capacity.
//!
//! ## Core Problem Solved
//!
//! This is a small admission-control engine with real invariants:
//!
//! - **Capacity bounds**: confirmed passengers never exceed the confirmed
//!   capacity, RAC never exceeds its limit, and the confirmed counter always
//!   equals the number of occupied seats
//! - **Deterministic seat choice**: the first free seat of the wanted berth
//!   kind in coach, then append order wins; seniors (60+) are steered to a
//!   lower berth, children under 5 travel without a seat
//! - **Fair promotion**: after a cancellation RAC is drained into free seats
//!   and the waiting list into RAC, both strictly in arrival order
//!
//! ## Quick Start
//!
//! ```
//! use railway_reservation::core::{PassengerRequest, PassengerStatus, ReservationSystem};
//!
//! let mut system = ReservationSystem::default();
//! let pnr = system
//!     .book_ticket(vec![
//!         PassengerRequest::new("Asha", 34, "F", "U"),
//!         PassengerRequest::new("Ravi", 67, "M", "U"),
//!         PassengerRequest::new("Mira", 3, "F", "L"),
//!     ])
//!     .unwrap();
//!
//! let booking = system.show_pnr(pnr.as_str()).unwrap();
//! assert!(matches!(booking.passengers[0].status, PassengerStatus::Confirmed(_)));
//! assert_eq!(booking.passengers[2].status, PassengerStatus::NoSeat);
//!
//! let outcome = system.cancel_ticket(pnr.as_str()).unwrap();
//! assert_eq!(outcome.released_seats, 2);
//! ```
//!
//! ## Serialized Access
//!
//! The engine itself is single-threaded and synchronous. To share it, either
//! wrap it in [`runtime::SharedReservation`] (one mutex around every command)
//! or move it onto a [`runtime::ReservationService`] worker fed by a
//! single-consumer command queue.
//!
//! ```
//! use railway_reservation::builders::ReservationBuilder;
//! use railway_reservation::runtime::{Command, CommandResponse, ReservationService};
//!
//! let system = ReservationBuilder::default().build().unwrap();
//! let service = ReservationService::spawn(system, 16).unwrap();
//! let response = service.execute("book Asha 34 F SL".parse().unwrap()).unwrap();
//! assert!(matches!(response, CommandResponse::Booked { .. }));
//! assert_eq!(service.execute(Command::Quit).unwrap(), CommandResponse::Quit);
//! ```

#![deny(warnings)]
#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Seat inventory, allocation, waitlists, bookings and audit.
pub mod core;
/// Configuration models for the engine.
pub mod config;
/// Builders to construct the engine from configuration.
pub mod builders;
/// Infrastructure adapters for waitlist queues.
pub mod infra;
/// Command surface and serialized execution.
pub mod runtime;
/// Shared utilities.
pub mod util;
