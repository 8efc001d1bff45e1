//! Command surface and serialized execution of the engine.

pub mod api;
pub mod shared;
#[cfg(not(target_arch = "wasm32"))]
pub mod service;

pub use api::{dispatch, Command, CommandResponse};
pub use shared::SharedReservation;
#[cfg(not(target_arch = "wasm32"))]
pub use service::ReservationService;
