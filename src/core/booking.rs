//! Bookings, passengers and the PNR-keyed registry.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::seat_inventory::{BerthKind, SeatId};
use crate::core::ReservationError;

/// Booking identifier: `PNR` followed by a decimal counter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pnr(String);

impl Pnr {
    /// Format the PNR for counter value `n`.
    #[must_use]
    pub fn from_counter(n: u64) -> Self {
        Self(format!("PNR{n}"))
    }

    /// PNR as text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Pnr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Pnr {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

/// Identity of a passenger: owning booking plus position in it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PassengerKey {
    /// Owning booking.
    pub pnr: Pnr,
    /// 0-based position within the booking.
    pub ordinal: usize,
}

/// Passenger gender, taken from the first letter of the raw input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    /// `M...`
    Male,
    /// `F...`
    Female,
    /// Anything else.
    Other,
}

impl Gender {
    /// Parse a raw gender string.
    #[must_use]
    pub fn from_raw(raw: &str) -> Self {
        match raw.trim().chars().next().map(|c| c.to_ascii_uppercase()) {
            Some('M') => Self::Male,
            Some('F') => Self::Female,
            _ => Self::Other,
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Male => "M",
            Self::Female => "F",
            Self::Other => "O",
        })
    }
}

/// Seat handed to a confirmed passenger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatAssignment {
    /// Seat address.
    pub seat: SeatId,
    /// Berth kind of that seat.
    pub berth: BerthKind,
}

/// Where a passenger currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PassengerStatus {
    /// Holds a seat.
    Confirmed(SeatAssignment),
    /// In the RAC queue.
    Rac,
    /// In the waiting queue.
    Waiting,
    /// Child under 5; travels without a seat.
    NoSeat,
}

impl PassengerStatus {
    /// Assigned seat, when confirmed.
    #[must_use]
    pub const fn assignment(&self) -> Option<SeatAssignment> {
        match self {
            Self::Confirmed(a) => Some(*a),
            _ => None,
        }
    }
}

impl fmt::Display for PassengerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Confirmed(_) => f.write_str("Confirmed"),
            Self::Rac => f.write_str("RAC"),
            Self::Waiting => f.write_str("Waiting"),
            Self::NoSeat => f.write_str("No Seat (Child < 5)"),
        }
    }
}

/// Raw passenger details as supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassengerRequest {
    /// Passenger name.
    pub name: String,
    /// Age in years.
    pub age: u32,
    /// Raw gender text (`M`/`F`).
    pub gender: String,
    /// Raw berth preference (`L`/`M`/`U`/`SL`/`SU`).
    pub berth_preference: String,
}

impl PassengerRequest {
    /// Convenience constructor.
    pub fn new(
        name: impl Into<String>,
        age: u32,
        gender: impl Into<String>,
        berth_preference: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            age,
            gender: gender.into(),
            berth_preference: berth_preference.into(),
        }
    }
}

/// A passenger owned by exactly one booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Passenger {
    /// Passenger name.
    pub name: String,
    /// Age in years.
    pub age: u32,
    /// Gender, normalized from the first letter of the raw text. Booking
    /// details render it as `M`/`F`/`O`, so `"Male"` prints as `M`.
    pub gender: Gender,
    /// Normalized berth preference.
    pub berth_preference: BerthKind,
    /// Current status; only the allocation engine and waitlist change it.
    pub status: PassengerStatus,
}

impl Passenger {
    /// Build a passenger from raw input, normalizing preference and gender.
    /// The initial status is `Waiting` until allocation decides.
    #[must_use]
    pub fn from_request(request: PassengerRequest) -> Self {
        Self {
            berth_preference: BerthKind::from_preference(&request.berth_preference),
            gender: Gender::from_raw(&request.gender),
            name: request.name,
            age: request.age,
            status: PassengerStatus::Waiting,
        }
    }
}

/// A booking and the passengers it exclusively owns, in request order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    /// Booking identifier.
    pub pnr: Pnr,
    /// Passengers in request order.
    pub passengers: Vec<Passenger>,
}

impl fmt::Display for Booking {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "PNR: {}", self.pnr)?;
        writeln!(f, "{}", "=".repeat(50))?;
        for p in &self.passengers {
            writeln!(f, "Name: {}", p.name)?;
            writeln!(f, "   Age: {} | Gender: {}", p.age, p.gender)?;
            match p.status {
                PassengerStatus::Confirmed(a) => {
                    writeln!(f, "   Berth: {} | Status: {}", a.berth, p.status)?;
                    writeln!(f, "   {}", a.seat)?;
                }
                _ => writeln!(f, "   Berth: NA | Status: {}", p.status)?,
            }
        }
        Ok(())
    }
}

/// PNR-keyed store of live bookings plus the PNR counter.
#[derive(Debug, Default)]
pub struct BookingRegistry {
    bookings: HashMap<Pnr, Booking>,
    pnr_counter: u64,
}

impl BookingRegistry {
    /// Create an empty registry; the first PNR issued is `PNR1`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue the next PNR. Counters are never reused.
    pub fn next_pnr(&mut self) -> Pnr {
        self.pnr_counter += 1;
        Pnr::from_counter(self.pnr_counter)
    }

    /// Store a completed booking.
    pub fn insert(&mut self, booking: Booking) {
        self.bookings.insert(booking.pnr.clone(), booking);
    }

    /// Look up a booking.
    ///
    /// # Errors
    ///
    /// `PnrNotFound` if no live booking has that PNR.
    pub fn get(&self, pnr: &str) -> Result<&Booking, ReservationError> {
        self.bookings
            .get(&Pnr::from(pnr))
            .ok_or_else(|| ReservationError::PnrNotFound(pnr.to_owned()))
    }

    /// Remove and return a booking.
    ///
    /// # Errors
    ///
    /// `PnrNotFound` if no live booking has that PNR.
    pub fn remove(&mut self, pnr: &str) -> Result<Booking, ReservationError> {
        self.bookings
            .remove(&Pnr::from(pnr))
            .ok_or_else(|| ReservationError::PnrNotFound(pnr.to_owned()))
    }

    /// Mutable access to one passenger.
    pub fn passenger_mut(&mut self, key: &PassengerKey) -> Option<&mut Passenger> {
        self.bookings
            .get_mut(&key.pnr)
            .and_then(|b| b.passengers.get_mut(key.ordinal))
    }

    /// Read access to one passenger.
    #[must_use]
    pub fn passenger(&self, key: &PassengerKey) -> Option<&Passenger> {
        self.bookings
            .get(&key.pnr)
            .and_then(|b| b.passengers.get(key.ordinal))
    }

    /// Live bookings in no particular order.
    pub fn bookings(&self) -> impl Iterator<Item = &Booking> {
        self.bookings.values()
    }

    /// Number of live bookings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bookings.len()
    }

    /// Whether no bookings are live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bookings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn booking(registry: &mut BookingRegistry, names: &[&str]) -> Pnr {
        let pnr = registry.next_pnr();
        let passengers = names
            .iter()
            .map(|n| Passenger::from_request(PassengerRequest::new(*n, 30, "F", "U")))
            .collect();
        registry.insert(Booking {
            pnr: pnr.clone(),
            passengers,
        });
        pnr
    }

    #[test]
    fn test_pnr_counter_never_reused() {
        let mut registry = BookingRegistry::new();
        let first = booking(&mut registry, &["a"]);
        assert_eq!(first.as_str(), "PNR1");
        registry.remove("PNR1").unwrap();
        let second = booking(&mut registry, &["b"]);
        assert_eq!(second.as_str(), "PNR2");
    }

    #[test]
    fn test_lookup_missing_pnr() {
        let mut registry = BookingRegistry::new();
        assert_eq!(
            registry.get("PNR9"),
            Err(ReservationError::PnrNotFound("PNR9".into()))
        );
        assert!(registry.remove("PNR9").is_err());
    }

    #[test]
    fn test_passenger_access_by_key() {
        let mut registry = BookingRegistry::new();
        let pnr = booking(&mut registry, &["a", "b"]);
        let key = PassengerKey { pnr, ordinal: 1 };
        registry.passenger_mut(&key).unwrap().status = PassengerStatus::Rac;
        let p = registry.passenger(&key).unwrap();
        assert_eq!(p.name, "b");
        assert_eq!(p.status, PassengerStatus::Rac);
        assert_eq!(p.berth_preference, BerthKind::Upper);
        assert_eq!(p.gender, Gender::Female);
    }

    #[test]
    fn test_gender_parsing() {
        assert_eq!(Gender::from_raw("m"), Gender::Male);
        assert_eq!(Gender::from_raw("Female"), Gender::Female);
        assert_eq!(Gender::from_raw(""), Gender::Other);
    }

    #[test]
    fn test_booking_renders_normalized_gender() {
        let booking = Booking {
            pnr: Pnr::from("PNR3"),
            passengers: vec![Passenger::from_request(PassengerRequest::new(
                "Ravi", 40, "Male", "U",
            ))],
        };
        let text = booking.to_string();
        assert!(text.contains("   Age: 40 | Gender: M\n"));
        assert!(text.contains("   Berth: NA | Status: Waiting"));
    }
}
