//! Physical seat inventory grouped by coach and cabin.
//!
//! The inventory only knows about seats: which exist, which berth kind each
//! has, and who sits where. Capacity counters are owned by the allocation
//! engine, so marking a seat occupied or free never touches them.
//!
//! Scan order is part of the contract. Coaches are scanned in creation order
//! and, within a coach, seats in append order; the first match wins.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::ReservationError;

/// Seats per cabin.
pub const SEATS_PER_CABIN: u32 = 8;
/// Cabins a freshly added coach starts with.
pub const CABINS_PER_NEW_COACH: u32 = 2;
/// Seats a freshly added coach starts with.
pub const SEATS_PER_NEW_COACH: u32 = SEATS_PER_CABIN * CABINS_PER_NEW_COACH;

/// Physical berth category, fixed when a seat is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BerthKind {
    /// Lower berth.
    Lower,
    /// Middle berth.
    Middle,
    /// Upper berth.
    Upper,
    /// Side lower berth.
    SideLower,
    /// Side upper berth.
    SideUpper,
}

impl BerthKind {
    /// Normalize a raw berth preference into a canonical kind.
    ///
    /// The first letter decides (case-insensitive): `L`, `M`, `U` map to
    /// their berth, `S` maps to `SideUpper` when the input also contains a
    /// `U` and to `SideLower` otherwise. Anything else, including empty
    /// input, falls back to `Lower`.
    #[must_use]
    pub fn from_preference(raw: &str) -> Self {
        let upper = raw.trim().to_ascii_uppercase();
        match upper.chars().next() {
            Some('L') => Self::Lower,
            Some('M') => Self::Middle,
            Some('U') => Self::Upper,
            Some('S') if upper.contains('U') => Self::SideUpper,
            Some('S') => Self::SideLower,
            _ => Self::Lower,
        }
    }

    /// Berth kind of the seat at 1-based position `seat_number` in a cabin.
    ///
    /// Seats 1 and 4 are lower, 2 and 5 middle, 3 and 6 upper, 7 side lower
    /// and 8 side upper.
    #[must_use]
    pub const fn for_cabin_position(seat_number: u32) -> Self {
        match seat_number {
            2 | 5 => Self::Middle,
            3 | 6 => Self::Upper,
            7 => Self::SideLower,
            8 => Self::SideUpper,
            _ => Self::Lower,
        }
    }
}

impl fmt::Display for BerthKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Lower => "Lower",
            Self::Middle => "Middle",
            Self::Upper => "Upper",
            Self::SideLower => "SideLower",
            Self::SideUpper => "SideUpper",
        };
        f.write_str(label)
    }
}

/// Unique physical address of a seat. All numbers are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SeatId {
    /// Coach number.
    pub coach: u32,
    /// Cabin number within the coach.
    pub cabin: u32,
    /// Seat number within the cabin.
    pub seat: u32,
}

impl SeatId {
    /// Build a seat address.
    #[must_use]
    pub const fn new(coach: u32, cabin: u32, seat: u32) -> Self {
        Self { coach, cabin, seat }
    }
}

impl fmt::Display for SeatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Coach {} | Cabin {} | Seat {}", self.coach, self.cabin, self.seat)
    }
}

/// A single seat with its fixed berth kind and current occupant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seat {
    id: SeatId,
    berth: BerthKind,
    occupant: Option<String>,
}

impl Seat {
    fn new(id: SeatId, berth: BerthKind) -> Self {
        Self {
            id,
            berth,
            occupant: None,
        }
    }

    /// Seat address.
    #[must_use]
    pub const fn id(&self) -> SeatId {
        self.id
    }

    /// Berth kind assigned at creation.
    #[must_use]
    pub const fn berth(&self) -> BerthKind {
        self.berth
    }

    /// Whether a passenger currently holds this seat.
    #[must_use]
    pub const fn is_occupied(&self) -> bool {
        self.occupant.is_some()
    }

    /// Name of the passenger holding this seat, if any.
    #[must_use]
    pub fn occupant(&self) -> Option<&str> {
        self.occupant.as_deref()
    }
}

/// A coach: an ordered run of seats, grown one cabin at a time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coach {
    number: u32,
    seats: Vec<Seat>,
}

impl Coach {
    fn with_cabins(number: u32, cabins: u32) -> Self {
        let mut coach = Self {
            number,
            seats: Vec::with_capacity((cabins * SEATS_PER_CABIN) as usize),
        };
        for _ in 0..cabins {
            coach.append_cabin();
        }
        coach
    }

    /// Append 8 seats under the next cabin number and return that number.
    fn append_cabin(&mut self) -> u32 {
        let cabin = self.cabin_count() + 1;
        self.seats.extend((1..=SEATS_PER_CABIN).map(|seat| {
            Seat::new(
                SeatId::new(self.number, cabin, seat),
                BerthKind::for_cabin_position(seat),
            )
        }));
        cabin
    }

    /// Coach number.
    #[must_use]
    pub const fn number(&self) -> u32 {
        self.number
    }

    /// Number of whole cabins in this coach.
    #[must_use]
    pub fn cabin_count(&self) -> u32 {
        u32::try_from(self.seats.len()).unwrap_or(u32::MAX) / SEATS_PER_CABIN
    }

    /// Seats in append order.
    #[must_use]
    pub fn seats(&self) -> &[Seat] {
        &self.seats
    }
}

/// Owner of every seat ever created.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatInventory {
    coaches: Vec<Coach>,
}

impl SeatInventory {
    /// Create an empty inventory with no coaches.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            coaches: Vec::new(),
        }
    }

    /// Create an inventory with `coaches` standard coaches of 2 cabins each.
    #[must_use]
    pub fn with_coaches(coaches: u32) -> Self {
        let mut inventory = Self::new();
        for _ in 0..coaches {
            inventory.grow_by_coach();
        }
        inventory
    }

    /// Coaches in creation order.
    #[must_use]
    pub fn coaches(&self) -> &[Coach] {
        &self.coaches
    }

    /// Iterate all seats in scan order.
    pub fn seats(&self) -> impl Iterator<Item = &Seat> {
        self.coaches.iter().flat_map(|c| c.seats.iter())
    }

    /// Total physical seats.
    #[must_use]
    pub fn seat_count(&self) -> usize {
        self.coaches.iter().map(|c| c.seats.len()).sum()
    }

    /// Seats currently occupied.
    #[must_use]
    pub fn occupied_count(&self) -> usize {
        self.seats().filter(|s| s.is_occupied()).count()
    }

    /// Look up a seat by address.
    #[must_use]
    pub fn seat(&self, id: SeatId) -> Option<&Seat> {
        self.seats().find(|s| s.id == id)
    }

    /// First free seat of the given berth kind in scan order.
    #[must_use]
    pub fn find_seat_by_preference(&self, kind: BerthKind) -> Option<SeatId> {
        self.seats()
            .find(|s| !s.is_occupied() && s.berth == kind)
            .map(Seat::id)
    }

    /// First free seat of any kind in scan order.
    #[must_use]
    pub fn find_any_seat(&self) -> Option<SeatId> {
        self.seats().find(|s| !s.is_occupied()).map(Seat::id)
    }

    fn seat_mut(&mut self, id: SeatId) -> Option<&mut Seat> {
        self.coaches
            .iter_mut()
            .flat_map(|c| c.seats.iter_mut())
            .find(|s| s.id == id)
    }

    /// Record `occupant` as holding the seat.
    ///
    /// # Errors
    ///
    /// `SeatNotFound` if no such seat exists, `SeatOccupied` if it is taken.
    pub fn mark_occupied(&mut self, id: SeatId, occupant: &str) -> Result<(), ReservationError> {
        let seat = self.seat_mut(id).ok_or(ReservationError::SeatNotFound(id))?;
        if seat.is_occupied() {
            return Err(ReservationError::SeatOccupied(id));
        }
        seat.occupant = Some(occupant.to_owned());
        Ok(())
    }

    /// Release the seat and return the name of whoever held it.
    ///
    /// # Errors
    ///
    /// `SeatNotFound` if no such seat exists.
    pub fn mark_free(&mut self, id: SeatId) -> Result<Option<String>, ReservationError> {
        let seat = self.seat_mut(id).ok_or(ReservationError::SeatNotFound(id))?;
        Ok(seat.occupant.take())
    }

    /// Append a cabin of 8 seats to the coach at `coach_index` (0-based).
    /// Returns the number of seats added.
    ///
    /// # Errors
    ///
    /// `NoCoaches` when the inventory is empty, `CoachNotFound` when the
    /// index is past the last coach.
    pub fn grow_by_cabin(&mut self, coach_index: usize) -> Result<u32, ReservationError> {
        if self.coaches.is_empty() {
            return Err(ReservationError::NoCoaches);
        }
        let coach = self
            .coaches
            .get_mut(coach_index)
            .ok_or(ReservationError::CoachNotFound(coach_index))?;
        let cabin = coach.append_cabin();
        tracing::debug!(coach = coach.number, cabin, "appended cabin");
        Ok(SEATS_PER_CABIN)
    }

    /// Append a new coach with 2 cabins. Returns the number of seats added.
    pub fn grow_by_coach(&mut self) -> u32 {
        let number = u32::try_from(self.coaches.len()).unwrap_or(u32::MAX - 1) + 1;
        self.coaches
            .push(Coach::with_cabins(number, CABINS_PER_NEW_COACH));
        tracing::debug!(coach = number, "appended coach");
        SEATS_PER_NEW_COACH
    }
}
