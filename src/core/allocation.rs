//! Per-passenger admission: confirmed seat, RAC, or waiting list.
//!
//! The engine owns the seat inventory together with the confirmed-seat
//! counters so that every site that occupies or frees a seat also moves
//! `confirmed_count`. The two must never drift: the admission guard reads
//! the counter, not the number of free seats.

use crate::core::booking::{Passenger, PassengerKey, PassengerStatus, SeatAssignment};
use crate::core::seat_inventory::{BerthKind, SeatId, SeatInventory};
use crate::core::waitlist::{WaitQueue, WaitlistManager};
use crate::core::ReservationError;

/// Passengers younger than this travel without a seat.
pub const NO_SEAT_AGE_LIMIT: u32 = 5;
/// Passengers this age or older are given a lower berth.
pub const SENIOR_CITIZEN_AGE: u32 = 60;

/// Seat allocator with confirmed-capacity accounting.
#[derive(Debug, Clone)]
pub struct AllocationEngine {
    inventory: SeatInventory,
    confirmed_count: u32,
    total_confirmed_seats: u32,
}

impl AllocationEngine {
    /// Create an engine over `inventory` with the given confirmed capacity.
    ///
    /// Seats already occupied in `inventory` count towards `confirmed_count`.
    #[must_use]
    pub fn new(inventory: SeatInventory, total_confirmed_seats: u32) -> Self {
        let confirmed_count = u32::try_from(inventory.occupied_count()).unwrap_or(u32::MAX);
        Self {
            inventory,
            confirmed_count,
            total_confirmed_seats,
        }
    }

    /// Seat inventory.
    #[must_use]
    pub const fn inventory(&self) -> &SeatInventory {
        &self.inventory
    }

    /// Passengers currently holding a seat.
    #[must_use]
    pub const fn confirmed_count(&self) -> u32 {
        self.confirmed_count
    }

    /// Confirmed capacity.
    #[must_use]
    pub const fn total_confirmed_seats(&self) -> u32 {
        self.total_confirmed_seats
    }

    /// Whether another passenger may be confirmed.
    #[must_use]
    pub const fn has_confirmed_capacity(&self) -> bool {
        self.confirmed_count < self.total_confirmed_seats
    }

    /// Berth kind to search for first: seniors always get `Lower`.
    #[must_use]
    pub const fn effective_preference(passenger: &Passenger) -> BerthKind {
        if passenger.age >= SENIOR_CITIZEN_AGE {
            BerthKind::Lower
        } else {
            passenger.berth_preference
        }
    }

    /// Decide one passenger's outcome and apply it.
    ///
    /// Children under 5 get `NoSeat`. Otherwise, while confirmed capacity
    /// remains, the first free seat of the effective preference is taken,
    /// falling back to the first free seat of any kind. Without capacity the
    /// passenger joins RAC if it has room, else the waiting list.
    pub fn allocate_one<Q: WaitQueue<PassengerKey>>(
        &mut self,
        key: PassengerKey,
        passenger: &mut Passenger,
        waitlist: &mut WaitlistManager<Q>,
    ) -> PassengerStatus {
        if passenger.age < NO_SEAT_AGE_LIMIT {
            passenger.status = PassengerStatus::NoSeat;
            tracing::debug!(pnr = %key.pnr, name = %passenger.name, "child under 5, no seat");
            return passenger.status;
        }

        if self.has_confirmed_capacity() && self.assign_confirmed_seat(passenger).is_some() {
            return passenger.status;
        }

        if waitlist.has_rac_capacity() {
            passenger.status = PassengerStatus::Rac;
            tracing::debug!(pnr = %key.pnr, name = %passenger.name, "added to RAC");
            waitlist.enqueue_rac(key);
        } else {
            passenger.status = PassengerStatus::Waiting;
            tracing::debug!(pnr = %key.pnr, name = %passenger.name, "added to waiting list");
            waitlist.enqueue_waiting(key);
        }
        passenger.status
    }

    /// Occupy a seat for `passenger` and mark it confirmed.
    ///
    /// Does not check the confirmed-capacity guard; callers do. Returns
    /// `None` when no physical seat is free.
    pub fn assign_confirmed_seat(&mut self, passenger: &mut Passenger) -> Option<SeatAssignment> {
        let preferred = Self::effective_preference(passenger);
        let seat = self
            .inventory
            .find_seat_by_preference(preferred)
            .or_else(|| self.inventory.find_any_seat())?;

        if let Err(err) = self.inventory.mark_occupied(seat, &passenger.name) {
            tracing::error!(%seat, error = %err, "seat scan returned an unusable seat");
            return None;
        }
        let berth = self.inventory.seat(seat).map_or(preferred, |s| s.berth());
        let assignment = SeatAssignment { seat, berth };
        passenger.status = PassengerStatus::Confirmed(assignment);
        self.confirmed_count += 1;
        tracing::debug!(name = %passenger.name, %seat, %berth, "seat confirmed");
        Some(assignment)
    }

    /// Free a confirmed seat and give its capacity back. Returns `false`
    /// when the seat was already free, in which case no capacity moves.
    ///
    /// # Errors
    ///
    /// `SeatNotFound` if the seat does not exist. Nothing changes in that case.
    pub fn release(&mut self, seat: SeatId) -> Result<bool, ReservationError> {
        if self.inventory.mark_free(seat)?.is_none() {
            tracing::warn!(%seat, "released a seat that was already free");
            return Ok(false);
        }
        self.confirmed_count = self.confirmed_count.saturating_sub(1);
        Ok(true)
    }

    /// Append a cabin to the coach at `coach_index` and raise capacity by 8.
    ///
    /// # Errors
    ///
    /// `NoCoaches` or `CoachNotFound`; capacity is unchanged on error.
    pub fn grow_by_cabin(&mut self, coach_index: usize) -> Result<u32, ReservationError> {
        let added = self.inventory.grow_by_cabin(coach_index)?;
        self.total_confirmed_seats += added;
        Ok(added)
    }

    /// Append a coach and raise capacity by 16.
    pub fn grow_by_coach(&mut self) -> u32 {
        let added = self.inventory.grow_by_coach();
        self.total_confirmed_seats += added;
        added
    }
}
