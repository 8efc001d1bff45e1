//! The reservation engine: one owned instance of inventory, queues and
//! bookings, driven one command at a time.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::ReservationConfig;
use crate::core::allocation::AllocationEngine;
use crate::core::audit::{build_audit_event, AuditAction, AuditSink};
use crate::core::booking::{
    Booking, BookingRegistry, Passenger, PassengerKey, PassengerRequest, PassengerStatus, Pnr,
};
use crate::core::seat_inventory::{BerthKind, SeatInventory};
use crate::core::waitlist::{Promotion, PromotionKind, WaitQueue, WaitlistManager};
use crate::core::ReservationError;
use crate::infra::queue::InMemoryQueue;

/// Capacity counters reported with availability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapacityCounters {
    /// Passengers holding a seat.
    pub confirmed: u32,
    /// Confirmed capacity.
    pub total_confirmed_seats: u32,
    /// Passengers in RAC.
    pub rac: usize,
    /// RAC capacity.
    pub rac_limit: usize,
    /// Passengers on the waiting list.
    pub waiting: usize,
}

impl fmt::Display for CapacityCounters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Confirmed: {}/{} | RAC: {}/{} | Waiting: {}",
            self.confirmed, self.total_confirmed_seats, self.rac, self.rac_limit, self.waiting
        )
    }
}

/// One seat in an availability dump.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatAvailability {
    /// Cabin number.
    pub cabin: u32,
    /// Seat number within the cabin.
    pub seat: u32,
    /// Berth kind.
    pub berth: BerthKind,
    /// Occupant name, when taken.
    pub occupant: Option<String>,
}

/// One coach in an availability dump.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoachAvailability {
    /// Coach number.
    pub number: u32,
    /// Seats in scan order.
    pub seats: Vec<SeatAvailability>,
}

/// Full seat occupancy dump plus summary counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityReport {
    /// Coaches in creation order.
    pub coaches: Vec<CoachAvailability>,
    /// Summary counters.
    pub counters: CapacityCounters,
}

impl AvailabilityReport {
    /// Number of free seats across all coaches.
    #[must_use]
    pub fn free_seats(&self) -> usize {
        self.coaches
            .iter()
            .flat_map(|c| &c.seats)
            .filter(|s| s.occupant.is_none())
            .count()
    }
}

impl fmt::Display for AvailabilityReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Available Seats:")?;
        for coach in &self.coaches {
            writeln!(f, "Coach {}:", coach.number)?;
            for seat in &coach.seats {
                let state = if seat.occupant.is_some() {
                    "seat is occupied"
                } else {
                    "seat is free"
                };
                writeln!(
                    f,
                    "  Cabin {} Seat {} ({}) {state}",
                    seat.cabin, seat.seat, seat.berth
                )?;
            }
        }
        write!(f, "{}", self.counters)
    }
}

/// Result of a cancellation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancelOutcome {
    /// Cancelled booking.
    pub pnr: Pnr,
    /// Confirmed seats freed by this booking.
    pub released_seats: usize,
    /// Promotions the cascade performed, in order.
    pub promotions: Vec<Promotion>,
}

impl fmt::Display for CancelOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Booking with PNR {} cancelled.", self.pnr)?;
        for promotion in &self.promotions {
            write!(f, "\n{promotion}")?;
        }
        Ok(())
    }
}

/// Seat inventory, waitlists and bookings behind one command surface.
///
/// Every public mutating method runs to completion and leaves the engine
/// consistent; errors are returned before anything is changed.
pub struct ReservationSystem<Q = InMemoryQueue<PassengerKey>> {
    engine: AllocationEngine,
    waitlist: WaitlistManager<Q>,
    registry: BookingRegistry,
    audit: Option<Box<dyn AuditSink>>,
}

impl ReservationSystem {
    /// Create an engine from configuration with in-memory queues.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` if the configuration does not validate.
    pub fn new(config: &ReservationConfig) -> Result<Self, ReservationError> {
        Self::with_queues(config, InMemoryQueue::new(), InMemoryQueue::new())
    }
}

impl Default for ReservationSystem {
    /// One coach of 16 seats, 14 confirmed seats, RAC limit 2.
    fn default() -> Self {
        let config = ReservationConfig::default();
        Self::from_parts(
            AllocationEngine::new(
                SeatInventory::with_coaches(config.initial_coaches),
                config.initial_confirmed_seats,
            ),
            WaitlistManager::new(config.rac_limit),
        )
    }
}

impl<Q: WaitQueue<PassengerKey>> ReservationSystem<Q> {
    /// Create an engine from configuration over caller-supplied queues.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` if the configuration does not validate.
    pub fn with_queues(config: &ReservationConfig, rac: Q, waiting: Q) -> Result<Self, ReservationError> {
        config.validate()?;
        let engine = AllocationEngine::new(
            SeatInventory::with_coaches(config.initial_coaches),
            config.initial_confirmed_seats,
        );
        Ok(Self::from_parts(
            engine,
            WaitlistManager::with_queues(rac, waiting, config.rac_limit),
        ))
    }

    /// Assemble an engine from already-built components.
    pub fn from_parts(engine: AllocationEngine, waitlist: WaitlistManager<Q>) -> Self {
        Self {
            engine,
            waitlist,
            registry: BookingRegistry::new(),
            audit: None,
        }
    }

    /// Attach an audit sink.
    #[must_use]
    pub fn with_audit(mut self, audit: Box<dyn AuditSink>) -> Self {
        self.audit = Some(audit);
        self
    }

    /// Allocation engine and seat inventory.
    pub const fn engine(&self) -> &AllocationEngine {
        &self.engine
    }

    /// RAC and waiting queues.
    pub const fn waitlist(&self) -> &WaitlistManager<Q> {
        &self.waitlist
    }

    /// Live bookings.
    pub const fn registry(&self) -> &BookingRegistry {
        &self.registry
    }

    fn record(
        &mut self,
        action: AuditAction,
        pnr: Option<&Pnr>,
        passenger: Option<&str>,
        detail: Option<String>,
    ) {
        if let Some(sink) = self.audit.as_mut() {
            sink.record(build_audit_event(
                action,
                pnr.map(Pnr::as_str),
                passenger,
                detail,
            ));
        }
    }

    /// Book a group of passengers under a new PNR.
    ///
    /// Passengers are allocated one by one in input order; there is no
    /// group rollback, so some members may be confirmed while others wait.
    ///
    /// # Errors
    ///
    /// `InvalidCommand` for an empty passenger list. No PNR is consumed.
    pub fn book_ticket(&mut self, requests: Vec<PassengerRequest>) -> Result<Pnr, ReservationError> {
        if requests.is_empty() {
            tracing::warn!("rejected booking without passengers");
            return Err(ReservationError::InvalidCommand(
                "booking needs at least one passenger".into(),
            ));
        }

        let pnr = self.registry.next_pnr();
        let mut passengers = Vec::with_capacity(requests.len());
        for (ordinal, request) in requests.into_iter().enumerate() {
            let mut passenger = Passenger::from_request(request);
            let key = PassengerKey {
                pnr: pnr.clone(),
                ordinal,
            };
            let status = self
                .engine
                .allocate_one(key, &mut passenger, &mut self.waitlist);
            let (action, detail) = match status {
                PassengerStatus::Confirmed(a) => {
                    (AuditAction::Confirmed, Some(format!("{} {}", a.berth, a.seat)))
                }
                PassengerStatus::Rac => (AuditAction::Rac, None),
                PassengerStatus::Waiting => (AuditAction::Waiting, None),
                PassengerStatus::NoSeat => (AuditAction::NoSeat, None),
            };
            self.record(action, Some(&pnr), Some(&passenger.name), detail);
            passengers.push(passenger);
        }

        let size = passengers.len();
        self.registry.insert(Booking {
            pnr: pnr.clone(),
            passengers,
        });
        self.record(AuditAction::Booked, Some(&pnr), None, Some(format!("{size} passengers")));
        tracing::info!(%pnr, passengers = size, "booking successful");
        Ok(pnr)
    }

    /// Look up a booking.
    ///
    /// # Errors
    ///
    /// `PnrNotFound` for an unknown or cancelled PNR.
    pub fn show_pnr(&self, pnr: &str) -> Result<&Booking, ReservationError> {
        self.registry.get(pnr)
    }

    /// Cancel a booking, release everything its passengers held, then run
    /// the promotion cascade.
    ///
    /// # Errors
    ///
    /// `PnrNotFound` for an unknown or cancelled PNR; nothing changes.
    pub fn cancel_ticket(&mut self, pnr: &str) -> Result<CancelOutcome, ReservationError> {
        let booking = self.registry.remove(pnr).inspect_err(|_| {
            tracing::warn!(pnr, "cancel of unknown PNR");
        })?;

        let mut released_seats = 0;
        for (ordinal, passenger) in booking.passengers.iter().enumerate() {
            let key = PassengerKey {
                pnr: booking.pnr.clone(),
                ordinal,
            };
            match passenger.status {
                PassengerStatus::Confirmed(a) => match self.engine.release(a.seat) {
                    Ok(true) => released_seats += 1,
                    Ok(false) => {}
                    Err(err) => tracing::error!(%pnr, error = %err, "failed to release seat"),
                },
                PassengerStatus::Rac => {
                    if !self.waitlist.remove_rac(&key) {
                        tracing::error!(%pnr, ordinal, "RAC passenger missing from queue");
                    }
                }
                PassengerStatus::Waiting => {
                    if !self.waitlist.remove_waiting(&key) {
                        tracing::error!(%pnr, ordinal, "waiting passenger missing from queue");
                    }
                }
                PassengerStatus::NoSeat => {}
            }
        }
        tracing::info!(pnr = %booking.pnr, released_seats, "booking cancelled");
        self.record(AuditAction::Cancelled, Some(&booking.pnr), None, None);

        let promotions = self.waitlist.promote(&mut self.engine, &mut self.registry);
        for promotion in &promotions {
            let (action, detail) = match promotion.kind {
                PromotionKind::RacToConfirmed(a) => (
                    AuditAction::PromotedToConfirmed,
                    Some(format!("{} {}", a.berth, a.seat)),
                ),
                PromotionKind::WaitingToRac => (AuditAction::PromotedToRac, None),
            };
            self.record(action, Some(&promotion.passenger.pnr), Some(&promotion.name), detail);
        }

        Ok(CancelOutcome {
            pnr: booking.pnr,
            released_seats,
            promotions,
        })
    }

    /// Append a cabin to the first coach. Returns the new confirmed capacity.
    /// Does not promote waiting passengers.
    ///
    /// # Errors
    ///
    /// `NoCoaches` when no coach exists; capacity is unchanged.
    pub fn add_cabin(&mut self) -> Result<u32, ReservationError> {
        self.engine.grow_by_cabin(0).inspect_err(|err| {
            tracing::warn!(error = %err, "cabin not added");
        })?;
        let total = self.engine.total_confirmed_seats();
        tracing::info!(total_confirmed_seats = total, "new cabin added");
        self.record(AuditAction::CabinAdded, None, None, Some(format!("total {total}")));
        Ok(total)
    }

    /// Append a new coach of 2 cabins. Returns the new confirmed capacity.
    /// Does not promote waiting passengers.
    pub fn add_coach(&mut self) -> u32 {
        self.engine.grow_by_coach();
        let total = self.engine.total_confirmed_seats();
        tracing::info!(total_confirmed_seats = total, "new coach added");
        self.record(AuditAction::CoachAdded, None, None, Some(format!("total {total}")));
        total
    }

    /// Current counters.
    pub fn counters(&self) -> CapacityCounters {
        CapacityCounters {
            confirmed: self.engine.confirmed_count(),
            total_confirmed_seats: self.engine.total_confirmed_seats(),
            rac: self.waitlist.rac_count(),
            rac_limit: self.waitlist.rac_limit(),
            waiting: self.waitlist.waiting_count(),
        }
    }

    /// Seat-by-seat occupancy dump.
    pub fn availability(&self) -> AvailabilityReport {
        let coaches = self
            .engine
            .inventory()
            .coaches()
            .iter()
            .map(|coach| CoachAvailability {
                number: coach.number(),
                seats: coach
                    .seats()
                    .iter()
                    .map(|s| SeatAvailability {
                        cabin: s.id().cabin,
                        seat: s.id().seat,
                        berth: s.berth(),
                        occupant: s.occupant().map(str::to_owned),
                    })
                    .collect(),
            })
            .collect();
        AvailabilityReport {
            coaches,
            counters: self.counters(),
        }
    }

    /// Verify that counters, seats, queues and passenger statuses agree.
    ///
    /// # Errors
    ///
    /// `InvariantViolated` describing the first disagreement found.
    pub fn check_invariants(&self) -> Result<(), ReservationError> {
        let violated =
            |msg: String| -> Result<(), ReservationError> { Err(ReservationError::InvariantViolated(msg)) };
        let counters = self.counters();
        let occupied = self.engine.inventory().occupied_count();

        if usize::try_from(counters.confirmed).ok() != Some(occupied) {
            return violated(format!(
                "confirmed count {} but {occupied} seats occupied",
                counters.confirmed
            ));
        }
        if counters.confirmed > counters.total_confirmed_seats {
            return violated(format!(
                "confirmed count {} exceeds capacity {}",
                counters.confirmed, counters.total_confirmed_seats
            ));
        }
        if counters.rac > counters.rac_limit {
            return violated(format!("RAC holds {} over limit {}", counters.rac, counters.rac_limit));
        }

        let mut tracked = 0;
        for booking in self.registry.bookings() {
            for (ordinal, passenger) in booking.passengers.iter().enumerate() {
                let key = PassengerKey {
                    pnr: booking.pnr.clone(),
                    ordinal,
                };
                let in_rac = self.waitlist.in_rac(&key);
                let in_waiting = self.waitlist.in_waiting(&key);
                let consistent = match passenger.status {
                    PassengerStatus::Confirmed(a) => {
                        tracked += 1;
                        !in_rac
                            && !in_waiting
                            && self
                                .engine
                                .inventory()
                                .seat(a.seat)
                                .is_some_and(|s| s.occupant() == Some(passenger.name.as_str()))
                    }
                    PassengerStatus::Rac => {
                        tracked += 1;
                        in_rac && !in_waiting
                    }
                    PassengerStatus::Waiting => {
                        tracked += 1;
                        in_waiting && !in_rac
                    }
                    PassengerStatus::NoSeat => !in_rac && !in_waiting,
                };
                if !consistent {
                    return violated(format!(
                        "{} passenger {} of {} is {} but pools disagree",
                        passenger.name, ordinal, booking.pnr, passenger.status
                    ));
                }
            }
        }

        let pooled = occupied + counters.rac + counters.waiting;
        if tracked != pooled {
            return violated(format!(
                "{tracked} passengers tracked but {pooled} pool entries exist"
            ));
        }
        Ok(())
    }
}
