//! RAC and waiting queues and the promotion cascade.
//!
//! Both queues are strict FIFO by arrival. After a cancellation the cascade
//! first moves RAC heads into confirmed seats while capacity lasts, then
//! moves waiting heads into RAC while RAC has room. Each phase runs to its
//! own fixpoint. Capacity growth does not trigger promotion.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::allocation::AllocationEngine;
use crate::core::booking::{BookingRegistry, PassengerKey, PassengerStatus, SeatAssignment};
use crate::infra::queue::InMemoryQueue;

/// Abstraction for waitlist queue backends.
pub trait WaitQueue<T>: Send {
    /// Append to the tail.
    fn enqueue(&mut self, entry: T);
    /// Put an entry back at the head.
    fn requeue_front(&mut self, entry: T);
    /// Pop the head (oldest entry).
    fn dequeue(&mut self) -> Option<T>;
    /// Remove an entry by identity, keeping the order of the rest.
    fn remove(&mut self, entry: &T) -> bool;
    /// Whether an entry is queued.
    fn contains(&self, entry: &T) -> bool;
    /// Entries from head to tail.
    fn snapshot(&self) -> Vec<&T>;
    /// Current depth.
    fn len(&self) -> usize;
    /// Whether the queue is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// What a promotion did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PromotionKind {
    /// RAC passenger got a confirmed seat.
    RacToConfirmed(SeatAssignment),
    /// Waiting passenger moved into RAC.
    WaitingToRac,
}

/// A single promotion performed by the cascade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Promotion {
    /// Promoted passenger.
    pub passenger: PassengerKey,
    /// Passenger name, for reporting.
    pub name: String,
    /// What happened.
    pub kind: PromotionKind,
}

impl fmt::Display for Promotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            PromotionKind::RacToConfirmed(a) => write!(
                f,
                "RAC passenger upgraded to Confirmed: {} ({}, {})",
                self.name, a.berth, a.seat
            ),
            PromotionKind::WaitingToRac => {
                write!(f, "Waiting passenger moved to RAC: {}", self.name)
            }
        }
    }
}

/// Owner of the RAC and waiting queues.
#[derive(Debug)]
pub struct WaitlistManager<Q = InMemoryQueue<PassengerKey>> {
    rac: Q,
    waiting: Q,
    rac_limit: usize,
}

impl WaitlistManager {
    /// Create a manager with in-memory queues.
    #[must_use]
    pub const fn new(rac_limit: usize) -> Self {
        Self::with_queues(InMemoryQueue::new(), InMemoryQueue::new(), rac_limit)
    }
}

impl<Q: WaitQueue<PassengerKey>> WaitlistManager<Q> {
    /// Create a manager over caller-supplied queue backends.
    pub const fn with_queues(rac: Q, waiting: Q, rac_limit: usize) -> Self {
        Self {
            rac,
            waiting,
            rac_limit,
        }
    }

    /// RAC capacity.
    pub const fn rac_limit(&self) -> usize {
        self.rac_limit
    }

    /// Passengers in RAC.
    pub fn rac_count(&self) -> usize {
        self.rac.len()
    }

    /// Passengers on the waiting list.
    pub fn waiting_count(&self) -> usize {
        self.waiting.len()
    }

    /// Whether RAC can take another passenger.
    pub fn has_rac_capacity(&self) -> bool {
        self.rac.len() < self.rac_limit
    }

    /// RAC passengers, oldest first.
    pub fn rac_entries(&self) -> Vec<&PassengerKey> {
        self.rac.snapshot()
    }

    /// Waiting passengers, oldest first.
    pub fn waiting_entries(&self) -> Vec<&PassengerKey> {
        self.waiting.snapshot()
    }

    /// Whether a passenger sits in RAC.
    pub fn in_rac(&self, key: &PassengerKey) -> bool {
        self.rac.contains(key)
    }

    /// Whether a passenger is on the waiting list.
    pub fn in_waiting(&self, key: &PassengerKey) -> bool {
        self.waiting.contains(key)
    }

    pub(crate) fn enqueue_rac(&mut self, key: PassengerKey) {
        self.rac.enqueue(key);
    }

    pub(crate) fn enqueue_waiting(&mut self, key: PassengerKey) {
        self.waiting.enqueue(key);
    }

    /// Drop a passenger from RAC. Returns whether it was queued.
    pub fn remove_rac(&mut self, key: &PassengerKey) -> bool {
        self.rac.remove(key)
    }

    /// Drop a passenger from the waiting list. Returns whether it was queued.
    pub fn remove_waiting(&mut self, key: &PassengerKey) -> bool {
        self.waiting.remove(key)
    }

    /// Run the promotion cascade and return what moved, in order.
    pub fn promote(
        &mut self,
        engine: &mut AllocationEngine,
        registry: &mut BookingRegistry,
    ) -> Vec<Promotion> {
        let mut promotions = Vec::new();

        while engine.has_confirmed_capacity() {
            let Some(key) = self.rac.dequeue() else { break };
            let Some(passenger) = registry.passenger_mut(&key) else {
                tracing::warn!(pnr = %key.pnr, ordinal = key.ordinal, "dropping stale RAC entry");
                continue;
            };
            let Some(assignment) = engine.assign_confirmed_seat(passenger) else {
                tracing::warn!(pnr = %key.pnr, "no free seat despite confirmed capacity");
                self.rac.requeue_front(key);
                break;
            };
            tracing::info!(pnr = %key.pnr, name = %passenger.name, seat = %assignment.seat, "RAC passenger confirmed");
            promotions.push(Promotion {
                name: passenger.name.clone(),
                passenger: key,
                kind: PromotionKind::RacToConfirmed(assignment),
            });
        }

        while self.has_rac_capacity() {
            let Some(key) = self.waiting.dequeue() else { break };
            let Some(passenger) = registry.passenger_mut(&key) else {
                tracing::warn!(pnr = %key.pnr, ordinal = key.ordinal, "dropping stale waiting entry");
                continue;
            };
            passenger.status = PassengerStatus::Rac;
            tracing::info!(pnr = %key.pnr, name = %passenger.name, "waiting passenger moved to RAC");
            promotions.push(Promotion {
                name: passenger.name.clone(),
                passenger: key.clone(),
                kind: PromotionKind::WaitingToRac,
            });
            self.rac.enqueue(key);
        }

        promotions
    }
}
