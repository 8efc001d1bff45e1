//! Audit sink implementations.
//!
//! Every state change the engine reports (bookings, per-passenger outcomes,
//! cancellations, promotions and capacity growth) is recorded as an
//! [`AuditEvent`] through an [`AuditSink`].

use std::collections::VecDeque;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::util::clock::now_ms;

/// Action recorded by an audit event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    /// Booking created.
    Booked,
    /// Passenger confirmed at booking time.
    Confirmed,
    /// Passenger placed in RAC at booking time.
    Rac,
    /// Passenger placed on the waiting list at booking time.
    Waiting,
    /// Child passenger recorded without a seat.
    NoSeat,
    /// Booking cancelled.
    Cancelled,
    /// RAC passenger promoted to a confirmed seat.
    PromotedToConfirmed,
    /// Waiting passenger promoted to RAC.
    PromotedToRac,
    /// Cabin added.
    CabinAdded,
    /// Coach added.
    CoachAdded,
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Booked => "booked",
            Self::Confirmed => "confirmed",
            Self::Rac => "rac",
            Self::Waiting => "waiting",
            Self::NoSeat => "no_seat",
            Self::Cancelled => "cancelled",
            Self::PromotedToConfirmed => "promoted_to_confirmed",
            Self::PromotedToRac => "promoted_to_rac",
            Self::CabinAdded => "cabin_added",
            Self::CoachAdded => "coach_added",
        };
        f.write_str(label)
    }
}

/// Audit event structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEvent {
    /// Event identifier.
    pub event_id: String,
    /// Related booking, if any.
    pub pnr: Option<String>,
    /// Related passenger name, if any.
    pub passenger: Option<String>,
    /// Action taken.
    pub action: AuditAction,
    /// Timestamp milliseconds.
    pub created_at_ms: u128,
    /// Additional context.
    pub detail: Option<String>,
}

/// Audit sink abstraction.
pub trait AuditSink: Send {
    /// Record an audit event.
    fn record(&mut self, event: AuditEvent);
}

/// In-memory audit sink with a bounded buffer.
#[derive(Debug)]
pub struct InMemoryAuditSink {
    events: VecDeque<AuditEvent>,
    max_events: usize,
}

impl InMemoryAuditSink {
    /// Create a new in-memory sink holding at most `max_events`.
    #[must_use]
    pub fn new(max_events: usize) -> Self {
        Self {
            events: VecDeque::with_capacity(max_events.min(1024)),
            max_events,
        }
    }

    /// Retrieve a snapshot of stored events.
    #[must_use]
    pub fn events(&self) -> Vec<AuditEvent> {
        self.events.iter().cloned().collect()
    }
}

impl AuditSink for InMemoryAuditSink {
    fn record(&mut self, event: AuditEvent) {
        if self.max_events == 0 {
            return;
        }
        if self.events.len() >= self.max_events {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }
}

/// Sink that forwards to a shared in-memory sink, so callers can read the
/// trail while the engine owns the writer.
#[derive(Debug, Clone)]
pub struct SharedAuditSink {
    inner: std::sync::Arc<parking_lot::Mutex<InMemoryAuditSink>>,
}

impl SharedAuditSink {
    /// Create a shared sink holding at most `max_events`.
    #[must_use]
    pub fn new(max_events: usize) -> Self {
        Self {
            inner: std::sync::Arc::new(parking_lot::Mutex::new(InMemoryAuditSink::new(max_events))),
        }
    }

    /// Retrieve a snapshot of stored events.
    #[must_use]
    pub fn events(&self) -> Vec<AuditEvent> {
        self.inner.lock().events()
    }
}

impl AuditSink for SharedAuditSink {
    fn record(&mut self, event: AuditEvent) {
        self.inner.lock().record(event);
    }
}

/// Helper to build an audit event from context.
pub fn build_audit_event(
    action: AuditAction,
    pnr: Option<&str>,
    passenger: Option<&str>,
    detail: Option<String>,
) -> AuditEvent {
    AuditEvent {
        event_id: uuid::Uuid::new_v4().to_string(),
        pnr: pnr.map(str::to_owned),
        passenger: passenger.map(str::to_owned),
        action,
        created_at_ms: now_ms(),
        detail,
    }
}
