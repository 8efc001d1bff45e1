//! Mutex-guarded engine handle for callers on several threads.
//!
//! Each command runs under one lock acquisition, so allocation, cancellation
//! and growth are never interleaved.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::core::{PassengerKey, ReservationError, ReservationSystem, WaitQueue};
use crate::infra::queue::InMemoryQueue;
use crate::runtime::api::{dispatch, Command, CommandResponse};

/// Cloneable handle to one engine behind a single `parking_lot::Mutex`.
pub struct SharedReservation<Q = InMemoryQueue<PassengerKey>> {
    inner: Arc<Mutex<ReservationSystem<Q>>>,
}

impl<Q> Clone for SharedReservation<Q> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<Q: WaitQueue<PassengerKey>> SharedReservation<Q> {
    /// Wrap an engine.
    pub fn new(system: ReservationSystem<Q>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(system)),
        }
    }

    /// Execute one command as a single critical section.
    ///
    /// # Errors
    ///
    /// Whatever the command reports.
    pub fn execute(&self, command: Command) -> Result<CommandResponse, ReservationError> {
        let mut system = self.inner.lock();
        dispatch(&mut *system, command)
    }

    /// Run a read-only closure against the engine under the lock.
    pub fn read<R>(&self, f: impl FnOnce(&ReservationSystem<Q>) -> R) -> R {
        let system = self.inner.lock();
        f(&*system)
    }
}
