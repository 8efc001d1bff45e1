//! Single-consumer command service.
//!
//! The engine lives on a dedicated thread that drains a bounded
//! `crossbeam-channel` queue, so commands from any number of producers are
//! applied strictly one after another. After a `Quit` command every further
//! command is answered with `ServiceStopped`; shutting down (or dropping the
//! service) stops the thread.

use std::thread::{self, JoinHandle};

use crossbeam_channel::{bounded, Receiver, Sender};
use parking_lot::Mutex;
use tracing::{debug, error, info};

use crate::core::{PassengerKey, ReservationError, ReservationSystem, WaitQueue};
use crate::infra::queue::InMemoryQueue;
use crate::runtime::api::{dispatch, Command, CommandResponse};

type CommandResult = Result<CommandResponse, ReservationError>;

/// Where the worker sends a command's result.
enum Reply {
    Blocking(Sender<CommandResult>),
    #[cfg(feature = "tokio-runtime")]
    Async(tokio::sync::oneshot::Sender<CommandResult>),
}

impl Reply {
    fn send(self, result: CommandResult) {
        // The caller may have given up waiting; nothing to do then.
        match self {
            Self::Blocking(tx) => {
                let _ = tx.send(result);
            }
            #[cfg(feature = "tokio-runtime")]
            Self::Async(tx) => {
                let _ = tx.send(result);
            }
        }
    }
}

struct Envelope {
    command: Command,
    reply: Reply,
}

/// Engine owned by a worker thread, fed through a bounded command queue.
pub struct ReservationService<Q = InMemoryQueue<PassengerKey>> {
    /// Command sender. `None` once shut down.
    command_tx: Mutex<Option<Sender<Envelope>>>,
    worker: Mutex<Option<JoinHandle<ReservationSystem<Q>>>>,
}

impl<Q: WaitQueue<PassengerKey> + 'static> ReservationService<Q> {
    /// Move `system` onto a worker thread accepting up to `queue_depth`
    /// pending commands.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` for a zero queue depth, `ServiceStopped` if the
    /// worker thread cannot be spawned.
    pub fn spawn(system: ReservationSystem<Q>, queue_depth: usize) -> Result<Self, ReservationError> {
        if queue_depth == 0 {
            return Err(ReservationError::InvalidConfig(
                "command_queue_depth must be greater than 0".into(),
            ));
        }
        let (command_tx, command_rx) = bounded(queue_depth);
        let worker = thread::Builder::new()
            .name("reservation-service".into())
            .spawn(move || Self::run(system, &command_rx))
            .map_err(|e| {
                error!("failed to spawn reservation worker: {e}");
                ReservationError::ServiceStopped
            })?;
        info!(queue_depth, "reservation service started");
        Ok(Self {
            command_tx: Mutex::new(Some(command_tx)),
            worker: Mutex::new(Some(worker)),
        })
    }

    fn run(mut system: ReservationSystem<Q>, commands: &Receiver<Envelope>) -> ReservationSystem<Q> {
        let mut stopped = false;
        // Commands queued after `Quit` are still answered.
        for Envelope { command, reply } in commands {
            if stopped {
                reply.send(Err(ReservationError::ServiceStopped));
                continue;
            }
            let quit = command == Command::Quit;
            let result = dispatch(&mut system, command);
            if let Err(ref err) = result {
                debug!(error = %err, "command rejected");
            }
            reply.send(result);
            if quit {
                info!("quit received, reservation service no longer accepting commands");
                stopped = true;
            }
        }
        system
    }

    fn sender(&self) -> Result<Sender<Envelope>, ReservationError> {
        self.command_tx
            .lock()
            .as_ref()
            .cloned()
            .ok_or(ReservationError::ServiceStopped)
    }

    fn submit(&self, command: Command, reply: Reply) -> Result<(), ReservationError> {
        self.sender()?
            .send(Envelope { command, reply })
            .map_err(|_| ReservationError::ServiceStopped)
    }

    /// Execute a command and block until it has been applied.
    ///
    /// # Errors
    ///
    /// The command's own error, or `ServiceStopped` after shutdown or `Quit`.
    pub fn execute(&self, command: Command) -> CommandResult {
        let (reply_tx, reply_rx) = bounded(1);
        self.submit(command, Reply::Blocking(reply_tx))?;
        reply_rx.recv().map_err(|_| ReservationError::ServiceStopped)?
    }

    /// Execute a command and await its result without blocking the runtime
    /// while the worker applies it.
    ///
    /// # Errors
    ///
    /// The command's own error, or `ServiceStopped` after shutdown or `Quit`.
    #[cfg(feature = "tokio-runtime")]
    pub async fn execute_async(&self, command: Command) -> CommandResult {
        let (reply_tx, reply_rx) = tokio::sync::oneshot::channel();
        self.submit(command, Reply::Async(reply_tx))?;
        reply_rx.await.map_err(|_| ReservationError::ServiceStopped)?
    }

    /// Stop accepting commands, wait for queued ones to finish, and hand
    /// the engine back.
    ///
    /// # Errors
    ///
    /// `ServiceStopped` if already shut down or the worker panicked.
    pub fn shutdown(&self) -> Result<ReservationSystem<Q>, ReservationError> {
        drop(self.command_tx.lock().take());
        let worker = self
            .worker
            .lock()
            .take()
            .ok_or(ReservationError::ServiceStopped)?;
        worker.join().map_err(|_| {
            error!("reservation worker panicked");
            ReservationError::ServiceStopped
        })
    }
}

impl<Q> Drop for ReservationService<Q> {
    fn drop(&mut self) {
        drop(self.command_tx.lock().take());
        if let Some(worker) = self.worker.lock().take() {
            let _ = worker.join();
        }
    }
}
