//! Builder to construct a [`ReservationSystem`] from configuration.

use crate::config::ReservationConfig;
use crate::core::{
    AuditSink, InMemoryAuditSink, PassengerKey, ReservationError, ReservationSystem, WaitQueue,
};
use crate::infra::queue::InMemoryQueue;

/// Builds a reservation engine from a validated configuration.
pub struct ReservationBuilder {
    config: ReservationConfig,
    audit: Option<Box<dyn AuditSink>>,
    audit_disabled: bool,
}

impl ReservationBuilder {
    /// Start from a configuration.
    #[must_use]
    pub const fn new(config: ReservationConfig) -> Self {
        Self {
            config,
            audit: None,
            audit_disabled: false,
        }
    }

    /// Configuration being built.
    #[must_use]
    pub const fn config(&self) -> &ReservationConfig {
        &self.config
    }

    /// Use a caller-supplied audit sink instead of the bounded in-memory one.
    #[must_use]
    pub fn with_audit_sink(mut self, sink: Box<dyn AuditSink>) -> Self {
        self.audit = Some(sink);
        self.audit_disabled = false;
        self
    }

    /// Build without any audit sink.
    #[must_use]
    pub fn without_audit(mut self) -> Self {
        self.audit = None;
        self.audit_disabled = true;
        self
    }

    /// Build with in-memory RAC and waiting queues.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` if the configuration does not validate.
    pub fn build(self) -> Result<ReservationSystem, ReservationError> {
        self.build_with_queues(InMemoryQueue::new)
    }

    /// Build with queues produced by `queue_factory`, called once for RAC
    /// and once for the waiting list.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` if the configuration does not validate.
    pub fn build_with_queues<Q, FQ>(
        self,
        mut queue_factory: FQ,
    ) -> Result<ReservationSystem<Q>, ReservationError>
    where
        Q: WaitQueue<PassengerKey>,
        FQ: FnMut() -> Q,
    {
        let rac = queue_factory();
        let waiting = queue_factory();
        let system = ReservationSystem::with_queues(&self.config, rac, waiting)?;
        tracing::debug!(config = ?self.config, "reservation engine built");

        if self.audit_disabled {
            return Ok(system);
        }
        let sink = self
            .audit
            .unwrap_or_else(|| Box::new(InMemoryAuditSink::new(self.config.audit_capacity)));
        Ok(system.with_audit(sink))
    }
}

impl Default for ReservationBuilder {
    fn default() -> Self {
        Self::new(ReservationConfig::default())
    }
}
