//! Infrastructure adapters for waitlist queues.

pub mod queue;
pub use queue::InMemoryQueue;
