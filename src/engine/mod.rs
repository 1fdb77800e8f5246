mod availability;
mod conflict;
mod error;
mod pricing;
mod queries;

pub use availability::{
    check_availability, free_windows, merge_overlapping, next_available, subtract_intervals,
};
pub use error::EngineError;
pub use pricing::estimate_price;

use crate::registry::Registry;
use crate::validate::DurationPolicy;

/// Answers availability questions against an immutable registry.
///
/// Holds no per-request state; `&Engine` can be shared freely across
/// handlers and threads.
pub struct Engine {
    registry: Registry,
    policy: DurationPolicy,
}

impl Engine {
    pub fn new(registry: Registry, policy: DurationPolicy) -> Self {
        Self { registry, policy }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn policy(&self) -> DurationPolicy {
        self.policy
    }
}
