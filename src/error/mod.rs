//! Error types for the balancer.
//!
//! The allocator never raises exceptions for normal decider outcomes —
//! NO and THROTTLE are first-class values carried on [`crate::decision`]
//! types. This module only covers the two cases the spec calls out as
//! real errors: bad configuration at construction time, and internal
//! invariant violations that must never happen in a correct caller.

mod allocator;

pub use allocator::{AllocatorError, Result};
