//! Layered configuration for the balancer's three dynamic knobs.
//!
//! Settings are loaded once (defaults → optional file → `BSA_`-prefixed
//! environment variables), validated, and then snapshotted into an
//! immutable [`crate::weight::WeightFunction`] plus a threshold for the
//! duration of a pass — live updates only affect subsequent passes.

mod settings;

pub use settings::BalancerSettings;
