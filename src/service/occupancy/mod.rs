//! Voice occupancy tracking and threshold-crossing detection.
//!
//! A membership change in a guild flows through these stages:
//! 1. [`snapshot`] builds the guild's human-only occupancy from the event source
//! 2. [`aggregate`] reduces it to one count per subscriber, according to their mode
//!    and channel allowlist
//! 3. [`evaluator`] applies the rising-edge rule, gates it with the
//!    [`cooldown`] table, dispatches notifications and stores the new baseline

pub mod aggregate;
pub mod cooldown;
pub mod evaluator;
pub mod snapshot;

pub use evaluator::{Decision, EvaluationReport, OccupancyEvaluator};
pub use snapshot::SnapshotSource;

#[cfg(test)]
mod test;
