//! Domain models shared by the service, data and bot layers.
//!
//! Entity rows are converted into these models at the repository boundary so the
//! occupancy core never works with raw string ids or optional columns.

pub mod occupancy;
pub mod subscription;
