//! Database repository layer.
//!
//! Repositories use SeaORM entity models internally and return domain models from
//! `crate::model` so the service layer never handles raw rows.

pub mod subscription;

pub use subscription::SubscriptionRepository;

#[cfg(test)]
mod test;
