pub mod occupancy;
pub mod subscription;
