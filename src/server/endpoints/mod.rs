pub mod schedule;
pub mod snapshots;
pub mod status;
