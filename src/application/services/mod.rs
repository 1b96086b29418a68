pub mod tracker_service;
pub mod announce_service;

pub use tracker_service::{ScanConfig, TrackerService};
pub use announce_service::{AnnounceService, Outcome};
