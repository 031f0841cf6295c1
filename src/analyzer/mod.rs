mod report;
mod snapshot;

pub use report::{SnapshotAnalyzer, SnapshotReport, LEASE_RATE_FLOOR, MAX_LEASE_RATES_SHOWN};
pub use snapshot::{load_snapshot_html, Snapshot};
