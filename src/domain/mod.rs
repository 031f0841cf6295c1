pub mod listing;
pub mod summary;

pub use listing::{rows_from_results, ListingRow};
pub use summary::{summarize, ColumnStats, ListingSummary};
