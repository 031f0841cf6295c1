pub mod apartments;
pub mod connection;
pub mod scrape_jobs;

pub use apartments::{list_apartments, save_listings, ApartmentRecord};
pub use connection::{init_db, Database};
pub use scrape_jobs::{get_recent_jobs, record_job, JobRecord};
