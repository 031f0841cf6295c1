pub mod export_csv;
pub mod export_xlsx;

pub use export_csv::{export_listings_csv, write_listings_csv};
pub use export_xlsx::{export_listings_xlsx, listings_xlsx_buffer};

/// Column order shared by every listing export.
pub const LISTING_HEADERS: [&str; 10] = [
    "propertyName",
    "address",
    "city",
    "state",
    "minPrice",
    "maxPrice",
    "avgPrice",
    "beds",
    "baths",
    "sqft",
];
