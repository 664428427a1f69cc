pub mod listing;

pub use listing::{assemble_file, assemble_source, ErrorPolicy, Listing, ListingEntry};
