pub mod dedup;
pub mod filters;
pub mod history;
pub mod listing;
pub mod sort;

pub use dedup::{remove_duplicates, DedupPolicy};
pub use filters::ListingQuery;
pub use history::{diff_against_history, SeenMap};
pub use listing::{Commute, Listing};
pub use sort::sort_by_price_ascending;
