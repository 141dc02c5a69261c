// errors.rs
use thiserror::Error;

/// Raised when a raw record cannot become a `Listing`.
#[derive(Debug, Error, PartialEq)]
pub enum ListingError {
    #[error("listing {id}: price {price} is negative")]
    NegativePrice { id: String, price: f64 },
    #[error("listing {id}: price is not a finite number")]
    NonFinitePrice { id: String },
    #[error("listing {id}: size {size} is not a valid area")]
    InvalidSize { id: String, size: f64 },
}

/// Errors from the prior-run store. Callers treat all of them as "no history".
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Connection slot unavailable on this thread")]
    ConnectionUnavailable,
    #[error("Stored timestamp {0} for listing is out of range")]
    BadTimestamp(i64),
}
