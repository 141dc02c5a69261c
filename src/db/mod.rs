pub mod connection;
pub mod seen;

pub use connection::Database;
pub use seen::SeenStore;
