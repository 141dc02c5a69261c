use crate::db::{Database, SeenStore};
use crate::scraper::RawListing;
use chrono::NaiveDate;
use std::time::{SystemTime, UNIX_EPOCH};

/// A raw record as the scraper would hand it over.
pub fn raw(id: &str, address: &str, size: f64, rooms: u32, price: f64) -> RawListing {
    RawListing {
        id: id.to_string(),
        title: format!("Flat {id}"),
        price,
        address: address.to_string(),
        size,
        rooms,
        published_date: NaiveDate::from_ymd_opt(2024, 6, 1),
        source_url: format!("https://www.ss.com/msg/en/real-estate/flats/riga/{id}.html"),
        portal: "ss.com".to_string(),
        ..RawListing::default()
    }
}

/// Returns a seen-listings store on a fresh SQLite file
pub fn temp_store(name: &str) -> SeenStore {
    let path = std::env::temp_dir().join(format!(
        "{name}_{}.sqlite",
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ));
    SeenStore::open(Database::new(path.to_string_lossy()))
        .unwrap_or_else(|e| panic!("Store initialization failed: {e}"))
}
