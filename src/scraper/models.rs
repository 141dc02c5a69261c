use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// raw listing
//  ├── row (list page)
//  │    ├── link      -> id, source_url
//  │    ├── title
//  │    └── price
//  └── details (detail page)
//       ├── address / size / rooms / floor
//       ├── description keywords
//       │    ├── furnished
//       │    ├── parking
//       │    ├── pets_allowed
//       │    ├── utilities_included
//       │    └── min_rent_term
//       └── published_date

/// One record as the acquisition layer hands it over. Prices are already numeric;
/// rows without a parseable price never become a `RawListing`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawListing {
    pub id: String,
    pub title: String,
    pub price: f64,
    pub address: String,
    pub size: f64,
    pub rooms: u32,

    pub floor: Option<i32>,
    pub furnished: Option<bool>,
    pub utilities_included: Option<bool>,
    pub parking: Option<bool>,
    pub pets_allowed: Option<bool>,
    pub min_rent_term: Option<String>,
    pub published_date: Option<NaiveDate>,

    pub source_url: String,
    pub portal: String,
}

/// A row on the list page, before the detail page was fetched.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingRow {
    pub id: String,
    pub link: String,
    pub title: String,
    pub price: f64,
}

/// Fields read from a listing's detail page.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingDetails {
    pub address: String,
    pub size: f64,
    pub rooms: u32,
    pub floor: Option<i32>,
    pub furnished: Option<bool>,
    pub parking: Option<bool>,
    pub pets_allowed: Option<bool>,
    pub utilities_included: Option<bool>,
    pub min_rent_term: Option<String>,
}

impl Default for ListingDetails {
    fn default() -> Self {
        Self {
            address: "Riga".to_string(),
            size: 50.0,
            rooms: 1,
            floor: None,
            furnished: None,
            parking: None,
            pets_allowed: None,
            utilities_included: Some(false),
            min_rent_term: None,
        }
    }
}

impl RawListing {
    pub fn from_parts(row: ListingRow, details: ListingDetails, portal: &str, published: NaiveDate) -> Self {
        Self {
            id: row.id,
            title: row.title,
            price: row.price,
            address: details.address,
            size: details.size,
            rooms: details.rooms,
            floor: details.floor,
            furnished: details.furnished,
            utilities_included: details.utilities_included,
            parking: details.parking,
            pets_allowed: details.pets_allowed,
            min_rent_term: details.min_rent_term,
            published_date: Some(published),
            source_url: row.link,
            portal: portal.to_string(),
        }
    }
}
