// src/domain/listing.rs

use crate::errors::ListingError;
use crate::scraper::RawListing;
use chrono::NaiveDate;
use std::fmt;

/// Sizes closer than this (in m²) count as the same flat.
pub const SIZE_TOLERANCE: f64 = 2.0;

/// Distance and drive time from a listing to the city centre.
/// Both values are always known together.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Commute {
    pub distance_km: f64,
    pub minutes: u32,
}

/// A rental listing after validation and geolocation enrichment.
///
/// Read-only once built, except for the provenance fields (`portal`, `source_url`)
/// which deduplication may extend when two copies of a listing tie on price.
#[derive(Debug, Clone, PartialEq)]
pub struct Listing {
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
    pub commute: Option<Commute>,

    pub source_url: String,
    pub portal: String,
}

/// Anything that can be ordered by monthly price.
pub trait Priced {
    fn price(&self) -> f64;
}

impl Priced for Listing {
    fn price(&self) -> f64 {
        self.price
    }
}

impl Priced for f64 {
    fn price(&self) -> f64 {
        *self
    }
}

impl Listing {
    /// Validates a raw record and attaches its commute estimate.
    /// A negative or non-finite price never makes it into the index.
    pub fn from_raw(raw: RawListing, commute: Option<Commute>) -> Result<Self, ListingError> {
        if !raw.price.is_finite() {
            return Err(ListingError::NonFinitePrice { id: raw.id });
        }
        if raw.price < 0.0 {
            return Err(ListingError::NegativePrice {
                id: raw.id,
                price: raw.price,
            });
        }
        if !raw.size.is_finite() || raw.size < 0.0 {
            return Err(ListingError::InvalidSize {
                id: raw.id,
                size: raw.size,
            });
        }

        Ok(Listing {
            id: raw.id,
            title: raw.title,
            // folds -0.0 into 0.0 so tree keys compare cleanly
            price: raw.price + 0.0,
            address: raw.address,
            size: raw.size,
            rooms: raw.rooms,
            floor: raw.floor,
            furnished: raw.furnished,
            utilities_included: raw.utilities_included,
            parking: raw.parking,
            pets_allowed: raw.pets_allowed,
            min_rent_term: raw.min_rent_term,
            published_date: raw.published_date,
            commute,
            source_url: raw.source_url,
            portal: raw.portal,
        })
    }

    /// Whether two records describe the same flat: same address ignoring case,
    /// sizes within `SIZE_TOLERANCE`, same room count.
    ///
    /// This is not transitive (40, 41.5 and 43 m² chain without the ends matching),
    /// so it must never be used as a grouping key.
    pub fn is_same_listing(&self, other: &Listing) -> bool {
        self.address.to_lowercase() == other.address.to_lowercase()
            && (self.size - other.size).abs() < SIZE_TOLERANCE
            && self.rooms == other.rooms
    }

    pub fn distance_km(&self) -> Option<f64> {
        self.commute.map(|c| c.distance_km)
    }

    /// Appends another copy's provenance, e.g. `"ss.com, ss.com"`.
    pub fn merge_provenance(&mut self, other: &Listing) {
        self.portal = format!("{}, {}", self.portal, other.portal);
        self.source_url = format!("{}, {}", self.source_url, other.source_url);
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "Yes"
    } else {
        "No"
    }
}

impl fmt::Display for Listing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        write!(f, "Price: {:.2} EUR/month", self.price)?;
        match self.utilities_included {
            Some(true) => writeln!(f, " (Utilities included)")?,
            Some(false) => writeln!(f, " (Utilities not included)")?,
            None => writeln!(f)?,
        }
        writeln!(f, "Rooms: {}", self.rooms)?;
        writeln!(f, "Address: {}", self.address)?;
        writeln!(f, "Size: {:.2} m²", self.size)?;
        if let Some(floor) = self.floor {
            writeln!(f, "Floor: {floor}")?;
        }
        if let Some(furnished) = self.furnished {
            writeln!(f, "Furniture: {}", yes_no(furnished))?;
        }
        if let Some(commute) = self.commute {
            writeln!(
                f,
                "Distance to center: {:.2} km, {} min by car",
                commute.distance_km, commute.minutes
            )?;
        }
        if let Some(parking) = self.parking {
            writeln!(f, "Parking: {}", yes_no(parking))?;
        }
        if let Some(pets) = self.pets_allowed {
            writeln!(f, "Pets allowed: {}", yes_no(pets))?;
        }
        if let Some(term) = &self.min_rent_term {
            writeln!(f, "Minimum rental term: {term}")?;
        }
        if let Some(date) = self.published_date {
            writeln!(f, "Published: {date}")?;
        }
        write!(f, "Link: {}", self.source_url)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Minimal valid listing for tests across the crate.
    pub(crate) fn listing(id: &str, address: &str, size: f64, rooms: u32, price: f64) -> Listing {
        Listing::from_raw(
            RawListing {
                id: id.to_string(),
                title: format!("Flat {id}"),
                price,
                address: address.to_string(),
                size,
                rooms,
                source_url: format!("https://www.ss.com/msg/{id}.html"),
                portal: "ss.com".to_string(),
                ..RawListing::default()
            },
            None,
        )
        .expect("test listing should be valid")
    }

    #[test]
    fn rejects_negative_price() {
        let raw = RawListing {
            id: "neg".to_string(),
            price: -10.0,
            ..RawListing::default()
        };
        let err = Listing::from_raw(raw, None).unwrap_err();
        assert_eq!(
            err,
            ListingError::NegativePrice {
                id: "neg".to_string(),
                price: -10.0
            }
        );
    }

    #[test]
    fn rejects_nan_price() {
        let raw = RawListing {
            id: "nan".to_string(),
            price: f64::NAN,
            ..RawListing::default()
        };
        assert!(matches!(
            Listing::from_raw(raw, None),
            Err(ListingError::NonFinitePrice { .. })
        ));
    }

    #[test]
    fn zero_price_is_allowed() {
        let l = listing("free", "Lacplesa 1", 30.0, 1, 0.0);
        assert_eq!(l.price, 0.0);
    }

    #[test]
    fn same_listing_ignores_case_and_small_size_differences() {
        let a = listing("a", "Brivibas 10", 40.0, 1, 500.0);
        let b = listing("b", "brivibas 10", 41.5, 1, 450.0);
        let c = listing("c", "brivibas 10", 43.0, 1, 450.0);
        let d = listing("d", "Brivibas 10", 40.0, 2, 500.0);

        assert!(a.is_same_listing(&b));
        assert!(b.is_same_listing(&c));
        // not transitive
        assert!(!a.is_same_listing(&c));
        assert!(!a.is_same_listing(&d));
    }

    #[test]
    fn merge_provenance_concatenates() {
        let mut a = listing("a", "Brivibas 10", 40.0, 1, 500.0);
        let b = listing("b", "Brivibas 10", 40.0, 1, 500.0);
        a.merge_provenance(&b);
        assert_eq!(a.portal, "ss.com, ss.com");
        assert_eq!(
            a.source_url,
            "https://www.ss.com/msg/a.html, https://www.ss.com/msg/b.html"
        );
    }

    #[test]
    fn display_skips_unknown_fields() {
        let mut l = listing("a", "Brivibas 10", 40.0, 1, 500.0);
        l.utilities_included = Some(true);
        l.commute = Some(Commute {
            distance_km: 2.0,
            minutes: 4,
        });

        let text = l.to_string();
        assert!(text.contains("Price: 500.00 EUR/month (Utilities included)"));
        assert!(text.contains("Distance to center: 2.00 km, 4 min by car"));
        assert!(!text.contains("Floor:"));
        assert!(!text.contains("Pets allowed:"));
        assert!(text.ends_with("Link: https://www.ss.com/msg/a.html"));
    }
}
