// src/domain/filters.rs

//! Stateless listing filters. Each one returns a fresh `Vec` and leaves its input
//! alone, so they chain by feeding one result into the next.
//!
//! Boolean filters compare against a known value: a listing whose flag is unknown
//! matches neither `true` nor `false`.

use crate::domain::listing::Listing;
use chrono::NaiveDate;

fn keep<F>(listings: &[Listing], pred: F) -> Vec<Listing>
where
    F: Fn(&Listing) -> bool,
{
    listings.iter().filter(|l| pred(l)).cloned().collect()
}

/// Inclusive on both ends. Pass `0.0` / `f64::INFINITY` for an open bound.
pub fn by_price_range(listings: &[Listing], min: f64, max: f64) -> Vec<Listing> {
    keep(listings, |l| min <= l.price && l.price <= max)
}

pub fn by_utilities_included(listings: &[Listing], included: bool) -> Vec<Listing> {
    keep(listings, |l| l.utilities_included == Some(included))
}

pub fn by_furnished(listings: &[Listing], furnished: bool) -> Vec<Listing> {
    keep(listings, |l| l.furnished == Some(furnished))
}

pub fn by_pets_allowed(listings: &[Listing], allowed: bool) -> Vec<Listing> {
    keep(listings, |l| l.pets_allowed == Some(allowed))
}

pub fn by_parking(listings: &[Listing], available: bool) -> Vec<Listing> {
    keep(listings, |l| l.parking == Some(available))
}

/// Listings whose address mentions any of `districts`, ignoring case.
pub fn by_district<S: AsRef<str>>(listings: &[Listing], districts: &[S]) -> Vec<Listing> {
    let needles: Vec<String> = districts
        .iter()
        .map(|d| d.as_ref().trim().to_lowercase())
        .filter(|d| !d.is_empty())
        .collect();

    keep(listings, |l| {
        let address = l.address.to_lowercase();
        needles.iter().any(|d| address.contains(d.as_str()))
    })
}

/// Listings without a commute estimate never match.
pub fn by_max_distance(listings: &[Listing], max_km: f64) -> Vec<Listing> {
    keep(listings, |l| l.distance_km().is_some_and(|d| d <= max_km))
}

/// Inclusive; `max = None` leaves the upper end open.
pub fn by_rooms(listings: &[Listing], min: u32, max: Option<u32>) -> Vec<Listing> {
    keep(listings, |l| l.rooms >= min && max.map_or(true, |m| l.rooms <= m))
}

pub fn by_publish_date(listings: &[Listing], date: NaiveDate) -> Vec<Listing> {
    keep(listings, |l| l.published_date == Some(date))
}

/// A set of criteria applied together. Unset fields don't filter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingQuery {
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub utilities_included: Option<bool>,
    pub furnished: Option<bool>,
    pub pets_allowed: Option<bool>,
    pub parking: Option<bool>,
    pub districts: Vec<String>,
    pub max_distance_km: Option<f64>,
    pub min_rooms: Option<u32>,
    pub max_rooms: Option<u32>,
    pub published_on: Option<NaiveDate>,
}

impl ListingQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn price_between(mut self, min: f64, max: f64) -> Self {
        self.min_price = Some(min);
        self.max_price = Some(max);
        self
    }

    pub fn utilities_included(mut self, included: bool) -> Self {
        self.utilities_included = Some(included);
        self
    }

    pub fn furnished(mut self, furnished: bool) -> Self {
        self.furnished = Some(furnished);
        self
    }

    pub fn pets_allowed(mut self, allowed: bool) -> Self {
        self.pets_allowed = Some(allowed);
        self
    }

    pub fn parking(mut self, available: bool) -> Self {
        self.parking = Some(available);
        self
    }

    pub fn in_districts<I, S>(mut self, districts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.districts.extend(districts.into_iter().map(Into::into));
        self
    }

    pub fn within_km(mut self, km: f64) -> Self {
        self.max_distance_km = Some(km);
        self
    }

    pub fn rooms_between(mut self, min: u32, max: Option<u32>) -> Self {
        self.min_rooms = Some(min);
        self.max_rooms = max;
        self
    }

    pub fn published_on(mut self, date: NaiveDate) -> Self {
        self.published_on = Some(date);
        self
    }

    /// Runs every set criterion in turn, intersecting the results.
    pub fn apply(&self, listings: &[Listing]) -> Vec<Listing> {
        let mut out = listings.to_vec();

        if self.min_price.is_some() || self.max_price.is_some() {
            out = by_price_range(
                &out,
                self.min_price.unwrap_or(0.0),
                self.max_price.unwrap_or(f64::INFINITY),
            );
        }
        if let Some(v) = self.utilities_included {
            out = by_utilities_included(&out, v);
        }
        if let Some(v) = self.furnished {
            out = by_furnished(&out, v);
        }
        if let Some(v) = self.pets_allowed {
            out = by_pets_allowed(&out, v);
        }
        if let Some(v) = self.parking {
            out = by_parking(&out, v);
        }
        if !self.districts.is_empty() {
            out = by_district(&out, &self.districts);
        }
        if let Some(km) = self.max_distance_km {
            out = by_max_distance(&out, km);
        }
        if self.min_rooms.is_some() || self.max_rooms.is_some() {
            out = by_rooms(&out, self.min_rooms.unwrap_or(0), self.max_rooms);
        }
        if let Some(date) = self.published_on {
            out = by_publish_date(&out, date);
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::listing::tests::listing;
    use crate::domain::listing::Commute;

    fn ids(listings: &[Listing]) -> Vec<&str> {
        listings.iter().map(|l| l.id.as_str()).collect()
    }

    fn sample() -> Vec<Listing> {
        let mut a = listing("a", "Riga, Centrs, Brivibas 10", 40.0, 1, 400.0);
        a.utilities_included = Some(true);
        a.furnished = Some(true);
        a.commute = Some(Commute { distance_km: 2.0, minutes: 4 });
        a.published_date = NaiveDate::from_ymd_opt(2024, 5, 1);

        let mut b = listing("b", "Riga, Teika, Ropazu 20", 60.0, 2, 550.0);
        b.utilities_included = Some(false);
        b.parking = Some(true);
        b.commute = Some(Commute { distance_km: 4.5, minutes: 9 });
        b.published_date = NaiveDate::from_ymd_opt(2024, 5, 2);

        // nothing known beyond the basics
        let c = listing("c", "Riga, Imanta, Anninmuizas 5", 75.0, 3, 700.0);

        let mut d = listing("d", "Riga, Agenskalns, Kalnciema 1", 35.0, 1, 300.0);
        d.pets_allowed = Some(true);
        d.commute = Some(Commute { distance_km: 0.0, minutes: 0 });

        vec![a, b, c, d]
    }

    #[test]
    fn price_range_is_inclusive() {
        let out = by_price_range(&sample(), 400.0, 550.0);
        assert_eq!(ids(&out), vec!["a", "b"]);
        assert_eq!(by_price_range(&sample(), 0.0, f64::INFINITY).len(), 4);
    }

    #[test]
    fn unknown_flags_match_neither_value() {
        let listings = sample();
        assert_eq!(ids(&by_utilities_included(&listings, true)), vec!["a"]);
        assert_eq!(ids(&by_utilities_included(&listings, false)), vec!["b"]);
        assert_eq!(ids(&by_furnished(&listings, true)), vec!["a"]);
        assert!(by_furnished(&listings, false).is_empty());
        assert_eq!(ids(&by_pets_allowed(&listings, true)), vec!["d"]);
        assert_eq!(ids(&by_parking(&listings, true)), vec!["b"]);
    }

    #[test]
    fn district_match_is_case_insensitive_substring() {
        let out = by_district(&sample(), &["TEIKA", "imanta"]);
        assert_eq!(ids(&out), vec!["b", "c"]);
        assert!(by_district(&sample(), &["Jugla"]).is_empty());
    }

    #[test]
    fn distance_requires_a_commute() {
        let out = by_max_distance(&sample(), 3.0);
        // d sits at the centre (0 km) and still counts; c has no estimate
        assert_eq!(ids(&out), vec!["a", "d"]);
        assert_eq!(by_max_distance(&sample(), 100.0).len(), 3);
    }

    #[test]
    fn rooms_range() {
        assert_eq!(ids(&by_rooms(&sample(), 2, None)), vec!["b", "c"]);
        assert_eq!(ids(&by_rooms(&sample(), 1, Some(1))), vec!["a", "d"]);
    }

    #[test]
    fn publish_date_exact() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 2).unwrap();
        assert_eq!(ids(&by_publish_date(&sample(), date)), vec!["b"]);
    }

    #[test]
    fn query_intersects_criteria() {
        let query = ListingQuery::new()
            .price_between(0.0, 600.0)
            .within_km(5.0)
            .rooms_between(1, Some(2));
        assert_eq!(ids(&query.apply(&sample())), vec!["a", "b", "d"]);

        let query = query.utilities_included(false).in_districts(["teika"]);
        assert_eq!(ids(&query.apply(&sample())), vec!["b"]);
    }

    #[test]
    fn empty_query_returns_everything() {
        let listings = sample();
        assert_eq!(ListingQuery::new().apply(&listings), listings);
    }
}
