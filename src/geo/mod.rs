// geo/mod.rs
//! Distance and drive time from an address to Riga's centre (Origo).

use crate::config::GeoConfig;
use crate::domain::Commute;
use reqwest::blocking::Client;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

pub const CENTER_LAT: f64 = 56.949653;
pub const CENTER_LON: f64 = 24.118738;

const EARTH_RADIUS_KM: f64 = 6371.0;
const CITY_SPEED_KMH: f64 = 30.0;

/// Used when neither the geocoder nor the table knows the address.
pub const DEFAULT_COMMUTE: Commute = Commute {
    distance_km: 5.0,
    minutes: 15,
};

/// Approximate distances for districts and central streets, checked in order
/// as substrings of the lower-cased address.
const KNOWN_PLACES: [(&str, f64); 33] = [
    ("center", 0.5),
    ("oldtown", 0.3),
    ("downtown", 0.5),
    ("pardaugava", 3.0),
    ("kengarags", 7.0),
    ("purvciems", 5.0),
    ("teika", 4.5),
    ("imanta", 9.0),
    ("zolitude", 10.0),
    ("ziepniekkalns", 7.5),
    ("agenskalns", 3.5),
    ("jugla", 9.0),
    ("mezciems", 7.0),
    ("bolderaja", 12.0),
    ("sarkandaugava", 5.0),
    ("kipsala", 2.5),
    ("maskava", 3.0),
    ("tornkalns", 4.0),
    // streets
    ("brivibas", 2.0),
    ("terbatas", 1.0),
    ("caka", 1.5),
    ("chaka", 1.5),
    ("valdemara", 2.0),
    ("dzirnavu", 1.0),
    ("barona", 1.2),
    ("gertrudes", 1.8),
    ("stabu", 1.5),
    ("matisa", 2.5),
    ("avotu", 2.5),
    ("tallinas", 3.0),
    ("marijas", 0.8),
    ("elizabetes", 1.0),
    ("alberta", 2.0),
];

#[derive(Debug, Error)]
pub enum GeoError {
    #[error("Geocoder request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Geocoder returned HTTP {0}")]
    Status(u16),
    #[error("Geocoder has no match for '{0}'")]
    NoMatch(String),
    #[error("Geocoder returned unreadable coordinates: {0}")]
    BadCoordinates(String),
}

#[derive(Debug, Deserialize)]
struct Place {
    lat: String,
    lon: String,
}

pub struct Geolocator {
    client: Client,
    config: GeoConfig,
}

impl Geolocator {
    pub fn new(config: GeoConfig) -> Result<Self, GeoError> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client, config })
    }

    /// Never fails: geocoder first (when enabled), then the district table,
    /// then `DEFAULT_COMMUTE`.
    pub fn distance_and_time(&self, address: &str) -> Commute {
        if address.trim().is_empty() {
            return DEFAULT_COMMUTE;
        }

        if self.config.online {
            match self.lookup(address) {
                Ok(commute) => return commute,
                Err(e) => tracing::warn!(address, error = %e, "Geocoding failed, using district table"),
            }
        }

        estimate_from_known_places(address).unwrap_or_else(|| {
            tracing::debug!(address, "No known district in address, using default commute");
            DEFAULT_COMMUTE
        })
    }

    fn lookup(&self, address: &str) -> Result<Commute, GeoError> {
        let query = format!("{address}, Riga, Latvia");
        let resp = self
            .client
            .get(&self.config.geocoder_url)
            .query(&[("q", query.as_str()), ("format", "json"), ("limit", "1")])
            .send()?;

        let status = resp.status();
        if !status.is_success() {
            return Err(GeoError::Status(status.as_u16()));
        }

        let places: Vec<Place> = resp.json()?;
        let place = places
            .into_iter()
            .next()
            .ok_or_else(|| GeoError::NoMatch(address.to_string()))?;
        let (lat, lon) = parse_coordinates(&place)?;

        Ok(commute_for_km(haversine_km(CENTER_LAT, CENTER_LON, lat, lon)))
    }
}

fn parse_coordinates(place: &Place) -> Result<(f64, f64), GeoError> {
    let lat = place.lat.trim().parse::<f64>();
    let lon = place.lon.trim().parse::<f64>();
    match (lat, lon) {
        (Ok(lat), Ok(lon)) => Ok((lat, lon)),
        _ => Err(GeoError::BadCoordinates(format!("{}, {}", place.lat, place.lon))),
    }
}

/// Great-circle distance in km.
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let dlat = (lat2 - lat1).to_radians();
    let dlon = (lon2 - lon1).to_radians();
    let a = (dlat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_KM * c
}

/// Drive time at city speed, rounded up to whole minutes.
pub fn drive_minutes(km: f64) -> u32 {
    (km * 60.0 / CITY_SPEED_KMH).ceil() as u32
}

fn commute_for_km(km: f64) -> Commute {
    Commute {
        distance_km: (km * 100.0).round() / 100.0,
        minutes: drive_minutes(km),
    }
}

pub fn estimate_from_known_places(address: &str) -> Option<Commute> {
    let address = address.to_lowercase();
    KNOWN_PLACES
        .iter()
        .find(|(place, _)| address.contains(place))
        .map(|&(_, km)| commute_for_km(km))
}
