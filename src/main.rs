use crate::catalog::{enrich, Catalog};
use crate::config::AppConfig;
use crate::db::{Database, SeenStore};
use crate::domain::{diff_against_history, remove_duplicates, SeenMap};
use crate::geo::{estimate_from_known_places, Geolocator, DEFAULT_COMMUTE};
use crate::scraper::{RawListing, SsComScraper};
use chrono::Utc;
use std::io::{self, Write};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod catalog;
mod config;
mod db;
mod domain;
mod errors;
mod geo;
mod index;
mod menu;
mod scraper;

#[cfg(test)]
mod tests;

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

/// Acquisition failures never reach the core: they become an empty batch.
fn fetch_raw(config: &AppConfig) -> Vec<RawListing> {
    let result = SsComScraper::new(config.scrape.clone()).and_then(|s| s.fetch_listings(config.max_price));
    match result {
        Ok(raw) => raw,
        Err(e) => {
            tracing::error!(error = %e, "Scrape failed");
            Vec::new()
        }
    }
}

fn open_store(config: &AppConfig) -> Option<SeenStore> {
    SeenStore::open(Database::new(config.db_path.clone()))
        .map_err(|e| tracing::warn!(path = %config.db_path, error = %e, "Seen-listings store unavailable"))
        .ok()
}

fn load_history(store: Option<&SeenStore>) -> SeenMap {
    let Some(store) = store else {
        return SeenMap::new();
    };
    store.load().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Error reading previous results, treating every listing as new");
        SeenMap::new()
    })
}

fn main() {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Invalid configuration");
            std::process::exit(2);
        }
    };

    println!("Apartment Rental Finder - Riga (SS.com only)");
    println!("Getting rental data from SS.com...");
    let raw = fetch_raw(&config);
    if raw.is_empty() {
        println!("No rental properties found. Please check your internet connection or try again later.");
        std::process::exit(1);
    }
    println!("Found {} rental properties.", raw.len());

    println!("Calculating distances to center...");
    let geo = Geolocator::new(config.geo.clone())
        .map_err(|e| tracing::warn!(error = %e, "Geocoder unavailable, using district table only"))
        .ok();
    let listings = enrich(raw, |address: &str| match &geo {
        Some(geo) => geo.distance_and_time(address),
        None => estimate_from_known_places(address).unwrap_or(DEFAULT_COMMUTE),
    });

    println!("Removing duplicates...");
    let unique = remove_duplicates(&listings, config.dedup);
    tracing::info!(before = listings.len(), after = unique.len(), policy = ?config.dedup, "Deduplicated");

    let store = open_store(&config);
    let history = load_history(store.as_ref());
    let diff = diff_against_history(&unique, &history, Utc::now());
    if let Some(store) = &store {
        if let Err(e) = store.save(&diff.seen) {
            tracing::warn!(error = %e, "Error saving results");
        }
    }

    println!("Building price tree, heaps and priority queue...");
    let catalog = Catalog::build(&unique);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let result = menu::print_summary(&mut out, &catalog, &diff.new_listings)
        .and_then(|_| menu::run_menu(&catalog, &mut io::stdin().lock(), &mut out))
        .and_then(|_| out.flush());
    if let Err(e) = result {
        tracing::error!(error = %e, "Terminal I/O failed");
    }
}
