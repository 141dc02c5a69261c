// src/domain/history.rs

use crate::domain::listing::Listing;
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Listing id -> when it was first recorded as seen.
pub type SeenMap = HashMap<String, DateTime<Utc>>;

/// Result of comparing the current batch with the previous run.
#[derive(Debug, Default)]
pub struct HistoryDiff {
    /// Listings whose id was not in the previous run, in batch order.
    pub new_listings: Vec<Listing>,
    /// What to store for next time: only ids in the current batch, keeping the
    /// earlier timestamp for ids that were already known.
    pub seen: SeenMap,
}

pub fn diff_against_history(listings: &[Listing], history: &SeenMap, now: DateTime<Utc>) -> HistoryDiff {
    let mut diff = HistoryDiff::default();

    for listing in listings {
        match history.get(&listing.id) {
            Some(&first_seen) => {
                diff.seen.insert(listing.id.clone(), first_seen);
            }
            None => {
                // merged duplicates can share an id; report it once
                if diff.seen.insert(listing.id.clone(), now).is_none() {
                    diff.new_listings.push(listing.clone());
                }
            }
        }
    }

    diff
}
