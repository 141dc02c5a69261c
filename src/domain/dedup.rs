// src/domain/dedup.rs

use crate::domain::listing::Listing;
use std::collections::HashMap;
use std::str::FromStr;
use thiserror::Error;

/// Which records land in the same deduplication group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DedupPolicy {
    /// Group on (address, size, rooms, price). The same flat at two prices stays
    /// as two listings; only exact copies merge.
    #[default]
    ExactPrice,
    /// Group on (address, size, rooms). The cheaper copy of a flat wins.
    AnyPrice,
}

#[derive(Debug, Error, PartialEq)]
#[error("unknown dedup policy '{0}', expected exact-price or any-price")]
pub struct UnknownPolicy(pub String);

impl FromStr for DedupPolicy {
    type Err = UnknownPolicy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "exact-price" | "exact" => Ok(DedupPolicy::ExactPrice),
            "any-price" | "any" => Ok(DedupPolicy::AnyPrice),
            other => Err(UnknownPolicy(other.to_string())),
        }
    }
}

/// Grouping key. Floats are compared by bit pattern, which is exact equality for
/// the finite, non-negative values a `Listing` carries.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct GroupKey {
    address: String,
    size_bits: u64,
    rooms: u32,
    price_bits: Option<u64>,
}

impl GroupKey {
    fn of(listing: &Listing, policy: DedupPolicy) -> Self {
        GroupKey {
            address: listing.address.trim().to_lowercase(),
            size_bits: listing.size.to_bits(),
            rooms: listing.rooms,
            price_bits: match policy {
                DedupPolicy::ExactPrice => Some(listing.price.to_bits()),
                DedupPolicy::AnyPrice => None,
            },
        }
    }
}

/// Collapses duplicate listings into one per group.
///
/// Within a group the cheaper listing wins; on an exact price tie the first one
/// stays and absorbs the other's portal and link. Groups come out in the order
/// their first member was seen. Running it twice changes nothing.
pub fn remove_duplicates(listings: &[Listing], policy: DedupPolicy) -> Vec<Listing> {
    let mut slots: HashMap<GroupKey, usize> = HashMap::with_capacity(listings.len());
    let mut unique: Vec<Listing> = Vec::with_capacity(listings.len());

    for listing in listings {
        let key = GroupKey::of(listing, policy);
        match slots.get(&key) {
            Some(&slot) => {
                let kept = &mut unique[slot];
                if listing.price < kept.price {
                    *kept = listing.clone();
                } else if listing.price == kept.price {
                    kept.merge_provenance(listing);
                }
            }
            None => {
                slots.insert(key, unique.len());
                unique.push(listing.clone());
            }
        }
    }

    unique
}
