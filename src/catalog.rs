// catalog.rs
use crate::domain::{sort_by_price_ascending, Commute, Listing};
use crate::index::{utilities_then_price, MaxHeap, MinHeap, PriceTree, PriorityQueue};
use crate::scraper::RawListing;
use std::time::{Duration, Instant};

pub type UtilitiesQueue = PriorityQueue<Listing, fn(&Listing, &Listing) -> bool>;

/// How long each structure took to build.
#[derive(Debug, Clone, Default)]
pub struct BuildMetrics {
    pub listings: usize,
    pub tree_nodes: usize,
    pub tree_listings: usize,
    pub sort: Duration,
    pub tree: Duration,
    pub min_heap: Duration,
    pub max_heap: Duration,
    pub priority_queue: Duration,
}

/// Every index over one fixed batch of listings. Built once, then only read
/// (heaps are cloned before extracting from them).
pub struct Catalog {
    pub sorted: Vec<Listing>,
    pub by_price: PriceTree,
    pub min_heap: MinHeap,
    pub max_heap: MaxHeap,
    pub utilities_first: UtilitiesQueue,
    pub metrics: BuildMetrics,
}

fn timed<T>(f: impl FnOnce() -> T) -> (T, Duration) {
    let start = Instant::now();
    let out = f();
    (out, start.elapsed())
}

impl Catalog {
    /// Sorts `listings` and seeds the tree, both heaps and the
    /// utilities-first queue from the sorted copy.
    ///
    /// The tree drops a listing when its price node already holds the same flat
    /// (`Listing::is_same_listing`), so it can hold fewer listings than `sorted`.
    pub fn build(listings: &[Listing]) -> Self {
        let (sorted, sort) = timed(|| sort_by_price_ascending(listings));

        let (by_price, tree) = timed(|| {
            let mut tree = PriceTree::new();
            for l in &sorted {
                tree.insert(l.price, l.clone());
            }
            tree
        });

        let (min_heap, min_heap_time) = timed(|| {
            let mut heap = MinHeap::new();
            heap.extend(sorted.iter().cloned());
            heap
        });

        let (max_heap, max_heap_time) = timed(|| {
            let mut heap = MaxHeap::new();
            heap.extend(sorted.iter().cloned());
            heap
        });

        let (utilities_first, priority_queue) = timed(|| {
            let by_utilities = utilities_then_price as fn(&Listing, &Listing) -> bool;
            let mut queue: UtilitiesQueue = PriorityQueue::with_priority(by_utilities);
            queue.extend(sorted.iter().cloned());
            queue
        });

        let metrics = BuildMetrics {
            listings: sorted.len(),
            tree_nodes: by_price.len(),
            tree_listings: by_price.in_order().len(),
            sort,
            tree,
            min_heap: min_heap_time,
            max_heap: max_heap_time,
            priority_queue,
        };
        tracing::debug!(?metrics, "Catalog built");

        Catalog {
            sorted,
            by_price,
            min_heap,
            max_heap,
            utilities_first,
            metrics,
        }
    }

    /// Up to `k` cheapest listings, leaving the heap intact.
    pub fn cheapest(&self, k: usize) -> Vec<Listing> {
        self.min_heap.clone().take_top(k)
    }

    pub fn most_expensive(&self, k: usize) -> Vec<Listing> {
        self.max_heap.clone().take_top(k)
    }

    /// Up to `k` listings by utilities-first, then price.
    pub fn top_priority(&self, k: usize) -> Vec<Listing> {
        self.utilities_first.clone().take_top(k)
    }
}

/// Attaches a commute estimate to each raw record and validates it. Records
/// that fail validation are logged and left out.
pub fn enrich<F>(raw: Vec<RawListing>, locate: F) -> Vec<Listing>
where
    F: Fn(&str) -> Commute,
{
    raw.into_iter()
        .filter_map(|r| {
            let commute = locate(&r.address);
            Listing::from_raw(r, Some(commute))
                .map_err(|e| tracing::warn!(error = %e, "Rejected listing"))
                .ok()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::listing::tests::listing;
    use crate::domain::{remove_duplicates, DedupPolicy};

    #[test]
    fn build_seeds_every_structure() {
        let mut listings = vec![
            listing("a", "Brivibas 10", 40.0, 1, 600.0),
            listing("b", "Caka 3", 30.0, 1, 500.0),
            listing("c", "Matisa 7", 50.0, 2, 550.0),
            listing("d", "Stabu 1", 60.0, 2, 500.0),
        ];
        listings[0].utilities_included = Some(false);
        listings[1].utilities_included = Some(true);
        listings[2].utilities_included = Some(true);

        let catalog = Catalog::build(&listings);

        let prices: Vec<f64> = catalog.sorted.iter().map(|l| l.price).collect();
        assert_eq!(prices, vec![500.0, 500.0, 550.0, 600.0]);
        assert_eq!(catalog.metrics.listings, 4);
        assert_eq!(catalog.metrics.tree_nodes, 3);
        assert_eq!(catalog.metrics.tree_listings, 4);
        assert_eq!(catalog.by_price.find(500.0).map(|v| v.len()), Some(2));

        assert_eq!(catalog.cheapest(1)[0].price, 500.0);
        assert_eq!(catalog.most_expensive(1)[0].id, "a");
        // d has unknown utilities, so it ranks with the "not included" side
        let priority: Vec<String> = catalog.top_priority(3).into_iter().map(|l| l.id).collect();
        assert_eq!(priority, vec!["b", "c", "d"]);
    }

    #[test]
    fn peeking_helpers_leave_heaps_intact() {
        let listings = vec![
            listing("a", "A 1", 40.0, 1, 300.0),
            listing("b", "B 1", 40.0, 1, 200.0),
        ];
        let catalog = Catalog::build(&listings);
        assert_eq!(catalog.cheapest(5).len(), 2);
        assert_eq!(catalog.min_heap.len(), 2);
        assert_eq!(catalog.max_heap.peek().map(|l| l.price), Some(300.0));
    }

    #[test]
    fn tree_keeps_one_copy_of_a_near_duplicate_at_the_same_price() {
        // 40 and 41 m² differ, so both survive dedup, but they are the same flat
        let listings = vec![
            listing("a", "Brivibas 10", 40.0, 1, 500.0),
            listing("b", "brivibas 10", 41.0, 1, 500.0),
        ];
        let unique = remove_duplicates(&listings, DedupPolicy::ExactPrice);
        assert_eq!(unique.len(), 2);

        let catalog = Catalog::build(&unique);
        assert_eq!(catalog.sorted.len(), 2);
        assert_eq!(catalog.by_price.find_range(0.0, 1000.0).len(), 1);
        assert_eq!(catalog.metrics.tree_listings, 1);
        assert_eq!(catalog.cheapest(5).len(), 2);
    }

    #[test]
    fn enrich_attaches_commute_and_drops_bad_prices() {
        let raw = vec![
            RawListing {
                id: "ok".to_string(),
                price: 400.0,
                size: 40.0,
                address: "Teika".to_string(),
                ..RawListing::default()
            },
            RawListing {
                id: "bad".to_string(),
                price: -1.0,
                ..RawListing::default()
            },
        ];
        let out = enrich(raw, |address| Commute {
            distance_km: address.len() as f64,
            minutes: 1,
        });
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, "ok");
        assert_eq!(out[0].distance_km(), Some(5.0));
    }
}
