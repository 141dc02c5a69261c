// src/tests/pipeline_tests/catalog_flow_tests.rs

use crate::catalog::{enrich, Catalog};
use crate::domain::{remove_duplicates, DedupPolicy, Listing, ListingQuery};
use crate::geo::{estimate_from_known_places, DEFAULT_COMMUTE};
use crate::scraper::RawListing;
use crate::tests::utils::raw;

fn scraped_batch() -> Vec<RawListing> {
    let mut teika = raw("a", "Riga, Teika, Ropazu 20", 60.0, 2, 550.0);
    teika.utilities_included = Some(true);
    // same flat, reposted with different capitalisation
    let repost = raw("a2", "RIGA, TEIKA, ROPAZU 20 ", 60.0, 2, 550.0);
    let mut centre = raw("b", "Brivibas iela 10", 40.0, 1, 400.0);
    centre.furnished = Some(true);
    let imanta = raw("c", "Anninmuizas bulv. 5, Imanta", 75.0, 3, 700.0);
    let unknown = raw("d", "Somewhere 1", 30.0, 1, 300.0);
    let broken = raw("bad", "Caka 3", 30.0, 1, -5.0);

    vec![teika, repost, centre, imanta, unknown, broken]
}

fn offline_locate(address: &str) -> crate::domain::Commute {
    estimate_from_known_places(address).unwrap_or(DEFAULT_COMMUTE)
}

fn build() -> (Vec<Listing>, Catalog) {
    let listings = enrich(scraped_batch(), offline_locate);
    let unique = remove_duplicates(&listings, DedupPolicy::default());
    let catalog = Catalog::build(&unique);
    (unique, catalog)
}

fn ids<'a>(listings: impl IntoIterator<Item = &'a Listing>) -> Vec<&'a str> {
    listings.into_iter().map(|l| l.id.as_str()).collect()
}

#[test]
fn scraped_batch_flows_into_every_structure() {
    let (unique, catalog) = build();

    // bad price rejected, repost merged into its first copy
    assert_eq!(ids(&unique), vec!["a", "b", "c", "d"]);
    assert_eq!(unique[0].portal, "ss.com, ss.com");

    assert_eq!(ids(&catalog.sorted), vec!["d", "b", "a", "c"]);
    assert_eq!(catalog.metrics.listings, 4);
    assert_eq!(catalog.metrics.tree_nodes, 4);

    assert_eq!(ids(catalog.by_price.find_range(350.0, 600.0)), vec!["b", "a"]);
    assert!(catalog.by_price.find(425.0).is_none());

    assert_eq!(ids(&catalog.cheapest(2)), vec!["d", "b"]);
    assert_eq!(ids(&catalog.most_expensive(1)), vec!["c"]);
    assert_eq!(ids(&catalog.top_priority(2)), vec!["a", "d"]);
}

#[test]
fn commute_comes_from_the_district_table() {
    let (unique, _) = build();
    let km: Vec<Option<f64>> = unique.iter().map(Listing::distance_km).collect();
    assert_eq!(km, vec![Some(4.5), Some(2.0), Some(9.0), Some(DEFAULT_COMMUTE.distance_km)]);
}

#[test]
fn queries_run_over_the_sorted_batch() {
    let (_, catalog) = build();

    let near = ListingQuery::new().within_km(5.0).apply(&catalog.sorted);
    assert_eq!(ids(&near), vec!["d", "b", "a"]);

    let furnished = ListingQuery::new().furnished(true).apply(&catalog.sorted);
    assert_eq!(ids(&furnished), vec!["b"]);

    let teika = ListingQuery::new()
        .in_districts(["teika"])
        .price_between(500.0, 600.0)
        .apply(&catalog.sorted);
    assert_eq!(ids(&teika), vec!["a"]);
}

#[test]
fn any_price_policy_keeps_the_cheaper_repost() {
    let mut batch = scraped_batch();
    batch[1].price = 520.0;
    let listings = enrich(batch, offline_locate);

    let exact = remove_duplicates(&listings, DedupPolicy::ExactPrice);
    let any = remove_duplicates(&listings, DedupPolicy::AnyPrice);

    assert_eq!(exact.len(), 5);
    assert_eq!(ids(&any), vec!["a2", "b", "c", "d"]);
    assert_eq!(any[0].price, 520.0);
}

#[test]
fn empty_scrape_builds_an_empty_catalog() {
    let catalog = Catalog::build(&enrich(Vec::new(), offline_locate));
    assert!(catalog.sorted.is_empty());
    assert!(catalog.by_price.is_empty());
    assert!(catalog.cheapest(3).is_empty());
    assert!(catalog.top_priority(3).is_empty());
}
