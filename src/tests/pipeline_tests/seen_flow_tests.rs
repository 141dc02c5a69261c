// src/tests/pipeline_tests/seen_flow_tests.rs

use crate::catalog::enrich;
use crate::domain::{diff_against_history, remove_duplicates, DedupPolicy};
use crate::geo::DEFAULT_COMMUTE;
use crate::tests::utils::{raw, temp_store};
use chrono::{TimeZone, Utc};

#[test]
fn second_run_only_reports_fresh_listings() {
    let store = temp_store("pipeline_seen");
    let monday = Utc.with_ymd_and_hms(2024, 6, 3, 9, 0, 0).unwrap();
    let tuesday = Utc.with_ymd_and_hms(2024, 6, 4, 9, 0, 0).unwrap();

    let first = enrich(
        vec![
            raw("a", "Stabu 1", 40.0, 1, 450.0),
            raw("b", "Matisa 7", 55.0, 2, 600.0),
        ],
        |_| DEFAULT_COMMUTE,
    );
    let first = remove_duplicates(&first, DedupPolicy::default());
    let diff = diff_against_history(&first, &store.load().unwrap(), monday);
    assert_eq!(diff.new_listings.len(), 2);
    store.save(&diff.seen).unwrap();

    let second = enrich(
        vec![
            raw("b", "Matisa 7", 55.0, 2, 600.0),
            raw("c", "Avotu 12", 35.0, 1, 380.0),
        ],
        |_| DEFAULT_COMMUTE,
    );
    let diff = diff_against_history(&second, &store.load().unwrap(), tuesday);
    let fresh: Vec<&str> = diff.new_listings.iter().map(|l| l.id.as_str()).collect();
    assert_eq!(fresh, vec!["c"]);

    store.save(&diff.seen).unwrap();
    let stored = store.load().unwrap();
    // "a" dropped out of the batch, "b" keeps its first sighting
    assert_eq!(stored.len(), 2);
    assert_eq!(stored.get("b"), Some(&monday));
    assert_eq!(stored.get("c"), Some(&tuesday));
    assert!(!stored.contains_key("a"));
}

#[test]
fn first_run_reports_everything() {
    let store = temp_store("pipeline_first");
    let batch = enrich(vec![raw("x", "Caka 3", 30.0, 1, 300.0)], |_| DEFAULT_COMMUTE);
    let diff = diff_against_history(&batch, &store.load().unwrap(), Utc::now());
    assert_eq!(diff.new_listings.len(), 1);
    assert_eq!(diff.seen.len(), 1);
}
