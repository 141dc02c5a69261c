// src/domain/sort.rs

use crate::domain::listing::Priced;

/// Returns a copy of `items` in ascending price order. The input is left untouched.
///
/// Classic quicksort with the last element as pivot: O(n log n) on average, O(n²) on
/// already-sorted input. Not stable, so equal prices may come out in any order.
/// Pending ranges are kept on an explicit stack rather than the call stack.
pub fn sort_by_price_ascending<T: Priced + Clone>(items: &[T]) -> Vec<T> {
    let mut out = items.to_vec();
    if out.len() < 2 {
        return out;
    }

    let mut ranges = vec![(0, out.len() - 1)];
    while let Some((low, high)) = ranges.pop() {
        if low >= high {
            continue;
        }
        let pivot = partition(&mut out, low, high);
        if pivot > low {
            ranges.push((low, pivot - 1));
        }
        ranges.push((pivot + 1, high));
    }

    out
}

/// Lomuto partition around `items[high]`; returns the pivot's final position.
fn partition<T: Priced>(items: &mut [T], low: usize, high: usize) -> usize {
    let pivot = items[high].price();
    let mut store = low;
    for j in low..high {
        if items[j].price() <= pivot {
            items.swap(store, j);
            store += 1;
        }
    }
    items.swap(store, high);
    store
}
