// src/index/heap.rs

use crate::domain::listing::{Listing, Priced};

/// Decides which of two items leaves the queue first.
///
/// `precedes(a, b)` must be a strict, consistent order: never true for both
/// `(a, b)` and `(b, a)`, and the same answer every time for the same pair.
/// An ordering that breaks this won't crash the queue, but the extraction order
/// becomes meaningless. Keeping it consistent is the caller's job.
pub trait Priority<T> {
    fn precedes(&self, a: &T, b: &T) -> bool;
}

impl<T, F> Priority<T> for F
where
    F: Fn(&T, &T) -> bool,
{
    fn precedes(&self, a: &T, b: &T) -> bool {
        self(a, b)
    }
}

/// Cheapest first.
#[derive(Debug, Clone, Copy, Default)]
pub struct LowestPrice;

impl<T: Priced> Priority<T> for LowestPrice {
    fn precedes(&self, a: &T, b: &T) -> bool {
        a.price() < b.price()
    }
}

/// Most expensive first.
#[derive(Debug, Clone, Copy, Default)]
pub struct HighestPrice;

impl<T: Priced> Priority<T> for HighestPrice {
    fn precedes(&self, a: &T, b: &T) -> bool {
        a.price() > b.price()
    }
}

/// Listings with utilities included go first; within each side, the cheaper one.
/// Unknown utilities count as not included.
pub fn utilities_then_price(a: &Listing, b: &Listing) -> bool {
    let a_utils = a.utilities_included == Some(true);
    let b_utils = b.utilities_included == Some(true);
    match (a_utils, b_utils) {
        (true, false) => true,
        (false, true) => false,
        _ => a.price < b.price,
    }
}

/// Array-backed binary heap ordered by a `Priority` strategy.
///
/// Slot `i` has its parent at `(i - 1) / 2` and children at `2i + 1`, `2i + 2`.
#[derive(Debug, Clone)]
pub struct PriorityQueue<T, P> {
    items: Vec<T>,
    priority: P,
}

pub type MinHeap<T = Listing> = PriorityQueue<T, LowestPrice>;
pub type MaxHeap<T = Listing> = PriorityQueue<T, HighestPrice>;

impl<T, P: Priority<T> + Default> Default for PriorityQueue<T, P> {
    fn default() -> Self {
        Self::with_priority(P::default())
    }
}

impl<T, P: Priority<T>> PriorityQueue<T, P> {
    pub fn new() -> Self
    where
        P: Default,
    {
        Self::default()
    }

    pub fn with_priority(priority: P) -> Self {
        Self {
            items: Vec::new(),
            priority,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The item that would be extracted next, or `None` when empty.
    pub fn peek(&self) -> Option<&T> {
        self.items.first()
    }

    pub fn insert(&mut self, item: T) {
        self.items.push(item);
        self.sift_up(self.items.len() - 1);
    }

    /// Removes and returns the top item, or `None` when empty.
    pub fn extract_top(&mut self) -> Option<T> {
        if self.items.is_empty() {
            return None;
        }
        let top = self.items.swap_remove(0);
        if !self.items.is_empty() {
            self.sift_down(0);
        }
        Some(top)
    }

    /// Extracts up to `k` items in priority order.
    pub fn take_top(&mut self, k: usize) -> Vec<T> {
        let mut out = Vec::with_capacity(k.min(self.len()));
        while out.len() < k {
            match self.extract_top() {
                Some(item) => out.push(item),
                None => break,
            }
        }
        out
    }

    fn sift_up(&mut self, mut i: usize) {
        while i > 0 {
            let parent = (i - 1) / 2;
            if !self.priority.precedes(&self.items[i], &self.items[parent]) {
                break;
            }
            self.items.swap(i, parent);
            i = parent;
        }
    }

    fn sift_down(&mut self, mut i: usize) {
        let len = self.items.len();
        loop {
            let left = 2 * i + 1;
            let right = left + 1;
            let mut top = i;

            if left < len && self.priority.precedes(&self.items[left], &self.items[top]) {
                top = left;
            }
            if right < len && self.priority.precedes(&self.items[right], &self.items[top]) {
                top = right;
            }
            if top == i {
                break;
            }
            self.items.swap(i, top);
            i = top;
        }
    }
}

impl<T, P: Priority<T>> Extend<T> for PriorityQueue<T, P> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.insert(item);
        }
    }
}
