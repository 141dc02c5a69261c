// src/index/price_tree.rs

use crate::domain::listing::Listing;
use std::cmp::Ordering;

#[derive(Debug, Clone)]
struct Node {
    key: f64,
    listings: Vec<Listing>,
    left: Option<usize>,
    right: Option<usize>,
}

/// Unbalanced binary search tree keyed by price.
///
/// Every node holds the listings that share its price, in insertion order. Nodes
/// live in one `Vec` and refer to their children by position, and every walk is
/// a loop, so a degenerate tree costs time but never stack.
///
/// There is no rebalancing: feeding it sorted prices builds a linked list and
/// makes `insert`/`find` O(n). That is a known limitation.
#[derive(Debug, Clone, Default)]
pub struct PriceTree {
    nodes: Vec<Node>,
    root: Option<usize>,
}

impl PriceTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct prices (nodes), not listings.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Adds `listing` under `price`. If a node already holds the same flat
    /// (see `Listing::is_same_listing`), the listing is dropped. `-0.0` is stored
    /// as `0.0`.
    pub fn insert(&mut self, price: f64, listing: Listing) {
        let price = price + 0.0;
        let Some(mut current) = self.root else {
            self.root = Some(self.push_node(price, listing));
            return;
        };

        loop {
            let node = &mut self.nodes[current];
            let (child, goes_left) = match price.total_cmp(&node.key) {
                Ordering::Equal => {
                    if !node.listings.iter().any(|l| l.is_same_listing(&listing)) {
                        node.listings.push(listing);
                    }
                    return;
                }
                Ordering::Less => (node.left, true),
                Ordering::Greater => (node.right, false),
            };

            match child {
                Some(next) => current = next,
                None => {
                    let leaf = self.push_node(price, listing);
                    let parent = &mut self.nodes[current];
                    if goes_left {
                        parent.left = Some(leaf);
                    } else {
                        parent.right = Some(leaf);
                    }
                    return;
                }
            }
        }
    }

    fn push_node(&mut self, key: f64, listing: Listing) -> usize {
        self.nodes.push(Node {
            key,
            listings: vec![listing],
            left: None,
            right: None,
        });
        self.nodes.len() - 1
    }

    /// Listings stored at exactly `price`, or `None` when no node has that key.
    pub fn find(&self, price: f64) -> Option<&[Listing]> {
        let price = price + 0.0;
        let mut current = self.root;
        while let Some(idx) = current {
            let node = &self.nodes[idx];
            current = match price.total_cmp(&node.key) {
                Ordering::Equal => return Some(&node.listings),
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
            };
        }
        None
    }

    /// Listings priced within `[min, max]`, ascending, ties in insertion order.
    ///
    /// Subtrees that cannot hold a qualifying key are never entered: the left one
    /// when `min >= key`, the right one when `max <= key`.
    pub fn find_range(&self, min: f64, max: f64) -> Vec<&Listing> {
        let mut out = Vec::new();
        let mut stack = Vec::new();
        let mut current = self.root;

        loop {
            while let Some(idx) = current {
                stack.push(idx);
                let node = &self.nodes[idx];
                current = if min < node.key { node.left } else { None };
            }

            let Some(idx) = stack.pop() else {
                break;
            };
            let node = &self.nodes[idx];
            if min <= node.key && node.key <= max {
                out.extend(node.listings.iter());
            }
            current = if node.key < max { node.right } else { None };
        }

        out
    }

    /// Every listing, ascending by price.
    pub fn in_order(&self) -> Vec<&Listing> {
        self.find_range(f64::NEG_INFINITY, f64::INFINITY)
    }
}
