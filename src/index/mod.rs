pub mod heap;
pub mod price_tree;

pub use heap::{utilities_then_price, MaxHeap, MinHeap, PriorityQueue};
pub use price_tree::PriceTree;
