//! Top-holder heap.
//!
//! A fixed-capacity min-heap of `(address, balance)` entries plus a reverse
//! address → slot index kept in lock-step. The root is always the smallest
//! resident balance, i.e. the next eviction candidate. Winner draws index into
//! the heap array directly, so slot positions are part of observable state.

pub mod error;
pub mod heap;

pub use error::HeapError;
pub use heap::{HeapChange, HeapEntry, TopHeap};
