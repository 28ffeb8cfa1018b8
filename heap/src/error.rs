//! Heap introspection errors.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HeapError {
    #[error("heap index {index} out of range (size {size})")]
    IndexOutOfRange { index: usize, size: usize },
}
