//! Chunker: bounded, ordered partitions of a job's input

use super::table::Table;
use crate::utils::error::{EngineError, Result};

/// A contiguous slice of the input plus its position in the original ordering
#[derive(Debug, Clone, PartialEq)]
pub struct Chunk<C> {
    /// Zero-based chunk position
    pub index: usize,
    /// Position of the chunk's first item in the input
    pub offset: usize,
    pub data: C,
}

/// Collections the engine knows how to partition
pub trait Chunkable: Sized {
    /// What a single chunk looks like
    type Part;

    /// Number of items (rows, paths, ...)
    fn item_count(&self) -> usize;

    /// Consume the collection into consecutive parts of at most `size` items
    fn split(self, size: usize) -> Vec<Self::Part>;
}

impl Chunkable for Table {
    type Part = Table;

    fn item_count(&self) -> usize {
        self.len()
    }

    fn split(self, size: usize) -> Vec<Table> {
        self.split_rows(size)
    }
}

impl<T> Chunkable for Vec<T> {
    type Part = Vec<T>;

    fn item_count(&self) -> usize {
        self.len()
    }

    fn split(self, size: usize) -> Vec<Vec<T>> {
        let size = size.max(1);
        let mut parts = Vec::with_capacity(self.len().div_ceil(size));
        let mut iter = self.into_iter();
        loop {
            let part: Vec<T> = iter.by_ref().take(size).collect();
            if part.is_empty() {
                break;
            }
            parts.push(part);
        }
        parts
    }
}

/// Number of chunks a collection of `len` items yields
pub fn chunk_count(len: usize, chunk_size: usize) -> usize {
    if chunk_size == 0 {
        return 0;
    }
    len.div_ceil(chunk_size)
}

/// Partition `source` into `ceil(len / chunk_size)` indexed chunks
pub fn chunk<S: Chunkable>(source: S, chunk_size: usize) -> Result<Vec<Chunk<S::Part>>> {
    if chunk_size == 0 {
        return Err(EngineError::invalid_request(
            "chunk_size must be greater than 0",
        ));
    }

    Ok(source
        .split(chunk_size)
        .into_iter()
        .enumerate()
        .map(|(index, data)| Chunk {
            index,
            offset: index * chunk_size,
            data,
        })
        .collect())
}
