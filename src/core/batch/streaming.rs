//! Streaming mode
//!
//! Pulls items from a source, buffers them into chunks and runs the processor
//! on the calling thread, one chunk per `next()`. There is no job record.

use super::outcome::Outcome;
use super::processor::{Processor, ProcessorArgs, UnitFailure, run_unit};
use crate::utils::error::{EngineError, Result};
use serde::Serialize;
use tracing::{debug, warn};

/// Outcome of one streamed chunk
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StreamOutcome {
    /// Zero-based position of the chunk in the stream
    pub chunk_index: usize,
    /// Items in this chunk
    pub chunk_size: usize,
    /// Items pulled from the source so far, this chunk included
    pub items_processed: usize,
    pub result: std::result::Result<Outcome, UnitFailure>,
}

impl StreamOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Lazy iterator over per-chunk outcomes
pub struct StreamProcessor<I, P> {
    source: I,
    processor: P,
    args: ProcessorArgs,
    chunk_size: usize,
    max_items: Option<usize>,
    items_processed: usize,
    chunk_index: usize,
    exhausted: bool,
}

impl<I, P> StreamProcessor<I, P>
where
    I: Iterator,
    P: Processor<Vec<I::Item>>,
{
    /// Wrap `source`; `max_items` bounds how many items are ever pulled
    pub fn new(
        source: impl IntoIterator<IntoIter = I>,
        processor: P,
        chunk_size: usize,
        max_items: Option<usize>,
        args: ProcessorArgs,
    ) -> Result<Self> {
        if chunk_size == 0 {
            return Err(EngineError::invalid_request(
                "chunk_size must be greater than 0",
            ));
        }

        Ok(Self {
            source: source.into_iter(),
            processor,
            args,
            chunk_size,
            max_items,
            items_processed: 0,
            chunk_index: 0,
            exhausted: false,
        })
    }

    /// Items pulled from the source so far
    pub fn items_processed(&self) -> usize {
        self.items_processed
    }

    fn fill_chunk(&mut self) -> Vec<I::Item> {
        let mut chunk = Vec::with_capacity(self.chunk_size);
        while chunk.len() < self.chunk_size {
            if self.max_items.is_some_and(|max| self.items_processed >= max) {
                self.exhausted = true;
                break;
            }
            match self.source.next() {
                Some(item) => {
                    chunk.push(item);
                    self.items_processed += 1;
                }
                None => {
                    self.exhausted = true;
                    break;
                }
            }
        }
        chunk
    }
}

impl<I, P> Iterator for StreamProcessor<I, P>
where
    I: Iterator,
    P: Processor<Vec<I::Item>>,
{
    type Item = StreamOutcome;

    fn next(&mut self) -> Option<StreamOutcome> {
        if self.exhausted {
            return None;
        }

        let chunk = self.fill_chunk();
        if chunk.is_empty() {
            return None;
        }

        let chunk_index = self.chunk_index;
        self.chunk_index += 1;

        let result = run_unit(&self.processor, &chunk, &self.args);
        match &result {
            Ok(_) => debug!(chunk = chunk_index, items = chunk.len(), "Stream chunk processed"),
            Err(failure) => warn!(chunk = chunk_index, error = %failure, "Stream chunk failed"),
        }

        Some(StreamOutcome {
            chunk_index,
            chunk_size: chunk.len(),
            items_processed: self.items_processed,
            result,
        })
    }
}
