//! Streaming integration tests
//!
//! Streams run on the calling thread, so these are plain `#[test]`s except
//! where an engine is needed for its configured chunk size.

#[cfg(test)]
mod tests {
    use crate::common::fixtures::test_engine;
    use anyhow::bail;
    use batchflow::{ItemProcessor, Outcome, ProcessorArgs, StreamProcessor};
    use std::cell::Cell;
    use std::rc::Rc;

    fn sum(chunk: &Vec<u64>, _: &ProcessorArgs) -> anyhow::Result<Outcome> {
        Ok(Outcome::from(chunk.iter().sum::<u64>() as i64))
    }

    #[test]
    fn test_stream_over_unbounded_source() {
        let stream = StreamProcessor::new(1u64.., sum, 10, Some(35), ProcessorArgs::new()).unwrap();
        let outcomes: Vec<_> = stream.collect();

        let sizes: Vec<usize> = outcomes.iter().map(|o| o.chunk_size).collect();
        assert_eq!(sizes, vec![10, 10, 10, 5]);

        let total: i64 = outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().ok())
            .filter_map(Outcome::as_int)
            .sum();
        assert_eq!(total, (1..=35).sum::<i64>());
        assert_eq!(outcomes.last().unwrap().items_processed, 35);
    }

    #[test]
    fn test_stream_pulls_source_lazily() {
        let pulled = Rc::new(Cell::new(0usize));
        let counter = Rc::clone(&pulled);
        let source = (0u64..1_000).inspect(move |_| counter.set(counter.get() + 1));

        let mut stream = StreamProcessor::new(source, sum, 4, None, ProcessorArgs::new()).unwrap();
        assert_eq!(pulled.get(), 0);

        let first = stream.next().unwrap();
        assert_eq!(first.chunk_index, 0);
        assert_eq!(pulled.get(), 4);
        assert_eq!(stream.items_processed(), 4);

        stream.next().unwrap();
        assert_eq!(pulled.get(), 8);
    }

    #[test]
    fn test_stream_continues_after_failed_chunk() {
        let processor = |chunk: &Vec<u64>, _: &ProcessorArgs| -> anyhow::Result<Outcome> {
            if chunk.contains(&5) {
                bail!("bad chunk starting at {}", chunk[0]);
            }
            Ok(Outcome::from(chunk.len()))
        };

        let outcomes: Vec<_> = StreamProcessor::new(0u64..9, processor, 3, None, ProcessorArgs::new())
            .unwrap()
            .collect();

        assert_eq!(outcomes.len(), 3);
        assert!(outcomes[0].is_success());
        assert!(!outcomes[1].is_success());
        assert!(outcomes[2].is_success());

        let failure = outcomes[1].result.as_ref().unwrap_err();
        assert_eq!(failure.message, "bad chunk starting at 3");
    }

    #[test]
    fn test_stream_with_item_processor() {
        let processor = ItemProcessor::new(
            "even_only",
            |item: &u64, _: &ProcessorArgs| -> anyhow::Result<Outcome> {
                if item % 2 == 1 {
                    bail!("odd item {}", item);
                }
                Ok(Outcome::from(*item as i64))
            },
        );

        let outcomes: Vec<_> = StreamProcessor::new(0u64..6, processor, 6, None, ProcessorArgs::new())
            .unwrap()
            .collect();

        assert_eq!(outcomes.len(), 1);
        let summary = outcomes[0].result.as_ref().unwrap().to_primitive();
        assert_eq!(summary["successful"], 3);
        assert_eq!(summary["failed"], 3);
    }

    #[test]
    fn test_zero_max_items_yields_nothing() {
        let mut stream = StreamProcessor::new(0u64.., sum, 5, Some(0), ProcessorArgs::new()).unwrap();
        assert!(stream.next().is_none());
        assert_eq!(stream.items_processed(), 0);
    }

    #[tokio::test]
    async fn test_engine_stream_uses_configured_chunk_size() {
        let engine = test_engine(2, 7);
        let outcomes: Vec<_> = engine
            .stream_process(0u64..20, sum, None, None, ProcessorArgs::new())
            .unwrap()
            .collect();
        assert_eq!(
            outcomes.iter().map(|o| o.chunk_size).collect::<Vec<_>>(),
            vec![7, 7, 6]
        );

        let err = engine
            .stream_process(0u64..20, sum, Some(0), None, ProcessorArgs::new())
            .err()
            .unwrap();
        assert!(matches!(err, batchflow::EngineError::InvalidRequest(_)));
    }
}
