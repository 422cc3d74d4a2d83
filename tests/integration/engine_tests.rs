//! Engine integration tests
//!
//! Drive whole jobs through the public API: submission, tracking, results
//! and cancellation, with real files on disk where the job kind needs them.

#[cfg(test)]
mod tests {
    use crate::common::fixtures::{numbers_table, test_engine, text_files, wait};
    use anyhow::{Context, bail};
    use batchflow::{
        ConcurrencyMode, EngineError, ItemProcessor, JobOptions, JobResults, JobStatus, Outcome,
        PoolScope, ProcessorArgs, Table,
    };
    use serde_json::{Map, Value};
    use std::path::PathBuf;
    use std::time::Duration;

    fn line_counter(path: &PathBuf, _: &ProcessorArgs) -> anyhow::Result<Outcome> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        Ok(Outcome::from(text.lines().count()))
    }

    // ==================== Dataframe Jobs ====================

    #[tokio::test]
    async fn test_item_processor_over_table_rows() {
        let engine = test_engine(4, 10);
        let processor = ItemProcessor::new(
            "double_check",
            |row: &Map<String, Value>, _: &ProcessorArgs| -> anyhow::Result<Outcome> {
                let id = row.get("id").and_then(Value::as_i64).unwrap_or_default();
                if id % 7 == 3 {
                    bail!("rejected row {}", id);
                }
                Ok(Outcome::from(id))
            },
        );

        let job_id = crate::assert_ok!(engine.submit_dataframe_job(
            numbers_table(25),
            processor,
            JobOptions::new()
        ));
        let snapshot = wait(&engine, &job_id).await;

        assert_eq!(snapshot.status, JobStatus::Completed);
        assert_eq!(snapshot.total_units, 3);
        assert_eq!(snapshot.processor_name, "double_check");
        // item failures are reported inside the chunk outcome, not as unit errors
        assert!(snapshot.errors.is_empty());

        let outcomes = engine.get_results(&job_id, false).unwrap().into_outcomes();
        let failed: i64 = outcomes
            .iter()
            .map(|o| o.to_primitive()["failed"].as_i64().unwrap())
            .sum();
        // ids 3, 10, 17, 24
        assert_eq!(failed, 4);
        assert_eq!(outcomes[2].to_primitive()["total"], 5);
    }

    #[tokio::test]
    async fn test_identity_processor_round_trips_table() {
        let engine = test_engine(3, 4);
        let input = numbers_table(11);

        let job_id = engine
            .submit_dataframe_job(
                input.clone(),
                |chunk: &Table, _: &ProcessorArgs| -> anyhow::Result<Outcome> {
                    Ok(Outcome::Table(chunk.clone()))
                },
                JobOptions::new().with_concurrency_mode(ConcurrencyMode::Isolated),
            )
            .unwrap();
        wait(&engine, &job_id).await;

        match engine.get_results(&job_id, true).unwrap() {
            JobResults::Table(table) => assert_eq!(table, input),
            other => panic!("expected a coalesced table, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_chunk_pool_scope_for_dataframe() {
        let engine = test_engine(2, 5);
        let job_id = engine
            .submit_dataframe_job(
                numbers_table(23),
                |chunk: &Table, _: &ProcessorArgs| -> anyhow::Result<Outcome> {
                    Ok(Outcome::from(chunk.len()))
                },
                JobOptions::new().with_pool_scope(PoolScope::Chunk),
            )
            .unwrap();
        let snapshot = wait(&engine, &job_id).await;

        assert_eq!(snapshot.settings.pool_scope, PoolScope::Chunk);
        let sizes: Vec<i64> = engine
            .get_results(&job_id, false)
            .unwrap()
            .into_outcomes()
            .iter()
            .filter_map(Outcome::as_int)
            .collect();
        assert_eq!(sizes, vec![5, 5, 5, 5, 3]);
    }

    // ==================== File Batch Jobs ====================

    #[tokio::test]
    async fn test_file_batch_over_real_files() {
        let dir = tempfile::tempdir().unwrap();
        let mut files = text_files(dir.path(), 6);
        files.insert(2, dir.path().join("missing.txt"));

        let engine = test_engine(4, 3);
        let job_id = engine
            .submit_file_batch_job(files, line_counter, JobOptions::new().with_name("line_count"))
            .unwrap();
        let snapshot = wait(&engine, &job_id).await;

        assert_eq!(snapshot.name, "line_count");
        assert_eq!(snapshot.status, JobStatus::Completed);
        assert_eq!(snapshot.settings.pool_scope, PoolScope::Chunk);
        assert_eq!(snapshot.total_units, 7);
        assert_eq!(snapshot.completed_units, 7);
        assert!(!snapshot.is_fully_successful());

        assert_eq!(snapshot.errors.len(), 1);
        let error = &snapshot.errors[0];
        assert_eq!(error.unit_index, 2);
        assert!(error.file.as_deref().unwrap().ends_with("missing.txt"));
        assert!(error.error.contains("missing.txt"));

        let counts: Vec<i64> = engine
            .get_results(&job_id, false)
            .unwrap()
            .into_outcomes()
            .iter()
            .filter_map(Outcome::as_int)
            .collect();
        assert_eq!(counts, vec![1, 2, 3, 4, 5, 6]);
    }

    #[tokio::test]
    async fn test_isolated_file_batch_with_job_scope() {
        let dir = tempfile::tempdir().unwrap();
        let files = text_files(dir.path(), 5);

        let engine = test_engine(2, 2);
        let job_id = engine
            .submit_file_batch_job(
                files,
                line_counter,
                JobOptions::new()
                    .with_concurrency_mode(ConcurrencyMode::Isolated)
                    .with_pool_scope(PoolScope::Job),
            )
            .unwrap();
        let snapshot = wait(&engine, &job_id).await;

        assert!(snapshot.is_fully_successful());
        assert_eq!(snapshot.results.len(), 5);
        assert!(snapshot.name.starts_with("file_job_"));
        assert!(snapshot.duration_secs.is_some());
    }

    // ==================== Tracking ====================

    #[tokio::test]
    async fn test_counters_freeze_after_cancel() {
        let engine = test_engine(1, 1);
        let job_id = engine
            .submit_dataframe_job(
                numbers_table(40),
                |chunk: &Table, _: &ProcessorArgs| -> anyhow::Result<Outcome> {
                    std::thread::sleep(Duration::from_millis(10));
                    Ok(Outcome::from(chunk.len()))
                },
                JobOptions::new(),
            )
            .unwrap();

        tokio::time::sleep(Duration::from_millis(30)).await;
        let cancel = engine.cancel_job(&job_id).unwrap();
        assert!(cancel.changed);

        let first = engine.get_status(&job_id).unwrap();
        tokio::time::sleep(Duration::from_millis(60)).await;
        let later = engine.get_status(&job_id).unwrap();

        assert_eq!(later.status, JobStatus::Cancelled);
        assert!(later.cancelled_at.is_some());
        assert!(later.completed_units < later.total_units);
        assert_eq!(first.completed_units, later.completed_units);
        assert_eq!(first.progress, later.progress);

        // results of a cancelled job stay readable; the unit in flight at cancel time may still land
        let results = engine.get_results(&job_id, false).unwrap();
        assert!(results.len() <= later.completed_units + 1);
    }

    #[tokio::test]
    async fn test_clones_share_job_registry() {
        let engine = test_engine(2, 10);
        let other = engine.clone();

        let job_id = engine
            .submit_dataframe_job(
                numbers_table(5),
                |chunk: &Table, _: &ProcessorArgs| -> anyhow::Result<Outcome> {
                    Ok(Outcome::from(chunk.len()))
                },
                JobOptions::new(),
            )
            .unwrap();

        let snapshot = wait(&other, &job_id).await;
        assert_eq!(snapshot.job_id, job_id);
        assert_eq!(other.list_jobs(None, None).len(), 1);
    }

    #[tokio::test]
    async fn test_list_jobs_filters_by_status() {
        let engine = test_engine(2, 10);
        let count = |chunk: &Table, _: &ProcessorArgs| -> anyhow::Result<Outcome> {
            Ok(Outcome::from(chunk.len()))
        };

        let done = engine
            .submit_dataframe_job(numbers_table(3), count, JobOptions::new().with_name("same"))
            .unwrap();
        wait(&engine, &done).await;

        let slow = engine
            .submit_dataframe_job(
                numbers_table(3),
                |_: &Table, _: &ProcessorArgs| -> anyhow::Result<Outcome> {
                    std::thread::sleep(Duration::from_millis(50));
                    Ok(Outcome::Null)
                },
                JobOptions::new().with_name("same"),
            )
            .unwrap();
        engine.cancel_job(&slow).unwrap();

        let completed = engine.list_jobs(Some(JobStatus::Completed), None);
        assert_eq!(completed.len(), 1);
        assert_eq!(completed[0].job_id, done);

        let cancelled = engine.list_jobs(Some(JobStatus::Cancelled), None);
        assert_eq!(cancelled.len(), 1);
        assert_eq!(cancelled[0].name, "same");

        let limited = engine.list_jobs(None, Some(1));
        assert_eq!(limited.len(), 1);
        assert_eq!(limited[0].job_id, slow);
    }

    #[tokio::test]
    async fn test_not_finished_error_carries_progress() {
        let engine = test_engine(1, 1);
        let job_id = engine
            .submit_dataframe_job(
                numbers_table(4),
                |_: &Table, _: &ProcessorArgs| -> anyhow::Result<Outcome> {
                    std::thread::sleep(Duration::from_millis(40));
                    Ok(Outcome::Null)
                },
                JobOptions::new(),
            )
            .unwrap();

        let err = crate::assert_err!(engine.get_results(&job_id, false));
        match err {
            EngineError::JobNotFinished {
                job_id: id,
                status,
                progress,
            } => {
                assert_eq!(id, job_id);
                assert!(!status.is_terminal());
                assert!(progress < 100.0);
            }
            other => panic!("unexpected error: {:?}", other),
        }

        wait(&engine, &job_id).await;
        assert_eq!(engine.get_results(&job_id, false).unwrap().len(), 4);
    }
}
