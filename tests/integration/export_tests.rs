//! Export integration tests
//!
//! Results are written to temporary files and read back to check the
//! on-disk shape of each format.

#[cfg(test)]
mod tests {
    use crate::common::fixtures::{numbers_table, test_engine, wait};
    use batchflow::{EngineError, ExportFormat, JobOptions, Outcome, ProcessorArgs, Table};
    use serde_json::{Value, json};
    use std::time::Duration;

    fn identity(chunk: &Table, _: &ProcessorArgs) -> anyhow::Result<Outcome> {
        Ok(Outcome::Table(chunk.clone()))
    }

    fn row_count(chunk: &Table, _: &ProcessorArgs) -> anyhow::Result<Outcome> {
        Ok(Outcome::map([
            ("rows", Outcome::from(chunk.len())),
            ("first", Outcome::from(chunk.get(0, "id").cloned().unwrap_or(Value::Null))),
        ]))
    }

    #[tokio::test]
    async fn test_json_export_matches_results() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.json");
        let engine = test_engine(4, 4);

        let job_id = engine
            .submit_dataframe_job(numbers_table(10), row_count, JobOptions::new())
            .unwrap();
        wait(&engine, &job_id).await;

        let report = crate::assert_ok!(
            engine
                .export_results(&job_id, &path, ExportFormat::Json)
                .await
        );
        assert_eq!(report.records, 3);
        assert_eq!(report.format, ExportFormat::Json);
        assert_eq!(
            report.message,
            format!("Results saved to {}", path.display())
        );

        let written: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(
            written,
            json!([
                {"first": 0, "rows": 4},
                {"first": 4, "rows": 4},
                {"first": 8, "rows": 2},
            ])
        );

        let primitives: Vec<Value> = engine
            .get_results(&job_id, false)
            .unwrap()
            .into_outcomes()
            .iter()
            .map(Outcome::to_primitive)
            .collect();
        assert_eq!(written, Value::Array(primitives));
    }

    #[tokio::test]
    async fn test_csv_export_writes_coalesced_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.csv");
        let engine = test_engine(2, 2);

        let job_id = engine
            .submit_dataframe_job(numbers_table(5), identity, JobOptions::new())
            .unwrap();
        wait(&engine, &job_id).await;

        let report = engine
            .export_results(&job_id, &path, ExportFormat::Csv)
            .await
            .unwrap();
        assert_eq!(report.records, 5);

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let headers: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
        assert_eq!(headers, vec!["id", "value"]);
        let rows: Vec<(u32, u32)> = reader
            .deserialize()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(rows, vec![(0, 0), (1, 2), (2, 4), (3, 6), (4, 8)]);
    }

    #[tokio::test]
    async fn test_xlsx_export_writes_workbook() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.xlsx");
        let engine = test_engine(2, 3);

        let job_id = engine
            .submit_dataframe_job(numbers_table(7), identity, JobOptions::new())
            .unwrap();
        wait(&engine, &job_id).await;

        let format: ExportFormat = "excel".parse().unwrap();
        let report = engine.export_results(&job_id, &path, format).await.unwrap();
        assert_eq!(report.records, 7);

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[..2], b"PK");
    }

    #[tokio::test]
    async fn test_tabular_export_of_non_table_results_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.csv");
        let engine = test_engine(2, 4);

        let job_id = engine
            .submit_dataframe_job(numbers_table(6), row_count, JobOptions::new())
            .unwrap();
        wait(&engine, &job_id).await;

        let err = crate::assert_err!(
            engine
                .export_results(&job_id, &path, ExportFormat::Csv)
                .await
        );
        assert!(matches!(err, EngineError::NotCoalescible(_)));
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_export_requires_terminal_job() {
        let dir = tempfile::tempdir().unwrap();
        let engine = test_engine(1, 1);

        let job_id = engine
            .submit_dataframe_job(
                numbers_table(3),
                |_: &Table, _: &ProcessorArgs| -> anyhow::Result<Outcome> {
                    std::thread::sleep(Duration::from_millis(40));
                    Ok(Outcome::Null)
                },
                JobOptions::new(),
            )
            .unwrap();

        let err = engine
            .export_results(&job_id, dir.path().join("early.json"), ExportFormat::Json)
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::JobNotFinished { .. }));

        let err = engine
            .export_results("no-such-job", dir.path().join("none.json"), ExportFormat::Json)
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_export_to_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let engine = test_engine(1, 10);

        let job_id = engine
            .submit_dataframe_job(numbers_table(2), row_count, JobOptions::new())
            .unwrap();
        wait(&engine, &job_id).await;

        let path = dir.path().join("absent").join("results.json");
        let err = engine
            .export_results(&job_id, &path, ExportFormat::Json)
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::Io(_)));
    }

    #[test]
    fn test_unsupported_format_name() {
        let err = "parquet".parse::<ExportFormat>().unwrap_err();
        assert!(matches!(err, EngineError::UnsupportedFormat(_)));
        assert!(err.to_string().contains("parquet"));
    }
}
