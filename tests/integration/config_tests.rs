//! Configuration loading integration tests
//!
//! Covers file loading, environment overrides and how loaded settings reach
//! the engine.

#[cfg(test)]
mod tests {
    use batchflow::{
        BatchEngine, ConcurrencyMode, Config, EngineConfig, EngineError, JobKind, LogFormat,
        PoolScope,
    };
    use std::io::Write;
    use tempfile::NamedTempFile;

    // ==================== File Loading ====================

    #[test]
    fn test_yaml_file_with_every_section() {
        let mut file = NamedTempFile::with_suffix(".yaml").unwrap();
        file.write_all(
            br#"
engine:
  max_workers: 12
  chunk_size: 1000
  concurrency_mode: threads
  list_limit: 20

logging:
  level: "batchflow=debug,warn"
  format: json
  log_dir: /var/log/batchflow
  file_enabled: false
"#,
        )
        .unwrap();

        let config = tokio_test::block_on(Config::from_file(file.path())).unwrap();

        assert_eq!(config.engine.worker_count(), 12);
        assert_eq!(config.engine.chunk_size, 1000);
        assert_eq!(config.engine.list_limit, 20);
        assert_eq!(config.engine.pool_scope, None);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert!(!config.logging.file_enabled);
        assert_eq!(
            config.logging.log_file(),
            std::path::Path::new("/var/log/batchflow/batch_processor.log")
        );
    }

    #[test]
    fn test_empty_json_object_gives_defaults() {
        let mut file = NamedTempFile::with_suffix(".json").unwrap();
        file.write_all(b"{}").unwrap();

        let config = tokio_test::block_on(Config::from_file(file.path())).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_invalid_sections_rejected() {
        let cases: [(&str, &str); 3] = [
            ("engine:\n  max_workers: 0\n", "max_workers"),
            ("engine:\n  list_limit: 0\n", "list_limit"),
            ("logging:\n  level: \"\"\n", "Log level"),
        ];

        for (content, needle) in cases {
            let mut file = NamedTempFile::with_suffix(".yaml").unwrap();
            file.write_all(content.as_bytes()).unwrap();

            let err = tokio_test::block_on(Config::from_file(file.path())).unwrap_err();
            assert!(matches!(err, EngineError::Config(_)), "{}", content);
            assert!(err.to_string().contains(needle), "{}: {}", needle, err);
        }
    }

    #[test]
    fn test_malformed_yaml_rejected() {
        let mut file = NamedTempFile::with_suffix(".yaml").unwrap();
        file.write_all(b"engine: [unclosed").unwrap();

        let err = tokio_test::block_on(Config::from_file(file.path())).unwrap_err();
        assert!(matches!(err, EngineError::Config(_)));
    }

    #[test]
    fn test_config_round_trips_through_yaml() {
        let config = Config {
            engine: EngineConfig {
                pool_scope: Some(PoolScope::Chunk),
                concurrency_mode: ConcurrencyMode::Isolated,
                ..EngineConfig::default().with_max_workers(5)
            },
            ..Default::default()
        };

        let yaml = config.to_yaml().unwrap();
        let mut file = NamedTempFile::with_suffix(".yml").unwrap();
        file.write_all(yaml.as_bytes()).unwrap();

        let loaded = tokio_test::block_on(Config::from_file(file.path())).unwrap();
        assert_eq!(loaded, config);
    }

    // ==================== Environment ====================

    #[test]
    fn test_environment_overrides() {
        // the only test in this binary touching BATCH_* variables
        unsafe {
            std::env::set_var("BATCH_MAX_WORKERS", "3");
            std::env::set_var("BATCH_CHUNK_SIZE", "50");
            std::env::set_var("BATCH_CONCURRENCY_MODE", "isolated");
            std::env::set_var("BATCH_POOL_SCOPE", "job");
            std::env::set_var("BATCH_LOG_FORMAT", "json");
            std::env::set_var("BATCH_LOG_DIR", "/tmp/batchflow-env-logs");
        }

        let config = Config::from_env().unwrap();
        assert_eq!(config.engine.worker_count(), 3);
        assert_eq!(config.engine.chunk_size, 50);
        assert_eq!(config.engine.concurrency_mode, ConcurrencyMode::Isolated);
        assert_eq!(config.engine.pool_scope_for(JobKind::FileBatch), PoolScope::Job);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(
            config.logging.log_dir,
            std::path::PathBuf::from("/tmp/batchflow-env-logs")
        );

        unsafe {
            std::env::set_var("BATCH_CHUNK_SIZE", "lots");
        }
        let err = Config::from_env().unwrap_err();
        assert!(matches!(err, EngineError::Config(_)));
        assert!(err.to_string().contains("BATCH_CHUNK_SIZE"));

        unsafe {
            std::env::set_var("BATCH_CHUNK_SIZE", "0");
        }
        assert!(Config::from_env().is_err());

        unsafe {
            for key in [
                "BATCH_MAX_WORKERS",
                "BATCH_CHUNK_SIZE",
                "BATCH_CONCURRENCY_MODE",
                "BATCH_POOL_SCOPE",
                "BATCH_LOG_FORMAT",
                "BATCH_LOG_DIR",
            ] {
                std::env::remove_var(key);
            }
        }
    }

    // ==================== Engine Construction ====================

    #[test]
    fn test_engine_requires_runtime() {
        let err = BatchEngine::new(EngineConfig::default()).unwrap_err();
        assert!(matches!(err, EngineError::Internal(_)));
    }

    #[tokio::test]
    async fn test_engine_rejects_invalid_config() {
        let err = BatchEngine::new(EngineConfig::default().with_chunk_size(0)).unwrap_err();
        assert!(matches!(err, EngineError::Config(_)));
    }

    #[tokio::test]
    async fn test_engine_exposes_config() {
        let engine = BatchEngine::new(EngineConfig::default().with_chunk_size(64)).unwrap();
        assert_eq!(engine.config().chunk_size, 64);
    }
}
