use lib_facts::loggers::loggerlocal::ALL_LEVELS;
use lib_facts::{LoggerLocal, LoggerLocalOptions, ProjectLayer};
use std::fs;
use std::sync::Arc;
use tempfile::tempdir;

/// # LoggerLocal Integration Test
///
/// Writes records from every project layer to a log file in a temporary
/// directory, checks their content, then creates a second logger for the same
/// app and checks that rotation left a single log file behind.
#[tokio::main]
async fn main() {
    let temp_dir = tempdir().expect("Failed to create temporary directory");
    let log_dir_path = temp_dir.path().to_path_buf();

    let options = LoggerLocalOptions {
        use_tty: None,
        use_file: Some(ALL_LEVELS.to_vec()),
        log_dir: Some(log_dir_path.clone()),
    };

    let logger = Arc::new(LoggerLocal::new("test_app".to_string(), Some(options.clone())));

    logger.for_layer(ProjectLayer::CoreNetwork).info("Start executing", None).await;
    logger
        .for_layer(ProjectLayer::DataSource)
        .warn("Received error", Some(serde_json::json!({"code": -3})))
        .await;
    logger.for_layer(ProjectLayer::Gateway).error("Cache write failed", None).await;
    logger.for_layer(ProjectLayer::Domain).debug("Execute the script", None).await;

    let log_file_path = logger.current_log_file().expect("Expected a log file").to_path_buf();
    let contents = fs::read_to_string(&log_file_path).expect("Failed to read log file contents");

    assert!(contents.contains("[NETWORK] Start executing"));
    assert!(contents.contains("[DATA_SOURCE] Received error"));
    assert!(contents.contains("\"code\":-3"));
    assert!(contents.contains("[GATEWAY] Cache write failed"));
    assert!(contents.contains("[DOMAIN] Execute the script"));
    println!("[SUCCESS] {} lines written to {:?}", contents.lines().count(), log_file_path);

    // Every new logger for the same app keeps only the newest older file.
    for round in 0..2 {
        tokio::time::sleep(std::time::Duration::from_millis(1100)).await;
        let next = LoggerLocal::new("test_app".to_string(), Some(options.clone()));
        next.log(3, ProjectLayer::Observing, &format!("Round {}", round), None).await;
    }

    let remaining: Vec<_> = fs::read_dir(&log_dir_path)
        .expect("Failed to read log directory")
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .collect();
    assert_eq!(remaining.len(), 2, "Rotation should leave the previous file and the current one");
    assert!(!remaining.contains(&log_file_path), "The oldest log file should be rotated away");
    println!("[SUCCESS] Rotation kept {:?}", remaining);
}
