use super::logrecord::{Logrecord, ProjectLayer};
use chrono::Local;
use colored::*;
use glob::glob;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Every level, from Fatal down to Silly.
pub const ALL_LEVELS: [i64; 7] = [6, 5, 4, 3, 2, 1, 0];

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
/// # Logger Local Options
///
/// Configuration options for the `LoggerLocal` instance, controlling where and how
/// log messages are output.
pub struct LoggerLocalOptions {
    /// A list of log levels that should be printed to the TTY (console).
    pub use_tty: Option<Vec<i64>>,
    /// A list of log levels that should be written to a log file.
    pub use_file: Option<Vec<i64>>,
    /// The directory where log files should be stored. If `None`, defaults to the executable's directory.
    pub log_dir: Option<PathBuf>,
}

/// # Logger Local
///
/// The structured logger handed to every component as an `Arc<LoggerLocal>`.
/// Components never reach for a global logger; they receive this one at
/// construction and open a [`LayerLogger`] per operation.
pub struct LoggerLocal {
    /// The name of the application associated with this logger instance.
    app_name: String,
    /// Configuration options determining logging behavior.
    options: LoggerLocalOptions,
    /// Serializes appends so that concurrent records never interleave within a line.
    file_mutex: Arc<Mutex<()>>,
    /// The path to the currently active log file, if file logging is enabled.
    current_log_file: Option<PathBuf>,
}

impl LoggerLocal {
    /// Rotates log files for a given application and log directory.
    ///
    /// Keeps only the most recent log file (based on the timestamp in its
    /// filename) and deletes older ones.
    fn rotate_logs(app_name: &str, log_dir: &Path) {
        let pattern = format!("{}/{}-*.log", log_dir.display(), app_name);
        let entries = match glob(&pattern) {
            Ok(entries) => entries,
            Err(e) => {
                eprintln!("Invalid log rotation pattern {}: {}", pattern, e);
                return;
            }
        };

        let mut log_files: Vec<PathBuf> = entries.flatten().collect();

        // Newest first; the timestamp format sorts lexicographically.
        log_files.sort_by(|a, b| b.file_name().cmp(&a.file_name()));

        for old_file in log_files.iter().skip(1) {
            if let Err(e) = std::fs::remove_file(old_file) {
                eprintln!("Error deleting old log file {}: {}", old_file.display(), e);
            }
        }
    }

    /// Creates a new `LoggerLocal` instance.
    ///
    /// If file logging is enabled, the log directory is created, old logs are
    /// rotated away and a fresh timestamped file path is chosen.
    ///
    /// # Arguments
    /// * `app_name` - The name of the application using this logger.
    /// * `options` - Optional `LoggerLocalOptions`. If `None`, every level goes
    ///   to both the console and a log file next to the executable.
    pub fn new(app_name: String, options: Option<LoggerLocalOptions>) -> Self {
        let default_options = LoggerLocalOptions {
            use_tty: Some(ALL_LEVELS.to_vec()),
            use_file: Some(ALL_LEVELS.to_vec()),
            log_dir: None,
        };
        let opts = options.unwrap_or(default_options);

        let mut logger = Self {
            app_name: app_name.clone(),
            options: opts,
            file_mutex: Arc::new(Mutex::new(())),
            current_log_file: None,
        };

        if logger.options.use_file.is_some() {
            let log_base_dir = logger.options.log_dir.clone().unwrap_or_else(|| {
                std::env::current_exe()
                    .ok()
                    .and_then(|exe| exe.parent().map(Path::to_path_buf))
                    .unwrap_or_else(|| PathBuf::from("."))
            });

            if let Err(e) = std::fs::create_dir_all(&log_base_dir) {
                eprintln!("Error creating log directory {}: {}", log_base_dir.display(), e);
            }

            LoggerLocal::rotate_logs(&app_name, &log_base_dir);

            let timestamp = Local::now().format("%Y%m%d_%H%M%S").to_string();
            let current_log_filename = format!("{}-{}.log", app_name, timestamp);
            logger.current_log_file = Some(log_base_dir.join(current_log_filename));
        }

        logger
    }

    /// A logger with every output disabled.
    pub fn silent(app_name: &str) -> Self {
        Self::new(app_name.to_string(), Some(LoggerLocalOptions::default()))
    }

    /// The application name records are stamped with.
    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    /// The file records are appended to, when file logging is enabled.
    pub fn current_log_file(&self) -> Option<&Path> {
        self.current_log_file.as_deref()
    }

    /// Opens a logging context bound to one project layer.
    pub fn for_layer(self: &Arc<Self>, layer: ProjectLayer) -> LayerLogger {
        LayerLogger {
            logger: Arc::clone(self),
            layer,
        }
    }

    /// Asynchronously logs a message with a specified level and layer, handling TTY
    /// output and file writing based on the logger's configuration.
    ///
    /// # Arguments
    /// * `log_level` - The numeric log level (0 for Silly up to 6 for Fatal).
    /// * `layer` - The project layer the message comes from.
    /// * `log_message` - The main message string to be logged.
    /// * `log_extras` - Additional structured data to include in the record.
    pub async fn log(&self, log_level: i64, layer: ProjectLayer, log_message: &str, log_extras: Option<Value>) {
        let mut record = Logrecord::new(&self.app_name, log_level, layer, log_message);
        if let Some(extras) = log_extras {
            record.tags = extras;
        }

        if let Some(tty_levels) = &self.options.use_tty {
            if tty_levels.contains(&log_level) {
                self.print_tty(&record);
            }
        }

        if let Some(file_levels) = &self.options.use_file {
            if file_levels.contains(&log_level) {
                if let Some(log_file_path) = &self.current_log_file {
                    let _guard = self.file_mutex.lock().await;
                    let line = record.to_line();
                    let written = OpenOptions::new()
                        .create(true)
                        .append(true)
                        .open(log_file_path)
                        .and_then(|mut file| writeln!(file, "{}", line));
                    if let Err(e) = written {
                        eprintln!("Error writing log file {}: {}", log_file_path.display(), e);
                    }
                }
            }
        }
    }

    fn print_tty(&self, record: &Logrecord) {
        let ts = record.rfc9557.as_str().truecolor(128, 128, 128);
        let prefix = format!("[{}]{}", self.app_name, record.layer.tag()).truecolor(128, 128, 128);
        let message = record.message.as_str();

        let colored_message = match record.loglevel {
            6 => message.bright_white().on_bright_red(), // Fatal
            5 => message.bright_red(),                   // Error
            4 => message.bright_yellow(),                // Warn
            3 => message.bright_green(),                 // Info
            2 => message.bright_white(),                 // Debug
            1 => message.bright_cyan(),                  // Trace
            _ => message.blue(),                         // Silly
        };

        println!("{}{}\n{}", ts, prefix, colored_message);
        if record.has_tags() {
            if let Ok(tags_str) = serde_json::to_string(&record.tags) {
                println!("{}{}{}", ts, prefix, tags_str.truecolor(128, 128, 128));
            }
        }
    }
}

/// # Layer Logger
///
/// A call-scoped logging context: the shared `LoggerLocal` plus the layer
/// every message of the current operation belongs to. Cheap to create.
#[derive(Clone)]
pub struct LayerLogger {
    logger: Arc<LoggerLocal>,
    layer: ProjectLayer,
}

impl LayerLogger {
    /// The layer this context tags messages with.
    pub fn layer(&self) -> ProjectLayer {
        self.layer
    }

    /// Logs at an explicit numeric level.
    pub async fn log(&self, log_level: i64, log_message: &str, log_extras: Option<Value>) {
        self.logger.log(log_level, self.layer, log_message, log_extras).await;
    }

    /// Logs a message at the "Silly" (level 0) log level.
    pub async fn silly(&self, log_message: &str, log_extras: Option<Value>) {
        self.log(0, log_message, log_extras).await;
    }

    /// Logs a message at the "Trace" (level 1) log level.
    pub async fn trace(&self, log_message: &str, log_extras: Option<Value>) {
        self.log(1, log_message, log_extras).await;
    }

    /// Logs a message at the "Debug" (level 2) log level.
    pub async fn debug(&self, log_message: &str, log_extras: Option<Value>) {
        self.log(2, log_message, log_extras).await;
    }

    /// Logs a message at the "Info" (level 3) log level.
    pub async fn info(&self, log_message: &str, log_extras: Option<Value>) {
        self.log(3, log_message, log_extras).await;
    }

    /// Logs a message at the "Warn" (level 4) log level.
    pub async fn warn(&self, log_message: &str, log_extras: Option<Value>) {
        self.log(4, log_message, log_extras).await;
    }

    /// Logs a message at the "Error" (level 5) log level.
    pub async fn error(&self, log_message: &str, log_extras: Option<Value>) {
        self.log(5, log_message, log_extras).await;
    }

    /// Logs a message at the "Fatal" (level 6) log level.
    pub async fn fatal(&self, log_message: &str, log_extras: Option<Value>) {
        self.log(6, log_message, log_extras).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn file_only(dir: &Path) -> LoggerLocalOptions {
        LoggerLocalOptions {
            use_tty: None,
            use_file: Some(ALL_LEVELS.to_vec()),
            log_dir: Some(dir.to_path_buf()),
        }
    }

    #[tokio::test]
    async fn writes_layer_tagged_lines_to_file() {
        let temp_dir = tempdir().expect("Failed to create temporary directory");
        let logger = Arc::new(LoggerLocal::new("test_app".to_string(), Some(file_only(temp_dir.path()))));

        let network = logger.for_layer(ProjectLayer::CoreNetwork);
        network.info("Start executing: http://x", None).await;
        network.error("Received an invalid status code", Some(serde_json::json!({"code": -3}))).await;
        logger.for_layer(ProjectLayer::Gateway).debug("gateway says hi", None).await;

        let path = logger.current_log_file().expect("file logging enabled");
        let contents = fs::read_to_string(path).expect("Failed to read log file contents");

        assert!(contents.contains("INFO [NETWORK] Start executing: http://x"));
        assert!(contents.contains(r#""code":-3"#));
        assert!(contents.contains("DEBUG [GATEWAY] gateway says hi"));
        assert_eq!(contents.lines().count(), 3);
    }

    #[tokio::test]
    async fn skips_levels_not_selected_for_file() {
        let temp_dir = tempdir().expect("Failed to create temporary directory");
        let options = LoggerLocalOptions {
            use_tty: None,
            use_file: Some(vec![6, 5]),
            log_dir: Some(temp_dir.path().to_path_buf()),
        };
        let logger = Arc::new(LoggerLocal::new("levels".to_string(), Some(options)));
        let ctx = logger.for_layer(ProjectLayer::DataSource);

        ctx.debug("not written", None).await;
        ctx.fatal("written", None).await;

        let contents = fs::read_to_string(logger.current_log_file().unwrap()).unwrap();
        assert!(!contents.contains("not written"));
        assert!(contents.contains("FATAL [DATA_SOURCE] written"));
    }

    #[test]
    fn rotation_keeps_only_newest_file() {
        let temp_dir = tempdir().unwrap();
        fs::write(temp_dir.path().join("rot-20240101_000000.log"), "old").unwrap();
        fs::write(temp_dir.path().join("rot-20250101_000000.log"), "newer").unwrap();
        fs::write(temp_dir.path().join("other-20200101_000000.log"), "other app").unwrap();

        LoggerLocal::rotate_logs("rot", temp_dir.path());

        assert!(!temp_dir.path().join("rot-20240101_000000.log").exists());
        assert!(temp_dir.path().join("rot-20250101_000000.log").exists());
        assert!(temp_dir.path().join("other-20200101_000000.log").exists());
    }

    #[test]
    fn silent_logger_has_no_file() {
        let logger = LoggerLocal::silent("quiet");
        assert!(logger.current_log_file().is_none());
        assert_eq!(logger.app_name(), "quiet");
    }
}
