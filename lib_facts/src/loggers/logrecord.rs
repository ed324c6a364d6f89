use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Returns the current UTC time formatted as an RFC 9557 timestamp with milliseconds.
pub fn current_datetime_rfc9557() -> String {
    let now: DateTime<Utc> = Utc::now();
    now.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

/// # Project Layer
///
/// The architectural layer a log message originates from. Every record is
/// tagged with one so that a single log file can be read per layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectLayer {
    /// HTTP request execution and response classification.
    CoreNetwork,
    /// Remote and cache data sources.
    DataSource,
    /// Source selection and write-through policy.
    Gateway,
    /// Use cases and presentation state.
    Domain,
    /// Reactive value delivery.
    Observing,
}

impl ProjectLayer {
    /// The bracketed tag printed in front of every message of this layer.
    pub fn tag(&self) -> &'static str {
        match self {
            ProjectLayer::CoreNetwork => "[NETWORK]",
            ProjectLayer::DataSource => "[DATA_SOURCE]",
            ProjectLayer::Gateway => "[GATEWAY]",
            ProjectLayer::Domain => "[DOMAIN]",
            ProjectLayer::Observing => "[OBSERVING]",
        }
    }
}

impl fmt::Display for ProjectLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// # Logrecord
///
/// A single log entry as produced by `LoggerLocal`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Logrecord {
    /// The name of the application that produced the record.
    pub app: String,
    /// The severity level (0 for Silly up to 6 for Fatal).
    pub loglevel: i64,
    /// The layer that produced the record.
    pub layer: ProjectLayer,
    /// The message text.
    pub message: String,
    /// Flexible JSON value for arbitrary tags or additional metadata.
    pub tags: Value,
    /// RFC 9557 formatted timestamp string.
    pub rfc9557: String,
}

impl Logrecord {
    /// Creates a record stamped with the current time and no tags.
    pub fn new(app: &str, loglevel: i64, layer: ProjectLayer, message: &str) -> Self {
        Self {
            app: app.to_string(),
            loglevel,
            layer,
            message: message.to_string(),
            tags: serde_json::json!([]),
            rfc9557: current_datetime_rfc9557(),
        }
    }

    /// Whether extra tags were attached to this record.
    pub fn has_tags(&self) -> bool {
        self.tags != serde_json::json!([])
    }

    /// Renders the record as a single log-file line, tags appended as compact JSON.
    pub fn to_line(&self) -> String {
        let mut line = format!(
            "{} [{}] {} {} {}",
            self.rfc9557,
            self.app,
            level_name(self.loglevel),
            self.layer.tag(),
            self.message
        );
        if self.has_tags() {
            if let Ok(tags_str) = serde_json::to_string(&self.tags) {
                line.push(' ');
                line.push_str(&tags_str);
            }
        }
        line
    }
}

/// Maps a numeric level to its name.
pub fn level_name(level: i64) -> &'static str {
    match level {
        6 => "FATAL",
        5 => "ERROR",
        4 => "WARN",
        3 => "INFO",
        2 => "DEBUG",
        1 => "TRACE",
        _ => "SILLY",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_contains_layer_tag_and_tags() {
        let mut record = Logrecord::new("facts", 5, ProjectLayer::CoreNetwork, "boom");
        record.tags = serde_json::json!({"code": -3});

        let line = record.to_line();
        assert!(line.contains("[facts] ERROR [NETWORK] boom"));
        assert!(line.ends_with(r#"{"code":-3}"#));
    }

    #[test]
    fn line_without_tags_has_no_json_suffix() {
        let record = Logrecord::new("facts", 3, ProjectLayer::Gateway, "ok");
        assert!(!record.has_tags());
        assert!(record.to_line().ends_with("[GATEWAY] ok"));
    }
}
