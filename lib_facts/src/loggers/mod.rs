/// Defines the log record and the project layers records are tagged with.
pub mod logrecord;
/// Implements the injected local logger with TTY and file output.
pub mod loggerlocal;

pub use loggerlocal::{LayerLogger, LoggerLocal, LoggerLocalOptions};
pub use logrecord::{Logrecord, ProjectLayer};
