//! Logging and diagnostics setup.

mod logging;

pub use logging::{setup_logging, LOG_FILE_PREFIX};
pub use tracing_appender::non_blocking::WorkerGuard;
