// Library interface for StepTrack modules
// The binary and the integration tests both go through this crate root

pub mod calculator;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod parser;

// Re-export commonly used types for convenience
pub use calculator::ActivityCalculator;
pub use config::{AppConfig, DayStride, TrackerConstants};
pub use error::{CalculationError, ErrorKind, ErrorSeverity, ParseError, Result, TrackerError};
pub use logging::{LogConfig, LogFormat, LogLevel};
pub use models::*;
pub use parser::{parse_duration, RecordParser};
