//! Unified error hierarchy for StepTrack
//!
//! Parsing and calculation failures each have their own enum; `TrackerError`
//! wraps them together with configuration and IO failures and exposes a flat
//! [`ErrorKind`] for callers that only care about the category.

use thiserror::Error;

/// Top-level error type for all StepTrack operations
#[derive(Debug, Error)]
pub enum TrackerError {
    /// Raw record parsing errors
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// Formula input errors
    #[error("Calculation error: {0}")]
    Calculation(#[from] CalculationError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while turning a raw record into a normalized one
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    /// Wrong number of comma-separated fields
    #[error("Malformed record: expected {expected} fields, got {actual}")]
    MalformedInput { expected: usize, actual: usize },

    /// Step count is not an integer or is not positive
    #[error("Invalid step count '{value}': {reason}")]
    InvalidStepCount { value: String, reason: String },

    /// Duration spec cannot be parsed or is not positive
    #[error("Invalid duration '{value}': {reason}")]
    InvalidDuration { value: String, reason: String },

    /// Activity label is neither running nor walking
    #[error("Unknown activity: {label}")]
    UnknownActivity { label: String },
}

/// Guards at the formula boundary
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalculationError {
    #[error("Step count cannot be negative: {steps}")]
    NegativeSteps { steps: i64 },

    #[error("Weight must be positive: {weight} kg")]
    InvalidWeight { weight: f64 },

    #[error("Height must be positive: {height} cm")]
    InvalidHeight { height: f64 },

    #[error("Duration must be positive: {seconds} s")]
    InvalidDuration { seconds: f64 },
}

/// Result type alias for StepTrack operations
pub type Result<T> = std::result::Result<T, TrackerError>;

/// Flat error taxonomy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    MalformedInput,
    InvalidStepCount,
    InvalidDuration,
    NegativeSteps,
    InvalidWeight,
    InvalidHeight,
    UnknownActivity,
    Configuration,
    Io,
}

impl TrackerError {
    /// Category of this error, independent of which layer raised it
    pub fn kind(&self) -> ErrorKind {
        match self {
            TrackerError::Parse(ParseError::MalformedInput { .. }) => ErrorKind::MalformedInput,
            TrackerError::Parse(ParseError::InvalidStepCount { .. }) => ErrorKind::InvalidStepCount,
            TrackerError::Parse(ParseError::InvalidDuration { .. }) => ErrorKind::InvalidDuration,
            TrackerError::Parse(ParseError::UnknownActivity { .. }) => ErrorKind::UnknownActivity,
            TrackerError::Calculation(CalculationError::NegativeSteps { .. }) => {
                ErrorKind::NegativeSteps
            }
            TrackerError::Calculation(CalculationError::InvalidWeight { .. }) => {
                ErrorKind::InvalidWeight
            }
            TrackerError::Calculation(CalculationError::InvalidHeight { .. }) => {
                ErrorKind::InvalidHeight
            }
            TrackerError::Calculation(CalculationError::InvalidDuration { .. }) => {
                ErrorKind::InvalidDuration
            }
            TrackerError::Configuration(_) => ErrorKind::Configuration,
            TrackerError::Io(_) => ErrorKind::Io,
        }
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            TrackerError::Parse(_) => ErrorSeverity::Warning,
            TrackerError::Calculation(_) => ErrorSeverity::Error,
            TrackerError::Configuration(_) => ErrorSeverity::Error,
            TrackerError::Io(_) => ErrorSeverity::Critical,
        }
    }

    /// Log this error against the record that caused it, at the tracing level
    /// matching its severity
    pub fn report(&self, record: &str) {
        match self.severity().to_tracing_level() {
            tracing::Level::ERROR => {
                tracing::error!(record, error = %self, kind = ?self.kind(), "Record failed")
            }
            _ => tracing::warn!(record, error = %self, kind = ?self.kind(), "Skipping record"),
        }
    }

    /// Get user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            TrackerError::Parse(ParseError::MalformedInput { expected, .. }) => {
                let shape = if *expected == 2 {
                    "<steps>,<duration>"
                } else {
                    "<steps>,<activity>,<duration>"
                };
                format!("Record should look like {}, e.g. 1000,30m", shape)
            }
            TrackerError::Parse(ParseError::InvalidDuration { value, .. }) => {
                format!(
                    "Could not read duration '{}'. Use units h, m or s, e.g. 1h30m or 45.5m",
                    value
                )
            }
            TrackerError::Parse(ParseError::UnknownActivity { label }) => {
                format!("Unknown activity '{}'. Expected running or walking", label)
            }
            _ => self.to_string(),
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Failure that leaves the process unable to continue its current command
    Critical,
    /// Error that prevents the operation
    Error,
    /// Bad input, the caller can fix and retry with different data
    Warning,
}

impl ErrorSeverity {
    /// Convert to tracing level
    pub fn to_tracing_level(&self) -> tracing::Level {
        match self {
            ErrorSeverity::Critical => tracing::Level::ERROR,
            ErrorSeverity::Error => tracing::Level::ERROR,
            ErrorSeverity::Warning => tracing::Level::WARN,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kind_flattening() {
        let err: TrackerError = ParseError::InvalidDuration {
            value: "abc".to_string(),
            reason: "missing unit".to_string(),
        }
        .into();
        assert_eq!(err.kind(), ErrorKind::InvalidDuration);

        let err: TrackerError = CalculationError::InvalidDuration { seconds: 0.0 }.into();
        assert_eq!(err.kind(), ErrorKind::InvalidDuration);

        let err: TrackerError = CalculationError::NegativeSteps { steps: -1 }.into();
        assert_eq!(err.kind(), ErrorKind::NegativeSteps);
    }

    #[test]
    fn test_error_severity() {
        let err: TrackerError = ParseError::MalformedInput { expected: 2, actual: 3 }.into();
        assert_eq!(err.severity(), ErrorSeverity::Warning);
        assert_eq!(err.severity().to_tracing_level(), tracing::Level::WARN);

        let err = TrackerError::Configuration("bad".to_string());
        assert_eq!(err.severity(), ErrorSeverity::Error);
    }

    #[test]
    fn test_user_messages() {
        let err: TrackerError = ParseError::UnknownActivity {
            label: "swimming".to_string(),
        }
        .into();
        assert!(err.user_message().contains("swimming"));
        assert!(err.user_message().contains("running or walking"));

        let err: TrackerError = ParseError::MalformedInput { expected: 3, actual: 1 }.into();
        assert!(err.user_message().contains("<activity>"));
    }
}
