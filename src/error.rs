use std::fmt;

/// Errors raised at the edges of the signal allocator.
///
/// The allocation itself never fails; every variant comes from building the
/// ring, validating a lane snapshot or talking to an input/output collaborator.
#[derive(Debug)]
pub enum SignalError {
    /// A value outside its domain was offered to the ring or the controller.
    InvalidInput(String),
    /// Lane storage could not be allocated.
    ResourceExhausted(String),
    /// Reading input or writing a report failed.
    Io(std::io::Error),
    /// The lane store could not be parsed.
    Csv(csv::Error),
    /// A report could not be encoded.
    Json(serde_json::Error),
    /// A configuration file was malformed.
    Config(String),
    /// The controller's cycle task panicked or its lock was poisoned.
    Task(String),
}

impl fmt::Display for SignalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignalError::InvalidInput(msg) => write!(f, "Invalid input: {msg}"),
            SignalError::ResourceExhausted(msg) => write!(f, "Resource exhausted: {msg}"),
            SignalError::Io(e) => write!(f, "I/O error: {e}"),
            SignalError::Csv(e) => write!(f, "Lane store error: {e}"),
            SignalError::Json(e) => write!(f, "JSON error: {e}"),
            SignalError::Config(msg) => write!(f, "Configuration error: {msg}"),
            SignalError::Task(msg) => write!(f, "Controller task failed: {msg}"),
        }
    }
}

impl std::error::Error for SignalError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SignalError::Io(e) => Some(e),
            SignalError::Csv(e) => Some(e),
            SignalError::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for SignalError {
    fn from(e: std::io::Error) -> Self {
        SignalError::Io(e)
    }
}

impl From<csv::Error> for SignalError {
    fn from(e: csv::Error) -> Self {
        SignalError::Csv(e)
    }
}

impl From<serde_json::Error> for SignalError {
    fn from(e: serde_json::Error) -> Self {
        SignalError::Json(e)
    }
}
