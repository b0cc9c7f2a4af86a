//! Error types for the logging facade

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// Generic IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// A record did not have the shape normalization expects
    #[error("Malformed record field '{field}': {message}")]
    MalformedRecord { field: String, message: String },

    /// The raw entry point was handed something other than a JSON object
    #[error("Raw log input must be a JSON object, got {found}")]
    NotARecord { found: &'static str },

    /// File sink error with path
    #[error("File sink error for '{path}': {message}")]
    FileSink { path: String, message: String },

    /// Remote sink could not be constructed
    #[error("Remote sink unavailable: {0}")]
    RemoteSink(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl LoggerError {
    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Create a malformed record error
    pub fn malformed(field: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::MalformedRecord {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a not-a-record error describing what was found instead
    pub fn not_a_record(value: &serde_json::Value) -> Self {
        let found = match value {
            serde_json::Value::Null => "null",
            serde_json::Value::Bool(_) => "a boolean",
            serde_json::Value::Number(_) => "a number",
            serde_json::Value::String(_) => "a string",
            serde_json::Value::Array(_) => "an array",
            serde_json::Value::Object(_) => "an object",
        };
        LoggerError::NotARecord { found }
    }

    /// Create a file sink error
    pub fn file_sink(path: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::FileSink {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a remote sink error
    pub fn remote<S: Into<String>>(msg: S) -> Self {
        LoggerError::RemoteSink(msg.into())
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        LoggerError::Other(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = LoggerError::config("level", "unsupported severity");
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));

        let err = LoggerError::malformed("level", "rank is not numeric");
        assert!(matches!(err, LoggerError::MalformedRecord { .. }));

        let err = LoggerError::file_sink("logs/service-log.json", "permission denied");
        assert!(matches!(err, LoggerError::FileSink { .. }));
    }

    #[test]
    fn test_error_display() {
        let err = LoggerError::malformed("msg", "expected a string");
        assert_eq!(
            err.to_string(),
            "Malformed record field 'msg': expected a string"
        );

        let err = LoggerError::not_a_record(&serde_json::Value::String("oops".into()));
        assert_eq!(
            err.to_string(),
            "Raw log input must be a JSON object, got a string"
        );

        let err = LoggerError::file_sink("logs/out.json", "disk full");
        assert_eq!(
            err.to_string(),
            "File sink error for 'logs/out.json': disk full"
        );
    }
}
