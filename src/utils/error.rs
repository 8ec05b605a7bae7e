use thiserror::Error;

#[derive(Error, Debug)]
pub enum HoyError {
    #[error("Unknown timezone: {name}")]
    UnknownTimezone { name: String },

    #[error("Invalid target date: month {month}, day {day}")]
    InvalidTargetDate { month: u32, day: u32 },

    #[error("Invalid calendar date: {value}")]
    InvalidCalendarDate { value: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

impl HoyError {
    /// Process exit code used by the CLI.
    pub fn exit_code(&self) -> i32 {
        match self {
            HoyError::UnknownTimezone { .. } => 3,
            HoyError::InvalidTargetDate { .. } | HoyError::InvalidCalendarDate { .. } => 2,
            HoyError::IoError(_) | HoyError::SerializationError(_) => 4,
            HoyError::ConfigError { .. }
            | HoyError::ConfigValidationError { .. }
            | HoyError::InvalidConfigValueError { .. } => 1,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            HoyError::UnknownTimezone { name } => {
                format!("The timezone '{}' is not known, so today's date cannot be resolved", name)
            }
            HoyError::InvalidTargetDate { month, day } => {
                format!("{:02}-{:02} is not a day of the year", month, day)
            }
            HoyError::InvalidCalendarDate { value } => {
                format!("'{}' is not a YYYY-MM-DD date", value)
            }
            HoyError::IoError(e) => format!("Could not read or write a file: {}", e),
            HoyError::SerializationError(e) => format!("Could not produce JSON output: {}", e),
            HoyError::ConfigError { message } => message.clone(),
            HoyError::ConfigValidationError { field, message } => {
                format!("Configuration problem in '{}': {}", field, message)
            }
            HoyError::InvalidConfigValueError { field, value, reason } => {
                format!("'{}' is not a valid value for '{}': {}", value, field, reason)
            }
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            HoyError::UnknownTimezone { .. } => {
                "Install the IANA timezone database or use a valid zone name such as America/Bogota"
            }
            HoyError::InvalidTargetDate { .. } => "Use a month between 1 and 12 and a day that exists in it",
            HoyError::InvalidCalendarDate { .. } => "Dates must look like 2024-07-20",
            HoyError::IoError(_) => "Check that the path exists and is readable",
            HoyError::SerializationError(_) => "Retry without --json",
            HoyError::ConfigError { .. }
            | HoyError::ConfigValidationError { .. }
            | HoyError::InvalidConfigValueError { .. } => "Fix the configuration file or command line flags",
        }
    }
}

pub type Result<T> = std::result::Result<T, HoyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_timezone_is_distinct_exit_code() {
        let err = HoyError::UnknownTimezone {
            name: "Mars/Olympus".to_string(),
        };
        assert_eq!(err.exit_code(), 3);
        assert!(err.to_string().contains("Mars/Olympus"));
        assert!(err.user_friendly_message().contains("Mars/Olympus"));
    }

    #[test]
    fn test_config_errors_share_exit_code() {
        let err = HoyError::InvalidConfigValueError {
            field: "presentation.confetti_seconds".to_string(),
            value: "0".to_string(),
            reason: "Value must be at least 1".to_string(),
        };
        assert_eq!(err.exit_code(), 1);
        assert_eq!(
            HoyError::ConfigError {
                message: "x".to_string()
            }
            .exit_code(),
            1
        );
    }
}
