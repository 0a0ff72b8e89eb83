//! Unified error handling for the kanban-report library.
//!
//! Errors fall into three groups:
//!
//! - [`ValidationError`]: a caller broke a contract (missing, empty or malformed argument).
//!   These are programmer errors and are never retried.
//! - [`ApiError`]: the upstream service or the transport failed, or returned data that
//!   cannot be mapped. These are propagated to the caller untouched.
//! - [`ConfigError`]: the command-line tool could not assemble its configuration.
//!
//! ## Example
//!
//! ```rust
//! use kanban_report::error::{KanbanError, ValidationError};
//!
//! fn example() -> Result<(), KanbanError> {
//!     Err(ValidationError::Empty { name: "team".to_string() })?;
//!     Ok(())
//! }
//!
//! assert_eq!(example().unwrap_err().to_string(), r#""team" is empty."#);
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for the kanban-report library.
#[derive(Error, Debug)]
pub enum KanbanError {
    /// A contract violation by the caller.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A failure while talking to Azure DevOps or reading its answer.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// A configuration problem in the command-line tool.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Contract violations raised before any request is issued.
///
/// The messages name the exact parameter and the kind of violation so that
/// callers can tell "not defined" apart from "empty".
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A connection option was not provided.
    #[error("The \"{property}\" property is not defined.")]
    PropertyNotDefined {
        /// Name of the option, e.g. `organization`.
        property: String,
    },

    /// A connection option was provided as an empty string.
    #[error("The \"{property}\" property is empty.")]
    PropertyEmpty {
        /// Name of the option, e.g. `project`.
        property: String,
    },

    /// An argument was not provided.
    #[error("\"{name}\" is not defined.")]
    NotDefined {
        /// Name of the argument.
        name: String,
    },

    /// An argument was provided as an empty string.
    #[error("\"{name}\" is empty.")]
    Empty {
        /// Name of the argument.
        name: String,
    },

    /// A list argument has no elements.
    #[error("\"{name}\" must not be empty")]
    EmptyList {
        /// Name of the argument.
        name: String,
    },

    /// A list contains values that are not integers.
    #[error("all items in \"{name}\" must be integers: {}", quote_all(.values))]
    NotIntegers {
        /// Name of the argument.
        name: String,
        /// The offending values, in their original order.
        values: Vec<String>,
    },

    /// A single value is not an integer.
    #[error("\"{name}\" is not an integer")]
    NotAnInteger {
        /// Name of the argument.
        name: String,
    },

    /// A numeric option is below its minimum.
    #[error("\"{name}\" must be at least {minimum}")]
    TooSmall {
        /// Name of the option.
        name: String,
        /// Smallest accepted value.
        minimum: usize,
    },

    /// A value does not describe the expected kind of object.
    #[error("\"{name}\" is not {expected}")]
    InvalidValue {
        /// Name of the argument.
        name: String,
        /// What the value should have been.
        expected: String,
    },
}

fn quote_all(values: &[String]) -> String {
    values
        .iter()
        .map(|v| format!("\"{v}\""))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Errors that can occur when interacting with the Azure DevOps API.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The transport could not complete the request.
    #[error("Request to {url} failed: {message}")]
    Transport {
        /// URL of the request.
        url: String,
        /// Error reported by the transport.
        message: String,
    },

    /// The response body is not the JSON document that was expected.
    #[error("Failed to parse response from {url} (status {status}): {message}")]
    Parse {
        /// URL of the request.
        url: String,
        /// HTTP status of the response.
        status: u16,
        /// Description of the parse error.
        message: String,
    },

    /// A wire record lacks a field the domain model requires.
    #[error("Work item {id} has no \"{field}\" field")]
    MissingField {
        /// Id of the record.
        id: i64,
        /// Wire name of the missing field.
        field: String,
    },

    /// A field holds a value that cannot be converted.
    #[error("Invalid value for \"{field}\": {message}")]
    InvalidField {
        /// Wire name of the field.
        field: String,
        /// Why the value was rejected.
        message: String,
    },

    /// The team is configured in a way the queries cannot work with.
    #[error("Team configuration error: {message}")]
    Configuration {
        /// Description of the problem.
        message: String,
    },
}

/// Errors that can occur while assembling configuration for the command-line tool.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A required configuration field is missing.
    #[error("{field} is required (use --{field}, {env_var} env var, or config file)")]
    MissingRequired {
        /// Name of the missing field.
        field: String,
        /// Environment variable name for this field.
        env_var: String,
    },

    /// Failed to read the configuration file.
    #[error("Failed to read config file at {path}: {message}")]
    FileReadError {
        /// Path to the config file.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// Failed to write the configuration file.
    #[error("Failed to write config file at {path}: {message}")]
    FileWriteError {
        /// Path to the config file.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// Failed to parse the configuration file.
    #[error("Failed to parse config file at {path}: {message}")]
    ParseError {
        /// Path to the config file.
        path: PathBuf,
        /// Parse error message.
        message: String,
    },

    /// Failed to parse a date string.
    #[error("Failed to parse date '{input}': {message}")]
    DateParseError {
        /// The input date string.
        input: String,
        /// Parse error message.
        message: String,
    },

    /// A setting has a value outside its accepted set.
    #[error("Invalid value '{value}' for {field}: expected {expected}")]
    InvalidSetting {
        /// Name of the setting.
        field: String,
        /// The rejected value.
        value: String,
        /// Accepted values.
        expected: String,
    },

    /// The logging system could not be set up.
    #[error("Failed to initialize logging: {message}")]
    Logging {
        /// Error message.
        message: String,
    },
}

/// Type alias for Results using KanbanError.
///
/// Not re-exported as `Result` from the crate root to avoid shadowing `anyhow::Result`
/// in the binary.
pub type KanbanResult<T> = std::result::Result<T, KanbanError>;
