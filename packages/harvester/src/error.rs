//! Error types for the harvester.
//!
//! Uses the dual-error pattern: `HarvesterError` for library consumers
//! with detailed error context, and `FetchError` for the outcome of a
//! single API request.

use thiserror::Error;

/// Why a single bill request produced no usable body.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Connection, TLS or body read failure.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The API answered with something other than HTTP 200.
    #[error("unexpected HTTP status {status}")]
    Status { status: u16 },

    /// HTTP 200, but the body is not the expected JSON document.
    #[error("could not decode response body: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Main error type for the harvester library.
#[derive(Debug, Error)]
pub enum HarvesterError {
    /// Unsupported chamber tag.
    #[error("Invalid chamber: '{0}'. Expected 'hr' (House) or 's' (Senate)")]
    InvalidChamber(String),

    /// Invalid congress session number.
    #[error("Invalid session: '{0}'. Expected a positive congress number (e.g., 116)")]
    InvalidSession(String),

    /// Invalid file name date stamp.
    #[error("Invalid date stamp: '{0}'. Expected YYYY-MM-DD (e.g., 2019-10-09)")]
    InvalidStamp(String),

    /// No id table entry for this chamber and session.
    #[error("No bill range configured for {chamber}{session}")]
    UnknownBillRange { chamber: String, session: u32 },

    /// Id table entry exists but every id is excluded.
    #[error("Bill range for {chamber}{session} contains no ids")]
    EmptyBillRange { chamber: String, session: u32 },

    /// Id table file is structurally valid YAML but semantically wrong.
    #[error("Invalid bill id table: {0}")]
    InvalidIdTable(String),

    /// Required configuration value is missing.
    #[error("Missing configuration: {0}")]
    MissingConfig(String),

    /// HTTP client could not be built.
    #[error("HTTP client setup failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Request for a single bill failed.
    #[error("Failed to fetch {bill}: {source}")]
    Fetch {
        bill: String,
        #[source]
        source: FetchError,
    },

    /// Expected JSON key is absent.
    #[error("Missing required field '{field}' in {context}")]
    MissingField { field: String, context: String },

    /// JSON key is present but has an unusable type.
    #[error("Invalid value for field '{field}' in {context}: expected {expected}")]
    InvalidField {
        field: String,
        context: String,
        expected: String,
    },

    /// Date or time string does not match its format.
    #[error("Malformed date in field '{field}': '{value}'")]
    MalformedDate { field: String, value: String },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV writing error.
    #[error("CSV export failed: {0}")]
    Csv(#[from] csv::Error),

    /// YAML parsing error.
    #[error("YAML parsing failed: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}

/// Result type alias for harvester operations.
pub type Result<T> = std::result::Result<T, HarvesterError>;
