//! Error types for the filter list index generator
//!
//! Errors are grouped by the stage that raises them. Only configuration
//! errors, a failure to load the reference repository and an empty result
//! abort a run; everything else is logged and skipped by the caller.

use std::path::PathBuf;
use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Access token missing or blank
    #[error("No access token available. Set the {var} environment variable")]
    MissingToken { var: &'static str },

    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    NotFound { path: PathBuf },

    /// Configuration file could not be read
    #[error("Failed to read configuration file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid configuration format
    #[error("Invalid configuration format")]
    InvalidFormat(#[from] toml::de::Error),

    /// Invalid configuration value
    #[error("Invalid configuration value for {field}: {value}. {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    /// User configuration directory unknown
    #[error("Could not determine user config directory")]
    NoConfigDir,
}

/// Errors fetching list manifests and filter files
#[derive(Error, Debug)]
pub enum FetchError {
    /// HTTP request error
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Invalid URL provided
    #[error("Invalid URL: {url} - {error}")]
    InvalidUrl { url: String, error: String },

    /// Server returned error status
    #[error("Server error for {url}: HTTP {status}")]
    ServerError { url: String, status: u16 },

    /// The filter file carries no recognizable title
    #[error("No name/title found in filter list")]
    NoTitle,
}

/// Hosting API errors
#[derive(Error, Debug, Clone)]
pub enum HostingError {
    /// Transport failure talking to the API
    #[error("Hosting API request failed: {0}")]
    Transport(String),

    /// Invalid or insufficient credentials
    #[error("Hosting API authentication failed: {0}")]
    AuthFailed(String),

    /// Requested resource does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// API rate limit exhausted
    #[error("Hosting API rate limit exceeded")]
    RateLimited,

    /// Unexpected API response
    #[error("Hosting API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// Paginated listing exceeded its deadline
    #[error("Hosting API listing timed out after {seconds} seconds")]
    Timeout { seconds: u64 },
}

impl From<reqwest::Error> for HostingError {
    fn from(err: reqwest::Error) -> Self {
        HostingError::Transport(err.to_string())
    }
}

/// Reasons a whole repository contributes no manifests
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// License is missing or not the required one
    #[error("license identifier incompatible, must be {required} (found {found})")]
    IncompatibleLicense { required: String, found: String },

    /// Repository was created too recently
    #[error("repository is too young ({age_hours}h old)")]
    TooYoung { age_hours: i64 },

    /// Lists path is a file instead of a directory
    #[error("invalid file \"{path}\" instead of directory")]
    NotADirectory { path: String },

    /// Repository has no published release
    #[error("no latest release available: {0}")]
    NoRelease(HostingError),

    /// Latest release has nothing attached
    #[error("latest release has no assets")]
    NoAssets,

    /// Any other hosting failure
    #[error(transparent)]
    Hosting(#[from] HostingError),
}

/// Output and snapshot errors
#[derive(Error, Debug)]
pub enum OutputError {
    /// Nothing survived collection and deduplication
    #[error("No filter lists were found, refusing to write an empty index")]
    NoLists,

    /// JSON serialization error
    #[error("JSON serialization error")]
    Json(#[from] serde_json::Error),

    /// I/O error while writing
    #[error("File I/O error")]
    Io(#[from] std::io::Error),

    /// Atomic file operation failed
    #[error("Atomic file operation failed: could not rename {temp_path} to {final_path}")]
    AtomicOperationFailed {
        temp_path: PathBuf,
        final_path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Top-level application error that can represent any error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Fetch error
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Hosting API error
    #[error(transparent)]
    Hosting(#[from] HostingError),

    /// Repository rejected
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    /// Output error
    #[error(transparent)]
    Output(#[from] OutputError),

    /// Generic I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Generic application error with context
    #[error("Application error: {message}")]
    Generic { message: String },
}

impl AppError {
    /// Create a generic application error with a message
    pub fn generic(message: impl Into<String>) -> Self {
        Self::Generic {
            message: message.into(),
        }
    }

    /// Whether this error should abort the whole run
    pub fn is_fatal(&self) -> bool {
        match self {
            AppError::Repository(_) | AppError::Fetch(_) => false,
            AppError::Config(_)
            | AppError::Hosting(_)
            | AppError::Output(_)
            | AppError::Io(_)
            | AppError::Generic { .. } => true,
        }
    }

    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            AppError::Config(_) => "config",
            AppError::Fetch(_) => "fetch",
            AppError::Hosting(_) => "hosting",
            AppError::Repository(_) => "repository",
            AppError::Output(_) => "output",
            AppError::Io(_) => "io",
            AppError::Generic { .. } => "generic",
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, AppError>;

/// Configuration result type alias
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Fetch result type alias
pub type FetchResult<T> = std::result::Result<T, FetchError>;

/// Hosting result type alias
pub type HostingResult<T> = std::result::Result<T, HostingError>;

/// Repository result type alias
pub type RepositoryResult<T> = std::result::Result<T, RepositoryError>;

/// Output result type alias
pub type OutputResult<T> = std::result::Result<T, OutputError>;
