//! Error types for fetching, normalizing and exporting emails

use thiserror::Error;

/// Boxed cause reported by a mail source
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that can occur while normalizing or exporting emails
#[derive(Error, Debug)]
pub enum Error {
    /// The mail source failed as a whole (connection, login, search)
    #[error("{context}: {source}")]
    Transport {
        context: String,
        #[source]
        source: BoxError,
    },

    /// A single message could not be turned into a record
    #[error("Failed to extract message {id}: {reason}")]
    Extraction { id: String, reason: String },

    /// Failed to decode message content
    #[error("Failed to decode content: {0}")]
    Decode(String),

    /// Export was asked to write zero records
    #[error("No emails to export")]
    EmptyInput,

    #[error("Spreadsheet error: {0}")]
    Spreadsheet(#[from] rust_xlsxwriter::XlsxError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid configuration value
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    pub fn transport(context: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::Transport {
            context: context.into(),
            source: source.into(),
        }
    }

    pub fn extraction(id: impl Into<String>, reason: impl ToString) -> Self {
        Self::Extraction {
            id: id.into(),
            reason: reason.to_string(),
        }
    }
}

/// Result type for this crate
pub type Result<T> = std::result::Result<T, Error>;
