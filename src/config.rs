//! Export configuration

use crate::error::{Error, Result};
use crate::table::ELLIPSIS;
use std::env;
use std::path::PathBuf;

/// Default length at which body cells are cut in spreadsheets
pub const DEFAULT_BODY_LIMIT: usize = 500;

/// Characters an xlsx cell can hold
pub const MAX_CELL_CHARS: usize = 32_767;

/// Largest body limit whose cut cell, ellipsis included, still fits a cell
pub const MAX_BODY_LIMIT: usize = MAX_CELL_CHARS - ELLIPSIS.len();

/// Where and how exports are written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportConfig {
    /// Directory for relative and generated file names
    pub output_dir: PathBuf,
    /// Prefix of generated file names
    pub file_prefix: String,
    /// Maximum characters of a body cell before truncation
    pub body_limit: usize,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            file_prefix: "emails_export".to_string(),
            body_limit: DEFAULT_BODY_LIMIT,
        }
    }
}

impl ExportConfig {
    /// Load export configuration from environment variables
    ///
    /// Reads from `.env` file if present. All variables are optional:
    /// - `EXPORT_DIR` (default: `.`)
    /// - `EXPORT_PREFIX` (default: `emails_export`)
    /// - `EXPORT_BODY_LIMIT` (default: `500`)
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        let defaults = Self::default();

        Ok(Self {
            output_dir: env::var("EXPORT_DIR").map_or(defaults.output_dir, PathBuf::from),
            file_prefix: env::var("EXPORT_PREFIX").unwrap_or(defaults.file_prefix),
            body_limit: match env::var("EXPORT_BODY_LIMIT") {
                Ok(value) => parse_body_limit(&value)?,
                Err(_) => defaults.body_limit,
            },
        })
    }

    #[must_use]
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }
}

fn parse_body_limit(value: &str) -> Result<usize> {
    let limit: usize = value
        .trim()
        .parse()
        .map_err(|e| Error::Config(format!("Invalid EXPORT_BODY_LIMIT: {e}")))?;
    if limit > MAX_BODY_LIMIT {
        return Err(Error::Config(format!(
            "EXPORT_BODY_LIMIT {limit} exceeds the cell limit of {MAX_BODY_LIMIT}"
        )));
    }
    Ok(limit)
}
