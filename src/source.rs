//! Mail sources and fetch requests

use crate::api::ApiMessage;
use crate::error::BoxError;
use crate::mime::MimeMessage;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// One undecoded message as handed over by a transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawMessage {
    /// RFC 822 bytes, e.g. from an IMAP `FETCH (RFC822)`
    Mime(MimeMessage),
    /// A JSON payload tree from a provider API
    Api(ApiMessage),
}

impl RawMessage {
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Mime(m) => &m.id,
            Self::Api(m) => &m.id,
        }
    }
}

/// Parameters of one fetch call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    /// Folder or label name
    pub folder: String,
    /// Keep only the most recent `limit` messages
    pub limit: Option<usize>,
    /// Search or filter expression; a source that cannot filter ignores it
    pub query: String,
}

impl Default for FetchRequest {
    fn default() -> Self {
        Self {
            folder: "INBOX".to_string(),
            limit: None,
            query: "ALL".to_string(),
        }
    }
}

impl FetchRequest {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn folder(mut self, folder: impl Into<String>) -> Self {
        self.folder = folder.into();
        self
    }

    #[must_use]
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    #[must_use]
    pub fn query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }
}

/// A transport that yields raw messages
///
/// Implementations own their session and credentials. An `Err` means
/// the fetch as a whole failed; a message that cannot be parsed later
/// must still be returned so the batch layer can skip it.
pub trait MailSource {
    fn fetch(&mut self, request: &FetchRequest) -> Result<Vec<RawMessage>, BoxError>;
}

/// Reads `.eml` and `.json` files from a directory
///
/// The request folder selects a sub-directory when one exists with that
/// name; otherwise the root directory is read. Files are ordered by name
/// and the message id is the file stem. The request query is not
/// evaluated: every message file in the folder is returned.
#[derive(Debug, Clone)]
pub struct FileSource {
    root: PathBuf,
}

impl FileSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn folder_dir(&self, folder: &str) -> PathBuf {
        let candidate = self.root.join(folder);
        if !folder.is_empty() && candidate.is_dir() {
            candidate
        } else {
            self.root.clone()
        }
    }

    fn is_message_file(path: &Path) -> bool {
        path.is_file()
            && path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("eml") || e.eq_ignore_ascii_case("json"))
    }

    /// Load one `.eml` or `.json` file
    ///
    /// I/O failures are errors. A JSON file that does not describe an API
    /// message is logged and yields `None`, like any unreadable message.
    pub fn read_file(path: &Path) -> Result<Option<RawMessage>, BoxError> {
        let id = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let bytes = fs::read(path)?;

        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));
        if !is_json {
            return Ok(Some(RawMessage::Mime(MimeMessage::new(id, bytes))));
        }

        match serde_json::from_slice::<ApiMessage>(&bytes) {
            Ok(mut message) => {
                if message.id.is_empty() {
                    message.id = id;
                }
                Ok(Some(RawMessage::Api(message)))
            }
            Err(e) => {
                warn!("Skipping {}: {}", path.display(), e);
                Ok(None)
            }
        }
    }
}

impl MailSource for FileSource {
    fn fetch(&mut self, request: &FetchRequest) -> Result<Vec<RawMessage>, BoxError> {
        let dir = self.folder_dir(&request.folder);
        debug!("Reading messages from {}", dir.display());
        if !request.query.is_empty() && !request.query.eq_ignore_ascii_case("ALL") {
            warn!("File source ignores query {:?}", request.query);
        }

        let mut paths: Vec<PathBuf> = fs::read_dir(&dir)?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<Result<_, _>>()?;
        paths.retain(|p| Self::is_message_file(p));
        paths.sort();

        if let Some(limit) = request.limit {
            let start = paths.len().saturating_sub(limit);
            paths.drain(..start);
        }

        let mut messages = Vec::with_capacity(paths.len());
        for path in &paths {
            if let Some(message) = Self::read_file(path)? {
                messages.push(message);
            }
        }

        info!("Read {} messages from {}", messages.len(), dir.display());
        Ok(messages)
    }
}
