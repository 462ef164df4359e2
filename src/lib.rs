// Enforce at crate level
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

//! Email to spreadsheet export
//!
//! Normalizes messages from two transports into one [`Message`] record
//! and writes batches of records to `.xlsx` or `.csv`.
//!
//! # Features
//!
//! - Raw MIME messages (as fetched over IMAP) and JSON payload trees (as
//!   returned by a provider API) go through one body selection policy
//! - RFC 2047 header decoding with mixed charsets
//! - Lenient date parsing with a "now" fallback
//! - Styled single-sheet and details + summary spreadsheets, BOM-prefixed CSV
//!
//! # Example
//!
//! ```rust
//! use email_sheet::{Exporter, Table, parse_mime};
//!
//! let raw = b"From: sender@example.com\r\nSubject: Hello\r\n\r\nBody";
//! let message = parse_mime("1", raw).unwrap();
//! assert_eq!(message.subject(), "Hello");
//!
//! let table = Table::from_messages(&[message]).unwrap();
//! let csv = Exporter::default().csv_bytes(&table).unwrap();
//! assert!(csv.starts_with(b"\xEF\xBB\xBFDate,From,To"));
//! ```

mod api;
mod batch;
mod config;
mod date;
mod error;
mod export;
mod extract;
mod header;
mod html;
mod mime;
mod source;
mod table;
mod types;

pub use api::{ApiBody, ApiExtractor, ApiHeader, ApiMessage, ApiPart};
pub use batch::{fetch_messages, normalize, normalize_batch};
pub use config::{DEFAULT_BODY_LIMIT, ExportConfig, MAX_BODY_LIMIT, MAX_CELL_CHARS};
pub use date::{normalize_date, parse_date};
pub use error::{BoxError, Error, Result};
pub use export::{
    DEFAULT_COLUMN_WIDTH, DETAILS_SHEET_NAME, Exporter, SHEET_NAME, SUMMARY_SHEET_NAME,
    column_width,
};
pub use extract::{Extracted, MessageExtractor, PartNode, select_body};
pub use header::{decode_header, decode_header_bytes};
pub use html::html_to_text;
pub use mime::{MimeExtractor, MimeMessage, parse_mime};
pub use source::{FetchRequest, FileSource, MailSource, RawMessage};
pub use table::*;
pub use types::{Message, MessageBuilder};
