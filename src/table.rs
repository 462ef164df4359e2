//! Flat tabular projection of message records

use crate::error::{Error, Result};
use crate::types::Message;
use chrono::{DateTime, Utc};
use std::borrow::Cow;
use std::collections::HashSet;

/// Column headers, in output order
pub const COLUMNS: [&str; 7] = [
    "Date",
    "From",
    "To",
    "Subject",
    "Body",
    "Has Attachments",
    "Attachments",
];

/// Index of the body column in [`COLUMNS`]
pub const BODY_COLUMN: usize = 4;

/// How dates are rendered in exported cells
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Marker appended to truncated cells
pub const ELLIPSIS: &str = "...";

/// One exported row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub date: DateTime<Utc>,
    pub from: String,
    pub to: String,
    pub subject: String,
    pub body: String,
    pub has_attachments: bool,
    /// Attachment names joined with `", "`
    pub attachments: String,
}

impl Row {
    #[must_use]
    pub fn from_message(message: &Message) -> Self {
        Self {
            date: message.date(),
            from: message.from().to_string(),
            to: message.to().to_string(),
            subject: message.subject().to_string(),
            body: message.body().to_string(),
            has_attachments: message.has_attachments(),
            attachments: message.attachments().join(", "),
        }
    }

    /// `Yes` or `No`
    #[must_use]
    pub const fn has_attachments_label(&self) -> &'static str {
        if self.has_attachments { "Yes" } else { "No" }
    }

    /// Cell texts in [`COLUMNS`] order, without truncation
    #[must_use]
    pub fn cells(&self) -> [String; 7] {
        [
            self.date.format(DATE_FORMAT).to_string(),
            self.from.clone(),
            self.to.clone(),
            self.subject.clone(),
            self.body.clone(),
            self.has_attachments_label().to_string(),
            self.attachments.clone(),
        ]
    }

    /// Cell texts as written to a spreadsheet: the body is cut at `body_limit`
    #[must_use]
    pub fn spreadsheet_cells(&self, body_limit: usize) -> [String; 7] {
        let mut cells = self.cells();
        if let Cow::Owned(cut) = truncate_cell(&cells[BODY_COLUMN], body_limit) {
            cells[BODY_COLUMN] = cut;
        }
        cells
    }
}

/// Cut text longer than `limit` characters and append [`ELLIPSIS`]
#[must_use]
pub fn truncate_cell(text: &str, limit: usize) -> Cow<'_, str> {
    match text.char_indices().nth(limit) {
        Some((cut, _)) => Cow::Owned(format!("{}{ELLIPSIS}", &text[..cut])),
        None => Cow::Borrowed(text),
    }
}

/// A non-empty table, one row per message in input order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    rows: Vec<Row>,
}

impl Table {
    /// Build a table; zero messages is an [`Error::EmptyInput`]
    pub fn from_messages(messages: &[Message]) -> Result<Self> {
        if messages.is_empty() {
            return Err(Error::EmptyInput);
        }
        Ok(Self {
            rows: messages.iter().map(Row::from_message).collect(),
        })
    }

    #[must_use]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.rows.len()
    }

    /// Always `false`; an empty table cannot be built
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Key metrics for the summary sheet, stamped with the current time
    #[must_use]
    pub fn summary(&self) -> Summary {
        Summary::from_table(self, Utc::now())
    }
}

/// Metrics shown on the summary sheet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub total: usize,
    pub earliest: Option<DateTime<Utc>>,
    pub latest: Option<DateTime<Utc>>,
    pub unique_senders: usize,
    pub with_attachments: usize,
    pub generated_at: DateTime<Utc>,
}

/// A value in the summary sheet
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummaryValue {
    Count(usize),
    Text(String),
}

impl Summary {
    #[must_use]
    pub fn from_table(table: &Table, generated_at: DateTime<Utc>) -> Self {
        let rows = table.rows();
        Self {
            total: rows.len(),
            earliest: rows.iter().map(|r| r.date).min(),
            latest: rows.iter().map(|r| r.date).max(),
            unique_senders: rows
                .iter()
                .map(|r| r.from.as_str())
                .collect::<HashSet<_>>()
                .len(),
            with_attachments: rows.iter().filter(|r| r.has_attachments).count(),
            generated_at,
        }
    }

    /// `earliest to latest`, or `N/A`
    #[must_use]
    pub fn date_range(&self) -> String {
        match (self.earliest, self.latest) {
            (Some(from), Some(to)) => {
                format!("{} to {}", from.format(DATE_FORMAT), to.format(DATE_FORMAT))
            }
            _ => "N/A".to_string(),
        }
    }

    /// Metric name and value pairs, in sheet order
    #[must_use]
    pub fn metrics(&self) -> Vec<(&'static str, SummaryValue)> {
        vec![
            ("Total Emails", SummaryValue::Count(self.total)),
            ("Date Range", SummaryValue::Text(self.date_range())),
            ("Unique Senders", SummaryValue::Count(self.unique_senders)),
            (
                "Emails with Attachments",
                SummaryValue::Count(self.with_attachments),
            ),
            (
                "Export Date",
                SummaryValue::Text(self.generated_at.format(DATE_FORMAT).to_string()),
            ),
        ]
    }
}
