//! Canonical message record

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A normalized email, independent of the transport it came from
///
/// Built once through [`MessageBuilder`] and never mutated afterwards.
/// `has_attachments` is derived from `attachments` at build time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    id: String,
    subject: String,
    from: String,
    to: String,
    date: DateTime<Utc>,
    body: String,
    attachments: Vec<String>,
    has_attachments: bool,
}

impl Message {
    /// Start building a record for a transport-assigned id
    pub fn builder(id: impl Into<String>) -> MessageBuilder {
        MessageBuilder::new(id)
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn subject(&self) -> &str {
        &self.subject
    }

    #[must_use]
    pub fn from(&self) -> &str {
        &self.from
    }

    #[must_use]
    pub fn to(&self) -> &str {
        &self.to
    }

    #[must_use]
    pub const fn date(&self) -> DateTime<Utc> {
        self.date
    }

    /// Plain text body, never raw HTML
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Decoded attachment file names in part order
    #[must_use]
    pub fn attachments(&self) -> &[String] {
        &self.attachments
    }

    #[must_use]
    pub const fn has_attachments(&self) -> bool {
        self.has_attachments
    }
}

/// Builder for [`Message`]
///
/// Every field except the id is optional; missing text fields default to
/// empty strings and a missing date defaults to the time of [`build`].
///
/// [`build`]: MessageBuilder::build
#[derive(Debug, Clone, Default)]
pub struct MessageBuilder {
    id: String,
    subject: String,
    from: String,
    to: String,
    date: Option<DateTime<Utc>>,
    body: String,
    attachments: Vec<String>,
}

impl MessageBuilder {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = subject.into();
        self
    }

    #[must_use]
    pub fn from(mut self, from: impl Into<String>) -> Self {
        self.from = from.into();
        self
    }

    #[must_use]
    pub fn to(mut self, to: impl Into<String>) -> Self {
        self.to = to.into();
        self
    }

    #[must_use]
    pub fn date(mut self, date: DateTime<Utc>) -> Self {
        self.date = Some(date);
        self
    }

    #[must_use]
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    #[must_use]
    pub fn attachments(mut self, attachments: Vec<String>) -> Self {
        self.attachments = attachments;
        self
    }

    #[must_use]
    pub fn attachment(mut self, name: impl Into<String>) -> Self {
        self.attachments.push(name.into());
        self
    }

    #[must_use]
    pub fn build(self) -> Message {
        let has_attachments = !self.attachments.is_empty();
        Message {
            id: self.id,
            subject: self.subject,
            from: self.from,
            to: self.to,
            date: self.date.unwrap_or_else(Utc::now),
            body: self.body,
            attachments: self.attachments,
            has_attachments,
        }
    }
}
