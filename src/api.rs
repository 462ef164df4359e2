//! Messages returned by a mail provider's HTTP API
//!
//! The shape follows the Gmail `users.messages.get` response with
//! `format=full`: a flat header list on the payload and a tree of parts
//! whose bodies carry base64url data inline.

use crate::date::parse_date;
use crate::error::{Error, Result};
use crate::extract::{Extracted, MessageExtractor, PartNode, select_body};
use crate::header::decode_header;
use crate::types::Message;
use base64::Engine;
use base64::alphabet;
use base64::engine::DecodePaddingMode;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// base64url that accepts data with or without `=` padding
const BASE64_URL_LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Full message from the API
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ApiMessage {
    pub id: String,
    pub thread_id: Option<String>,
    /// Milliseconds since the epoch, as a decimal string
    pub internal_date: Option<String>,
    pub payload: ApiPart,
}

/// A node of the payload tree; the payload itself is the root
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ApiPart {
    pub mime_type: String,
    pub filename: Option<String>,
    pub headers: Vec<ApiHeader>,
    pub body: ApiBody,
    pub parts: Option<Vec<ApiPart>>,
}

/// Header name-value pair
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiHeader {
    pub name: String,
    pub value: String,
}

/// Part body; `data` is base64url encoded
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ApiBody {
    pub size: Option<u64>,
    pub data: Option<String>,
    pub attachment_id: Option<String>,
}

impl ApiMessage {
    /// Parse a JSON response body
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// First header with this name, compared case-insensitively
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.payload
            .headers
            .iter()
            .find(|h| h.name.eq_ignore_ascii_case(name))
            .map(|h| h.value.as_str())
    }

    fn internal_timestamp(&self) -> Option<DateTime<Utc>> {
        self.internal_date
            .as_deref()
            .and_then(|ms| ms.trim().parse::<i64>().ok())
            .and_then(DateTime::from_timestamp_millis)
    }
}

/// Extractor for [`ApiMessage`]
///
/// Unlike the MIME walk, a body that fails to decode fails the whole
/// message; the batch layer drops it.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiExtractor;

impl MessageExtractor for ApiExtractor {
    type Raw = ApiMessage;

    fn extract(&self, raw: &ApiMessage) -> Result<Extracted> {
        select_body(&raw.payload).map_err(|e| Error::extraction(&raw.id, e))
    }

    fn assemble(&self, raw: &ApiMessage) -> Result<Message> {
        let extracted = self.extract(raw)?;

        // The Date header wins; the server-side receive time is next
        let date = raw
            .header("Date")
            .and_then(parse_date)
            .or_else(|| raw.internal_timestamp())
            .unwrap_or_else(|| {
                debug!("No usable date on API message {}, using current time", raw.id);
                Utc::now()
            });

        let message = Message::builder(&raw.id)
            .subject(decode_header(raw.header("Subject")))
            .from(decode_header(raw.header("From")))
            .to(decode_header(raw.header("To")))
            .date(date)
            .body(extracted.body)
            .attachments(extracted.attachments)
            .build();

        debug!("Assembled API message {}: {}", message.id(), message.subject());
        Ok(message)
    }
}

impl PartNode for ApiPart {
    fn mime_type(&self) -> String {
        self.mime_type.to_lowercase()
    }

    fn children(&self) -> &[Self] {
        self.parts.as_deref().unwrap_or_default()
    }

    fn is_attachment(&self) -> bool {
        self.filename.as_deref().is_some_and(|name| !name.is_empty())
    }

    fn attachment_name(&self) -> Option<String> {
        self.filename
            .as_deref()
            .filter(|name| !name.is_empty())
            .map(|name| decode_header(Some(name)))
    }

    fn payload_text(&self) -> Result<Option<String>> {
        let Some(data) = self.body.data.as_deref() else {
            return Ok(None);
        };
        let bytes = BASE64_URL_LENIENT
            .decode(data.trim())
            .map_err(|e| Error::Decode(format!("invalid base64url body: {e}")))?;
        let text = String::from_utf8(bytes)
            .map_err(|e| Error::Decode(format!("body is not UTF-8: {e}")))?;
        Ok(Some(text))
    }
}
