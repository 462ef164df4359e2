//! Raw MIME messages as delivered over IMAP

use crate::date::normalize_date;
use crate::error::{Error, Result};
use crate::extract::{Extracted, MessageExtractor, PartNode, select_body};
use crate::header::decode_header_bytes;
use crate::types::Message;
use mailparse::body::Body;
use mailparse::{DispositionType, MailHeaderMap, ParsedMail};
use tracing::debug;

/// An RFC 822 message with its transport-assigned id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MimeMessage {
    pub id: String,
    pub raw: Vec<u8>,
}

impl MimeMessage {
    pub fn new(id: impl Into<String>, raw: impl Into<Vec<u8>>) -> Self {
        Self {
            id: id.into(),
            raw: raw.into(),
        }
    }
}

/// Extractor for [`MimeMessage`]
///
/// Decode failures in individual parts are swallowed: the part is
/// skipped and the rest of the tree is still used.
#[derive(Debug, Clone, Copy, Default)]
pub struct MimeExtractor;

impl MimeExtractor {
    fn parse<'a>(raw: &'a MimeMessage) -> Result<ParsedMail<'a>> {
        mailparse::parse_mail(&raw.raw).map_err(|e| Error::extraction(&raw.id, e))
    }
}

impl MessageExtractor for MimeExtractor {
    type Raw = MimeMessage;

    fn extract(&self, raw: &MimeMessage) -> Result<Extracted> {
        let parsed = Self::parse(raw)?;
        select_body(&parsed)
    }

    fn assemble(&self, raw: &MimeMessage) -> Result<Message> {
        let parsed = Self::parse(raw)?;
        let extracted = select_body(&parsed)?;

        let header = |name: &str| {
            parsed
                .headers
                .get_first_header(name)
                .map(|h| decode_header_bytes(h.get_value_raw()))
        };
        let date = parsed
            .headers
            .get_first_header("Date")
            .map(|h| String::from_utf8_lossy(h.get_value_raw()).into_owned());

        let message = Message::builder(&raw.id)
            .subject(header("Subject").unwrap_or_default())
            .from(header("From").unwrap_or_default())
            .to(header("To").unwrap_or_default())
            .date(normalize_date(date.as_deref()))
            .body(extracted.body)
            .attachments(extracted.attachments)
            .build();

        debug!("Assembled MIME message {}: {}", message.id(), message.subject());
        Ok(message)
    }
}

/// Parse raw message bytes into a [`Message`]
pub fn parse_mime(id: impl Into<String>, raw: &[u8]) -> Result<Message> {
    MimeExtractor.assemble(&MimeMessage::new(id, raw))
}

impl PartNode for ParsedMail<'_> {
    fn mime_type(&self) -> String {
        self.ctype.mimetype.to_lowercase()
    }

    fn children(&self) -> &[Self] {
        &self.subparts
    }

    fn is_attachment(&self) -> bool {
        self.get_content_disposition().disposition == DispositionType::Attachment
    }

    fn attachment_name(&self) -> Option<String> {
        let disposition = self.get_content_disposition();
        disposition
            .params
            .get("filename")
            .or_else(|| self.ctype.params.get("name"))
            .filter(|name| !name.trim().is_empty())
            .map(|name| decode_header_bytes(name.as_bytes()))
    }

    fn payload_text(&self) -> Result<Option<String>> {
        match self.get_body() {
            Ok(body) => Ok(Some(body)),
            Err(e) => {
                debug!("Skipping undecodable {} part: {}", self.ctype.mimetype, e);
                Ok(None)
            }
        }
    }

    fn single_part_text(&self) -> Result<String> {
        if let Ok(body) = self.get_body() {
            return Ok(body);
        }
        let coerced = match self.get_body_raw() {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(e) => {
                debug!("Using undecoded payload: {}", e);
                encoded_payload(self)
            }
        };
        Ok(coerced)
    }
}

/// The payload exactly as transmitted, before transfer decoding
fn encoded_payload(part: &ParsedMail<'_>) -> String {
    match part.get_body_encoded() {
        Body::Base64(body) | Body::QuotedPrintable(body) => {
            String::from_utf8_lossy(body.get_raw()).into_owned()
        }
        Body::SevenBit(body) | Body::EightBit(body) => {
            String::from_utf8_lossy(body.get_raw()).into_owned()
        }
        Body::Binary(body) => String::from_utf8_lossy(body.get_raw()).into_owned(),
    }
}
