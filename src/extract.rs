//! Body and attachment selection shared by every transport

use crate::error::Result;
use crate::html::html_to_text;
use crate::types::Message;

/// Body text and attachment names pulled out of one message
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extracted {
    pub body: String,
    pub attachments: Vec<String>,
}

/// Turns one transport-specific raw message into a [`Message`]
pub trait MessageExtractor {
    type Raw: ?Sized;

    /// Select the body and enumerate attachments
    fn extract(&self, raw: &Self::Raw) -> Result<Extracted>;

    /// Decode headers and assemble the full record
    fn assemble(&self, raw: &Self::Raw) -> Result<Message>;
}

/// A node in a message part tree
///
/// Implemented for parsed MIME parts and for API payload parts so both
/// go through the same traversal in [`select_body`].
pub trait PartNode: Sized {
    /// Lowercased content type without parameters
    fn mime_type(&self) -> String;

    /// Nested parts; empty for a leaf
    fn children(&self) -> &[Self];

    fn is_attachment(&self) -> bool;

    /// Decoded file name, if the part carries one
    fn attachment_name(&self) -> Option<String>;

    /// Decoded payload text. `Ok(None)` means the part contributes nothing.
    fn payload_text(&self) -> Result<Option<String>>;

    /// Payload text of a single-part message, coerced as far as possible
    fn single_part_text(&self) -> Result<String> {
        Ok(self.payload_text()?.unwrap_or_default())
    }
}

/// Walk a part tree and pick the body text and attachment names
///
/// Leaves are visited depth-first in document order. Plain-text leaves
/// are concatenated; the first HTML leaf that reduces to non-empty text
/// is kept as a fallback and only used when no plain text was found
/// anywhere in the tree. Attachment leaves contribute their name and never the body.
pub fn select_body<N: PartNode>(root: &N) -> Result<Extracted> {
    let mut extracted = Extracted::default();

    if root.children().is_empty() {
        if root.is_attachment() {
            extracted.attachments.extend(root.attachment_name());
        } else {
            let text = root.single_part_text()?;
            extracted.body = if root.mime_type() == "text/html" {
                html_to_text(&text)
            } else {
                text.trim().to_string()
            };
        }
        return Ok(extracted);
    }

    let mut plain = String::new();
    let mut html: Option<String> = None;
    let mut stack: Vec<&N> = vec![root];

    while let Some(node) = stack.pop() {
        let children = node.children();
        if !children.is_empty() {
            stack.extend(children.iter().rev());
            continue;
        }

        if node.is_attachment() {
            extracted.attachments.extend(node.attachment_name());
            continue;
        }

        match node.mime_type().as_str() {
            "text/plain" => {
                if let Some(text) = node.payload_text()? {
                    plain.push_str(&text);
                }
            }
            "text/html" if html.is_none() => {
                html = node
                    .payload_text()?
                    .map(|text| html_to_text(&text))
                    .filter(|text| !text.is_empty());
            }
            _ => {}
        }
    }

    extracted.body = if plain.trim().is_empty() {
        html.unwrap_or_default()
    } else {
        plain.trim().to_string()
    };

    Ok(extracted)
}
