//! Per-message normalization boundary for a fetched batch

use crate::api::ApiExtractor;
use crate::error::{Error, Result};
use crate::extract::MessageExtractor;
use crate::mime::MimeExtractor;
use crate::source::{FetchRequest, MailSource, RawMessage};
use crate::types::Message;
use tracing::{info, warn};

/// Normalize one raw message with the extractor matching its transport
pub fn normalize(raw: &RawMessage) -> Result<Message> {
    match raw {
        RawMessage::Mime(message) => MimeExtractor.assemble(message),
        RawMessage::Api(message) => ApiExtractor.assemble(message),
    }
}

/// Normalize a batch, dropping messages that fail
///
/// Order is preserved. Failures are logged and never abort the batch;
/// the only visible trace is a shorter result.
#[must_use]
pub fn normalize_batch(raws: &[RawMessage]) -> Vec<Message> {
    let mut messages = Vec::with_capacity(raws.len());

    for raw in raws {
        match normalize(raw) {
            Ok(message) => messages.push(message),
            Err(e) => {
                warn!("Failed to process email {}: {}", raw.id(), e);
            }
        }
    }

    if messages.len() < raws.len() {
        info!(
            "Normalized {} of {} messages ({} skipped)",
            messages.len(),
            raws.len(),
            raws.len() - messages.len()
        );
    }

    messages
}

/// Fetch from a source and normalize the result
///
/// A source failure is fatal and comes back as [`Error::Transport`].
pub fn fetch_messages<S: MailSource + ?Sized>(
    source: &mut S,
    request: &FetchRequest,
) -> Result<Vec<Message>> {
    let raws = source.fetch(request).map_err(|e| {
        Error::transport(format!("Failed to fetch emails from {}", request.folder), e)
    })?;

    info!("Fetched {} messages from {}", raws.len(), request.folder);
    Ok(normalize_batch(&raws))
}
