//! Header text decoding (RFC 2047 encoded-words)

use base64::Engine;
use base64::alphabet;
use base64::engine::DecodePaddingMode;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use charset::Charset;
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

/// `=?charset?encoding?text?=`
static ENCODED_WORD_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"=\?([^?\s]+)\?([bBqQ])\?([^?\s]*)\?=").unwrap());

const BASE64_LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Decode a possibly encoded header value into readable text
///
/// Every encoded-word is decoded with its own charset and the pieces are
/// joined in their original order, so a subject mixing `UTF-8` and
/// `ISO-8859-1` segments comes out as one string. Whitespace between two
/// adjacent encoded-words is dropped. A segment whose charset is unknown
/// or whose bytes are invalid is decoded permissively instead of being
/// left in encoded form. A missing header yields an empty string.
///
/// ```
/// use email_sheet::decode_header;
///
/// let subject = decode_header(Some("=?UTF-8?B?SGVsbG8=?= =?ISO-8859-1?Q?_W=F6rld?="));
/// assert_eq!(subject, "Hello Wörld");
/// assert_eq!(decode_header(None), "");
/// ```
#[must_use]
pub fn decode_header(value: Option<&str>) -> String {
    let Some(value) = value else {
        return String::new();
    };

    // Unfold continuation lines
    let unfolded: String = value
        .chars()
        .map(|c| if c == '\r' || c == '\n' { ' ' } else { c })
        .collect();
    let unfolded = unfolded.trim();

    let mut decoded = String::with_capacity(unfolded.len());
    let mut last_end = 0;
    let mut after_word = false;

    for caps in ENCODED_WORD_REGEX.captures_iter(unfolded) {
        let Some(word) = caps.get(0) else {
            continue;
        };
        let gap = &unfolded[last_end..word.start()];
        if !(after_word && gap.trim().is_empty()) {
            decoded.push_str(gap);
        }
        decoded.push_str(&decode_word(&caps[1], &caps[2], &caps[3]));
        last_end = word.end();
        after_word = true;
    }
    decoded.push_str(&unfolded[last_end..]);

    decoded
}

/// Decode raw header bytes, tolerating non-UTF-8 input
#[must_use]
pub fn decode_header_bytes(raw: &[u8]) -> String {
    decode_header(Some(&String::from_utf8_lossy(raw)))
}

fn decode_word(label: &str, encoding: &str, text: &str) -> String {
    let bytes = if encoding.eq_ignore_ascii_case("b") {
        BASE64_LENIENT.decode(text).map_err(|e| e.to_string())
    } else {
        decode_q(text).map_err(|e| e.to_string())
    };
    let bytes = match bytes {
        Ok(bytes) => bytes,
        Err(e) => {
            debug!("Malformed encoded-word payload {:?}: {}", text, e);
            return text.to_string();
        }
    };

    // RFC 2231 allows a language suffix: `utf-8*en`
    let label = label.split('*').next().unwrap_or(label);
    match Charset::for_label(label.as_bytes()) {
        Some(charset) => charset.decode_without_bom_handling(&bytes).0.into_owned(),
        None => {
            debug!("Unknown charset {:?}, decoding as UTF-8", label);
            String::from_utf8_lossy(&bytes).into_owned()
        }
    }
}

/// The `Q` encoding: quoted-printable with `_` standing for a space
///
/// `_` becomes `=20` rather than a literal space so trailing spaces survive
/// the quoted-printable line rules.
fn decode_q(text: &str) -> Result<Vec<u8>, quoted_printable::QuotedPrintableError> {
    quoted_printable::decode(text.replace('_', "=20"), quoted_printable::ParseMode::Robust)
}
