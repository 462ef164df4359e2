use email_sheet::*;

fn multipart(content_type: &str, parts: &[&str]) -> Vec<u8> {
    let mut raw = format!(
        "From: Alice <alice@example.com>\r\n\
         To: bob@example.com\r\n\
         Subject: Multipart\r\n\
         Date: Wed, 01 Jan 2025 12:00:00 +0000\r\n\
         MIME-Version: 1.0\r\n\
         Content-Type: {content_type}; boundary=\"outer\"\r\n\
         \r\n"
    );
    for part in parts {
        raw.push_str("--outer\r\n");
        raw.push_str(part);
        raw.push_str("\r\n");
    }
    raw.push_str("--outer--\r\n");
    raw.into_bytes()
}

const PLAIN: &str = "Content-Type: text/plain; charset=utf-8\r\n\r\nHello plain";
const HTML: &str = "Content-Type: text/html; charset=utf-8\r\n\r\n<p>Hello <b>HTML</b></p>";
const PDF: &str = "Content-Type: application/pdf; name=\"report.pdf\"\r\n\
                   Content-Disposition: attachment; filename=\"report.pdf\"\r\n\
                   Content-Transfer-Encoding: base64\r\n\r\nJVBERi0xLjQ=";

// --- Headers and record ---

#[test]
fn test_parse_simple_email() {
    let raw = b"From: John Doe <john@example.com>\r\n\
                To: recipient@example.com\r\n\
                Subject: Test Email\r\n\
                Date: Wed, 01 Jan 2025 12:00:00 +0000\r\n\
                \r\n\
                Hello, this is a test email.\r\n";

    let message = parse_mime("7", raw).unwrap();

    assert_eq!(message.id(), "7");
    assert_eq!(message.from(), "John Doe <john@example.com>");
    assert_eq!(message.to(), "recipient@example.com");
    assert_eq!(message.subject(), "Test Email");
    assert_eq!(message.body(), "Hello, this is a test email.");
    assert_eq!(message.date().to_rfc3339(), "2025-01-01T12:00:00+00:00");
    assert!(message.attachments().is_empty());
    assert!(!message.has_attachments());
}

#[test]
fn test_encoded_headers_are_decoded() {
    let raw = b"From: =?UTF-8?Q?Ren=C3=A9?= <rene@example.com>\r\n\
                Subject: =?UTF-8?B?SGVsbG8=?= =?ISO-8859-1?Q?_W=F6rld?=\r\n\
                \r\n\
                body";

    let message = parse_mime("1", raw).unwrap();

    assert_eq!(message.subject(), "Hello Wörld");
    assert_eq!(message.from(), "René <rene@example.com>");
}

#[test]
fn test_raw_utf8_subject_with_encoded_word() {
    let raw = "From: a@example.com\r\n\
               Subject: Café =?UTF-8?Q?men=C3=BC?=\r\n\
               \r\n\
               body";

    let message = parse_mime("1", raw.as_bytes()).unwrap();
    assert_eq!(message.subject(), "Café menü");
}

#[test]
fn test_minimal_message_gets_defaults() {
    let before = chrono::Utc::now();
    let message = parse_mime("min", b"\r\n").unwrap();
    let after = chrono::Utc::now();

    assert_eq!(message.subject(), "");
    assert_eq!(message.from(), "");
    assert_eq!(message.to(), "");
    assert_eq!(message.body(), "");
    assert!(message.date() >= before && message.date() <= after);
    assert!(!message.has_attachments());
}

// --- Body selection ---

#[test]
fn test_plain_wins_over_html_when_html_first() {
    let raw = multipart("multipart/alternative", &[HTML, PLAIN]);
    let message = parse_mime("1", &raw).unwrap();
    assert_eq!(message.body(), "Hello plain");
}

#[test]
fn test_plain_wins_over_html_when_plain_first() {
    let raw = multipart("multipart/alternative", &[PLAIN, HTML]);
    let message = parse_mime("1", &raw).unwrap();
    assert_eq!(message.body(), "Hello plain");
}

#[test]
fn test_html_only_is_reduced_to_text() {
    let raw = multipart("multipart/mixed", &[HTML, PDF]);
    let message = parse_mime("1", &raw).unwrap();

    assert_eq!(message.body(), "Hello HTML");
    assert!(!message.body().contains('<'));
}

#[test]
fn test_single_part_html_is_reduced() {
    let raw = b"Subject: Test\r\n\
                Content-Type: text/html\r\n\
                \r\n\
                <html><body><h1>Hello</h1>\n\n<p>World</p></body></html>";

    let message = parse_mime("1", raw).unwrap();
    assert_eq!(message.body(), "Hello World");
}

#[test]
fn test_empty_html_part_does_not_block_later_html() {
    let empty = "Content-Type: text/html\r\n\r\n<p> </p>";
    let second = "Content-Type: text/html\r\n\r\n<p>second</p>";
    let raw = multipart("multipart/mixed", &[empty, second]);

    let message = parse_mime("1", &raw).unwrap();
    assert_eq!(message.body(), "second");
}

#[test]
fn test_multiple_plain_parts_are_concatenated() {
    // Every inline text/plain part is appended, not just the first one
    let first = "Content-Type: text/plain\r\n\r\nfirst ";
    let second = "Content-Type: text/plain\r\n\r\nsecond";
    let raw = multipart("multipart/mixed", &[first, second]);

    let message = parse_mime("1", &raw).unwrap();
    assert!(message.body().starts_with("first"));
    assert!(message.body().ends_with("second"));
}

#[test]
fn test_charset_is_applied_to_body() {
    let raw = b"Subject: Latin\r\n\
                Content-Type: text/plain; charset=iso-8859-1\r\n\
                Content-Transfer-Encoding: quoted-printable\r\n\
                \r\n\
                Caf=E9 au lait";

    let message = parse_mime("1", raw).unwrap();
    assert_eq!(message.body(), "Café au lait");
}

#[test]
fn test_nested_multipart_is_walked() {
    let inner = "Content-Type: multipart/alternative; boundary=\"inner\"\r\n\r\n\
                 --inner\r\n\
                 Content-Type: text/html\r\n\r\n<div>nested html</div>\r\n\
                 --inner\r\n\
                 Content-Type: text/plain\r\n\r\nnested plain\r\n\
                 --inner--";
    let raw = multipart("multipart/mixed", &[inner, PDF]);

    let extracted = MimeExtractor.extract(&MimeMessage::new("1", raw)).unwrap();
    assert_eq!(extracted.body, "nested plain");
    assert_eq!(extracted.attachments, vec!["report.pdf"]);
}

#[test]
fn test_undecodable_part_is_skipped() {
    let broken = "Content-Type: text/plain\r\n\
                  Content-Transfer-Encoding: base64\r\n\r\n@@@@";
    let fallback = "Content-Type: text/html\r\n\r\n<p>Fallback</p>";
    let raw = multipart("multipart/mixed", &[broken, fallback, PDF]);

    let message = parse_mime("1", &raw).unwrap();
    assert_eq!(message.body(), "Fallback");
    assert_eq!(message.attachments(), ["report.pdf"]);
}

// --- Attachments ---

#[test]
fn test_attachment_names_in_order() {
    let image = "Content-Type: image/png\r\n\
                 Content-Disposition: attachment; filename=\"chart.png\"\r\n\r\nxx";
    let raw = multipart("multipart/mixed", &[PLAIN, PDF, image]);

    let message = parse_mime("1", &raw).unwrap();
    assert_eq!(message.attachments(), ["report.pdf", "chart.png"]);
    assert!(message.has_attachments());
    assert_eq!(message.body(), "Hello plain");
}

#[test]
fn test_text_attachment_does_not_leak_into_body() {
    let notes = "Content-Type: text/plain\r\n\
                 Content-Disposition: attachment; filename=\"notes.txt\"\r\n\r\nsecret notes";
    let raw = multipart("multipart/mixed", &[PLAIN, notes]);

    let message = parse_mime("1", &raw).unwrap();
    assert_eq!(message.body(), "Hello plain");
    assert_eq!(message.attachments(), ["notes.txt"]);
}

#[test]
fn test_attachment_without_filename_is_ignored() {
    let unnamed = "Content-Type: application/octet-stream\r\n\
                   Content-Disposition: attachment\r\n\r\nxx";
    let raw = multipart("multipart/mixed", &[PLAIN, unnamed]);

    let message = parse_mime("1", &raw).unwrap();
    assert!(message.attachments().is_empty());
    assert!(!message.has_attachments());
}

#[test]
fn test_encoded_attachment_name_is_decoded() {
    let encoded = "Content-Type: application/pdf\r\n\
                   Content-Disposition: attachment; filename=\"=?UTF-8?B?w6l0w6kucGRm?=\"\r\n\r\nxx";
    let raw = multipart("multipart/mixed", &[PLAIN, encoded]);

    let message = parse_mime("1", &raw).unwrap();
    assert_eq!(message.attachments(), ["été.pdf"]);
}

#[test]
fn test_inline_part_with_name_is_not_an_attachment() {
    let inline = "Content-Type: image/png; name=\"logo.png\"\r\n\
                  Content-Disposition: inline; filename=\"logo.png\"\r\n\r\nxx";
    let raw = multipart("multipart/related", &[HTML, inline]);

    let message = parse_mime("1", &raw).unwrap();
    assert!(message.attachments().is_empty());
    assert_eq!(message.body(), "Hello HTML");
}

#[test]
fn test_single_part_attachment_has_no_body() {
    // A lone attachment part is listed, its payload is not used as body
    let raw = b"Subject: Notes\r\n\
                Content-Type: text/plain\r\n\
                Content-Disposition: attachment; filename=\"a.txt\"\r\n\
                \r\n\
                attached text";

    let message = parse_mime("1", raw).unwrap();
    assert_eq!(message.body(), "");
    assert_eq!(message.attachments(), ["a.txt"]);
    assert!(message.has_attachments());
}
