use chrono::{TimeZone, Utc};
use email_sheet::*;

fn sample_messages() -> Vec<Message> {
    vec![
        Message::builder("1")
            .subject("Project Update")
            .from("manager@company.com")
            .to("team@company.com")
            .date(Utc.with_ymd_and_hms(2025, 10, 1, 10, 30, 0).unwrap())
            .body("Here's the latest update on our project progress.")
            .attachment("report.pdf")
            .build(),
        Message::builder("2")
            .subject("Team Meeting Notes")
            .from("secretary@company.com")
            .to("team@company.com")
            .date(Utc.with_ymd_and_hms(2025, 10, 15, 14, 0, 0).unwrap())
            .body("Please find attached the notes from today's meeting.")
            .attachments(vec!["notes.docx".to_string(), "agenda.pdf".to_string()])
            .build(),
        Message::builder("3")
            .subject("Quick Question")
            .from("colleague@company.com")
            .to("you@company.com")
            .date(Utc.with_ymd_and_hms(2025, 10, 20, 9, 15, 0).unwrap())
            .body("Do you have a moment to discuss the budget?")
            .build(),
    ]
}

// --- Message ---

#[test]
fn test_has_attachments_follows_attachments() {
    for message in sample_messages() {
        assert_eq!(message.has_attachments(), !message.attachments().is_empty());
    }
}

#[test]
fn test_builder_defaults() {
    let message = Message::builder("only-id").build();
    assert_eq!(message.id(), "only-id");
    assert_eq!(message.body(), "");
    assert!(message.attachments().is_empty());
    assert!(!message.has_attachments());
}

// --- Table ---

#[test]
fn test_empty_input_is_rejected() {
    let err = Table::from_messages(&[]).unwrap_err();
    assert!(matches!(err, Error::EmptyInput));
}

#[test]
fn test_one_row_per_message_in_order() {
    let table = Table::from_messages(&sample_messages()).unwrap();

    assert_eq!(table.len(), 3);
    assert!(!table.is_empty());
    let subjects: Vec<&str> = table.rows().iter().map(|r| r.subject.as_str()).collect();
    assert_eq!(
        subjects,
        ["Project Update", "Team Meeting Notes", "Quick Question"]
    );
}

#[test]
fn test_row_cells() {
    let table = Table::from_messages(&sample_messages()).unwrap();

    let cells = table.rows()[1].cells();
    assert_eq!(cells[0], "2025-10-15 14:00:00");
    assert_eq!(cells[1], "secretary@company.com");
    assert_eq!(cells[5], "Yes");
    assert_eq!(cells[6], "notes.docx, agenda.pdf");

    let cells = table.rows()[2].cells();
    assert_eq!(cells[5], "No");
    assert_eq!(cells[6], "");
}

#[test]
fn test_column_order() {
    assert_eq!(
        COLUMNS,
        [
            "Date",
            "From",
            "To",
            "Subject",
            "Body",
            "Has Attachments",
            "Attachments"
        ]
    );
    assert_eq!(COLUMNS[BODY_COLUMN], "Body");
}

// --- Truncation ---

#[test]
fn test_long_body_is_truncated_in_spreadsheet_cells() {
    let message = Message::builder("long").body("x".repeat(600)).build();
    let table = Table::from_messages(&[message]).unwrap();

    let cells = table.rows()[0].spreadsheet_cells(DEFAULT_BODY_LIMIT);
    assert_eq!(cells[BODY_COLUMN].chars().count(), 503);
    assert!(cells[BODY_COLUMN].ends_with("..."));

    // The table itself keeps the full text
    assert_eq!(table.rows()[0].body.len(), 600);
}

#[test]
fn test_short_body_is_untouched() {
    let body = "y".repeat(400);
    let message = Message::builder("short").body(body.clone()).build();
    let table = Table::from_messages(&[message]).unwrap();

    let cells = table.rows()[0].spreadsheet_cells(DEFAULT_BODY_LIMIT);
    assert_eq!(cells[BODY_COLUMN], body);
}

#[test]
fn test_truncate_counts_characters() {
    let text = "é".repeat(501);
    let cut = truncate_cell(&text, 500);
    assert_eq!(cut.chars().count(), 503);
    assert_eq!(truncate_cell("exactly", 7), "exactly");
}

// --- Summary ---

#[test]
fn test_summary_metrics() {
    let table = Table::from_messages(&sample_messages()).unwrap();
    let generated = Utc.with_ymd_and_hms(2025, 10, 21, 8, 0, 0).unwrap();
    let summary = Summary::from_table(&table, generated);

    assert_eq!(summary.total, 3);
    assert_eq!(summary.with_attachments, 2);
    assert_eq!(summary.unique_senders, 3);
    assert_eq!(
        summary.date_range(),
        "2025-10-01 10:30:00 to 2025-10-20 09:15:00"
    );

    let metrics = summary.metrics();
    assert_eq!(metrics[0], ("Total Emails", SummaryValue::Count(3)));
    assert_eq!(
        metrics[3],
        ("Emails with Attachments", SummaryValue::Count(2))
    );
    assert_eq!(
        metrics[4],
        (
            "Export Date",
            SummaryValue::Text("2025-10-21 08:00:00".to_string())
        )
    );
}

#[test]
fn test_summary_counts_distinct_senders() {
    let messages: Vec<Message> = ["a@x.com", "b@x.com", "a@x.com"]
        .iter()
        .enumerate()
        .map(|(i, from)| Message::builder(i.to_string()).from(*from).build())
        .collect();
    let table = Table::from_messages(&messages).unwrap();

    assert_eq!(table.summary().unique_senders, 2);
    assert_eq!(table.summary().with_attachments, 0);
}
