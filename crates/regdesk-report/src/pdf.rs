//! Minimal PDF writer for registration reports.
//!
//! Uses the built-in Helvetica font so no font files are embedded. Text
//! flows top to bottom; a new A4 page starts whenever the next line would
//! cross the bottom margin.

use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, ObjectId, Stream, dictionary};
use regdesk_state::Registration;

use crate::error::ReportResult;

const PAGE_WIDTH: i64 = 595;
const PAGE_HEIGHT: i64 = 842;
const MARGIN: i64 = 50;
const TITLE_SIZE: i64 = 18;
const HEADING_SIZE: i64 = 13;
const BODY_SIZE: i64 = 11;

struct Line {
    text: String,
    size: i64,
    /// Vertical space consumed, including the gap above.
    advance: i64,
}

impl Line {
    fn new(text: impl Into<String>, size: i64, gap: i64) -> Self {
        Line {
            text: text.into(),
            size,
            advance: size + 4 + gap,
        }
    }
}

/// Render `records` under `title`, one labelled block per record.
pub fn render_pdf(title: &str, records: &[Registration]) -> ReportResult<Vec<u8>> {
    let lines = layout(title, records);
    let pages = paginate_lines(&lines);

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
    for page in &pages {
        let page_id = add_page(&mut doc, pages_id, page)?;
        kids.push(page_id.into());
    }

    let page_count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => Object::Integer(page_count),
            "Resources" => resources_id,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(PAGE_WIDTH),
                Object::Integer(PAGE_HEIGHT),
            ],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)
        .map_err(|e| crate::error::ReportError::Pdf(e.to_string()))?;
    tracing::debug!(records = records.len(), pages = pages.len(), "rendered pdf");
    Ok(bytes)
}

fn layout(title: &str, records: &[Registration]) -> Vec<Line> {
    let mut lines = vec![Line::new(title, TITLE_SIZE, 0)];
    for (i, r) in records.iter().enumerate() {
        let dash = "-";
        lines.push(Line::new(format!("--- Registration {} ---", i + 1), HEADING_SIZE, 12));
        let ticket = r.ticket_no.map(|t| t.to_string()).unwrap_or_else(|| dash.to_string());
        for (label, value) in [
            ("Ticket No.", ticket.as_str()),
            ("Full Name", r.full_name.as_str()),
            ("Email", r.email.as_str()),
            ("Phone", r.phone_number.as_deref().unwrap_or(dash)),
            ("Profession", r.current_profession.as_deref().unwrap_or(dash)),
            ("Institution", r.institution.as_deref().unwrap_or(dash)),
            ("Status", r.status.label()),
        ] {
            lines.push(Line::new(format!("{label}: {value}"), BODY_SIZE, 0));
        }
    }
    lines
}

/// Split lines into pages by available height. Each page holds at least
/// one line.
fn paginate_lines(lines: &[Line]) -> Vec<Vec<&Line>> {
    let usable = PAGE_HEIGHT - 2 * MARGIN;
    let mut pages: Vec<Vec<&Line>> = vec![Vec::new()];
    let mut used = 0;
    for line in lines {
        let current = pages.len() - 1;
        if used + line.advance > usable && !pages[current].is_empty() {
            pages.push(Vec::new());
            used = 0;
        }
        used += line.advance;
        let current = pages.len() - 1;
        pages[current].push(line);
    }
    pages
}

fn add_page(doc: &mut Document, parent: ObjectId, lines: &[&Line]) -> ReportResult<ObjectId> {
    let mut ops = vec![Operation::new("BT", vec![])];
    let mut y = PAGE_HEIGHT - MARGIN;
    for line in lines {
        y -= line.advance;
        ops.push(Operation::new(
            "Tf",
            vec!["F1".into(), Object::Integer(line.size)],
        ));
        ops.push(Operation::new(
            "Tm",
            vec![
                Object::Integer(1),
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(1),
                Object::Integer(MARGIN),
                Object::Integer(y),
            ],
        ));
        ops.push(Operation::new(
            "Tj",
            vec![Object::string_literal(to_latin(&line.text))],
        ));
    }
    ops.push(Operation::new("ET", vec![]));

    let content = Content { operations: ops }.encode()?;
    let content_id = doc.add_object(Stream::new(dictionary! {}, content));
    Ok(doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => parent,
        "Contents" => content_id,
    }))
}

/// Encode for the WinAnsi built-in font. Latin-1 maps straight through,
/// the 0x80-0x9F block holds the typographic extras, anything else is `?`.
fn to_latin(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            '\u{20}'..='\u{7E}' | '\u{A0}'..='\u{FF}' => c as u8,
            _ => win_ansi_extra(c).unwrap_or(b'?'),
        })
        .collect()
}

fn win_ansi_extra(c: char) -> Option<u8> {
    let byte = match c {
        '€' => 0x80,
        '‚' => 0x82,
        'ƒ' => 0x83,
        '„' => 0x84,
        '…' => 0x85,
        '†' => 0x86,
        '‡' => 0x87,
        'ˆ' => 0x88,
        '‰' => 0x89,
        'Š' => 0x8A,
        '‹' => 0x8B,
        'Œ' => 0x8C,
        'Ž' => 0x8E,
        '\u{2018}' => 0x91,
        '\u{2019}' => 0x92,
        '\u{201C}' => 0x93,
        '\u{201D}' => 0x94,
        '•' => 0x95,
        '\u{2013}' => 0x96,
        '\u{2014}' => 0x97,
        '˜' => 0x98,
        '™' => 0x99,
        'š' => 0x9A,
        '›' => 0x9B,
        'œ' => 0x9C,
        'ž' => 0x9E,
        'Ÿ' => 0x9F,
        _ => return None,
    };
    Some(byte)
}
