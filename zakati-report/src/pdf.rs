//! Single-page PDF rendering.
//!
//! The document holds the title and the four summary lines, nothing else.
//! No timestamp or document ID is embedded, so the same result always
//! produces the same bytes.

use std::io::Write;
use std::path::{Path, PathBuf};

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};
use tracing::debug;
use zakati_core::ZakatResult;

use crate::error::ReportError;
use crate::summary::{summary_lines, REPORT_TITLE};

/// Fixed download name of the report.
pub const REPORT_FILE_NAME: &str = "Zakat_Report.pdf";
/// MIME type of the report.
pub const REPORT_MIME_TYPE: &str = "application/pdf";

// A4 in points.
const PAGE_WIDTH: i64 = 595;
const PAGE_HEIGHT: i64 = 842;

const MARGIN_LEFT: i64 = 56;
const TITLE_Y: i64 = 780;
const FONT_SIZE: i64 = 12;
const FIRST_LINE_Y: i64 = 740;
const LINE_SPACING: i64 = 24;

/// A rendered report ready to be handed to the user.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportArtifact {
    pub file_name: &'static str,
    pub mime_type: &'static str,
    pub bytes: Vec<u8>,
}

impl ReportArtifact {
    pub fn from_result(result: &ZakatResult) -> Result<Self, ReportError> {
        Ok(Self {
            file_name: REPORT_FILE_NAME,
            mime_type: REPORT_MIME_TYPE,
            bytes: render_pdf(result)?,
        })
    }

    /// Writes the report into `dir` under its fixed file name.
    pub fn save_in(&self, dir: &Path) -> Result<PathBuf, ReportError> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(self.file_name);
        std::fs::write(&path, &self.bytes)?;
        debug!(path = %path.display(), bytes = self.bytes.len(), "Report written");
        Ok(path)
    }
}

/// Renders `result` into PDF bytes.
pub fn render_pdf(result: &ZakatResult) -> Result<Vec<u8>, ReportError> {
    let mut buffer = Vec::new();
    write_pdf(result, &mut buffer)?;
    Ok(buffer)
}

/// Renders `result` and writes the PDF into `sink`.
pub fn write_pdf<W: Write>(result: &ZakatResult, sink: &mut W) -> Result<(), ReportError> {
    let mut doc = build_document(result)?;
    doc.save_to(sink)?;
    Ok(())
}

fn build_document(result: &ZakatResult) -> Result<Document, ReportError> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let mut operations = text_line(REPORT_TITLE, centered_x(REPORT_TITLE, FONT_SIZE), TITLE_Y, FONT_SIZE);
    let mut y = FIRST_LINE_Y;
    for line in summary_lines(result) {
        operations.extend(text_line(&line.to_string(), MARGIN_LEFT, y, FONT_SIZE));
        y -= LINE_SPACING;
    }

    let content = Content { operations };
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
    });

    insert_pages(&mut doc, pages_id, page_id, resources_id);

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    Ok(doc)
}

fn insert_pages(doc: &mut Document, pages_id: ObjectId, page_id: ObjectId, resources_id: ObjectId) {
    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => vec![Object::Reference(page_id)],
        "Count" => Object::Integer(1),
        "Resources" => resources_id,
        "MediaBox" => vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Integer(PAGE_WIDTH),
            Object::Integer(PAGE_HEIGHT),
        ],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));
}

fn text_line(text: &str, x: i64, y: i64, size: i64) -> Vec<Operation> {
    vec![
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec![Object::Name(b"F1".to_vec()), Object::Integer(size)]),
        Operation::new("Td", vec![Object::Integer(x), Object::Integer(y)]),
        Operation::new("Tj", vec![Object::string_literal(text)]),
        Operation::new("ET", vec![]),
    ]
}

/// Rough horizontal centre; Helvetica averages about half an em per glyph.
fn centered_x(text: &str, size: i64) -> i64 {
    let width = text.len() as i64 * size / 2;
    ((PAGE_WIDTH - width) / 2).max(MARGIN_LEFT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_is_roughly_centered() {
        let x = centered_x(REPORT_TITLE, FONT_SIZE);
        assert!(x > MARGIN_LEFT && x < PAGE_WIDTH / 2);
        assert_eq!(centered_x(&"W".repeat(200), FONT_SIZE), MARGIN_LEFT);
    }
}
