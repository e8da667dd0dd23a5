use lopdf::content::Content;
use lopdf::{Document, Object};
use rust_decimal_macros::dec;

use zakati_core::prelude::*;
use zakati_report::{render_pdf, summary_lines, write_pdf, ReportArtifact, REPORT_TITLE};

fn sample_result(cash: i64, rate: rust_decimal::Decimal) -> ZakatResult {
    let assets = AssetDeclaration::new().with(AssetCategory::Cash, cash).unwrap();
    let rates = RateSnapshot::from_values(Currency::Usd, Currency::Sar, 250, 3, rate).unwrap();
    ZakatCalculator::new()
        .compute(&assets, &LiabilityDeclaration::debts(125).unwrap(), &rates)
        .unwrap()
}

/// Every string drawn with `Tj`, in page order.
fn drawn_text(bytes: &[u8]) -> Vec<String> {
    let doc = Document::load_mem(bytes).expect("valid PDF");
    let pages = doc.get_pages();
    assert_eq!(pages.len(), 1, "report must be a single page");

    let page_id = *pages.values().next().unwrap();
    let content = Content::decode(&doc.get_page_content(page_id).unwrap()).unwrap();
    content
        .operations
        .iter()
        .filter(|op| op.operator == "Tj")
        .filter_map(|op| match op.operands.first() {
            Some(Object::String(bytes, _)) => Some(String::from_utf8_lossy(bytes).to_string()),
            _ => None,
        })
        .collect()
}

#[test]
fn test_report_has_title_and_four_lines() {
    let result = sample_result(30000, dec!(3.75));
    let text = drawn_text(&render_pdf(&result).unwrap());

    assert_eq!(text.len(), 5);
    assert_eq!(text[0], REPORT_TITLE);
    assert_eq!(text[1], "Total Assets: 112500.00 SAR");
    assert_eq!(text[2], "Total Liabilities: 468.75 SAR");
    assert_eq!(text[3], "Nisab Threshold: 79687.50 SAR");
    assert_eq!(text[4], "Zakat Due: 2800.78 SAR");
}

#[test]
fn test_every_line_uses_helvetica_12() {
    let bytes = render_pdf(&sample_result(30000, dec!(1))).unwrap();
    let doc = Document::load_mem(&bytes).unwrap();
    let page_id = *doc.get_pages().values().next().unwrap();
    let content = Content::decode(&doc.get_page_content(page_id).unwrap()).unwrap();

    let sizes: Vec<&Object> = content
        .operations
        .iter()
        .filter(|op| op.operator == "Tf")
        .map(|op| &op.operands[1])
        .collect();
    assert_eq!(sizes.len(), 5);
    assert!(sizes.iter().all(|size| matches!(size, Object::Integer(12))));

    let font = doc
        .objects
        .values()
        .filter_map(|obj| obj.as_dict().ok())
        .find(|dict| dict.get(b"Type").and_then(Object::as_name).ok() == Some(b"Font".as_slice()))
        .expect("font resource");
    assert_eq!(font.get(b"BaseFont").and_then(Object::as_name).unwrap(), b"Helvetica");
}

#[test]
fn test_report_values_match_result_verbatim() {
    let result = sample_result(1000, dec!(1));
    let text = drawn_text(&render_pdf(&result).unwrap());
    let expected: Vec<String> = summary_lines(&result).iter().map(ToString::to_string).collect();
    assert_eq!(&text[1..], expected.as_slice());
    assert_eq!(text[4], "Zakat Due: 0.00 SAR");
}

#[test]
fn test_rendering_is_deterministic() {
    let result = sample_result(30000, dec!(3.75));
    let first = render_pdf(&result).unwrap();
    let second = render_pdf(&result).unwrap();
    assert_eq!(first, second);
    assert!(first.starts_with(b"%PDF-1.5"));
}

#[test]
fn test_write_pdf_to_sink_matches_render() {
    let result = sample_result(30000, dec!(1));
    let mut sink = std::io::Cursor::new(Vec::new());
    write_pdf(&result, &mut sink).unwrap();
    assert_eq!(sink.into_inner(), render_pdf(&result).unwrap());
}

#[test]
fn test_artifact_metadata_and_save() {
    let result = sample_result(30000, dec!(1));
    let artifact = ReportArtifact::from_result(&result).unwrap();
    assert_eq!(artifact.file_name, "Zakat_Report.pdf");
    assert_eq!(artifact.mime_type, "application/pdf");

    let dir = std::env::temp_dir().join(format!("zakati-report-test-{}", std::process::id()));
    let path = artifact.save_in(&dir).unwrap();
    assert_eq!(path.file_name().unwrap(), "Zakat_Report.pdf");
    assert_eq!(std::fs::read(&path).unwrap(), artifact.bytes);
    let _ = std::fs::remove_dir_all(&dir);
}
