mod common;

use pretty_assertions::assert_eq;

use common::{FOOTER, brand, fixture, numbered_items, operator_count, page_count, page_texts, record};
use quotation_pdf::{
    BrandAssets, DocumentSession, Error, ExportError, ExportOptions, ExportOutcome, OverlayStyle,
    PageSpec, decorate, export_record_file, paginate, serialize,
};

fn export(session: &DocumentSession) -> Vec<u8> {
    match session
        .export(&brand(), &ExportOptions::default())
        .expect("export")
    {
        ExportOutcome::Exported(file) => {
            assert_eq!(file.filename, "quotation.pdf");
            file.bytes
        }
        ExportOutcome::Empty => panic!("expected a document"),
    }
}

#[test]
fn short_quotation_is_stamped_on_every_page() {
    common::init_logging();
    let session = DocumentSession::from_record(record(numbered_items(2))).expect("session");
    let bytes = export(&session);

    assert!(bytes.starts_with(b"%PDF-"));
    let n = page_count(&bytes);
    assert!(n >= 1);

    let texts = page_texts(&bytes);
    assert_eq!(texts.len(), n);
    for (idx, page) in texts.iter().enumerate() {
        assert!(page.contains(&format!("Page {} of {n}", idx + 1)), "page {}", idx + 1);
        assert!(page.contains(&FOOTER.to_string()), "page {}", idx + 1);
    }

    let names: Vec<&String> = texts
        .iter()
        .flatten()
        .filter(|t| t.starts_with("Item name: "))
        .collect();
    assert_eq!(names, vec!["Item name: Item 1", "Item name: Item 2"]);
    // Both items fit together at the top of the first page.
    assert!(texts[0].iter().any(|t| t == "Item name: Item 2"));
}

#[test]
fn long_quotation_spans_pages_with_numbered_footers() {
    common::init_logging();
    let session = DocumentSession::from_record(record(numbered_items(45))).expect("session");
    let bytes = export(&session);

    let n = page_count(&bytes);
    assert!(n >= 2, "45 items should not fit one page, got {n}");

    let texts = page_texts(&bytes);
    for (idx, page) in texts.iter().enumerate() {
        let label = format!("Page {} of {n}", idx + 1);
        assert_eq!(page.iter().filter(|t| **t == label).count(), 1, "page {}", idx + 1);
        assert_eq!(page.iter().filter(|t| *t == FOOTER).count(), 1, "page {}", idx + 1);
        assert_eq!(operator_count(&bytes, idx as u32 + 1, "Do"), 1, "page {}", idx + 1);
    }

    // Each item name is drawn exactly once in the whole document, in order.
    let names: Vec<&String> = texts
        .iter()
        .flatten()
        .filter(|t| t.starts_with("Item name: "))
        .collect();
    let expected: Vec<String> = (1..=45).map(|i| format!("Item name: Item {i}")).collect();
    assert_eq!(names, expected.iter().collect::<Vec<_>>());
}

#[test]
fn totals_and_caption_are_printed() {
    let rec = quotation_pdf::read_record_file(&fixture("quotation.json")).expect("fixture");
    let session = DocumentSession::from_record(rec).expect("session");
    let bytes = export(&session);

    let all: Vec<String> = page_texts(&bytes).into_iter().flatten().collect();
    for expected in ["360.51", "18.03", "378.53", "VAT 5%", "TOTAL"] {
        assert!(all.iter().any(|t| t == expected), "missing {expected:?}");
    }
    let caption = all.join(" ");
    assert!(caption.contains("Three Hundred Seventy Eight"));
    assert!(caption.contains("Fils Fifty Three Only"));
}

#[test]
fn empty_record_exports_nothing() {
    let session = DocumentSession::from_record(record(Vec::new())).expect("session");
    let outcome = session
        .export(&brand(), &ExportOptions::default())
        .expect("empty export is not an error");
    assert!(matches!(outcome, ExportOutcome::Empty));
}

#[test]
fn undecodable_logo_is_an_asset_error() {
    let session = DocumentSession::from_record(record(numbered_items(3))).expect("session");
    let broken = BrandAssets::new(b"not an image".to_vec(), FOOTER);

    let err = session
        .export(&broken, &ExportOptions::default())
        .unwrap_err();
    assert!(matches!(err, Error::Export(ExportError::AssetUnavailable(_))));
}

#[test]
fn missing_logo_file_is_an_asset_error() {
    let err = BrandAssets::shared(&fixture("no-such-logo.png"), FOOTER).unwrap_err();
    assert!(matches!(err, Error::Export(ExportError::AssetUnavailable(_))));
}

#[test]
fn undecorated_pages_are_refused() {
    let options = ExportOptions::default();
    let session = DocumentSession::from_record(record(numbered_items(3))).expect("session");
    let doc = session.render(&options);
    let pages = paginate(doc, &options.page, &quotation_pdf::TextMeasure::new(&options.page));

    let err = serialize(&pages, &brand(), &options, "Quotation").unwrap_err();
    assert!(matches!(err, Error::Export(ExportError::Serialization(_))));
}

#[test]
fn serialized_pages_use_a4_media_box() {
    let options = ExportOptions::default();
    let session = DocumentSession::from_record(record(numbered_items(3))).expect("session");
    let mut pages = paginate(
        session.render(&options),
        &options.page,
        &quotation_pdf::TextMeasure::new(&options.page),
    );
    decorate(&mut pages, &options.page, &brand(), &OverlayStyle::default()).expect("decorate");
    let file = serialize(&pages, &brand(), &options, "Quotation Q-1").expect("serialize");

    let doc = common::load_pdf(&file.bytes);
    let spec = PageSpec::a4_portrait();
    for (_, page_id) in doc.get_pages() {
        let page = doc.get_dictionary(page_id).expect("page dict");
        let media_box = page
            .get(b"MediaBox")
            .and_then(|o| o.as_array())
            .expect("media box");
        let dims: Vec<f32> = media_box
            .iter()
            .map(|o| o.as_float().expect("number"))
            .collect();
        assert_eq!(dims[0], 0.0);
        assert!((dims[2] - spec.page_width_pts()).abs() < 0.01);
        assert!((dims[3] - spec.page_height_pts()).abs() < 0.01);
    }
}

#[test]
fn record_file_is_written_atomically() {
    let dir = common::scratch_dir("record_file_is_written_atomically");
    let out = dir.join("out.pdf");

    let written = export_record_file(
        &fixture("quotation.json"),
        &out,
        &brand(),
        &ExportOptions::default(),
    )
    .expect("export");
    assert!(written);
    assert!(out.exists());
    assert!(!dir.join("out.pdf.part").exists());
    assert!(page_count(&std::fs::read(&out).expect("read output")) >= 1);

    let empty_out = dir.join("empty.pdf");
    let written = export_record_file(
        &fixture("empty_quotation.json"),
        &empty_out,
        &brand(),
        &ExportOptions::default(),
    )
    .expect("empty export");
    assert!(!written);
    assert!(!empty_out.exists());
}
