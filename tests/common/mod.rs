#![allow(dead_code)]

use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use lopdf::content::Content;
use lopdf::{Document, Object};
use rust_decimal::Decimal;

use quotation_pdf::{BrandAssets, LineItem, QuotationRecord};

pub const FOOTER: &str = "Mead Interior Design LLC";

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

/// Scratch directory under target/, unique per test.
pub fn scratch_dir(test: &str) -> PathBuf {
    let dir = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("target/test-output")
        .join(test);
    std::fs::remove_dir_all(&dir).ok();
    std::fs::create_dir_all(&dir).expect("create scratch dir");
    dir
}

pub fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).expect("decimal literal")
}

/// A small semi-transparent PNG standing in for the company logo.
pub fn logo_png() -> Vec<u8> {
    let img = RgbaImage::from_fn(48, 12, |x, _| {
        if x % 2 == 0 {
            Rgba([180, 20, 40, 255])
        } else {
            Rgba([0, 0, 0, 64])
        }
    });
    let mut buf = Cursor::new(Vec::new());
    DynamicImage::ImageRgba8(img)
        .write_to(&mut buf, ImageFormat::Png)
        .expect("encode logo png");
    buf.into_inner()
}

pub fn brand() -> BrandAssets {
    BrandAssets::new(logo_png(), FOOTER)
}

pub fn item(id: &str, name: &str, amount: &str) -> LineItem {
    LineItem {
        id: id.to_string(),
        name: name.to_string(),
        total_amount: dec(amount),
        ..LineItem::default()
    }
}

pub fn record(items: Vec<LineItem>) -> QuotationRecord {
    QuotationRecord {
        quotation_number: "Q-2024-118".into(),
        client_name: "Harbour View Offices".into(),
        client_code: "HVO-7".into(),
        items,
    }
}

/// `n` plain items named "Item 1".."Item n", 100.00 each.
pub fn numbered_items(n: usize) -> Vec<LineItem> {
    (1..=n)
        .map(|i| item(&format!("it{i}"), &format!("Item {i}"), "100.00"))
        .collect()
}

pub fn load_pdf(bytes: &[u8]) -> Document {
    Document::load_mem(bytes).expect("output parses as PDF")
}

pub fn page_count(bytes: &[u8]) -> usize {
    load_pdf(bytes).get_pages().len()
}

fn page_operations(doc: &Document, page_no: u32) -> Vec<lopdf::content::Operation> {
    let pages = doc.get_pages();
    let page_id = pages[&page_no];
    let data = doc.get_page_content(page_id).expect("page content");
    Content::decode(&data).expect("decode content").operations
}

/// Every string shown with `Tj`, page by page, in drawing order.
pub fn page_texts(bytes: &[u8]) -> Vec<Vec<String>> {
    let doc = load_pdf(bytes);
    let n = doc.get_pages().len() as u32;
    (1..=n)
        .map(|page_no| {
            page_operations(&doc, page_no)
                .into_iter()
                .filter(|op| op.operator == "Tj")
                .filter_map(|op| match op.operands.first() {
                    Some(Object::String(raw, _)) => Some(String::from_utf8_lossy(raw).into_owned()),
                    _ => None,
                })
                .collect()
        })
        .collect()
}

/// Number of times `operator` occurs on a 1-based page.
pub fn operator_count(bytes: &[u8], page_no: u32, operator: &str) -> usize {
    let doc = load_pdf(bytes);
    page_operations(&doc, page_no)
        .iter()
        .filter(|op| op.operator == operator)
        .count()
}
