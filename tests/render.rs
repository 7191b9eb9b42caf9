mod common;

use pretty_assertions::assert_eq;

use common::{dec, item, numbered_items, record};
use quotation_pdf::{
    Alignment, BackOrderEntry, Block, CellLine, ComponentGroup, Font, LetterConfig, MaterialRef,
    PageSpec, RowKind, TextMeasure, compute_totals, item_row, layout_block, render_body, wrap_text,
};

fn texts(lines: &[CellLine]) -> Vec<String> {
    lines
        .iter()
        .map(|l| match l {
            CellLine::Text { text, .. } => text.clone(),
            CellLine::Bullet(text) => format!("* {text}"),
            CellLine::Rule => "---".into(),
            CellLine::Blank => String::new(),
        })
        .collect()
}

#[test]
fn body_sections_come_in_fixed_order() {
    let rec = record(numbered_items(3));
    let doc = render_body(&rec, &compute_totals(&rec.items), &LetterConfig::default());

    let Block::Paragraph(title) = &doc.blocks[0] else {
        panic!("title first");
    };
    assert_eq!(title.text, "QUOTATION FOR CHAIRS OFFICE AT HVO-7");
    assert_eq!(title.alignment, Alignment::Center);

    let kinds: Vec<RowKind> = doc
        .blocks
        .iter()
        .filter_map(|b| match b {
            Block::Row(row) => Some(row.kind),
            _ => None,
        })
        .collect();
    let first_item = kinds.iter().position(|k| *k == RowKind::Item).expect("items");
    let first_total = kinds.iter().position(|k| *k == RowKind::Total).expect("totals");
    assert_eq!(first_total, first_item + 3);
    assert_eq!(kinds.iter().filter(|k| **k == RowKind::Total).count(), 3);
    assert_eq!(kinds[first_item - 1], RowKind::Header);
    assert_eq!(doc.item_rows().count(), 3);

    let exclusions = doc
        .blocks
        .iter()
        .position(|b| matches!(b, Block::Paragraph(p) if p.text.starts_with("EXCLUSIONS:")))
        .expect("exclusions paragraph");
    let last_total = doc
        .blocks
        .iter()
        .rposition(|b| matches!(b, Block::Row(r) if r.kind == RowKind::Total))
        .expect("total rows");
    assert!(exclusions > last_total);
}

#[test]
fn item_row_carries_nested_content() {
    let mut it = item("a1", "Executive Chair", "1250.5");
    it.components = vec![ComponentGroup {
        unit_label: "Seat".into(),
        materials: vec![
            MaterialRef { material_label: "Mesh".into() },
            MaterialRef { material_label: "Foam".into() },
        ],
    }];
    it.back_order = vec![BackOrderEntry {
        material_name: "Castors".into(),
        quantity: "5".into(),
        materials: vec![MaterialRef { material_label: "PU 60mm".into() }],
    }];

    let Block::Row(row) = item_row(4, &it) else {
        panic!("item row is a table row");
    };
    assert_eq!(row.kind, RowKind::Item);
    assert_eq!(row.cells.len(), 6);
    assert_eq!(texts(&row.cells[0].lines), vec!["4"]);
    assert_eq!(
        texts(&row.cells[1].lines),
        vec![
            "Item name: Executive Chair",
            "Materials used for : Seat",
            "* Mesh",
            "* Foam",
            "---",
            "B/O:",
            "Castors - 5",
            "* PU 60mm",
        ]
    );
    assert_eq!(texts(&row.cells[5].lines), vec!["1250.50"]);
}

#[test]
fn absent_quantity_unit_and_rate_render_blank() {
    let Block::Row(row) = item_row(1, &item("a", "Chair", "10")) else {
        panic!("table row");
    };
    for cell in &row.cells[2..5] {
        assert_eq!(texts(&cell.lines), vec![""]);
    }

    let mut priced = item("b", "Desk", "300");
    priced.quantity = Some(dec("3"));
    priced.unit = Some("Nos".into());
    priced.rate = Some(dec("100"));
    let Block::Row(row) = item_row(2, &priced) else {
        panic!("table row");
    };
    let shown: Vec<Vec<String>> = row.cells[2..5].iter().map(|c| texts(&c.lines)).collect();
    assert_eq!(shown, vec![vec!["3"], vec!["Nos"], vec!["100.00"]]);
}

#[test]
fn wrapping_respects_width() {
    let text = "We believe the above quotation covers all important aspects concerning the products";
    let lines = wrap_text(text, Font::Regular, 10.0, 120.0);
    assert!(lines.len() > 1);
    for line in &lines {
        assert!(Font::Regular.text_width(line, 10.0) <= 120.0 + 1e-3);
    }
    assert_eq!(lines.join(" "), text);
}

#[test]
fn taller_items_measure_taller() {
    let spec = PageSpec::a4_portrait();
    let measure = TextMeasure::new(&spec);
    let plain = item_row(1, &item("a", "Chair", "10"));

    let mut rich = item("b", "Chair", "10");
    rich.components = vec![ComponentGroup {
        unit_label: "Frame".into(),
        materials: (0..6)
            .map(|i| MaterialRef { material_label: format!("Part {i}") })
            .collect(),
    }];
    let rich = item_row(2, &rich);

    let plain_h = layout_block(&plain, measure.content_width()).height;
    let rich_h = layout_block(&rich, measure.content_width()).height;
    assert!(rich_h > plain_h);
}
