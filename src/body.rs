//! Content renderer: turns a quotation into one continuous, page-agnostic
//! sequence of blocks. Heights are decided later by a [`crate::paginate::Measure`].

use crate::config::LetterConfig;
use crate::model::{FinancialTotals, LineItem, QuotationRecord};
use crate::totals::format_amount;
use crate::words::amount_in_words;

pub const TITLE_SIZE: f32 = 13.0;
pub const HEADING_SIZE: f32 = 11.0;
pub const BODY_SIZE: f32 = 10.0;
pub const TABLE_SIZE: f32 = 9.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Paragraph {
    pub text: String,
    pub font_size: f32,
    pub bold: bool,
    pub alignment: Alignment,
    pub space_after: f32,
}

impl Paragraph {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            font_size: BODY_SIZE,
            bold: false,
            alignment: Alignment::Left,
            space_after: 6.0,
        }
    }

    pub fn heading(text: impl Into<String>) -> Self {
        Self {
            font_size: HEADING_SIZE,
            bold: true,
            ..Self::new(text)
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum CellLine {
    Text { text: String, bold: bool },
    Bullet(String),
    /// Horizontal separator across the cell.
    Rule,
    /// Empty line of one text height.
    Blank,
}

impl CellLine {
    pub fn text(text: impl Into<String>) -> Self {
        CellLine::Text { text: text.into(), bold: false }
    }

    pub fn bold(text: impl Into<String>) -> Self {
        CellLine::Text { text: text.into(), bold: true }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TableCell {
    /// Number of grid columns covered.
    pub span: usize,
    pub lines: Vec<CellLine>,
    pub alignment: Alignment,
}

impl TableCell {
    pub fn new(lines: Vec<CellLine>) -> Self {
        Self { span: 1, lines, alignment: Alignment::Left }
    }

    pub fn single(line: CellLine) -> Self {
        Self::new(vec![line])
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn span(mut self, span: usize) -> Self {
        self.span = span.max(1);
        self
    }

    pub fn align(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RowKind {
    /// Shaded column-header row.
    Header,
    Body,
    /// One quotation line item; its whole nested content stays on one page.
    Item,
    Total,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TableRow {
    /// Grid column widths as fractions of the content width.
    pub columns: Vec<f32>,
    pub cells: Vec<TableCell>,
    pub kind: RowKind,
    pub min_height: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Block {
    Paragraph(Paragraph),
    Row(TableRow),
    Spacer(f32),
}

/// The logically infinite-height rendering of a quotation, before page slicing.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ContinuousDocument {
    pub blocks: Vec<Block>,
}

impl ContinuousDocument {
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Iterator over the item rows, in record order.
    pub fn item_rows(&self) -> impl Iterator<Item = &TableRow> {
        self.blocks.iter().filter_map(|b| match b {
            Block::Row(row) if row.kind == RowKind::Item => Some(row),
            _ => None,
        })
    }
}

const ITEM_COLUMNS: [f32; 6] = [0.07, 0.53, 0.08, 0.08, 0.10, 0.14];
const DETAIL_COLUMNS: [f32; 2] = [0.3, 0.7];
const SIGNOFF_COLUMNS: [f32; 3] = [1.0 / 3.0, 1.0 / 3.0, 1.0 / 3.0];

fn row(columns: &[f32], kind: RowKind, cells: Vec<TableCell>) -> Block {
    Block::Row(TableRow {
        columns: columns.to_vec(),
        cells,
        kind,
        min_height: 0.0,
    })
}

fn bold_cell(text: impl Into<String>) -> TableCell {
    TableCell::single(CellLine::bold(text))
}

fn text_cell(text: impl Into<String>) -> TableCell {
    TableCell::single(CellLine::text(text))
}

/// Render the quotation body in its fixed order: title, client details,
/// subject, item table, totals, exclusions, terms, sign-off.
pub fn render_body(
    record: &QuotationRecord,
    totals: &FinancialTotals,
    letter: &LetterConfig,
) -> ContinuousDocument {
    let mut blocks = Vec::new();

    blocks.push(Block::Paragraph(Paragraph {
        font_size: TITLE_SIZE,
        alignment: Alignment::Center,
        space_after: 10.0,
        ..Paragraph::heading(format!("{} {}", letter.title, record.client_code))
    }));

    client_details(record, &mut blocks);
    subject(record, letter, &mut blocks);
    item_table(&record.items, &mut blocks);
    totals_rows(totals, &mut blocks);

    blocks.push(Block::Spacer(8.0));
    blocks.push(Block::Paragraph(Paragraph::heading(format!(
        "EXCLUSIONS: {}",
        letter.exclusions
    ))));

    terms(letter, &mut blocks);
    sign_off(letter, &mut blocks);

    ContinuousDocument { blocks }
}

fn client_details(record: &QuotationRecord, blocks: &mut Vec<Block>) {
    blocks.push(row(
        &DETAIL_COLUMNS,
        RowKind::Header,
        vec![bold_cell("CLIENT DETAILS:").span(2)],
    ));
    for (label, value) in [
        ("CLIENT NAME :", &record.client_name),
        ("CLIENT CODE :", &record.client_code),
        ("QUOTATION NO :", &record.quotation_number),
    ] {
        blocks.push(row(
            &DETAIL_COLUMNS,
            RowKind::Body,
            vec![text_cell(label), text_cell(value.as_str())],
        ));
    }
    blocks.push(Block::Spacer(10.0));
}

fn subject(record: &QuotationRecord, letter: &LetterConfig, blocks: &mut Vec<Block>) {
    blocks.push(Block::Paragraph(Paragraph {
        space_after: 2.0,
        ..Paragraph::heading("Subject:")
    }));
    blocks.push(Block::Paragraph(Paragraph::new(format!(
        "Quotation for supply and installation of {} at {}.",
        letter.product_line, record.client_code
    ))));
    blocks.push(Block::Paragraph(Paragraph {
        space_after: 10.0,
        ..Paragraph::new(format!(
            "We thank you for giving us an opportunity to quote for supply and installation of {} at {}. \
             Based on their discussions, please find below our best possible offer for the same.",
            letter.product_line, record.client_code
        ))
    }));
}

fn item_table(items: &[LineItem], blocks: &mut Vec<Block>) {
    blocks.push(row(
        &ITEM_COLUMNS,
        RowKind::Header,
        ["SL NO", "DESCRIPTION", "QTY", "UNIT", "RATE", "AMOUNT (In AED)"]
            .into_iter()
            .map(bold_cell)
            .collect(),
    ));
    for (idx, item) in items.iter().enumerate() {
        blocks.push(item_row(idx + 1, item));
    }
}

/// One atomic table row holding an item's full nested content.
pub fn item_row(serial: usize, item: &LineItem) -> Block {
    let mut description = vec![CellLine::bold(format!("Item name: {}", item.name))];

    for group in &item.components {
        description.push(CellLine::Text {
            text: format!("Materials used for : {}", group.unit_label),
            bold: false,
        });
        description.extend(
            group
                .materials
                .iter()
                .map(|m| CellLine::Bullet(m.material_label.clone())),
        );
    }

    description.push(CellLine::Rule);
    description.push(CellLine::bold("B/O:"));
    for entry in &item.back_order {
        description.push(CellLine::text(format!(
            "{} - {}",
            entry.material_name, entry.quantity
        )));
        description.extend(
            entry
                .materials
                .iter()
                .map(|m| CellLine::Bullet(m.material_label.clone())),
        );
    }

    let quantity = item.quantity.map(|q| q.normalize().to_string()).unwrap_or_default();
    let unit = item.unit.clone().unwrap_or_default();
    let rate = item.rate.map(format_amount).unwrap_or_default();

    row(
        &ITEM_COLUMNS,
        RowKind::Item,
        vec![
            text_cell(serial.to_string()).align(Alignment::Center),
            TableCell::new(description),
            text_cell(quantity).align(Alignment::Center),
            text_cell(unit).align(Alignment::Center),
            text_cell(rate).align(Alignment::Right),
            text_cell(format_amount(item.total_amount)).align(Alignment::Right),
        ],
    )
}

fn totals_rows(totals: &FinancialTotals, blocks: &mut Vec<Block>) {
    blocks.push(row(
        &ITEM_COLUMNS,
        RowKind::Total,
        vec![
            TableCell::empty().span(4),
            bold_cell("TOTAL"),
            bold_cell(format_amount(totals.subtotal)).align(Alignment::Right),
        ],
    ));
    blocks.push(row(
        &ITEM_COLUMNS,
        RowKind::Total,
        vec![
            TableCell::empty().span(4),
            bold_cell("VAT 5%"),
            bold_cell(format_amount(totals.tax_amount)).align(Alignment::Right),
        ],
    ));
    blocks.push(row(
        &ITEM_COLUMNS,
        RowKind::Total,
        vec![
            bold_cell(amount_in_words(totals.grand_total)).span(5),
            bold_cell(format_amount(totals.grand_total)).align(Alignment::Right),
        ],
    ));
}

fn terms(letter: &LetterConfig, blocks: &mut Vec<Block>) {
    blocks.push(Block::Spacer(6.0));
    blocks.push(Block::Paragraph(Paragraph::heading("TERMS AND CONDITIONS")));
    for (label, text) in [
        ("1. Contract", &letter.contract_terms),
        ("2. Payment terms", &letter.payment_terms),
        ("3. Delivery & Completion", &letter.delivery_terms),
        ("Validity", &letter.validity),
    ] {
        blocks.push(row(
            &DETAIL_COLUMNS,
            RowKind::Body,
            vec![text_cell(label), text_cell(text.as_str())],
        ));
    }

    let mut closing = vec![CellLine::text(letter.closing.as_str()), CellLine::Blank];
    for line in [
        "Yours faithfully".to_string(),
        letter.signatory.clone(),
        letter.company.clone(),
        format!("Email: {}", letter.email),
        format!("Mobile: {}", letter.mobile),
    ] {
        closing.push(CellLine::text(line));
        closing.push(CellLine::Blank);
    }
    blocks.push(row(
        &DETAIL_COLUMNS,
        RowKind::Body,
        vec![TableCell::new(closing).span(2)],
    ));
}

fn sign_off(letter: &LetterConfig, blocks: &mut Vec<Block>) {
    blocks.push(row(
        &SIGNOFF_COLUMNS,
        RowKind::Header,
        letter
            .approvals
            .iter()
            .map(|name| bold_cell(name.as_str()))
            .collect(),
    ));
    blocks.push(Block::Row(TableRow {
        columns: SIGNOFF_COLUMNS.to_vec(),
        cells: vec![TableCell::empty(), TableCell::empty(), TableCell::empty()],
        kind: RowKind::Body,
        min_height: 40.0,
    }));
}
