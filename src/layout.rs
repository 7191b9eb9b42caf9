//! Block geometry. The same layout feeds the paginator (via [`TextMeasure`])
//! and the PDF drawer, so measured and drawn heights cannot disagree.

use crate::body::{Alignment, Block, CellLine, Paragraph, RowKind, TABLE_SIZE, TableRow};
use crate::fonts::{ASCENDER_RATIO, Font, LINE_HEIGHT_RATIO};
use crate::paginate::{Measure, PageSpec};

pub const CELL_PADDING: f32 = 4.0;
pub const BULLET_INDENT: f32 = 10.0;
const RULE_GAP: f32 = 6.0;
const BULLET: &str = "\u{2022}";

/// A positioned line of text. Coordinates are relative to the block's
/// top-left corner with y growing downwards.
#[derive(Clone, Debug, PartialEq)]
pub struct TextLine {
    pub text: String,
    pub font: Font,
    pub font_size: f32,
    pub x: f32,
    pub baseline: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RuleLine {
    pub x1: f32,
    pub x2: f32,
    pub y: f32,
}

/// Bordered cell rectangle spanning the full row height.
#[derive(Clone, Debug, PartialEq)]
pub struct CellFrame {
    pub x: f32,
    pub width: f32,
    pub shaded: bool,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct BlockLayout {
    pub height: f32,
    pub lines: Vec<TextLine>,
    pub rules: Vec<RuleLine>,
    pub frames: Vec<CellFrame>,
}

pub fn line_height(font_size: f32) -> f32 {
    font_size * LINE_HEIGHT_RATIO
}

/// Greedy word wrap. Words wider than `max_width` are broken between characters.
pub fn wrap_text(text: &str, font: Font, font_size: f32, max_width: f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_w = 0.0f32;
    let space_w = font.space_width(font_size);

    for word in text.split_whitespace() {
        let word_w = font.text_width(word, font_size);

        if !current.is_empty() && current_w + space_w + word_w <= max_width {
            current.push(' ');
            current.push_str(word);
            current_w += space_w + word_w;
            continue;
        }

        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }

        if word_w <= max_width {
            current.push_str(word);
            current_w = word_w;
            continue;
        }

        // Overlong word: hard-break by characters.
        current_w = 0.0;
        for ch in word.chars() {
            let ch_w = font.char_width_1000(ch) * font_size / 1000.0;
            if !current.is_empty() && current_w + ch_w > max_width {
                lines.push(std::mem::take(&mut current));
                current_w = 0.0;
            }
            current.push(ch);
            current_w += ch_w;
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

fn aligned_x(alignment: Alignment, x: f32, available: f32, text_w: f32) -> f32 {
    match alignment {
        Alignment::Left => x,
        Alignment::Center => x + ((available - text_w) / 2.0).max(0.0),
        Alignment::Right => x + (available - text_w).max(0.0),
    }
}

pub fn layout_block(block: &Block, width: f32) -> BlockLayout {
    match block {
        Block::Paragraph(para) => layout_paragraph(para, width),
        Block::Row(row) => layout_row(row, width),
        Block::Spacer(h) => BlockLayout {
            height: h.max(0.0),
            ..BlockLayout::default()
        },
    }
}

fn layout_paragraph(para: &Paragraph, width: f32) -> BlockLayout {
    let font = Font::from_bold(para.bold);
    let lh = line_height(para.font_size);
    let mut layout = BlockLayout::default();
    let mut y = 0.0f32;

    for text in wrap_text(&para.text, font, para.font_size, width) {
        let text_w = font.text_width(&text, para.font_size);
        layout.lines.push(TextLine {
            x: aligned_x(para.alignment, 0.0, width, text_w),
            baseline: y + para.font_size * ASCENDER_RATIO,
            text,
            font,
            font_size: para.font_size,
        });
        y += lh;
    }

    layout.height = y + para.space_after;
    layout
}

/// Left edges of each grid column plus the right edge of the last one.
fn column_edges(columns: &[f32], width: f32) -> Vec<f32> {
    let total: f32 = columns.iter().sum();
    let scale = if total > 0.0 { width / total } else { 0.0 };
    let mut edges = Vec::with_capacity(columns.len() + 1);
    let mut x = 0.0f32;
    edges.push(x);
    for frac in columns {
        x += frac * scale;
        edges.push(x);
    }
    edges
}

fn layout_row(row: &TableRow, width: f32) -> BlockLayout {
    let edges = column_edges(&row.columns, width);
    let ncols = row.columns.len();
    let size = TABLE_SIZE;
    let lh = line_height(size);

    let mut layout = BlockLayout::default();
    let mut row_h = row.min_height.max(2.0 * CELL_PADDING);
    let mut grid_col = 0usize;

    for cell in &row.cells {
        if grid_col >= ncols {
            log::warn!("Table cell beyond the last of {ncols} grid columns dropped");
            break;
        }
        let end_col = (grid_col + cell.span.max(1)).min(ncols);
        let cell_x = edges[grid_col];
        let cell_w = edges[end_col] - cell_x;
        grid_col = end_col;

        layout.frames.push(CellFrame {
            x: cell_x,
            width: cell_w,
            shaded: row.kind == RowKind::Header,
        });

        let inner_x = cell_x + CELL_PADDING;
        let inner_w = (cell_w - 2.0 * CELL_PADDING).max(1.0);
        let mut y = CELL_PADDING;

        for line in &cell.lines {
            match line {
                CellLine::Text { text, bold } => {
                    let font = Font::from_bold(*bold);
                    for wrapped in wrap_text(text, font, size, inner_w) {
                        let text_w = font.text_width(&wrapped, size);
                        layout.lines.push(TextLine {
                            x: aligned_x(cell.alignment, inner_x, inner_w, text_w),
                            baseline: y + size * ASCENDER_RATIO,
                            text: wrapped,
                            font,
                            font_size: size,
                        });
                        y += lh;
                    }
                }
                CellLine::Bullet(text) => {
                    let wrapped = wrap_text(text, Font::Regular, size, inner_w - BULLET_INDENT);
                    for (i, part) in wrapped.into_iter().enumerate() {
                        let baseline = y + size * ASCENDER_RATIO;
                        if i == 0 {
                            layout.lines.push(TextLine {
                                text: BULLET.to_string(),
                                font: Font::Regular,
                                font_size: size,
                                x: inner_x + 2.0,
                                baseline,
                            });
                        }
                        layout.lines.push(TextLine {
                            text: part,
                            font: Font::Regular,
                            font_size: size,
                            x: inner_x + BULLET_INDENT,
                            baseline,
                        });
                        y += lh;
                    }
                }
                CellLine::Rule => {
                    layout.rules.push(RuleLine {
                        x1: inner_x,
                        x2: inner_x + inner_w,
                        y: y + RULE_GAP / 2.0,
                    });
                    y += RULE_GAP;
                }
                CellLine::Blank => y += lh,
            }
        }

        row_h = row_h.max(y + CELL_PADDING);
    }

    layout.height = row_h;
    layout
}

/// Production [`Measure`]: lays blocks out with Helvetica metrics at the
/// content width of a page.
#[derive(Clone, Copy, Debug)]
pub struct TextMeasure {
    content_width: f32,
}

impl TextMeasure {
    pub fn new(spec: &PageSpec) -> Self {
        Self {
            content_width: spec.content_width_pts(),
        }
    }

    pub fn content_width(&self) -> f32 {
        self.content_width
    }
}

impl Measure for TextMeasure {
    fn measure(&self, block: &Block) -> f32 {
        layout_block(block, self.content_width).height
    }
}
