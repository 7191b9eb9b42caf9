use pdf_writer::{Content, Name, Str};

use crate::fonts::{Font, to_winansi_bytes};
use crate::layout::{BlockLayout, TextLine};
use crate::overlay::Overlay;

const BORDER_WIDTH: f32 = 0.5;
const HEADER_SHADE: f32 = 0.9;

/// Show positioned lines in one text object. `origin` is the PDF-space point
/// of the layout's top-left corner; layout y grows downwards.
fn show_lines(content: &mut Content, lines: &[TextLine], origin: (f32, f32)) {
    if lines.is_empty() {
        return;
    }
    content.begin_text();
    let mut td = (0.0f32, 0.0f32);
    let mut cur_font: Option<(Font, f32)> = None;

    for line in lines {
        if cur_font != Some((line.font, line.font_size)) {
            content.set_font(Name(line.font.pdf_name().as_bytes()), line.font_size);
            cur_font = Some((line.font, line.font_size));
        }
        let x = origin.0 + line.x;
        let y = origin.1 - line.baseline;
        content.next_line(x - td.0, y - td.1);
        td = (x, y);
        content.show(Str(&to_winansi_bytes(&line.text)));
    }

    content.end_text();
}

/// Draw one laid-out body block whose top-left corner sits at `origin`.
pub(super) fn draw_block(content: &mut Content, layout: &BlockLayout, origin: (f32, f32)) {
    let (left, top) = origin;
    let bottom = top - layout.height;

    for frame in layout.frames.iter().filter(|f| f.shaded) {
        content.save_state();
        content.set_fill_gray(HEADER_SHADE);
        content.rect(left + frame.x, bottom, frame.width, layout.height);
        content.fill_nonzero();
        content.restore_state();
    }

    if !layout.frames.is_empty() || !layout.rules.is_empty() {
        content.save_state();
        content.set_line_width(BORDER_WIDTH);
        for frame in &layout.frames {
            content.rect(left + frame.x, bottom, frame.width, layout.height);
        }
        for rule in &layout.rules {
            content.move_to(left + rule.x1, top - rule.y);
            content.line_to(left + rule.x2, top - rule.y);
        }
        content.stroke();
        content.restore_state();
    }

    show_lines(content, &layout.lines, origin);
}

/// Stamp the header logo and the footer line. Only margin-band coordinates
/// are touched; body content drawn earlier is left as is.
pub(super) fn draw_overlay(
    content: &mut Content,
    overlay: &Overlay,
    page_height: f32,
    logo_name: &str,
) {
    let header = &overlay.header;
    content.save_state();
    content.transform([
        header.width,
        0.0,
        0.0,
        header.height,
        header.x,
        page_height - header.top - header.height,
    ]);
    content.x_object(Name(logo_name.as_bytes()));
    content.restore_state();

    let footer = &overlay.footer;
    let lines = [
        TextLine {
            text: footer.text.clone(),
            font: Font::Regular,
            font_size: footer.font_size,
            x: footer.text_x,
            baseline: 0.0,
        },
        TextLine {
            text: footer.page_label.clone(),
            font: Font::Regular,
            font_size: footer.font_size,
            x: footer.page_label_x,
            baseline: 0.0,
        },
    ];
    show_lines(content, &lines, (0.0, footer.baseline));
}
