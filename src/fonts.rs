use pdf_writer::{Name, Pdf, Ref};

/// Line height as a multiple of the font size.
pub const LINE_HEIGHT_RATIO: f32 = 1.2;

/// Ascender as a fraction of the font size; places the first baseline.
pub const ASCENDER_RATIO: f32 = 0.75;

/// The two standard faces the quotation layout uses. Both are PDF base-14
/// fonts, so nothing is embedded and metrics come from the tables below.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Font {
    Regular,
    Bold,
}

impl Font {
    pub fn from_bold(bold: bool) -> Self {
        if bold { Font::Bold } else { Font::Regular }
    }

    /// Resource name used in page content streams.
    pub fn pdf_name(self) -> &'static str {
        match self {
            Font::Regular => "F1",
            Font::Bold => "F2",
        }
    }

    fn base_font(self) -> &'static [u8] {
        match self {
            Font::Regular => b"Helvetica",
            Font::Bold => b"Helvetica-Bold",
        }
    }

    /// Width of a single character in 1000-units.
    pub fn char_width_1000(self, ch: char) -> f32 {
        let byte = char_to_winansi(ch);
        let byte = if byte >= 32 { byte } else { b'?' };
        match self {
            Font::Regular => helvetica_width(byte),
            Font::Bold => helvetica_bold_width(byte),
        }
    }

    pub fn text_width(self, text: &str, font_size: f32) -> f32 {
        text.chars()
            .map(|ch| self.char_width_1000(ch) * font_size / 1000.0)
            .sum()
    }

    pub fn space_width(self, font_size: f32) -> f32 {
        self.char_width_1000(' ') * font_size / 1000.0
    }
}

/// Write both font dictionaries; returns (resource name, ref) pairs for page resources.
pub(crate) fn register_fonts(
    pdf: &mut Pdf,
    alloc: &mut impl FnMut() -> Ref,
) -> Vec<(&'static str, Ref)> {
    [Font::Regular, Font::Bold]
        .into_iter()
        .map(|font| {
            let font_ref = alloc();
            pdf.type1_font(font_ref)
                .base_font(Name(font.base_font()))
                .encoding_predefined(Name(b"WinAnsiEncoding"));
            (font.pdf_name(), font_ref)
        })
        .collect()
}

/// Map a single Unicode char to its WinAnsi byte, or 0 if unmappable.
fn char_to_winansi(c: char) -> u8 {
    match c as u32 {
        0x0020..=0x007F => c as u8,
        0x00A0..=0x00FF => c as u8,
        0x20AC => 0x80,
        0x201A => 0x82,
        0x0192 => 0x83,
        0x201E => 0x84,
        0x2026 => 0x85,
        0x2020 => 0x86,
        0x2021 => 0x87,
        0x02C6 => 0x88,
        0x2030 => 0x89,
        0x0160 => 0x8A,
        0x2039 => 0x8B,
        0x0152 => 0x8C,
        0x017D => 0x8E,
        0x2018 => 0x91,
        0x2019 => 0x92,
        0x201C => 0x93,
        0x201D => 0x94,
        0x2022 => 0x95, // bullet
        0x2013 => 0x96,
        0x2014 => 0x97,
        0x02DC => 0x98,
        0x2122 => 0x99,
        0x0161 => 0x9A,
        0x203A => 0x9B,
        0x0153 => 0x9C,
        0x017E => 0x9E,
        0x0178 => 0x9F,
        _ => 0,
    }
}

/// Convert a UTF-8 string to WinAnsi (Windows-1252) bytes for PDF Str encoding.
/// Characters outside the code page are replaced with '?'.
pub(crate) fn to_winansi_bytes(s: &str) -> Vec<u8> {
    s.chars()
        .map(|c| match char_to_winansi(c) {
            0 if c != '\0' => {
                log::warn!("Character {c:?} (U+{:04X}) has no WinAnsi mapping", c as u32);
                b'?'
            }
            byte => byte,
        })
        .collect()
}

/// Approximate Helvetica widths at 1000 units/em.
fn helvetica_width(b: u8) -> f32 {
    match b {
        32 => 278.0,                          // space
        33..=47 => 333.0,                     // punctuation
        48..=57 => 556.0,                     // digits
        58..=64 => 333.0,                     // more punctuation
        73 | 74 => 278.0,                     // I J (narrow uppercase)
        77 => 833.0,                          // M (wide)
        87 => 944.0,                          // W
        65..=90 => 667.0,                     // uppercase A-Z (average)
        91..=96 => 333.0,                     // brackets etc.
        102 | 105 | 106 | 108 | 116 => 278.0, // narrow lowercase: f i j l t
        109 | 119 => 833.0,                   // m w (wide)
        97..=122 => 556.0,                    // lowercase a-z (average)
        0x95 => 350.0,                        // bullet
        _ => 556.0,
    }
}

/// Approximate Helvetica-Bold widths at 1000 units/em.
fn helvetica_bold_width(b: u8) -> f32 {
    match b {
        32 => 278.0,
        33..=47 => 333.0,
        48..=57 => 556.0,
        58..=64 => 333.0,
        73 => 278.0,
        74 => 556.0,
        77 => 833.0,
        87 => 944.0,
        65..=90 => 722.0,
        91..=96 => 333.0,
        102 | 105 | 106 | 108 | 116 => 333.0,
        109 => 889.0,
        119 => 778.0,
        97..=122 => 611.0,
        0x95 => 350.0,
        _ => 611.0,
    }
}
