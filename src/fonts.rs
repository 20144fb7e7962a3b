//! Built-in font selection, registration and width metrics
//!
//! The layout only uses four Standard-14 faces, so fonts are never embedded:
//! each face is registered as a Type1 font object and referenced from the
//! page resources. Text measurement (needed for centering and wrapping)
//! uses the Adobe AFM advance widths for the printable-ASCII range, in
//! 1/1000 em units; code points outside the table fall back to a per-face
//! default width.

use pdf_writer::{Name, Pdf, Ref};

use crate::encoding::to_winansi;

/// The faces the certificate layout draws with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Font {
    Helvetica,
    TimesRoman,
    TimesBold,
    Courier,
}

impl Font {
    /// PDF base font name for the Type1 font dictionary.
    pub fn base_font(self) -> Name<'static> {
        match self {
            Font::Helvetica => Name(b"Helvetica"),
            Font::TimesRoman => Name(b"Times-Roman"),
            Font::TimesBold => Name(b"Times-Bold"),
            Font::Courier => Name(b"Courier"),
        }
    }

    /// Resource name used to select the font in content streams.
    pub fn resource_name(self) -> Name<'static> {
        match self {
            Font::Helvetica => Name(b"F1"),
            Font::TimesRoman => Name(b"F2"),
            Font::TimesBold => Name(b"F3"),
            Font::Courier => Name(b"F4"),
        }
    }

    /// Advance width of a WinAnsi code, in 1/1000 em.
    pub fn char_width(self, code: u8) -> u16 {
        if self == Font::Courier {
            // fixed pitch
            return 600;
        }
        let table = match self {
            Font::Helvetica => &HELVETICA_WIDTHS,
            Font::TimesRoman => &TIMES_ROMAN_WIDTHS,
            Font::TimesBold => &TIMES_BOLD_WIDTHS,
            Font::Courier => unreachable!(),
        };
        if (0x20..=0x7E).contains(&code) {
            table[usize::from(code) - 0x20]
        } else {
            self.default_width()
        }
    }

    /// Width of a string at the given point size.
    pub fn text_width(self, text: &str, size: f64) -> f64 {
        let units: u32 = to_winansi(text)
            .iter()
            .map(|&b| u32::from(self.char_width(b)))
            .sum();
        f64::from(units) * size / 1000.0
    }

    fn default_width(self) -> u16 {
        match self {
            Font::Helvetica => 556,
            Font::TimesRoman | Font::TimesBold => 500,
            Font::Courier => 600,
        }
    }
}

/// Registers the Type1 font objects a page actually used and writes them
/// into the page Resources.
pub struct FontRegistry {
    entries: Vec<(Font, Ref)>,
}

impl FontRegistry {
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    pub fn register(&mut self, pdf: &mut Pdf, font: Font, id: Ref) {
        if self.entries.iter().any(|&(f, _)| f == font) {
            return;
        }
        pdf.type1_font(id).base_font(font.base_font());
        self.entries.push((font, id));
    }

    pub fn write_resources(&self, resources: &mut pdf_writer::writers::Resources<'_>) {
        if self.entries.is_empty() {
            return;
        }
        let mut dict = resources.fonts();
        for &(font, id) in &self.entries {
            dict.pair(font.resource_name(), id);
        }
    }
}

impl Default for FontRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// Adobe AFM advance widths for codes 0x20..=0x7E.

#[rustfmt::skip]
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333,
    278, 278, 556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278,
    584, 584, 584, 556, 1015, 667, 667, 722, 722, 667, 611, 778, 722, 278,
    500, 667, 556, 833, 722, 778, 667, 778, 722, 667, 611, 722, 667, 944,
    667, 667, 611, 278, 278, 278, 469, 556, 333, 556, 556, 500, 556, 556,
    278, 556, 556, 222, 222, 500, 222, 833, 556, 556, 556, 556, 333, 500,
    278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

#[rustfmt::skip]
const TIMES_ROMAN_WIDTHS: [u16; 95] = [
    250, 333, 408, 500, 500, 833, 778, 180, 333, 333, 500, 564, 250, 333,
    250, 278, 500, 500, 500, 500, 500, 500, 500, 500, 500, 500, 278, 278,
    564, 564, 564, 444, 921, 722, 667, 667, 722, 611, 556, 722, 722, 333,
    389, 722, 611, 889, 722, 722, 556, 722, 667, 556, 611, 722, 722, 944,
    722, 722, 611, 333, 278, 333, 469, 500, 333, 444, 500, 444, 500, 444,
    333, 500, 500, 278, 278, 500, 278, 778, 500, 500, 500, 500, 333, 389,
    278, 500, 500, 722, 500, 500, 444, 480, 200, 480, 541,
];

#[rustfmt::skip]
const TIMES_BOLD_WIDTHS: [u16; 95] = [
    250, 333, 555, 500, 500, 1000, 833, 278, 333, 333, 500, 570, 250, 333,
    250, 278, 500, 500, 500, 500, 500, 500, 500, 500, 500, 500, 333, 333,
    570, 570, 570, 500, 930, 722, 667, 722, 722, 667, 611, 778, 778, 389,
    500, 778, 667, 944, 722, 778, 611, 778, 722, 556, 667, 722, 722, 1000,
    722, 722, 667, 333, 278, 333, 581, 500, 333, 500, 556, 444, 556, 444,
    333, 500, 556, 278, 333, 556, 278, 833, 556, 500, 556, 556, 444, 389,
    333, 556, 500, 722, 500, 500, 444, 394, 220, 394, 520,
];
