//! Unicode to WinAnsiEncoding conversion for PDF text strings
//!
//! The built-in Type1 fonts show text as single-byte strings. WinAnsi is a
//! superset of Latin-1, so the 0xA0-0xFF block maps straight through; the
//! 0x80-0x9F block holds typographic characters (euro, curly quotes,
//! dashes) that need explicit mapping. Anything else renders as '?'.

/// Convert a string to WinAnsiEncoding bytes, one byte per char.
pub fn to_winansi(text: &str) -> Vec<u8> {
    text.chars().map(winansi_byte).collect()
}

pub fn winansi_byte(ch: char) -> u8 {
    let cp = ch as u32;
    match ch {
        _ if cp < 0x80 => cp as u8,
        _ if (0xA0..=0xFF).contains(&cp) => cp as u8,
        '€' => 0x80,
        '‚' => 0x82,
        'ƒ' => 0x83,
        '„' => 0x84,
        '…' => 0x85,
        '†' => 0x86,
        '‡' => 0x87,
        'ˆ' => 0x88,
        '‰' => 0x89,
        'Š' => 0x8A,
        '‹' => 0x8B,
        'Œ' => 0x8C,
        'Ž' => 0x8E,
        '\u{2018}' => 0x91,
        '\u{2019}' => 0x92,
        '\u{201C}' => 0x93,
        '\u{201D}' => 0x94,
        '•' => 0x95,
        '–' => 0x96,
        '—' => 0x97,
        '˜' => 0x98,
        '™' => 0x99,
        'š' => 0x9A,
        '›' => 0x9B,
        'œ' => 0x9C,
        'ž' => 0x9E,
        'Ÿ' => 0x9F,
        _ => b'?',
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_passes_through() {
        let text = "Certificate of Completion";
        assert_eq!(to_winansi(text), text.as_bytes());
    }

    #[test]
    fn latin1_maps_numerically() {
        assert_eq!(winansi_byte('é'), 0xE9);
        assert_eq!(winansi_byte('Ö'), 0xD6);
        assert_eq!(winansi_byte('ÿ'), 0xFF);
    }

    #[test]
    fn typographic_block() {
        assert_eq!(winansi_byte('€'), 0x80);
        assert_eq!(winansi_byte('\u{2019}'), 0x92);
        assert_eq!(winansi_byte('—'), 0x97);
    }

    #[test]
    fn unmappable_becomes_question_mark() {
        assert_eq!(winansi_byte('漢'), b'?');
        assert_eq!(to_winansi("Zoë 🎓"), vec![b'Z', b'o', 0xEB, b' ', b'?']);
    }
}
