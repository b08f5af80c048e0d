//! 表示用の文字セット

/// 文字セット
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CharEncoding {
    #[default]
    Ascii,
    Ebcdic,
}

impl CharEncoding {
    /// 次の文字セット（トグル）
    pub fn next(self) -> Self {
        match self {
            CharEncoding::Ascii => CharEncoding::Ebcdic,
            CharEncoding::Ebcdic => CharEncoding::Ascii,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            CharEncoding::Ascii => "ASCII",
            CharEncoding::Ebcdic => "EBCDIC",
        }
    }

    /// バイトを表示用の文字に変換（表示できないものは '.'）
    pub fn glyph(self, byte: u8) -> char {
        match self {
            CharEncoding::Ascii => match byte {
                0x20..=0x7E => byte as char,
                _ => '.',
            },
            CharEncoding::Ebcdic => EBCDIC_DISPLAY[byte as usize] as char,
        }
    }

    /// 入力文字をバイトに変換
    ///
    /// 印字可能なASCII文字のみ受け付ける。EBCDIC表示中はEBCDICに変換する。
    pub fn encode_char(self, ch: char) -> Option<u8> {
        if !(' '..='~').contains(&ch) {
            return None;
        }
        let byte = ch as u8;
        Some(match self {
            CharEncoding::Ascii => byte,
            CharEncoding::Ebcdic => ASCII_TO_EBCDIC[byte as usize],
        })
    }
}

#[rustfmt::skip]
const EBCDIC_DISPLAY: [u8; 256] = [
    0x2E, 0x2E, 0x2E, 0x2E, 0x2E, 0x2E, 0x2E, 0x2E, 0x2E, 0x2E, 0x2E, 0x2E, 0x2E, 0x2E, 0x2E, 0x2E,
    0x2E, 0x2E, 0x2E, 0x2E, 0x2E, 0x2E, 0x2E, 0x2E, 0x2E, 0x2E, 0x2E, 0x2E, 0x2E, 0x2E, 0x2E, 0x2E,
    0x2E, 0x2E, 0x2E, 0x2E, 0x2E, 0x2E, 0x2E, 0x2E, 0x2E, 0x2E, 0x2E, 0x2E, 0x2E, 0x2E, 0x2E, 0x2E,
    0x2E, 0x2E, 0x2E, 0x2E, 0x2E, 0x2E, 0x2E, 0x2E, 0x2E, 0x2E, 0x2E, 0x2E, 0x2E, 0x2E, 0x2E, 0x2E,
    0x20, 0x2E, 0x2E, 0x2E, 0x2E, 0x2E, 0x2E, 0x2E, 0x2E, 0x2E, 0x2E, 0x2E, 0x3C, 0x28, 0x2B, 0x7C,
    0x26, 0x2E, 0x2E, 0x2E, 0x2E, 0x2E, 0x2E, 0x2E, 0x2E, 0x2E, 0x21, 0x24, 0x2A, 0x29, 0x3B, 0x5E,
    0x2D, 0x2F, 0x2E, 0x2E, 0x2E, 0x2E, 0x2E, 0x2E, 0x2E, 0x2E, 0x2E, 0x2C, 0x25, 0x5F, 0x3E, 0x3F,
    0x2E, 0x2E, 0x2E, 0x2E, 0x2E, 0x2E, 0x2E, 0x2E, 0x2E, 0x60, 0x3A, 0x23, 0x40, 0x27, 0x3D, 0x22,
    0x2E, 0x61, 0x62, 0x63, 0x64, 0x65, 0x66, 0x67, 0x68, 0x69, 0x2E, 0x2E, 0x2E, 0x2E, 0x2E, 0x2E,
    0x2E, 0x6A, 0x6B, 0x6C, 0x6D, 0x6E, 0x6F, 0x70, 0x71, 0x72, 0x2E, 0x2E, 0x2E, 0x2E, 0x2E, 0x2E,
    0x2E, 0x7E, 0x73, 0x74, 0x75, 0x76, 0x77, 0x78, 0x79, 0x7A, 0x2E, 0x2E, 0x2E, 0x5B, 0x2E, 0x2E,
    0x2E, 0x2E, 0x2E, 0x2E, 0x2E, 0x2E, 0x2E, 0x2E, 0x2E, 0x2E, 0x2E, 0x2E, 0x2E, 0x5D, 0x2E, 0x2E,
    0x7B, 0x41, 0x42, 0x43, 0x44, 0x45, 0x46, 0x47, 0x48, 0x49, 0x2E, 0x2E, 0x2E, 0x2E, 0x2E, 0x2E,
    0x7D, 0x4A, 0x4B, 0x4C, 0x4D, 0x4E, 0x4F, 0x50, 0x51, 0x52, 0x2E, 0x2E, 0x2E, 0x2E, 0x2E, 0x2E,
    0x5C, 0x2E, 0x53, 0x54, 0x55, 0x56, 0x57, 0x58, 0x59, 0x5A, 0x2E, 0x2E, 0x2E, 0x2E, 0x2E, 0x2E,
    0x30, 0x31, 0x32, 0x33, 0x34, 0x35, 0x36, 0x37, 0x38, 0x39, 0x2E, 0x2E, 0x2E, 0x2E, 0x2E, 0x2E,
];

#[rustfmt::skip]
const ASCII_TO_EBCDIC: [u8; 256] = [
    0x00, 0x01, 0x02, 0x03, 0x37, 0x2D, 0x2E, 0x2F, 0x16, 0x05, 0x15, 0x0B, 0x0C, 0x0D, 0x0E, 0x0F,
    0x10, 0x11, 0x12, 0x13, 0x3C, 0x3D, 0x32, 0x26, 0x18, 0x19, 0x3F, 0x27, 0x1C, 0x1D, 0x1E, 0x1F,
    0x40, 0x5A, 0x7F, 0x7B, 0x5B, 0x6C, 0x50, 0x7D, 0x4D, 0x5D, 0x5C, 0x4E, 0x6B, 0x60, 0x4B, 0x61,
    0xF0, 0xF1, 0xF2, 0xF3, 0xF4, 0xF5, 0xF6, 0xF7, 0xF8, 0xF9, 0x7A, 0x5E, 0x4C, 0x7E, 0x6E, 0x6F,
    0x7C, 0xC1, 0xC2, 0xC3, 0xC4, 0xC5, 0xC6, 0xC7, 0xC8, 0xC9, 0xD1, 0xD2, 0xD3, 0xD4, 0xD5, 0xD6,
    0xD7, 0xD8, 0xD9, 0xE2, 0xE3, 0xE4, 0xE5, 0xE6, 0xE7, 0xE8, 0xE9, 0xAD, 0xE0, 0xBD, 0x5F, 0x6D,
    0x79, 0x81, 0x82, 0x83, 0x84, 0x85, 0x86, 0x87, 0x88, 0x89, 0x91, 0x92, 0x93, 0x94, 0x95, 0x96,
    0x97, 0x98, 0x99, 0xA2, 0xA3, 0xA4, 0xA5, 0xA6, 0xA7, 0xA8, 0xA9, 0xC0, 0x4F, 0xD0, 0xA1, 0x07,
    0x20, 0x21, 0x22, 0x23, 0x24, 0x25, 0x06, 0x17, 0x28, 0x29, 0x2A, 0x2B, 0x2C, 0x09, 0x0A, 0x1B,
    0x30, 0x31, 0x1A, 0x33, 0x34, 0x35, 0x36, 0x08, 0x38, 0x39, 0x3A, 0x3B, 0x04, 0x14, 0x3E, 0xFF,
    0x41, 0xAA, 0x4A, 0xB1, 0x9F, 0xB2, 0x6A, 0xB5, 0xBB, 0xB4, 0x9A, 0x8A, 0xB0, 0xCA, 0xAF, 0xBC,
    0x90, 0x8F, 0xEA, 0xFA, 0xBE, 0xA0, 0xB6, 0xB3, 0x9D, 0xDA, 0x9B, 0x8B, 0xB7, 0xB8, 0xB9, 0xAB,
    0x64, 0x65, 0x62, 0x66, 0x63, 0x67, 0x9E, 0x68, 0x74, 0x71, 0x72, 0x73, 0x78, 0x75, 0x76, 0x77,
    0xAC, 0x69, 0xED, 0xEE, 0xEB, 0xEF, 0xEC, 0xBF, 0x80, 0xFD, 0xFE, 0xFB, 0xFC, 0xBA, 0xAE, 0x59,
    0x44, 0x45, 0x42, 0x46, 0x43, 0x47, 0x9C, 0x48, 0x54, 0x51, 0x52, 0x53, 0x58, 0x55, 0x56, 0x57,
    0x8C, 0x49, 0xCD, 0xCE, 0xCB, 0xCF, 0xCC, 0xE1, 0x70, 0xDD, 0xDE, 0xDB, 0xDC, 0x8D, 0x8E, 0xDF,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_glyphs() {
        assert_eq!(CharEncoding::Ascii.glyph(b'k'), 'k');
        assert_eq!(CharEncoding::Ascii.glyph(b' '), ' ');
        assert_eq!(CharEncoding::Ascii.glyph(0x00), '.');
        assert_eq!(CharEncoding::Ascii.glyph(0x7F), '.');
        assert_eq!(CharEncoding::Ascii.glyph(0xC1), '.');
    }

    #[test]
    fn ebcdic_glyphs() {
        assert_eq!(CharEncoding::Ebcdic.glyph(0xC1), 'A');
        assert_eq!(CharEncoding::Ebcdic.glyph(0x81), 'a');
        assert_eq!(CharEncoding::Ebcdic.glyph(0xF0), '0');
        assert_eq!(CharEncoding::Ebcdic.glyph(0x40), ' ');
        assert_eq!(CharEncoding::Ebcdic.glyph(0x41), '.');
    }

    #[test]
    fn input_translation() {
        assert_eq!(CharEncoding::Ascii.encode_char('k'), Some(b'k'));
        assert_eq!(CharEncoding::Ebcdic.encode_char('A'), Some(0xC1));
        assert_eq!(CharEncoding::Ebcdic.encode_char('k'), Some(0x92));
        assert_eq!(CharEncoding::Ascii.encode_char('\t'), None);
        assert_eq!(CharEncoding::Ascii.encode_char('é'), None);
    }

    #[test]
    fn printable_ascii_round_trips_through_ebcdic_display() {
        for ch in ' '..='~' {
            let byte = CharEncoding::Ebcdic.encode_char(ch).unwrap();
            let shown = CharEncoding::Ebcdic.glyph(byte);
            assert!(shown == ch || shown == '.', "{:?} -> {:02X} -> {:?}", ch, byte, shown);
        }
    }

    #[test]
    fn toggle() {
        assert_eq!(CharEncoding::Ascii.next(), CharEncoding::Ebcdic);
        assert_eq!(CharEncoding::Ebcdic.next(), CharEncoding::Ascii);
    }
}
