//! Line-oriented transcoding of plain-text pixmaps into a keypad-safe string
//!
//! The header line is dropped on encode because its letters have no keypad
//! tone; the decoder writes back a caller-supplied header instead.

pub const SPACE_MARKER: char = '#';
pub const LINE_TERMINATOR: char = '*';
pub const DEFAULT_HEADER: &str = "P3";

/// Collapse every line after the header into one keypad string
pub fn encode(contents: &str) -> String {
    let mut encoded = String::new();
    for line in contents.lines().skip(1) {
        encoded.extend(line.trim().chars().map(|c| if c == ' ' { SPACE_MARKER } else { c }));
        encoded.push(LINE_TERMINATOR);
    }
    encoded
}

/// Expand a keypad string back into pixmap text under `header`
pub fn decode(encoded: &str, header: &str) -> String {
    let mut decoded = String::with_capacity(header.len() + encoded.len() + 1);
    decoded.push_str(header);
    decoded.push('\n');
    decoded.extend(encoded.chars().map(|c| match c {
        LINE_TERMINATOR => '\n',
        SPACE_MARKER => ' ',
        other => other,
    }));
    decoded
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_skips_header() {
        let pixmap = "P3\n2 1\n255\n0 0 0 255 255 255\n";
        assert_eq!(encode(pixmap), "2#1*255*0#0#0#255#255#255*");
    }

    #[test]
    fn test_encode_trims_lines() {
        assert_eq!(encode("P1\n  1 0 \r\n0 1\n"), "1#0*0#1*");
    }

    #[test]
    fn test_decode_restores_lines() {
        let decoded = decode("2#1*255*", DEFAULT_HEADER);
        assert_eq!(decoded, "P3\n2 1\n255\n");
    }

    #[test]
    fn test_roundtrip_with_custom_header() {
        let pixmap = "P2\n3 1\n9\n1 5 9\n";
        assert_eq!(decode(&encode(pixmap), "P2"), pixmap);
    }

    #[test]
    fn test_empty_body() {
        assert_eq!(encode("P3\n"), "");
        assert_eq!(decode("", "P3"), "P3\n");
    }
}
