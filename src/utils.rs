use log::debug;

/// Parse a float that may use comma as decimal separator
pub fn parse_locale_float(s: &str) -> Result<f64, std::num::ParseFloatError> {
    s.trim().replace(',', ".").parse::<f64>()
}

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];
const UTF16_LE_BOM: &[u8] = &[0xFF, 0xFE];

/// Decode the raw bytes of a plant export.
///
/// The exporter writes UTF-16 LE, but re-saved copies are often UTF-8.
/// UTF-16 is tried first and only accepted when the decoded text contains
/// a CRLF line terminator; otherwise the bytes are read as UTF-8.
/// Returns `None` when neither decoding yields valid text.
pub fn decode_export(bytes: &[u8]) -> Option<String> {
    if let Some(text) = decode_utf16_le(bytes) {
        if text.contains("\r\n") {
            debug!("Export decoded as UTF-16 LE ({} bytes)", bytes.len());
            return Some(text);
        }
    }

    let body = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    let text = String::from_utf8(body.to_vec()).ok()?;
    debug!("Export decoded as UTF-8 ({} bytes)", bytes.len());
    Some(text)
}

fn decode_utf16_le(bytes: &[u8]) -> Option<String> {
    let body = bytes.strip_prefix(UTF16_LE_BOM).unwrap_or(bytes);
    if body.len() % 2 != 0 {
        return None;
    }
    let units: Vec<u16> = body
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .collect();
    String::from_utf16(&units).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utf16_le_with_bom(text: &str) -> Vec<u8> {
        let mut bytes = UTF16_LE_BOM.to_vec();
        for unit in text.encode_utf16() {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }
        bytes
    }

    #[test]
    fn test_parse_locale_float_comma() {
        assert_eq!(parse_locale_float("23,5").unwrap(), 23.5);
        assert_eq!(parse_locale_float("7.25").unwrap(), 7.25);
        assert_eq!(parse_locale_float("-0,5").unwrap(), -0.5);
        assert!(parse_locale_float("abc").is_err());
        assert!(parse_locale_float("").is_err());
    }

    #[test]
    fn test_decode_utf16_export() {
        let bytes = utf16_le_with_bom("Datum und Uhrzeit;Meldung\r\n10:00:00.000 01-03-2024;x\r\n");
        let text = decode_export(&bytes).unwrap();
        assert!(text.starts_with("Datum und Uhrzeit;"));
        assert!(text.contains("\r\n10:00:00.000"));
    }

    #[test]
    fn test_decode_falls_back_to_utf8() {
        let text = "Datum und Uhrzeit;Meldung\r\nPufferbehälter\r\n";
        assert_eq!(decode_export(text.as_bytes()).unwrap(), text);

        let mut with_bom = UTF8_BOM.to_vec();
        with_bom.extend_from_slice(text.as_bytes());
        assert_eq!(decode_export(&with_bom).unwrap(), text);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(decode_export(&[0xC3, 0x28, 0xFF]).is_none());
    }
}
