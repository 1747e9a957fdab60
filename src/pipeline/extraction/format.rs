use super::types::FileCategory;

/// Largest upload accepted for extraction.
pub const MAX_REPORT_BYTES: usize = 100 * 1024 * 1024; // 100MB

/// Bytes inspected when deciding whether unknown content is text.
const TEXT_PROBE_BYTES: usize = 8 * 1024;

/// Detect report format from magic bytes (NOT file extensions).
pub fn detect_category(bytes: &[u8]) -> FileCategory {
    if bytes.len() > MAX_REPORT_BYTES {
        return FileCategory::Unsupported;
    }

    match bytes {
        // PDF: starts with %PDF
        [0x25, 0x50, 0x44, 0x46, ..] => FileCategory::Pdf,
        // JPEG: starts with FF D8 FF
        [0xFF, 0xD8, 0xFF, ..] => FileCategory::Image,
        // PNG: starts with 89 50 4E 47
        [0x89, 0x50, 0x4E, 0x47, ..] => FileCategory::Image,
        // TIFF: little-endian (49 49 2A 00) or big-endian (4D 4D 00 2A)
        [0x49, 0x49, 0x2A, 0x00, ..] | [0x4D, 0x4D, 0x00, 0x2A, ..] => FileCategory::Image,
        _ if is_likely_text(bytes) => FileCategory::PlainText,
        _ => FileCategory::Unsupported,
    }
}

/// UTF-8 validation on the first chunk. A multi-byte sequence cut at the probe
/// boundary still counts as text.
fn is_likely_text(bytes: &[u8]) -> bool {
    let probe = &bytes[..bytes.len().min(TEXT_PROBE_BYTES)];
    if probe.contains(&0) {
        return false;
    }
    match std::str::from_utf8(probe) {
        Ok(_) => true,
        Err(e) => e.error_len().is_none() && probe.len() == TEXT_PROBE_BYTES,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_pdf() {
        assert_eq!(detect_category(b"%PDF-1.7\n..."), FileCategory::Pdf);
    }

    #[test]
    fn detects_images() {
        assert_eq!(detect_category(&[0xFF, 0xD8, 0xFF, 0xE0, 0, 0]), FileCategory::Image);
        assert_eq!(
            detect_category(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]),
            FileCategory::Image
        );
        assert_eq!(detect_category(&[0x49, 0x49, 0x2A, 0x00, 1, 2]), FileCategory::Image);
    }

    #[test]
    fn detects_plain_text() {
        assert_eq!(detect_category(b"Serum Creatinine: 1.4 mg/dL"), FileCategory::PlainText);
        assert_eq!(detect_category("Créatinine: 1,4".as_bytes()), FileCategory::PlainText);
    }

    #[test]
    fn empty_input_is_text() {
        assert_eq!(detect_category(b""), FileCategory::PlainText);
    }

    #[test]
    fn binary_garbage_is_unsupported() {
        assert_eq!(detect_category(&[0x00, 0x01, 0x02, 0x03]), FileCategory::Unsupported);
        assert_eq!(detect_category(&[0xC3, 0x28, 0x41]), FileCategory::Unsupported);
    }

    #[test]
    fn truncated_multibyte_at_probe_edge_is_text() {
        let mut bytes = vec![b'a'; TEXT_PROBE_BYTES - 1];
        bytes.extend_from_slice("é".as_bytes());
        assert_eq!(detect_category(&bytes), FileCategory::PlainText);
    }
}
