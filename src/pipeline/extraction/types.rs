use serde::{Deserialize, Serialize};

use super::ExtractionError;

/// Decoded report text, as produced by a text-extraction collaborator.
///
/// No structure is assumed: the text may be empty, noisy or mislabeled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawReport(String);

impl RawReport {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// Decode UTF-8 bytes. Anything else is unreadable.
    pub fn from_utf8(bytes: Vec<u8>) -> Result<Self, ExtractionError> {
        String::from_utf8(bytes)
            .map(Self)
            .map_err(|e| ExtractionError::UnreadableInput(e.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<&str> for RawReport {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for RawReport {
    fn from(text: String) -> Self {
        Self(text)
    }
}

/// Broad input categories, detected from magic bytes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FileCategory {
    Pdf,
    Image,
    PlainText,
    Unsupported,
}

impl FileCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Image => "image",
            Self::PlainText => "plain_text",
            Self::Unsupported => "unsupported",
        }
    }
}

/// How report text was obtained
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionMethod {
    PlainTextRead,
    PdfTextLayer,
    ImageOcr,
}

/// Text obtained from one uploaded report, with provenance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecodedReport {
    pub report: RawReport,
    pub method: ExtractionMethod,
    pub page_count: usize,
}

/// PDF text layer reader (collaborator boundary).
pub trait PdfTextSource: Send + Sync {
    /// Text of each page, in page order.
    fn page_texts(&self, pdf_bytes: &[u8]) -> Result<Vec<String>, ExtractionError>;
}

/// OCR engine for scanned reports (collaborator boundary).
pub trait ImageTextRecognizer: Send + Sync {
    fn recognize(&self, image_bytes: &[u8]) -> Result<String, ExtractionError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utf8_bytes_decode() {
        let report = RawReport::from_utf8(b"Age: 63".to_vec()).unwrap();
        assert_eq!(report.as_str(), "Age: 63");
    }

    #[test]
    fn invalid_utf8_is_unreadable() {
        let result = RawReport::from_utf8(vec![0xC3, 0x28, 0xFF]);
        assert!(matches!(result, Err(ExtractionError::UnreadableInput(_))));
    }

    #[test]
    fn whitespace_only_is_empty() {
        assert!(RawReport::new(" \n\t ").is_empty());
        assert!(!RawReport::new("x").is_empty());
    }

    #[test]
    fn traits_are_object_safe() {
        fn _assert_pdf(_: &dyn PdfTextSource) {}
        fn _assert_ocr(_: &dyn ImageTextRecognizer) {}
    }
}
