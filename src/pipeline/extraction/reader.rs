//! Upstream boundary: uploaded bytes → sanitized `RawReport`.
//!
//! Plain text is decoded here (strict UTF-8). PDF text layers and image OCR are
//! delegated to injected collaborators; a missing collaborator means the format
//! is unsupported in this deployment.

use super::format::detect_category;
use super::sanitize::sanitize_report_text;
use super::types::{
    DecodedReport, ExtractionMethod, FileCategory, ImageTextRecognizer, PdfTextSource, RawReport,
};
use super::ExtractionError;

/// Separator placed between page texts.
const PAGE_SEPARATOR: &str = "\n";

/// Reads uploaded report bytes into text.
#[derive(Default)]
pub struct ReportReader {
    pdf: Option<Box<dyn PdfTextSource>>,
    ocr: Option<Box<dyn ImageTextRecognizer>>,
}

impl ReportReader {
    /// Reader for plain text only.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pdf_source(mut self, pdf: Box<dyn PdfTextSource>) -> Self {
        self.pdf = Some(pdf);
        self
    }

    pub fn with_ocr(mut self, ocr: Box<dyn ImageTextRecognizer>) -> Self {
        self.ocr = Some(ocr);
        self
    }

    pub fn supports(&self, category: FileCategory) -> bool {
        match category {
            FileCategory::PlainText => true,
            FileCategory::Pdf => self.pdf.is_some(),
            FileCategory::Image => self.ocr.is_some(),
            FileCategory::Unsupported => false,
        }
    }

    /// Detect the format of `bytes` and decode it into a sanitized report.
    pub fn read(&self, bytes: Vec<u8>) -> Result<DecodedReport, ExtractionError> {
        let category = detect_category(&bytes);
        tracing::info!(
            category = category.as_str(),
            size = bytes.len(),
            "ReportReader: decoding report"
        );

        let (method, pages) = match category {
            FileCategory::PlainText => {
                let report = RawReport::from_utf8(bytes)?;
                (ExtractionMethod::PlainTextRead, vec![report.into_string()])
            }
            FileCategory::Pdf => {
                let pdf = self.pdf.as_ref().ok_or(ExtractionError::UnsupportedFormat)?;
                (ExtractionMethod::PdfTextLayer, pdf.page_texts(&bytes)?)
            }
            FileCategory::Image => {
                let ocr = self.ocr.as_ref().ok_or(ExtractionError::UnsupportedFormat)?;
                (ExtractionMethod::ImageOcr, vec![ocr.recognize(&bytes)?])
            }
            FileCategory::Unsupported => {
                return Err(ExtractionError::UnreadableInput(
                    "content is neither text, PDF nor a supported image".into(),
                ));
            }
        };

        let page_count = pages.len();
        let text = sanitize_report_text(&pages.join(PAGE_SEPARATOR));

        tracing::info!(
            method = ?method,
            pages = page_count,
            text_length = text.len(),
            "ReportReader: decoding complete"
        );

        Ok(DecodedReport {
            report: RawReport::new(text),
            method,
            page_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedPdf(Vec<&'static str>);

    impl PdfTextSource for FixedPdf {
        fn page_texts(&self, _pdf_bytes: &[u8]) -> Result<Vec<String>, ExtractionError> {
            Ok(self.0.iter().map(|s| s.to_string()).collect())
        }
    }

    struct FailingOcr;

    impl ImageTextRecognizer for FailingOcr {
        fn recognize(&self, _image_bytes: &[u8]) -> Result<String, ExtractionError> {
            Err(ExtractionError::Recognition("tesseract not installed".into()))
        }
    }

    struct FixedOcr(&'static str);

    impl ImageTextRecognizer for FixedOcr {
        fn recognize(&self, _image_bytes: &[u8]) -> Result<String, ExtractionError> {
            Ok(self.0.to_string())
        }
    }

    const PNG_HEADER: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

    #[test]
    fn plain_text_is_decoded_and_sanitized() {
        let reader = ReportReader::new();
        let decoded = reader.read(b"Age: 63\x07\r\n\r\nCD4 Count: 200".to_vec()).unwrap();
        assert_eq!(decoded.method, ExtractionMethod::PlainTextRead);
        assert_eq!(decoded.page_count, 1);
        assert_eq!(decoded.report.as_str(), "Age: 63\nCD4 Count: 200");
    }

    #[test]
    fn binary_content_is_unreadable() {
        let reader = ReportReader::new();
        let result = reader.read(vec![0x00, 0x9F, 0x92, 0x96]);
        assert!(matches!(result, Err(ExtractionError::UnreadableInput(_))));
    }

    #[test]
    fn pdf_without_source_is_unsupported() {
        let reader = ReportReader::new();
        assert!(!reader.supports(FileCategory::Pdf));
        let result = reader.read(b"%PDF-1.4 ...".to_vec());
        assert!(matches!(result, Err(ExtractionError::UnsupportedFormat)));
    }

    #[test]
    fn pdf_pages_are_joined() {
        let reader = ReportReader::new()
            .with_pdf_source(Box::new(FixedPdf(vec!["Age: 70", "  Serum Creatinine: 2.1  "])));
        let decoded = reader.read(b"%PDF-1.4 ...".to_vec()).unwrap();
        assert_eq!(decoded.method, ExtractionMethod::PdfTextLayer);
        assert_eq!(decoded.page_count, 2);
        assert_eq!(decoded.report.as_str(), "Age: 70\nSerum Creatinine: 2.1");
    }

    #[test]
    fn image_goes_through_ocr() {
        let reader = ReportReader::new().with_ocr(Box::new(FixedOcr("Bacteria: Present")));
        let decoded = reader.read(PNG_HEADER.to_vec()).unwrap();
        assert_eq!(decoded.method, ExtractionMethod::ImageOcr);
        assert_eq!(decoded.report.as_str(), "Bacteria: Present");
    }

    #[test]
    fn ocr_failure_propagates() {
        let reader = ReportReader::new().with_ocr(Box::new(FailingOcr));
        let result = reader.read(PNG_HEADER.to_vec());
        assert!(matches!(result, Err(ExtractionError::Recognition(_))));
    }
}
