//! PDF text layer reading via Google PDFium (`pdfium` feature).
//!
//! Reads the embedded text of digital PDFs. Scanned PDFs have no text layer and
//! yield empty pages; those need an OCR collaborator instead.

use pdfium_render::prelude::*;
use tracing::debug;

use super::types::PdfTextSource;
use super::ExtractionError;

/// `PdfTextSource` backed by PDFium.
///
/// Stateless: the library handle is bound per call because the upstream
/// `Pdfium` type is not `Send`.
pub struct PdfiumTextSource;

impl PdfiumTextSource {
    /// Verify the PDFium library can be bound.
    pub fn new() -> Result<Self, ExtractionError> {
        let _ = load_pdfium()?;
        Ok(Self)
    }
}

impl PdfTextSource for PdfiumTextSource {
    fn page_texts(&self, pdf_bytes: &[u8]) -> Result<Vec<String>, ExtractionError> {
        let pdfium = load_pdfium()?;
        let document = pdfium
            .load_pdf_from_byte_slice(pdf_bytes, None)
            .map_err(|e| ExtractionError::PdfText(format!("cannot open PDF: {e}")))?;

        let pages: Vec<String> = document
            .pages()
            .iter()
            .map(|page| page.text().map(|t| t.all()).unwrap_or_default())
            .collect();

        if pages.is_empty() {
            return Err(ExtractionError::PdfText("document has no pages".into()));
        }

        debug!(pages = pages.len(), "PDF text layer read");
        Ok(pages)
    }
}

/// Bind PDFium: `PDFIUM_DYNAMIC_LIB_PATH` first, then next to the executable,
/// then the system library search path.
fn load_pdfium() -> Result<Pdfium, ExtractionError> {
    if let Ok(path) = std::env::var("PDFIUM_DYNAMIC_LIB_PATH") {
        debug!(path = %path, "Loading PDFium from env var");
        let bindings = Pdfium::bind_to_library(&path)
            .map_err(|e| ExtractionError::PdfText(format!("Failed to load PDFium from {path}: {e}")))?;
        return Ok(Pdfium::new(bindings));
    }

    if let Some(exe_dir) = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|p| p.to_path_buf()))
    {
        let lib_path =
            Pdfium::pdfium_platform_library_name_at_path(exe_dir.to_string_lossy().as_ref());
        if let Ok(bindings) = Pdfium::bind_to_library(&lib_path) {
            debug!(dir = %exe_dir.display(), "Loaded PDFium next to executable");
            return Ok(Pdfium::new(bindings));
        }
    }

    let bindings = Pdfium::bind_to_system_library().map_err(|e| {
        ExtractionError::PdfText(format!(
            "PDFium library not found. Set PDFIUM_DYNAMIC_LIB_PATH or install PDFium: {e}"
        ))
    })?;
    Ok(Pdfium::new(bindings))
}
