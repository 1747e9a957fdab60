pub mod format;
#[cfg(feature = "pdfium")]
pub mod pdf;
pub mod reader;
pub mod sanitize;
pub mod types;

pub use format::*;
#[cfg(feature = "pdfium")]
pub use pdf::PdfiumTextSource;
pub use reader::ReportReader;
pub use sanitize::*;
pub use types::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unreadable input: {0}")]
    UnreadableInput(String),

    #[error("Unsupported format for extraction")]
    UnsupportedFormat,

    #[error("PDF text extraction failed: {0}")]
    PdfText(String),

    #[error("Text recognition failed: {0}")]
    Recognition(String),
}
