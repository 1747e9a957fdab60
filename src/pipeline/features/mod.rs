pub mod extractor;
pub mod rules;

pub use extractor::{extract, ExtractionReport, FieldExtractor};
