//! Report processing orchestrator.
//!
//! Single entry point that drives the full pipeline:
//! bytes → RawReport → FeatureSet → DecisionPayload (or renal-only result).
//!
//! Text decoding collaborators are injected through `ReportReader`, and the
//! decision layer is shared through `Arc`, so the orchestrator stays testable
//! with mock implementations.

use std::path::Path;
use std::sync::Arc;

use serde::Serialize;

use crate::models::{DecisionPayload, FeatureSet, RenalAssessment};
use crate::pipeline::decision::{DecisionAssembler, DecisionError};
use crate::pipeline::extraction::{
    DecodedReport, ExtractionError, ExtractionMethod, RawReport, ReportReader,
};
use crate::pipeline::features::{ExtractionReport, FieldExtractor};

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can occur while processing a report.
#[derive(Debug, thiserror::Error)]
pub enum ProcessingError {
    #[error("Extraction failed: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("Decision failed: {0}")]
    Decision(#[from] DecisionError),
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Everything derived from one report.
#[derive(Debug, Clone, Serialize)]
pub struct ReportOutcome {
    pub method: ExtractionMethod,
    pub page_count: usize,
    pub text_length: usize,
    pub features: FeatureSet,
    pub extraction: ExtractionReport,
    /// Always available, classifier or not.
    pub renal: RenalAssessment,
    /// `None` when the classifier is unavailable.
    pub decision: Option<DecisionPayload>,
}

// ---------------------------------------------------------------------------
// Orchestrator
// ---------------------------------------------------------------------------

/// Orchestrates report processing: decode → extract features → decide.
pub struct ReportProcessor {
    reader: ReportReader,
    extractor: FieldExtractor,
    assembler: Arc<DecisionAssembler>,
}

impl ReportProcessor {
    pub fn new(reader: ReportReader, assembler: Arc<DecisionAssembler>) -> Self {
        Self {
            reader,
            extractor: FieldExtractor::new(),
            assembler,
        }
    }

    /// Processor for plain-text reports only.
    pub fn text_only(assembler: Arc<DecisionAssembler>) -> Self {
        Self::new(ReportReader::new(), assembler)
    }

    pub fn assembler(&self) -> &DecisionAssembler {
        &self.assembler
    }

    /// Read a report file from disk and process it.
    pub fn process_file(&self, path: &Path) -> Result<ReportOutcome, ProcessingError> {
        let bytes = std::fs::read(path).map_err(ExtractionError::from)?;
        tracing::info!(path = %path.display(), size = bytes.len(), "Processing report file");
        self.process_bytes(bytes)
    }

    /// Full pipeline from uploaded bytes.
    pub fn process_bytes(&self, bytes: Vec<u8>) -> Result<ReportOutcome, ProcessingError> {
        let decoded = self.reader.read(bytes)?;
        self.process_decoded(decoded)
    }

    /// Pipeline from already-decoded text.
    pub fn process_text(&self, text: &str) -> Result<ReportOutcome, ProcessingError> {
        self.process_decoded(DecodedReport {
            report: RawReport::new(text),
            method: ExtractionMethod::PlainTextRead,
            page_count: 1,
        })
    }

    fn process_decoded(&self, decoded: DecodedReport) -> Result<ReportOutcome, ProcessingError> {
        let (features, extraction) = self.extractor.extract_with_report(&decoded.report);

        tracing::info!(
            recognized = extraction.recognized.len(),
            defaulted = extraction.defaulted.len(),
            "Features extracted"
        );

        let renal = self.assembler.assess(&features);
        let decision = match self.assembler.predict_features(&features) {
            Ok(payload) => Some(payload),
            Err(DecisionError::ClassifierUnavailable) => {
                tracing::warn!("Classifier unavailable, returning renal assessment only");
                None
            }
            Err(e) => return Err(e.into()),
        };

        Ok(ReportOutcome {
            method: decoded.method,
            page_count: decoded.page_count,
            text_length: decoded.report.len(),
            features,
            extraction,
            renal,
            decision,
        })
    }
}
