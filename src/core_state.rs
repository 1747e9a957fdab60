//! Process-wide application state.
//!
//! `CoreState` is built once at startup and shared by every caller. The
//! decision layer is read-only after construction and handed out as
//! `Arc<DecisionAssembler>`; database connections are opened per call.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Local;

use crate::config;
use crate::db;
use crate::models::{DecisionPayload, PatientRecord};
use crate::pipeline::decision::{ClassifierArtifacts, DecisionAssembler};
use crate::pipeline::extraction::ReportReader;
use crate::pipeline::processor::ReportProcessor;

// ═══════════════════════════════════════════════════════════
// CoreState
// ═══════════════════════════════════════════════════════════

pub struct CoreState {
    /// Directory classifier artifacts were loaded from.
    pub models_dir: PathBuf,
    /// Patient record database.
    pub database_path: PathBuf,
    assembler: Arc<DecisionAssembler>,
}

impl CoreState {
    /// State from the configured directories.
    pub fn new() -> Self {
        Self::with_paths(config::models_dir(), config::database_path())
    }

    /// Load classifier artifacts from `models_dir`. Load failure leaves the
    /// classifier disabled; renal assessment keeps working.
    pub fn with_paths(models_dir: PathBuf, database_path: PathBuf) -> Self {
        let artifacts = match ClassifierArtifacts::load(&models_dir) {
            Ok(artifacts) => Some(artifacts),
            Err(e) => {
                tracing::warn!(
                    dir = %models_dir.display(),
                    error = %e,
                    "Classifier artifacts unavailable, predictions disabled"
                );
                None
            }
        };

        Self {
            models_dir,
            database_path,
            assembler: Arc::new(DecisionAssembler::new(artifacts)),
        }
    }

    /// State around an already-built assembler.
    pub fn from_assembler(assembler: DecisionAssembler, database_path: PathBuf) -> Self {
        Self {
            models_dir: PathBuf::new(),
            database_path,
            assembler: Arc::new(assembler),
        }
    }

    pub fn assembler(&self) -> Arc<DecisionAssembler> {
        Arc::clone(&self.assembler)
    }

    pub fn is_classifier_available(&self) -> bool {
        self.assembler.is_classifier_available()
    }

    /// Report processor sharing this state's assembler. Reads PDF text layers
    /// when the `pdfium` feature is enabled and the library can be bound.
    pub fn processor(&self) -> ReportProcessor {
        ReportProcessor::new(report_reader(), self.assembler())
    }

    /// Open the patient record database.
    pub fn open_db(&self) -> Result<rusqlite::Connection, CoreError> {
        db::open_database(&self.database_path).map_err(CoreError::Database)
    }

    /// Persist a decision as a patient record, stamped with local time.
    pub fn save_decision(
        &self,
        name: &str,
        gender: Option<&str>,
        age: f64,
        decision: &DecisionPayload,
        created_by: &str,
    ) -> Result<PatientRecord, CoreError> {
        let record = PatientRecord::from_decision(
            name,
            gender,
            age,
            decision,
            created_by,
            Local::now().naive_local(),
        );
        let conn = self.open_db()?;
        db::insert_patient_record(&conn, &record)?;
        tracing::info!(id = %record.id, "Decision saved to history");
        Ok(record)
    }

    /// Saved records, newest first.
    pub fn history(&self, limit: Option<usize>) -> Result<Vec<PatientRecord>, CoreError> {
        let conn = self.open_db()?;
        Ok(db::list_patient_records(&conn, limit)?)
    }

    pub fn database_path(&self) -> &Path {
        &self.database_path
    }
}

impl Default for CoreState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "pdfium")]
fn report_reader() -> ReportReader {
    use crate::pipeline::extraction::PdfiumTextSource;

    match PdfiumTextSource::new() {
        Ok(source) => ReportReader::new().with_pdf_source(Box::new(source)),
        Err(e) => {
            tracing::warn!(error = %e, "PDFium unavailable, PDF reports disabled");
            ReportReader::new()
        }
    }
}

#[cfg(not(feature = "pdfium"))]
fn report_reader() -> ReportReader {
    ReportReader::new()
}

// ═══════════════════════════════════════════════════════════
// Errors
// ═══════════════════════════════════════════════════════════

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Database error: {0}")]
    Database(#[from] db::DatabaseError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FeatureField, PredictionLabel};

    fn write_artifacts(dir: &Path) {
        let mut coefficients = vec![0.0; FeatureField::COUNT];
        coefficients[FeatureField::SerumCreatinine as usize] = 2.0;
        std::fs::write(
            dir.join(config::SCALER_FILE),
            serde_json::json!({ "mean": vec![0.0; 19], "scale": vec![1.0; 19] }).to_string(),
        )
        .unwrap();
        std::fs::write(
            dir.join(config::LOGISTIC_MODEL_FILE),
            serde_json::json!({ "coefficients": coefficients, "intercept": -2.0 }).to_string(),
        )
        .unwrap();
    }

    #[test]
    fn missing_artifacts_degrade() {
        let dir = tempfile::tempdir().unwrap();
        let state = CoreState::with_paths(dir.path().join("models"), dir.path().join("records.db"));
        assert!(!state.is_classifier_available());

        let outcome = state.processor().process_text("Age: 63\nSerum Creatinine: 1.4").unwrap();
        assert!(outcome.decision.is_none());
        assert_eq!(outcome.features.age, 63.0);
    }

    #[test]
    fn artifacts_enable_prediction() {
        let dir = tempfile::tempdir().unwrap();
        write_artifacts(dir.path());
        let state = CoreState::with_paths(dir.path().to_path_buf(), dir.path().join("records.db"));
        assert!(state.is_classifier_available());

        let outcome = state.processor().process_text("Serum Creatinine: 3.0").unwrap();
        assert_eq!(outcome.decision.unwrap().prediction, PredictionLabel::CkdDetected);
    }

    #[test]
    fn assembler_is_shared() {
        let state = CoreState::from_assembler(DecisionAssembler::renal_only(), PathBuf::from("unused.db"));
        let a = state.assembler();
        let b = state.assembler();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn save_and_list_history() {
        let dir = tempfile::tempdir().unwrap();
        write_artifacts(dir.path());
        let state = CoreState::with_paths(dir.path().to_path_buf(), dir.path().join("db").join("records.db"));

        let decision = state
            .processor()
            .process_text("Age: 66\nSerum Creatinine: 2.8")
            .unwrap()
            .decision
            .unwrap();
        let saved = state.save_decision("Joseph", Some("male"), 66.0, &decision, "").unwrap();
        assert_eq!(saved.created_by, "system");

        let history = state.history(None).unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].id, saved.id);
        assert_eq!(history[0].diagnosis, PredictionLabel::CkdDetected);
    }
}
