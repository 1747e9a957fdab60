use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "NephroLens";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Overrides the application data directory.
pub const DATA_DIR_ENV: &str = "NEPHROLENS_DATA_DIR";

/// Overrides the classifier artifact directory.
pub const MODEL_DIR_ENV: &str = "NEPHROLENS_MODEL_DIR";

/// Feature scaler artifact (standard-score mean/scale pairs).
pub const SCALER_FILE: &str = "scaler.json";

/// Logistic classifier artifact (coefficients + intercept).
pub const LOGISTIC_MODEL_FILE: &str = "classifier.json";

/// ONNX classifier artifact, used when the `onnx-classifier` feature is enabled.
pub const ONNX_MODEL_FILE: &str = "classifier.onnx";

/// Patient record database file name.
pub const DATABASE_FILE: &str = "records.db";

/// Default tracing filter when `RUST_LOG` is unset.
pub fn default_log_filter() -> &'static str {
    "nephrolens=info"
}

/// Get the application data directory.
/// `NEPHROLENS_DATA_DIR` if set, otherwise ~/NephroLens/.
/// Falls back to the working directory when no home directory can be determined.
pub fn app_data_dir() -> PathBuf {
    if let Some(dir) = std::env::var_os(DATA_DIR_ENV) {
        return PathBuf::from(dir);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Get the classifier artifact directory.
pub fn models_dir() -> PathBuf {
    match std::env::var_os(MODEL_DIR_ENV) {
        Some(dir) => PathBuf::from(dir),
        None => app_data_dir().join("models"),
    }
}

/// Get the patient record database path.
pub fn database_path() -> PathBuf {
    app_data_dir().join(DATABASE_FILE)
}
