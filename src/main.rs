use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use nephrolens::config;
use nephrolens::core_state::CoreState;
use nephrolens::models::{DecisionResponse, FeatureForm, Sex};
use nephrolens::pipeline::renal::assess_renal_function;

#[derive(Parser)]
#[command(name = "nephrolens", version, about = "CKD risk and TDF safety from lab reports")]
struct Cli {
    /// Classifier artifact directory (defaults to NEPHROLENS_MODEL_DIR or <data dir>/models)
    #[arg(long, value_name = "DIR", global = true)]
    models_dir: Option<PathBuf>,

    /// Patient record database (defaults to <data dir>/records.db)
    #[arg(long, value_name = "FILE", global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract features from a report and assemble a decision
    Analyze {
        /// Report file (plain text; PDF with the `pdfium` feature)
        #[arg(value_name = "REPORT")]
        report: PathBuf,

        /// Save the decision to the patient history
        #[arg(long)]
        save: bool,

        /// Patient name for the saved record
        #[arg(long, default_value = "Unknown")]
        name: String,

        /// Patient gender for the saved record
        #[arg(long)]
        gender: Option<String>,

        /// Author of the saved record
        #[arg(long, default_value = "system")]
        created_by: String,
    },

    /// Predict from a JSON feature form (`-` reads stdin)
    Predict {
        #[arg(value_name = "FORM")]
        form: PathBuf,
    },

    /// eGFR, CKD stage and TDF verdict only
    Gfr {
        /// Age in years
        #[arg(long, value_parser = parse_age)]
        age: f64,

        /// Serum creatinine in mg/dL
        #[arg(long, value_parser = parse_finite)]
        creatinine: f64,

        #[arg(long, default_value = "male")]
        sex: String,
    },

    /// List saved patient records, newest first
    History {
        #[arg(long)]
        limit: Option<usize>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    nephrolens::init_tracing();

    let state = CoreState::with_paths(
        cli.models_dir.unwrap_or_else(config::models_dir),
        cli.db.unwrap_or_else(config::database_path),
    );

    match cli.command {
        Commands::Analyze {
            report,
            save,
            name,
            gender,
            created_by,
        } => {
            let outcome = state
                .processor()
                .process_file(&report)
                .with_context(|| format!("failed to analyze {}", report.display()))?;

            if save {
                let Some(decision) = outcome.decision.as_ref() else {
                    bail!("classifier unavailable, nothing to save");
                };
                let record = state.save_decision(
                    &name,
                    gender.as_deref(),
                    outcome.features.age,
                    decision,
                    &created_by,
                )?;
                tracing::info!(id = %record.id, "Record saved");
            }

            print_json(&outcome)?;
        }
        Commands::Predict { form } => {
            let form = read_form(&form)?;
            let payload = state.assembler().predict(&form)?;
            print_json(&DecisionResponse::from(&payload))?;
        }
        Commands::Gfr {
            age,
            creatinine,
            sex,
        } => {
            let sex: Sex = sex.parse()?;
            print_json(&assess_renal_function(age, creatinine, sex))?;
        }
        Commands::History { limit } => {
            print_json(&state.history(limit)?)?;
        }
    }

    Ok(())
}

fn parse_finite(raw: &str) -> Result<f64, String> {
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(format!("`{raw}` is not a finite number")),
    }
}

fn parse_age(raw: &str) -> Result<f64, String> {
    let age = parse_finite(raw)?;
    if age < 0.0 {
        return Err(format!("age must not be negative, got {age}"));
    }
    Ok(age)
}

fn read_form(path: &Path) -> Result<FeatureForm> {
    let raw = if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?
    };
    serde_json::from_str(&raw).context("feature form must be a JSON object")
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
