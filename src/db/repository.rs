use std::str::FromStr;

use chrono::NaiveDateTime;
use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use super::DatabaseError;
use crate::models::*;

const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// ═══════════════════════════════════════════
// Patient Record Repository
// ═══════════════════════════════════════════

pub fn insert_patient_record(conn: &Connection, record: &PatientRecord) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO patient_records (id, name, recorded_at, age, gender, diagnosis,
         stage, tdf_status, gfr, created_by)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            record.id.to_string(),
            record.name,
            record.recorded_at.format(DATETIME_FORMAT).to_string(),
            record.age,
            record.gender,
            record.diagnosis.as_str(),
            record.stage.as_str(),
            record.tdf_status.as_str(),
            record.gfr,
            record.created_by,
        ],
    )?;
    tracing::debug!(id = %record.id, diagnosis = record.diagnosis.as_str(), "Patient record saved");
    Ok(())
}

pub fn get_patient_record(conn: &Connection, id: &Uuid) -> Result<PatientRecord, DatabaseError> {
    let row = conn
        .query_row(
            "SELECT id, name, recorded_at, age, gender, diagnosis, stage, tdf_status, gfr, created_by
             FROM patient_records WHERE id = ?1",
            params![id.to_string()],
            record_row_from_rusqlite,
        )
        .optional()?;

    match row {
        Some(row) => record_from_row(row),
        None => Err(DatabaseError::NotFound {
            entity_type: "PatientRecord".into(),
            id: id.to_string(),
        }),
    }
}

/// Saved records, newest first.
pub fn list_patient_records(
    conn: &Connection,
    limit: Option<usize>,
) -> Result<Vec<PatientRecord>, DatabaseError> {
    let limit = limit.map_or(-1, |l| i64::try_from(l).unwrap_or(i64::MAX));
    let mut stmt = conn.prepare(
        "SELECT id, name, recorded_at, age, gender, diagnosis, stage, tdf_status, gfr, created_by
         FROM patient_records ORDER BY recorded_at DESC, rowid DESC LIMIT ?1",
    )?;

    let rows = stmt.query_map(params![limit], record_row_from_rusqlite)?;

    let mut records = Vec::new();
    for row in rows {
        records.push(record_from_row(row?)?);
    }
    Ok(records)
}

pub fn delete_patient_record(conn: &Connection, id: &Uuid) -> Result<(), DatabaseError> {
    let deleted = conn.execute(
        "DELETE FROM patient_records WHERE id = ?1",
        params![id.to_string()],
    )?;
    if deleted == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "PatientRecord".into(),
            id: id.to_string(),
        });
    }
    Ok(())
}

// Internal row type for PatientRecord mapping
struct RecordRow {
    id: String,
    name: String,
    recorded_at: String,
    age: f64,
    gender: Option<String>,
    diagnosis: String,
    stage: String,
    tdf_status: String,
    gfr: f64,
    created_by: String,
}

fn record_row_from_rusqlite(row: &rusqlite::Row<'_>) -> Result<RecordRow, rusqlite::Error> {
    Ok(RecordRow {
        id: row.get(0)?,
        name: row.get(1)?,
        recorded_at: row.get(2)?,
        age: row.get(3)?,
        gender: row.get(4)?,
        diagnosis: row.get(5)?,
        stage: row.get(6)?,
        tdf_status: row.get(7)?,
        gfr: row.get(8)?,
        created_by: row.get(9)?,
    })
}

fn record_from_row(row: RecordRow) -> Result<PatientRecord, DatabaseError> {
    Ok(PatientRecord {
        id: Uuid::parse_str(&row.id)
            .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
        name: row.name,
        recorded_at: NaiveDateTime::parse_from_str(&row.recorded_at, DATETIME_FORMAT)
            .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
        age: row.age,
        gender: row.gender,
        diagnosis: PredictionLabel::from_str(&row.diagnosis)?,
        stage: CkdStage::from_str(&row.stage)?,
        tdf_status: TdfStatus::from_str(&row.tdf_status)?,
        gfr: row.gfr,
        created_by: row.created_by,
    })
}
