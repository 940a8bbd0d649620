//! Export and import of the full dataset as a versioned envelope.
//!
//! Export serializes the whole store (or a single program subtree) into the
//! [`TrainingExport`] envelope. Import validates a payload completely
//! (structure, schema version, referential integrity) before opening the one
//! transaction that applies it, so a rejected payload never touches storage.

use crate::error::{Error, Result};
use crate::store::Store;
use crate::types::{
    now_timestamp, ExportData, ExportMode, ImportMode, Level, Move, Program, TrainingExport,
    UserSettings, WorkoutLog,
};
use serde_json::Value;
use std::collections::HashSet;

/// Container format version written into every envelope
pub const EXPORT_VERSION: &str = "1.0";

/// Schema version of the records this service reads and writes. Imports are
/// accepted when the major component matches.
pub const SCHEMA_VERSION: &str = "1.0.0";

/// Per-collection record counts for an accepted import payload
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub programs: usize,
    pub levels: usize,
    pub moves: usize,
    pub logs: usize,
    pub settings: usize,
}

/// The data-portability engine
pub struct PortabilityService<'a> {
    store: &'a mut Store,
}

impl<'a> PortabilityService<'a> {
    pub fn new(store: &'a mut Store) -> Self {
        Self { store }
    }

    // ========================================================================
    // Export
    // ========================================================================

    /// Export every collection. Programs and logs are sorted by `updatedAt`,
    /// levels and moves by `order`, so repeated exports of the same data are
    /// byte-identical apart from the export date.
    pub fn export_all(&self) -> TrainingExport {
        let data = self.store.data();

        let mut programs: Vec<Program> = data.programs.values().cloned().collect();
        programs.sort_by(|a, b| a.updated_at.cmp(&b.updated_at));

        let mut levels: Vec<Level> = data.levels.values().cloned().collect();
        levels.sort_by_key(|level| level.order);

        let mut moves: Vec<Move> = data.moves.values().cloned().collect();
        moves.sort_by_key(|entry| entry.order);

        let mut logs: Vec<WorkoutLog> = data.logs.values().cloned().collect();
        logs.sort_by(|a, b| a.updated_at.cmp(&b.updated_at));

        let settings = data
            .settings
            .clone()
            .unwrap_or_else(UserSettings::default_record);

        tracing::info!(
            "Exported full dataset: {} programs, {} levels, {} moves, {} logs",
            programs.len(),
            levels.len(),
            moves.len(),
            logs.len()
        );

        envelope(
            ExportMode::Full,
            ExportData {
                programs,
                levels,
                moves,
                logs,
                settings,
            },
        )
    }

    /// Export one program with its levels, their moves and (optionally) the
    /// logs referencing it.
    pub fn export_program(&self, program_id: &str, include_logs: bool) -> Result<TrainingExport> {
        let data = self.store.data();
        let program = data
            .programs
            .get(program_id)
            .cloned()
            .ok_or_else(|| Error::not_found("Program", program_id))?;

        let mut levels: Vec<Level> = data
            .levels
            .values()
            .filter(|level| level.program_id == program_id)
            .cloned()
            .collect();
        levels.sort_by_key(|level| level.order);

        let mut moves = Vec::new();
        for level in &levels {
            let mut entries: Vec<Move> = data
                .moves
                .values()
                .filter(|entry| entry.level_id == level.id)
                .cloned()
                .collect();
            entries.sort_by_key(|entry| entry.order);
            moves.extend(entries);
        }

        let mut logs: Vec<WorkoutLog> = if include_logs {
            data.logs
                .values()
                .filter(|log| log.program_id == program_id)
                .cloned()
                .collect()
        } else {
            Vec::new()
        };
        logs.sort_by(|a, b| a.updated_at.cmp(&b.updated_at));

        let settings = data
            .settings
            .clone()
            .unwrap_or_else(UserSettings::default_record);

        Ok(envelope(
            ExportMode::Program,
            ExportData {
                programs: vec![program],
                levels,
                moves,
                logs,
                settings,
            },
        ))
    }

    // ========================================================================
    // Import
    // ========================================================================

    /// Parse raw file contents and import them
    pub fn import_json(&mut self, json: &str, mode: ImportMode) -> Result<ImportSummary> {
        let payload: Value = serde_json::from_str(json)
            .map_err(|_| Error::InvalidFormat("payload is not valid JSON".into()))?;
        self.import_data(&payload, mode)
    }

    /// Validate a payload and apply it under the given policy.
    ///
    /// Validation runs entirely before the transaction opens: a payload that
    /// fails any check leaves the store byte-for-byte unchanged.
    pub fn import_data(&mut self, payload: &Value, mode: ImportMode) -> Result<ImportSummary> {
        let data = validate_envelope(payload)?;

        let schema_version = payload["schemaVersion"]
            .as_str()
            .unwrap_or_default()
            .to_string();
        if major_component(&schema_version) != major_component(SCHEMA_VERSION) {
            return Err(Error::SchemaVersionMismatch {
                found: schema_version,
                supported: SCHEMA_VERSION.to_string(),
            });
        }

        let programs = decode_records::<Program>(&data["programs"], "programs")?;
        let levels = decode_records::<Level>(&data["levels"], "levels")?;
        let moves = decode_records::<Move>(&data["moves"], "moves")?;
        let logs = decode_records::<WorkoutLog>(&data["logs"], "logs")?;
        let settings: UserSettings = serde_json::from_value(data["settings"].clone())
            .map_err(|e| Error::InvalidFormat(format!("data.settings: {}", e)))?;

        validate_references(&programs, &levels, &moves, &logs)?;

        let summary = ImportSummary {
            programs: programs.len(),
            levels: levels.len(),
            moves: moves.len(),
            logs: logs.len(),
            settings: 1,
        };

        self.store.transaction(move |data| {
            match mode {
                ImportMode::Replace => {
                    data.programs_repo().clear();
                    data.levels_repo().clear();
                    data.moves_repo().clear();
                    data.logs_repo().clear();
                    data.settings_store().clear();

                    // Incoming order values are trusted verbatim here; the
                    // next mutation through the ordering engine renumbers.
                    data.programs_repo().bulk_put(programs);
                    data.levels_repo().bulk_put(levels);
                    data.moves_repo().bulk_put(moves);
                    data.logs_repo().bulk_put(logs);
                    data.settings_store().put(settings);
                }
                ImportMode::Merge => {
                    for program in programs {
                        let existing = data.programs.get(&program.id).map(|p| p.updated_at.clone());
                        if is_newer_or_equal(&program.updated_at, existing.as_deref()) {
                            data.programs_repo().put(program);
                        }
                    }
                    for level in levels {
                        let existing = data.levels.get(&level.id).map(|l| l.updated_at.clone());
                        if is_newer_or_equal(&level.updated_at, existing.as_deref()) {
                            data.levels_repo().put(level);
                        }
                    }
                    for entry in moves {
                        let existing = data.moves.get(&entry.id).map(|m| m.updated_at.clone());
                        if is_newer_or_equal(&entry.updated_at, existing.as_deref()) {
                            data.moves_repo().put(entry);
                        }
                    }
                    for log in logs {
                        let existing = data.logs.get(&log.id).map(|l| l.updated_at.clone());
                        if is_newer_or_equal(&log.updated_at, existing.as_deref()) {
                            data.logs_repo().put(log);
                        }
                    }
                    let existing = data.settings.as_ref().map(|s| s.updated_at.clone());
                    if is_newer_or_equal(&settings.updated_at, existing.as_deref()) {
                        data.settings_store().put(settings);
                    }
                }
            }
            Ok(())
        })?;

        tracing::info!(
            "Imported {} programs, {} levels, {} moves, {} logs",
            summary.programs,
            summary.levels,
            summary.moves,
            summary.logs
        );
        Ok(summary)
    }
}

fn envelope(mode: ExportMode, data: ExportData) -> TrainingExport {
    TrainingExport {
        version: EXPORT_VERSION.to_string(),
        schema_version: SCHEMA_VERSION.to_string(),
        export_mode: mode,
        export_date: now_timestamp(),
        data,
    }
}

/// Structural checks on the raw payload, before any typed deserialization
fn validate_envelope(payload: &Value) -> Result<&serde_json::Map<String, Value>> {
    let root = payload
        .as_object()
        .ok_or_else(|| Error::InvalidFormat("root payload must be an object".into()))?;

    let has_versions = root.get("version").map_or(false, Value::is_string)
        && root.get("schemaVersion").map_or(false, Value::is_string);
    if !has_versions {
        return Err(Error::InvalidFormat("version fields are required".into()));
    }

    match root.get("exportMode").and_then(Value::as_str) {
        Some("full") | Some("program") => {}
        _ => {
            return Err(Error::InvalidFormat(
                "exportMode must be \"full\" or \"program\"".into(),
            ))
        }
    }

    let data = root
        .get("data")
        .and_then(Value::as_object)
        .ok_or_else(|| Error::InvalidFormat("data object is required".into()))?;

    for field in ["programs", "levels", "moves", "logs"] {
        if !data.get(field).map_or(false, Value::is_array) {
            return Err(Error::InvalidFormat(format!(
                "data.{} must be an array",
                field
            )));
        }
    }

    if !data.get("settings").map_or(false, Value::is_object) {
        return Err(Error::InvalidFormat(
            "data.settings object is required".into(),
        ));
    }

    Ok(data)
}

fn decode_records<T: serde::de::DeserializeOwned>(value: &Value, field: &str) -> Result<Vec<T>> {
    serde_json::from_value(value.clone())
        .map_err(|e| Error::InvalidFormat(format!("data.{}: {}", field, e)))
}

/// Referential integrity over the incoming payload only, independent of
/// whatever is already stored
fn validate_references(
    programs: &[Program],
    levels: &[Level],
    moves: &[Move],
    logs: &[WorkoutLog],
) -> Result<()> {
    let program_ids: HashSet<&str> = programs.iter().map(|p| p.id.as_str()).collect();
    let level_ids: HashSet<&str> = levels.iter().map(|l| l.id.as_str()).collect();
    let move_ids: HashSet<&str> = moves.iter().map(|m| m.id.as_str()).collect();

    for level in levels {
        if !program_ids.contains(level.program_id.as_str()) {
            return Err(Error::ReferentialIntegrity(format!(
                "missing program {} for level {}",
                level.program_id, level.id
            )));
        }
    }

    for entry in moves {
        if !level_ids.contains(entry.level_id.as_str()) {
            return Err(Error::ReferentialIntegrity(format!(
                "missing level {} for move {}",
                entry.level_id, entry.id
            )));
        }
    }

    for log in logs {
        if !program_ids.contains(log.program_id.as_str()) {
            return Err(Error::ReferentialIntegrity(format!(
                "missing program {} for log {}",
                log.program_id, log.id
            )));
        }
        if !level_ids.contains(log.level_id.as_str()) {
            return Err(Error::ReferentialIntegrity(format!(
                "missing level {} for log {}",
                log.level_id, log.id
            )));
        }
        if let Some(move_id) = &log.move_id {
            if !move_ids.contains(move_id.as_str()) {
                return Err(Error::ReferentialIntegrity(format!(
                    "missing move {} for log {}",
                    move_id, log.id
                )));
            }
        }
    }

    Ok(())
}

fn major_component(version: &str) -> &str {
    version.split('.').next().unwrap_or(version)
}

/// Whether the incoming record wins against the stored one.
///
/// Timestamps that parse as RFC 3339 are compared as instants; otherwise the
/// raw strings are compared lexicographically. A tie favors the incoming
/// record, and a missing stored record always loses.
fn is_newer_or_equal(incoming: &str, existing: Option<&str>) -> bool {
    let existing = match existing {
        Some(existing) => existing,
        None => return true,
    };

    let incoming_instant = chrono::DateTime::parse_from_rfc3339(incoming);
    let existing_instant = chrono::DateTime::parse_from_rfc3339(existing);

    match (incoming_instant, existing_instant) {
        (Ok(a), Ok(b)) => a >= b,
        _ => incoming >= existing,
    }
}
