//! Core domain types for the PlanTrack training planner.
//!
//! This module defines the fundamental types used throughout the system:
//! - The training hierarchy (programs, levels, moves)
//! - Workout logs and user settings
//! - Sync extension-point records (queue entries and conflicts)
//! - The export envelope used for backup and restore

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Entity identifiers are opaque strings. Locally created records use UUID v4,
/// but imported records keep whatever id their source assigned.
pub type EntityId = String;

/// Timestamps are RFC 3339 strings rather than parsed date types. The merge
/// importer must fall back to lexicographic comparison for timestamps that do
/// not parse, and imported records must round-trip byte-for-byte.
pub type Timestamp = String;

/// Fixed id of the singleton settings record
pub const SETTINGS_ID: &str = "settings";

/// Generate a fresh entity id
pub fn new_entity_id() -> EntityId {
    Uuid::new_v4().to_string()
}

/// Current time as an RFC 3339 string with millisecond precision
pub fn now_timestamp() -> Timestamp {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

// ============================================================================
// Hierarchy Types
// ============================================================================

/// Difficulty rating of a program
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum Difficulty {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

/// Type of move/exercise
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum MoveKind {
    #[default]
    Strength,
    Cardio,
    Mobility,
    Stretching,
    Other,
}

/// A training program, root of the hierarchy
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Program {
    pub id: EntityId,
    pub name: String,
    pub description: String,
    pub goal: String,
    pub duration: String,
    pub difficulty: Difficulty,
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default)]
    pub custom_fields: Map<String, Value>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// An ordered phase/week within a program.
///
/// `order` is 1-based and contiguous within the owning program.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Level {
    pub id: EntityId,
    pub program_id: EntityId,
    pub name: String,
    pub description: String,
    pub order: u32,
    pub duration: String,
    pub rest_days: u32,
    pub notes: String,
    #[serde(default)]
    pub custom_fields: Map<String, Value>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// An ordered exercise/activity within a level.
///
/// `order` is 1-based and contiguous within the owning level.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Move {
    pub id: EntityId,
    pub level_id: EntityId,
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: MoveKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_sets: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_reps: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_weight: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rest_between_sets: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub equipment: Vec<String>,
    pub notes: String,
    pub order: u32,
    #[serde(default)]
    pub custom_fields: Map<String, Value>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

// ============================================================================
// Log and Settings Types
// ============================================================================

/// A record of actual performance against a program/level/(optionally) move.
///
/// Logs reference but are not owned by the hierarchy; they are only scrubbed
/// when the referenced level or program is deleted.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutLog {
    pub id: EntityId,
    pub program_id: EntityId,
    pub level_id: EntityId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub move_id: Option<EntityId>,
    pub date: Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_sets: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_reps: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_weight: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub perceived_effort: Option<u8>,
    pub notes: String,
    pub completed: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Unit system preference
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UnitPreference {
    Metric,
    Imperial,
}

/// Singleton user settings record, keyed by [`SETTINGS_ID`].
///
/// The remote fields are reserved for a future sync feature and are carried
/// through export/import untouched.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserSettings {
    pub id: EntityId,
    pub sync_enabled: bool,
    #[serde(
        default,
        rename = "supabaseUrl",
        skip_serializing_if = "Option::is_none"
    )]
    pub remote_url: Option<String>,
    #[serde(
        default,
        rename = "supabaseAnonKey",
        skip_serializing_if = "Option::is_none"
    )]
    pub remote_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_sync: Option<Timestamp>,
    pub dark_mode: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_preference: Option<UnitPreference>,
    pub updated_at: Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_fields: Option<Map<String, Value>>,
}

impl UserSettings {
    /// Fallback record used when no settings have been stored yet
    pub fn default_record() -> Self {
        Self {
            id: SETTINGS_ID.to_string(),
            sync_enabled: false,
            remote_url: None,
            remote_key: None,
            last_sync: None,
            dark_mode: true,
            unit_preference: None,
            updated_at: now_timestamp(),
            custom_fields: None,
        }
    }
}

// ============================================================================
// Sync Extension Points
// ============================================================================

/// Operation kind recorded in the pending-operations queue
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SyncOperation {
    Create,
    Update,
    Delete,
}

/// A pending operation awaiting upload by a future sync layer.
///
/// The store carries this collection but nothing in this crate populates it.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SyncQueueItem {
    pub id: EntityId,
    pub entity: String,
    pub entity_id: EntityId,
    pub operation: SyncOperation,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Map<String, Value>>,
    pub created_at: Timestamp,
}

/// A recorded local/remote conflict for a future sync layer to resolve
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SyncConflict {
    pub id: EntityId,
    pub entity: String,
    pub entity_id: EntityId,
    pub local_updated_at: Timestamp,
    pub remote_updated_at: Timestamp,
    pub created_at: Timestamp,
}

// ============================================================================
// Export Envelope
// ============================================================================

/// Whether an envelope carries the whole dataset or a single program subtree
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ExportMode {
    Full,
    Program,
}

/// Conflict policy applied when re-ingesting an envelope
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImportMode {
    /// Per record id, keep whichever of stored/incoming has the newer `updatedAt`
    Merge,
    /// Discard all existing records and write the incoming set verbatim
    Replace,
}

/// The record bundle inside an export envelope
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ExportData {
    pub programs: Vec<Program>,
    pub levels: Vec<Level>,
    pub moves: Vec<Move>,
    pub logs: Vec<WorkoutLog>,
    pub settings: UserSettings,
}

/// The versioned container format used for backup and restore.
///
/// This is the sole wire/file format. An importer accepts any payload whose
/// `schemaVersion` major component equals its own.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TrainingExport {
    pub version: String,
    pub schema_version: String,
    pub export_mode: ExportMode,
    pub export_date: Timestamp,
    pub data: ExportData,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamps_are_sortable_rfc3339() {
        let first = now_timestamp();
        let second = now_timestamp();
        assert!(second >= first);
        assert!(first.ends_with('Z'));
        assert!(chrono::DateTime::parse_from_rfc3339(&first).is_ok());
    }

    #[test]
    fn test_program_wire_format_uses_camel_case() {
        let program = Program {
            id: "p1".into(),
            name: "Strength Builder".into(),
            description: String::new(),
            goal: String::new(),
            duration: String::new(),
            difficulty: Difficulty::Intermediate,
            tags: vec!["barbell".into()],
            color: None,
            custom_fields: Map::new(),
            created_at: "2024-01-01T00:00:00.000Z".into(),
            updated_at: "2024-01-01T00:00:00.000Z".into(),
        };

        let value = serde_json::to_value(&program).unwrap();
        assert_eq!(value["createdAt"], "2024-01-01T00:00:00.000Z");
        assert_eq!(value["difficulty"], "Intermediate");
        assert!(value.get("color").is_none());
        assert!(value.get("customFields").is_some());
    }

    #[test]
    fn test_move_kind_serializes_as_type_field() {
        let json = r#"{
            "id": "m1",
            "levelId": "l1",
            "name": "Squat",
            "description": "",
            "type": "Cardio",
            "equipment": [],
            "notes": "",
            "order": 1,
            "createdAt": "2024-01-01T00:00:00.000Z",
            "updatedAt": "2024-01-01T00:00:00.000Z"
        }"#;

        let parsed: Move = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.kind, MoveKind::Cardio);
        assert!(parsed.target_sets.is_none());

        let back = serde_json::to_value(&parsed).unwrap();
        assert_eq!(back["type"], "Cardio");
        assert_eq!(back["levelId"], "l1");
    }

    #[test]
    fn test_settings_remote_fields_keep_wire_names() {
        let mut settings = UserSettings::default_record();
        settings.remote_url = Some("https://example.test".into());

        let value = serde_json::to_value(&settings).unwrap();
        assert_eq!(value["supabaseUrl"], "https://example.test");
        assert!(value.get("supabaseAnonKey").is_none());
        assert_eq!(value["id"], SETTINGS_ID);
    }
}
