//! Generic per-collection CRUD access.
//!
//! One parametric repository type covers all four record collections; no
//! validation lives here, invariants are enforced by the services above.
//! Settings are a singleton and get their own wrapper instead of a
//! collection entry with implicit uniqueness.

use crate::store::StoreData;
use crate::types::{EntityId, Level, Move, Program, UserSettings, WorkoutLog};
use std::collections::BTreeMap;

/// Anything with a unique string id
pub trait Entity {
    fn id(&self) -> &str;
}

impl Entity for Program {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Entity for Level {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Entity for Move {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Entity for WorkoutLog {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Typed CRUD wrapper over one collection. Pure storage access.
pub struct Repository<'a, T> {
    entries: &'a mut BTreeMap<EntityId, T>,
}

impl<'a, T: Entity + Clone> Repository<'a, T> {
    pub fn new(entries: &'a mut BTreeMap<EntityId, T>) -> Self {
        Self { entries }
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.entries.get(id)
    }

    pub fn list(&self) -> Vec<T> {
        self.entries.values().cloned().collect()
    }

    /// Insert-or-replace by id
    pub fn put(&mut self, entity: T) {
        self.entries.insert(entity.id().to_string(), entity);
    }

    pub fn bulk_put(&mut self, entities: impl IntoIterator<Item = T>) {
        for entity in entities {
            self.put(entity);
        }
    }

    /// Returns true if a record was removed
    pub fn delete(&mut self, id: &str) -> bool {
        self.entries.remove(id).is_some()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Single-row store for the settings record
pub struct SettingsStore<'a> {
    slot: &'a mut Option<UserSettings>,
}

impl<'a> SettingsStore<'a> {
    pub fn new(slot: &'a mut Option<UserSettings>) -> Self {
        Self { slot }
    }

    pub fn get(&self) -> Option<&UserSettings> {
        self.slot.as_ref()
    }

    pub fn put(&mut self, settings: UserSettings) {
        *self.slot = Some(settings);
    }

    pub fn clear(&mut self) {
        *self.slot = None;
    }
}

impl StoreData {
    pub fn programs_repo(&mut self) -> Repository<'_, Program> {
        Repository::new(&mut self.programs)
    }

    pub fn levels_repo(&mut self) -> Repository<'_, Level> {
        Repository::new(&mut self.levels)
    }

    pub fn moves_repo(&mut self) -> Repository<'_, Move> {
        Repository::new(&mut self.moves)
    }

    pub fn logs_repo(&mut self) -> Repository<'_, WorkoutLog> {
        Repository::new(&mut self.logs)
    }

    pub fn settings_store(&mut self) -> SettingsStore<'_> {
        SettingsStore::new(&mut self.settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{now_timestamp, Difficulty, SETTINGS_ID};
    use serde_json::Map;

    fn sample_program(id: &str) -> Program {
        let timestamp = now_timestamp();
        Program {
            id: id.into(),
            name: format!("Program {}", id),
            description: String::new(),
            goal: String::new(),
            duration: String::new(),
            difficulty: Difficulty::Beginner,
            tags: vec![],
            color: None,
            custom_fields: Map::new(),
            created_at: timestamp.clone(),
            updated_at: timestamp,
        }
    }

    #[test]
    fn test_put_replaces_by_id() {
        let mut entries = BTreeMap::new();
        let mut repo = Repository::new(&mut entries);

        repo.put(sample_program("p1"));
        let mut renamed = sample_program("p1");
        renamed.name = "Renamed".into();
        repo.put(renamed);

        assert_eq!(repo.list().len(), 1);
        assert_eq!(repo.get("p1").unwrap().name, "Renamed");
    }

    #[test]
    fn test_delete_reports_presence() {
        let mut entries = BTreeMap::new();
        let mut repo = Repository::new(&mut entries);
        repo.put(sample_program("p1"));

        assert!(repo.delete("p1"));
        assert!(!repo.delete("p1"));
        assert!(repo.get("p1").is_none());
    }

    #[test]
    fn test_bulk_put_and_clear() {
        let mut entries = BTreeMap::new();
        let mut repo = Repository::new(&mut entries);
        repo.bulk_put(vec![sample_program("a"), sample_program("b")]);
        assert_eq!(repo.list().len(), 2);

        repo.clear();
        assert!(repo.list().is_empty());
    }

    #[test]
    fn test_settings_store_is_singleton() {
        let mut slot = None;
        let mut settings = SettingsStore::new(&mut slot);
        assert!(settings.get().is_none());

        settings.put(crate::types::UserSettings::default_record());
        settings.put(crate::types::UserSettings::default_record());
        assert_eq!(settings.get().unwrap().id, SETTINGS_ID);

        settings.clear();
        assert!(settings.get().is_none());
    }
}
