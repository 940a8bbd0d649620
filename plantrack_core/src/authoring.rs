//! Hierarchy-aware authoring over programs, levels and moves.
//!
//! This service owns every mutation of the training hierarchy: create,
//! update, delete and duplicate at all three levels, plus workout logging
//! and the settings record. Parent existence is checked before any child
//! write, deletes cascade, and every multi-record write happens inside one
//! store transaction so a failure partway is never observable.

use crate::error::{Error, Result};
use crate::ordering;
use crate::store::{Store, StoreData};
use crate::types::{
    new_entity_id, now_timestamp, Difficulty, EntityId, Level, Move, MoveKind, Program,
    Timestamp, UnitPreference, UserSettings, WorkoutLog,
};
use serde_json::{Map, Value};
use std::collections::HashSet;

/// Input for creating a program. Only `name` is required.
#[derive(Clone, Debug, Default)]
pub struct ProgramInput {
    pub name: String,
    pub description: Option<String>,
    pub goal: Option<String>,
    pub duration: Option<String>,
    pub difficulty: Option<Difficulty>,
    pub tags: Option<Vec<String>>,
    pub color: Option<String>,
    pub custom_fields: Option<Map<String, Value>>,
}

/// Partial update for a program; absent fields keep their current value
#[derive(Clone, Debug, Default)]
pub struct ProgramPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub goal: Option<String>,
    pub duration: Option<String>,
    pub difficulty: Option<Difficulty>,
    pub tags: Option<Vec<String>>,
    pub color: Option<String>,
    pub custom_fields: Option<Map<String, Value>>,
}

/// Input for creating a level. `order` of `None` appends.
#[derive(Clone, Debug, Default)]
pub struct LevelInput {
    pub name: String,
    pub description: Option<String>,
    pub duration: Option<String>,
    pub rest_days: Option<u32>,
    pub notes: Option<String>,
    pub order: Option<u32>,
    pub custom_fields: Option<Map<String, Value>>,
}

/// Partial update for a level; a present `order` moves it within its program
#[derive(Clone, Debug, Default)]
pub struct LevelPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub duration: Option<String>,
    pub rest_days: Option<u32>,
    pub notes: Option<String>,
    pub order: Option<u32>,
    pub custom_fields: Option<Map<String, Value>>,
}

/// Input for creating a move. `order` of `None` appends.
#[derive(Clone, Debug, Default)]
pub struct MoveInput {
    pub name: String,
    pub description: Option<String>,
    pub kind: Option<MoveKind>,
    pub target_sets: Option<u32>,
    pub target_reps: Option<String>,
    pub target_weight: Option<String>,
    pub target_time: Option<String>,
    pub rest_between_sets: Option<String>,
    pub video_url: Option<String>,
    pub image_url: Option<String>,
    pub equipment: Option<Vec<String>>,
    pub notes: Option<String>,
    pub order: Option<u32>,
    pub custom_fields: Option<Map<String, Value>>,
}

/// Partial update for a move; a present `order` moves it within its level
#[derive(Clone, Debug, Default)]
pub struct MovePatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub kind: Option<MoveKind>,
    pub target_sets: Option<u32>,
    pub target_reps: Option<String>,
    pub target_weight: Option<String>,
    pub target_time: Option<String>,
    pub rest_between_sets: Option<String>,
    pub video_url: Option<String>,
    pub image_url: Option<String>,
    pub equipment: Option<Vec<String>>,
    pub notes: Option<String>,
    pub order: Option<u32>,
    pub custom_fields: Option<Map<String, Value>>,
}

/// Input for recording a workout against the hierarchy
#[derive(Clone, Debug, Default)]
pub struct LogInput {
    pub program_id: EntityId,
    pub level_id: EntityId,
    pub move_id: Option<EntityId>,
    pub date: Option<Timestamp>,
    pub actual_sets: Option<u32>,
    pub actual_reps: Option<String>,
    pub actual_weight: Option<String>,
    pub perceived_effort: Option<u8>,
    pub notes: Option<String>,
    pub completed: bool,
}

/// Partial update for the singleton settings record
#[derive(Clone, Debug, Default)]
pub struct SettingsPatch {
    pub sync_enabled: Option<bool>,
    pub dark_mode: Option<bool>,
    pub unit_preference: Option<UnitPreference>,
    pub remote_url: Option<String>,
    pub remote_key: Option<String>,
    pub custom_fields: Option<Map<String, Value>>,
}

/// A program with its full subtree, levels and moves sorted by order
#[derive(Clone, Debug)]
pub struct ProgramTree {
    pub program: Program,
    pub levels: Vec<Level>,
    pub moves: Vec<Move>,
}

/// The data-authoring engine
pub struct AuthoringService<'a> {
    store: &'a mut Store,
}

impl<'a> AuthoringService<'a> {
    pub fn new(store: &'a mut Store) -> Self {
        Self { store }
    }

    // ========================================================================
    // Programs
    // ========================================================================

    pub fn list_programs(&self) -> Vec<Program> {
        let mut programs: Vec<Program> = self.store.data().programs.values().cloned().collect();
        programs.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        programs
    }

    pub fn get_program(&self, program_id: &str) -> Option<Program> {
        self.store.data().programs.get(program_id).cloned()
    }

    pub fn create_program(&mut self, input: ProgramInput) -> Result<Program> {
        let name = validated_name(&input.name)?;
        let timestamp = now_timestamp();
        let program = Program {
            id: new_entity_id(),
            name,
            description: trimmed(input.description),
            goal: trimmed(input.goal),
            duration: trimmed(input.duration),
            difficulty: input.difficulty.unwrap_or_default(),
            tags: input.tags.unwrap_or_default(),
            color: input.color,
            custom_fields: input.custom_fields.unwrap_or_default(),
            created_at: timestamp.clone(),
            updated_at: timestamp,
        };

        let created = program.clone();
        self.store.transaction(|data| {
            data.programs_repo().put(program);
            Ok(())
        })?;

        tracing::info!("Created program {}", created.id);
        Ok(created)
    }

    pub fn update_program(&mut self, program_id: &str, patch: ProgramPatch) -> Result<Program> {
        let mut updated = self.require_program(program_id)?;

        if let Some(name) = patch.name {
            updated.name = validated_name(&name)?;
        }
        if let Some(description) = patch.description {
            updated.description = description.trim().to_string();
        }
        if let Some(goal) = patch.goal {
            updated.goal = goal.trim().to_string();
        }
        if let Some(duration) = patch.duration {
            updated.duration = duration.trim().to_string();
        }
        if let Some(difficulty) = patch.difficulty {
            updated.difficulty = difficulty;
        }
        if let Some(tags) = patch.tags {
            updated.tags = tags;
        }
        if let Some(color) = patch.color {
            updated.color = Some(color);
        }
        if let Some(custom_fields) = patch.custom_fields {
            updated.custom_fields = custom_fields;
        }
        updated.updated_at = now_timestamp();

        let result = updated.clone();
        self.store.transaction(|data| {
            data.programs_repo().put(updated);
            Ok(())
        })?;

        Ok(result)
    }

    /// Delete a program and everything under it: its logs, its levels and
    /// their moves. One transaction, so a partial cascade is never visible.
    pub fn delete_program(&mut self, program_id: &str) -> Result<()> {
        self.require_program(program_id)?;
        let id = program_id.to_string();

        self.store.transaction(move |data| {
            let level_ids: HashSet<EntityId> = data
                .levels
                .values()
                .filter(|level| level.program_id == id)
                .map(|level| level.id.clone())
                .collect();

            delete_logs_for_program(data, &id);
            delete_moves_under(data, &level_ids);

            let doomed: Vec<EntityId> = level_ids.into_iter().collect();
            let mut levels = data.levels_repo();
            for level_id in &doomed {
                levels.delete(level_id);
            }

            data.programs_repo().delete(&id);
            Ok(())
        })?;

        tracing::info!("Deleted program {} and its subtree", program_id);
        Ok(())
    }

    /// Deep-copy a program with fresh ids throughout; the copy's name gets a
    /// " (Copy)" suffix and order values are preserved.
    pub fn duplicate_program(&mut self, program_id: &str) -> Result<ProgramTree> {
        let source = self.require_program(program_id)?;
        let levels = self.list_levels(program_id);
        let timestamp = now_timestamp();

        let copy = Program {
            id: new_entity_id(),
            name: format!("{} (Copy)", source.name),
            created_at: timestamp.clone(),
            updated_at: timestamp.clone(),
            ..source
        };

        let mut copied_levels = Vec::with_capacity(levels.len());
        let mut copied_moves = Vec::new();
        for (index, level) in levels.into_iter().enumerate() {
            let new_level_id = new_entity_id();
            for source_move in self.list_moves(&level.id) {
                copied_moves.push(Move {
                    id: new_entity_id(),
                    level_id: new_level_id.clone(),
                    created_at: timestamp.clone(),
                    updated_at: timestamp.clone(),
                    ..source_move
                });
            }
            copied_levels.push(Level {
                id: new_level_id,
                program_id: copy.id.clone(),
                order: index as u32 + 1,
                created_at: timestamp.clone(),
                updated_at: timestamp.clone(),
                ..level
            });
        }

        let tree = ProgramTree {
            program: copy.clone(),
            levels: copied_levels.clone(),
            moves: copied_moves.clone(),
        };

        self.store.transaction(move |data| {
            data.programs_repo().put(copy);
            data.levels_repo().bulk_put(copied_levels);
            data.moves_repo().bulk_put(copied_moves);
            Ok(())
        })?;

        tracing::info!(
            "Duplicated program {} as {}",
            program_id,
            tree.program.id
        );
        Ok(tree)
    }

    /// The program with its levels and moves, each group sorted by order
    pub fn program_tree(&self, program_id: &str) -> Result<ProgramTree> {
        let program = self.require_program(program_id)?;
        let levels = self.list_levels(program_id);
        let mut moves = Vec::new();
        for level in &levels {
            moves.extend(self.list_moves(&level.id));
        }
        Ok(ProgramTree {
            program,
            levels,
            moves,
        })
    }

    // ========================================================================
    // Levels
    // ========================================================================

    pub fn list_levels(&self, program_id: &str) -> Vec<Level> {
        let mut levels: Vec<Level> = self
            .store
            .data()
            .levels
            .values()
            .filter(|level| level.program_id == program_id)
            .cloned()
            .collect();
        levels.sort_by_key(|level| level.order);
        levels
    }

    pub fn create_level(&mut self, program_id: &str, input: LevelInput) -> Result<Level> {
        self.require_program(program_id)?;
        let name = validated_name(&input.name)?;
        let siblings = self.list_levels(program_id);
        let order = ordering::clamped_insertion_order(input.order, siblings.len());
        let timestamp = now_timestamp();

        let level = Level {
            id: new_entity_id(),
            program_id: program_id.to_string(),
            name,
            description: trimmed(input.description),
            order,
            duration: trimmed(input.duration),
            rest_days: input.rest_days.unwrap_or(0),
            notes: trimmed(input.notes),
            custom_fields: input.custom_fields.unwrap_or_default(),
            created_at: timestamp.clone(),
            updated_at: timestamp,
        };
        let level_id = level.id.clone();

        let mut group = siblings;
        group.push(level);
        let normalized = ordering::reorder(group, &level_id, order);
        let created = find_by_id(&normalized, &level_id)?;

        self.store.transaction(move |data| {
            data.levels_repo().bulk_put(normalized);
            Ok(())
        })?;

        tracing::info!("Created level {} in program {}", created.id, program_id);
        Ok(created)
    }

    pub fn update_level(&mut self, level_id: &str, patch: LevelPatch) -> Result<Level> {
        let existing = self.require_level(level_id)?;
        let siblings = self.list_levels(&existing.program_id);
        let desired_order = ordering::clamped_insertion_order(
            Some(patch.order.unwrap_or(existing.order)),
            siblings.len(),
        );

        let mut updated = existing;
        if let Some(name) = patch.name {
            updated.name = validated_name(&name)?;
        }
        if let Some(description) = patch.description {
            updated.description = description.trim().to_string();
        }
        if let Some(duration) = patch.duration {
            updated.duration = duration.trim().to_string();
        }
        if let Some(rest_days) = patch.rest_days {
            updated.rest_days = rest_days;
        }
        if let Some(notes) = patch.notes {
            updated.notes = notes.trim().to_string();
        }
        if let Some(custom_fields) = patch.custom_fields {
            updated.custom_fields = custom_fields;
        }
        updated.order = desired_order;
        updated.updated_at = now_timestamp();

        let group: Vec<Level> = siblings
            .into_iter()
            .map(|level| {
                if level.id == level_id {
                    updated.clone()
                } else {
                    level
                }
            })
            .collect();
        let normalized = ordering::reorder(group, level_id, desired_order);
        let result = find_by_id(&normalized, level_id)?;

        self.store.transaction(move |data| {
            data.levels_repo().bulk_put(normalized);
            Ok(())
        })?;

        Ok(result)
    }

    /// Delete a level, its moves and its logs, then close the order gap in
    /// the surviving siblings, all in one transaction.
    pub fn delete_level(&mut self, level_id: &str) -> Result<()> {
        let level = self.require_level(level_id)?;
        let id = level_id.to_string();
        let program_id = level.program_id;

        self.store.transaction(move |data| {
            delete_logs_for_level(data, &id);

            let doomed: HashSet<EntityId> = std::iter::once(id.clone()).collect();
            delete_moves_under(data, &doomed);

            data.levels_repo().delete(&id);

            let survivors: Vec<Level> = data
                .levels
                .values()
                .filter(|level| level.program_id == program_id)
                .cloned()
                .collect();
            data.levels_repo().bulk_put(ordering::renumber(survivors));
            Ok(())
        })?;

        tracing::info!("Deleted level {}", level_id);
        Ok(())
    }

    /// Copy a level (and its moves, with fresh ids) immediately after the
    /// source, shifting later siblings down by one.
    pub fn duplicate_level(&mut self, level_id: &str) -> Result<(Level, Vec<Move>)> {
        let source = self.require_level(level_id)?;
        let siblings = self.list_levels(&source.program_id);
        let source_moves = self.list_moves(level_id);
        let timestamp = now_timestamp();

        let copy_id = new_entity_id();
        let desired_order = source.order + 1;
        let copy = Level {
            id: copy_id.clone(),
            name: format!("{} (Copy)", source.name),
            order: desired_order,
            created_at: timestamp.clone(),
            updated_at: timestamp.clone(),
            ..source
        };

        let mut group = siblings;
        group.push(copy);
        let normalized = ordering::reorder(group, &copy_id, desired_order);
        let created = find_by_id(&normalized, &copy_id)?;

        let copied_moves: Vec<Move> = source_moves
            .into_iter()
            .map(|source_move| Move {
                id: new_entity_id(),
                level_id: copy_id.clone(),
                created_at: timestamp.clone(),
                updated_at: timestamp.clone(),
                ..source_move
            })
            .collect();
        let result_moves = copied_moves.clone();

        self.store.transaction(move |data| {
            data.levels_repo().bulk_put(normalized);
            if !copied_moves.is_empty() {
                data.moves_repo().bulk_put(copied_moves);
            }
            Ok(())
        })?;

        Ok((created, result_moves))
    }

    // ========================================================================
    // Moves
    // ========================================================================

    pub fn list_moves(&self, level_id: &str) -> Vec<Move> {
        let mut moves: Vec<Move> = self
            .store
            .data()
            .moves
            .values()
            .filter(|entry| entry.level_id == level_id)
            .cloned()
            .collect();
        moves.sort_by_key(|entry| entry.order);
        moves
    }

    pub fn create_move(&mut self, level_id: &str, input: MoveInput) -> Result<Move> {
        self.require_level(level_id)?;
        let name = validated_name(&input.name)?;
        let siblings = self.list_moves(level_id);
        let order = ordering::clamped_insertion_order(input.order, siblings.len());
        let timestamp = now_timestamp();

        let entry = Move {
            id: new_entity_id(),
            level_id: level_id.to_string(),
            name,
            description: trimmed(input.description),
            kind: input.kind.unwrap_or_default(),
            target_sets: input.target_sets,
            target_reps: input.target_reps,
            target_weight: input.target_weight,
            target_time: input.target_time,
            rest_between_sets: input.rest_between_sets,
            video_url: input.video_url,
            image_url: input.image_url,
            equipment: input.equipment.unwrap_or_default(),
            notes: trimmed(input.notes),
            order,
            custom_fields: input.custom_fields.unwrap_or_default(),
            created_at: timestamp.clone(),
            updated_at: timestamp,
        };
        let move_id = entry.id.clone();

        let mut group = siblings;
        group.push(entry);
        let normalized = ordering::reorder(group, &move_id, order);
        let created = find_by_id(&normalized, &move_id)?;

        self.store.transaction(move |data| {
            data.moves_repo().bulk_put(normalized);
            Ok(())
        })?;

        tracing::info!("Created move {} in level {}", created.id, level_id);
        Ok(created)
    }

    pub fn update_move(&mut self, move_id: &str, patch: MovePatch) -> Result<Move> {
        let existing = self.require_move(move_id)?;
        let siblings = self.list_moves(&existing.level_id);
        let desired_order = ordering::clamped_insertion_order(
            Some(patch.order.unwrap_or(existing.order)),
            siblings.len(),
        );

        let mut updated = existing;
        if let Some(name) = patch.name {
            updated.name = validated_name(&name)?;
        }
        if let Some(description) = patch.description {
            updated.description = description.trim().to_string();
        }
        if let Some(kind) = patch.kind {
            updated.kind = kind;
        }
        if let Some(target_sets) = patch.target_sets {
            updated.target_sets = Some(target_sets);
        }
        if let Some(target_reps) = patch.target_reps {
            updated.target_reps = Some(target_reps);
        }
        if let Some(target_weight) = patch.target_weight {
            updated.target_weight = Some(target_weight);
        }
        if let Some(target_time) = patch.target_time {
            updated.target_time = Some(target_time);
        }
        if let Some(rest_between_sets) = patch.rest_between_sets {
            updated.rest_between_sets = Some(rest_between_sets);
        }
        if let Some(video_url) = patch.video_url {
            updated.video_url = Some(video_url);
        }
        if let Some(image_url) = patch.image_url {
            updated.image_url = Some(image_url);
        }
        if let Some(equipment) = patch.equipment {
            updated.equipment = equipment;
        }
        if let Some(notes) = patch.notes {
            updated.notes = notes.trim().to_string();
        }
        if let Some(custom_fields) = patch.custom_fields {
            updated.custom_fields = custom_fields;
        }
        updated.order = desired_order;
        updated.updated_at = now_timestamp();

        let group: Vec<Move> = siblings
            .into_iter()
            .map(|entry| {
                if entry.id == move_id {
                    updated.clone()
                } else {
                    entry
                }
            })
            .collect();
        let normalized = ordering::reorder(group, move_id, desired_order);
        let result = find_by_id(&normalized, move_id)?;

        self.store.transaction(move |data| {
            data.moves_repo().bulk_put(normalized);
            Ok(())
        })?;

        Ok(result)
    }

    pub fn delete_move(&mut self, move_id: &str) -> Result<()> {
        let entry = self.require_move(move_id)?;
        let id = move_id.to_string();
        let level_id = entry.level_id;

        self.store.transaction(move |data| {
            data.moves_repo().delete(&id);

            let survivors: Vec<Move> = data
                .moves
                .values()
                .filter(|entry| entry.level_id == level_id)
                .cloned()
                .collect();
            data.moves_repo().bulk_put(ordering::renumber(survivors));
            Ok(())
        })?;

        tracing::info!("Deleted move {}", move_id);
        Ok(())
    }

    pub fn duplicate_move(&mut self, move_id: &str) -> Result<Move> {
        let source = self.require_move(move_id)?;
        let siblings = self.list_moves(&source.level_id);
        let timestamp = now_timestamp();

        let copy_id = new_entity_id();
        let desired_order = source.order + 1;
        let copy = Move {
            id: copy_id.clone(),
            name: format!("{} (Copy)", source.name),
            order: desired_order,
            created_at: timestamp.clone(),
            updated_at: timestamp,
            ..source
        };

        let mut group = siblings;
        group.push(copy);
        let normalized = ordering::reorder(group, &copy_id, desired_order);
        let created = find_by_id(&normalized, &copy_id)?;

        self.store.transaction(move |data| {
            data.moves_repo().bulk_put(normalized);
            Ok(())
        })?;

        Ok(created)
    }

    // ========================================================================
    // Workout Logs
    // ========================================================================

    /// Logs sorted by date, newest first
    pub fn list_logs(&self) -> Vec<WorkoutLog> {
        let mut logs: Vec<WorkoutLog> = self.store.data().logs.values().cloned().collect();
        logs.sort_by(|a, b| b.date.cmp(&a.date));
        logs
    }

    pub fn log_workout(&mut self, input: LogInput) -> Result<WorkoutLog> {
        self.require_program(&input.program_id)?;
        self.require_level(&input.level_id)?;
        if let Some(move_id) = &input.move_id {
            self.require_move(move_id)?;
        }

        let timestamp = now_timestamp();
        let log = WorkoutLog {
            id: new_entity_id(),
            program_id: input.program_id,
            level_id: input.level_id,
            move_id: input.move_id,
            date: input.date.unwrap_or_else(now_timestamp),
            actual_sets: input.actual_sets,
            actual_reps: input.actual_reps,
            actual_weight: input.actual_weight,
            perceived_effort: input.perceived_effort,
            notes: trimmed(input.notes),
            completed: input.completed,
            created_at: timestamp.clone(),
            updated_at: timestamp,
        };

        let created = log.clone();
        self.store.transaction(|data| {
            data.logs_repo().put(log);
            Ok(())
        })?;

        Ok(created)
    }

    pub fn delete_log(&mut self, log_id: &str) -> Result<()> {
        if !self.store.data().logs.contains_key(log_id) {
            return Err(Error::not_found("Log", log_id));
        }
        let id = log_id.to_string();
        self.store.transaction(move |data| {
            data.logs_repo().delete(&id);
            Ok(())
        })
    }

    // ========================================================================
    // Settings
    // ========================================================================

    /// The stored settings record, or the default if none has been saved
    pub fn settings(&self) -> UserSettings {
        self.store
            .data()
            .settings
            .clone()
            .unwrap_or_else(UserSettings::default_record)
    }

    pub fn update_settings(&mut self, patch: SettingsPatch) -> Result<UserSettings> {
        let mut updated = self.settings();
        if let Some(sync_enabled) = patch.sync_enabled {
            updated.sync_enabled = sync_enabled;
        }
        if let Some(dark_mode) = patch.dark_mode {
            updated.dark_mode = dark_mode;
        }
        if let Some(unit_preference) = patch.unit_preference {
            updated.unit_preference = Some(unit_preference);
        }
        if let Some(remote_url) = patch.remote_url {
            updated.remote_url = Some(remote_url);
        }
        if let Some(remote_key) = patch.remote_key {
            updated.remote_key = Some(remote_key);
        }
        if let Some(custom_fields) = patch.custom_fields {
            updated.custom_fields = Some(custom_fields);
        }
        updated.updated_at = now_timestamp();

        let result = updated.clone();
        self.store.transaction(|data| {
            data.settings_store().put(updated);
            Ok(())
        })?;

        Ok(result)
    }

    // ========================================================================
    // Guards
    // ========================================================================

    fn require_program(&self, program_id: &str) -> Result<Program> {
        self.store
            .data()
            .programs
            .get(program_id)
            .cloned()
            .ok_or_else(|| Error::not_found("Program", program_id))
    }

    fn require_level(&self, level_id: &str) -> Result<Level> {
        let level = self
            .store
            .data()
            .levels
            .get(level_id)
            .cloned()
            .ok_or_else(|| Error::not_found("Level", level_id))?;

        if !self.store.data().programs.contains_key(&level.program_id) {
            return Err(Error::ReferentialIntegrity(format!(
                "missing program {} for level {}",
                level.program_id, level.id
            )));
        }

        Ok(level)
    }

    fn require_move(&self, move_id: &str) -> Result<Move> {
        let entry = self
            .store
            .data()
            .moves
            .get(move_id)
            .cloned()
            .ok_or_else(|| Error::not_found("Move", move_id))?;

        if !self.store.data().levels.contains_key(&entry.level_id) {
            return Err(Error::ReferentialIntegrity(format!(
                "missing level {} for move {}",
                entry.level_id, entry.id
            )));
        }

        Ok(entry)
    }
}

fn validated_name(raw: &str) -> Result<String> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(Error::Validation("name must not be empty".into()));
    }
    Ok(name.to_string())
}

fn trimmed(value: Option<String>) -> String {
    value
        .map(|text| text.trim().to_string())
        .unwrap_or_default()
}

fn find_by_id<T: crate::repository::Entity + Clone>(entries: &[T], id: &str) -> Result<T> {
    entries
        .iter()
        .find(|entry| entry.id() == id)
        .cloned()
        .ok_or_else(|| Error::Transaction(format!("renumbered sibling set lost record {}", id)))
}

fn delete_logs_for_program(data: &mut StoreData, program_id: &str) {
    let doomed: Vec<EntityId> = data
        .logs
        .values()
        .filter(|log| log.program_id == program_id)
        .map(|log| log.id.clone())
        .collect();
    let mut logs = data.logs_repo();
    for id in &doomed {
        logs.delete(id);
    }
}

fn delete_logs_for_level(data: &mut StoreData, level_id: &str) {
    let doomed: Vec<EntityId> = data
        .logs
        .values()
        .filter(|log| log.level_id == level_id)
        .map(|log| log.id.clone())
        .collect();
    let mut logs = data.logs_repo();
    for id in &doomed {
        logs.delete(id);
    }
}

fn delete_moves_under(data: &mut StoreData, level_ids: &HashSet<EntityId>) {
    let doomed: Vec<EntityId> = data
        .moves
        .values()
        .filter(|entry| level_ids.contains(&entry.level_id))
        .map(|entry| entry.id.clone())
        .collect();
    let mut moves = data.moves_repo();
    for id in &doomed {
        moves.delete(id);
    }
}
