#![forbid(unsafe_code)]

//! Core domain model and business logic for the PlanTrack training planner.
//!
//! This crate provides:
//! - Domain types (programs, levels, moves, workout logs, settings)
//! - The embedded training store with atomic transactions
//! - Sibling-group order maintenance
//! - Hierarchy-aware authoring (CRUD, duplicate, cascade delete)
//! - Export/import of the dataset as a versioned envelope

pub mod types;
pub mod error;
pub mod config;
pub mod logging;
pub mod store;
pub mod repository;
pub mod ordering;
pub mod authoring;
pub mod portability;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use config::Config;
pub use store::{Store, StoreData};
pub use repository::{Entity, Repository, SettingsStore};
pub use authoring::{
    AuthoringService, LevelInput, LevelPatch, LogInput, MoveInput, MovePatch, ProgramInput,
    ProgramPatch, ProgramTree, SettingsPatch,
};
pub use portability::{ImportSummary, PortabilityService, EXPORT_VERSION, SCHEMA_VERSION};
