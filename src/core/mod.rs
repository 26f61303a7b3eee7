//! Core module - fundamental types and utilities

pub mod config;
pub mod draft;
pub mod entity;
pub mod identity;
pub mod store;

pub use config::Config;
pub use draft::{CaseDraft, DraftError};
pub use entity::Entity;
pub use identity::{CaseId, IdParseError};
pub use store::{CasePatch, CaseStore, LoadOutcome, StoreError};
