//! Entity trait - common interface for stored entities

use serde::{de::DeserializeOwned, Serialize};

use crate::core::identity::CaseId;

/// Common trait for entities kept in the case store
pub trait Entity: Serialize + DeserializeOwned {
    /// The entity id prefix (e.g., "TC")
    const PREFIX: &'static str;

    /// Get the entity's unique ID
    fn id(&self) -> &CaseId;

    /// Get the entity's title
    fn title(&self) -> &str;

    /// Display label in the form `<id>: <title>`
    fn label(&self) -> String {
        format!("{}: {}", self.id(), self.title())
    }
}
