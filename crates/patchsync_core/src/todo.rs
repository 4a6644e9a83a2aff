//! The todo entity.

use crate::entity::{Entity, EntityType};
use patchsync_storage::{Record, RecordId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A todo item.
///
/// Equality and hashing compare every field, so two todos with the same
/// id, description and completion flag are interchangeable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct Todo {
    /// Assigned by the store on first save.
    pub id: Option<RecordId>,
    /// Free text.
    pub description: String,
    /// Whether the item is done.
    pub complete: bool,
}

impl Todo {
    /// Creates a todo with a known id.
    pub fn new(id: RecordId, description: impl Into<String>, complete: bool) -> Self {
        Self {
            id: Some(id),
            description: description.into(),
            complete,
        }
    }

    /// Creates an unsaved, incomplete todo.
    pub fn draft(description: impl Into<String>) -> Self {
        Self {
            id: None,
            description: description.into(),
            complete: false,
        }
    }
}

impl Record for Todo {
    fn id(&self) -> Option<RecordId> {
        self.id
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = Some(id);
    }
}

impl Entity for Todo {
    const ENTITY_TYPE: EntityType = EntityType::new("todo", "todos");
}

impl fmt::Display for Todo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.id {
            Some(id) => write!(f, "[ id={}, ", id)?,
            None => f.write_str("[ id=null, ")?,
        }
        write!(
            f,
            "description={}, complete={} ]",
            self.description, self.complete
        )
    }
}
