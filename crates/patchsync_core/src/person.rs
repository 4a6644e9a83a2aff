//! The person entity.

use crate::entity::{Entity, EntityType};
use patchsync_storage::{Record, RecordId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A person with a unique email address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct Person {
    /// Assigned by the store on first save.
    pub id: Option<RecordId>,
    /// Display name.
    pub name: String,
    /// Email address; unique across the collection.
    pub email: String,
}

impl Person {
    /// Creates an unsaved person.
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            email: email.into(),
        }
    }
}

impl Record for Person {
    fn id(&self) -> Option<RecordId> {
        self.id
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = Some(id);
    }

    fn unique_key(&self) -> Option<String> {
        Some(self.email.clone())
    }
}

impl Entity for Person {
    const ENTITY_TYPE: EntityType = EntityType::new("person", "people");
}

impl fmt::Display for Person {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.id {
            Some(id) => write!(f, "Person{{id={}, ", id)?,
            None => write!(f, "Person{{id=null, ")?,
        }
        write!(f, "name='{}', email='{}'}}", self.name, self.email)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_is_the_unique_key() {
        let person = Person::new("name", "email");
        assert_eq!(person.unique_key().as_deref(), Some("email"));
    }

    #[test]
    fn display() {
        let mut person = Person::new("1name", "1email");
        assert_eq!(person.to_string(), "Person{id=null, name='1name', email='1email'}");
        person.set_id(2);
        assert_eq!(person.to_string(), "Person{id=2, name='1name', email='1email'}");
    }

    #[test]
    fn missing_fields_default() {
        let person: Person = serde_json::from_str(r#"{"name": "n"}"#).unwrap();
        assert_eq!(person, Person::new("n", ""));
    }
}
