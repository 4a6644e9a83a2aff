//! Sample records inserted at startup.

use crate::error::ServerResult;
use crate::state::AppState;
use patchsync_core::{Person, Todo};
use tracing::info;

/// Inserts the sample todos and people into empty collections.
///
/// Collections that already hold records (a reopened data directory) are
/// left alone.
pub fn seed(state: &AppState) -> ServerResult<()> {
    if state.todos().list()?.is_empty() {
        for todo in [
            Todo::new(1, "a", false),
            Todo::new(2, "b", false),
            Todo::new(3, "c", false),
        ] {
            let saved = state.todos().create(todo)?;
            info!(todo = %saved, "seeded");
        }
    } else {
        info!("todos already present; not seeding");
    }

    if state.people().list()?.is_empty() {
        for person in [Person::new("name", "email"), Person::new("1name", "1email")] {
            let saved = state.people().create(person)?;
            info!(person = %saved, "seeded");
        }
    } else {
        info!("people already present; not seeding");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServerConfig;

    #[test]
    fn seeds_empty_collections() {
        let state = AppState::in_memory(ServerConfig::default()).unwrap();
        seed(&state).unwrap();

        assert_eq!(
            state.todos().list().unwrap(),
            vec![
                Todo::new(1, "a", false),
                Todo::new(2, "b", false),
                Todo::new(3, "c", false),
            ]
        );
        let people = state.people().list().unwrap();
        assert_eq!(people.len(), 2);
        assert_eq!(people[0].email, "email");
        assert_eq!(people[1].email, "1email");
    }

    #[test]
    fn seeding_twice_is_harmless() {
        let state = AppState::in_memory(ServerConfig::default()).unwrap();
        seed(&state).unwrap();
        seed(&state).unwrap();

        assert_eq!(state.todos().list().unwrap().len(), 3);
        assert_eq!(state.people().list().unwrap().len(), 2);
    }
}
