//! Session shared between several writers.
//!
//! The engine assumes a single writer. When more than one panel drives the same session, wrap
//! it in a [`SharedSession`] so transitions are serialised behind one lock.

use crate::session::Session;
use crate::{EngineError, EngineResult};
use std::sync::{Arc, Mutex};

#[derive(Clone, Debug)]
pub struct SharedSession {
    inner: Arc<Mutex<Session>>,
}

impl SharedSession {
    /// Take ownership of `session` and put it behind a lock.
    ///
    /// # Arguments
    ///
    /// * `session` - The session every clone of this handle will drive.
    pub fn new(session: Session) -> Self {
        Self {
            inner: Arc::new(Mutex::new(session)),
        }
    }

    /// Run `f` with exclusive access to the session.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::SessionPoisoned`] if a previous writer panicked while holding the
    /// lock.
    pub fn with<T>(&self, f: impl FnOnce(&mut Session) -> T) -> EngineResult<T> {
        let mut guard = self.inner.lock().map_err(|_| EngineError::SessionPoisoned)?;
        Ok(f(&mut guard))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CoreConfig;
    use bodymap_catalogue::Catalogue;
    use bodymap_types::{PartId, SymptomId};

    fn shared() -> SharedSession {
        let data = Catalogue::builtin().expect("builtin catalogue");
        SharedSession::new(Session::from_catalogue(&data, CoreConfig::default()).expect("session"))
    }

    #[test]
    fn writers_on_several_threads_are_serialised() {
        let session = shared();
        let parts: Vec<String> = (0..8).map(|i| format!("Part{i}")).collect();

        std::thread::scope(|scope| {
            for id in &parts {
                let session = session.clone();
                scope.spawn(move || {
                    session
                        .with(|s| {
                            let part = PartId::from(id.as_str());
                            s.on_part_clicked(&part);
                            s.add_symptom(&part, &SymptomId::from("fievre"))
                        })
                        .expect("lock")
                        .expect("add");
                });
            }
        });

        let (selected, total) = session
            .with(|s| (s.selected_part_ids().len(), s.total_symptom_count()))
            .expect("lock");
        assert_eq!(selected, 8);
        assert_eq!(total, 8);
    }

    #[test]
    fn poisoned_lock_is_reported() {
        let session = shared();
        let poisoner = session.clone();
        let _ = std::thread::spawn(move || {
            let _ = poisoner.with(|_| panic!("writer crashed"));
        })
        .join();

        let err = session.with(|s| s.total_symptom_count()).expect_err("poisoned");
        assert!(matches!(err, EngineError::SessionPoisoned));
    }
}
