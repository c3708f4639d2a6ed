//! In-memory session registry. Sessions are transient — nothing is
//! persisted, and a deleted session takes its preview artifact with it.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use uuid::Uuid;

use super::{FormSession, SessionView};

#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<Mutex<HashMap<Uuid, FormSession>>>,
}

impl SessionStore {
    pub fn create(&self) -> SessionView {
        let session = FormSession::new();
        let view = session.view();
        self.lock().insert(session.id, session);
        view
    }

    /// Runs `f` against the session under the store lock. Callers must not
    /// await inside `f` — async work happens between `with_session` calls.
    pub fn with_session<R>(&self, id: Uuid, f: impl FnOnce(&mut FormSession) -> R) -> Option<R> {
        self.lock().get_mut(&id).map(f)
    }

    pub fn remove(&self, id: Uuid) -> bool {
        self.lock().remove(&id).is_some()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<Uuid, FormSession>> {
        self.inner.lock().expect("session store lock poisoned")
    }
}
