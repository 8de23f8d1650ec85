use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Per-session question cap. Fixed policy, not configuration.
pub const MAX_QUESTIONS: u32 = 10;

#[derive(Debug, Clone)]
struct SessionQuota {
    answered: u32,
    created_at: DateTime<Utc>,
}

impl SessionQuota {
    fn fresh() -> Self {
        Self {
            answered: 0,
            created_at: Utc::now(),
        }
    }
}

/// Session-keyed quota store. Each session's counter starts at 0, is bumped
/// once per answered question, and is compared against `MAX_QUESTIONS` before
/// any matching or model work happens.
#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<Mutex<HashMap<String, SessionQuota>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&self) -> Result<String> {
        let session_id = Uuid::new_v4().to_string();
        let mut sessions = self
            .inner
            .lock()
            .map_err(|_| anyhow::anyhow!("session lock poisoned"))?;
        sessions.insert(session_id.clone(), SessionQuota::fresh());
        Ok(session_id)
    }

    /// Registers an unknown session id with a fresh quota; known ids keep
    /// their counter.
    pub fn ensure(&self, session_id: &str) -> Result<()> {
        let mut sessions = self
            .inner
            .lock()
            .map_err(|_| anyhow::anyhow!("session lock poisoned"))?;
        sessions
            .entry(session_id.to_string())
            .or_insert_with(SessionQuota::fresh);
        Ok(())
    }

    /// Resets a session's counter to 0, creating it if needed.
    pub fn reset(&self, session_id: &str) -> Result<()> {
        let mut sessions = self
            .inner
            .lock()
            .map_err(|_| anyhow::anyhow!("session lock poisoned"))?;
        sessions.insert(session_id.to_string(), SessionQuota::fresh());
        Ok(())
    }

    pub fn remaining(&self, session_id: &str) -> Result<u32> {
        let sessions = self
            .inner
            .lock()
            .map_err(|_| anyhow::anyhow!("session lock poisoned"))?;
        let answered = sessions
            .get(session_id)
            .map(|quota| quota.answered)
            .unwrap_or(0);
        Ok(MAX_QUESTIONS.saturating_sub(answered))
    }

    pub fn consume(&self, session_id: &str) -> Result<()> {
        let mut sessions = self
            .inner
            .lock()
            .map_err(|_| anyhow::anyhow!("session lock poisoned"))?;
        let quota = sessions
            .entry(session_id.to_string())
            .or_insert_with(SessionQuota::fresh);
        quota.answered = quota.answered.saturating_add(1);
        Ok(())
    }

    pub fn created_at(&self, session_id: &str) -> Result<Option<DateTime<Utc>>> {
        let sessions = self
            .inner
            .lock()
            .map_err(|_| anyhow::anyhow!("session lock poisoned"))?;
        Ok(sessions.get(session_id).map(|quota| quota.created_at))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_session_has_full_quota() {
        let store = SessionStore::new();
        let id = store.create().expect("create");
        assert_eq!(store.remaining(&id).expect("remaining"), MAX_QUESTIONS);
    }

    #[test]
    fn quota_exhausts_after_max_questions() {
        let store = SessionStore::new();
        let id = store.create().expect("create");
        for _ in 0..MAX_QUESTIONS {
            store.consume(&id).expect("consume");
        }
        assert_eq!(store.remaining(&id).expect("remaining"), 0);
    }

    #[test]
    fn reset_restores_full_quota() {
        let store = SessionStore::new();
        let id = store.create().expect("create");
        store.consume(&id).expect("consume");
        store.reset(&id).expect("reset");
        assert_eq!(store.remaining(&id).expect("remaining"), MAX_QUESTIONS);
    }

    #[test]
    fn sessions_are_independent() {
        let store = SessionStore::new();
        let first = store.create().expect("create");
        let second = store.create().expect("create");
        store.consume(&first).expect("consume");
        assert_eq!(store.remaining(&first).expect("remaining"), MAX_QUESTIONS - 1);
        assert_eq!(store.remaining(&second).expect("remaining"), MAX_QUESTIONS);
    }
}
