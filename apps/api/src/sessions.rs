//! In-memory session registry.
//!
//! Each session owns one `Workflow` behind its own async mutex, so requests on
//! different sessions never contend. Nothing is persisted; a restart drops every
//! session. Idle sessions are swept whenever a new one is created.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};
use uuid::Uuid;

use crate::workflow::controller::Workflow;

#[derive(Debug)]
pub struct Session {
    pub id: Uuid,
    pub workflow: Workflow,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Session {
    fn new() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            workflow: Workflow::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

pub type SessionHandle = Arc<Mutex<Session>>;

#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, SessionHandle>>>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    /// Creates a session on the landing step, evicting expired ones first.
    pub async fn create(&self) -> SessionHandle {
        self.evict_expired(Utc::now()).await;

        let session = Session::new();
        let id = session.id;
        let handle = Arc::new(Mutex::new(session));
        self.sessions.write().await.insert(id, handle.clone());
        info!("Session {id} created");
        handle
    }

    pub async fn get(&self, id: Uuid) -> Option<SessionHandle> {
        self.sessions.read().await.get(&id).cloned()
    }

    pub async fn remove(&self, id: Uuid) -> bool {
        let removed = self.sessions.write().await.remove(&id).is_some();
        if removed {
            info!("Session {id} removed");
        }
        removed
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Drops sessions idle since before `now - ttl`. Sessions currently locked by a
    /// request are in use and kept.
    pub async fn evict_expired(&self, now: DateTime<Utc>) -> usize {
        let cutoff = now - self.ttl;
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, handle| match handle.try_lock() {
            Ok(session) => session.updated_at >= cutoff,
            Err(_) => true,
        });
        let evicted = before - sessions.len();
        if evicted > 0 {
            debug!("Evicted {evicted} idle sessions");
        }
        evicted
    }
}
