//! Registry of live sessions
//!
//! Every visitor gets their own [`Session`]; nothing is shared between them.
//! Sessions live in memory only and are evicted once idle past the TTL.

use super::{Session, SessionError};
use crate::config::SessionConfig;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

/// Manager for all chat sessions
pub struct SessionManager {
    config: SessionConfig,
    sessions: RwLock<HashMap<String, Arc<Session>>>,
}

impl SessionManager {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Start a new session at the greeting
    pub async fn create(&self) -> Arc<Session> {
        let id = uuid::Uuid::new_v4().to_string();
        let session = Arc::new(Session::new(&id, self.config.typing_delay));
        let active = {
            let mut sessions = self.sessions.write().await;
            sessions.insert(id.clone(), session.clone());
            sessions.len()
        };
        tracing::info!(session_id = %id, active, "Session created");
        session
    }

    /// Look up a session and mark it active
    pub async fn get(&self, id: &str) -> Result<Arc<Session>, SessionError> {
        let session = self
            .sessions
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| SessionError::NotFound(id.to_string()))?;
        session.touch();
        Ok(session)
    }

    pub async fn remove(&self, id: &str) -> Result<(), SessionError> {
        if self.sessions.write().await.remove(id).is_none() {
            return Err(SessionError::NotFound(id.to_string()));
        }
        tracing::info!(session_id = %id, "Session removed");
        Ok(())
    }

    #[allow(dead_code)] // Used by tests
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Drop sessions idle for longer than the configured TTL
    pub async fn evict_idle(&self) -> usize {
        let ttl = self.config.idle_ttl;
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| session.idle_for() < ttl);
        let evicted = before - sessions.len();
        if evicted > 0 {
            tracing::info!(evicted, remaining = sessions.len(), "Evicted idle sessions");
        }
        evicted
    }

    /// Periodically evict idle sessions in the background
    pub fn spawn_sweeper(self: &Arc<Self>) -> JoinHandle<()> {
        let manager = Arc::clone(self);
        let period = manager.config.sweep_interval.max(Duration::from_secs(1));
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            // First tick fires immediately
            interval.tick().await;
            loop {
                interval.tick().await;
                manager.evict_idle().await;
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state_machine::ChatState;

    fn config(idle_ttl: Duration) -> SessionConfig {
        SessionConfig {
            typing_delay: Duration::ZERO,
            idle_ttl,
            sweep_interval: Duration::from_secs(60),
        }
    }

    #[tokio::test]
    async fn test_sessions_are_isolated() {
        let manager = SessionManager::new(config(Duration::from_secs(60)));
        let a = manager.create().await;
        let b = manager.create().await;
        assert_ne!(a.id(), b.id());

        a.submit("Programming").await.unwrap();
        assert_eq!(a.state().topic(), Some("Programming"));
        assert_eq!(b.state(), ChatState::AwaitingTopic);
        assert_eq!(b.snapshot().messages.len(), 1);
    }

    #[tokio::test]
    async fn test_get_and_remove() {
        let manager = SessionManager::new(config(Duration::from_secs(60)));
        let session = manager.create().await;
        let id = session.id().to_string();

        assert!(manager.get(&id).await.is_ok());
        manager.remove(&id).await.unwrap();
        assert!(matches!(
            manager.get(&id).await,
            Err(SessionError::NotFound(_))
        ));
        assert!(matches!(
            manager.remove(&id).await,
            Err(SessionError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_evict_idle() {
        let manager = SessionManager::new(config(Duration::from_millis(20)));
        manager.create().await;
        manager.create().await;
        assert_eq!(manager.len().await, 2);

        tokio::time::sleep(Duration::from_millis(40)).await;
        let fresh = manager.create().await;
        assert_eq!(manager.evict_idle().await, 2);
        assert_eq!(manager.len().await, 1);
        assert!(manager.get(fresh.id()).await.is_ok());
    }
}
