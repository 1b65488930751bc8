//! Admin authentication service
//!
//! A single configured admin credential gates the write endpoints.
//! Login verifies the password against the configured argon2 hash and
//! hands out an opaque session token, held in an in-memory map with an
//! expiry. There is no user table and no persistent session storage.

use crate::config::AdminConfig;
use crate::services::password::verify_password;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Interval between expired-session sweeps
const SESSION_SWEEP_INTERVAL: std::time::Duration = std::time::Duration::from_secs(300);

/// Error types for authentication operations
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No admin password hash is configured
    #[error("Admin login is disabled")]
    LoginDisabled,

    /// Wrong password
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

/// Admin authentication service
pub struct AdminAuthService {
    password_hash: String,
    session_ttl: Duration,
    sessions: RwLock<HashMap<String, DateTime<Utc>>>,
}

impl AdminAuthService {
    /// Create an auth service from configuration
    pub fn new(config: &AdminConfig) -> Self {
        Self {
            password_hash: config.password_hash.clone(),
            session_ttl: Duration::hours(config.session_ttl_hours as i64),
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Whether admin login is enabled at all
    pub fn enabled(&self) -> bool {
        !self.password_hash.is_empty()
    }

    /// Verify the admin password and issue a session token
    pub async fn login(&self, password: &str) -> Result<String, AuthError> {
        if !self.enabled() {
            return Err(AuthError::LoginDisabled);
        }

        if !verify_password(password, &self.password_hash)? {
            return Err(AuthError::InvalidCredentials);
        }

        let token = Uuid::new_v4().to_string();
        let expires_at = Utc::now() + self.session_ttl;
        self.sessions
            .write()
            .await
            .insert(token.clone(), expires_at);

        tracing::info!("Admin session created");
        Ok(token)
    }

    /// Check whether a token belongs to a live session
    pub async fn validate(&self, token: &str) -> bool {
        {
            let sessions = self.sessions.read().await;
            match sessions.get(token) {
                Some(expires_at) if *expires_at > Utc::now() => return true,
                Some(_) => {}
                None => return false,
            }
        }

        // Present but expired
        self.sessions.write().await.remove(token);
        false
    }

    /// Invalidate a session token
    pub async fn logout(&self, token: &str) {
        self.sessions.write().await.remove(token);
    }

    /// Drop expired sessions, returning the number removed
    pub async fn sweep_expired(&self) -> usize {
        let now = Utc::now();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, expires_at| *expires_at > now);
        before - sessions.len()
    }

    /// Current number of live sessions (for tests and diagnostics)
    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

/// Spawn a background task that periodically drops expired sessions
pub fn spawn_session_sweeper(auth: Arc<AdminAuthService>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(SESSION_SWEEP_INTERVAL);
        interval.tick().await;
        loop {
            interval.tick().await;
            let removed = auth.sweep_expired().await;
            if removed > 0 {
                tracing::debug!(removed, "Swept expired admin sessions");
            }
        }
    })
}
