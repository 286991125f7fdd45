//! Process-wide session context.
//!
//! Holds the bearer token used for every backend request and owns the one
//! place where a session ends. Workflows and the API client receive an
//! `Arc<SessionContext>` instead of reaching for the token file themselves.

use crate::shared::errors::SessionError;
use crate::shared::fs_atomic::{atomic_write_file, remove_file_if_exists};
use crate::shared::logging::append_console_log;
use crate::state::StatePaths;
use std::fs;
use std::sync::{Arc, Mutex};

type LogoutListener = Arc<dyn Fn(&str) + Send + Sync>;

#[derive(Debug, Default)]
struct SessionState {
    token: Option<String>,
    logged_out: bool,
}

pub struct SessionContext {
    paths: StatePaths,
    login_route: String,
    state: Mutex<SessionState>,
    listeners: Mutex<Vec<LogoutListener>>,
}

impl std::fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionContext")
            .field("root", &self.paths.root)
            .field("login_route", &self.login_route)
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}

impl SessionContext {
    pub fn new(paths: StatePaths, login_route: impl Into<String>) -> Self {
        Self {
            paths,
            login_route: login_route.into(),
            state: Mutex::new(SessionState::default()),
            listeners: Mutex::new(Vec::new()),
        }
    }

    /// Restores a previously stored token, if any.
    pub fn load(paths: StatePaths, login_route: impl Into<String>) -> Result<Self, SessionError> {
        let path = paths.session_token_path();
        let token = if path.exists() {
            let raw = fs::read_to_string(&path).map_err(|source| SessionError::Read {
                path: path.display().to_string(),
                source,
            })?;
            Some(raw.trim().to_string()).filter(|value| !value.is_empty())
        } else {
            None
        };
        let context = Self::new(paths, login_route);
        if let Ok(mut state) = context.state.lock() {
            state.token = token;
        }
        Ok(context)
    }

    pub fn login_route(&self) -> &str {
        &self.login_route
    }

    pub fn token(&self) -> Option<String> {
        self.state.lock().ok().and_then(|state| state.token.clone())
    }

    pub fn is_authenticated(&self) -> bool {
        self.state
            .lock()
            .map(|state| state.token.is_some())
            .unwrap_or(false)
    }

    pub fn set_token(&self, token: &str) -> Result<(), SessionError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(SessionError::EmptyToken);
        }
        let path = self.paths.session_token_path();
        atomic_write_file(&path, token.as_bytes()).map_err(|source| SessionError::Write {
            path: path.display().to_string(),
            source,
        })?;
        if let Ok(mut state) = self.state.lock() {
            state.token = Some(token.to_string());
            state.logged_out = false;
        }
        append_console_log(&self.paths, "info", "session.login", "session token stored");
        Ok(())
    }

    /// Registers a hook invoked with the login route when the session ends.
    pub fn on_logout<F>(&self, listener: F)
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        if let Ok(mut listeners) = self.listeners.lock() {
            listeners.push(Arc::new(listener));
        }
    }

    /// Ends the session. Returns `false` when it had already ended.
    pub fn logout(&self, reason: &str) -> bool {
        {
            let Ok(mut state) = self.state.lock() else {
                return false;
            };
            if state.logged_out {
                return false;
            }
            state.logged_out = true;
            state.token = None;
        }

        let path = self.paths.session_token_path();
        if let Err(err) = remove_file_if_exists(&path) {
            let err = SessionError::Remove {
                path: path.display().to_string(),
                source: err,
            };
            append_console_log(&self.paths, "error", "session.logout", &err.to_string());
        }
        append_console_log(
            &self.paths,
            "info",
            "session.logout",
            &format!("reason={reason} redirect={}", self.login_route),
        );

        // Listeners may register more listeners or log out again.
        let listeners: Vec<LogoutListener> = self
            .listeners
            .lock()
            .map(|listeners| listeners.clone())
            .unwrap_or_default();
        for listener in listeners {
            listener(&self.login_route);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tempfile::tempdir;

    #[test]
    fn token_round_trips_through_state_root() {
        let dir = tempdir().expect("tempdir");
        let paths = StatePaths::new(dir.path());
        let session = SessionContext::new(paths.clone(), "/secure-console");
        session.set_token(" abc123 \n").expect("set token");

        let restored = SessionContext::load(paths, "/secure-console").expect("load");
        assert_eq!(restored.token().as_deref(), Some("abc123"));
        assert!(restored.is_authenticated());
    }

    #[test]
    fn empty_token_is_rejected() {
        let dir = tempdir().expect("tempdir");
        let session = SessionContext::new(StatePaths::new(dir.path()), "/secure-console");
        assert!(matches!(
            session.set_token("   "),
            Err(SessionError::EmptyToken)
        ));
    }

    #[test]
    fn logout_is_idempotent_and_notifies_once() {
        let dir = tempdir().expect("tempdir");
        let paths = StatePaths::new(dir.path());
        let session = SessionContext::new(paths.clone(), "/secure-console");
        session.set_token("abc").expect("set token");

        let redirects = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&redirects);
        session.on_logout(move |route| {
            assert_eq!(route, "/secure-console");
            seen.fetch_add(1, Ordering::SeqCst);
        });

        assert!(session.logout("unauthorized"));
        assert!(!session.logout("unauthorized"));
        assert_eq!(redirects.load(Ordering::SeqCst), 1);
        assert!(session.token().is_none());
        assert!(!paths.session_token_path().exists());
    }

    #[test]
    fn listener_can_reenter_session_during_logout() {
        let dir = tempdir().expect("tempdir");
        let session = Arc::new(SessionContext::new(
            StatePaths::new(dir.path()),
            "/secure-console",
        ));
        session.set_token("abc").expect("set token");

        let calls = Arc::new(AtomicUsize::new(0));
        let inner = Arc::clone(&session);
        let seen = Arc::clone(&calls);
        session.on_logout(move |_| {
            seen.fetch_add(1, Ordering::SeqCst);
            assert!(!inner.logout("nested"));
            inner.on_logout(|_| {});
        });

        assert!(session.logout("unauthorized"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn new_login_rearms_logout() {
        let dir = tempdir().expect("tempdir");
        let session = SessionContext::new(StatePaths::new(dir.path()), "/secure-console");
        assert!(session.logout("first"));
        session.set_token("fresh").expect("set token");
        assert!(session.logout("second"));
    }
}
