//! File-backed session state.
//!
//! Login state persists as a small JSON file so the session survives app
//! restarts. A missing or unreadable state file reads as logged out.

use std::fs;
use std::path::{Path, PathBuf};

use log::info;

use crate::error::{FootprintError, Result};
use crate::types::{LoginState, UserInfo};

/// Credentials the store accepts.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
    /// Display name recorded on successful login
    pub display_name: String,
}

/// Session-state collaborator: validates credentials and persists the
/// resulting login state.
#[derive(Debug)]
pub struct SessionStore {
    path: PathBuf,
    credentials: Credentials,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>, credentials: Credentials) -> Self {
        Self {
            path: path.into(),
            credentials,
        }
    }

    /// Validate credentials and persist the logged-in state.
    pub fn login(&self, username: &str, password: &str) -> Result<LoginState> {
        if username != self.credentials.username || password != self.credentials.password {
            return Err(FootprintError::InvalidCredentials);
        }

        let state = LoginState {
            is_logged_in: true,
            user: Some(UserInfo {
                username: username.to_string(),
                display_name: self.credentials.display_name.clone(),
            }),
        };
        self.write_state(&state)?;
        info!("session opened for {}", username);
        Ok(state)
    }

    /// Persist the logged-out state.
    pub fn logout(&self) -> Result<()> {
        self.write_state(&LoginState::logged_out())?;
        info!("session closed");
        Ok(())
    }

    /// Current login state. A missing or corrupt state file reads as
    /// logged out.
    pub fn login_state(&self) -> LoginState {
        match fs::read_to_string(&self.path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|_| LoginState::logged_out()),
            Err(_) => LoginState::logged_out(),
        }
    }

    fn write_state(&self, state: &LoginState) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if parent != Path::new("") {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, serde_json::to_string(state)?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store(dir: &TempDir) -> SessionStore {
        SessionStore::new(
            dir.path().join("auth.json"),
            Credentials {
                username: "admin".to_string(),
                password: "password".to_string(),
                display_name: "Administrator".to_string(),
            },
        )
    }

    #[test]
    fn test_login_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);

        assert!(!store.login_state().is_logged_in);

        let state = store.login("admin", "password").unwrap();
        assert!(state.is_logged_in);
        assert_eq!(state.user.as_ref().unwrap().display_name, "Administrator");
        assert!(store.login_state().is_logged_in);

        store.logout().unwrap();
        assert!(!store.login_state().is_logged_in);
    }

    #[test]
    fn test_rejects_bad_credentials() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        let err = store.login("admin", "wrong").unwrap_err();
        assert!(matches!(err, FootprintError::InvalidCredentials));
        assert!(!store.login_state().is_logged_in);
    }

    #[test]
    fn test_corrupt_state_file_reads_as_logged_out() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        fs::write(dir.path().join("auth.json"), "{not json").unwrap();
        assert!(!store.login_state().is_logged_in);
    }

    #[test]
    fn test_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::new(
            dir.path().join("nested/state/auth.json"),
            Credentials {
                username: "u".to_string(),
                password: "p".to_string(),
                display_name: "U".to_string(),
            },
        );
        store.login("u", "p").unwrap();
        assert!(store.login_state().is_logged_in);
    }
}
