//! Persisted client session
//!
//! A [`Session`] is created by login or register, written to disk, and
//! handed explicitly to every command that talks to protected routes. It is
//! removed again on logout or when the server no longer accepts its token.

use std::{
    env,
    fs::{self, File, OpenOptions},
    io::{self, Write},
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    error::{ClientError, ClientResult},
    models::User,
};

/// Session file location override
pub const SESSION_ENV: &str = "TASKMASTER_SESSION";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub base_url: String,
    pub token: String,
    pub user: User,
}

/// Reads and writes the session file
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `$TASKMASTER_SESSION`, else `$HOME/.taskmaster/session.json`
    pub fn from_env() -> ClientResult<Self> {
        if let Ok(path) = env::var(SESSION_ENV) {
            return Ok(Self::new(path));
        }

        let home = env::var("HOME").map_err(|_| {
            ClientError::InvalidInput(format!(
                "Cannot locate the session file: set {} or HOME",
                SESSION_ENV
            ))
        })?;

        Ok(Self::new(
            Path::new(&home).join(".taskmaster").join("session.json"),
        ))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The stored session, or `None` when nobody is logged in
    pub fn load(&self) -> ClientResult<Option<Session>> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => Ok(Some(serde_json::from_str(&contents)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn save(&self, session: &Session) -> ClientResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(session)?;
        open_private(&self.path)?.write_all(contents.as_bytes())?;
        debug!("Session saved to {}", self.path.display());
        Ok(())
    }

    /// Remove the session file; a missing file is not an error
    pub fn clear(&self) -> ClientResult<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Open for writing, readable by the owner only
#[cfg(unix)]
fn open_private(path: &Path) -> io::Result<File> {
    use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

    let file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    // `mode` only applies when the file is created
    file.set_permissions(fs::Permissions::from_mode(0o600))?;
    Ok(file)
}

#[cfg(not(unix))]
fn open_private(path: &Path) -> io::Result<File> {
    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use uuid::Uuid;

    fn scratch_store() -> SessionStore {
        SessionStore::new(
            env::temp_dir()
                .join(format!("taskmaster-{}", Uuid::new_v4()))
                .join("session.json"),
        )
    }

    fn session() -> Session {
        Session {
            base_url: "http://localhost:5000/api".to_string(),
            token: "token".to_string(),
            user: User {
                id: Uuid::new_v4(),
                name: "Ada".to_string(),
                email: "ada@example.com".to_string(),
            },
        }
    }

    #[test]
    fn missing_file_means_logged_out() {
        assert_eq!(scratch_store().load().unwrap(), None);
    }

    #[test]
    fn save_load_clear() {
        let store = scratch_store();
        let session = session();

        store.save(&session).unwrap();
        assert_eq!(store.load().unwrap(), Some(session));

        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);
        store.clear().unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn session_file_is_private() {
        use std::os::unix::fs::PermissionsExt;

        let store = scratch_store();
        store.save(&session()).unwrap();
        let mode = fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);

        // A file left world-readable by an older version is tightened on save
        fs::set_permissions(store.path(), fs::Permissions::from_mode(0o644)).unwrap();
        store.save(&session()).unwrap();
        let mode = fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);

        store.clear().unwrap();
    }

    #[test]
    fn overwrite_truncates_previous_contents() {
        let store = scratch_store();
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(store.path(), "x".repeat(4096)).unwrap();

        let session = session();
        store.save(&session).unwrap();

        assert_eq!(store.load().unwrap(), Some(session));
        store.clear().unwrap();
    }

    #[test]
    fn corrupt_file_is_reported() {
        let store = scratch_store();
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(store.path(), "{ not json").unwrap();

        assert!(matches!(store.load(), Err(ClientError::Serialization(_))));
    }

    #[test]
    #[serial]
    fn path_comes_from_the_environment() {
        unsafe {
            env::set_var(SESSION_ENV, "/tmp/elsewhere/session.json");
        }
        let store = SessionStore::from_env().unwrap();
        unsafe {
            env::remove_var(SESSION_ENV);
        }

        assert_eq!(store.path(), Path::new("/tmp/elsewhere/session.json"));
    }
}
