//! # Session Identifier Persistence
//!
//! The session id is an opaque token the backend uses to correlate turns.
//! It lives in `~/.moodreel/session_id`, is created on first start, and is
//! rotated only by "new chat".
//!
//! Writes use atomic rename (write `.tmp`, then `rename()`) for crash safety.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};

const SESSION_PREFIX: &str = "session_";

/// Returns `~/.moodreel/session_id`.
pub fn session_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".moodreel").join("session_id"))
}

/// Generate a fresh session id: `session_` followed by 32 hex chars.
pub fn new_session_id() -> String {
    format!("{SESSION_PREFIX}{}", uuid::Uuid::new_v4().simple())
}

/// First 8 characters after the prefix, for the header.
pub fn short_id(id: &str) -> &str {
    let body = id.strip_prefix(SESSION_PREFIX).unwrap_or(id);
    match body.char_indices().nth(8) {
        Some((end, _)) => &body[..end],
        None => body,
    }
}

/// Read the persisted id, or create and persist a new one.
pub fn load_or_create(path: &Path) -> io::Result<String> {
    match fs::read_to_string(path) {
        Ok(contents) => {
            let id = contents.trim();
            if !id.is_empty() {
                debug!("Loaded session id from {}", path.display());
                return Ok(id.to_string());
            }
            warn!("Session file {} is empty, regenerating", path.display());
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            info!("No session file at {}, creating one", path.display());
        }
        Err(e) => return Err(e),
    }

    let id = new_session_id();
    save(path, &id)?;
    Ok(id)
}

/// Atomically persist `id` to `path`.
pub fn save(path: &Path, id: &str) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp_path = path.with_extension("tmp");
    fs::write(&tmp_path, id)?;
    fs::rename(&tmp_path, path)?;
    debug!("Session id saved: {}", id);
    Ok(())
}

/// Resolve the startup session id. Falls back to an in-memory id if the
/// file can't be used.
pub fn startup_session_id(path: Option<&Path>) -> String {
    let Some(path) = path else {
        warn!("Could not determine home directory, session id will not persist");
        return new_session_id();
    };
    load_or_create(path).unwrap_or_else(|e| {
        warn!("Failed to load session id: {}", e);
        new_session_id()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::scratch_dir;

    #[test]
    fn new_ids_are_prefixed_and_unique() {
        let a = new_session_id();
        let b = new_session_id();
        assert!(a.starts_with("session_"));
        assert_eq!(a.len(), "session_".len() + 32);
        assert_ne!(a, b);
    }

    #[test]
    fn short_id_strips_prefix() {
        assert_eq!(short_id("session_0123456789abcdef"), "01234567");
        assert_eq!(short_id("abc"), "abc");
    }

    #[test]
    fn load_or_create_persists_across_calls() {
        let dir = scratch_dir();
        let path = dir.join("session_id");

        let first = load_or_create(&path).unwrap();
        let second = load_or_create(&path).unwrap();
        assert_eq!(first, second);
        assert!(path.exists());
    }

    #[test]
    fn save_overwrites_previous_id() {
        let dir = scratch_dir();
        let path = dir.join("nested").join("session_id");

        save(&path, "session_one").unwrap();
        save(&path, "session_two").unwrap();
        assert_eq!(load_or_create(&path).unwrap(), "session_two");
        assert!(!path.with_extension("tmp").exists());
    }

    #[test]
    fn empty_file_is_regenerated() {
        let dir = scratch_dir();
        let path = dir.join("session_id");
        fs::write(&path, "  \n").unwrap();

        let id = load_or_create(&path).unwrap();
        assert!(id.starts_with("session_"));
    }
}
