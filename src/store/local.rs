// src/store/local.rs

use std::fs;
use std::path::{Path, PathBuf};

use crate::{error::AppError, models::user::User};

const REGISTRY_FILE: &str = "registry.json";
const SESSION_FILE: &str = "session.json";

/// Local device storage for the account registry and the active session.
///
/// Both snapshots are plain JSON files under the data directory, read once
/// at startup and rewritten on every change. A missing file is an empty
/// registry / no session, never an error.
#[derive(Debug, Clone)]
pub struct DeviceStorage {
    dir: PathBuf,
}

impl DeviceStorage {
    pub fn new(dir: &Path) -> Result<Self, AppError> {
        fs::create_dir_all(dir)?;
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    fn path(&self, file: &str) -> PathBuf {
        self.dir.join(file)
    }

    pub fn load_registry(&self) -> Result<Vec<User>, AppError> {
        let path = self.path(REGISTRY_FILE);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let raw = fs::read_to_string(&path)?;
        let registry = serde_json::from_str(&raw)
            .map_err(|e| AppError::Storage(format!("registry snapshot unreadable: {}", e)))?;
        Ok(registry)
    }

    pub fn save_registry(&self, registry: &[User]) -> Result<(), AppError> {
        let raw = serde_json::to_string_pretty(registry)
            .map_err(|e| AppError::Internal(e.to_string()))?;
        fs::write(self.path(REGISTRY_FILE), raw)?;
        Ok(())
    }

    pub fn load_session(&self) -> Result<Option<User>, AppError> {
        let path = self.path(SESSION_FILE);
        if !path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(&path)?;
        let user = serde_json::from_str(&raw)
            .map_err(|e| AppError::Storage(format!("session snapshot unreadable: {}", e)))?;
        Ok(Some(user))
    }

    pub fn save_session(&self, user: &User) -> Result<(), AppError> {
        let raw =
            serde_json::to_string_pretty(user).map_err(|e| AppError::Internal(e.to_string()))?;
        fs::write(self.path(SESSION_FILE), raw)?;
        Ok(())
    }

    pub fn clear_session(&self) -> Result<(), AppError> {
        let path = self.path(SESSION_FILE);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }
}
