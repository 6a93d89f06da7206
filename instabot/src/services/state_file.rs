//! JSON file storage for the relationship store
//!
//! The whole document is rewritten on every save. Writes go to a sibling
//! temporary file that is then renamed over the target, so a crash never
//! leaves a half-written state file behind.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::core::StoreDocument;
use crate::error::{InstabotError, InstabotResult};
use crate::traits::StateStorage;

/// State document stored as a single JSON file
#[derive(Debug, Clone)]
pub struct JsonStateFile {
    path: PathBuf,
}

impl JsonStateFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "state".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl StateStorage for JsonStateFile {
    fn load(&self) -> InstabotResult<Option<StoreDocument>> {
        let content = match fs::read(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        serde_json::from_slice(&content)
            .map(Some)
            .map_err(|e| InstabotError::corrupt(self.location(), e.to_string()))
    }

    fn save(&self, document: &StoreDocument) -> InstabotResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let temp = self.temp_path();
        fs::write(&temp, serde_json::to_vec(document)?)?;
        fs::rename(&temp, &self.path)?;
        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}
