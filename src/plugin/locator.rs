//! Override script discovery.
//!
//! Searches a directory and its ancestors for a user-supplied
//! tabulation script, checking the directory itself first and then each
//! configured subdirectory.

use crate::cli;
use crate::config::PluginConfig;
use crate::error::TabulateError;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Finds override scripts by walking up the directory tree.
#[derive(Debug, Clone)]
pub struct PluginLocator {
    file_name: String,
    search_subdirs: Vec<String>,
}

impl PluginLocator {
    pub fn new(file_name: impl Into<String>, search_subdirs: Vec<String>) -> Self {
        Self {
            file_name: file_name.into(),
            search_subdirs,
        }
    }

    /// Candidate script paths for one directory level, in lookup order.
    pub fn candidates(&self, dir: &Path) -> Vec<PathBuf> {
        std::iter::once(dir.join(&self.file_name))
            .chain(
                self.search_subdirs
                    .iter()
                    .map(|sub| dir.join(sub).join(&self.file_name)),
            )
            .collect()
    }

    /// Search `search_dir` and its ancestors for a script.
    ///
    /// The walk ends after checking `stop_dir` or the filesystem root,
    /// whichever comes first.
    pub fn find(
        &self,
        search_dir: &Path,
        stop_dir: Option<&Path>,
    ) -> Result<Option<PathBuf>, TabulateError> {
        let mut current = fs::canonicalize(search_dir)
            .ok()
            .filter(|p| p.is_dir())
            .ok_or_else(|| TabulateError::InvalidDirectory(search_dir.to_path_buf()))?;

        let stop_dir = stop_dir.map(|p| fs::canonicalize(p).unwrap_or_else(|_| p.to_path_buf()));

        loop {
            for candidate in self.candidates(&current) {
                debug!("Checking {}", candidate.display());
                if candidate.is_file() {
                    return Ok(Some(candidate));
                }
            }

            if stop_dir.as_deref() == Some(current.as_path()) {
                return Ok(None);
            }

            match current.parent() {
                Some(parent) => current = parent.to_path_buf(),
                None => return Ok(None),
            }
        }
    }

    /// Look for an override in `cwd` only, then above each bare
    /// argument, last argument first.
    ///
    /// Relative arguments resolve against `cwd`; an empty one is `cwd` itself.
    pub fn locate(&self, cwd: &Path, args: &[String]) -> Result<Option<PathBuf>, TabulateError> {
        if let Some(found) = self.find(cwd, Some(cwd))? {
            return Ok(Some(found));
        }

        for arg in cli::bare_args(args).rev() {
            if let Some(found) = self.find(&cwd.join(arg), None)? {
                return Ok(Some(found));
            }
        }

        Ok(None)
    }
}

impl From<&PluginConfig> for PluginLocator {
    fn from(config: &PluginConfig) -> Self {
        Self::new(config.file_name.clone(), config.search_subdirs.clone())
    }
}

impl Default for PluginLocator {
    fn default() -> Self {
        Self::from(&PluginConfig::default())
    }
}
