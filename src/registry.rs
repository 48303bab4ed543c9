//! In-memory registry of tracked repositories.
//!
//! Pure list logic: lookups and mutations here never touch the persisted
//! document. The command surface persists through
//! [`ConfigStore`](crate::config::ConfigStore) after a successful mutation.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Branch a record tracks when none is given at creation.
pub const DEFAULT_BRANCH: &str = "main";

/// One tracked repository.
///
/// Field declaration order fixes the field order of the persisted JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoRecord {
    /// Unique lookup key within the registry.
    pub name: String,
    /// Remote location, opaque to this tool.
    pub url: String,
    /// Branch the local clone tracks.
    pub branch: String,
    /// Local directory the repository is materialized into.
    pub path: PathBuf,
}

impl RepoRecord {
    /// Create a record, defaulting `branch` to [`DEFAULT_BRANCH`] and `path`
    /// to `<root>/<name>`.
    pub fn new(
        name: impl Into<String>,
        url: impl Into<String>,
        branch: Option<String>,
        path: Option<PathBuf>,
        root: &Path,
    ) -> Self {
        let name = name.into();
        let path = path.unwrap_or_else(|| root.join(&name));

        Self {
            name,
            url: url.into(),
            branch: branch.unwrap_or_else(|| DEFAULT_BRANCH.to_string()),
            path,
        }
    }

    /// Whether the metadata directory exists at `path`.
    ///
    /// Advisory only: probed freshly on every call and never persisted, so a
    /// partially materialized clone still counts as cloned if `.git` exists.
    pub fn is_cloned(&self) -> bool {
        self.path.join(".git").exists()
    }

    /// Clone status label for display.
    pub fn status_label(&self) -> &'static str {
        if self.is_cloned() {
            "cloned"
        } else {
            "not cloned"
        }
    }
}

/// Ordered collection of tracked repositories.
///
/// Insertion order is preserved and record names stay unique across every
/// successful mutation. Serializes to the persisted document shape:
/// a single `repos` field holding the record sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registry {
    pub repos: Vec<RepoRecord>,
}

impl Registry {
    pub fn get(&self, name: &str) -> Option<&RepoRecord> {
        self.repos.iter().find(|repo| repo.name == name)
    }

    /// Append a record. The duplicate check runs before any mutation, so a
    /// rejected add leaves the registry untouched.
    pub fn add(&mut self, record: RepoRecord) -> Result<()> {
        if self.get(&record.name).is_some() {
            return Err(Error::DuplicateName(record.name));
        }

        self.repos.push(record);
        Ok(())
    }

    /// Remove the record with the given name, returning it.
    pub fn remove(&mut self, name: &str) -> Result<RepoRecord> {
        let index = self
            .repos
            .iter()
            .position(|repo| repo.name == name)
            .ok_or_else(|| Error::NotFound(name.to_string()))?;

        Ok(self.repos.remove(index))
    }

    pub fn iter(&self) -> impl Iterator<Item = &RepoRecord> {
        self.repos.iter()
    }

    pub fn len(&self) -> usize {
        self.repos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.repos.is_empty()
    }
}
