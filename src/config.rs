//! Registry persistence.
//!
//! The registry lives as a single JSON document at `<root>/config.json`.
//! Every command invocation performs a fresh load and, if it mutates, a
//! single full rewrite; the tool never runs long enough for caching to pay.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Error, Result};
use crate::registry::Registry;

/// Name of the registry document inside the vendor root.
const CONFIG_FILE: &str = "config.json";

/// Directory under the user's home holding the config and default clones.
const DEFAULT_ROOT_DIR: &str = ".vendor";

/// Durable storage for the [`Registry`] under a vendor root directory.
///
/// Constructed from an explicit root so commands and tests operate on
/// isolated directories; there is no ambient global state.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    root: PathBuf,
}

impl ConfigStore {
    /// Store over an explicit root directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Store rooted at `~/.vendor`.
    pub fn from_default_root() -> Result<Self> {
        let home = dirs::home_dir().ok_or(Error::HomeDir)?;
        Ok(Self::new(home.join(DEFAULT_ROOT_DIR)))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> PathBuf {
        self.root.join(CONFIG_FILE)
    }

    /// Read the registry document.
    ///
    /// A missing document is not an error and yields an empty registry; the
    /// document is only written once the first mutation is saved.
    pub fn load(&self) -> Result<Registry> {
        let path = self.config_path();

        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "no config document, starting empty");
                return Ok(Registry::default());
            }
            Err(err) => return Err(Error::Io { path, source: err }),
        };

        serde_json::from_str(&raw).map_err(|err| Error::ConfigParse { path, source: err })
    }

    /// Rewrite the registry document in full, creating the root directory on
    /// demand.
    ///
    /// A save failure leaves the previous document authoritative; callers
    /// report the triggering operation as failed rather than treating the
    /// in-memory mutation as applied.
    pub fn save(&self, registry: &Registry) -> Result<()> {
        fs::create_dir_all(&self.root).map_err(|err| Error::Io {
            path: self.root.clone(),
            source: err,
        })?;

        let path = self.config_path();
        let body = serde_json::to_string_pretty(registry).map_err(|err| Error::ConfigParse {
            path: path.clone(),
            source: err,
        })?;

        fs::write(&path, body).map_err(|err| Error::Io {
            path: path.clone(),
            source: err,
        })?;

        debug!(path = %path.display(), records = registry.len(), "registry saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::RepoRecord;
    use tempfile::TempDir;

    fn store_in_temp() -> (TempDir, ConfigStore) {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = ConfigStore::new(temp_dir.path().join("vendor"));
        (temp_dir, store)
    }

    fn sample_registry(root: &Path) -> Registry {
        let mut registry = Registry::default();
        registry
            .add(RepoRecord::new(
                "effect",
                "https://github.com/Effect-TS/effect",
                None,
                None,
                root,
            ))
            .unwrap();
        registry
            .add(RepoRecord::new(
                "svelte",
                "https://github.com/sveltejs/svelte",
                Some("master".to_string()),
                None,
                root,
            ))
            .unwrap();
        registry
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let (_temp_dir, store) = store_in_temp();
        let registry = sample_registry(store.root());

        store.save(&registry).expect("Failed to save registry");
        let loaded = store.load().expect("Failed to load registry");

        assert_eq!(loaded, registry);
    }

    #[test]
    fn test_load_missing_document_yields_empty_registry() {
        let (_temp_dir, store) = store_in_temp();

        let loaded = store.load().expect("Missing config should not error");

        assert!(loaded.is_empty());
    }

    #[test]
    fn test_load_malformed_document_is_parse_error() {
        let (_temp_dir, store) = store_in_temp();
        fs::create_dir_all(store.root()).unwrap();
        fs::write(store.config_path(), "{\"repos\": [oops").unwrap();

        let err = store.load().unwrap_err();

        assert!(matches!(err, Error::ConfigParse { .. }));
    }

    #[test]
    fn test_save_creates_root_directory_lazily() {
        let (_temp_dir, store) = store_in_temp();
        assert!(!store.root().exists());

        store.save(&Registry::default()).expect("Failed to save");

        assert!(store.root().is_dir());
        assert!(store.config_path().is_file());
    }

    #[test]
    fn test_document_shape_and_field_order() {
        let (_temp_dir, store) = store_in_temp();
        let mut registry = Registry::default();
        registry
            .add(RepoRecord::new(
                "demo",
                "https://example.com/demo.git",
                None,
                None,
                store.root(),
            ))
            .unwrap();

        store.save(&registry).expect("Failed to save");
        let raw = fs::read_to_string(store.config_path()).unwrap();

        // Two-space indented JSON with the record fields in declaration order.
        assert!(raw.contains("{\n  \"repos\": ["));
        assert!(raw.contains("\"name\": \"demo\""));
        let positions: Vec<usize> = ["\"name\"", "\"url\"", "\"branch\"", "\"path\""]
            .iter()
            .map(|field| raw.find(field).unwrap())
            .collect();
        assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn test_end_to_end_add_then_load_applies_defaults() {
        let (_temp_dir, store) = store_in_temp();

        let mut registry = store.load().unwrap();
        registry
            .add(RepoRecord::new(
                "demo",
                "https://example.com/demo.git",
                None,
                None,
                store.root(),
            ))
            .unwrap();
        store.save(&registry).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.len(), 1);
        let repo = loaded.get("demo").unwrap();
        assert_eq!(repo.url, "https://example.com/demo.git");
        assert_eq!(repo.branch, "main");
        assert_eq!(repo.path, store.root().join("demo"));
    }

    #[test]
    fn test_end_to_end_remove_persists() {
        let (_temp_dir, store) = store_in_temp();
        let mut registry = Registry::default();
        registry
            .add(RepoRecord::new("a", "https://example.com/a.git", None, None, store.root()))
            .unwrap();
        registry
            .add(RepoRecord::new("b", "https://example.com/b.git", None, None, store.root()))
            .unwrap();
        store.save(&registry).unwrap();

        let mut reloaded = store.load().unwrap();
        reloaded.remove("a").unwrap();
        store.save(&reloaded).unwrap();

        let final_registry = store.load().unwrap();
        assert_eq!(final_registry.len(), 1);
        assert_eq!(final_registry.get("b").unwrap().name, "b");
        assert!(final_registry.get("a").is_none());
    }

    #[test]
    fn test_config_path_is_under_root() {
        let store = ConfigStore::new("/tmp/vendor-root");
        assert_eq!(
            store.config_path(),
            PathBuf::from("/tmp/vendor-root/config.json")
        );
    }
}
