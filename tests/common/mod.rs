/// Common test utilities and helpers for vendo integration tests

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

/// An isolated vendor root plus a handle for driving the real binary.
pub struct TestEnvironment {
    pub temp_dir: TempDir,
}

impl TestEnvironment {
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    /// The vendor root this environment's commands operate on.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn config_path(&self) -> PathBuf {
        self.root().join("config.json")
    }

    /// Run the binary with `--root` pointed at the isolated vendor root.
    pub fn run(&self, args: &[&str]) -> Output {
        let root = self.root().to_string_lossy().into_owned();
        let mut full_args: Vec<String> =
            vec!["run".into(), "--quiet".into(), "--".into(), "--root".into(), root];
        full_args.extend(args.iter().map(|arg| arg.to_string()));

        Command::new("cargo")
            .args(&full_args)
            .output()
            .expect("Failed to execute vendo")
    }

    /// Load the persisted registry through the library for assertions.
    pub fn load_registry(&self) -> vendo::Registry {
        vendo::ConfigStore::new(self.root())
            .load()
            .expect("Failed to load registry")
    }
}

pub fn stdout_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

pub fn stderr_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

/// Assert that `text` contains every expected fragment.
pub fn assert_contains_all(text: &str, expected: &[&str]) {
    for item in expected {
        assert!(
            text.contains(item),
            "Expected text to contain '{}', but it didn't. Text: {}",
            item,
            text
        );
    }
}
