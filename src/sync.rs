//! Sync Engine - brings local clones in line with their registry records.
//!
//! Each selected record runs through a small state machine, re-derived from
//! the filesystem on every run (nothing is persisted between runs):
//!
//! ```text
//! Probe ── no .git ──> Clone
//!   └──── .git ──────> Fetch ──> Checkout (else create tracking) ──> Pull
//! ```
//!
//! Failures are contained per record: a failed transition stops that record,
//! is reported, and the engine moves on to the next one. Records are
//! processed strictly one at a time in registry order.

use std::fmt;
use std::fs;

use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::git::GitRunner;
use crate::registry::{Registry, RepoRecord};

/// Transition at which a record's sync gave up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStage {
    Clone,
    Fetch,
    Checkout,
    Pull,
}

impl fmt::Display for SyncStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SyncStage::Clone => "cloning",
            SyncStage::Fetch => "fetching",
            SyncStage::Checkout => "checking out branch",
            SyncStage::Pull => "pulling",
        };
        f.write_str(label)
    }
}

/// Terminal state of one record's sync.
#[derive(Debug)]
pub enum SyncOutcome {
    /// The repository was materialized by a fresh shallow clone.
    Cloned { name: String },
    /// An existing clone was fetched, switched to its branch, and pulled.
    Updated { name: String },
    /// A transition failed; the record's remaining transitions were skipped.
    Failed {
        name: String,
        stage: SyncStage,
        error: Error,
    },
}

impl SyncOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, SyncOutcome::Failed { .. })
    }
}

/// Drives the per-record state machine over an injected [`GitRunner`].
pub struct SyncEngine<R> {
    runner: R,
}

impl<R: GitRunner> SyncEngine<R> {
    pub fn new(runner: R) -> Self {
        Self { runner }
    }

    /// Process records in registry order.
    ///
    /// With a `name` filter exactly the matching record is processed; a name
    /// matching no record is an explicit [`Error::NotFound`] rather than a
    /// silent no-op. Per-record failures never abort the run; they are
    /// reported and returned in the outcome list.
    pub fn sync(&self, registry: &Registry, name: Option<&str>) -> Result<Vec<SyncOutcome>> {
        let selected: Vec<&RepoRecord> = match name {
            Some(name) => vec![registry
                .get(name)
                .ok_or_else(|| Error::NotFound(name.to_string()))?],
            None => registry.iter().collect(),
        };

        let mut outcomes = Vec::with_capacity(selected.len());
        for record in selected {
            outcomes.push(self.sync_record(record));
        }

        Ok(outcomes)
    }

    /// Run the state machine for one record, reporting progress as it goes.
    pub fn sync_record(&self, record: &RepoRecord) -> SyncOutcome {
        println!("Processing {}...", record.name);

        let result = if record.is_cloned() {
            println!("  Updating existing repo...");
            self.refresh(record)
        } else {
            println!("  Cloning repo...");
            self.clone_fresh(record)
        };

        match result {
            Ok(outcome) => {
                println!("  ✓ {} done\n", record.name);
                outcome
            }
            Err((stage, error)) => {
                println!("  Error {stage}: {error}");
                warn!(repo = %record.name, %stage, %error, "sync failed");
                SyncOutcome::Failed {
                    name: record.name.clone(),
                    stage,
                    error,
                }
            }
        }
    }

    fn clone_fresh(&self, record: &RepoRecord) -> std::result::Result<SyncOutcome, (SyncStage, Error)> {
        if let Some(parent) = record.path.parent() {
            fs::create_dir_all(parent).map_err(|err| {
                (
                    SyncStage::Clone,
                    Error::Io {
                        path: parent.to_path_buf(),
                        source: err,
                    },
                )
            })?;
        }

        self.runner
            .clone_repo(&record.url, &record.branch, &record.path)
            .map_err(|err| (SyncStage::Clone, err))?;

        Ok(SyncOutcome::Cloned {
            name: record.name.clone(),
        })
    }

    fn refresh(&self, record: &RepoRecord) -> std::result::Result<SyncOutcome, (SyncStage, Error)> {
        let workdir = record.path.as_path();

        self.runner
            .fetch(workdir)
            .map_err(|err| (SyncStage::Fetch, err))?;

        // Switch to the target branch; when it does not exist locally yet,
        // fall back to creating it tracking origin.
        if let Err(first) = self.runner.checkout(workdir, &record.branch) {
            debug!(repo = %record.name, error = %first, "checkout failed, creating tracking branch");
            self.runner
                .checkout_tracking(workdir, &record.branch)
                .map_err(|err| (SyncStage::Checkout, err))?;
        }

        self.runner
            .pull(workdir, &record.branch)
            .map_err(|err| (SyncStage::Pull, err))?;

        Ok(SyncOutcome::Updated {
            name: record.name.clone(),
        })
    }
}
