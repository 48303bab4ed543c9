//! Vendo - Personal Git Dependency Mirroring Tool
//!
//! Vendo tracks a list of external git repositories in a user-level JSON
//! configuration file and keeps local clones of them in sync: missing
//! repositories are shallow-cloned, existing ones are fetched, switched to
//! their configured branch, and pulled.
//!
//! ## Core Features
//!
//! - **Registry Management**: Named repository records with per-repo branch
//!   and local path, persisted under a single vendor root
//! - **One-Shot Sync**: Sequential clone-or-update runs over the whole
//!   registry or a single named repo
//! - **Fault Isolation**: A failing repository is reported and skipped, never
//!   aborting the rest of the run
//!
//! ## Modules
//!
//! - [`config`]: Registry persistence under the vendor root
//! - [`registry`]: Repository records and in-memory registry operations
//! - [`git`]: Subprocess plumbing for the external `git` binary
//! - [`sync`]: The per-record clone-or-update state machine

pub mod config;
pub mod error;
pub mod git;
pub mod registry;
pub mod sync;

pub use config::ConfigStore;
pub use error::{Error, Result};
pub use git::{GitRunner, SystemGit};
pub use registry::{Registry, RepoRecord, DEFAULT_BRANCH};
pub use sync::{SyncEngine, SyncOutcome, SyncStage};
