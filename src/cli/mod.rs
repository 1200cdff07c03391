//! Command orchestration.
//!
//! Glue between clap argument structs and the library: loads config,
//! wires the process runner, repository state, classifier and
//! confirmation provider together, and maps outcomes to exit behavior.

pub mod release;
pub mod sync;

pub use release::{run_next_version, run_release, ReleaseArgs};
pub use sync::run_sync;
