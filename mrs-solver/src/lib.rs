//! Library surface backing the `mrs-solver` binary: CLI parsing and
//! validation, the instance-file loader, and the top-level solve loop.
//! Exposed as a library too so integration tests can drive `Config` and
//! `solve::run` without spawning a subprocess.

pub mod config;
pub mod error;
pub mod loader;
pub mod solve;

pub use config::{Cli, Config};
pub use error::{OptionsError, SolverError};
