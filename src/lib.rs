//! peerbump - peer-aware dependency updater for package.json
//!
//! Updates the declared ranges of `dependencies` and `devDependencies` to
//! the newest versions whose peer dependencies are satisfied by each other:
//! - Peer-dependency graph and group construction
//! - Backtracking candidate resolution
//! - Caret/tilde/conservative planning
//! - Manifest writing and an optional aggregated git commit

pub mod cli;
pub mod domain;
pub mod error;
pub mod logging;
pub mod manifest;
pub mod output;
pub mod progress;
pub mod registry;
pub mod update;
pub mod vcs;
pub mod version;
