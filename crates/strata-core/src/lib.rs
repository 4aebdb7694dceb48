//! Strata Core Components
//!
//! Workspace and session management on top of `strata-indexer`: opening a
//! project wires the live tree to the file watcher and gives on-demand
//! access to the project graph.

mod config;
mod error;
mod logging;
mod session;
mod workspace;

pub use config::WorkspaceConfig;
pub use error::CoreError;
pub use logging::init_logging;
pub use session::WorkspaceSession;
pub use workspace::{Workspace, PROJECT_MANIFEST};
