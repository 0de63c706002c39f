//! Application layer: editor session and chart services
//!
//! This layer orchestrates domain logic and depends on I/O boundary traits.

pub mod error;
pub mod error_ext;
pub mod services;
pub mod session;

pub use error::{ApplicationError, ApplicationResult};
pub use error_ext::IoResultExt;
pub use services::{ChartService, ImportOutcome};
pub use session::{EditorSession, EditorState, Intent, NodeForm};
