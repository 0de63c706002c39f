//! Domain layer: entities and tree logic
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod builder;
pub mod entities;
pub mod error;
pub mod flattener;
pub mod ids;
pub mod mutator;
pub mod parser;
pub mod projector;
pub mod tree_traits;

pub use arena::{OrgEntry, OrgForest};
pub use builder::{build, BuildOutput, TreeBuilder};
pub use entities::*;
pub use error::{DomainError, DomainResult, ImportWarning};
pub use flattener::{flatten, flatten_nodes};
pub use ids::{generate_id, generate_unique_id};
pub use parser::{parse_records, write_records};
pub use projector::{project, Projection, Projector};
pub use tree_traits::TreeNodeConvert;
