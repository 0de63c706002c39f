//! Organization chart core.
//!
//! Three representations of one hierarchy and the conversions between them:
//! flat records (tabular import/export), the ownership forest (an id-indexed
//! arena that edits operate on) and the display tree handed to a renderer.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
