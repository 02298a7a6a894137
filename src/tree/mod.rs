//! Forest construction and ancestor-path math over the flat department list.
//!
//! Nothing in this module fails on malformed input: dangling parent
//! references degrade to roots, unknown ids degrade to empty or singleton
//! results. Validation belongs to the mutation path, not the read path.

pub mod builder;
pub mod path;

pub use builder::{build_forest, TreeNode};
pub use path::on_path_set;
