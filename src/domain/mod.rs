//! Domain layer: entities and the question tree
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod display;
pub mod entities;
pub mod error;

pub use arena::{NodeId, NodeKind, QuestionTree, TreeIterator, TreeNode};
pub use display::TreeDisplay;
pub use entities::*;
pub use error::{DomainError, DomainResult};
