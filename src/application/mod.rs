//! Application layer: the game engine
//!
//! This layer drives the question tree and depends on I/O boundary traits.

pub mod error;
pub mod error_ext;
pub mod game;

pub use error::{ApplicationError, ApplicationResult};
pub use error_ext::IoResultExt;
pub use game::{GameEngine, GameSettings, LearnStage, MenuChoice, SessionEnd, State};
