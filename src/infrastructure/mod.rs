//! Infrastructure layer: I/O implementations
//!
//! This layer implements the I/O boundary traits the application layer depends on.

pub mod traits;

pub use traits::{StdTerminal, StreamTerminal, Terminal};
