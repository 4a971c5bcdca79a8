//! animal-game: a guess-the-animal console game backed by a learning
//! yes/no decision tree.
//!
//! - [`domain`]: the arena-backed [`domain::QuestionTree`] and its entities
//! - [`application`]: the [`application::GameEngine`] state machine
//! - [`infrastructure`]: the [`infrastructure::Terminal`] I/O boundary
//! - [`config`]: layered [`config::Settings`]
//! - [`cli`]: argument parsing and command dispatch

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
