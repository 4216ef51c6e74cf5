//! A minimal line-oriented shell.
//!
//! Lines are split on `;` (run and wait) and `&` (run in the background). Each piece is
//! tokenized on whitespace and either handled as a built-in (`exit`, `cd`) or spawned as an
//! external program. Background children are reaped by their own watcher thread.
pub mod builtin;
pub mod builtins;
pub mod config;
pub mod engine;
pub mod error;
pub mod input_handler;
pub mod process;
pub mod report;
pub mod splitter;
pub mod step;
pub mod watcher;

pub use config::Config;
pub use engine::{Control, Dispatch, Engine};
pub use error::{Result, ShellError};
pub use process::ExternalCommand;
pub use splitter::{next_segment, Mode, Segment, Segments};
pub use step::{tokenize, Outcome, Step};
pub use watcher::{spawn_watcher, BackgroundJob};
