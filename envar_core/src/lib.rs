//! `envar_core` is the engine behind environment variable editors. It parses
//! `KEY="VALUE"` text, validates variable names, reports duplicate and
//! already-defined names, and reconciles an in-progress draft against a
//! baseline that changed underneath it without losing the user's edits.
//!
//! ## Processing Pipeline
//!
//! ```text
//! Expert mode text
//!   → Parser (one ParsedLine per non-blank line)
//!   → Detector (invalid lines, invalid names, duplicates, already-defined names)
//!   → Reconciliation engine (EditState: unchanged / added / modified / deleted)
//!   → Serializer (canonical NAME="VALUE" text)
//! ```
//!
//! ## Modules
//!
//! - [`config`] - Configuration loading from `envar.toml`.
//! - [`session`] - An editing session with simple and expert modes, reset,
//!   submit, and baseline reconciliation, notifying observers on every
//!   transition.
//!
//! ## Key Types
//!
//! - [`ParsedLine`] - The outcome of parsing one line.
//! - [`Diagnostic`] - A structured problem report keyed by line or name.
//! - [`EditState`] - A draft with a status per entry, relative to a baseline.
//! - [`EditorSession`] - The stateful front of the engine.
//!
//! ## Quick Start
//!
//! ```rust
//! use envar_core::*;
//!
//! let baseline: VariableSet = [("FOO", "old"), ("BAR", "1")].into_iter().collect();
//! let state = start_editing(&baseline);
//! let state = set_value(&state, "FOO", "bar");
//!
//! // The baseline changed on the server in the meantime.
//! let updated: VariableSet = [("FOO", "old2"), ("BAR", "2")].into_iter().collect();
//! let state = reconcile(&state, &updated);
//!
//! assert_eq!(state.status("FOO"), Some(EntryStatus::Modified));
//! assert_eq!(serialize(&to_serialized_set(&state)), "FOO=\"bar\"\nBAR=\"2\"");
//! ```

pub use cache::*;
pub use config::*;
pub use detector::*;
pub use error::*;
pub use name::*;
pub use parser::*;
pub use reconcile::*;
pub use serializer::*;
pub use session::*;
pub use variable::*;

mod cache;
pub mod config;
mod detector;
#[allow(unused_assignments)]
mod error;
pub(crate) mod lexer;
mod name;
mod parser;
mod reconcile;
mod serializer;
pub mod session;
mod variable;
