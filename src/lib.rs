//! # pwalk
//!
//! A Plan 9 style directory walker.
//!
//! pwalk walks one or more roots depth-first, filters entries by kind,
//! execute bit and depth, then either prints a formatted line per entry or
//! runs a shell command with the entry's path substituted in. The `walk`
//! binary is a thin clap front end over [`walk()`].
//!
//! # Quick Start
//!
//! ```rust
//! use pwalk::{DepthRange, Entry, EntryKind, FormatProgram, Meta, Source, WalkConfig, WalkError};
//!
//! // A minimal in-memory tree for demonstration
//! struct Fixed(Vec<(&'static str, usize, u64)>);
//!
//! impl Source for Fixed {
//!     fn walk(&self, _config: &WalkConfig) -> Box<dyn Iterator<Item = Result<Entry, WalkError>>> {
//!         let entries = self.0.iter().map(|&(path, depth, size)| Ok(Entry::new(
//!             path,
//!             EntryKind::File,
//!             depth,
//!             Meta { size, ..Meta::default() },
//!         ))).collect::<Vec<_>>();
//!         Box::new(entries.into_iter())
//!     }
//! }
//!
//! let mut out = Vec::new();
//! let results = pwalk::walk()
//!     .source(Fixed(vec![("a.txt", 1, 3), ("sub/b.txt", 2, 42)]))
//!     .depth(DepthRange::parse("2,").unwrap())
//!     .format(FormatProgram::compile("ns"))
//!     .run(&mut out)
//!     .unwrap();
//!
//! assert_eq!(results.matches, 1);
//! assert_eq!(String::from_utf8(out).unwrap(), "b.txt 42\n");
//! ```
//!
//! # Commands
//!
//! ```rust,no_run
//! use pwalk::CommandTemplate;
//!
//! pwalk::walk()
//!     .root("src")
//!     .files_only(true)
//!     .command(CommandTemplate::parse("wc -l %"))
//!     .run(&mut std::io::stdout())
//!     .unwrap();
//! ```

#![forbid(unsafe_code)]

pub mod cli;
pub mod engine;

mod builder;
mod command;
mod entry;
mod error;
mod format;
mod matchers;
mod owner;
mod range;
mod results;
mod source;
mod traits;

// ── Public re-exports ─────────────────────────────────────────────────────────

pub use builder::WalkBuilder;
pub use command::{CommandRunner, CommandTemplate, CommandToken};
pub use engine::WalkConfig;
pub use entry::{epoch_secs, symbolic_mode, Entry, EntryKind, Meta};
pub use error::WalkError;
pub use format::{FieldCode, FormatProgram, FormatToken, Renderer};
pub use matchers::{ExecutableMatcher, KindMatcher};
pub use owner::{Resolver, SystemResolver};
pub use range::DepthRange;
pub use results::{Results, ScanStats};
pub use source::FsSource;
pub use traits::{Action, Matcher, Source};

// ── Entry point ───────────────────────────────────────────────────────────────

/// Create a new [`WalkBuilder`] to configure and run a walk.
///
/// # Example
///
/// ```rust,no_run
/// let results = pwalk::walk()
///     .root(".")
///     .dirs_only(true)
///     .run(&mut std::io::stdout())
///     .unwrap();
///
/// if results.has_fatal() {
///     std::process::exit(1);
/// }
/// ```
pub fn walk() -> WalkBuilder {
    WalkBuilder::default()
}
