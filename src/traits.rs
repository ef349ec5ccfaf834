use std::io::Write;

use crate::engine::WalkConfig;
use crate::entry::Entry;
use crate::error::WalkError;

/// A source of entries to walk.
///
/// [`FsSource`](crate::FsSource) walks a directory tree; tests and embedders
/// can implement this for anything else that has a tree shape.
///
/// # Ordering
///
/// Entries must come out depth-first, pre-order: a directory before its
/// children.
///
/// # Error Handling
///
/// Recoverable errors (permission denied, unreadable directories) should be
/// yielded as `Err(WalkError)` and the walk continued. A root that cannot be
/// walked at all should yield a single non-recoverable error
/// ([`WalkError::NotFound`] or [`WalkError::InvalidSource`]).
///
/// # Example
///
/// ```rust
/// use pwalk::{Entry, EntryKind, Meta, Source, WalkConfig, WalkError};
///
/// struct VecSource(Vec<&'static str>);
///
/// impl Source for VecSource {
///     fn walk(&self, _config: &WalkConfig) -> Box<dyn Iterator<Item = Result<Entry, WalkError>>> {
///         let entries = self.0.iter()
///             .map(|p| Ok(Entry::new(*p, EntryKind::File, 1, Meta::default())))
///             .collect::<Vec<_>>();
///         Box::new(entries.into_iter())
///     }
/// }
/// ```
pub trait Source {
    /// Traverse the source and yield entries.
    ///
    /// Sources must not descend below `config.max_depth` when it is set.
    fn walk(&self, config: &WalkConfig) -> Box<dyn Iterator<Item = Result<Entry, WalkError>>>;
}

/// Decides whether an entry survives filtering.
///
/// # Example
///
/// ```rust
/// use pwalk::{Entry, Matcher};
///
/// struct ExtensionMatcher(String);
///
/// impl Matcher for ExtensionMatcher {
///     fn is_match(&self, entry: &Entry) -> bool {
///         entry.path
///             .extension()
///             .map(|e| e.eq_ignore_ascii_case(&self.0))
///             .unwrap_or(false)
///     }
/// }
/// ```
pub trait Matcher {
    /// Returns `true` if this entry should be passed on to the action.
    fn is_match(&self, entry: &Entry) -> bool;
}

/// What happens to every entry that survives filtering.
///
/// The two built-in actions are [`Renderer`](crate::Renderer), which prints a
/// formatted line, and [`CommandRunner`](crate::CommandRunner), which runs a
/// shell command per entry.
pub trait Action {
    /// Handle one entry, writing any output to `out`.
    ///
    /// Errors returned here are per-entry: the engine logs them and moves on.
    fn apply(&mut self, entry: &Entry, out: &mut dyn Write) -> Result<(), WalkError>;
}
