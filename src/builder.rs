use std::io::Write;
use std::path::PathBuf;

use crate::command::{CommandRunner, CommandTemplate};
use crate::engine::{run, EngineOptions, WalkConfig};
use crate::error::WalkError;
use crate::format::{FormatProgram, Renderer};
use crate::matchers::{ExecutableMatcher, KindMatcher};
use crate::owner::{Resolver, SystemResolver};
use crate::range::DepthRange;
use crate::results::Results;
use crate::source::FsSource;
use crate::traits::{Action, Matcher, Source};

// ---------------------------------------------------------------------------
// WalkBuilder
// ---------------------------------------------------------------------------

/// Entry point for configuring and executing a walk.
///
/// Created via [`pwalk::walk()`](crate::walk). Configure with chained
/// builder methods, then call [`run()`](WalkBuilder::run) to execute.
///
/// # Example
///
/// ```rust,ignore
/// let results = pwalk::walk()
///     .root("src")
///     .files_only(true)
///     .depth(DepthRange::parse("1,2")?)
///     .format(FormatProgram::compile("ns"))
///     .run(&mut std::io::stdout().lock())?;
/// ```
#[derive(Default)]
pub struct WalkBuilder {
    sources:         Vec<Box<dyn Source>>,
    matchers:        Vec<Box<dyn Matcher>>,
    dirs_only:       bool,
    files_only:      bool,
    executable_only: bool,
    range:           DepthRange,
    format:          Option<FormatProgram>,
    command:         Option<CommandTemplate>,
    resolver:        Option<Box<dyn Resolver>>,
}

impl WalkBuilder {
    // ── Sources ───────────────────────────────────────────────────────────

    /// Walk a directory tree on disk. May be called repeatedly; roots are
    /// walked in the order they were added.
    pub fn root(self, path: impl Into<PathBuf>) -> Self {
        self.source(FsSource::new(path))
    }

    /// Walk any [`Source`].
    pub fn source(mut self, s: impl Source + 'static) -> Self {
        self.sources.push(Box::new(s));
        self
    }

    // ── Filters ───────────────────────────────────────────────────────────

    /// Only pass directories.
    pub fn dirs_only(mut self, yes: bool) -> Self {
        self.dirs_only = yes;
        self
    }

    /// Only pass non-directories. Combined with `dirs_only` nothing passes.
    pub fn files_only(mut self, yes: bool) -> Self {
        self.files_only = yes;
        self
    }

    /// Only pass entries with at least one execute bit set.
    pub fn executable_only(mut self, yes: bool) -> Self {
        self.executable_only = yes;
        self
    }

    /// Inclusive depth bounds. Unbounded by default.
    pub fn depth(mut self, range: DepthRange) -> Self {
        self.range = range;
        self
    }

    /// Add a custom filter, checked after the built-in ones.
    pub fn with_matcher(mut self, m: impl Matcher + 'static) -> Self {
        self.matchers.push(Box::new(m));
        self
    }

    // ── Action ────────────────────────────────────────────────────────────

    /// Output format for printed entries. Defaults to `p`.
    pub fn format(mut self, program: FormatProgram) -> Self {
        self.format = Some(program);
        self
    }

    /// Run a shell command per entry instead of printing. Takes precedence
    /// over [`format`](Self::format).
    pub fn command(mut self, template: CommandTemplate) -> Self {
        self.command = Some(template);
        self
    }

    /// Id-to-name lookup for the `U`, `G` and `M` codes. Defaults to the
    /// system databases.
    pub fn resolver(mut self, r: impl Resolver + 'static) -> Self {
        self.resolver = Some(Box::new(r));
        self
    }

    // ── Execute ───────────────────────────────────────────────────────────

    /// Execute the walk, writing output to `out`.
    ///
    /// # Errors
    ///
    /// Returns `Err` only when there is nothing to walk. Everything that goes
    /// wrong during the walk is logged and collected into [`Results::errors`].
    pub fn run(self, out: &mut dyn Write) -> Result<Results, WalkError> {
        if self.sources.is_empty() {
            return Err(WalkError::Usage("no source provided".into()));
        }

        let mut matchers: Vec<Box<dyn Matcher>> = Vec::new();
        if self.dirs_only || self.files_only {
            matchers.push(Box::new(KindMatcher {
                dirs_only:  self.dirs_only,
                files_only: self.files_only,
            }));
        }
        if self.executable_only {
            matchers.push(Box::new(ExecutableMatcher));
        }
        matchers.extend(self.matchers);

        let action: Box<dyn Action> = match self.command {
            Some(template) => Box::new(CommandRunner::new(template)),
            None => Box::new(Renderer::new(
                self.format.unwrap_or_default(),
                self.resolver.unwrap_or_else(|| Box::new(SystemResolver::new())),
            )),
        };

        let opts = EngineOptions {
            config: WalkConfig {
                max_depth: self.range.descend_limit(),
            },
            sources: self.sources,
            range: self.range,
            matchers,
            action,
        };

        Ok(run(opts, out))
    }
}
