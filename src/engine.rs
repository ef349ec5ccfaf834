use std::io::{ErrorKind, Write};
use std::time::Instant;

use log::{debug, error, warn};

use crate::error::WalkError;
use crate::range::DepthRange;
use crate::results::{Results, ScanStats};
use crate::traits::{Action, Matcher, Source};

// ---------------------------------------------------------------------------
// WalkConfig
// ---------------------------------------------------------------------------

/// Traversal parameters handed to every [`Source`].
#[derive(Debug, Clone, Copy, Default)]
pub struct WalkConfig {
    /// Do not descend below this depth. Root = 0. `None` is unlimited.
    pub max_depth: Option<usize>,
}

// ---------------------------------------------------------------------------
// Engine options
// ---------------------------------------------------------------------------

/// Everything `run()` needs, assembled by the builder.
pub(crate) struct EngineOptions {
    pub config:   WalkConfig,
    pub sources:  Vec<Box<dyn Source>>,
    pub range:    DepthRange,
    pub matchers: Vec<Box<dyn Matcher>>,
    pub action:   Box<dyn Action>,
}

// ---------------------------------------------------------------------------
// run()
// ---------------------------------------------------------------------------

/// Walk every source in order, filter, and dispatch survivors to the action.
///
/// Strictly sequential: one source is exhausted before the next begins.
/// Errors skip the smallest unit of work they affect and are collected into
/// [`Results::errors`]. A non-recoverable error ends the current source only.
pub(crate) fn run(opts: EngineOptions, out: &mut dyn Write) -> Results {
    let EngineOptions {
        config,
        sources,
        range,
        matchers,
        mut action,
    } = opts;

    let mut matches = 0;
    let mut files = 0;
    let mut dirs = 0;
    let mut errors = Vec::new();

    let start = Instant::now();

    'sources: for source in &sources {
        for res in source.walk(&config) {
            let entry = match res {
                Ok(e) => e,
                Err(e) if e.is_recoverable() => {
                    warn!("{e}");
                    errors.push(e);
                    continue;
                }
                Err(e) => {
                    error!("{e}");
                    errors.push(e);
                    continue 'sources;
                }
            };

            if entry.is_dir() {
                dirs += 1;
            } else {
                files += 1;
            }

            if entry.is_pseudo() {
                continue;
            }

            // Sources already prune below max; this also drops anything
            // above min.
            if !range.admits(entry.depth) {
                continue;
            }

            if !matchers.iter().all(|m| m.is_match(&entry)) {
                continue;
            }

            matches += 1;

            if let Err(e) = action.apply(&entry, out) {
                if is_broken_pipe(&e) {
                    debug!("output closed, stopping walk");
                    break 'sources;
                }
                warn!("{e}");
                errors.push(e);
            }
        }
    }

    let duration = start.elapsed();
    let stats = ScanStats::compute(files, dirs, duration);
    debug!(
        "visited {} files and {} dirs in {:.3}s ({} entries/s), {} matched",
        stats.files,
        stats.dirs,
        stats.duration.as_secs_f64(),
        stats.entries_per_sec,
        matches
    );

    Results {
        matches,
        stats,
        errors,
    }
}

fn is_broken_pipe(e: &WalkError) -> bool {
    matches!(e, WalkError::Io { source, .. } if source.kind() == ErrorKind::BrokenPipe)
}
