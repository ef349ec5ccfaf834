use std::time::Duration;

use crate::error::WalkError;

/// The outcome of a completed walk.
///
/// Output has already been written by the time this is returned; `Results`
/// only carries the counts and the errors that were reported along the way.
pub struct Results {
    /// Entries that survived filtering and were handed to the action.
    pub matches: usize,

    /// Scan statistics.
    pub stats: ScanStats,

    /// Every error encountered, in order. Use [`WalkError::is_recoverable`]
    /// to tell skipped work apart from failed roots.
    pub errors: Vec<WalkError>,
}

impl Results {
    /// Whether any root could not be walked at all.
    pub fn has_fatal(&self) -> bool {
        self.errors.iter().any(|e| !e.is_recoverable())
    }
}

/// Statistics for a completed scan.
pub struct ScanStats {
    /// Total number of non-directories visited (matched or not).
    pub files: usize,

    /// Total number of directories visited.
    pub dirs: usize,

    /// Wall-clock time from walk start to completion.
    pub duration: Duration,

    /// Entries visited per second, 0 on zero-duration runs.
    pub entries_per_sec: usize,
}

impl ScanStats {
    pub(crate) fn compute(files: usize, dirs: usize, duration: Duration) -> Self {
        let total = files + dirs;
        let eps = if duration.as_secs_f64() > 0.0 {
            (total as f64 / duration.as_secs_f64()) as usize
        } else {
            0
        };
        Self {
            files,
            dirs,
            duration,
            entries_per_sec: eps,
        }
    }
}
