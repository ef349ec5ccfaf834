use std::path::{Path, PathBuf, MAIN_SEPARATOR};

use ignore::{DirEntry, WalkBuilder};

use crate::engine::WalkConfig;
use crate::entry::{Entry, EntryKind, Meta};
use crate::error::WalkError;
use crate::traits::Source;

/// Walks one directory tree on disk.
///
/// Every ignore-style filter is off: hidden files, `.gitignore`d paths and
/// the like are all reported. Symlinks are listed, not followed. Siblings
/// come out sorted by file name.
pub struct FsSource {
    root: PathBuf,
}

impl FsSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: trim_trailing_separator(root.into()) }
    }
}

impl Source for FsSource {
    fn walk(&self, config: &WalkConfig) -> Box<dyn Iterator<Item = Result<Entry, WalkError>>> {
        if let Err(err) = check_root(&self.root) {
            return Box::new(std::iter::once(Err(err)));
        }

        let mut builder = WalkBuilder::new(&self.root);
        builder
            .standard_filters(false)
            .ignore(false)
            .parents(false)
            .hidden(false)
            .follow_links(false)
            .same_file_system(false)
            .max_depth(config.max_depth)
            .sort_by_file_name(|a, b| a.cmp(b));

        let cwd_root = self.root == Path::new(".");
        Box::new(builder.build().map(move |res| match res {
            Ok(entry) => to_entry(entry, cwd_root),
            Err(e) => Err(map_ignore_error(e)),
        }))
    }
}

/// A root must exist and, when it is a directory, be listable. Anything else
/// is a root-level failure, not a skipped subtree.
fn check_root(root: &Path) -> Result<(), WalkError> {
    let md = std::fs::symlink_metadata(root).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => WalkError::NotFound(root.to_path_buf()),
        _ => WalkError::InvalidSource(root.to_path_buf()),
    })?;
    if md.is_dir() {
        std::fs::read_dir(root).map_err(|_| WalkError::InvalidSource(root.to_path_buf()))?;
    }
    Ok(())
}

/// Convert a walker entry. Children of a `.` root are reported without the
/// leading `./`.
fn to_entry(entry: DirEntry, cwd_root: bool) -> Result<Entry, WalkError> {
    let md = entry.metadata().map_err(map_ignore_error)?;
    let kind = EntryKind::from_file_type(md.file_type());
    // Counted by the walker as it descends, not derived from the path string.
    let depth = entry.depth();

    let mut path = entry.into_path();
    if cwd_root && depth > 0 {
        if let Ok(rel) = path.strip_prefix(".") {
            path = rel.to_path_buf();
        }
    }
    Ok(Entry::new(path, kind, depth, Meta::from_metadata(&md)))
}

// ---------------------------------------------------------------------------
// Map ignore::Error to WalkError
// ---------------------------------------------------------------------------

fn map_ignore_error(e: ignore::Error) -> WalkError {
    map_with_path(e, None)
}

/// `ignore` nests walkdir errors as `WithPath { WithDepth { Io } }`; peel the
/// wrappers and keep the innermost path.
fn map_with_path(e: ignore::Error, path: Option<PathBuf>) -> WalkError {
    match e {
        ignore::Error::WithPath { path, err } => map_with_path(*err, Some(path)),
        ignore::Error::WithDepth { err, .. } => map_with_path(*err, path),
        ignore::Error::Loop { child, .. } => WalkError::SymlinkLoop(child),
        ignore::Error::Io(io_err) => {
            let path = path.unwrap_or_default();
            if io_err.kind() == std::io::ErrorKind::PermissionDenied {
                WalkError::PermissionDenied(path)
            } else {
                WalkError::Io { path, source: io_err }
            }
        }
        other => match path {
            Some(path) => WalkError::Source(format!("{}: {}", path.display(), other)),
            None => WalkError::Source(other.to_string()),
        },
    }
}

fn trim_trailing_separator(root: PathBuf) -> PathBuf {
    match root.to_str() {
        Some(s) if s.len() > 1 && s.ends_with(MAIN_SEPARATOR) => {
            PathBuf::from(&s[..s.len() - MAIN_SEPARATOR.len_utf8()])
        }
        _ => root,
    }
}
