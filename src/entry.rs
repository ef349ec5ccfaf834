use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// A single item produced by a [`Source`](crate::traits::Source) during traversal.
///
/// Entries are transient: built by the source, filtered, handed to the
/// action, then dropped.
#[derive(Debug, Clone)]
pub struct Entry {
    /// Path as produced by the walk: the root as given, children joined below it.
    pub path: PathBuf,

    /// Final path component.
    pub name: String,

    /// What kind of entry this is.
    pub kind: EntryKind,

    /// Nesting level below the walk root. Root = 0.
    pub depth: usize,

    /// Metadata snapshot taken when the entry was visited.
    pub meta: Meta,
}

impl Entry {
    /// Build an entry for `path`, deriving `name` from its last component.
    pub fn new(path: impl Into<PathBuf>, kind: EntryKind, depth: usize, meta: Meta) -> Self {
        let path = path.into();
        let name = base_name(&path);
        Self { path, name, kind, depth, meta }
    }

    /// The literal `.` and `..` pseudo-entries.
    pub fn is_pseudo(&self) -> bool {
        self.path == Path::new(".") || self.path == Path::new("..")
    }

    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Dir
    }
}

/// The kind of a traversed entry. Symlinks are reported, never followed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// A regular file.
    File,

    /// A directory.
    Dir,

    /// A symbolic link.
    Symlink,

    /// Anything else (device files, pipes, sockets, etc.).
    Other,
}

impl EntryKind {
    pub fn from_file_type(ft: std::fs::FileType) -> Self {
        if ft.is_dir() {
            EntryKind::Dir
        } else if ft.is_file() {
            EntryKind::File
        } else if ft.is_symlink() {
            EntryKind::Symlink
        } else {
            EntryKind::Other
        }
    }
}

/// The stat fields the format codes can render.
///
/// Times are Unix epoch seconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Meta {
    pub size:     u64,
    pub modified: i64,
    /// Not every platform or filesystem records access times.
    pub accessed: Option<i64>,
    pub uid:      u32,
    pub gid:      u32,
    /// Permission bits, including setuid/setgid/sticky.
    pub mode:     u32,
}

impl Meta {
    #[cfg(unix)]
    pub fn from_metadata(md: &std::fs::Metadata) -> Self {
        use std::os::unix::fs::MetadataExt;

        Self {
            size:     md.size(),
            modified: md.mtime(),
            accessed: Some(md.atime()),
            uid:      md.uid(),
            gid:      md.gid(),
            mode:     md.mode() & 0o7777,
        }
    }

    #[cfg(not(unix))]
    pub fn from_metadata(md: &std::fs::Metadata) -> Self {
        let mode = if md.permissions().readonly() { 0o555 } else { 0o777 };
        Self {
            size:     md.len(),
            modified: md.modified().map(epoch_secs).unwrap_or(0),
            accessed: md.accessed().ok().map(epoch_secs),
            uid:      0,
            gid:      0,
            mode,
        }
    }

    /// At least one of the user/group/other execute bits is set.
    pub fn is_executable(&self) -> bool {
        self.mode & 0o111 != 0
    }
}

/// Seconds since the Unix epoch, negative for times before it.
pub fn epoch_secs(t: SystemTime) -> i64 {
    match t.duration_since(UNIX_EPOCH) {
        Ok(d) => d.as_secs() as i64,
        Err(e) => -(e.duration().as_secs() as i64),
    }
}

/// Render permission bits as the nine-character `rwxr-xr-x` form.
///
/// ```rust
/// assert_eq!(pwalk::symbolic_mode(0o755), "rwxr-xr-x");
/// assert_eq!(pwalk::symbolic_mode(0o1777), "rwxrwxrwt");
/// assert_eq!(pwalk::symbolic_mode(0o4644), "rwSr--r--");
/// ```
pub fn symbolic_mode(mode: u32) -> String {
    const SLOTS: [(u32, u32, char, char); 3] = [
        (0o700, 0o4000, 's', 'S'),
        (0o070, 0o2000, 's', 'S'),
        (0o007, 0o1000, 't', 'T'),
    ];

    let mut out = String::with_capacity(9);
    for (mask, special, set, unset) in SLOTS {
        let bits = mode & mask;
        let (r, w, x) = (bits & 0o444 != 0, bits & 0o222 != 0, bits & 0o111 != 0);
        out.push(if r { 'r' } else { '-' });
        out.push(if w { 'w' } else { '-' });
        out.push(match (mode & special != 0, x) {
            (true, true) => set,
            (true, false) => unset,
            (false, true) => 'x',
            (false, false) => '-',
        });
    }
    out
}

fn base_name(path: &Path) -> String {
    match path.file_name() {
        Some(name) => name.to_string_lossy().into_owned(),
        None => path.to_string_lossy().into_owned(),
    }
}
