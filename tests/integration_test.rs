use std::fs;
use std::path::{Path, PathBuf};

use pwalk::{
    walk, CommandTemplate, DepthRange, Entry, EntryKind, FormatProgram, Meta, Source, WalkConfig,
    WalkError,
};

// ---------------------------------------------------------------------------
// Test helpers
// ---------------------------------------------------------------------------

/// Create a temporary directory tree for testing.
///
/// Structure:
/// ```
/// tmp/
///   a.txt          (5 bytes, rw-r--r--)
///   run.sh         (rwxr-xr-x)
///   sub/
///     b.txt
///     deep/
///       c.txt
/// ```
fn setup_test_dir() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();

    fs::write(root.join("a.txt"), "hello").unwrap();
    fs::write(root.join("run.sh"), "#!/bin/sh\n").unwrap();

    let deep = root.join("sub").join("deep");
    fs::create_dir_all(&deep).unwrap();
    fs::write(root.join("sub").join("b.txt"), "bee").unwrap();
    fs::write(deep.join("c.txt"), "sea").unwrap();

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        for f in ["a.txt", "sub/b.txt", "sub/deep/c.txt"] {
            fs::set_permissions(root.join(f), fs::Permissions::from_mode(0o644)).unwrap();
        }
        fs::set_permissions(root.join("run.sh"), fs::Permissions::from_mode(0o755)).unwrap();
    }

    dir
}

/// An independent source built on walkdir, to check the engine against
/// something other than the `ignore`-backed `FsSource`.
struct TestDirSource(PathBuf);

impl Source for TestDirSource {
    fn walk(&self, config: &WalkConfig) -> Box<dyn Iterator<Item = Result<Entry, WalkError>>> {
        let entries = walkdir::WalkDir::new(&self.0)
            .max_depth(config.max_depth.unwrap_or(usize::MAX))
            .sort_by_file_name()
            .into_iter()
            .map(|e| match e {
                Ok(e) => {
                    let md = e.metadata().unwrap();
                    Ok(Entry::new(
                        e.path(),
                        EntryKind::from_file_type(e.file_type()),
                        e.depth(),
                        Meta::from_metadata(&md),
                    ))
                }
                Err(e) => {
                    let path = e.path().map(|p| p.to_path_buf()).unwrap_or_default();
                    Err(WalkError::Io {
                        path,
                        source: e.into_io_error().unwrap_or_else(|| {
                            std::io::Error::new(std::io::ErrorKind::Other, "walk error")
                        }),
                    })
                }
            })
            .collect::<Vec<_>>();
        Box::new(entries.into_iter())
    }
}

fn below_root() -> DepthRange {
    DepthRange::parse("1,").unwrap()
}

fn lines(out: Vec<u8>) -> Vec<String> {
    String::from_utf8(out)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

fn names(root: &Path, builder: pwalk::WalkBuilder) -> Vec<String> {
    let mut out = Vec::new();
    builder
        .root(root)
        .format(FormatProgram::compile("n"))
        .run(&mut out)
        .unwrap();
    lines(out)
}

// ---------------------------------------------------------------------------
// Traversal
// ---------------------------------------------------------------------------

#[test]
fn walks_pre_order_sorted() {
    let dir = setup_test_dir();
    let got = names(dir.path(), walk().depth(below_root()));
    assert_eq!(got, ["a.txt", "run.sh", "sub", "b.txt", "deep", "c.txt"]);
}

#[test]
fn root_is_depth_zero() {
    let dir = setup_test_dir();
    let mut out = Vec::new();
    walk()
        .root(dir.path())
        .depth(DepthRange::parse("0").unwrap())
        .run(&mut out)
        .unwrap();

    assert_eq!(
        String::from_utf8(out).unwrap(),
        format!("{}\n", dir.path().display())
    );
}

#[test]
fn children_are_one_deeper_than_root() {
    let dir = setup_test_dir();
    let got = names(dir.path(), walk().depth(DepthRange::parse("1,1").unwrap()));
    assert_eq!(got, ["a.txt", "run.sh", "sub"]);

    let got = names(dir.path(), walk().depth(DepthRange::parse("3,3").unwrap()));
    assert_eq!(got, ["c.txt"]);
}

#[test]
fn max_depth_prunes_descendants() {
    let dir = setup_test_dir();
    let mut out = Vec::new();
    let results = walk()
        .root(dir.path())
        .depth(DepthRange::parse("1,1").unwrap())
        .format(FormatProgram::compile("n"))
        .run(&mut out)
        .unwrap();

    // `sub` sits at the max depth: reported, but nothing below it is visited.
    assert!(lines(out).contains(&"sub".to_string()));
    assert_eq!(results.stats.files + results.stats.dirs, 4, "root + 3 children");
}

#[test]
fn unset_min_and_max_admit_everything() {
    let dir = setup_test_dir();
    let results = walk()
        .root(dir.path())
        .depth(DepthRange::parse(",").unwrap())
        .run(&mut Vec::new())
        .unwrap();

    assert_eq!(results.matches, 7, "root + 6 entries");
}

#[test]
fn negative_max_matches_nothing() {
    let dir = setup_test_dir();
    let results = walk()
        .root(dir.path())
        .depth(DepthRange::parse(",-1").unwrap())
        .run(&mut Vec::new())
        .unwrap();

    assert_eq!(results.matches, 0);
    assert!(results.errors.is_empty());
}

#[test]
fn trailing_separator_is_trimmed() {
    let dir = setup_test_dir();
    let root = format!("{}{}", dir.path().display(), std::path::MAIN_SEPARATOR);
    let mut out = Vec::new();
    walk()
        .root(root)
        .depth(DepthRange::parse("0,1").unwrap())
        .run(&mut out)
        .unwrap();

    let got = lines(out);
    assert_eq!(got[0], dir.path().display().to_string());
    assert_eq!(got[1], dir.path().join("a.txt").display().to_string());
}

#[test]
fn fs_source_agrees_with_walkdir() {
    let dir = setup_test_dir();
    let from_fs = names(dir.path(), walk().depth(DepthRange::parse("1,2").unwrap()));

    let mut out = Vec::new();
    walk()
        .source(TestDirSource(dir.path().to_path_buf()))
        .depth(DepthRange::parse("1,2").unwrap())
        .format(FormatProgram::compile("n"))
        .run(&mut out)
        .unwrap();

    assert_eq!(from_fs, lines(out));
    assert_eq!(from_fs, ["a.txt", "run.sh", "sub", "b.txt", "deep"]);
}

// ---------------------------------------------------------------------------
// Filters
// ---------------------------------------------------------------------------

#[test]
fn dirs_only() {
    let dir = setup_test_dir();
    let got = names(dir.path(), walk().depth(below_root()).dirs_only(true));
    assert_eq!(got, ["sub", "deep"]);
}

#[test]
fn files_only() {
    let dir = setup_test_dir();
    let got = names(dir.path(), walk().depth(below_root()).files_only(true));
    assert_eq!(got, ["a.txt", "run.sh", "b.txt", "c.txt"]);
}

#[test]
fn dirs_and_files_only_match_nothing() {
    let dir = setup_test_dir();
    let mut out = Vec::new();
    let results = walk()
        .root(dir.path())
        .dirs_only(true)
        .files_only(true)
        .run(&mut out)
        .unwrap();

    assert_eq!(results.matches, 0);
    assert!(out.is_empty());
    assert!(results.stats.files > 0, "the tree is still walked");
}

#[cfg(unix)]
#[test]
fn executable_only() {
    let dir = setup_test_dir();
    let got = names(
        dir.path(),
        walk().depth(below_root()).files_only(true).executable_only(true),
    );
    assert_eq!(got, ["run.sh"]);
}

#[test]
fn custom_matcher_runs_after_builtins() {
    struct TxtMatcher;
    impl pwalk::Matcher for TxtMatcher {
        fn is_match(&self, entry: &Entry) -> bool {
            entry.path.extension().map(|e| e == "txt").unwrap_or(false)
        }
    }

    let dir = setup_test_dir();
    let got = names(dir.path(), walk().with_matcher(TxtMatcher));
    assert_eq!(got, ["a.txt", "b.txt", "c.txt"]);
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[test]
fn missing_root_is_fatal_but_walk_continues() {
    let dir = setup_test_dir();
    let missing = dir.path().join("nope");
    let mut out = Vec::new();
    let results = walk()
        .root(&missing)
        .root(dir.path().join("sub"))
        .format(FormatProgram::compile("n"))
        .run(&mut out)
        .unwrap();

    assert!(results.has_fatal());
    assert_eq!(results.errors.len(), 1);
    assert!(matches!(&results.errors[0], WalkError::NotFound(p) if *p == missing));
    assert_eq!(lines(out), ["sub", "b.txt", "deep", "c.txt"]);
}

#[test]
fn no_source_is_an_error() {
    let err = walk().run(&mut Vec::new()).err().unwrap();
    assert!(matches!(err, WalkError::Usage(_)));
    assert_eq!(err.to_string(), "no source provided");
}

/// Permission bits mean nothing to root, so these only run unprivileged.
#[cfg(unix)]
fn running_as_root() -> bool {
    nix::unistd::geteuid().is_root()
}

#[cfg(unix)]
fn set_mode(path: &Path, mode: u32) {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(mode)).unwrap();
}

#[cfg(unix)]
#[test]
fn unreadable_subdir_is_skipped_and_siblings_continue() {
    if running_as_root() {
        return;
    }

    let dir = tempfile::tempdir().unwrap();
    let locked = dir.path().join("locked");
    fs::write(dir.path().join("a.txt"), "a").unwrap();
    fs::create_dir(&locked).unwrap();
    fs::write(locked.join("hidden.txt"), "h").unwrap();
    fs::write(dir.path().join("z.txt"), "z").unwrap();
    set_mode(&locked, 0o000);

    let mut out = Vec::new();
    let results = walk()
        .root(dir.path())
        .depth(below_root())
        .format(FormatProgram::compile("n"))
        .run(&mut out);
    set_mode(&locked, 0o755);
    let results = results.unwrap();

    assert!(
        matches!(results.errors.as_slice(), [WalkError::PermissionDenied(p)] if *p == locked),
        "unexpected errors: {:?}",
        results.errors
    );
    assert_eq!(results.errors[0].path(), Some(&locked));
    assert!(!results.has_fatal());

    let got = lines(out);
    assert!(got.contains(&"a.txt".to_string()));
    assert!(got.contains(&"z.txt".to_string()));
    assert!(!got.contains(&"hidden.txt".to_string()));
}

#[cfg(unix)]
#[test]
fn unreadable_root_is_fatal() {
    if running_as_root() {
        return;
    }

    let dir = tempfile::tempdir().unwrap();
    let locked = dir.path().join("locked");
    fs::create_dir(&locked).unwrap();
    fs::write(locked.join("inner.txt"), "i").unwrap();
    set_mode(&locked, 0o000);

    let mut out = Vec::new();
    let results = walk()
        .root(&locked)
        .root(dir.path())
        .depth(DepthRange::parse("1,1").unwrap())
        .format(FormatProgram::compile("n"))
        .run(&mut out);
    set_mode(&locked, 0o755);
    let results = results.unwrap();

    assert!(results.has_fatal());
    assert!(matches!(&results.errors[0], WalkError::InvalidSource(p) if *p == locked));
    // The second root is still walked; it only reports the locked dir at depth 1.
    assert_eq!(lines(out), ["locked"]);
}

#[test]
fn recoverable_errors_do_not_stop_the_source() {
    struct Flaky;
    impl Source for Flaky {
        fn walk(&self, _config: &WalkConfig) -> Box<dyn Iterator<Item = Result<Entry, WalkError>>> {
            let entries = vec![
                Ok(Entry::new("r", EntryKind::Dir, 0, Meta::default())),
                Err(WalkError::PermissionDenied("r/locked".into())),
                Ok(Entry::new("r/ok", EntryKind::File, 1, Meta::default())),
            ];
            Box::new(entries.into_iter())
        }
    }

    let mut out = Vec::new();
    let results = walk().source(Flaky).run(&mut out).unwrap();

    assert!(!results.has_fatal());
    assert_eq!(results.errors.len(), 1);
    assert_eq!(results.errors[0].path(), Some(&PathBuf::from("r/locked")));
    assert_eq!(String::from_utf8(out).unwrap(), "r\nr/ok\n");
}

#[test]
fn pseudo_entries_are_skipped() {
    struct Dots;
    impl Source for Dots {
        fn walk(&self, _config: &WalkConfig) -> Box<dyn Iterator<Item = Result<Entry, WalkError>>> {
            let entries = vec![
                Ok(Entry::new(".", EntryKind::Dir, 0, Meta::default())),
                Ok(Entry::new("..", EntryKind::Dir, 1, Meta::default())),
                Ok(Entry::new("x", EntryKind::File, 1, Meta::default())),
            ];
            Box::new(entries.into_iter())
        }
    }

    let mut out = Vec::new();
    let results = walk().source(Dots).run(&mut out).unwrap();

    assert_eq!(results.matches, 1);
    assert_eq!(String::from_utf8(out).unwrap(), "x\n");
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

#[cfg(unix)]
#[test]
fn command_runs_per_entry() {
    let dir = setup_test_dir();
    let mut out = Vec::new();
    let results = walk()
        .root(dir.path().join("sub"))
        .files_only(true)
        .command(CommandTemplate::parse("echo found %"))
        .run(&mut out)
        .unwrap();

    let sub = dir.path().join("sub");
    assert_eq!(results.matches, 2);
    assert_eq!(
        lines(out),
        [
            format!("found {}", sub.join("b.txt").display()),
            format!("found {}", sub.join("deep").join("c.txt").display()),
        ]
    );
}

#[cfg(unix)]
#[test]
fn command_failure_is_recoverable() {
    let dir = setup_test_dir();
    let results = walk()
        .root(dir.path())
        .depth(below_root())
        .files_only(true)
        .command(CommandTemplate::parse("exit 3"))
        .run(&mut Vec::new())
        .unwrap();

    assert_eq!(results.matches, 4);
    assert_eq!(results.errors.len(), 4);
    assert!(results
        .errors
        .iter()
        .all(|e| matches!(e, WalkError::CommandFailed { .. })));
    assert!(!results.has_fatal());
}
