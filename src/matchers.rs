use crate::entry::Entry;
use crate::traits::Matcher;

/// `-d` / `-f`: restrict to directories or to everything else.
///
/// Both set at once matches nothing.
pub struct KindMatcher {
    pub dirs_only:  bool,
    pub files_only: bool,
}

impl Matcher for KindMatcher {
    fn is_match(&self, entry: &Entry) -> bool {
        let dir = entry.is_dir();
        !((self.dirs_only && !dir) || (self.files_only && dir))
    }
}

/// `-x`: at least one execute bit set.
pub struct ExecutableMatcher;

impl Matcher for ExecutableMatcher {
    fn is_match(&self, entry: &Entry) -> bool {
        entry.meta.is_executable()
    }
}
