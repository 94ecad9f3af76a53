use std::{collections::HashSet, ffi::{OsStr, OsString}, fmt, path::PathBuf};

use serde::Serialize;

use crate::services::RenameError;

/// File names that are never touched, no matter which flags are given.
pub const DEFAULT_IGNORED: [&str; 4] = [".git", ".gitignore", "CMakeCache.txt", "CMakeLists.txt"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenameRecord {
    pub original: PathBuf,
    pub renamed: PathBuf
}

/// Bare file names (not paths) excluded from processing.
#[derive(Debug, Clone)]
pub struct IgnoreSet {
    names: HashSet<OsString>
}

impl IgnoreSet {
    pub fn empty() -> Self {
        Self {
            names: HashSet::new()
        }
    }

    pub fn with_defaults() -> Self {
        let mut set = Self::empty();
        set.extend(DEFAULT_IGNORED);
        set
    }

    pub fn insert<S: Into<OsString>>(&mut self, name: S) {
        self.names.insert(name.into());
    }

    pub fn contains(&self, name: &OsStr) -> bool {
        self.names.contains(name)
    }
}

impl<S: Into<OsString>> Extend<S> for IgnoreSet {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        for name in iter {
            self.insert(name);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    NotFound,
    NoFileName,
    InHomeDir,
    Ignored,
    Hidden,
    NoUsableName,
    Unchanged
}

impl SkipReason {
    /// Skips the user most likely wants to hear about.
    pub fn is_noteworthy(&self) -> bool {
        matches!(self, Self::NotFound | Self::NoFileName | Self::InHomeDir | Self::NoUsableName)
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Self::NotFound => "path does not exist",
            Self::NoFileName => "path has no file name",
            Self::InHomeDir => "entry sits directly in the home directory (use --force)",
            Self::Ignored => "name is on the ignore list",
            Self::Hidden => "hidden entry (use --hidden)",
            Self::NoUsableName => "nothing usable is left after normalization",
            Self::Unchanged => "name is already normalized"
        };

        f.write_str(reason)
    }
}

/// Everything that happened during one run, in processing order.
#[derive(Debug, Default)]
pub struct RenameReport {
    pub renamed: Vec<RenameRecord>,
    pub skipped: Vec<(PathBuf, SkipReason)>,
    pub errors: Vec<RenameError>
}

impl RenameReport {
    pub fn new() -> Self {
        Self::default()
    }
}
