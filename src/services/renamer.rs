use std::{collections::HashSet, ffi::OsStr, fs, path::{self, Component, Path, PathBuf}};

use walkdir::WalkDir;

use super::RenameError;
use crate::{domain::{IgnoreSet, RenameRecord, RenameReport, SkipReason}, utils::{config::EnvConfig, normalizations::normalize_os_name}};

#[derive(Debug, Clone, Copy, Default)]
pub struct RenameOptions {
    pub force: bool,
    pub dry_run: bool,
    pub log_renames: bool,
    pub recursive: bool,
    pub include_hidden: bool
}

#[derive(Debug)]
enum Outcome {
    Renamed(RenameRecord),
    Skipped(SkipReason)
}

/// Renames a dry run has already planned, so later paths in the same run see the
/// filesystem the way a real run would leave it.
#[derive(Debug, Default)]
struct DryRunPlan {
    claimed: HashSet<PathBuf>,
    vacated: HashSet<PathBuf>
}

impl DryRunPlan {
    fn exists(&self, path: &Path) -> bool {
        if self.claimed.contains(path) {
            return true;
        }

        if path.ancestors().any(|ancestor| self.vacated.contains(ancestor)) {
            return false;
        }

        fs::symlink_metadata(path).is_ok()
    }

    fn destination_taken(&self, original: &Path, candidate: &Path) -> bool {
        if self.claimed.contains(candidate) {
            return true;
        }

        !self.vacated.contains(candidate) && destination_taken(original, candidate)
    }

    fn claim(&mut self, original: &Path, candidate: &Path) {
        self.claimed.remove(original);
        self.vacated.insert(original.to_path_buf());
        self.vacated.remove(candidate);
        self.claimed.insert(candidate.to_path_buf());
    }
}

pub struct Renamer<'a> {
    config: &'a EnvConfig,
    home: PathBuf,
    options: RenameOptions,
    ignore_set: IgnoreSet
}

impl<'a> Renamer<'a> {
    pub fn new(config: &'a EnvConfig, options: RenameOptions, ignore_set: IgnoreSet) -> Self {
        Self {
            config,
            home: normalize_lexically(&config.home),
            options,
            ignore_set
        }
    }

    /// Processes every target in order. Nothing in here is fatal: skips and failures
    /// are logged and collected into the report, and the loop moves on.
    pub fn run<P: AsRef<Path>>(&self, targets: &[P]) -> RenameReport {
        let mut report = RenameReport::new();
        let mut plan = DryRunPlan::default();

        for target in targets {
            let path = match self.resolve(target.as_ref()) {
                Ok(path) => path,
                Err(err) => {
                    log::error!("{}", err);
                    report.errors.push(err);
                    continue;
                }
            };

            if self.should_walk(&path) {
                for entry in self.collect_entries(&path, &mut report) {
                    let outcome = self.process_path(&entry, &mut plan);
                    self.record(&entry, outcome, &mut report);
                }
            }

            let outcome = self.process_path(&path, &mut plan);
            self.record(&path, outcome, &mut report);
        }

        report
    }

    /// Absolute path with `.` and `..` folded away, so the home guard sees the real parent.
    fn resolve(&self, target: &Path) -> Result<PathBuf, RenameError> {
        // joining an absolute target replaces pwd entirely
        path::absolute(self.config.pwd.join(target))
            .map(|absolute| normalize_lexically(&absolute))
            .map_err(|source| RenameError::UnresolvablePath { path: target.to_path_buf(), source })
    }

    fn exists(&self, path: &Path, plan: &DryRunPlan) -> bool {
        if self.options.dry_run {
            plan.exists(path)
        } else {
            fs::symlink_metadata(path).is_ok()
        }
    }

    fn process_path(&self, path: &Path, plan: &mut DryRunPlan) -> Result<Outcome, RenameError> {
        if !self.exists(path, plan) {
            return Ok(Outcome::Skipped(SkipReason::NotFound));
        }

        let Some(name) = path.file_name() else {
            return Ok(Outcome::Skipped(SkipReason::NoFileName));
        };

        if let Some(reason) = self.guard(path, name) {
            return Ok(Outcome::Skipped(reason));
        }

        let Some(normalized) = normalize_os_name(name) else {
            return Ok(Outcome::Skipped(SkipReason::NoUsableName));
        };

        let candidate = path.with_file_name(&normalized);
        if candidate == path {
            return Ok(Outcome::Skipped(SkipReason::Unchanged));
        }

        let taken = if self.options.dry_run {
            plan.destination_taken(path, &candidate)
        } else {
            destination_taken(path, &candidate)
        };

        if taken {
            return Err(RenameError::DestinationExists { from: path.to_path_buf(), to: candidate });
        }

        if self.options.dry_run {
            plan.claim(path, &candidate);
            log::info!("[dry-run] {} -> {}", path.display(), normalized);
            return Ok(Outcome::Renamed(RenameRecord { original: path.to_path_buf(), renamed: candidate }));
        }

        fs::rename(path, &candidate)
            .map_err(|source| RenameError::RenameFailed { from: path.to_path_buf(), to: candidate.clone(), source })?;

        if self.options.log_renames {
            log::info!("Renamed {} -> {}", path.display(), normalized);
        }

        Ok(Outcome::Renamed(RenameRecord { original: path.to_path_buf(), renamed: candidate }))
    }

    /// Policy checks that depend only on where the entry sits and what it is called.
    fn guard(&self, path: &Path, name: &OsStr) -> Option<SkipReason> {
        if !self.options.force && path.parent() == Some(self.home.as_path()) {
            return Some(SkipReason::InHomeDir);
        }

        if self.ignore_set.contains(name) {
            return Some(SkipReason::Ignored);
        }

        if !self.options.include_hidden && is_hidden(name) {
            return Some(SkipReason::Hidden);
        }

        None
    }

    fn should_walk(&self, path: &Path) -> bool {
        if !self.options.recursive {
            return false;
        }

        let is_dir = fs::symlink_metadata(path)
            .map(|metadata| metadata.is_dir())
            .unwrap_or(false);

        // same policy as the pruning inside the walk
        is_dir && path.file_name().is_some_and(|name| self.guard(path, name).is_none())
    }

    /// Lists everything below `dir`, children before their parent directory, so renaming
    /// in this order never invalidates a path that is still waiting to be processed.
    /// Guarded entries are pruned together with their subtree.
    fn collect_entries(&self, dir: &Path, report: &mut RenameReport) -> Vec<PathBuf> {
        let mut pruned = Vec::new();
        let mut ordered = Vec::new();
        let mut pending_dirs: Vec<(usize, PathBuf)> = Vec::new();

        let walker = WalkDir::new(dir)
            .min_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| match self.guard(entry.path(), entry.file_name()) {
                Some(reason) => {
                    pruned.push((entry.path().to_path_buf(), reason));
                    false
                },
                None => true
            });

        for entry_result in walker {
            let entry = match entry_result {
                Ok(entry) => entry,
                Err(err) => {
                    log::error!("Walkdir error below {}: {}", dir.display(), err);
                    report.errors.push(RenameError::WalkdirError(err));
                    continue;
                }
            };

            // a directory is finished once the walk comes back up to its depth
            while pending_dirs.last().is_some_and(|(depth, _)| *depth >= entry.depth()) {
                ordered.extend(pending_dirs.pop().map(|(_, path)| path));
            }

            if entry.file_type().is_dir() {
                pending_dirs.push((entry.depth(), entry.into_path()));
            } else {
                ordered.push(entry.into_path());
            }
        }

        while let Some((_, path)) = pending_dirs.pop() {
            ordered.push(path);
        }

        for (path, reason) in pruned {
            self.record(&path, Ok(Outcome::Skipped(reason)), report);
        }

        ordered
    }

    fn record(&self, path: &Path, outcome: Result<Outcome, RenameError>, report: &mut RenameReport) {
        match outcome {
            Ok(Outcome::Renamed(record)) => report.renamed.push(record),
            Ok(Outcome::Skipped(reason)) => {
                if reason.is_noteworthy() {
                    log::warn!("Skipping {}: {}", path.display(), reason);
                } else {
                    log::debug!("Skipping {}: {}", path.display(), reason);
                }
                report.skipped.push((path.to_path_buf(), reason));
            },
            Err(err) => {
                log::error!("{}", err);
                report.errors.push(err);
            }
        }
    }
}

fn normalize_lexically(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();

    for component in path.components() {
        match component {
            Component::CurDir => {},
            Component::ParentDir => {
                normalized.pop();
            },
            other => normalized.push(other)
        }
    }

    normalized
}

fn is_hidden(name: &OsStr) -> bool {
    name.as_encoded_bytes().first() == Some(&b'.')
}

/// True when `candidate` exists and is a different entry than `original`.
/// Case-only renames on case-insensitive filesystems resolve to the same entry.
fn destination_taken(original: &Path, candidate: &Path) -> bool {
    match fs::symlink_metadata(candidate) {
        Ok(_) => !same_entry(original, candidate),
        Err(_) => false
    }
}

#[cfg(unix)]
fn same_entry(a: &Path, b: &Path) -> bool {
    use std::os::unix::fs::MetadataExt;

    match (fs::symlink_metadata(a), fs::symlink_metadata(b)) {
        (Ok(a), Ok(b)) => a.dev() == b.dev() && a.ino() == b.ino(),
        _ => false
    }
}

#[cfg(not(unix))]
fn same_entry(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false
    }
}
