pub mod summary;

use std::path::PathBuf;

use clap::{ArgAction, Parser};

use crate::{domain::IgnoreSet, services::renamer::RenameOptions};

/// Rename files and directories to lowercase, ASCII-only, underscore-delimited names.
#[derive(Parser, Debug)]
#[command(name = "namefix", version, about)]
pub struct Cli {
    /// Do not log every rename that was performed
    #[arg(short = 'l', long = "no-verbose", visible_alias = "no-log")]
    pub no_verbose: bool,

    /// Also rename entries that sit directly in the home directory
    #[arg(short = 'F', long)]
    pub force: bool,

    /// Print every rename at the end of the run
    #[arg(short, long)]
    pub summary: bool,

    /// Print the summary as JSON (implies --summary)
    #[arg(long)]
    pub json: bool,

    /// Show what would be renamed without touching anything
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// File name to leave alone, on top of the built-in list (repeatable)
    #[arg(short, long = "ignore", value_name = "NAME", action = ArgAction::Append)]
    pub ignore: Vec<String>,

    /// Descend into directories and rename their contents too
    #[arg(short, long)]
    pub recursive: bool,

    /// Also process entries whose name starts with a dot
    #[arg(short = 'a', long)]
    pub hidden: bool,

    /// Files and directories to rename
    #[arg(required = true, value_name = "FILES")]
    pub files: Vec<PathBuf>
}

impl Cli {
    pub fn rename_options(&self) -> RenameOptions {
        RenameOptions {
            force: self.force,
            dry_run: self.dry_run,
            log_renames: !self.no_verbose,
            recursive: self.recursive,
            include_hidden: self.hidden
        }
    }

    pub fn ignore_set(&self) -> IgnoreSet {
        let mut ignore_set = IgnoreSet::with_defaults();
        ignore_set.extend(self.ignore.iter().cloned());
        ignore_set
    }

    pub fn wants_summary(&self) -> bool {
        self.summary || self.json
    }
}
