pub mod renamer;

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum RenameError {
    #[error("Failed to rename '{from}' to '{to}': {source}")]
    RenameFailed { from: PathBuf, to: PathBuf, #[source] source: std::io::Error },

    #[error("Refusing to rename '{from}': '{to}' already exists")]
    DestinationExists { from: PathBuf, to: PathBuf },

    #[error("Could not resolve '{path}' to an absolute path: {source}")]
    UnresolvablePath { path: PathBuf, #[source] source: std::io::Error },

    #[error("Walkdir error: {0}")]
    WalkdirError(#[from] walkdir::Error)
}

#[cfg(test)]
pub(crate) mod test_helpers {
    use std::{fs, path::{Path, PathBuf}, sync::OnceLock};

    use log::SetLoggerError;

    use crate::utils::config::EnvConfig;

    #[derive(Debug, thiserror::Error)]
    pub enum TestSetupError {
        #[error("Failed to init env logger for the renamer tests: {0}")]
        LoggerError(String),

        #[error("I/O error: {0}")]
        IOError(#[from] std::io::Error)
    }

    pub fn init_logger() -> Result<(), TestSetupError> {
        static LOGGER_RESULT: OnceLock<Result<(), SetLoggerError>> = OnceLock::new();

        let init_result_ref = LOGGER_RESULT.get_or_init(|| {
            env_logger::builder()
                .is_test(true)
                .filter_level(log::LevelFilter::Warn)
                .try_init()
        });

        match init_result_ref {
            Ok(_) => Ok(()),
            Err(e) => Err(TestSetupError::LoggerError(e.to_string()))
        }
    }

    /// Config whose home and working directory both point into a test sandbox.
    pub fn sandbox_config(home: &Path, pwd: &Path) -> EnvConfig {
        EnvConfig {
            home: home.to_path_buf(),
            user: "tester".to_string(),
            pwd: pwd.to_path_buf()
        }
    }

    pub fn touch(dir: &Path, name: &str) -> Result<PathBuf, TestSetupError> {
        let path = dir.join(name);
        fs::write(&path, b"dummy data")?;
        Ok(path)
    }

    pub fn mkdir(dir: &Path, name: &str) -> Result<PathBuf, TestSetupError> {
        let path = dir.join(name);
        fs::create_dir(&path)?;
        Ok(path)
    }

    /// Sorted bare names of the entries in `dir`.
    pub fn listing(dir: &Path) -> Result<Vec<String>, TestSetupError> {
        let mut names = fs::read_dir(dir)?
            .map(|entry| entry.map(|e| e.file_name().to_string_lossy().into_owned()))
            .collect::<Result<Vec<_>, _>>()?;

        names.sort();
        Ok(names)
    }
}
