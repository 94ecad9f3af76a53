use std::{env, ffi::OsString, path::PathBuf};

#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigLoadingError {
    #[error("Required environment variable {0} is not set")]
    MissingVariable(&'static str),

    #[error("Environment variable {name} is not valid unicode: {value:?}")]
    InvalidUnicode { name: &'static str, value: OsString }
}

/// Process environment the renamer depends on, captured once at startup.
#[derive(Debug, Clone)]
pub struct EnvConfig {
    pub home: PathBuf,
    pub user: String,
    pub pwd: PathBuf
}

impl EnvConfig {
    pub fn load() -> Result<Self, ConfigLoadingError> {
        Self::from_lookup(|name| env::var_os(name))
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigLoadingError>
    where
        F: Fn(&str) -> Option<OsString>
    {
        let require = |name: &'static str| {
            lookup(name)
                .filter(|value| !value.is_empty())
                .ok_or(ConfigLoadingError::MissingVariable(name))
        };

        let home = PathBuf::from(require("HOME")?);
        let user = require("USER")?
            .into_string()
            .map_err(|value| ConfigLoadingError::InvalidUnicode { name: "USER", value })?;
        let pwd = PathBuf::from(require("PWD")?);

        Ok(Self { home, user, pwd })
    }
}
