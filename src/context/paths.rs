use super::{ContextError, ContextResult};
use directories::ProjectDirs;
use std::{
    env,
    path::{Path, PathBuf},
};

pub const CONFIG_DIR_ENV: &str = "CLUSTERCTX_CONFIG_DIR";
const CONFIG_FILE: &str = "config.yaml";
const LOCK_FILE: &str = ".config.lock";

/// Location of the config blob and its lock file.
///
/// One value is resolved per process and handed to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorePaths {
    dir: PathBuf,
}

impl StorePaths {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Explicit directory, then `CLUSTERCTX_CONFIG_DIR`, then the platform config dir.
    pub fn resolve(explicit: Option<&Path>) -> ContextResult<Self> {
        if let Some(dir) = explicit {
            return Ok(Self::new(dir));
        }

        if let Some(dir) = env::var_os(CONFIG_DIR_ENV).filter(|dir| !dir.is_empty()) {
            return Ok(Self::new(dir));
        }

        ProjectDirs::from("dev", "clusterctx", "clusterctx")
            .map(|dirs| Self::new(dirs.config_dir()))
            .ok_or(ContextError::MissingConfigDir)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn config_file(&self) -> PathBuf {
        self.dir.join(CONFIG_FILE)
    }

    pub fn lock_file(&self) -> PathBuf {
        self.dir.join(LOCK_FILE)
    }
}
