use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::TOOLKIT_ROOT_VAR;

/// Installation root of the toolkit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Toolkit {
    root: PathBuf,
}

impl Toolkit {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Reads the root from the `LASER` environment variable.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_var(env::var_os(TOOLKIT_ROOT_VAR))
    }

    fn from_var(value: Option<OsString>) -> Result<Self, ConfigError> {
        match value {
            Some(root) if !root.is_empty() => Ok(Self::new(root)),
            _ => Err(ConfigError::MissingToolkitRoot {
                var: TOOLKIT_ROOT_VAR,
            }),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Location of the compiled fastBPE executable.
    pub fn fast_bpe_binary(&self) -> PathBuf {
        self.root.join("tools-external").join("fastBPE").join("fast")
    }
}
