use std::path::PathBuf;

use thiserror::Error;

/// Configuration problems detected before any file is touched.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The toolkit root environment variable is unset or empty.
    #[error("Please set the environment variable {var}")]
    MissingToolkitRoot { var: &'static str },

    /// A downstream batch would not fit into one buffer.
    #[error("--max-sentences/--batch-size ({max_sentences}) cannot be larger than --buffer-size ({buffer_size})")]
    BatchExceedsBuffer {
        max_sentences: usize,
        buffer_size: usize,
    },

    /// Derived file names are built from the input's base name.
    #[error("input path {0:?} has no file name")]
    NoFileName(PathBuf),
}
