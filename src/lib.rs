pub mod bpe;
pub mod buffered;
pub mod driver;
pub mod error;
pub mod loader;
pub mod sink;
pub mod tokenizer;
pub mod toolkit;

pub use bpe::{ApplyBpe, BpeCodes, BpeJob, FastBpe, FastBpeBinary};
pub use buffered::{buffered_read, BufferedLines};
pub use driver::{Artifacts, PrepConfig, Preprocessor};
pub use error::ConfigError;
pub use loader::{open_text, TextFileFormats, TextSource};
pub use sink::LineSink;
pub use tokenizer::{MosesTokenizer, TokenJob, Tokenize};
pub use toolkit::Toolkit;

/// Language value that disables tokenization.
pub const NO_TOKENIZATION: &str = "--";

/// Language whose script is romanized before lowercasing.
pub const ROMANIZED_LANG: &str = "el";

/// Environment variable holding the toolkit installation root.
pub const TOOLKIT_ROOT_VAR: &str = "LASER";

/// Default number of lines per batch.
pub const DEFAULT_BUFFER_SIZE: usize = 10000;

pub const TOKENIZED_SUFFIX: &str = ".tok";
pub const BPE_SUFFIX: &str = ".bpe";

/// Base name of `path` for user-facing notices.
pub(crate) fn file_label(path: &std::path::Path) -> std::borrow::Cow<'_, str> {
    path.file_name()
        .unwrap_or(path.as_os_str())
        .to_string_lossy()
}
