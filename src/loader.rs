mod flate2;
mod plain;
mod zstd;

use std::io::{BufRead, Lines};
use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};

use crate::buffered::{buffered_read, BufferedLines};

pub use crate::loader::flate2::TextGzFileLoader;
pub use crate::loader::plain::{TextFileLoader, TextLoader};
pub use crate::loader::zstd::TextZstdFileLoader;

/// Loader for a line-oriented text file.
pub trait TextSource {
    type Reader: BufRead;

    /// Opens a fresh buffered reader positioned at the start of the text.
    fn reader(&self) -> Result<Self::Reader>;

    /// Returns the text as batches of `buffer_size` stripped lines.
    fn batches(&self, buffer_size: usize) -> Result<BufferedLines<Lines<Self::Reader>>> {
        Ok(buffered_read(self.reader()?, buffer_size))
    }
}

/// File formats supported.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextFileFormats {
    Plain,
    Gzip,
    Zstd,
}

impl TextFileFormats {
    /// Guesses the format from the file extension.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        match path.as_ref().extension().and_then(|s| s.to_str()) {
            Some("gz") => Self::Gzip,
            Some("zst") => Self::Zstd,
            _ => Self::Plain,
        }
    }
}

impl FromStr for TextFileFormats {
    type Err = &'static str;

    fn from_str(fmt: &str) -> Result<Self, Self::Err> {
        match fmt {
            "plain" => Ok(Self::Plain),
            "gzip" => Ok(Self::Gzip),
            "zstd" => Ok(Self::Zstd),
            _ => Err("Invalid format"),
        }
    }
}

/// Opens `path` for line reading, decompressing according to its extension.
pub fn open_text<P: AsRef<Path>>(path: P) -> Result<Box<dyn BufRead + Send>> {
    let path = path.as_ref();
    let reader: Box<dyn BufRead + Send> = match TextFileFormats::from_path(path) {
        TextFileFormats::Plain => Box::new(TextFileLoader::new(path).reader()?),
        TextFileFormats::Gzip => Box::new(TextGzFileLoader::new(path).reader()?),
        TextFileFormats::Zstd => Box::new(TextZstdFileLoader::new(path).reader()?),
    };
    Ok(reader)
}

fn open_file(path: &Path) -> Result<std::fs::File> {
    std::fs::File::open(path).with_context(|| format!("cannot open {}", path.display()))
}
