use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::loader::{open_file, TextSource};

pub struct TextFileLoader {
    filepath: PathBuf,
}

impl TextFileLoader {
    pub fn new<P>(filepath: P) -> Self
    where
        P: AsRef<Path>,
    {
        Self {
            filepath: PathBuf::from(filepath.as_ref()),
        }
    }
}

impl TextSource for TextFileLoader {
    type Reader = BufReader<File>;

    fn reader(&self) -> Result<BufReader<File>> {
        Ok(BufReader::new(open_file(&self.filepath)?))
    }
}

/// In-memory text, mostly for tests and piping.
pub struct TextLoader<'a> {
    text: &'a [u8],
}

impl<'a> TextLoader<'a> {
    pub const fn new(text: &'a [u8]) -> Self {
        Self { text }
    }
}

impl<'a> TextSource for TextLoader<'a> {
    type Reader = BufReader<&'a [u8]>;

    fn reader(&self) -> Result<BufReader<&'a [u8]>> {
        Ok(BufReader::new(self.text))
    }
}
