use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::Result;
use flate2::read::MultiGzDecoder;

use crate::loader::{open_file, TextSource};

/// Loader for gzip-compressed text. Concatenated gzip members are read as one stream.
pub struct TextGzFileLoader {
    filepath: PathBuf,
}

impl TextGzFileLoader {
    pub fn new<P>(filepath: P) -> Self
    where
        P: AsRef<Path>,
    {
        Self {
            filepath: PathBuf::from(filepath.as_ref()),
        }
    }
}

impl TextSource for TextGzFileLoader {
    type Reader = BufReader<MultiGzDecoder<File>>;

    fn reader(&self) -> Result<BufReader<MultiGzDecoder<File>>> {
        let reader = MultiGzDecoder::new(open_file(&self.filepath)?);
        Ok(BufReader::new(reader))
    }
}
