use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::Result;
use zstd::stream::read::Decoder;

use crate::loader::{open_file, TextSource};

pub struct TextZstdFileLoader {
    filepath: PathBuf,
}

impl TextZstdFileLoader {
    pub fn new<P>(filepath: P) -> Self
    where
        P: AsRef<Path>,
    {
        Self {
            filepath: PathBuf::from(filepath.as_ref()),
        }
    }
}

impl TextSource for TextZstdFileLoader {
    type Reader = BufReader<Decoder<'static, BufReader<File>>>;

    fn reader(&self) -> Result<Self::Reader> {
        let decoder = Decoder::new(open_file(&self.filepath)?)?;
        Ok(BufReader::new(decoder))
    }
}
