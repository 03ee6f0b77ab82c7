mod codes;
mod external;
mod native;

use std::path::Path;

use anyhow::Result;

pub use crate::bpe::codes::{BpeCodes, END_OF_WORD};
pub use crate::bpe::external::FastBpeBinary;
pub use crate::bpe::native::FastBpe;

/// Marker appended to every subword that does not end a word.
pub const CONTINUATION: &str = "@@";

/// Arguments of one BPE call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BpeJob<'a> {
    pub input: &'a Path,
    pub output: &'a Path,
    pub codes: &'a Path,
    pub verbose: bool,
    pub over_write: bool,
}

/// Something that segments a tokenized file into subwords.
pub trait ApplyBpe {
    fn apply_bpe(&self, job: &BpeJob<'_>) -> Result<()>;
}

impl<B: ApplyBpe + ?Sized> ApplyBpe for &B {
    fn apply_bpe(&self, job: &BpeJob<'_>) -> Result<()> {
        (**self).apply_bpe(job)
    }
}

impl<B: ApplyBpe + ?Sized> ApplyBpe for Box<B> {
    fn apply_bpe(&self, job: &BpeJob<'_>) -> Result<()> {
        (**self).apply_bpe(job)
    }
}
