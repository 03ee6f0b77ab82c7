mod moses;
mod nonbreaking;
mod punctuation;
mod romanize;

use std::path::Path;

use anyhow::{Context, Result};
use rayon::prelude::*;
use tracing::{debug, info};

use crate::buffered::buffered_read;
use crate::loader::open_text;
use crate::sink::LineSink;
use crate::{file_label, DEFAULT_BUFFER_SIZE};

pub use crate::tokenizer::moses::split_tokens;
pub use crate::tokenizer::punctuation::normalize_punctuation;
pub use crate::tokenizer::romanize::romanize_greek;

/// Arguments of one tokenization call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TokenJob<'a> {
    pub input: &'a Path,
    pub output: &'a Path,
    pub lang: &'a str,
    pub romanize: bool,
    pub lower_case: bool,
    pub gzip: bool,
    pub verbose: bool,
    pub over_write: bool,
}

/// Something that turns a raw text file into a tokenized one.
pub trait Tokenize {
    fn tokenize(&self, job: &TokenJob<'_>) -> Result<()>;
}

impl<T: Tokenize + ?Sized> Tokenize for &T {
    fn tokenize(&self, job: &TokenJob<'_>) -> Result<()> {
        (**self).tokenize(job)
    }
}

impl<T: Tokenize + ?Sized> Tokenize for Box<T> {
    fn tokenize(&self, job: &TokenJob<'_>) -> Result<()> {
        (**self).tokenize(job)
    }
}

/// Native Moses-style tokenizer.
///
/// Each line goes through punctuation normalization, tokenization,
/// optional romanization and optional lowercasing. Lines are processed
/// in parallel one batch at a time, so output order matches input order.
#[derive(Clone, Debug)]
pub struct MosesTokenizer {
    batch_size: usize,
}

impl Default for MosesTokenizer {
    fn default() -> Self {
        Self::new()
    }
}

impl MosesTokenizer {
    pub fn new() -> Self {
        Self::with_batch_size(DEFAULT_BUFFER_SIZE)
    }

    pub fn with_batch_size(batch_size: usize) -> Self {
        Self {
            batch_size: batch_size.max(1),
        }
    }

    /// Tokenizes a single line.
    ///
    /// ```
    /// use laser_prep::MosesTokenizer;
    ///
    /// let tok = MosesTokenizer::new();
    /// assert_eq!(tok.tokenize_line("Hello, World!", "en", false, true), "hello , world !");
    /// ```
    pub fn tokenize_line(&self, line: &str, lang: &str, romanize: bool, lower_case: bool) -> String {
        let normalized = normalize_punctuation(line);
        let mut text = split_tokens(&normalized, lang).join(" ");
        if romanize {
            text = romanize_greek(&text);
        }
        if lower_case {
            // Full Unicode casing: a word-final `Σ` lowers to `ς`.
            text = text.to_lowercase();
        }
        text
    }
}

impl Tokenize for MosesTokenizer {
    fn tokenize(&self, job: &TokenJob<'_>) -> Result<()> {
        if job.output.exists() && !job.over_write {
            println!(" - Tokenizer: {} exists already", file_label(job.output));
            return Ok(());
        }
        if job.verbose {
            info!(
                " - Tokenizer: {} in language {}{}{}",
                file_label(job.input),
                job.lang,
                if job.romanize { " (romanized)" } else { "" },
                if job.gzip { " (gzip)" } else { "" },
            );
        }

        let reader = open_text(job.input)?;
        let mut sink = LineSink::create(job.output, job.gzip)?;
        let mut n_lines = 0;
        for batch in buffered_read(reader, self.batch_size) {
            let batch = batch.with_context(|| format!("cannot read {}", job.input.display()))?;
            let lines: Vec<String> = batch
                .par_iter()
                .map(|line| self.tokenize_line(line, job.lang, job.romanize, job.lower_case))
                .collect();
            for line in &lines {
                sink.write_line(line)?;
            }
            n_lines += lines.len();
        }
        let output = sink.finish()?;
        debug!(lines = n_lines, "wrote {}", output.display());
        Ok(())
    }
}
