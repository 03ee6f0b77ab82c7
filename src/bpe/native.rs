use anyhow::{Context, Result};
use rayon::prelude::*;
use tracing::{debug, info};

use crate::bpe::{ApplyBpe, BpeCodes, BpeJob};
use crate::buffered::buffered_read;
use crate::loader::open_text;
use crate::sink::LineSink;
use crate::{file_label, DEFAULT_BUFFER_SIZE};

/// Native BPE applier with fastBPE semantics.
#[derive(Clone, Debug)]
pub struct FastBpe {
    batch_size: usize,
}

impl Default for FastBpe {
    fn default() -> Self {
        Self::new()
    }
}

impl FastBpe {
    pub fn new() -> Self {
        Self::with_batch_size(DEFAULT_BUFFER_SIZE)
    }

    pub fn with_batch_size(batch_size: usize) -> Self {
        Self {
            batch_size: batch_size.max(1),
        }
    }
}

impl ApplyBpe for FastBpe {
    fn apply_bpe(&self, job: &BpeJob<'_>) -> Result<()> {
        if job.output.exists() && !job.over_write {
            println!(" - fast BPE: {} exists already", file_label(job.output));
            return Ok(());
        }
        if job.verbose {
            info!(" - fast BPE: processing {}", file_label(job.input));
        }

        let codes = BpeCodes::from_file(job.codes)?;
        debug!(merges = codes.len(), "loaded {}", job.codes.display());

        let reader = open_text(job.input)?;
        let mut sink = LineSink::create(job.output, false)?;
        for batch in buffered_read(reader, self.batch_size) {
            let batch = batch.with_context(|| format!("cannot read {}", job.input.display()))?;
            let lines: Vec<String> = batch.par_iter().map(|line| codes.apply_line(line)).collect();
            for line in &lines {
                sink.write_line(line)?;
            }
        }
        let output = sink.finish()?;
        debug!("wrote {}", output.display());
        Ok(())
    }
}
