use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{bail, Context, Result};
use tracing::{debug, info};

use crate::bpe::{ApplyBpe, BpeJob};
use crate::file_label;
use crate::sink::partial_file;
use crate::toolkit::Toolkit;

/// Runs the toolkit's compiled `fast applybpe` executable.
#[derive(Clone, Debug)]
pub struct FastBpeBinary {
    binary: PathBuf,
}

impl FastBpeBinary {
    pub fn new<P: AsRef<Path>>(binary: P) -> Self {
        Self {
            binary: binary.as_ref().to_path_buf(),
        }
    }

    pub fn from_toolkit(toolkit: &Toolkit) -> Self {
        Self::new(toolkit.fast_bpe_binary())
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }
}

impl ApplyBpe for FastBpeBinary {
    fn apply_bpe(&self, job: &BpeJob<'_>) -> Result<()> {
        if job.output.exists() && !job.over_write {
            println!(" - fast BPE: {} exists already", file_label(job.output));
            return Ok(());
        }
        if !self.binary.is_file() {
            bail!("fastBPE executable not found at {}", self.binary.display());
        }
        if job.verbose {
            info!(" - fast BPE: processing {}", file_label(job.input));
        }

        // Removed on drop unless the run succeeds.
        let partial = partial_file(job.output)?.into_temp_path();
        let mut command = Command::new(&self.binary);
        command
            .arg("applybpe")
            .arg(partial.as_os_str())
            .arg(job.input)
            .arg(job.codes);
        debug!("running {:?}", command);

        let status = command
            .status()
            .with_context(|| format!("cannot run {}", self.binary.display()))?;
        if !status.success() {
            bail!("{} applybpe failed: {}", self.binary.display(), status);
        }
        let shown = partial.to_path_buf();
        partial.persist(job.output).with_context(|| {
            format!("cannot move {} to {}", shown.display(), job.output.display())
        })?;
        Ok(())
    }
}
