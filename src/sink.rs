use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use flate2::write::GzEncoder;
use flate2::Compression;
use tempfile::NamedTempFile;

const PARTIAL_SUFFIX: &str = ".partial";

enum Writer {
    Plain(BufWriter<NamedTempFile>),
    Gzip(GzEncoder<BufWriter<NamedTempFile>>),
}

/// Line writer for a derived file.
///
/// Lines go to a uniquely named `.partial` file next to `path`;
/// [`LineSink::finish`] renames it onto `path`, so the final path only ever
/// holds a complete file, even when several writers race on one target.
pub struct LineSink {
    writer: Writer,
    partial: PathBuf,
    target: PathBuf,
}

impl LineSink {
    pub fn create<P: AsRef<Path>>(path: P, gzip: bool) -> Result<Self> {
        let target = path.as_ref().to_path_buf();
        let file = partial_file(&target)?;
        let partial = file.path().to_path_buf();
        let file = BufWriter::new(file);
        let writer = if gzip {
            Writer::Gzip(GzEncoder::new(file, Compression::default()))
        } else {
            Writer::Plain(file)
        };
        Ok(Self {
            writer,
            partial,
            target,
        })
    }

    /// Where lines are written until the sink is finished.
    pub fn partial(&self) -> &Path {
        &self.partial
    }

    pub fn write_line(&mut self, line: &str) -> Result<()> {
        let out: &mut dyn Write = match &mut self.writer {
            Writer::Plain(w) => w,
            Writer::Gzip(w) => w,
        };
        out.write_all(line.as_bytes())?;
        out.write_all(b"\n")?;
        Ok(())
    }

    /// Flushes everything and publishes the file at its final path.
    pub fn finish(self) -> Result<PathBuf> {
        let file = match self.writer {
            Writer::Plain(w) => w,
            Writer::Gzip(w) => w.finish()?,
        };
        let file = file
            .into_inner()
            .map_err(|e| e.into_error())
            .with_context(|| format!("cannot flush {}", self.partial.display()))?;
        file.persist(&self.target).with_context(|| {
            format!(
                "cannot move {} to {}",
                self.partial.display(),
                self.target.display()
            )
        })?;
        Ok(self.target)
    }
}

/// Creates an empty, uniquely named `.partial` file in the directory of
/// `target`. It is removed on drop unless persisted.
pub(crate) fn partial_file(target: &Path) -> Result<NamedTempFile> {
    let dir = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut prefix = target
        .file_name()
        .unwrap_or(target.as_os_str())
        .to_os_string();
    prefix.push(".");
    tempfile::Builder::new()
        .prefix(&prefix)
        .suffix(PARTIAL_SUFFIX)
        .tempfile_in(dir)
        .with_context(|| format!("cannot create a partial file for {}", target.display()))
}
