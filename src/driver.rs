use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

use crate::bpe::{ApplyBpe, BpeJob};
use crate::error::ConfigError;
use crate::tokenizer::{TokenJob, Tokenize};
use crate::{BPE_SUFFIX, DEFAULT_BUFFER_SIZE, NO_TOKENIZATION, ROMANIZED_LANG, TOKENIZED_SUFFIX};

/// Default downstream token budget per batch.
pub const DEFAULT_MAX_TOKENS: usize = 12000;

/// Preprocessing options.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PrepConfig {
    input: PathBuf,
    output_dir: PathBuf,
    token_lang: String,
    bpe_codes: Option<PathBuf>,
    buffer_size: usize,
    max_tokens: usize,
    max_sentences: Option<usize>,
    cpu: bool,
    verbose: bool,
}

impl PrepConfig {
    /// Creates a configuration that neither tokenizes nor applies BPE.
    pub fn new<P, Q>(input: P, output_dir: Q) -> Self
    where
        P: AsRef<Path>,
        Q: AsRef<Path>,
    {
        Self {
            input: input.as_ref().to_path_buf(),
            output_dir: output_dir.as_ref().to_path_buf(),
            token_lang: NO_TOKENIZATION.to_string(),
            bpe_codes: None,
            buffer_size: DEFAULT_BUFFER_SIZE,
            max_tokens: DEFAULT_MAX_TOKENS,
            max_sentences: None,
            cpu: false,
            verbose: false,
        }
    }

    pub fn with_token_lang<S: Into<String>>(mut self, lang: S) -> Self {
        self.token_lang = lang.into();
        self
    }

    pub fn with_bpe_codes<P: AsRef<Path>>(mut self, codes: Option<P>) -> Self {
        self.bpe_codes = codes.map(|p| p.as_ref().to_path_buf());
        self
    }

    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_max_sentences(mut self, max_sentences: Option<usize>) -> Self {
        self.max_sentences = max_sentences;
        self
    }

    pub fn with_cpu(mut self, cpu: bool) -> Self {
        self.cpu = cpu;
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Normalizes the buffer size and checks the batching constraints.
    pub fn validate(mut self) -> Result<Self, ConfigError> {
        self.buffer_size = self.buffer_size.max(1);
        if let Some(max_sentences) = self.max_sentences {
            if max_sentences > self.buffer_size {
                return Err(ConfigError::BatchExceedsBuffer {
                    max_sentences,
                    buffer_size: self.buffer_size,
                });
            }
        }
        if self.input.file_name().is_none() {
            return Err(ConfigError::NoFileName(self.input));
        }
        Ok(self)
    }

    pub fn input(&self) -> &Path {
        &self.input
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn token_lang(&self) -> &str {
        &self.token_lang
    }

    pub fn bpe_codes(&self) -> Option<&Path> {
        self.bpe_codes.as_deref()
    }

    pub fn buffer_size(&self) -> usize {
        self.buffer_size
    }

    pub fn max_tokens(&self) -> usize {
        self.max_tokens
    }

    pub fn max_sentences(&self) -> Option<usize> {
        self.max_sentences
    }

    pub fn cpu(&self) -> bool {
        self.cpu
    }

    pub fn verbose(&self) -> bool {
        self.verbose
    }

    pub fn tokenizes(&self) -> bool {
        self.token_lang != NO_TOKENIZATION
    }

    pub fn romanize(&self) -> bool {
        self.token_lang == ROMANIZED_LANG
    }

    /// `<output_dir>/<basename(input)><suffix>`.
    pub fn derived_path(&self, suffix: &str) -> PathBuf {
        let mut name = self
            .input
            .file_name()
            .unwrap_or_else(|| OsStr::new(""))
            .to_os_string();
        name.push(suffix);
        self.output_dir.join(name)
    }
}

/// Files produced or reused by a run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Artifacts {
    pub tokenized: Option<PathBuf>,
    pub bpe: Option<PathBuf>,
    /// The file a downstream step should read.
    pub output: PathBuf,
}

/// Runs tokenization and BPE in sequence, reusing outputs that already exist.
pub struct Preprocessor<T, B> {
    config: PrepConfig,
    tokenizer: T,
    bpe: B,
}

impl<T, B> Preprocessor<T, B>
where
    T: Tokenize,
    B: ApplyBpe,
{
    /// Validates `config`; nothing is read or written yet.
    pub fn new(config: PrepConfig, tokenizer: T, bpe: B) -> Result<Self, ConfigError> {
        let config = config.validate()?;
        debug!(
            buffer_size = config.buffer_size,
            max_tokens = config.max_tokens,
            max_sentences = ?config.max_sentences,
            cpu = config.cpu,
            "configured"
        );
        Ok(Self {
            config,
            tokenizer,
            bpe,
        })
    }

    pub fn config(&self) -> &PrepConfig {
        &self.config
    }

    pub fn run(&self) -> Result<Artifacts> {
        let config = &self.config;
        let mut current = config.input.clone();

        let tokenized = if config.tokenizes() {
            let tok_fname = config.derived_path(TOKENIZED_SUFFIX);
            if tok_fname.exists() {
                println!(
                    " - Tokenizer: {} exists. Skipping the tokenization and jump to BPEfying step.",
                    tok_fname.display()
                );
            } else {
                let job = TokenJob {
                    input: &current,
                    output: &tok_fname,
                    lang: &config.token_lang,
                    romanize: config.romanize(),
                    lower_case: true,
                    gzip: false,
                    verbose: config.verbose,
                    over_write: false,
                };
                self.tokenizer
                    .tokenize(&job)
                    .with_context(|| format!("tokenization of {} failed", current.display()))?;
            }
            current = tok_fname.clone();
            Some(tok_fname)
        } else {
            None
        };

        let bpe = match &config.bpe_codes {
            Some(codes) => {
                let bpe_fname = config.derived_path(BPE_SUFFIX);
                if bpe_fname.exists() {
                    println!(
                        " - fast BPE: {} exists. Skipping the BPEfying step.",
                        bpe_fname.display()
                    );
                } else {
                    let job = BpeJob {
                        input: &current,
                        output: &bpe_fname,
                        codes,
                        verbose: config.verbose,
                        over_write: false,
                    };
                    self.bpe
                        .apply_bpe(&job)
                        .with_context(|| format!("BPE of {} failed", current.display()))?;
                }
                current = bpe_fname.clone();
                Some(bpe_fname)
            }
            None => None,
        };

        Ok(Artifacts {
            tokenized,
            bpe,
            output: current,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::fs;

    use anyhow::bail;
    use tempfile::tempdir;

    use super::*;

    /// Records calls and writes a marker file.
    #[derive(Default)]
    struct Recorder {
        calls: RefCell<Vec<String>>,
        fail: bool,
    }

    impl Tokenize for Recorder {
        fn tokenize(&self, job: &TokenJob<'_>) -> Result<()> {
            self.calls.borrow_mut().push(format!(
                "tok {} {} romanize={} lower={} gzip={} overwrite={}",
                job.input.file_name().unwrap().to_string_lossy(),
                job.lang,
                job.romanize,
                job.lower_case,
                job.gzip,
                job.over_write
            ));
            if self.fail {
                bail!("tokenizer crashed");
            }
            fs::write(job.output, "tok\n")?;
            Ok(())
        }
    }

    impl ApplyBpe for Recorder {
        fn apply_bpe(&self, job: &BpeJob<'_>) -> Result<()> {
            self.calls.borrow_mut().push(format!(
                "bpe {} overwrite={}",
                job.input.file_name().unwrap().to_string_lossy(),
                job.over_write
            ));
            fs::write(job.output, "bpe\n")?;
            Ok(())
        }
    }

    fn calls(recorder: &Recorder) -> Vec<String> {
        recorder.calls.borrow().clone()
    }

    #[test]
    fn test_validate() {
        let config = PrepConfig::new("a.txt", "out").with_buffer_size(0);
        assert_eq!(config.validate().unwrap().buffer_size(), 1);

        let config = PrepConfig::new("a.txt", "out")
            .with_buffer_size(10)
            .with_max_sentences(Some(11));
        assert_eq!(
            config.validate(),
            Err(ConfigError::BatchExceedsBuffer {
                max_sentences: 11,
                buffer_size: 10
            })
        );

        let config = PrepConfig::new("a.txt", "out").with_max_sentences(Some(0));
        assert!(config.validate().is_ok());

        let config = PrepConfig::new("/", "out");
        assert!(matches!(config.validate(), Err(ConfigError::NoFileName(_))));
    }

    #[test]
    fn test_derived_path() {
        let config = PrepConfig::new("data/dev/a.txt", "/tmp/out");
        assert_eq!(config.derived_path(".tok"), Path::new("/tmp/out/a.txt.tok"));
        assert_eq!(config.derived_path(".bpe"), Path::new("/tmp/out/a.txt.bpe"));
    }

    #[test]
    fn test_max_sentences_aborts_before_io() {
        let tokenizer = Recorder::default();
        let bpe = Recorder::default();
        let config = PrepConfig::new("/nonexistent/a.txt", "/nonexistent/out")
            .with_token_lang("en")
            .with_bpe_codes(Some("/nonexistent/codes"))
            .with_buffer_size(5)
            .with_max_sentences(Some(6));

        assert!(Preprocessor::new(config, &tokenizer, &bpe).is_err());
        assert!(calls(&tokenizer).is_empty());
        assert!(calls(&bpe).is_empty());
    }

    #[test]
    fn test_nothing_to_do() {
        let tokenizer = Recorder::default();
        let bpe = Recorder::default();
        let config = PrepConfig::new("/nonexistent/a.txt", "/nonexistent/out");

        let artifacts = Preprocessor::new(config, &tokenizer, &bpe).unwrap().run().unwrap();
        assert_eq!(artifacts.tokenized, None);
        assert_eq!(artifacts.bpe, None);
        assert_eq!(artifacts.output, Path::new("/nonexistent/a.txt"));
        assert!(calls(&tokenizer).is_empty());
        assert!(calls(&bpe).is_empty());
    }

    #[test]
    fn test_tokenize_then_bpe() {
        let tmp = tempdir().unwrap();
        let dir = tmp.path();
        let input = dir.join("a.txt");
        fs::write(&input, "Hello\n").unwrap();

        let tokenizer = Recorder::default();
        let bpe = Recorder::default();
        let config = PrepConfig::new(&input, dir)
            .with_token_lang("en")
            .with_bpe_codes(Some(dir.join("codes")));
        let artifacts = Preprocessor::new(config, &tokenizer, &bpe).unwrap().run().unwrap();

        assert_eq!(
            calls(&tokenizer),
            vec!["tok a.txt en romanize=false lower=true gzip=false overwrite=false"]
        );
        assert_eq!(calls(&bpe), vec!["bpe a.txt.tok overwrite=false"]);
        assert_eq!(artifacts.tokenized, Some(dir.join("a.txt.tok")));
        assert_eq!(artifacts.bpe, Some(dir.join("a.txt.bpe")));
        assert_eq!(artifacts.output, dir.join("a.txt.bpe"));
    }

    #[test]
    fn test_greek_is_romanized() {
        let tmp = tempdir().unwrap();
        let dir = tmp.path();
        let tokenizer = Recorder::default();
        let config = PrepConfig::new(dir.join("el.txt"), dir).with_token_lang("el");
        Preprocessor::new(config, &tokenizer, &Recorder::default())
            .unwrap()
            .run()
            .unwrap();
        assert_eq!(
            calls(&tokenizer),
            vec!["tok el.txt el romanize=true lower=true gzip=false overwrite=false"]
        );
    }

    #[test]
    fn test_existing_outputs_are_reused() {
        let tmp = tempdir().unwrap();
        let dir = tmp.path();
        fs::write(dir.join("a.txt.tok"), "old tok\n").unwrap();
        fs::write(dir.join("a.txt.bpe"), "old bpe\n").unwrap();

        let tokenizer = Recorder::default();
        let bpe = Recorder::default();
        let config = PrepConfig::new(dir.join("a.txt"), dir)
            .with_token_lang("en")
            .with_bpe_codes(Some(dir.join("codes")));
        let artifacts = Preprocessor::new(config, &tokenizer, &bpe).unwrap().run().unwrap();

        assert!(calls(&tokenizer).is_empty());
        assert!(calls(&bpe).is_empty());
        assert_eq!(artifacts.output, dir.join("a.txt.bpe"));
        assert_eq!(fs::read_to_string(dir.join("a.txt.tok")).unwrap(), "old tok\n");
    }

    #[test]
    fn test_bpe_without_tokenization_reads_input() {
        let tmp = tempdir().unwrap();
        let dir = tmp.path();
        let bpe = Recorder::default();
        let config = PrepConfig::new(dir.join("a.txt"), dir).with_bpe_codes(Some(dir.join("codes")));
        Preprocessor::new(config, &Recorder::default(), &bpe)
            .unwrap()
            .run()
            .unwrap();
        assert_eq!(calls(&bpe), vec!["bpe a.txt overwrite=false"]);
    }

    #[test]
    fn test_tokenizer_failure_stops_the_run() {
        let tmp = tempdir().unwrap();
        let dir = tmp.path();
        let tokenizer = Recorder {
            fail: true,
            ..Default::default()
        };
        let bpe = Recorder::default();
        let config = PrepConfig::new(dir.join("a.txt"), dir)
            .with_token_lang("en")
            .with_bpe_codes(Some(dir.join("codes")));

        let err = Preprocessor::new(config, &tokenizer, &bpe).unwrap().run().unwrap_err();
        assert!(format!("{:#}", err).contains("tokenizer crashed"));
        assert!(calls(&bpe).is_empty());
    }
}
