use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use laser_prep::driver::DEFAULT_MAX_TOKENS;
use laser_prep::{
    ApplyBpe, FastBpe, FastBpeBinary, MosesTokenizer, PrepConfig, Preprocessor, Toolkit,
    DEFAULT_BUFFER_SIZE, NO_TOKENIZATION,
};
use tracing::debug;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum BpeBackend {
    /// Built-in implementation
    Native,
    /// The toolkit's compiled fastBPE executable
    Fast,
}

#[derive(Parser, Debug)]
#[command(author, version, about = "LASER: Embed sentences", long_about = None)]
struct Args {
    /// Input file to be encoded
    #[arg(long)]
    input: PathBuf,

    /// Perform tokenization with given language ('--' for no tokenization)
    #[arg(long, default_value = NO_TOKENIZATION, allow_hyphen_values = true)]
    token_lang: String,

    /// Apply BPE using specified codes
    #[arg(long)]
    bpe_codes: Option<PathBuf>,

    /// Detailed output
    #[arg(short, long)]
    verbose: bool,

    /// Buffer size (sentences)
    #[arg(long, default_value_t = DEFAULT_BUFFER_SIZE)]
    buffer_size: usize,

    /// Maximum number of tokens to process in a batch
    #[arg(long, default_value_t = DEFAULT_MAX_TOKENS)]
    max_tokens: usize,

    /// Maximum number of sentences to process in a batch
    #[arg(long)]
    max_sentences: Option<usize>,

    /// Output directory for the preprocessed files
    #[arg(short, long = "output_dir", alias = "output-dir")]
    output_dir: PathBuf,

    /// Use CPU instead of GPU
    #[arg(long)]
    cpu: bool,

    /// BPE implementation to use
    #[arg(long, value_enum, default_value_t = BpeBackend::Native)]
    bpe_backend: BpeBackend,
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::INFO
    } else {
        LevelFilter::WARN
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(level.into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    // The toolkit root must be known before anything else happens.
    let toolkit = Toolkit::from_env()?;
    let args = Args::parse();
    init_logging(args.verbose);
    debug!(root = %toolkit.root().display(), "toolkit");

    let config = PrepConfig::new(&args.input, &args.output_dir)
        .with_token_lang(args.token_lang)
        .with_bpe_codes(args.bpe_codes)
        .with_buffer_size(args.buffer_size)
        .with_max_tokens(args.max_tokens)
        .with_max_sentences(args.max_sentences)
        .with_cpu(args.cpu)
        .with_verbose(args.verbose)
        .validate()?;

    let bpe: Box<dyn ApplyBpe> = match args.bpe_backend {
        BpeBackend::Native => Box::new(FastBpe::with_batch_size(config.buffer_size())),
        BpeBackend::Fast => Box::new(FastBpeBinary::from_toolkit(&toolkit)),
    };
    let tokenizer = MosesTokenizer::with_batch_size(config.buffer_size());

    fs::create_dir_all(config.output_dir())
        .with_context(|| format!("cannot create {}", config.output_dir().display()))?;

    let artifacts = Preprocessor::new(config, tokenizer, bpe)?.run()?;
    debug!(output = %artifacts.output.display(), "done");
    Ok(())
}
