extern crate quickcheck;

use std::fs;
use std::path::Path;
use std::process::Command;

use laser_prep::{
    buffered_read, FastBpe, MosesTokenizer, PrepConfig, Preprocessor, TokenJob, Tokenize,
};
use quickcheck::{QuickCheck, TestResult, Testable};
use tempfile::tempdir;

fn qc<T: Testable>(f: T) {
    QuickCheck::new().tests(1000).max_tests(10000).quickcheck(f);
}

fn preprocess(config: PrepConfig) -> laser_prep::Artifacts {
    let buffer_size = config.buffer_size();
    Preprocessor::new(
        config,
        MosesTokenizer::with_batch_size(buffer_size),
        FastBpe::with_batch_size(buffer_size),
    )
    .unwrap()
    .run()
    .unwrap()
}

fn binary(toolkit_root: Option<&Path>) -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_preprocess-text"));
    command.env_remove("LASER");
    if let Some(root) = toolkit_root {
        command.env("LASER", root);
    }
    command
}

// Batching.

#[test]
fn buffered_read_counts() {
    fn prop(n: u16, size: u8) -> TestResult {
        if size == 0 {
            return TestResult::discard();
        }
        let (n, size) = (n as usize % 500, size as usize);
        let text: String = (0..n).map(|i| format!(" {} \n", i)).collect();
        let batches: Vec<Vec<String>> = buffered_read(text.as_bytes(), size)
            .map(|b| b.unwrap())
            .collect();

        let sizes_ok = batches.iter().enumerate().all(|(i, b)| {
            if i + 1 == batches.len() {
                (1..=size).contains(&b.len())
            } else {
                b.len() == size
            }
        });
        let flat: Vec<String> = batches.iter().flatten().cloned().collect();
        let expected: Vec<String> = (0..n).map(|i| i.to_string()).collect();
        TestResult::from_bool(batches.len() == (n + size - 1) / size && sizes_ok && flat == expected)
    }
    qc(prop as fn(u16, u8) -> TestResult);
}

// End to end with the native collaborators.

#[test]
fn tokenizes_into_output_dir() {
    let tmp = tempdir().unwrap();
        let dir = tmp.path();
    let input = dir.join("a.txt");
    let out = dir.join("out");
    fs::create_dir_all(&out).unwrap();
    fs::write(&input, "Hello world\nBonjour\n").unwrap();

    let artifacts = preprocess(PrepConfig::new(&input, &out).with_token_lang("en"));

    assert_eq!(artifacts.tokenized, Some(out.join("a.txt.tok")));
    assert_eq!(
        fs::read_to_string(out.join("a.txt.tok")).unwrap(),
        "hello world\nbonjour\n"
    );
    assert!(!out.join("a.txt.bpe").exists());
}

#[test]
fn tokenizes_and_applies_bpe() {
    let tmp = tempdir().unwrap();
        let dir = tmp.path();
    let input = dir.join("news.en");
    let codes = dir.join("codes");
    fs::write(&input, "The lower, the slower.\n").unwrap();
    fs::write(&codes, "l o\nlo w\ne r</w>\nt h\nth e</w>\ns low\n").unwrap();

    let artifacts = preprocess(
        PrepConfig::new(&input, dir)
            .with_token_lang("en")
            .with_bpe_codes(Some(&codes)),
    );

    assert_eq!(
        fs::read_to_string(dir.join("news.en.tok")).unwrap(),
        "the lower , the slower .\n"
    );
    assert_eq!(artifacts.output, dir.join("news.en.bpe"));
    assert_eq!(
        fs::read_to_string(dir.join("news.en.bpe")).unwrap(),
        "the low@@ er , the slow@@ er .\n"
    );
}

#[test]
fn greek_input_is_romanized() {
    let tmp = tempdir().unwrap();
        let dir = tmp.path();
    let input = dir.join("el.txt");
    fs::write(&input, "Γεια σου, κόσμε!\n").unwrap();

    preprocess(PrepConfig::new(&input, dir).with_token_lang("el"));
    assert_eq!(
        fs::read_to_string(dir.join("el.txt.tok")).unwrap(),
        "geia sou , kosme !\n"
    );
}

#[test]
fn gzip_input_is_read() {
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;

    let tmp = tempdir().unwrap();
        let dir = tmp.path();
    let input = dir.join("a.txt.gz");
    let mut encoder = GzEncoder::new(fs::File::create(&input).unwrap(), Compression::default());
    encoder.write_all("Ready? Go!\n".as_bytes()).unwrap();
    encoder.finish().unwrap();

    preprocess(PrepConfig::new(&input, dir).with_token_lang("en"));
    assert_eq!(
        fs::read_to_string(dir.join("a.txt.gz.tok")).unwrap(),
        "ready ? go !\n"
    );
}

#[test]
fn tokenizer_writes_gzip_on_request() {
    use flate2::read::GzDecoder;
    use std::io::Read;

    let tmp = tempdir().unwrap();
        let dir = tmp.path();
    let input = dir.join("a.txt");
    let output = dir.join("a.tok.gz");
    fs::write(&input, "One.\n").unwrap();

    let job = TokenJob {
        input: &input,
        output: &output,
        lang: "en",
        romanize: false,
        lower_case: true,
        gzip: true,
        verbose: false,
        over_write: false,
    };
    MosesTokenizer::new().tokenize(&job).unwrap();

    let mut text = String::new();
    GzDecoder::new(fs::File::open(&output).unwrap())
        .read_to_string(&mut text)
        .unwrap();
    assert_eq!(text, "one .\n");
}

// The command line.

#[test]
fn cli_requires_toolkit_root() {
    let tmp = tempdir().unwrap();
        let dir = tmp.path();
    let output = binary(None)
        .arg("--input")
        .arg(dir.join("a.txt"))
        .arg("-o")
        .arg(dir)
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("LASER"));
}

#[test]
fn cli_rejects_large_max_sentences() {
    let tmp = tempdir().unwrap();
        let dir = tmp.path();
    let output = binary(Some(dir))
        .args(["--token-lang", "en", "--buffer-size", "4", "--max-sentences", "5"])
        .arg("--input")
        .arg(dir.join("missing.txt"))
        .arg("-o")
        .arg(dir.join("out"))
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("--buffer-size"));
    assert!(!dir.join("out").exists());
}

#[test]
fn cli_skips_existing_outputs() {
    let tmp = tempdir().unwrap();
    let dir = tmp.path();
    let input = dir.join("a.txt");
    fs::write(&input, "Hello world\n").unwrap();
    fs::write(dir.join("codes"), "h e\n").unwrap();
    fs::write(dir.join("a.txt.tok"), "kept\n").unwrap();
    fs::write(dir.join("a.txt.bpe"), "kept too\n").unwrap();

    let output = binary(Some(dir))
        .args(["--token-lang", "en"])
        .arg("--input")
        .arg(&input)
        .arg("--bpe-codes")
        .arg(dir.join("codes"))
        .arg("--output_dir")
        .arg(dir)
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Skipping the tokenization"));
    assert!(stdout.contains(&format!(
        " - fast BPE: {} exists. Skipping the BPEfying step.",
        dir.join("a.txt.bpe").display()
    )));
    assert_eq!(fs::read_to_string(dir.join("a.txt.tok")).unwrap(), "kept\n");
    assert_eq!(fs::read_to_string(dir.join("a.txt.bpe")).unwrap(), "kept too\n");
}

#[test]
fn cli_tokenizes() {
    let tmp = tempdir().unwrap();
        let dir = tmp.path();
    let input = dir.join("a.txt");
    let out = dir.join("out");
    fs::write(&input, "Hello world\nBonjour\n").unwrap();

    let output = binary(Some(dir))
        .args(["--token-lang", "en", "-v"])
        .arg("--input")
        .arg(&input)
        .arg("-o")
        .arg(&out)
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(
        fs::read_to_string(out.join("a.txt.tok")).unwrap(),
        "hello world\nbonjour\n"
    );
    assert!(!out.join("a.txt.bpe").exists());
}
