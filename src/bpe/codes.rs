use std::collections::HashMap;
use std::io::BufRead;
use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};

use crate::bpe::CONTINUATION;
use crate::loader::open_text;

/// End-of-word marker used while merging.
pub const END_OF_WORD: &str = "</w>";

/// BPE merge table. Lower rank merges first.
#[derive(Default, Debug)]
pub struct BpeCodes {
    ranks: HashMap<String, HashMap<String, usize>>,
    len: usize,
}

impl BpeCodes {
    /// Builds the table from merges ordered by priority.
    pub fn build<I, S>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, S)>,
        S: Into<String>,
    {
        let mut codes = Self::default();
        for (left, right) in pairs {
            codes.push(left.into(), right.into())?;
        }
        Ok(codes)
    }

    /// Reads a codes file, `left right [count]` per line.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        Self::from_reader(open_text(path)?)
            .with_context(|| format!("invalid BPE codes in {}", path.display()))
    }

    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut codes = Self::default();
        for (i, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() || (i == 0 && line.starts_with("#version")) {
                continue;
            }
            let mut fields = line.split_whitespace();
            match (fields.next(), fields.next()) {
                (Some(left), Some(right)) => codes
                    .push(left.to_string(), right.to_string())
                    .map_err(|e| anyhow!("line {}: {}", i + 1, e))?,
                _ => bail!("line {}: expected `left right [count]`, got {:?}", i + 1, line),
            }
        }
        Ok(codes)
    }

    fn push(&mut self, left: String, right: String) -> Result<()> {
        let rank = self.len;
        let rights = self.ranks.entry(left).or_default();
        if rights.contains_key(&right) {
            bail!("duplicated code {:?}", right);
        }
        rights.insert(right, rank);
        self.len += 1;
        Ok(())
    }

    /// Number of merges.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Rank of merging `left` with `right`, if the pair is a code.
    pub fn rank(&self, left: &str, right: &str) -> Option<usize> {
        self.ranks.get(left)?.get(right).copied()
    }

    /// Splits a word into subwords.
    ///
    /// ```
    /// use laser_prep::BpeCodes;
    ///
    /// let codes = BpeCodes::build([("l", "o"), ("lo", "w</w>"), ("e", "r</w>")]).unwrap();
    /// assert_eq!(codes.segment_word("lower"), vec!["lo", "w", "er"]);
    /// assert_eq!(codes.segment_word("low"), vec!["low"]);
    /// ```
    pub fn segment_word(&self, word: &str) -> Vec<String> {
        let mut symbols: Vec<String> = word.chars().map(String::from).collect();
        match symbols.last_mut() {
            Some(last) => last.push_str(END_OF_WORD),
            None => return symbols,
        }

        loop {
            let best = symbols
                .windows(2)
                .enumerate()
                .filter_map(|(i, pair)| self.rank(&pair[0], &pair[1]).map(|rank| (rank, i)))
                .min();
            let Some((_, i)) = best else {
                break;
            };

            // Merge every occurrence of the pair, left to right.
            let (left, right) = (symbols[i].clone(), symbols[i + 1].clone());
            let mut merged = Vec::with_capacity(symbols.len() - 1);
            let mut j = 0;
            while j < symbols.len() {
                if j + 1 < symbols.len() && symbols[j] == left && symbols[j + 1] == right {
                    merged.push(format!("{}{}", left, right));
                    j += 2;
                } else {
                    merged.push(std::mem::take(&mut symbols[j]));
                    j += 1;
                }
            }
            symbols = merged;
        }

        if let Some(last) = symbols.last_mut() {
            last.truncate(last.len() - END_OF_WORD.len());
        }
        symbols
    }

    /// Segments every word of a line, marking non-final subwords with `@@`.
    pub fn apply_line(&self, line: &str) -> String {
        let separator = format!("{} ", CONTINUATION);
        line.split_whitespace()
            .map(|word| self.segment_word(word).join(&separator))
            .collect::<Vec<_>>()
            .join(" ")
    }
}
