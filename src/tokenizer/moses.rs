use crate::tokenizer::nonbreaking::{lookup, Prefix};

/// Splits a normalized line into tokens, Moses style.
///
/// Hyphens stay inside words, commas stay between digits, and a word-final
/// period is split off unless it ends an abbreviation.
pub fn split_tokens(text: &str, lang: &str) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    let mut padded = String::with_capacity(text.len() + 16);

    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        let prev = i.checked_sub(1).map(|j| chars[j]);
        let next = chars.get(i + 1).copied();
        match c {
            '.' => {
                let run = chars[i..].iter().take_while(|&&d| d == '.').count();
                if run > 1 {
                    padded.push(' ');
                    padded.extend(std::iter::repeat('.').take(run));
                    padded.push(' ');
                } else {
                    padded.push('.');
                }
                i += run;
                continue;
            }
            '-' => padded.push('-'),
            ',' if is_digit(prev) && is_digit(next) => padded.push(','),
            '\'' => split_apostrophe(&mut padded, prev, next, lang),
            c if c.is_alphanumeric() || c.is_whitespace() => padded.push(c),
            c => pad(&mut padded, c),
        }
        i += 1;
    }

    let words: Vec<&str> = padded.split_whitespace().collect();
    let mut tokens = Vec::with_capacity(words.len() + 1);
    for (i, word) in words.iter().enumerate() {
        let next = words.get(i + 1).copied();
        match word.strip_suffix('.') {
            Some(stem) if !stem.is_empty() && !keeps_period(stem, next, lang) => {
                tokens.push(stem.to_string());
                tokens.push(".".to_string());
            }
            _ => tokens.push(word.to_string()),
        }
    }
    tokens
}

fn pad(out: &mut String, c: char) {
    out.push(' ');
    out.push(c);
    out.push(' ');
}

fn is_alpha(c: Option<char>) -> bool {
    c.map_or(false, char::is_alphabetic)
}

fn is_digit(c: Option<char>) -> bool {
    c.map_or(false, char::is_numeric)
}

fn split_apostrophe(out: &mut String, prev: Option<char>, next: Option<char>, lang: &str) {
    match lang {
        "en" => {
            if is_alpha(prev) && is_alpha(next) || is_digit(prev) && next == Some('s') {
                // don't -> don 't, 1990's -> 1990 's
                out.push_str(" '");
            } else if is_digit(prev) && is_alpha(next) {
                out.push('\'');
            } else {
                pad(out, '\'');
            }
        }
        "fr" | "it" | "ca" | "ga" => {
            if is_alpha(prev) && is_alpha(next) {
                // l'homme -> l' homme
                out.push_str("' ");
            } else {
                pad(out, '\'');
            }
        }
        _ => pad(out, '\''),
    }
}

fn keeps_period(stem: &str, next: Option<&str>, lang: &str) -> bool {
    if stem.chars().all(|c| c == '.') {
        return true;
    }
    // U.S. or e.g.
    if stem.contains('.') && stem.chars().any(char::is_alphabetic) {
        return true;
    }
    match lookup(lang, stem) {
        Some(Prefix::Always) => return true,
        Some(Prefix::NumericOnly) => {
            if next.map_or(false, |w| w.starts_with(char::is_numeric)) {
                return true;
            }
        }
        None => {}
    }
    next.map_or(false, |w| w.starts_with(char::is_lowercase))
}
