use tokenizers::NormalizedString;

/// Normalizes Unicode punctuation and strips non-printing characters.
///
/// NFKC folds full-width forms and the ellipsis; the remaining quotes,
/// dashes and CJK punctuation are mapped to their ASCII counterparts.
pub fn normalize_punctuation(line: &str) -> String {
    let mut normalized = NormalizedString::from(line);
    normalized
        .nfkc()
        .filter(|c| c.is_whitespace() || !c.is_control())
        .map(|c| if c.is_whitespace() { ' ' } else { c })
        .map(ascii_punctuation);
    normalized.get().to_string()
}

fn ascii_punctuation(c: char) -> char {
    match c {
        '。' | '｡' => '.',
        '、' | '､' => ',',
        '“' | '”' | '„' | '‟' | '«' | '»' | '「' | '」' | '『' | '』' | '《' | '》' => '"',
        '‘' | '’' | '‚' | '‛' | '´' | '′' => '\'',
        '–' | '—' | '―' | '‐' | '‑' | '−' => '-',
        '【' | '〔' => '[',
        '】' | '〕' => ']',
        '\u{200b}' | '\u{feff}' => ' ',
        _ => c,
    }
}
