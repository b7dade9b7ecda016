//! Word counting and readability over extracted body text.

/// Ideographs and kana have no spaces between words; count one word per two.
fn is_cjk(c: char) -> bool {
    matches!(c,
        '\u{3040}'..='\u{309F}'   // hiragana
        | '\u{30A0}'..='\u{30FF}' // katakana
        | '\u{3400}'..='\u{4DBF}'
        | '\u{4E00}'..='\u{9FFF}'
        | '\u{FF66}'..='\u{FF9F}' // half-width katakana
    )
}

/// Approximate word count of free text.
pub fn word_count(text: &str) -> u32 {
    let mut words = 0u32;
    let mut cjk_chars = 0u32;
    for token in text.split_whitespace() {
        let mut has_latin_word = false;
        for c in token.chars() {
            if is_cjk(c) {
                cjk_chars += 1;
            } else if c.is_alphanumeric() {
                has_latin_word = true;
            }
        }
        if has_latin_word {
            words += 1;
        }
    }
    words + cjk_chars.div_ceil(2)
}

fn is_sentence_end(c: char) -> bool {
    matches!(c, '.' | '!' | '?' | '。' | '！' | '？')
}

/// Readability estimate, 0–100.
///
/// 100 for sentences of ten words or fewer on average, minus 2.5 per
/// additional word. Text without words scores 0.
pub fn readability(text: &str) -> u8 {
    let mut sentences = 0u32;
    let mut words = 0u32;
    for sentence in text.split(is_sentence_end) {
        let n = word_count(sentence);
        if n > 0 {
            sentences += 1;
            words += n;
        }
    }
    if sentences == 0 {
        return 0;
    }
    let average = f64::from(words) / f64::from(sentences);
    let score = 100.0 - (average - 10.0).max(0.0) * 2.5;
    score.clamp(0.0, 100.0).round() as u8
}

/// Collapse runs of whitespace into single spaces.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
