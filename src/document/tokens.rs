/// Average number of ASCII letters or digits per language-model token
const CHARS_PER_TOKEN: usize = 4;

/// Estimates the number of language-model tokens in `text`
///
/// Each whitespace-separated word is split into runs of ASCII letters and
/// digits, which cost one token per [`CHARS_PER_TOKEN`] characters (rounded
/// up). Punctuation, symbols and non-ASCII characters cost one token each.
/// Whitespace is free. The estimate is a pure function of the input.
///
/// # Examples
///
/// ```
/// use crawl_ingest::estimate_tokens;
///
/// assert_eq!(estimate_tokens(""), 0);
/// assert_eq!(estimate_tokens("hello world"), 4);
/// assert_eq!(estimate_tokens("a, b."), 4);
/// ```
pub fn estimate_tokens(text: &str) -> usize {
    text.split_whitespace().map(word_tokens).sum()
}

fn word_tokens(word: &str) -> usize {
    let mut tokens = 0;
    let mut run: usize = 0;

    for c in word.chars() {
        if c.is_ascii_alphanumeric() {
            run += 1;
            continue;
        }
        tokens += run.div_ceil(CHARS_PER_TOKEN) + 1;
        run = 0;
    }

    tokens + run.div_ceil(CHARS_PER_TOKEN)
}
