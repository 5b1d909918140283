/// Longest slug, in bytes; leaves room for an extension under the 255-byte name limit
pub const MAX_SLUG_LEN: usize = 200;

/// Converts arbitrary text into a filesystem-safe slug
///
/// ASCII letters, digits, `.`, `_` and `-` are kept as-is; runs of whitespace
/// become a single `-`; every other character is dropped. Leading dots and
/// surrounding separators are trimmed so a slug can never name a hidden file
/// or a parent directory. Case is preserved, and the result is cut to
/// [`MAX_SLUG_LEN`] bytes.
///
/// # Examples
///
/// ```
/// use crawl_ingest::url::slugify;
///
/// assert_eq!(slugify("Getting Started: Install"), "Getting-Started-Install");
/// assert_eq!(slugify("example.com_docs_intro"), "example.com_docs_intro");
/// assert_eq!(slugify("../../etc/passwd"), "etcpasswd");
/// ```
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut pending_dash = false;

    for c in input.chars() {
        if c.is_whitespace() {
            pending_dash = true;
            continue;
        }

        if !(c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-')) {
            continue;
        }

        if pending_dash && !slug.is_empty() {
            slug.push('-');
        }
        pending_dash = false;
        slug.push(c);
    }

    // Only ASCII is ever pushed, so any byte index is a char boundary
    let slug = slug.trim_start_matches(['.', '-']);
    slug[..slug.len().min(MAX_SLUG_LEN)]
        .trim_end_matches('-')
        .to_string()
}
