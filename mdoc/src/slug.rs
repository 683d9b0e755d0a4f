use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

static DISALLOWED: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s/-]").unwrap());
static SEPARATORS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[-\s]+").unwrap());

/// Make a URL-safe anchor from a title.
///
/// Diacritics are stripped through NFKD decomposition and every non-ASCII
/// character is dropped. Punctuation other than `-` and `/` goes, the result
/// is trimmed and lowercased, whitespace and hyphen runs become a single `-`,
/// and slashes are removed last: `"Hello, World! Café"` gives
/// `"hello-world-cafe"`, `"a/b c"` gives `"ab-c"`.
///
/// Distinct titles may map to the same slug.
pub fn slug(text: &str) -> String {
    let ascii: String = text.nfkd().filter(char::is_ascii).collect();
    let kept = DISALLOWED.replace_all(&ascii, "");
    let lowered = kept.trim().to_lowercase();
    SEPARATORS.replace_all(&lowered, "-").replace('/', "")
}
