use sha2::{Digest, Sha256};

/// Longest slug kept in a record key, before the hash suffix
const MAX_SLUG_LEN: usize = 80;

/// Length of the hex hash suffix
const HASH_LEN: usize = 12;

/// Maps a URL to a filename-safe record key
///
/// The key is a readable slug of the URL followed by a short SHA-256 prefix
/// of the full URL, so two URLs that slug identically still get distinct keys.
///
/// # Examples
///
/// ```
/// use docs_mirror::url::record_key;
///
/// let key = record_key("https://site.example/docs/intro?lang=en");
/// assert!(key.starts_with("site.example_docs_intro_lang_en-"));
/// ```
pub fn record_key(url: &str) -> String {
    let stripped = url
        .trim_start_matches("http://")
        .trim_start_matches("https://");

    let mut slug: String = stripped
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect();
    slug = slug.trim_matches('_').to_string();
    slug.truncate(MAX_SLUG_LEN);

    let digest = hex::encode(Sha256::digest(url.as_bytes()));
    format!("{}-{}", slug, &digest[..HASH_LEN])
}
