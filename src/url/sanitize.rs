use url::Url;

/// Longest label kept in a folder name, in characters
const MAX_LABEL_CHARS: usize = 100;

/// Derives a human-readable folder label from a URL's path
///
/// Leading and trailing slashes are stripped, inner slashes become
/// underscores, and an empty path maps to `index`. Characters that are not
/// safe in file names are replaced with underscores as well.
///
/// Labels are display names only: distinct URLs can share a label (e.g.
/// `/a/b` and `/a_b`), so storage keys combine the label with the URL
/// fingerprint.
///
/// # Examples
///
/// ```
/// use sitegraph::url::folder_label;
///
/// assert_eq!(folder_label("https://ex.com/"), "index");
/// assert_eq!(folder_label("https://ex.com/shop/shirts/"), "shop_shirts");
/// ```
pub fn folder_label(url: &str) -> String {
    let path = match Url::parse(url) {
        Ok(parsed) => parsed.path().to_string(),
        Err(_) => String::new(),
    };

    let label: String = path
        .trim_matches('/')
        .chars()
        .map(|c| match c {
            '/' => '_',
            c if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '%') => c,
            _ => '_',
        })
        .take(MAX_LABEL_CHARS)
        .collect();

    if label.is_empty() || label.chars().all(|c| c == '.') {
        "index".to_string()
    } else {
        label
    }
}
