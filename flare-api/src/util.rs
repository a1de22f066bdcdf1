use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    pub static ref URL_SCHEME_REGEX: Regex =
        Regex::new(r"^[a-zA-Z][a-zA-Z0-9+.-]*://").expect("regex is valid");
}

/// Returns true if the given string carries its own scheme
pub fn is_absolute_url(url: &str) -> bool {
    URL_SCHEME_REGEX.is_match(url)
}

/// Ensures a base URL ends with a slash, so relative paths are joined onto it
/// instead of replacing its last segment.
pub fn with_trailing_slash(url: &str) -> String {
    if url.ends_with('/') {
        url.to_string()
    } else {
        format!("{}/", url)
    }
}

#[cfg(test)]
mod test {
    use super::{is_absolute_url, with_trailing_slash};

    #[test]
    fn absolute_urls() {
        assert!(is_absolute_url("https://flare.ddev.site/storage/a.jpg"));
        assert!(is_absolute_url("http://127.0.0.1:8000/a.jpg"));
        assert!(!is_absolute_url("/storage/a.jpg"));
        assert!(!is_absolute_url("flares/a.jpg"));
    }

    #[test]
    fn trailing_slash() {
        assert_eq!(with_trailing_slash("https://a.b/api"), "https://a.b/api/");
        assert_eq!(with_trailing_slash("https://a.b/api/"), "https://a.b/api/");
    }
}
