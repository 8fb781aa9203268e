//! Endpoint URL joining.
//!
//! Base URLs come from config files and flags, so they may or may not carry
//! a trailing slash; model ids on the hosted API contain slashes of their own.

/// Strips trailing slashes.
///
/// ```
/// use duet::utils::url::normalize_base_url;
///
/// assert_eq!(normalize_base_url("http://localhost:11434/"), "http://localhost:11434");
/// ```
pub fn normalize_base_url(base_url: &str) -> String {
    base_url.trim_end_matches('/').to_string()
}

/// Joins `base_url` and `endpoint` with exactly one slash between them.
///
/// ```
/// use duet::utils::url::construct_api_url;
///
/// assert_eq!(
///     construct_api_url("http://localhost:11434/", "/api/chat"),
///     "http://localhost:11434/api/chat"
/// );
/// ```
pub fn construct_api_url(base_url: &str, endpoint: &str) -> String {
    let base = normalize_base_url(base_url);
    let endpoint = endpoint.trim_start_matches('/');
    format!("{base}/{endpoint}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slashes_are_dropped() {
        assert_eq!(normalize_base_url("http://localhost:11434"), "http://localhost:11434");
        assert_eq!(normalize_base_url("http://localhost:11434///"), "http://localhost:11434");
        assert_eq!(normalize_base_url("///"), "");
    }

    #[test]
    fn local_chat_endpoint() {
        for base in ["http://localhost:11434", "http://localhost:11434/"] {
            assert_eq!(
                construct_api_url(base, "api/chat"),
                "http://localhost:11434/api/chat"
            );
        }
    }

    #[test]
    fn hosted_model_paths_keep_inner_slashes() {
        assert_eq!(
            construct_api_url(
                "https://api-inference.huggingface.co/models/",
                "/HuggingFaceH4/zephyr-7b-beta"
            ),
            "https://api-inference.huggingface.co/models/HuggingFaceH4/zephyr-7b-beta"
        );
    }
}
