/// Resolves photo references to absolute URLs against a known base address
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UrlResolver {
    base_url: String,
}

impl UrlResolver {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Absolute URL for `raw`.
    ///
    /// Already-absolute, `data:`, `blob:` and protocol-relative URLs pass
    /// through unchanged; blank input yields an empty string.
    pub fn resolve(&self, raw: &str) -> String {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return String::new();
        }
        if is_absolute(trimmed) {
            return trimmed.to_string();
        }
        format!("{}/{}", self.base_url, trimmed.trim_start_matches('/'))
    }
}

fn is_absolute(url: &str) -> bool {
    if url.starts_with("//") {
        return true;
    }
    let lower = url.get(..8).unwrap_or(url).to_ascii_lowercase();
    lower.starts_with("http://")
        || lower.starts_with("https://")
        || lower.starts_with("data:")
        || lower.starts_with("blob:")
}
