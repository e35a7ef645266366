//! URL normalization for resolution targets.

/// A target URL in both the forms the resolver needs: a fully qualified URL
/// for HTTP GETs and a host-only form for DNS lookups and comparisons.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlPair {
    full: String,
    host: String,
}

impl UrlPair {
    /// Normalize an input URL. A bare host gets `http://` prepended for the
    /// full form; a qualified URL gets its scheme and trailing `/` stripped
    /// for the host form.
    pub fn new(url: &str) -> Self {
        let url = url.trim();
        if let Some(rest) = url
            .strip_prefix("http://")
            .or_else(|| url.strip_prefix("https://"))
        {
            Self {
                full: url.to_string(),
                host: rest.trim_end_matches('/').to_string(),
            }
        } else {
            Self {
                full: format!("http://{url}"),
                host: url.trim_end_matches('/').to_string(),
            }
        }
    }

    /// Fully qualified URL for HTTP requests.
    pub fn full(&self) -> &str {
        &self.full
    }

    /// Host-only form for DNS lookups and comparisons.
    pub fn host(&self) -> &str {
        &self.host
    }
}
