//! URL helpers: canonicalization, asset resolution, origin classification.

/// Error type for URL handling failures.
#[derive(Debug, Clone, thiserror::Error)]
pub enum UrlError {
    #[error("empty URL")]
    Empty,

    #[error("unsupported scheme: {0}")]
    UnsupportedScheme(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}

/// Canonicalize an absolute URL string for consistent cache identity.
///
/// Trims whitespace, lowercases the host, drops the fragment, keeps the
/// query intact. Only http(s) is accepted.
pub fn canonicalize(input: &str) -> Result<url::Url, UrlError> {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return Err(UrlError::Empty);
    }

    let mut parsed = url::Url::parse(trimmed).map_err(|e| UrlError::InvalidUrl(e.to_string()))?;

    match parsed.scheme() {
        "http" | "https" => {}
        scheme => return Err(UrlError::UnsupportedScheme(scheme.to_string())),
    }

    if let Some(host) = parsed.host_str() {
        let lowered = host.to_lowercase();
        parsed
            .set_host(Some(&lowered))
            .map_err(|e| UrlError::InvalidUrl(e.to_string()))?;
    }

    parsed.set_fragment(None);

    Ok(parsed)
}

/// Resolve a configured asset entry against the site origin.
///
/// Asset lists mix site-relative paths ("/styles.css") and absolute CDN
/// URLs; both come out as canonical absolute URLs.
pub fn resolve_asset(origin: &url::Url, asset: &str) -> Result<url::Url, UrlError> {
    let trimmed = asset.trim();

    if trimmed.is_empty() {
        return Err(UrlError::Empty);
    }

    if trimmed.contains("://") {
        return canonicalize(trimmed);
    }

    let joined = origin.join(trimmed).map_err(|e| UrlError::InvalidUrl(e.to_string()))?;
    canonicalize(joined.as_str())
}

/// Whether two URLs share an origin (scheme, host, port).
pub fn same_origin(a: &url::Url, b: &url::Url) -> bool {
    a.origin() == b.origin()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonicalize_basic() {
        let url = canonicalize("https://elrayan.site/styles.css").unwrap();
        assert_eq!(url.scheme(), "https");
        assert_eq!(url.host_str(), Some("elrayan.site"));
    }

    #[test]
    fn test_canonicalize_lowercase_host() {
        let url = canonicalize("https://ELRAYAN.SITE/app.js").unwrap();
        assert_eq!(url.host_str(), Some("elrayan.site"));
    }

    #[test]
    fn test_canonicalize_remove_fragment() {
        let url = canonicalize("https://elrayan.site/page#contact").unwrap();
        assert_eq!(url.fragment(), None);
    }

    #[test]
    fn test_canonicalize_preserve_query() {
        let url = canonicalize("https://fonts.googleapis.com/css2?family=Cairo&display=swap").unwrap();
        assert_eq!(url.query(), Some("family=Cairo&display=swap"));
    }

    #[test]
    fn test_canonicalize_trim_whitespace() {
        let url = canonicalize("  https://elrayan.site/  ").unwrap();
        assert_eq!(url.as_str(), "https://elrayan.site/");
    }

    #[test]
    fn test_canonicalize_unsupported_scheme() {
        let result = canonicalize("file:///etc/passwd");
        assert!(matches!(result, Err(UrlError::UnsupportedScheme(_))));
    }

    #[test]
    fn test_canonicalize_empty() {
        assert!(matches!(canonicalize(""), Err(UrlError::Empty)));
        assert!(matches!(canonicalize("   "), Err(UrlError::Empty)));
    }

    #[test]
    fn test_resolve_relative_asset() {
        let origin = url::Url::parse("https://elrayan.site").unwrap();
        let url = resolve_asset(&origin, "/icons/icon-192.png").unwrap();
        assert_eq!(url.as_str(), "https://elrayan.site/icons/icon-192.png");
    }

    #[test]
    fn test_resolve_absolute_asset() {
        let origin = url::Url::parse("https://elrayan.site").unwrap();
        let url = resolve_asset(&origin, "https://cdn.jsdelivr.net/npm/bootstrap.min.css").unwrap();
        assert_eq!(url.host_str(), Some("cdn.jsdelivr.net"));
    }

    #[test]
    fn test_resolve_root() {
        let origin = url::Url::parse("https://elrayan.site").unwrap();
        let url = resolve_asset(&origin, "/").unwrap();
        assert_eq!(url.as_str(), "https://elrayan.site/");
    }

    #[test]
    fn test_same_origin() {
        let a = url::Url::parse("https://elrayan.site/a.css").unwrap();
        let b = url::Url::parse("https://elrayan.site/deep/b.js").unwrap();
        let c = url::Url::parse("https://cdn.example/b.js").unwrap();
        assert!(same_origin(&a, &b));
        assert!(!same_origin(&a, &c));
    }

    #[test]
    fn test_same_origin_scheme_matters() {
        let a = url::Url::parse("https://elrayan.site/").unwrap();
        let b = url::Url::parse("http://elrayan.site/").unwrap();
        assert!(!same_origin(&a, &b));
    }
}
