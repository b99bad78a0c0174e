//! Shop domain sanitization.
//!
//! Every shop value that reaches the session store comes from a query
//! parameter or webhook header, so it is normalized and checked against the
//! platform's domain shape before use.

use std::sync::LazyLock;

use regex::Regex;

/// Default shop domain suffix.
pub const DEFAULT_SHOP_DOMAIN: &str = "myshopify.com";

const SHOP_LABEL_PATTERN: &str = r"[a-zA-Z0-9][a-zA-Z0-9\-_]*";

static DEFAULT_SHOP_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&shop_pattern(DEFAULT_SHOP_DOMAIN)).expect("valid regex")
});

fn shop_pattern(domain: &str) -> String {
    format!(r"^{SHOP_LABEL_PATTERN}\.{}$", regex::escape(domain))
}

/// Normalize `input` and return it if it is a valid shop domain.
///
/// Accepts `<label>.myshopify.com`, or `<label>.<custom_domain>` when a
/// custom domain is configured. Surrounding whitespace, a leading scheme
/// and a trailing slash are stripped; the result is lower-cased.
pub fn sanitize_shop(input: &str, custom_domain: Option<&str>) -> Option<String> {
    let trimmed = input.trim();
    let without_scheme = trimmed
        .strip_prefix("https://")
        .or_else(|| trimmed.strip_prefix("http://"))
        .unwrap_or(trimmed);
    let shop = without_scheme.trim_end_matches('/').to_ascii_lowercase();

    if DEFAULT_SHOP_RE.is_match(&shop) {
        return Some(shop);
    }

    let custom = custom_domain.map(str::trim).filter(|d| !d.is_empty())?;
    let re = Regex::new(&shop_pattern(&custom.to_ascii_lowercase())).ok()?;
    re.is_match(&shop).then_some(shop)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_myshopify_domain() {
        assert_eq!(
            sanitize_shop("example-store.myshopify.com", None).as_deref(),
            Some("example-store.myshopify.com")
        );
    }

    #[test]
    fn normalizes_scheme_case_and_slash() {
        assert_eq!(
            sanitize_shop("  https://Example.myshopify.com/ ", None).as_deref(),
            Some("example.myshopify.com")
        );
    }

    #[test]
    fn rejects_foreign_domains() {
        assert_eq!(sanitize_shop("example.com", None), None);
        assert_eq!(sanitize_shop("evil.myshopify.com.attacker.io", None), None);
        assert_eq!(sanitize_shop("-bad.myshopify.com", None), None);
        assert_eq!(sanitize_shop("", None), None);
    }

    #[test]
    fn accepts_configured_custom_domain() {
        assert_eq!(
            sanitize_shop("store.shops.example.io", Some("shops.example.io")).as_deref(),
            Some("store.shops.example.io")
        );
        assert_eq!(sanitize_shop("store.shopsXexample.io", Some("shops.example.io")), None);
    }
}
