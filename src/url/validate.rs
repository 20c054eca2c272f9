use crate::ValidationError;
use std::fmt;
use url::Url;

/// Longest raw input accepted, and the width of the `addresses.name` column
pub const MAX_URL_LENGTH: usize = 255;

/// An address reduced to `scheme://host`, lower-cased
///
/// Two inputs that differ only in case, path, query, fragment, port or
/// credentials produce the same `CanonicalUrl`, which is what makes the
/// address table de-duplicate.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalUrl(String);

impl CanonicalUrl {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for CanonicalUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CanonicalUrl {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Validates a raw address and normalizes it to its canonical form
///
/// # Rules
///
/// Applied in order, stopping at the first failure:
///
/// 1. Empty or whitespace-only input → [`ValidationError::Empty`]
/// 2. Not parseable as an absolute URL, or longer than 255 characters
///    (before or after IDN hosts are punycode-encoded)
///    → [`ValidationError::Malformed`]
/// 3. No host component → [`ValidationError::MissingHost`]
/// 4. Host ends with `.` → [`ValidationError::TrailingDot`]
/// 5. Fewer than 2 characters after the last `.` of the host (or no `.`
///    at all) → [`ValidationError::TopLevelDomainTooShort`]
///
/// Surrounding whitespace is ignored.
///
/// # Arguments
///
/// * `raw` - The address as typed by the user
///
/// # Returns
///
/// * `Ok(CanonicalUrl)` - The `scheme://host` form, never longer than 255 characters
/// * `Err(ValidationError)` - The first rule the input broke
///
/// # Examples
///
/// ```
/// use page_analyzer::url::validate_url;
///
/// let url = validate_url("HTTP://Example.COM/path?x=1").unwrap();
/// assert_eq!(url.as_str(), "http://example.com");
/// ```
pub fn validate_url(raw: &str) -> Result<CanonicalUrl, ValidationError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ValidationError::Empty);
    }

    if raw.chars().count() > MAX_URL_LENGTH {
        return Err(ValidationError::Malformed);
    }

    let parsed = Url::parse(raw).map_err(|_| ValidationError::Malformed)?;

    let host = match parsed.host_str() {
        Some(host) if !host.is_empty() => host.to_lowercase(),
        _ => return Err(ValidationError::MissingHost),
    };

    if host.ends_with('.') {
        return Err(ValidationError::TrailingDot);
    }

    let tld_len = host
        .rfind('.')
        .map(|dot| host[dot + 1..].chars().count())
        .unwrap_or(0);
    if tld_len < 2 {
        return Err(ValidationError::TopLevelDomainTooShort);
    }

    let scheme = parsed.scheme().to_lowercase();
    let canonical = format!("{}://{}", scheme, host);

    // IDN hosts come back punycode-encoded, which can outgrow the input
    if canonical.chars().count() > MAX_URL_LENGTH {
        return Err(ValidationError::Malformed);
    }

    Ok(CanonicalUrl(canonical))
}
