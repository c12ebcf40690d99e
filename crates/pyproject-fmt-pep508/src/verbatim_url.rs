use std::fmt::{Display, Formatter};

use url::{ParseError, Url};

/// A wrapper around [`Url`] that preserves the exact string the author wrote.
///
/// `Url`'s own `Display` impl normalizes percent-encoding and path separators, which would make
/// rewriting a dependency array non-idempotent for URLs that are already valid but unusual (a
/// trailing slash, an uppercase scheme). Formatting always uses `given`, parsing is only used to
/// validate the URL and to reject garbage early.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct VerbatimUrl {
    url: Url,
    given: String,
}

impl VerbatimUrl {
    /// Parses a URL, keeping the original string for display.
    pub fn parse(given: impl Into<String>) -> Result<Self, ParseError> {
        let given = given.into();
        let url = Url::parse(&given)?;
        Ok(Self { url, given })
    }

    /// The parsed URL.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// The URL exactly as it was written.
    pub fn as_str(&self) -> &str {
        &self.given
    }
}

impl Display for VerbatimUrl {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.given)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preserves_original_spelling() {
        let url = VerbatimUrl::parse("https://example.org/foo.whl").unwrap();
        assert_eq!(url.to_string(), "https://example.org/foo.whl");
    }

    #[test]
    fn rejects_garbage() {
        assert!(VerbatimUrl::parse("not a url").is_err());
    }
}
