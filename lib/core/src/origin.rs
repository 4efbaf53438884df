//! Validated web origins.
//!
//! An [`Origin`] is the `scheme://host[:port]` triple a browser reports as
//! `window.location.origin`. The authentication redirect target is always an
//! origin, never a full URL, so it can be embedded in query strings as-is.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// URL scheme of an origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scheme {
    Http,
    Https,
}

impl Scheme {
    /// Returns the scheme name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::Https => "https",
        }
    }

    /// Returns the port implied when none is given.
    #[must_use]
    pub const fn default_port(&self) -> u16 {
        match self {
            Self::Http => 80,
            Self::Https => 443,
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scheme {
    type Err = OriginError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "http" => Ok(Self::Http),
            "https" => Ok(Self::Https),
            _ => Err(OriginError::UnsupportedScheme {
                scheme: s.to_string(),
            }),
        }
    }
}

/// Errors from parsing an origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OriginError {
    /// The input has no `://` separator.
    MissingScheme { input: String },
    /// Only `http` and `https` are accepted.
    UnsupportedScheme { scheme: String },
    /// The host part is empty.
    MissingHost,
    /// The host contains characters outside `[A-Za-z0-9.-]`.
    InvalidHost { host: String },
    /// The port is not a number in `1..=65535`.
    InvalidPort { port: String },
    /// The input carries a path, query, fragment or userinfo.
    NotAnOrigin { input: String },
}

impl fmt::Display for OriginError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingScheme { input } => write!(f, "origin '{input}' has no scheme"),
            Self::UnsupportedScheme { scheme } => {
                write!(f, "unsupported origin scheme '{scheme}'")
            }
            Self::MissingHost => write!(f, "origin has no host"),
            Self::InvalidHost { host } => write!(f, "invalid origin host '{host}'"),
            Self::InvalidPort { port } => write!(f, "invalid origin port '{port}'"),
            Self::NotAnOrigin { input } => {
                write!(f, "'{input}' is a URL, not an origin")
            }
        }
    }
}

impl std::error::Error for OriginError {}

/// A normalized `scheme://host[:port]` origin.
///
/// Hosts are lowercased and default ports are elided, so two origins that a
/// browser would treat as the same compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Origin {
    scheme: Scheme,
    host: String,
    port: Option<u16>,
}

impl Origin {
    /// Parses an origin string such as `https://app.example.com:8443`.
    ///
    /// A single trailing `/` is tolerated; anything else after the authority
    /// is rejected.
    pub fn parse(input: &str) -> Result<Self, OriginError> {
        let trimmed = input.trim();
        let (scheme, rest) = trimmed
            .split_once("://")
            .ok_or_else(|| OriginError::MissingScheme {
                input: trimmed.to_string(),
            })?;
        let scheme: Scheme = scheme.parse()?;

        let authority = rest.strip_suffix('/').unwrap_or(rest);
        if authority.contains(['/', '?', '#', '@']) {
            return Err(OriginError::NotAnOrigin {
                input: trimmed.to_string(),
            });
        }

        let (host, port) = match authority.rsplit_once(':') {
            Some((host, port)) => {
                let port: u16 = port
                    .parse()
                    .ok()
                    .filter(|p| *p != 0)
                    .ok_or_else(|| OriginError::InvalidPort {
                        port: port.to_string(),
                    })?;
                (host, Some(port))
            }
            None => (authority, None),
        };

        Self::from_parts(scheme, host, port)
    }

    /// Builds an origin from a `Host` header value and the request scheme.
    pub fn from_host(scheme: Scheme, host: &str) -> Result<Self, OriginError> {
        Self::parse(&format!("{scheme}://{host}"))
    }

    fn from_parts(scheme: Scheme, host: &str, port: Option<u16>) -> Result<Self, OriginError> {
        if host.is_empty() {
            return Err(OriginError::MissingHost);
        }
        if !host
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '.')
        {
            return Err(OriginError::InvalidHost {
                host: host.to_string(),
            });
        }

        Ok(Self {
            scheme,
            host: host.to_ascii_lowercase(),
            port: port.filter(|p| *p != scheme.default_port()),
        })
    }

    /// Returns the scheme.
    #[must_use]
    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    /// Returns the lowercased host.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns the explicit port, `None` when it is the scheme default.
    #[must_use]
    pub fn port(&self) -> Option<u16> {
        self.port
    }

    /// Returns the effective port.
    #[must_use]
    pub fn port_or_default(&self) -> u16 {
        self.port.unwrap_or_else(|| self.scheme.default_port())
    }

    /// Returns true when the origin is served over TLS.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.scheme == Scheme::Https
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}", self.scheme, self.host)?;
        if let Some(port) = self.port {
            write!(f, ":{port}")?;
        }
        Ok(())
    }
}

impl FromStr for Origin {
    type Err = OriginError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Origin {
    type Error = OriginError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Origin> for String {
    fn from(origin: Origin) -> Self {
        origin.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_browser_origin() {
        let origin = Origin::parse("https://portal.example.com").expect("parse");
        assert_eq!(origin.scheme(), Scheme::Https);
        assert_eq!(origin.host(), "portal.example.com");
        assert_eq!(origin.port(), None);
        assert_eq!(origin.to_string(), "https://portal.example.com");
    }

    #[test]
    fn keeps_non_default_port() {
        let origin = Origin::parse("http://localhost:3000").expect("parse");
        assert_eq!(origin.port(), Some(3000));
        assert_eq!(origin.to_string(), "http://localhost:3000");
    }

    #[test]
    fn elides_default_port_and_lowercases() {
        let origin = Origin::parse("HTTPS://Portal.Example.COM:443/").expect("parse");
        assert_eq!(origin.to_string(), "https://portal.example.com");
        assert_eq!(origin.port_or_default(), 443);
    }

    #[test]
    fn equal_origins_compare_equal() {
        let a = Origin::parse("http://example.com:80").expect("parse");
        let b = Origin::parse("http://EXAMPLE.com").expect("parse");
        assert_eq!(a, b);
    }

    #[test]
    fn rejects_paths_and_queries() {
        for input in [
            "https://example.com/callback",
            "https://example.com?x=1",
            "https://example.com#top",
            "https://user@example.com",
        ] {
            assert!(
                matches!(Origin::parse(input), Err(OriginError::NotAnOrigin { .. })),
                "{input} should be rejected"
            );
        }
    }

    #[test]
    fn rejects_bad_scheme_host_and_port() {
        assert!(matches!(
            Origin::parse("example.com"),
            Err(OriginError::MissingScheme { .. })
        ));
        assert!(matches!(
            Origin::parse("ftp://example.com"),
            Err(OriginError::UnsupportedScheme { .. })
        ));
        assert_eq!(Origin::parse("https://"), Err(OriginError::MissingHost));
        assert!(matches!(
            Origin::parse("https://exa mple.com"),
            Err(OriginError::InvalidHost { .. })
        ));
        assert!(matches!(
            Origin::parse("https://example.com:99999"),
            Err(OriginError::InvalidPort { .. })
        ));
        assert!(matches!(
            Origin::parse("https://example.com:0"),
            Err(OriginError::InvalidPort { .. })
        ));
    }

    #[test]
    fn builds_from_host_header() {
        let origin = Origin::from_host(Scheme::Http, "127.0.0.1:3000").expect("parse");
        assert_eq!(origin.to_string(), "http://127.0.0.1:3000");
        assert!(!origin.is_secure());
    }

    #[test]
    fn serde_uses_string_form() {
        let origin = Origin::parse("https://example.com:8443").expect("parse");
        let json = serde_json::to_string(&origin).expect("serialize");
        assert_eq!(json, "\"https://example.com:8443\"");

        let parsed: Origin = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(parsed, origin);

        assert!(serde_json::from_str::<Origin>("\"https://example.com/path\"").is_err());
    }
}
