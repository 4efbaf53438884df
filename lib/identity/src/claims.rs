//! Claims extracted from the identity provider's ID token.

use serde::{Deserialize, Serialize};

/// Identity claims used to build a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityClaims {
    /// The subject claim (unique user identifier from the provider).
    pub subject: String,
    /// The issuer URL.
    pub issuer: String,
    /// Email address.
    pub email: Option<String>,
    /// Full name, falling back to the preferred username or nickname.
    pub name: Option<String>,
    /// Profile picture URL.
    pub picture: Option<String>,
}

impl IdentityClaims {
    /// Creates a new set of claims with only the required fields.
    #[must_use]
    pub fn new(subject: String, issuer: String) -> Self {
        Self {
            subject,
            issuer,
            email: None,
            name: None,
            picture: None,
        }
    }

    /// Sets the email claim.
    #[must_use]
    pub fn with_email(mut self, email: Option<String>) -> Self {
        self.email = email;
        self
    }

    /// Sets the name claim.
    #[must_use]
    pub fn with_name(mut self, name: Option<String>) -> Self {
        self.name = name;
        self
    }

    /// Sets the picture claim.
    #[must_use]
    pub fn with_picture(mut self, picture: Option<String>) -> Self {
        self.picture = picture;
        self
    }

    /// Returns the best human-readable label: name, then email, then subject.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .or(self.email.as_deref())
            .unwrap_or(&self.subject)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_prefers_name_then_email() {
        let claims = IdentityClaims::new("auth0|1".to_string(), "https://t/".to_string());
        assert_eq!(claims.display_name(), "auth0|1");

        let claims = claims.with_email(Some("kim@example.com".to_string()));
        assert_eq!(claims.display_name(), "kim@example.com");

        let claims = claims.with_name(Some("Kim".to_string()));
        assert_eq!(claims.display_name(), "Kim");
    }
}
