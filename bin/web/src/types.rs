//! Shared types used across server functions and UI components.

use serde::{Deserialize, Serialize};
use std::fmt;
use user_portal_identity::Session;

/// Longest accepted display name, in characters.
pub const MAX_NAME_CHARS: usize = 100;

/// User info for display in the UI.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    pub subject: String,
    pub display_name: Option<String>,
    pub email: Option<String>,
    pub picture: Option<String>,
}

impl UserInfo {
    /// Returns the label shown in the header.
    #[must_use]
    pub fn label(&self) -> &str {
        self.display_name
            .as_deref()
            .or(self.email.as_deref())
            .unwrap_or("User")
    }
}

impl From<&Session> for UserInfo {
    /// The edited profile wins over the provider's claims.
    fn from(session: &Session) -> Self {
        let claims = session.claims();
        let profile = session.profile();
        Self {
            subject: claims.subject.clone(),
            display_name: profile.display_name.clone().or_else(|| claims.name.clone()),
            email: profile.email.clone().or_else(|| claims.email.clone()),
            picture: claims.picture.clone(),
        }
    }
}

/// Acknowledgement returned for a submitted user entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryReceipt {
    pub id: String,
    pub name: String,
    pub email: String,
}

/// Form field identifiers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Field {
    Name,
    Email,
}

impl Field {
    /// Returns the form input name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
        }
    }
}

/// A validation failure on a single field.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: Field,
    pub message: String,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field.as_str(), self.message)
    }
}

/// Name and email as entered in the user entry and update forms.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserForm {
    pub name: String,
    pub email: String,
}

impl UserForm {
    /// Creates a form from raw input.
    #[must_use]
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }

    /// Validates the form and returns it with surrounding whitespace trimmed.
    ///
    /// All field errors are collected, not just the first.
    pub fn validate(&self) -> Result<UserForm, Vec<FieldError>> {
        let name = self.name.trim();
        let email = self.email.trim();
        let mut errors = Vec::new();

        if name.is_empty() {
            errors.push(FieldError {
                field: Field::Name,
                message: "Name is required.".to_string(),
            });
        } else if name.chars().count() > MAX_NAME_CHARS {
            errors.push(FieldError {
                field: Field::Name,
                message: format!("Name must be at most {MAX_NAME_CHARS} characters."),
            });
        }

        if email.is_empty() {
            errors.push(FieldError {
                field: Field::Email,
                message: "Email is required.".to_string(),
            });
        } else if !is_plausible_email(email) {
            errors.push(FieldError {
                field: Field::Email,
                message: "Enter a valid email address.".to_string(),
            });
        }

        if errors.is_empty() {
            Ok(UserForm::new(name, email))
        } else {
            Err(errors)
        }
    }
}

fn is_plausible_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !email.chars().any(char::is_whitespace)
}

/// Returns the message for `field`, if any error concerns it.
#[must_use]
pub fn error_for(errors: &[FieldError], field: Field) -> Option<String> {
    errors
        .iter()
        .find(|e| e.field == field)
        .map(|e| e.message.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_form_is_trimmed() {
        let form = UserForm::new("  Ada Lovelace ", " ada@example.com\n");
        let valid = form.validate().expect("valid");
        assert_eq!(valid, UserForm::new("Ada Lovelace", "ada@example.com"));
    }

    #[test]
    fn empty_form_reports_both_fields() {
        let errors = UserForm::default().validate().expect_err("invalid");
        let fields: Vec<Field> = errors.iter().map(|e| e.field).collect();
        assert_eq!(fields, vec![Field::Name, Field::Email]);
    }

    #[test]
    fn rejects_overlong_name() {
        let form = UserForm::new("x".repeat(MAX_NAME_CHARS + 1), "a@b.co");
        let errors = form.validate().expect_err("invalid");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, Field::Name);

        let form = UserForm::new("é".repeat(MAX_NAME_CHARS), "a@b.co");
        assert!(form.validate().is_ok());
    }

    #[test]
    fn rejects_implausible_emails() {
        for email in [
            "plain",
            "@example.com",
            "a@b@example.com",
            "a@localhost",
            "a@.example.com",
            "a@example.com.",
            "a b@example.com",
        ] {
            let errors = UserForm::new("Ada", email).validate().expect_err(email);
            assert!(error_for(&errors, Field::Email).is_some(), "{email}");
            assert!(error_for(&errors, Field::Name).is_none());
        }
    }

    #[test]
    fn user_info_label_falls_back() {
        let mut info = UserInfo {
            subject: "auth0|1".to_string(),
            display_name: None,
            email: None,
            picture: None,
        };
        assert_eq!(info.label(), "User");

        info.email = Some("kim@example.com".to_string());
        assert_eq!(info.label(), "kim@example.com");

        info.display_name = Some("Kim".to_string());
        assert_eq!(info.label(), "Kim");
    }

    #[test]
    fn user_info_prefers_edited_profile() {
        use chrono::Duration;
        use user_portal_core::SessionId;
        use user_portal_identity::{IdentityClaims, UserProfile};

        let claims = IdentityClaims::new("auth0|7".to_string(), "https://t/".to_string())
            .with_name(Some("Provider Name".to_string()))
            .with_email(Some("p@example.com".to_string()));
        let mut session = Session::new(SessionId::new(), claims, Duration::minutes(5));

        let info = UserInfo::from(&session);
        assert_eq!(info.display_name.as_deref(), Some("Provider Name"));

        session.set_profile(UserProfile {
            display_name: Some("Edited".to_string()),
            email: None,
        });
        let info = UserInfo::from(&session);
        assert_eq!(info.subject, "auth0|7");
        assert_eq!(info.display_name.as_deref(), Some("Edited"));
        assert_eq!(info.email.as_deref(), Some("p@example.com"));
    }
}
