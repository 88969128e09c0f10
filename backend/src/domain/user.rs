//! User identity records.
//!
//! Users are created the first time someone completes a login and are keyed
//! by the email address reported by the identity provider. The application
//! never updates or deletes them.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Validation errors raised while constructing user values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    /// Email was blank once trimmed.
    #[error("email must not be empty")]
    EmptyEmail,
    /// Email lacks a local part or a domain.
    #[error("email must look like local@domain")]
    MalformedEmail,
    /// Email exceeds the maximum length.
    #[error("email must be at most {max} characters")]
    EmailTooLong {
        /// Maximum permitted length in characters.
        max: usize,
    },
    /// Display name exceeds the maximum length.
    #[error("display name must be at most {max} characters")]
    DisplayNameTooLong {
        /// Maximum permitted length in characters.
        max: usize,
    },
}

/// Database-assigned user identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(i32);

impl UserId {
    /// Wrap a raw database key.
    #[must_use]
    pub const fn new(raw: i32) -> Self {
        Self(raw)
    }

    /// Raw database key.
    #[must_use]
    pub const fn get(self) -> i32 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Maximum email length; matches the `users.email` column.
pub const EMAIL_MAX: usize = 250;

/// Email address used as the user identity key.
///
/// ## Invariants
/// - Trimmed, non-empty, at most [`EMAIL_MAX`] characters.
/// - Contains exactly one `@` with non-empty text on both sides.
///
/// # Examples
/// ```
/// use catalog::domain::Email;
///
/// let email = Email::new(" ada@example.org ").expect("valid email");
/// assert_eq!(email.as_ref(), "ada@example.org");
/// assert!(Email::new("nobody").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Validate and construct an email address.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        if trimmed.chars().count() > EMAIL_MAX {
            return Err(UserValidationError::EmailTooLong { max: EMAIL_MAX });
        }
        match trimmed.split_once('@') {
            Some((local, domain))
                if !local.is_empty() && !domain.is_empty() && !domain.contains('@') =>
            {
                Ok(Self(trimmed.to_owned()))
            }
            _ => Err(UserValidationError::MalformedEmail),
        }
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Email> for String {
    fn from(value: Email) -> Self {
        value.0
    }
}

impl TryFrom<String> for Email {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Maximum display name length accepted from the identity provider.
pub const DISPLAY_NAME_MAX: usize = 128;

/// Human readable name reported by the identity provider.
///
/// Providers may omit the name, so blank values are allowed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DisplayName(String);

impl DisplayName {
    /// Validate and construct a display name.
    pub fn new(raw: impl Into<String>) -> Result<Self, UserValidationError> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.chars().count() > DISPLAY_NAME_MAX {
            return Err(UserValidationError::DisplayNameTooLong {
                max: DISPLAY_NAME_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for DisplayName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<DisplayName> for String {
    fn from(value: DisplayName) -> Self {
        value.0
    }
}

impl TryFrom<String> for DisplayName {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Values needed to insert a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    /// Identity key.
    pub email: Email,
    /// Provider-reported name.
    pub name: DisplayName,
}

/// Persisted user record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    email: Email,
    name: DisplayName,
}

impl User {
    /// Assemble a user from already-validated parts.
    #[must_use]
    pub fn new(id: UserId, email: Email, name: DisplayName) -> Self {
        Self { id, email, name }
    }

    /// Database identifier.
    pub fn id(&self) -> UserId {
        self.id
    }

    /// Identity key.
    pub fn email(&self) -> &Email {
        &self.email
    }

    /// Provider-reported name.
    pub fn name(&self) -> &DisplayName {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", UserValidationError::EmptyEmail)]
    #[case("   ", UserValidationError::EmptyEmail)]
    #[case("ada", UserValidationError::MalformedEmail)]
    #[case("@example.org", UserValidationError::MalformedEmail)]
    #[case("ada@", UserValidationError::MalformedEmail)]
    #[case("ada@x@y", UserValidationError::MalformedEmail)]
    fn email_rejects_invalid_input(#[case] raw: &str, #[case] expected: UserValidationError) {
        assert_eq!(Email::new(raw), Err(expected));
    }

    #[rstest]
    fn email_caps_length_at_column_width() {
        let domain = "@example.org";
        let fits = format!("{}{domain}", "a".repeat(EMAIL_MAX - domain.len()));
        assert!(Email::new(&fits).is_ok());
        let long = format!("a{fits}");
        assert_eq!(
            Email::new(long),
            Err(UserValidationError::EmailTooLong { max: EMAIL_MAX })
        );
    }

    #[rstest]
    fn display_name_allows_blank_but_caps_length() {
        assert_eq!(DisplayName::new("  ").expect("blank allowed").as_ref(), "");
        let long = "a".repeat(DISPLAY_NAME_MAX + 1);
        assert_eq!(
            DisplayName::new(long),
            Err(UserValidationError::DisplayNameTooLong {
                max: DISPLAY_NAME_MAX
            })
        );
    }

    #[rstest]
    fn email_deserialisation_validates() {
        let ok: Email = serde_json::from_str("\"grace@example.org\"").expect("valid");
        assert_eq!(ok.as_ref(), "grace@example.org");
        assert!(serde_json::from_str::<Email>("\"grace\"").is_err());
    }
}
