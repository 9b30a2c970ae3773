//! User data model.

use std::fmt;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Maximum stored length of an email address.
pub const EMAIL_MAX: usize = 255;
/// Minimum allowed length for a user name.
pub const USER_NAME_MIN: usize = 2;
/// Maximum allowed length for a user name.
pub const USER_NAME_MAX: usize = 100;

/// Validation errors returned by [`NewUser::try_new`] and [`UserChanges::try_new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    /// Email missing or blank.
    EmptyEmail,
    /// Email does not look like `local@domain.tld`.
    InvalidEmail,
    /// Email longer than the column allows.
    EmailTooLong {
        /// Upper bound in characters.
        max: usize,
    },
    /// Name missing or blank.
    EmptyName,
    /// Name shorter than the minimum.
    NameTooShort {
        /// Lower bound in characters.
        min: usize,
    },
    /// Name longer than the maximum.
    NameTooLong {
        /// Upper bound in characters.
        max: usize,
    },
}

impl UserValidationError {
    /// Request field the failure refers to.
    #[must_use]
    pub fn field(&self) -> &'static str {
        match self {
            Self::EmptyEmail | Self::InvalidEmail | Self::EmailTooLong { .. } => "email",
            Self::EmptyName | Self::NameTooShort { .. } | Self::NameTooLong { .. } => "name",
        }
    }

    /// Machine-readable failure code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::EmptyEmail | Self::EmptyName => "required",
            Self::InvalidEmail => "invalid_format",
            Self::EmailTooLong { .. } | Self::NameTooLong { .. } => "too_long",
            Self::NameTooShort { .. } => "too_short",
        }
    }
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyEmail => write!(f, "Email is required"),
            Self::InvalidEmail => write!(f, "Email should be valid"),
            Self::EmailTooLong { max } => write!(f, "Email must be at most {max} characters"),
            Self::EmptyName => write!(f, "Name is required"),
            Self::NameTooShort { .. } | Self::NameTooLong { .. } => write!(
                f,
                "Name must be between {USER_NAME_MIN} and {USER_NAME_MAX} characters"
            ),
        }
    }
}

impl std::error::Error for UserValidationError {}

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        let pattern = r"^[^@\s]+@[^@\s]+\.[^@\s]+$";
        Regex::new(pattern)
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Validated email address.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate and construct an [`EmailAddress`].
    pub fn new(email: impl Into<String>) -> Result<Self, UserValidationError> {
        let email = email.into();
        if email.trim().is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        if email.chars().count() > EMAIL_MAX {
            return Err(UserValidationError::EmailTooLong { max: EMAIL_MAX });
        }
        if !email_regex().is_match(&email) {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self(email))
    }

    /// Borrow the address.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Validated user name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserName(String);

impl UserName {
    /// Validate and construct a [`UserName`].
    pub fn new(name: impl Into<String>) -> Result<Self, UserValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(UserValidationError::EmptyName);
        }
        let length = name.chars().count();
        if length < USER_NAME_MIN {
            return Err(UserValidationError::NameTooShort {
                min: USER_NAME_MIN,
            });
        }
        if length > USER_NAME_MAX {
            return Err(UserValidationError::NameTooLong {
                max: USER_NAME_MAX,
            });
        }
        Ok(Self(name))
    }

    /// Borrow the name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Stored user.
///
/// ## Invariants
/// - `id` is assigned by the store and never changes.
/// - `email` is unique across all users.
/// - `updated_at` is refreshed on every mutation; `created_at` never is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Store-assigned identifier.
    #[schema(example = 1)]
    pub id: i64,
    /// Unique email address.
    #[schema(example = "ann@x.io")]
    pub email: String,
    /// Display name.
    #[schema(example = "Ann")]
    pub name: String,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

/// Validated input for creating a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    email: EmailAddress,
    name: UserName,
}

impl NewUser {
    /// Validate raw request fields.
    ///
    /// # Examples
    /// ```
    /// use playground::domain::NewUser;
    ///
    /// let user = NewUser::try_new("ann@x.io", "Ann").expect("valid user");
    /// assert_eq!(user.email().as_str(), "ann@x.io");
    /// assert!(NewUser::try_new("not-an-email", "Ann").is_err());
    /// ```
    pub fn try_new(
        email: impl Into<String>,
        name: impl Into<String>,
    ) -> Result<Self, UserValidationError> {
        Ok(Self {
            email: EmailAddress::new(email)?,
            name: UserName::new(name)?,
        })
    }

    /// Requested email.
    #[must_use]
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Requested name.
    #[must_use]
    pub fn name(&self) -> &UserName {
        &self.name
    }
}

/// Partial update for a user; absent fields stay unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserChanges {
    email: Option<EmailAddress>,
    name: Option<UserName>,
}

impl UserChanges {
    /// Validate the fields that are present.
    pub fn try_new(
        email: Option<String>,
        name: Option<String>,
    ) -> Result<Self, UserValidationError> {
        Ok(Self {
            email: email.map(EmailAddress::new).transpose()?,
            name: name.map(UserName::new).transpose()?,
        })
    }

    /// New email, if changing.
    #[must_use]
    pub fn email(&self) -> Option<&EmailAddress> {
        self.email.as_ref()
    }

    /// New name, if changing.
    #[must_use]
    pub fn name(&self) -> Option<&UserName> {
        self.name.as_ref()
    }

    /// Apply the present fields to `user` and stamp `now` as the update time.
    pub fn apply_to(&self, user: &mut User, now: DateTime<Utc>) {
        if let Some(email) = &self.email {
            user.email = email.as_str().to_owned();
        }
        if let Some(name) = &self.name {
            user.name = name.as_str().to_owned();
        }
        user.updated_at = now;
    }
}
