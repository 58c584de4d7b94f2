use std::sync::LazyLock;

use nutype::nutype;
use regex::Regex;
use serde::{Deserialize, Serialize};

pub static CONTACT_EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i-u)^[A-Z0-9._%+-]+@([A-Z0-9-]+\.)+[A-Z]{2,}$").unwrap()
});

/// The raw field values of the contact form, exactly as typed by the visitor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactFormInput {
    pub name: String,
    pub email: String,
    pub message: String,
}

/// A contact form whose fields all passed validation.
///
/// The only way to obtain one from user input is [`ContactFormInput::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactSubmission {
    pub name: ContactName,
    pub email: ContactEmail,
    pub message: ContactMessage,
}

#[nutype(
    validate(len_char_min = 1, len_char_max = 100),
    derive(Debug, Clone, PartialEq, Eq, TryFrom, Deref, Serialize, Deserialize)
)]
pub struct ContactName(String);

impl ContactName {
    pub const MAX_LEN: usize = 100;
}

#[nutype(
    validate(regex = CONTACT_EMAIL_REGEX),
    derive(Debug, Clone, PartialEq, Eq, TryFrom, Deref, Serialize, Deserialize)
)]
pub struct ContactEmail(String);

#[nutype(
    validate(len_char_min = 1, len_char_max = 2000),
    derive(Debug, Clone, PartialEq, Eq, TryFrom, Deref, Serialize, Deserialize)
)]
pub struct ContactMessage(String);

impl ContactMessage {
    pub const MAX_LEN: usize = 2000;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactField {
    Name,
    Email,
    Message,
}

impl ContactField {
    pub const ALL: [Self; 3] = [Self::Name, Self::Email, Self::Message];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Message => "message",
        }
    }

    /// Maximum number of characters accepted for this field, if limited.
    pub fn max_len(self) -> Option<usize> {
        match self {
            Self::Name => Some(ContactName::MAX_LEN),
            Self::Email => None,
            Self::Message => Some(ContactMessage::MAX_LEN),
        }
    }
}

/// Reason code for a rejected form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactFieldError {
    RequiredField,
    MaxLengthExceeded,
    PatternMismatch,
}

impl ContactFieldError {
    pub fn code(self) -> &'static str {
        match self {
            Self::RequiredField => "required_field",
            Self::MaxLengthExceeded => "max_length_exceeded",
            Self::PatternMismatch => "pattern_mismatch",
        }
    }

    /// The inline message shown next to `field`.
    pub fn describe(self, field: ContactField) -> String {
        match (self, field.max_len()) {
            (Self::RequiredField, _) => "This field is required.".into(),
            (Self::MaxLengthExceeded, Some(max)) => format!("Max Length is {max} characters."),
            (Self::MaxLengthExceeded, None) => "Value is too long.".into(),
            (Self::PatternMismatch, _) => "Invalid email address.".into(),
        }
    }
}

/// Per-field validation result. A field is valid if its entry is `None`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContactFormErrors {
    pub name: Option<ContactFieldError>,
    pub email: Option<ContactFieldError>,
    pub message: Option<ContactFieldError>,
}

impl ContactFormErrors {
    pub fn get(&self, field: ContactField) -> Option<ContactFieldError> {
        match field {
            ContactField::Name => self.name,
            ContactField::Email => self.email,
            ContactField::Message => self.message,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ContactField, ContactFieldError)> + '_ {
        ContactField::ALL
            .into_iter()
            .filter_map(|field| self.get(field).map(|err| (field, err)))
    }
}

impl ContactFormInput {
    /// Checks every field and returns either the validated submission or the
    /// reason each invalid field was rejected.
    pub fn validate(&self) -> Result<ContactSubmission, ContactFormErrors> {
        let name = check(
            &self.name,
            |s| ContactName::try_new(s),
            ContactFieldError::MaxLengthExceeded,
        );
        let email = check(
            &self.email,
            |s| ContactEmail::try_new(s),
            ContactFieldError::PatternMismatch,
        );
        let message = check(
            &self.message,
            |s| ContactMessage::try_new(s),
            ContactFieldError::MaxLengthExceeded,
        );

        match (name, email, message) {
            (Ok(name), Ok(email), Ok(message)) => Ok(ContactSubmission {
                name,
                email,
                message,
            }),
            (name, email, message) => Err(ContactFormErrors {
                name: name.err(),
                email: email.err(),
                message: message.err(),
            }),
        }
    }
}

impl From<ContactSubmission> for ContactFormInput {
    fn from(value: ContactSubmission) -> Self {
        Self {
            name: value.name.into_inner(),
            email: value.email.into_inner(),
            message: value.message.into_inner(),
        }
    }
}

fn check<T, E>(
    value: &str,
    parse: impl FnOnce(String) -> Result<T, E>,
    violation: ContactFieldError,
) -> Result<T, ContactFieldError> {
    if value.is_empty() {
        return Err(ContactFieldError::RequiredField);
    }
    parse(value.to_owned()).map_err(|_| violation)
}
