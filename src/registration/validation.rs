//! Pure validation of a draft into a per-field error set.
//!
//! The error set is always derived in full from the draft; form validity is
//! defined as "no field has an error" so the two can never disagree.

use super::{
    fields::Field,
    store::RegistrationDraft,
};
use regex::Regex;
use secrecy::ExposeSecret;
use std::{collections::BTreeMap, fmt};

/// Email domains the identity service accepts.
pub const ALLOWED_EMAIL_DOMAINS: [&str; 13] = [
    "naver.com",
    "hanmail.net",
    "daum.net",
    "nate.com",
    "kcredit.or.kr",
    "korea.kr",
    "yahoo.com",
    "goe.go.kr",
    "chol.com",
    "sen.go.kr",
    "gyo6.net",
    "jnu.ac.kr",
    "kakao.com",
];

/// Symbols of which a password needs at least one.
pub const PASSWORD_SYMBOLS: &str = "!@#$%^&*?_~";
pub const MIN_PASSWORD_LENGTH: usize = 9;
pub const MAX_PASSWORD_LENGTH: usize = 20;

/// Fields that carry a validation rule, in display order.
pub const VALIDATED_FIELDS: [Field; 7] = [
    Field::FullName,
    Field::NationalIdTail,
    Field::BirthDate,
    Field::PhoneNumber,
    Field::LoginId,
    Field::Email,
    Field::Password,
];

/// A violated rule. `Display` renders the user-facing message.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldError {
    MissingName,
    NationalIdTail,
    BirthDate,
    PhoneNumber,
    LoginId,
    EmailDomain,
    Password,
}

impl FieldError {
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::MissingName => "Enter your name.",
            Self::NationalIdTail => "Enter the last 7 digits of your resident registration number.",
            Self::BirthDate => "Enter the first 6 digits of your resident registration number.",
            Self::PhoneNumber => "Enter your 11-digit phone number.",
            Self::LoginId => {
                "ID must start with a letter and be 6 to 12 letters or digits."
            }
            Self::EmailDomain => "Only email addresses from allowed domains can be used.",
            Self::Password => {
                "Password must be 9 to 20 characters with letters, digits and symbols."
            }
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.message())
    }
}

/// Per-field validation outcome. A field without an entry is valid.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: BTreeMap<Field, FieldError>,
}

impl ValidationErrors {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    #[must_use]
    pub fn get(&self, field: Field) -> Option<FieldError> {
        self.errors.get(&field).copied()
    }

    /// Message for `field`, empty when the field is valid.
    #[must_use]
    pub fn message(&self, field: Field) -> &'static str {
        self.get(field).map_or("", FieldError::message)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, FieldError)> + '_ {
        self.errors.iter().map(|(field, error)| (*field, *error))
    }

    fn check(&mut self, field: Field, valid: bool, error: FieldError) {
        if !valid {
            self.errors.insert(field, error);
        }
    }
}

/// Recomputes the full error set for `draft`.
#[must_use]
pub fn validate(draft: &RegistrationDraft) -> ValidationErrors {
    let mut errors = ValidationErrors::default();

    errors.check(
        Field::FullName,
        !draft.full_name().is_empty(),
        FieldError::MissingName,
    );
    errors.check(
        Field::NationalIdTail,
        draft.national_id_tail().is_complete(),
        FieldError::NationalIdTail,
    );
    errors.check(
        Field::BirthDate,
        draft.birth_date().is_complete(),
        FieldError::BirthDate,
    );
    errors.check(
        Field::PhoneNumber,
        draft.phone_number().is_complete(),
        FieldError::PhoneNumber,
    );
    errors.check(
        Field::LoginId,
        valid_login_id(draft.login_id()),
        FieldError::LoginId,
    );
    errors.check(Field::Email, valid_email(draft.email()), FieldError::EmailDomain);
    errors.check(
        Field::Password,
        valid_password(draft.password().expose_secret()),
        FieldError::Password,
    );

    errors
}

#[must_use]
pub fn is_form_valid(draft: &RegistrationDraft) -> bool {
    validate(draft).is_empty()
}

/// Letter first, then 5 to 11 letters or digits.
#[must_use]
pub fn valid_login_id(login_id: &str) -> bool {
    Regex::new(r"^[A-Za-z][A-Za-z0-9]{5,11}$").map_or(false, |re| re.is_match(login_id))
}

/// Non-empty and the part after the first `@` is an allowed domain.
#[must_use]
pub fn valid_email(email: &str) -> bool {
    if email.is_empty() {
        return false;
    }

    email
        .split('@')
        .nth(1)
        .is_some_and(|domain| ALLOWED_EMAIL_DOMAINS.contains(&domain))
}

/// 9 to 20 characters with at least one ASCII letter, one ASCII digit and
/// one symbol from [`PASSWORD_SYMBOLS`]. Line terminators are never allowed.
#[must_use]
pub fn valid_password(password: &str) -> bool {
    let len = password.chars().count();
    if !(MIN_PASSWORD_LENGTH..=MAX_PASSWORD_LENGTH).contains(&len) {
        return false;
    }

    if password
        .chars()
        .any(|c| matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}'))
    {
        return false;
    }

    password.chars().any(|c| c.is_ascii_alphabetic())
        && password.chars().any(|c| c.is_ascii_digit())
        && password.chars().any(|c| PASSWORD_SYMBOLS.contains(c))
}
