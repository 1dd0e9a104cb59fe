//! Registration state store: the single owner of the in-progress draft and
//! the phase flags. It never computes validity; callers recompute the error
//! set after every applied update.

use super::fields::{
    Carrier, DigitField, Field, TooLong, BIRTH_DATE_LEN, NATIONAL_ID_TAIL_LEN, PHONE_NUMBER_LEN,
};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};

/// Server-issued data required to start the second verification step.
/// Opaque to this crate and forwarded unchanged.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SecondPhasePayload(pub serde_json::Value);

impl SecondPhasePayload {
    #[must_use]
    pub fn as_value(&self) -> &serde_json::Value {
        &self.0
    }
}

/// In-progress signup record.
#[derive(Clone, Default)]
pub struct RegistrationDraft {
    full_name: String,
    birth_date: DigitField<BIRTH_DATE_LEN>,
    national_id_tail: DigitField<NATIONAL_ID_TAIL_LEN>,
    carrier: Carrier,
    phone_number: DigitField<PHONE_NUMBER_LEN>,
    login_id: String,
    password: SecretString,
    email: String,
}

impl RegistrationDraft {
    #[must_use]
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    #[must_use]
    pub fn birth_date(&self) -> &DigitField<BIRTH_DATE_LEN> {
        &self.birth_date
    }

    #[must_use]
    pub fn national_id_tail(&self) -> &DigitField<NATIONAL_ID_TAIL_LEN> {
        &self.national_id_tail
    }

    #[must_use]
    pub fn carrier(&self) -> Carrier {
        self.carrier
    }

    #[must_use]
    pub fn phone_number(&self) -> &DigitField<PHONE_NUMBER_LEN> {
        &self.phone_number
    }

    #[must_use]
    pub fn login_id(&self) -> &str {
        &self.login_id
    }

    #[must_use]
    pub fn password(&self) -> &SecretString {
        &self.password
    }

    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }
}

impl fmt::Debug for RegistrationDraft {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("RegistrationDraft")
            .field("full_name", &self.full_name)
            .field("birth_date", &self.birth_date)
            .field("national_id_tail", &"[REDACTED]")
            .field("carrier", &self.carrier)
            .field("phone_number", &self.phone_number)
            .field("login_id", &self.login_id)
            .field("password", &self.password)
            .field("email", &self.email)
            .finish()
    }
}

/// A single structural replacement of one draft attribute.
#[derive(Clone)]
pub enum StoreUpdate {
    FullName(String),
    BirthDate(String),
    NationalIdTail(SecretString),
    Carrier(Carrier),
    PhoneNumber(String),
    LoginId(String),
    Password(SecretString),
    Email(String),
}

impl StoreUpdate {
    #[must_use]
    pub const fn field(&self) -> Field {
        match self {
            Self::FullName(_) => Field::FullName,
            Self::BirthDate(_) => Field::BirthDate,
            Self::NationalIdTail(_) => Field::NationalIdTail,
            Self::Carrier(_) => Field::Carrier,
            Self::PhoneNumber(_) => Field::PhoneNumber,
            Self::LoginId(_) => Field::LoginId,
            Self::Password(_) => Field::Password,
            Self::Email(_) => Field::Email,
        }
    }
}

impl fmt::Debug for StoreUpdate {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NationalIdTail(_) | Self::Password(_) => {
                write!(formatter, "StoreUpdate({}: [REDACTED])", self.field())
            }
            Self::FullName(v)
            | Self::BirthDate(v)
            | Self::PhoneNumber(v)
            | Self::LoginId(v)
            | Self::Email(v) => write!(formatter, "StoreUpdate({}: {v:?})", self.field()),
            Self::Carrier(c) => write!(formatter, "StoreUpdate({}: {c:?})", self.field()),
        }
    }
}

#[derive(Clone, Debug, Default)]
enum Phase {
    #[default]
    Pending,
    FirstCompleted(SecondPhasePayload),
}

/// Owns the draft for one signup session.
#[derive(Debug, Default)]
pub struct RegistrationStore {
    draft: RegistrationDraft,
    phase: Phase,
    revision: u64,
}

impl RegistrationStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn draft(&self) -> &RegistrationDraft {
        &self.draft
    }

    /// Monotonic counter bumped by every applied draft update.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    #[must_use]
    pub fn first_phase_completed(&self) -> bool {
        matches!(self.phase, Phase::FirstCompleted(_))
    }

    #[must_use]
    pub fn second_phase_payload(&self) -> Option<&SecondPhasePayload> {
        match &self.phase {
            Phase::FirstCompleted(payload) => Some(payload),
            Phase::Pending => None,
        }
    }

    /// Applies one update message.
    ///
    /// # Errors
    /// Returns `TooLong` for bounded fields when the value exceeds the bound;
    /// the draft keeps its prior value.
    pub fn apply(&mut self, update: StoreUpdate) -> Result<(), TooLong> {
        debug!(?update, "applying draft update");
        let draft = &mut self.draft;
        match update {
            StoreUpdate::FullName(value) => draft.full_name = value,
            StoreUpdate::BirthDate(value) => draft.birth_date.replace(value)?,
            StoreUpdate::NationalIdTail(value) => draft
                .national_id_tail
                .replace(value.expose_secret().to_string())?,
            StoreUpdate::Carrier(value) => draft.carrier = value,
            StoreUpdate::PhoneNumber(value) => draft.phone_number.replace(value)?,
            StoreUpdate::LoginId(value) => draft.login_id = value,
            StoreUpdate::Password(value) => draft.password = value,
            StoreUpdate::Email(value) => draft.email = value,
        }
        self.revision += 1;
        Ok(())
    }

    pub fn set_full_name(&mut self, value: impl Into<String>) {
        let _ = self.apply(StoreUpdate::FullName(value.into()));
    }

    /// # Errors
    /// Returns `TooLong` when `value` exceeds six characters.
    pub fn set_birth_date(&mut self, value: impl Into<String>) -> Result<(), TooLong> {
        self.apply(StoreUpdate::BirthDate(value.into()))
    }

    /// # Errors
    /// Returns `TooLong` when `value` exceeds seven characters.
    pub fn set_national_id_tail(&mut self, value: SecretString) -> Result<(), TooLong> {
        self.apply(StoreUpdate::NationalIdTail(value))
    }

    pub fn set_carrier(&mut self, value: Carrier) {
        let _ = self.apply(StoreUpdate::Carrier(value));
    }

    /// # Errors
    /// Returns `TooLong` when `value` exceeds eleven characters.
    pub fn set_phone_number(&mut self, value: impl Into<String>) -> Result<(), TooLong> {
        self.apply(StoreUpdate::PhoneNumber(value.into()))
    }

    pub fn set_login_id(&mut self, value: impl Into<String>) {
        let _ = self.apply(StoreUpdate::LoginId(value.into()));
    }

    pub fn set_password(&mut self, value: SecretString) {
        let _ = self.apply(StoreUpdate::Password(value));
    }

    pub fn set_email(&mut self, value: impl Into<String>) {
        let _ = self.apply(StoreUpdate::Email(value.into()));
    }

    /// Records a successful phase-one submission together with its payload.
    /// Returns `false` and changes nothing when phase one was already completed.
    pub fn complete_first_phase(&mut self, payload: SecondPhasePayload) -> bool {
        if self.first_phase_completed() {
            warn!("first phase already completed, ignoring payload");
            return false;
        }
        self.phase = Phase::FirstCompleted(payload);
        true
    }

    /// Replaces everything with a fresh empty draft.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
