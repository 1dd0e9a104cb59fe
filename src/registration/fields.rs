//! Field identifiers, the carrier enumeration and fixed-length digit codes.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::{fmt, str::FromStr};

/// Every editable attribute of the signup draft.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    FullName,
    BirthDate,
    NationalIdTail,
    Carrier,
    PhoneNumber,
    LoginId,
    Password,
    Email,
}

impl Field {
    /// Maximum accepted length for bounded fields, `None` when unbounded.
    #[must_use]
    pub const fn max_len(self) -> Option<usize> {
        match self {
            Self::BirthDate => Some(BIRTH_DATE_LEN),
            Self::NationalIdTail => Some(NATIONAL_ID_TAIL_LEN),
            Self::PhoneNumber => Some(PHONE_NUMBER_LEN),
            _ => None,
        }
    }

    /// Name used by forms and on the wire.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FullName => "userName",
            Self::BirthDate => "birthDate",
            Self::NationalIdTail => "identity",
            Self::Carrier => "telecom",
            Self::PhoneNumber => "phoneNo",
            Self::LoginId => "id",
            Self::Password => "password",
            Self::Email => "email",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown field: {0}")]
pub struct UnknownField(pub String);

impl FromStr for Field {
    type Err = UnknownField;

    /// Accepts both the form names and the snake-case draft attribute names.
    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "userName" | "full_name" => Ok(Self::FullName),
            "birthDate" | "birth_date" => Ok(Self::BirthDate),
            "identity" | "national_id_tail" => Ok(Self::NationalIdTail),
            "telecom" | "carrier" => Ok(Self::Carrier),
            "phoneNo" | "phone_number" => Ok(Self::PhoneNumber),
            "id" | "login_id" => Ok(Self::LoginId),
            "password" => Ok(Self::Password),
            "email" => Ok(Self::Email),
            other => Err(UnknownField(other.to_string())),
        }
    }
}

pub const BIRTH_DATE_LEN: usize = 6;
pub const NATIONAL_ID_TAIL_LEN: usize = 7;
pub const PHONE_NUMBER_LEN: usize = 11;

/// Mobile carrier. The form submits the option index as a string.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Carrier {
    #[default]
    Skt,
    Kt,
    LgU,
    MvnoSkt,
    MvnoKt,
    MvnoLgU,
}

impl Carrier {
    #[must_use]
    pub const fn index(self) -> u8 {
        match self {
            Self::Skt => 0,
            Self::Kt => 1,
            Self::LgU => 2,
            Self::MvnoSkt => 3,
            Self::MvnoKt => 4,
            Self::MvnoLgU => 5,
        }
    }

    #[must_use]
    pub const fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(Self::Skt),
            1 => Some(Self::Kt),
            2 => Some(Self::LgU),
            3 => Some(Self::MvnoSkt),
            4 => Some(Self::MvnoKt),
            5 => Some(Self::MvnoLgU),
            _ => None,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Skt => "SKT",
            Self::Kt => "KT",
            Self::LgU => "LG U+",
            Self::MvnoSkt => "MVNO (SKT)",
            Self::MvnoKt => "MVNO (KT)",
            Self::MvnoLgU => "MVNO (LG U+)",
        }
    }
}

impl fmt::Display for Carrier {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.label())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown carrier: {0}")]
pub struct UnknownCarrier(pub String);

impl FromStr for Carrier {
    type Err = UnknownCarrier;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if let Ok(index) = value.parse::<u8>() {
            return Self::from_index(index).ok_or_else(|| UnknownCarrier(value.to_string()));
        }

        match value.to_lowercase().replace('_', "-").as_str() {
            "skt" => Ok(Self::Skt),
            "kt" => Ok(Self::Kt),
            "lgu" | "lg-u+" | "lgu+" => Ok(Self::LgU),
            "mvno-skt" => Ok(Self::MvnoSkt),
            "mvno-kt" => Ok(Self::MvnoKt),
            "mvno-lgu" | "mvno-lgu+" => Ok(Self::MvnoLgU),
            _ => Err(UnknownCarrier(value.to_string())),
        }
    }
}

impl Serialize for Carrier {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.index().to_string())
    }
}

impl<'de> Deserialize<'de> for Carrier {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        value.parse().map_err(serde::de::Error::custom)
    }
}

/// Digit code that never holds more than `N` characters.
///
/// Writes longer than `N` are refused and leave the previous value in place.
/// A code is complete once it holds exactly `N` ASCII digits.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct DigitField<const N: usize>(String);

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
#[error("value has {len} characters, at most {max} allowed")]
pub struct TooLong {
    pub len: usize,
    pub max: usize,
}

impl<const N: usize> DigitField<N> {
    #[must_use]
    pub fn new() -> Self {
        Self(String::new())
    }

    /// Replaces the held value.
    ///
    /// # Errors
    /// Returns `TooLong` when `value` exceeds `N` characters; the field is unchanged.
    pub fn replace(&mut self, value: String) -> Result<(), TooLong> {
        let len = value.chars().count();
        if len > N {
            return Err(TooLong { len, max: N });
        }
        self.0 = value;
        Ok(())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.0.len() == N && self.0.bytes().all(|b| b.is_ascii_digit())
    }
}

impl<const N: usize> fmt::Debug for DigitField<N> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_tuple("DigitField").field(&self.0).finish()
    }
}

impl<const N: usize> TryFrom<&str> for DigitField<N> {
    type Error = TooLong;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let mut field = Self::new();
        field.replace(value.to_string())?;
        Ok(field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_names_round_trip() {
        for field in [
            Field::FullName,
            Field::BirthDate,
            Field::NationalIdTail,
            Field::Carrier,
            Field::PhoneNumber,
            Field::LoginId,
            Field::Password,
            Field::Email,
        ] {
            assert_eq!(field.as_str().parse::<Field>().ok(), Some(field));
        }
        assert!("nickname".parse::<Field>().is_err());
    }

    #[test]
    fn only_code_fields_are_bounded() {
        assert_eq!(Field::BirthDate.max_len(), Some(6));
        assert_eq!(Field::NationalIdTail.max_len(), Some(7));
        assert_eq!(Field::PhoneNumber.max_len(), Some(11));
        assert_eq!(Field::Email.max_len(), None);
        assert_eq!(Field::Carrier.max_len(), None);
    }

    #[test]
    fn carrier_parses_names_and_indices() {
        assert_eq!("0".parse::<Carrier>().ok(), Some(Carrier::Skt));
        assert_eq!("5".parse::<Carrier>().ok(), Some(Carrier::MvnoLgU));
        assert_eq!("mvno_kt".parse::<Carrier>().ok(), Some(Carrier::MvnoKt));
        assert_eq!("LGU".parse::<Carrier>().ok(), Some(Carrier::LgU));
        assert!("6".parse::<Carrier>().is_err());
        assert!("vodafone".parse::<Carrier>().is_err());
    }

    #[test]
    fn carrier_serializes_as_form_index() {
        let json = serde_json::to_string(&Carrier::MvnoSkt).ok();
        assert_eq!(json.as_deref(), Some("\"3\""));
        assert_eq!(Carrier::default(), Carrier::Skt);
    }

    #[test]
    fn digit_field_refuses_long_values() {
        let mut field = DigitField::<6>::new();
        assert!(field.replace("9901".to_string()).is_ok());
        assert_eq!(
            field.replace("99010112".to_string()),
            Err(TooLong { len: 8, max: 6 })
        );
        assert_eq!(field.as_str(), "9901");
        assert!(!field.is_complete());
    }

    #[test]
    fn digit_field_complete_requires_digits() {
        let complete = DigitField::<6>::try_from("990101");
        assert!(complete.is_ok_and(|f| f.is_complete()));

        let letters = DigitField::<6>::try_from("99o101");
        assert!(letters.is_ok_and(|f| !f.is_complete()));
    }
}
