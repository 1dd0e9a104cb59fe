//! Request and response payloads for the identity service. Signup requests
//! carry the national ID tail and password, so they must never be logged.

use crate::registration::{fields::Carrier, store::RegistrationDraft, store::SecondPhasePayload};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Phase-one body for `POST /auth/sign-up`.
#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpRequest {
    pub user_name: String,
    #[serde(serialize_with = "expose")]
    pub identity: SecretString,
    pub birth_date: String,
    pub telecom: Carrier,
    pub phone_no: String,
    pub id: String,
    #[serde(serialize_with = "expose")]
    pub password: SecretString,
    pub email: String,
}

fn expose<S: Serializer>(secret: &SecretString, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(secret.expose_secret())
}

impl From<&RegistrationDraft> for SignUpRequest {
    fn from(draft: &RegistrationDraft) -> Self {
        Self {
            user_name: draft.full_name().to_string(),
            identity: SecretString::from(draft.national_id_tail().as_str().to_string()),
            birth_date: draft.birth_date().as_str().to_string(),
            telecom: draft.carrier(),
            phone_no: draft.phone_number().as_str().to_string(),
            id: draft.login_id().to_string(),
            password: draft.password().clone(),
            email: draft.email().to_string(),
        }
    }
}

impl fmt::Debug for SignUpRequest {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("SignUpRequest")
            .field("user_name", &self.user_name)
            .field("identity", &self.identity)
            .field("birth_date", &self.birth_date)
            .field("telecom", &self.telecom)
            .field("phone_no", &self.phone_no)
            .field("id", &self.id)
            .field("password", &self.password)
            .field("email", &self.email)
            .finish()
    }
}

/// 2xx phase-one answer. `data` is the two-way info for phase two; without it
/// the body is an application-level failure carrying `code`/`message`.
#[derive(Clone, Debug, Deserialize)]
pub struct SignUpResponse {
    #[serde(default)]
    pub data: Option<SecondPhasePayload>,
    #[serde(default)]
    pub code: Option<i64>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Structured failure body shared by both endpoints.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}

/// Envelope of `GET /api/v1/contract`. `code == 200` signals success.
#[derive(Clone, Debug, Deserialize)]
pub struct ContractsResponse {
    pub code: i64,
    #[serde(default)]
    pub data: Option<Vec<Contract>>,
    #[serde(default)]
    pub message: Option<String>,
}

/// One linked insurance contract. Unknown fields are kept in `extra`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contract {
    #[serde(default, deserialize_with = "null_as_default")]
    pub res_company_nm: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub insurance_nm: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_dental_insurance: bool,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

// `null` reads as the default, like a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InsuranceKind {
    Dental,
    /// Actual-loss medical indemnity.
    Indemnity,
}

impl fmt::Display for InsuranceKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dental => formatter.write_str("dental"),
            Self::Indemnity => formatter.write_str("indemnity"),
        }
    }
}

impl Contract {
    #[must_use]
    pub fn kind(&self) -> InsuranceKind {
        if self.is_dental_insurance {
            InsuranceKind::Dental
        } else {
            InsuranceKind::Indemnity
        }
    }
}

impl fmt::Display for Contract {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            formatter,
            "{}: {} ({})",
            self.res_company_nm,
            self.insurance_nm,
            self.kind()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registration::store::RegistrationStore;
    use serde_json::json;

    #[test]
    fn sign_up_request_uses_wire_names() -> Result<(), serde_json::Error> {
        let mut store = RegistrationStore::new();
        store.set_full_name("HongGildong");
        assert!(store.set_birth_date("990101").is_ok());
        assert!(store
            .set_national_id_tail(SecretString::from("1234567".to_string()))
            .is_ok());
        store.set_carrier(Carrier::Kt);
        assert!(store.set_phone_number("01012345678").is_ok());
        store.set_login_id("abc123");
        store.set_password(SecretString::from("abc123!@#".to_string()));
        store.set_email("a@kakao.com");

        let body = serde_json::to_value(SignUpRequest::from(store.draft()))?;
        assert_eq!(
            body,
            json!({
                "userName": "HongGildong",
                "identity": "1234567",
                "birthDate": "990101",
                "telecom": "1",
                "phoneNo": "01012345678",
                "id": "abc123",
                "password": "abc123!@#",
                "email": "a@kakao.com",
            })
        );
        Ok(())
    }

    #[test]
    fn sign_up_request_debug_redacts_secrets() {
        let request = SignUpRequest {
            user_name: "Hong".to_string(),
            identity: SecretString::from("7654321".to_string()),
            birth_date: "990101".to_string(),
            telecom: Carrier::Skt,
            phone_no: "01012345678".to_string(),
            id: "abc123".to_string(),
            password: SecretString::from("s3cret!pass".to_string()),
            email: "a@kakao.com".to_string(),
        };
        let rendered = format!("{request:?}");
        assert!(!rendered.contains("7654321"));
        assert!(!rendered.contains("s3cret!pass"));
    }

    #[test]
    fn contract_keeps_unknown_fields() -> Result<(), serde_json::Error> {
        let contract: Contract = serde_json::from_value(json!({
            "resCompanyNm": "Samsung Fire",
            "insuranceNm": "Dental Plus",
            "isDentalInsurance": true,
            "contractNo": "C-1"
        }))?;
        assert_eq!(contract.kind(), InsuranceKind::Dental);
        assert_eq!(contract.extra.get("contractNo"), Some(&json!("C-1")));
        assert_eq!(contract.to_string(), "Samsung Fire: Dental Plus (dental)");
        Ok(())
    }

    #[test]
    fn contract_nulls_read_as_defaults() -> Result<(), serde_json::Error> {
        let response: ContractsResponse = serde_json::from_value(json!({
            "code": 200,
            "data": [
                {"resCompanyNm": "DB", "insuranceNm": "Smile", "isDentalInsurance": true},
                {"resCompanyNm": "KB", "insuranceNm": null, "isDentalInsurance": null}
            ]
        }))?;
        let contracts = response.data.unwrap_or_default();
        assert_eq!(contracts.len(), 2);
        assert_eq!(contracts[1].res_company_nm, "KB");
        assert!(contracts[1].insurance_nm.is_empty());
        assert_eq!(contracts[1].kind(), InsuranceKind::Indemnity);
        Ok(())
    }

    #[test]
    fn sign_up_response_reads_failure_message() -> Result<(), serde_json::Error> {
        let response: SignUpResponse =
            serde_json::from_value(json!({"code": 409, "message": "ID already exists"}))?;
        assert!(response.data.is_none());
        assert_eq!(response.code, Some(409));
        assert_eq!(response.message.as_deref(), Some("ID already exists"));
        Ok(())
    }

    #[test]
    fn contracts_response_tolerates_missing_data() -> Result<(), serde_json::Error> {
        let response: ContractsResponse =
            serde_json::from_value(json!({"code": 200, "message": "ok"}))?;
        assert_eq!(response.code, 200);
        assert!(response.data.is_none());
        Ok(())
    }
}
