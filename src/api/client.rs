//! HTTP client for the identity service. Every call is a single attempt with
//! the configured timeout; no retries. Request bodies and bearer tokens are
//! never logged.

use super::{
    config::ClientConfig,
    error::{sanitize_body, ApiError},
    types::{Contract, ContractsResponse, ErrorBody, SignUpRequest, SignUpResponse},
};
use crate::{registration::store::SecondPhasePayload, APP_USER_AGENT};
use reqwest::{header::CONTENT_TYPE, Client, Response};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::{debug, info_span, warn, Instrument};

pub const SIGN_UP_PATH: &str = "/auth/sign-up";
pub const CONTRACTS_PATH: &str = "/api/v1/contract";
/// `code` value that marks a successful contract envelope.
pub const CONTRACTS_OK_CODE: i64 = 200;

#[derive(Clone, Debug)]
pub struct IdentityClient {
    http: Client,
    config: ClientConfig,
}

impl IdentityClient {
    /// # Errors
    /// Returns `ApiError::Config` if the underlying HTTP client cannot be built.
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        let http = Client::builder()
            .user_agent(APP_USER_AGENT)
            .timeout(config.timeout)
            .build()
            .map_err(|err| ApiError::Config(format!("Failed to build HTTP client: {err}")))?;

        Ok(Self { http, config })
    }

    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Posts the phase-one registration and returns the second-phase payload.
    /// Pre-auth call: no `Authorization` header is sent.
    ///
    /// # Errors
    /// Returns an error on transport failure, a non-success status, or a
    /// success body without `data`.
    pub async fn sign_up(&self, request: &SignUpRequest) -> Result<SecondPhasePayload, ApiError> {
        let url = self.config.build_url(SIGN_UP_PATH);
        let span = info_span!("identity.sign_up", http.method = "POST", url = %url);

        let response = self
            .http
            .post(&url)
            .header(CONTENT_TYPE, "application/json")
            .json(request)
            .send()
            .instrument(span)
            .await?;

        let status = response.status().as_u16();
        let body: SignUpResponse = handle_json_response(response).await?;
        if let Some(data) = body.data {
            return Ok(data);
        }

        match body.message.filter(|message| !message.trim().is_empty()) {
            Some(message) => {
                warn!(code = body.code, "signup rejected without data");
                Err(ApiError::Application {
                    code: body.code.unwrap_or_else(|| i64::from(status)),
                    message: Some(message),
                })
            }
            None => Err(ApiError::Parse(
                "Signup response is missing data.".to_string(),
            )),
        }
    }

    /// Fetches the contracts linked to the account behind `token`.
    ///
    /// # Errors
    /// Returns an error on transport failure, a non-success status, or an
    /// envelope whose `code` is not 200.
    pub async fn contracts(&self, token: &SecretString) -> Result<Vec<Contract>, ApiError> {
        let url = self.config.build_url(CONTRACTS_PATH);
        let span = info_span!("identity.contracts", http.method = "GET", url = %url);

        let response = self
            .http
            .get(&url)
            .bearer_auth(token.expose_secret())
            .header(CONTENT_TYPE, "application/json")
            .send()
            .instrument(span)
            .await?;

        let envelope: ContractsResponse = handle_json_response(response).await?;
        if envelope.code != CONTRACTS_OK_CODE {
            warn!(code = envelope.code, "contract lookup rejected");
            return Err(ApiError::Application {
                code: envelope.code,
                message: envelope.message,
            });
        }

        let contracts = envelope.data.unwrap_or_default();
        debug!(count = contracts.len(), "contracts fetched");
        Ok(contracts)
    }
}

/// Parses JSON responses and surfaces HTTP errors with the server's message
/// when the body carries one.
async fn handle_json_response<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let status = response.status();
    if status.is_success() {
        return response
            .json::<T>()
            .await
            .map_err(|err| ApiError::Parse(format!("Failed to decode response: {err}")));
    }

    let body = response.text().await.unwrap_or_default();
    let server_message = serde_json::from_str::<ErrorBody>(&body)
        .ok()
        .and_then(|error| error.message)
        .filter(|message| !message.trim().is_empty());

    Err(ApiError::Http {
        status: status.as_u16(),
        server_message,
        body: sanitize_body(&body),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registration::fields::Carrier;
    use anyhow::{anyhow, Result};
    use serde_json::json;
    use std::{net::TcpListener, time::Duration};
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn can_bind_localhost() -> bool {
        TcpListener::bind("127.0.0.1:0").is_ok()
    }

    fn client_for(server: &MockServer) -> Result<IdentityClient> {
        let config = ClientConfig::new(&server.uri(), Duration::from_secs(2))?;
        Ok(IdentityClient::new(config)?)
    }

    fn sign_up_request() -> SignUpRequest {
        SignUpRequest {
            user_name: "Hong".to_string(),
            identity: SecretString::from("1234567".to_string()),
            birth_date: "990101".to_string(),
            telecom: Carrier::Skt,
            phone_no: "01012345678".to_string(),
            id: "abc123".to_string(),
            password: SecretString::from("abc123!@#".to_string()),
            email: "a@daum.net".to_string(),
        }
    }

    #[tokio::test]
    async fn contracts_sends_bearer_token() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(CONTRACTS_PATH))
            .and(header("Authorization", "Bearer token-abc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "code": 200,
                "data": [
                    {"resCompanyNm": "DB", "insuranceNm": "Smile", "isDentalInsurance": true},
                    {"resCompanyNm": "KB", "insuranceNm": "Care", "isDentalInsurance": false}
                ],
                "message": "ok"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server)?;
        let contracts = client
            .contracts(&SecretString::from("token-abc".to_string()))
            .await?;
        assert_eq!(contracts.len(), 2);
        assert_eq!(contracts[1].to_string(), "KB: Care (indemnity)");
        Ok(())
    }

    #[tokio::test]
    async fn contracts_application_error_carries_message() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(CONTRACTS_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "code": 401,
                "message": "token expired"
            })))
            .mount(&server)
            .await;

        let client = client_for(&server)?;
        let err = client
            .contracts(&SecretString::from("stale".to_string()))
            .await
            .err()
            .ok_or_else(|| anyhow!("expected error"))?;
        assert_eq!(
            err,
            ApiError::Application {
                code: 401,
                message: Some("token expired".to_string())
            }
        );
        Ok(())
    }

    #[tokio::test]
    async fn sign_up_message_without_data_is_application_error() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(SIGN_UP_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "code": 409,
                "message": "ID already exists"
            })))
            .mount(&server)
            .await;

        let client = client_for(&server)?;
        let request = sign_up_request();
        let err = client
            .sign_up(&request)
            .await
            .err()
            .ok_or_else(|| anyhow!("expected error"))?;
        assert_eq!(
            err,
            ApiError::Application {
                code: 409,
                message: Some("ID already exists".to_string())
            }
        );
        assert_eq!(err.user_message(), "ID already exists");
        Ok(())
    }

    #[tokio::test]
    async fn sign_up_without_data_or_message_is_parse_error() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(SIGN_UP_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&server)
            .await;

        let client = client_for(&server)?;
        let request = sign_up_request();
        let err = client
            .sign_up(&request)
            .await
            .err()
            .ok_or_else(|| anyhow!("expected error"))?;
        assert!(matches!(err, ApiError::Parse(_)), "{err:?}");
        Ok(())
    }

    #[tokio::test]
    async fn http_error_extracts_server_message() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(CONTRACTS_PATH))
            .respond_with(ResponseTemplate::new(403).set_body_json(json!({
                "message": "forbidden"
            })))
            .mount(&server)
            .await;

        let client = client_for(&server)?;
        let err = client
            .contracts(&SecretString::from("t".to_string()))
            .await
            .err()
            .ok_or_else(|| anyhow!("expected error"))?;
        assert_eq!(err.server_message(), Some("forbidden"));
        assert_eq!(err.user_message(), "forbidden");
        Ok(())
    }

    #[tokio::test]
    async fn http_error_without_json_keeps_sanitized_body() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(CONTRACTS_PATH))
            .respond_with(ResponseTemplate::new(502).set_body_string("  bad gateway  "))
            .mount(&server)
            .await;

        let client = client_for(&server)?;
        let err = client
            .contracts(&SecretString::from("t".to_string()))
            .await
            .err()
            .ok_or_else(|| anyhow!("expected error"))?;
        assert_eq!(
            err,
            ApiError::Http {
                status: 502,
                server_message: None,
                body: "bad gateway".to_string()
            }
        );
        Ok(())
    }

    #[tokio::test]
    async fn slow_server_times_out() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(CONTRACTS_PATH))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"code": 200, "data": []}))
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&server)
            .await;

        let config = ClientConfig::new(&server.uri(), Duration::from_millis(200))?;
        let client = IdentityClient::new(config)?;
        let err = client
            .contracts(&SecretString::from("t".to_string()))
            .await
            .err()
            .ok_or_else(|| anyhow!("expected error"))?;
        assert!(matches!(err, ApiError::Timeout(_)), "{err:?}");
        Ok(())
    }
}
