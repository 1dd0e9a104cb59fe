//! Read-only contract listing: `Loading` until the single request settles,
//! then `Loaded` or `Failed`. No retries and no phases.

use super::{client::IdentityClient, types::Contract};
use secrecy::SecretString;
use tracing::{error, instrument};

/// Shown when the failure carries no server message.
pub const CONTRACTS_FALLBACK_MESSAGE: &str = "Failed to load insurance data.";

#[derive(Clone, Debug, Default, PartialEq)]
pub enum ContractList {
    #[default]
    Loading,
    Loaded(Vec<Contract>),
    Failed(String),
}

impl ContractList {
    /// Runs the lookup once and settles into `Loaded` or `Failed`.
    #[instrument(skip_all)]
    pub async fn load(client: &IdentityClient, token: &SecretString) -> Self {
        match client.contracts(token).await {
            Ok(contracts) => Self::Loaded(contracts),
            Err(err) => {
                error!("Error fetching contracts: {err}");
                Self::Failed(
                    err.server_message()
                        .unwrap_or(CONTRACTS_FALLBACK_MESSAGE)
                        .to_string(),
                )
            }
        }
    }

    /// Lines for display; a notice when no contracts are linked.
    #[must_use]
    pub fn render(&self) -> Vec<String> {
        match self {
            Self::Loading => vec!["Loading...".to_string()],
            Self::Failed(message) => vec![message.clone()],
            Self::Loaded(contracts) if contracts.is_empty() => {
                vec!["No insurance history. Link your insurance information first.".to_string()]
            }
            Self::Loaded(contracts) => contracts.iter().map(ToString::to_string).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::config::ClientConfig;
    use anyhow::Result;
    use serde_json::json;
    use std::{net::TcpListener, time::Duration};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn can_bind_localhost() -> bool {
        TcpListener::bind("127.0.0.1:0").is_ok()
    }

    #[test]
    fn render_states() {
        assert_eq!(ContractList::default(), ContractList::Loading);
        assert_eq!(
            ContractList::Failed("nope".to_string()).render(),
            vec!["nope".to_string()]
        );
        assert_eq!(ContractList::Loaded(Vec::new()).render().len(), 1);
    }

    #[tokio::test]
    async fn empty_data_is_loaded_empty() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v1/contract"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"code": 200})))
            .mount(&server)
            .await;

        let client = IdentityClient::new(ClientConfig::new(&server.uri(), Duration::from_secs(2))?)?;
        let list = ContractList::load(&client, &SecretString::from("t".to_string())).await;
        assert_eq!(list, ContractList::Loaded(Vec::new()));
        Ok(())
    }

    #[tokio::test]
    async fn rows_with_null_fields_still_load() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v1/contract"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "code": 200,
                "data": [
                    {"resCompanyNm": "DB", "insuranceNm": "Smile", "isDentalInsurance": true},
                    {"resCompanyNm": "KB", "insuranceNm": null, "isDentalInsurance": null}
                ]
            })))
            .mount(&server)
            .await;

        let client = IdentityClient::new(ClientConfig::new(&server.uri(), Duration::from_secs(2))?)?;
        let list = ContractList::load(&client, &SecretString::from("t".to_string())).await;
        assert_eq!(
            list.render(),
            vec!["DB: Smile (dental)".to_string(), "KB:  (indemnity)".to_string()]
        );
        Ok(())
    }

    #[tokio::test]
    async fn failure_without_message_uses_fallback() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v1/contract"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = IdentityClient::new(ClientConfig::new(&server.uri(), Duration::from_secs(2))?)?;
        let list = ContractList::load(&client, &SecretString::from("t".to_string())).await;
        assert_eq!(
            list,
            ContractList::Failed(CONTRACTS_FALLBACK_MESSAGE.to_string())
        );
        Ok(())
    }

    #[tokio::test]
    async fn application_error_surfaces_message() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v1/contract"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"code": 404, "message": "no linked account"})),
            )
            .mount(&server)
            .await;

        let client = IdentityClient::new(ClientConfig::new(&server.uri(), Duration::from_secs(2))?)?;
        let list = ContractList::load(&client, &SecretString::from("t".to_string())).await;
        assert_eq!(list, ContractList::Failed("no linked account".to_string()));
        Ok(())
    }
}
