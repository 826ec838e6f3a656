//! OAuth2 client-credentials token provider
//!
//! A fresh token is requested on every call; nothing is cached.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::config::GraphCredentials;
use crate::error::{PortalError, PortalResult};

const LOGIN_ROOT: &str = "https://login.microsoftonline.com";
const GRAPH_SCOPE: &str = "https://graph.microsoft.com/.default";

/// Source of bearer credentials for remote calls
#[async_trait]
pub trait TokenProvider: Send + Sync {
    async fn access_token(&self) -> PortalResult<String>;
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Client-credentials grant against the Microsoft identity platform
pub struct ClientCredentials {
    client: reqwest::Client,
    credentials: GraphCredentials,
    token_url: String,
}

impl ClientCredentials {
    pub fn new(client: reqwest::Client, credentials: GraphCredentials) -> Self {
        let token_url = format!(
            "{}/{}/oauth2/v2.0/token",
            LOGIN_ROOT,
            urlencoding::encode(&credentials.tenant_id)
        );
        Self {
            client,
            credentials,
            token_url,
        }
    }

    pub fn token_url(&self) -> &str {
        &self.token_url
    }
}

#[async_trait]
impl TokenProvider for ClientCredentials {
    async fn access_token(&self) -> PortalResult<String> {
        let form = [
            ("grant_type", "client_credentials"),
            ("client_id", self.credentials.client_id.as_str()),
            ("client_secret", self.credentials.client_secret.as_str()),
            ("scope", GRAPH_SCOPE),
        ];

        let response = self
            .client
            .post(&self.token_url)
            .form(&form)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| PortalError::remote("requesting an access token", e))?;

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| PortalError::remote("reading the access token", e))?;

        debug!("obtained access token");
        Ok(token.access_token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_url_includes_tenant() {
        let provider = ClientCredentials::new(
            reqwest::Client::new(),
            GraphCredentials {
                tenant_id: "contoso.onmicrosoft.com".to_string(),
                client_id: "id".to_string(),
                client_secret: "secret".to_string(),
            },
        );

        assert_eq!(
            provider.token_url(),
            "https://login.microsoftonline.com/contoso.onmicrosoft.com/oauth2/v2.0/token"
        );
    }
}
