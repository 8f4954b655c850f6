// file: src/api/auth.rs
// description: oauth2 client credentials exchange against the ebay identity endpoint
// reference: https://developer.ebay.com/api-docs/static/oauth-client-credentials-grant.html

use crate::error::{HarvestError, Result};
use reqwest::Client;
use serde::Deserialize;
use std::fmt;
use tracing::{debug, info};

/// Application bearer token. Fetched once per run and never refreshed.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn secret(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(***)")
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    expires_in: Option<u64>,
}

pub struct TokenClient {
    client: Client,
    token_url: String,
    scope: String,
}

impl TokenClient {
    pub fn new(client: Client, token_url: String, scope: String) -> Self {
        Self {
            client,
            token_url,
            scope,
        }
    }

    pub async fn fetch_token(&self, client_id: &str, client_secret: &str) -> Result<AccessToken> {
        debug!("Requesting application token from {}", self.token_url);

        let response = self
            .client
            .post(&self.token_url)
            .basic_auth(client_id, Some(client_secret))
            .form(&[
                ("grant_type", "client_credentials"),
                ("scope", self.scope.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if status.as_u16() != 200 {
            let body = response.text().await.unwrap_or_default();
            return Err(HarvestError::Auth {
                status: status.as_u16(),
                body,
            });
        }

        let token: TokenResponse = response.json().await?;
        match token.access_token {
            Some(access_token) if !access_token.is_empty() => {
                info!(
                    "Obtained access token (expires in {}s)",
                    token.expires_in.unwrap_or_default()
                );
                Ok(AccessToken::new(access_token))
            }
            _ => Err(HarvestError::Auth {
                status: status.as_u16(),
                body: "response did not contain an access_token".to_string(),
            }),
        }
    }
}
