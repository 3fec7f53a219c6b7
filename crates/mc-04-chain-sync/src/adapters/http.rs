//! HTTP Authority Connection Adapter
//!
//! Implements `AuthorityConnection` against the authority's JSON routes.

use crate::config::ClientSyncConfig;
use crate::domain::{PublicKeyResponse, SyncError, SyncRequest, SyncResponse};
use crate::ports::outbound::AuthorityConnection;
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use shared_crypto::Ed25519PublicKey;
use shared_types::Transaction;
use tracing::debug;

/// HTTP-based authority connection.
#[derive(Debug, Clone)]
pub struct HttpAuthorityConnection {
    base_url: String,
    client: Client,
}

impl HttpAuthorityConnection {
    /// Create a connection from sync configuration.
    pub fn new(config: &ClientSyncConfig) -> Result<Self, SyncError> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| SyncError::Transport(e.to_string()))?;
        Ok(Self {
            base_url: config.authority_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn check(response: Response) -> Result<Response, SyncError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response.text().await.unwrap_or_default();
        Err(SyncError::Rejected {
            status: status.as_u16(),
            message,
        })
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, SyncError> {
        response
            .json::<T>()
            .await
            .map_err(|e| SyncError::InvalidResponse(e.to_string()))
    }
}

fn transport(e: reqwest::Error) -> SyncError {
    SyncError::Transport(e.to_string())
}

#[async_trait]
impl AuthorityConnection for HttpAuthorityConnection {
    async fn fetch_public_key(&self) -> Result<Ed25519PublicKey, SyncError> {
        let response = self
            .client
            .get(self.url("/getPublicKey"))
            .send()
            .await
            .map_err(transport)?;
        let body: PublicKeyResponse = Self::decode(Self::check(response).await?).await?;
        Ok(body.public_key)
    }

    async fn request_sync(&self, request: SyncRequest) -> Result<SyncResponse, SyncError> {
        debug!(
            "[mc-04] Sync request to {} after {:?}",
            self.base_url,
            request.resume_from()
        );
        let response = self
            .client
            .post(self.url("/sync"))
            .json(&request)
            .send()
            .await
            .map_err(transport)?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(SyncError::UnknownBlock(
                request.last_block_hash.unwrap_or_default(),
            ));
        }
        Self::decode(Self::check(response).await?).await
    }

    async fn forward_transaction(&self, tx: &Transaction) -> Result<(), SyncError> {
        let response = self
            .client
            .post(self.url("/addTransaction"))
            .json(tx)
            .send()
            .await
            .map_err(transport)?;
        Self::check(response).await?;
        Ok(())
    }

    fn endpoint(&self) -> &str {
        &self.base_url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_slash_trimmed() {
        let config = ClientSyncConfig {
            authority_url: "http://authority:8080/".into(),
            ..ClientSyncConfig::for_testing()
        };
        let conn = HttpAuthorityConnection::new(&config).unwrap();
        assert_eq!(conn.endpoint(), "http://authority:8080");
        assert_eq!(conn.url("/sync"), "http://authority:8080/sync");
    }

    #[tokio::test]
    async fn test_unreachable_authority_is_transport_error() {
        let config = ClientSyncConfig {
            authority_url: "http://127.0.0.1:9".into(),
            ..ClientSyncConfig::for_testing()
        };
        let conn = HttpAuthorityConnection::new(&config).unwrap();
        let result = conn.request_sync(SyncRequest::full()).await;
        assert!(matches!(result, Err(SyncError::Transport(_))));
    }
}
