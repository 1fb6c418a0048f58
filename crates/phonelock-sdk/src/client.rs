use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::debug;

use crate::{ClientConfig, ClientError, SessionStatus};

/// The three operations the device exposes.
///
/// Implemented by [`SessionClient`] for the real device; the synchronizer
/// only depends on this trait.
#[async_trait]
pub trait SessionApi: Send + Sync {
    /// Lock the device for `minutes`. Callers validate `minutes > 0`.
    async fn start_session(&self, minutes: u32) -> Result<(), ClientError>;

    async fn get_session_status(&self) -> Result<SessionStatus, ClientError>;

    /// Unlock immediately. Succeeds even if nothing is locked.
    async fn stop_session(&self) -> Result<(), ClientError>;
}

#[derive(Clone)]
pub struct SessionClient {
    http: Client,
    config: ClientConfig,
}

impl SessionClient {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            http: Client::new(),
            config,
        }
    }

    /// Sends a request and returns the raw success body. The whole exchange,
    /// body included, runs under the configured timeout.
    async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<Vec<u8>, ClientError> {
        let url = self.config.url(path);
        let mut builder = self
            .http
            .request(method.clone(), &url)
            .header(CONTENT_TYPE, "application/json");
        if let Some(body) = body {
            builder = builder.json(&body);
        }

        let exchange = async move {
            let res = builder.send().await.map_err(ClientError::from_transport)?;
            let status = res.status();
            if !status.is_success() {
                return Err(ClientError::HttpStatus {
                    code: status.as_u16(),
                    reason: status.canonical_reason().unwrap_or_default().to_string(),
                });
            }
            let bytes = res.bytes().await.map_err(ClientError::from_transport)?;
            Ok(bytes.to_vec())
        };

        let result = match tokio::time::timeout(self.config.timeout(), exchange).await {
            Ok(result) => result,
            Err(_) => Err(ClientError::Timeout),
        };
        match &result {
            Ok(body) => debug!(
                target = "phonelock.client",
                %method,
                path,
                bytes = body.len(),
                "request succeeded"
            ),
            Err(err) => debug!(
                target = "phonelock.client",
                %method,
                path,
                kind = ?err.kind(),
                error = %err,
                "request failed"
            ),
        }
        result
    }
}

/// Empty bodies decode to the type's default instead of failing.
fn decode_body<T>(body: &[u8]) -> Result<T, ClientError>
where
    T: DeserializeOwned + Default,
{
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(body).map_err(|err| ClientError::Parse(err.to_string()))
}

#[async_trait]
impl SessionApi for SessionClient {
    async fn start_session(&self, minutes: u32) -> Result<(), ClientError> {
        self.request(
            Method::POST,
            "/session/start",
            Some(json!({ "minutes": minutes })),
        )
        .await?;
        Ok(())
    }

    async fn get_session_status(&self) -> Result<SessionStatus, ClientError> {
        let body = self.request(Method::GET, "/session/status", None).await?;
        decode_body(&body)
    }

    async fn stop_session(&self) -> Result<(), ClientError> {
        self.request(Method::POST, "/session/stop", None).await?;
        Ok(())
    }
}
