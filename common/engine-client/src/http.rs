//! HTTP implementation of [`EngineApi`]
//!
//! Each operation validates the status code, parses the body as JSON and
//! checks the expected field before handing it back. Parsing lives in plain
//! functions so it can be exercised without a server.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use url::Url;

use crate::api::EngineApi;
use crate::error::{EngineError, EngineResult};
use crate::types::{DirectoryEntry, Disk, ExecuteRequest, JournalEntry, LoginRequest, Partition};

/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Engine client over HTTP
#[derive(Debug, Clone)]
pub struct HttpEngine {
    client: Client,
    base: Url,
}

impl HttpEngine {
    /// Create a client for the engine at `base_url` with the default timeout
    pub fn new(base_url: &str) -> EngineResult<Self> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    /// Create a client with an explicit request timeout
    pub fn with_timeout(base_url: &str, timeout: Duration) -> EngineResult<Self> {
        let base = normalize_base(base_url)?;

        let client = Client::builder()
            .user_agent(concat!("diskctl/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| EngineError::Unreachable {
                url: base.to_string(),
                reason: format!("failed to create HTTP client: {}", e),
            })?;

        Ok(Self { client, base })
    }

    /// Base URL all endpoints are resolved against
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, path: &str, query: &[(&str, &str)]) -> EngineResult<Url> {
        let mut url = self
            .base
            .join(path)
            .map_err(|_| EngineError::InvalidUrl(format!("{}{}", self.base, path)))?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }

    async fn send(&self, request: RequestBuilder, url: &Url) -> EngineResult<(StatusCode, String)> {
        let response = request.send().await.map_err(|e| unreachable_error(url, e))?;
        let status = response.status();
        let body = response.text().await.map_err(|e| unreachable_error(url, e))?;
        tracing::debug!(%url, %status, bytes = body.len(), "engine response");
        Ok((status, body))
    }

    async fn get_list<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
        field: &str,
    ) -> EngineResult<Vec<T>> {
        let url = self.endpoint(path, query)?;
        tracing::debug!(%url, "GET");

        let (status, body) = self.send(self.client.get(url.clone()), &url).await?;
        if !status.is_success() {
            return Err(status_error(status, &body));
        }

        parse_list(&body, field)
    }

    async fn post_output<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> EngineResult<(StatusCode, String)> {
        let url = self.endpoint(path, &[])?;
        tracing::debug!(%url, "POST");
        self.send(self.client.post(url.clone()).json(body), &url).await
    }
}

#[async_trait]
impl EngineApi for HttpEngine {
    async fn authenticate(&self, user: &str, pass: &str, partition_id: &str) -> EngineResult<String> {
        let request = LoginRequest {
            user,
            pass,
            id: partition_id,
        };
        let (status, body) = self.post_output("login", &request).await?;

        if !status.is_success() {
            // A body with `output` is the engine explaining the refusal
            return Err(match output_field(&body) {
                Some(message) => EngineError::Rejected(message),
                None => status_error(status, &body),
            });
        }

        parse_output(&body)
    }

    async fn execute(&self, commands: &str) -> EngineResult<String> {
        let request = ExecuteRequest { command: commands };
        let (status, body) = self.post_output("execute", &request).await?;

        if !status.is_success() {
            return Err(status_error(status, &body));
        }

        parse_output(&body)
    }

    async fn list_disks(&self) -> EngineResult<Vec<Disk>> {
        self.get_list("disks", &[], "disks").await
    }

    async fn list_partitions(&self, disk_path: &str) -> EngineResult<Vec<Partition>> {
        self.get_list("partitions", &[("diskPath", disk_path)], "partitions")
            .await
    }

    async fn list_directory(&self, partition_id: &str, path: &str) -> EngineResult<Vec<DirectoryEntry>> {
        self.get_list("filesystem", &[("id", partition_id), ("path", path)], "entries")
            .await
    }

    async fn list_journal(&self, partition_id: &str) -> EngineResult<Vec<JournalEntry>> {
        self.get_list("journal", &[("id", partition_id)], "entries").await
    }
}

/// Parse the base URL, making sure relative joins keep its path
fn normalize_base(base_url: &str) -> EngineResult<Url> {
    let trimmed = base_url.trim();
    let with_slash = if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{}/", trimmed)
    };

    let url = Url::parse(&with_slash).map_err(|_| EngineError::InvalidUrl(base_url.to_string()))?;
    if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
        return Err(EngineError::InvalidUrl(base_url.to_string()));
    }
    Ok(url)
}

fn unreachable_error(url: &Url, err: reqwest::Error) -> EngineError {
    let reason = if err.is_timeout() {
        "request timed out".to_string()
    } else if err.is_connect() {
        "connection failed".to_string()
    } else {
        err.to_string()
    };
    tracing::warn!(%url, %reason, "engine unreachable");
    EngineError::Unreachable {
        url: url.to_string(),
        reason,
    }
}

fn status_error(status: StatusCode, body: &str) -> EngineError {
    EngineError::Status {
        status: status.as_u16(),
        message: failure_message(status, body),
    }
}

/// The human-readable reason for a non-2xx response
///
/// Prefers the body's `output` field and falls back to the status text.
pub fn failure_message(status: StatusCode, body: &str) -> String {
    output_field(body).unwrap_or_else(|| {
        status
            .canonical_reason()
            .map(str::to_string)
            .unwrap_or_else(|| status.as_u16().to_string())
    })
}

fn output_field(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    value.get("output")?.as_str().map(str::to_string)
}

/// Extract the `output` string of a successful response
pub fn parse_output(body: &str) -> EngineResult<String> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| EngineError::InvalidResponse(format!("body is not JSON: {}", e)))?;

    match value.get("output") {
        Some(Value::String(output)) => Ok(output.clone()),
        Some(_) => Err(EngineError::InvalidResponse(
            "'output' is not a string".to_string(),
        )),
        None => Err(EngineError::InvalidResponse("missing 'output'".to_string())),
    }
}

/// Extract the array stored under `field` of a successful response
///
/// A `null` field is an empty listing: the engine serializes empty
/// collections that way.
pub fn parse_list<T: DeserializeOwned>(body: &str, field: &str) -> EngineResult<Vec<T>> {
    let mut value: Value = serde_json::from_str(body)
        .map_err(|e| EngineError::InvalidResponse(format!("body is not JSON: {}", e)))?;

    let Some(object) = value.as_object_mut() else {
        return Err(EngineError::InvalidResponse(
            "expected a JSON object".to_string(),
        ));
    };

    match object.remove(field) {
        None => Err(EngineError::InvalidResponse(format!("missing '{}'", field))),
        Some(Value::Null) => Ok(Vec::new()),
        Some(items @ Value::Array(_)) => serde_json::from_value(items)
            .map_err(|e| EngineError::InvalidResponse(format!("malformed '{}': {}", field, e))),
        Some(_) => Err(EngineError::InvalidResponse(format!(
            "'{}' is not an array",
            field
        ))),
    }
}
