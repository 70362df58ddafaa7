use std::time::Duration;

use engine_logging::engine_debug;
use reqwest::multipart::{Form, Part};
use serde_json::Value;

use crate::{ApiOutput, FailureKind, RequestError, RequestId, UploadFile, UploadOutput};

pub const DEFAULT_ENDPOINT: &str = "http://localhost:5000/api/upload";
pub const DEFAULT_API_BASE: &str = "http://localhost:5000/api";

#[derive(Debug, Clone)]
pub struct ClientSettings {
    /// Where files are uploaded.
    pub endpoint: String,
    /// Prefix of the JSON routes (`chat`, `explore`, ...).
    pub api_base: String,
    /// Multipart field carrying the file.
    pub field_name: String,
    pub connect_timeout: Option<Duration>,
    /// Whole-request limit. `None` waits for as long as the server takes.
    pub request_timeout: Option<Duration>,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            field_name: "file".to_string(),
            connect_timeout: None,
            request_timeout: None,
        }
    }
}

#[async_trait::async_trait]
pub trait Uploader: Send + Sync {
    async fn upload(
        &self,
        request_id: RequestId,
        file: &UploadFile,
    ) -> Result<UploadOutput, RequestError>;
}

#[async_trait::async_trait]
pub trait ApiClient: Send + Sync {
    /// POSTs `body` as JSON to `<api_base>/<route>`.
    async fn call(
        &self,
        request_id: RequestId,
        route: &str,
        body: &Value,
    ) -> Result<ApiOutput, RequestError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestClient {
    settings: ClientSettings,
    client: reqwest::Client,
}

impl ReqwestClient {
    pub fn new(settings: ClientSettings) -> Result<Self, RequestError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = settings.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }
        if let Some(timeout) = settings.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|err| RequestError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self { settings, client })
    }

    fn route_url(&self, route: &str) -> Result<reqwest::Url, RequestError> {
        let url = format!("{}/{}", self.settings.api_base.trim_end_matches('/'), route);
        parse_url(&url)
    }
}

#[async_trait::async_trait]
impl Uploader for ReqwestClient {
    async fn upload(
        &self,
        request_id: RequestId,
        file: &UploadFile,
    ) -> Result<UploadOutput, RequestError> {
        let endpoint = parse_url(&self.settings.endpoint)?;

        let bytes = tokio::fs::read(&file.path).await.map_err(|err| {
            RequestError::new(
                FailureKind::ReadFile,
                format!("{}: {}", file.path.display(), err),
            )
        })?;
        let bytes_sent = bytes.len() as u64;
        engine_debug!(
            "Upload {} sending {} ({} bytes) to {}",
            request_id,
            file.file_name,
            bytes_sent,
            endpoint
        );

        let part = Part::bytes(bytes).file_name(file.file_name.clone());
        let form = Form::new().part(self.settings.field_name.clone(), part);

        let response = self
            .client
            .post(endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let (status, body) = read_json(response).await?;

        Ok(UploadOutput {
            status,
            body,
            bytes_sent,
        })
    }
}

#[async_trait::async_trait]
impl ApiClient for ReqwestClient {
    async fn call(
        &self,
        request_id: RequestId,
        route: &str,
        body: &Value,
    ) -> Result<ApiOutput, RequestError> {
        let url = self.route_url(route)?;
        engine_debug!("Request {} posting to {}", request_id, url);

        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let (status, body) = read_json(response).await?;

        Ok(ApiOutput { status, body })
    }
}

fn parse_url(url: &str) -> Result<reqwest::Url, RequestError> {
    reqwest::Url::parse(url)
        .map_err(|err| RequestError::new(FailureKind::InvalidEndpoint, err.to_string()))
}

/// Status plus the body parsed as JSON, whatever the status.
async fn read_json(response: reqwest::Response) -> Result<(u16, Value), RequestError> {
    let status = response.status().as_u16();
    let raw = response.bytes().await.map_err(map_reqwest_error)?;
    let body = serde_json::from_slice(&raw)
        .map_err(|err| RequestError::new(FailureKind::InvalidJson, err.to_string()))?;
    Ok((status, body))
}

fn map_reqwest_error(err: reqwest::Error) -> RequestError {
    if err.is_timeout() {
        return RequestError::new(FailureKind::Timeout, err.to_string());
    }
    RequestError::new(FailureKind::Network, err.to_string())
}
