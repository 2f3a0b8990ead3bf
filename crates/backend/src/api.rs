use crate::error::{ApiError, ApiResult};
use crate::types::{
    AuthDescriptor, Envelope, ExchangeData, ExchangeRequest, ProviderInfo, TokenTestData,
    TokenTestRequest,
};
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::time::Duration;
use url::Url;

const AUTH_URL_PATH: &str = "api/oauth2/auth_url";
const EXCHANGE_PATH: &str = "api/oauth2/exchange";
const PROVIDERS_PATH: &str = "api/oauth2/providers";
const TEST_TOKEN_PATH: &str = "api/oauth2/test";

/// Remote half of the authorization handshake.
///
/// `Err` means no envelope was received (transport failure). A received
/// envelope with `success: false` is returned as `Ok` and interpreted by
/// the caller.
#[async_trait]
pub trait BackendClient: Send + Sync {
    async fn request_auth_url(&self, provider: &str) -> ApiResult<Envelope<AuthDescriptor>>;

    async fn exchange_code(&self, request: &ExchangeRequest) -> ApiResult<Envelope<ExchangeData>>;

    async fn list_providers(&self) -> ApiResult<Envelope<BTreeMap<String, ProviderInfo>>> {
        Err(ApiError::Unsupported("list_providers"))
    }

    async fn test_token(&self, _request: &TokenTestRequest) -> ApiResult<Envelope<TokenTestData>> {
        Err(ApiError::Unsupported("test_token"))
    }
}

#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub connect_timeout: Duration,
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(5),
            timeout: Duration::from_secs(20),
            user_agent: "oauth2-auth/0.1".to_string(),
        }
    }
}

#[derive(Clone)]
pub struct HttpBackendClient {
    client: Client,
    base_url: Url,
}

impl HttpBackendClient {
    pub fn new(base_url: &str) -> ApiResult<Self> {
        Self::with_options(base_url, ClientOptions::default())
    }

    pub fn with_options(base_url: &str, options: ClientOptions) -> ApiResult<Self> {
        let mut base_url =
            Url::parse(base_url).map_err(|e| ApiError::InvalidBaseUrl(format!("{base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidBaseUrl(base_url.to_string()));
        }
        // Keep any path prefix when joining the relative endpoint paths.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = Client::builder()
            .user_agent(options.user_agent)
            .connect_timeout(options.connect_timeout)
            .timeout(options.timeout)
            .build()
            .unwrap_or_else(|_| Client::new());

        Ok(Self { client, base_url })
    }

    fn endpoint(&self, path: &str) -> ApiResult<Url> {
        self.base_url
            .join(path)
            .map_err(|e| ApiError::InvalidBaseUrl(format!("{}{path}: {e}", self.base_url)))
    }

    async fn read_envelope<T: DeserializeOwned>(response: Response) -> ApiResult<Envelope<T>> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

#[async_trait]
impl BackendClient for HttpBackendClient {
    async fn request_auth_url(&self, provider: &str) -> ApiResult<Envelope<AuthDescriptor>> {
        let url = self.endpoint(AUTH_URL_PATH)?;
        tracing::debug!(%provider, "Requesting authorization URL");

        let response = self
            .client
            .get(url)
            .query(&[("provider", provider)])
            .send()
            .await?;

        Self::read_envelope(response).await
    }

    async fn exchange_code(&self, request: &ExchangeRequest) -> ApiResult<Envelope<ExchangeData>> {
        let url = self.endpoint(EXCHANGE_PATH)?;
        tracing::debug!(provider = %request.provider, "Exchanging authorization code");

        let response = self.client.post(url).json(request).send().await?;

        Self::read_envelope(response).await
    }

    async fn list_providers(&self) -> ApiResult<Envelope<BTreeMap<String, ProviderInfo>>> {
        let url = self.endpoint(PROVIDERS_PATH)?;
        let response = self.client.get(url).send().await?;
        Self::read_envelope(response).await
    }

    async fn test_token(&self, request: &TokenTestRequest) -> ApiResult<Envelope<TokenTestData>> {
        let url = self.endpoint(TEST_TOKEN_PATH)?;
        let response = self.client.post(url).json(request).send().await?;
        Self::read_envelope(response).await
    }
}
