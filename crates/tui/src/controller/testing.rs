//! Recording doubles for the injected backend and popup capabilities.

use async_trait::async_trait;
use oauth2_auth_backend::{
    ApiError, ApiResult, AuthDescriptor, BackendClient, CodeFormat, Envelope, ExchangeData,
    ExchangeRequest, ProviderInfo, TokenTestData, TokenTestRequest,
};
use oauth2_auth_popup::PopupOpener;
use std::collections::{BTreeMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub(crate) enum Reply<T> {
    Envelope(Envelope<T>),
    Transport,
}

impl<T> Reply<T> {
    fn into_result(self) -> ApiResult<Envelope<T>> {
        match self {
            Reply::Envelope(envelope) => Ok(envelope),
            Reply::Transport => Err(ApiError::Status {
                status: 502,
                body: "bad gateway".to_string(),
            }),
        }
    }
}

#[derive(Default)]
pub(crate) struct FakeBackend {
    auth_replies: Mutex<VecDeque<Reply<AuthDescriptor>>>,
    exchange_replies: Mutex<VecDeque<Reply<ExchangeData>>>,
    auth_requests: Mutex<Vec<String>>,
    exchange_requests: Mutex<Vec<ExchangeRequest>>,
    pub token_tests: Mutex<Vec<TokenTestRequest>>,
    pub providers: Mutex<Option<BTreeMap<String, ProviderInfo>>>,
    in_flight: AtomicUsize,
    pub max_in_flight: AtomicUsize,
}

impl FakeBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn reply_auth(&self, reply: Reply<AuthDescriptor>) {
        self.auth_replies.lock().unwrap().push_back(reply);
    }

    pub fn reply_exchange(&self, reply: Reply<ExchangeData>) {
        self.exchange_replies.lock().unwrap().push_back(reply);
    }

    pub fn auth_requests(&self) -> Vec<String> {
        self.auth_requests.lock().unwrap().clone()
    }

    pub fn exchange_requests(&self) -> Vec<ExchangeRequest> {
        self.exchange_requests.lock().unwrap().clone()
    }

    fn enter(&self) {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
    }

    fn leave(&self) {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl BackendClient for FakeBackend {
    async fn request_auth_url(&self, provider: &str) -> ApiResult<Envelope<AuthDescriptor>> {
        self.enter();
        self.auth_requests.lock().unwrap().push(provider.to_string());
        tokio::task::yield_now().await;
        let reply = self
            .auth_replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Reply::Transport);
        self.leave();
        reply.into_result()
    }

    async fn exchange_code(&self, request: &ExchangeRequest) -> ApiResult<Envelope<ExchangeData>> {
        self.enter();
        self.exchange_requests.lock().unwrap().push(request.clone());
        tokio::task::yield_now().await;
        let reply = self
            .exchange_replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Reply::Transport);
        self.leave();
        reply.into_result()
    }

    async fn list_providers(&self) -> ApiResult<Envelope<BTreeMap<String, ProviderInfo>>> {
        match self.providers.lock().unwrap().clone() {
            Some(providers) => Ok(Envelope::ok(providers)),
            None => Err(ApiError::Unsupported("list_providers")),
        }
    }

    async fn test_token(&self, request: &TokenTestRequest) -> ApiResult<Envelope<TokenTestData>> {
        self.token_tests.lock().unwrap().push(request.clone());
        Ok(Envelope::ok(TokenTestData {
            valid: true,
            expires_in: Some(3600),
        }))
    }
}

#[derive(Default)]
pub(crate) struct RecordingPopup {
    opened: Mutex<Vec<String>>,
}

impl RecordingPopup {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn opened(&self) -> Vec<String> {
        self.opened.lock().unwrap().clone()
    }
}

impl PopupOpener for RecordingPopup {
    fn open(&self, url: &str) {
        self.opened.lock().unwrap().push(url.to_string());
    }
}

pub(crate) fn descriptor(provider: &str, state: &str, code_format: CodeFormat) -> AuthDescriptor {
    AuthDescriptor {
        provider: provider.to_string(),
        auth_url: "https://x/auth".to_string(),
        state: state.to_string(),
        use_pkce: true,
        code_format,
    }
}

pub(crate) fn issued(refresh_token: &str) -> ExchangeData {
    ExchangeData {
        refresh_token: refresh_token.to_string(),
        access_token: None,
        expires_in: None,
    }
}
