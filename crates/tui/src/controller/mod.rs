use crate::text;
use oauth2_auth_backend::{
    ApiResult, AuthDescriptor, BackendClient, Envelope, ExchangeData, ExchangeRequest,
};
use oauth2_auth_popup::PopupOpener;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

mod session;
mod toast;

#[cfg(test)]
pub(crate) mod testing;

pub use session::AuthSession;
pub use toast::{Toast, ToastLevel};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ButtonVariant {
    Text,
    Outlined,
    #[default]
    Contained,
}

/// Caller-supplied configuration of the control.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthButtonProps {
    pub provider: String,
    pub disabled: bool,
    pub button_text: String,
    pub button_variant: ButtonVariant,
}

impl AuthButtonProps {
    pub fn new(provider: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            disabled: false,
            button_text: text::DEFAULT_BUTTON_TEXT.to_string(),
            button_variant: ButtonVariant::default(),
        }
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn button_text(mut self, button_text: impl Into<String>) -> Self {
        self.button_text = button_text.into();
        self
    }

    pub fn button_variant(mut self, button_variant: ButtonVariant) -> Self {
        self.button_variant = button_variant;
        self
    }

    /// Label shown when not loading; a blank text falls back to the default.
    pub fn label(&self) -> &str {
        if self.button_text.is_empty() {
            text::DEFAULT_BUTTON_TEXT
        } else {
            &self.button_text
        }
    }
}

/// Result of a backend call, delivered back to the controller's loop.
pub enum ControllerEvent {
    AuthUrlLoaded(ApiResult<Envelope<AuthDescriptor>>),
    CodeExchanged(ApiResult<Envelope<ExchangeData>>),
}

type SuccessSink = Box<dyn FnMut(String) + Send>;

/// Drives the two-step authorization handshake.
///
/// Backend calls run on the tokio runtime and report back through an
/// internal channel; [`AuthController::process_events`] applies them on the
/// caller's loop. A result is only honored while the controller is mounted
/// and still in the state that issued the call.
pub struct AuthController {
    props: AuthButtonProps,
    session: AuthSession,
    backend: Arc<dyn BackendClient>,
    popup: Arc<dyn PopupOpener>,
    on_success: SuccessSink,
    toasts: VecDeque<Toast>,
    mounted: bool,
    in_flight: usize,
    event_tx: mpsc::UnboundedSender<ControllerEvent>,
    event_rx: mpsc::UnboundedReceiver<ControllerEvent>,
}

impl AuthController {
    pub fn new<F>(
        props: AuthButtonProps,
        backend: Arc<dyn BackendClient>,
        popup: Arc<dyn PopupOpener>,
        on_success: F,
    ) -> Self
    where
        F: FnMut(String) + Send + 'static,
    {
        let (event_tx, event_rx) = mpsc::unbounded_channel();

        Self {
            props,
            session: AuthSession::Idle,
            backend,
            popup,
            on_success: Box::new(on_success),
            toasts: VecDeque::new(),
            mounted: true,
            in_flight: 0,
            event_tx,
            event_rx,
        }
    }

    pub fn props(&self) -> &AuthButtonProps {
        &self.props
    }

    pub fn session(&self) -> &AuthSession {
        &self.session
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn has_pending_request(&self) -> bool {
        self.in_flight > 0
    }

    pub fn drain_toasts(&mut self) -> Vec<Toast> {
        self.toasts.drain(..).collect()
    }

    pub fn start_auth(&mut self) {
        if !self.mounted || self.props.disabled {
            debug!("Ignoring start_auth on a disabled or unmounted control");
            return;
        }
        if !self.session.is_idle() {
            debug!(state = self.session.name(), "Ignoring start_auth outside idle");
            return;
        }
        if self.props.provider.is_empty() {
            self.report_error(text::MISSING_PROVIDER);
            return;
        }

        let provider = self.props.provider.clone();
        info!(%provider, "Requesting OAuth2 authorization URL");
        self.session = AuthSession::Fetching;

        let backend = Arc::clone(&self.backend);
        self.spawn_request(async move {
            ControllerEvent::AuthUrlLoaded(backend.request_auth_url(&provider).await)
        });
    }

    pub fn set_code(&mut self, code: impl Into<String>) {
        if let AuthSession::AwaitingCode { code_input, .. } = &mut self.session {
            *code_input = code.into();
        }
    }

    pub fn submit(&mut self) {
        let (descriptor, code_input) = match std::mem::take(&mut self.session) {
            AuthSession::AwaitingCode {
                descriptor,
                code_input,
            } => (descriptor, code_input),
            other => {
                debug!(state = other.name(), "Ignoring submit outside awaiting_code");
                self.session = other;
                return;
            }
        };

        let code = code_input.trim();
        if code.is_empty() {
            self.session = AuthSession::AwaitingCode {
                descriptor,
                code_input,
            };
            self.report_error(text::EMPTY_CODE);
            return;
        }

        let request = ExchangeRequest {
            provider: descriptor.provider.clone(),
            code: code.to_string(),
            state: descriptor.state.clone(),
        };
        info!(provider = %request.provider, "Exchanging OAuth2 authorization code");
        self.session = AuthSession::Exchanging {
            descriptor,
            code_input,
        };

        let backend = Arc::clone(&self.backend);
        self.spawn_request(async move {
            ControllerEvent::CodeExchanged(backend.exchange_code(&request).await)
        });
    }

    pub fn reopen_popup(&self) {
        if let Some(descriptor) = self.session.descriptor() {
            self.popup.open(&descriptor.auth_url);
        }
    }

    pub fn cancel(&mut self) {
        if matches!(self.session, AuthSession::AwaitingCode { .. }) {
            self.session = AuthSession::Idle;
        } else {
            debug!(state = self.session.name(), "Ignoring cancel");
        }
    }

    /// Detaches the control. Results of calls still in flight are dropped.
    pub fn unmount(&mut self) {
        self.mounted = false;
        self.session = AuthSession::Idle;
    }

    /// Applies every backend result that has already arrived.
    pub fn process_events(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.event_rx.try_recv() {
            self.apply(event);
            applied += 1;
        }
        applied
    }

    /// Waits for the next backend result and applies it. Returns `false`
    /// when nothing is in flight.
    pub async fn next_event(&mut self) -> bool {
        if self.in_flight == 0 {
            return false;
        }
        match self.event_rx.recv().await {
            Some(event) => {
                self.apply(event);
                true
            }
            None => false,
        }
    }

    fn spawn_request<F>(&mut self, future: F)
    where
        F: Future<Output = ControllerEvent> + Send + 'static,
    {
        let tx = self.event_tx.clone();
        self.in_flight += 1;
        tokio::spawn(async move {
            let event = future.await;
            let _ = tx.send(event);
        });
    }

    fn apply(&mut self, event: ControllerEvent) {
        self.in_flight = self.in_flight.saturating_sub(1);
        if !self.mounted {
            debug!("Discarding backend result for an unmounted control");
            return;
        }

        match event {
            ControllerEvent::AuthUrlLoaded(result) => self.on_auth_url(result),
            ControllerEvent::CodeExchanged(result) => self.on_exchange(result),
        }
    }

    fn on_auth_url(&mut self, result: ApiResult<Envelope<AuthDescriptor>>) {
        if !matches!(self.session, AuthSession::Fetching) {
            debug!(state = self.session.name(), "Discarding stale authorization URL");
            return;
        }

        match result {
            Ok(envelope) => match envelope.into_result() {
                Ok(descriptor) => {
                    info!(
                        provider = %descriptor.provider,
                        use_pkce = descriptor.use_pkce,
                        code_format = descriptor.code_format.as_str(),
                        "Authorization URL received"
                    );
                    let auth_url = descriptor.auth_url.clone();
                    self.session = AuthSession::AwaitingCode {
                        descriptor,
                        code_input: String::new(),
                    };
                    self.popup.open(&auth_url);
                }
                Err(message) => {
                    warn!(?message, "Backend refused to issue an authorization URL");
                    self.session = AuthSession::Idle;
                    self.report_error(message.as_deref().unwrap_or(text::AUTH_URL_FAILED));
                }
            },
            Err(e) => {
                error!("Get OAuth2 auth URL error: {e}");
                self.session = AuthSession::Idle;
                self.report_error(text::AUTH_URL_NETWORK_FAILED);
            }
        }
    }

    fn on_exchange(&mut self, result: ApiResult<Envelope<ExchangeData>>) {
        let (descriptor, code_input) = match std::mem::take(&mut self.session) {
            AuthSession::Exchanging {
                descriptor,
                code_input,
            } => (descriptor, code_input),
            other => {
                debug!(state = other.name(), "Discarding stale exchange result");
                self.session = other;
                return;
            }
        };

        let failure = match result {
            Ok(envelope) => match envelope.into_result() {
                Ok(data) => {
                    info!(provider = %descriptor.provider, "OAuth2 authorization succeeded");
                    self.report_success(text::EXCHANGE_SUCCEEDED);
                    // Session is already Idle; reset before handing the token out.
                    (self.on_success)(data.refresh_token);
                    return;
                }
                Err(message) => {
                    warn!(?message, "Backend rejected the authorization code");
                    message.unwrap_or_else(|| text::EXCHANGE_FAILED.to_string())
                }
            },
            Err(e) => {
                error!("OAuth2 exchange error: {e}");
                text::EXCHANGE_NETWORK_FAILED.to_string()
            }
        };

        self.session = AuthSession::AwaitingCode {
            descriptor,
            code_input,
        };
        self.report_error(failure);
    }

    fn report_error(&mut self, message: impl Into<String>) {
        self.toasts.push_back(Toast::error(message));
    }

    fn report_success(&mut self, message: impl Into<String>) {
        self.toasts.push_back(Toast::success(message));
    }
}
