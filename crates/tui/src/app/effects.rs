use super::*;

impl App {
    /// Best-effort lookup of the configured provider's display metadata.
    pub fn init(&mut self) {
        let backend = Arc::clone(&self.backend);
        self.spawn_app_task(async move {
            match backend.list_providers().await {
                Ok(envelope) => match envelope.into_result() {
                    Ok(providers) => AppAsyncEvent::ProvidersLoaded {
                        providers: Some(providers),
                        error: None,
                    },
                    Err(message) => AppAsyncEvent::ProvidersLoaded {
                        providers: None,
                        error: Some(message.unwrap_or_else(|| "empty provider list".to_string())),
                    },
                },
                Err(e) => AppAsyncEvent::ProvidersLoaded {
                    providers: None,
                    error: Some(e.to_string()),
                },
            }
        });
    }

    pub(super) fn verify_token(&mut self, refresh_token: String) {
        let provider = self.config.button.provider.clone();
        let backend = Arc::clone(&self.backend);
        self.token_status = Some(TokenStatus::Checking);
        self.spawn_app_task(async move {
            let request = TokenTestRequest {
                provider,
                refresh_token,
            };
            match backend.test_token(&request).await {
                Ok(envelope) => match envelope.into_result() {
                    Ok(data) => AppAsyncEvent::TokenChecked {
                        valid: data.valid,
                        expires_in: data.expires_in,
                        error: None,
                    },
                    Err(message) => AppAsyncEvent::TokenChecked {
                        valid: false,
                        expires_in: None,
                        error: Some(message.unwrap_or_else(|| "token validation failed".to_string())),
                    },
                },
                Err(e) => AppAsyncEvent::TokenChecked {
                    valid: false,
                    expires_in: None,
                    error: Some(e.user_message().to_string()),
                },
            }
        });
    }

    pub fn process_events(&mut self) {
        self.tick = self.tick.wrapping_add(1);

        self.controller.process_events();
        for toast in self.controller.drain_toasts() {
            if toast.is_error() {
                tracing::warn!("{}", toast.message);
            } else {
                tracing::info!("{}", toast.message);
            }
            self.last_toast = Some(toast);
        }

        let mut async_events = Vec::new();
        if let Some(ref mut rx) = self.app_async_rx {
            while let Ok(event) = rx.try_recv() {
                async_events.push(event);
            }
        }

        for event in async_events {
            match event {
                AppAsyncEvent::ProvidersLoaded { providers, error } => {
                    if let Some(err) = error {
                        tracing::debug!("Provider list unavailable: {err}");
                    } else if let Some(providers) = providers {
                        self.provider_info = providers.get(&self.config.button.provider).cloned();
                    }
                }
                AppAsyncEvent::TokenIssued { refresh_token } => {
                    tracing::info!("Refresh token received (redacted)");
                    self.refresh_token = Some(refresh_token.clone());
                    self.token_status = None;
                    if self.config.backend.verify_token {
                        self.verify_token(refresh_token);
                    }
                }
                AppAsyncEvent::TokenChecked {
                    valid,
                    expires_in,
                    error,
                } => {
                    self.token_status = Some(match error {
                        Some(err) => TokenStatus::Invalid(err),
                        None if valid => TokenStatus::Valid { expires_in },
                        None => TokenStatus::Invalid("token rejected".to_string()),
                    });
                }
            }
        }
    }

    /// Unmounts the control and stops the loop.
    pub fn quit(&mut self) {
        self.controller.unmount();
        self.should_quit = true;
    }
}
