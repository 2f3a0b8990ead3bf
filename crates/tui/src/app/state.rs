use super::*;

pub struct App {
    pub should_quit: bool,
    pub config: Config,
    pub controller: AuthController,
    pub backend: Arc<dyn BackendClient>,
    pub keybinds: Keybinds,
    pub show_help: bool,
    pub provider_info: Option<ProviderInfo>,
    pub refresh_token: Option<String>,
    pub token_status: Option<TokenStatus>,
    pub last_toast: Option<Toast>,
    pub tick: u64,
    pub app_async_tx: Option<mpsc::UnboundedSender<AppAsyncEvent>>,
    pub app_async_rx: Option<mpsc::UnboundedReceiver<AppAsyncEvent>>,
}

impl App {
    pub fn new(
        config: Config,
        backend: Arc<dyn BackendClient>,
        popup: Arc<dyn PopupOpener>,
    ) -> Self {
        let (app_async_tx, app_async_rx) = mpsc::unbounded_channel();

        let token_tx = app_async_tx.clone();
        let controller = AuthController::new(
            config.button_props(),
            Arc::clone(&backend),
            popup,
            move |refresh_token| {
                let _ = token_tx.send(AppAsyncEvent::TokenIssued { refresh_token });
            },
        );

        Self {
            should_quit: false,
            config,
            controller,
            backend,
            keybinds: Keybinds,
            show_help: false,
            provider_info: None,
            refresh_token: None,
            token_status: None,
            last_toast: None,
            tick: 0,
            app_async_tx: Some(app_async_tx),
            app_async_rx: Some(app_async_rx),
        }
    }

    pub fn from_config(config: Config) -> Result<Self> {
        let backend =
            HttpBackendClient::with_options(&config.backend.base_url, config.client_options())?;
        let popup = CommandPopupOpener::new()
            .with_command(config.popup.command.clone())
            .with_geometry(config.popup_geometry());

        Ok(Self::new(config, Arc::new(backend), Arc::new(popup)))
    }
}
