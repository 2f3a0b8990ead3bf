use crate::controller::{AuthController, AuthSession, ButtonVariant, Toast};
use crate::keybinds::Keybinds;
use crate::ui::layout;
use crate::view::AuthView;
use crate::Config;
use anyhow::Result;
use oauth2_auth_backend::{BackendClient, HttpBackendClient, ProviderInfo, TokenTestRequest};
use oauth2_auth_popup::{CommandPopupOpener, PopupOpener};
use ratatui::crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::layout::Rect;
use ratatui::Frame;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::mpsc;

mod effects;
mod input;
mod render;
mod state;
mod types;

pub use state::App;
pub use types::{AppAsyncEvent, TokenStatus};

impl App {
    pub(super) fn spawn_app_task<F>(&self, future: F)
    where
        F: Future<Output = AppAsyncEvent> + Send + 'static,
    {
        if let Some(tx) = self.app_async_tx.clone() {
            tokio::spawn(async move {
                let event = future.await;
                let _ = tx.send(event);
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::render::redact_token;
    use super::{App, TokenStatus};
    use crate::controller::testing::{descriptor, issued, FakeBackend, RecordingPopup, Reply};
    use crate::controller::AuthSession;
    use crate::Config;
    use oauth2_auth_backend::{CodeFormat, Envelope, ProviderInfo};
    use pretty_assertions::assert_eq;
    use ratatui::backend::TestBackend;
    use ratatui::crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
    use ratatui::Terminal;
    use std::collections::BTreeMap;
    use std::sync::Arc;

    fn config(provider: &str) -> Config {
        let mut config = Config::default();
        config.button.provider = provider.to_string();
        config
    }

    fn app_with(config: Config) -> (App, Arc<FakeBackend>, Arc<RecordingPopup>) {
        let backend = FakeBackend::new();
        let popup = RecordingPopup::new();
        let app = App::new(config, backend.clone(), popup.clone());
        (app, backend, popup)
    }

    async fn settle(app: &mut App) {
        for _ in 0..10 {
            tokio::task::yield_now().await;
            app.process_events();
        }
    }

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn ctrl(c: char) -> Event {
        Event::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL))
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle_event(key(KeyCode::Char(c))).expect("key");
        }
    }

    /// Screen contents with blanks removed, so wide glyph padding does not
    /// break substring checks.
    fn screen(app: &mut App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(110, 40)).expect("terminal");
        terminal.draw(|frame| app.render(frame)).expect("draw");
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect::<String>()
            .replace(' ', "")
    }

    fn shows(screen: &str, text: &str) -> bool {
        screen.contains(&text.replace(' ', ""))
    }

    #[tokio::test]
    async fn keyboard_flow_delivers_token_to_host() {
        let (mut app, backend, popup) = app_with(config("google"));
        backend.reply_auth(Reply::Envelope(Envelope::ok(descriptor(
            "google",
            "S1",
            CodeFormat::Code,
        ))));
        backend.reply_exchange(Reply::Envelope(Envelope::ok(issued("RT-0123456789"))));

        app.handle_event(key(KeyCode::Enter)).expect("start");
        settle(&mut app).await;
        assert_eq!(popup.opened(), vec!["https://x/auth".to_string()]);

        type_text(&mut app, " abc ");
        app.handle_event(key(KeyCode::Enter)).expect("submit");
        settle(&mut app).await;

        assert_eq!(backend.exchange_requests()[0].code, "abc");
        assert_eq!(app.refresh_token.as_deref(), Some("RT-0123456789"));
        assert!(app.controller.session().is_idle());
        assert_eq!(
            app.last_toast.as_ref().map(|t| t.message.as_str()),
            Some("授权成功！")
        );
        assert!(backend.token_tests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn dialog_keys_edit_reopen_and_cancel() {
        let (mut app, backend, popup) = app_with(config("google"));
        backend.reply_auth(Reply::Envelope(Envelope::ok(descriptor(
            "google",
            "S1",
            CodeFormat::Code,
        ))));

        app.handle_event(key(KeyCode::Char(' '))).expect("start");
        settle(&mut app).await;

        type_text(&mut app, "ab?");
        app.handle_event(key(KeyCode::Backspace)).expect("backspace");
        app.handle_event(Event::Key(KeyEvent::new(KeyCode::Enter, KeyModifiers::ALT)))
            .expect("newline");
        app.handle_event(Event::Paste("#xyz".to_string())).expect("paste");
        assert_eq!(app.controller.session().code_input(), Some("ab\n#xyz"));
        assert!(!app.show_help);

        app.handle_event(ctrl('r')).expect("reopen");
        assert_eq!(popup.opened().len(), 2);

        app.handle_event(ctrl('u')).expect("clear");
        assert_eq!(app.controller.session().code_input(), Some(""));

        app.handle_event(key(KeyCode::Esc)).expect("cancel");
        assert_eq!(app.controller.session(), &AuthSession::Idle);
    }

    #[tokio::test]
    async fn altgr_characters_are_typed_into_code() {
        let (mut app, backend, _popup) = app_with(config("claude"));
        backend.reply_auth(Reply::Envelope(Envelope::ok(descriptor(
            "claude",
            "S1",
            CodeFormat::CodeWithState,
        ))));

        app.handle_event(key(KeyCode::Enter)).expect("start");
        settle(&mut app).await;
        type_text(&mut app, "abc");
        app.handle_event(Event::Key(KeyEvent::new(
            KeyCode::Char('#'),
            KeyModifiers::CONTROL | KeyModifiers::ALT,
        )))
        .expect("altgr");
        app.handle_event(ctrl('x')).expect("ignored");
        type_text(&mut app, "xyz");

        assert_eq!(app.controller.session().code_input(), Some("abc#xyz"));
    }

    #[tokio::test]
    async fn oversized_button_text_renders() {
        let mut cfg = config("google");
        cfg.button.text = "授".repeat(40_000);
        let (mut app, _backend, _popup) = app_with(cfg);

        assert!(shows(&screen(&mut app), "授授授"));
    }

    #[tokio::test]
    async fn empty_code_submission_shows_toast() {
        let (mut app, backend, _popup) = app_with(config("google"));
        backend.reply_auth(Reply::Envelope(Envelope::ok(descriptor(
            "google",
            "S1",
            CodeFormat::Code,
        ))));

        app.handle_event(key(KeyCode::Enter)).expect("start");
        settle(&mut app).await;
        app.handle_event(key(KeyCode::Enter)).expect("submit");
        app.process_events();

        assert_eq!(
            app.last_toast.as_ref().map(|t| t.message.as_str()),
            Some("请输入授权码")
        );
        assert!(backend.exchange_requests().is_empty());
    }

    #[tokio::test]
    async fn missing_provider_reports_error_without_request() {
        let (mut app, backend, _popup) = app_with(config(""));

        app.handle_event(key(KeyCode::Enter)).expect("start");
        settle(&mut app).await;

        assert!(backend.auth_requests().is_empty());
        let toast = app.last_toast.clone().expect("toast");
        assert!(toast.is_error());
        assert_eq!(toast.message, "未指定 Provider");
        assert!(shows(&screen(&mut app), "未指定 Provider"));
    }

    #[tokio::test]
    async fn provider_metadata_is_loaded_on_init() {
        let (mut app, backend, _popup) = app_with(config("claude"));
        let mut providers = BTreeMap::new();
        providers.insert(
            "claude".to_string(),
            ProviderInfo {
                display_name: "Claude".to_string(),
                help_text: "Use your Claude.ai account".to_string(),
                icon_url: String::new(),
                code_format: CodeFormat::CodeWithState,
            },
        );
        *backend.providers.lock().unwrap() = Some(providers);

        app.init();
        settle(&mut app).await;

        assert_eq!(
            app.provider_info.as_ref().map(|p| p.display_name.as_str()),
            Some("Claude")
        );
        assert!(shows(&screen(&mut app), "Provider: Claude (claude)"));
    }

    #[tokio::test]
    async fn provider_listing_failure_is_ignored() {
        let (mut app, _backend, _popup) = app_with(config("claude"));

        app.init();
        settle(&mut app).await;

        assert!(app.provider_info.is_none());
        assert!(app.last_toast.is_none());
    }

    #[tokio::test]
    async fn issued_token_is_verified_when_enabled() {
        let mut cfg = config("google");
        cfg.backend.verify_token = true;
        let (mut app, backend, _popup) = app_with(cfg);
        backend.reply_auth(Reply::Envelope(Envelope::ok(descriptor(
            "google",
            "S1",
            CodeFormat::Code,
        ))));
        backend.reply_exchange(Reply::Envelope(Envelope::ok(issued("RT"))));

        app.handle_event(key(KeyCode::Enter)).expect("start");
        settle(&mut app).await;
        type_text(&mut app, "abc");
        app.handle_event(key(KeyCode::Enter)).expect("submit");
        settle(&mut app).await;

        let checks = backend.token_tests.lock().unwrap().clone();
        assert_eq!(checks.len(), 1);
        assert_eq!(checks[0].provider, "google");
        assert_eq!(checks[0].refresh_token, "RT");
        assert_eq!(
            app.token_status,
            Some(TokenStatus::Valid {
                expires_in: Some(3600)
            })
        );
    }

    #[tokio::test]
    async fn dialog_renders_instructions_and_warning() {
        let (mut app, backend, _popup) = app_with(config("claude"));
        backend.reply_auth(Reply::Envelope(Envelope::ok(descriptor(
            "claude",
            "S1",
            CodeFormat::CodeWithState,
        ))));

        app.handle_event(key(KeyCode::Enter)).expect("start");
        settle(&mut app).await;
        let text = screen(&mut app);

        for expected in [
            "OAuth2 授权",
            "使用 PKCE 安全授权",
            "授权步骤",
            "1. 点击下方链接打开授权页面",
            "5. 点击\"确认授权\"按钮完成",
            "注意：授权码格式为 code#state，请完整复制（包含 # 符号）",
            "授权链接：",
            "点击此处打开授权页面",
            "重新打开",
            "https://x/auth",
            "例如：abc123#xyz789",
            "请完整复制授权后显示的授权码",
            "取消",
            "确认授权",
        ] {
            assert!(shows(&text, expected), "missing {expected:?}");
        }
    }

    #[tokio::test]
    async fn plain_format_has_no_warning() {
        let (mut app, backend, _popup) = app_with(config("google"));
        backend.reply_auth(Reply::Envelope(Envelope::ok(descriptor(
            "google",
            "S1",
            CodeFormat::Code,
        ))));

        app.handle_event(key(KeyCode::Enter)).expect("start");
        settle(&mut app).await;
        let text = screen(&mut app);

        assert!(shows(&text, "粘贴授权码"));
        assert!(!shows(&text, "注意："));
    }

    #[tokio::test]
    async fn help_overlay_toggles_outside_dialog() {
        let (mut app, _backend, _popup) = app_with(config("google"));

        app.handle_event(key(KeyCode::Char('?'))).expect("help");
        assert!(app.show_help);
        assert!(shows(&screen(&mut app), "Keyboard Shortcuts:"));

        app.handle_event(key(KeyCode::Enter)).expect("ignored");
        assert!(app.controller.session().is_idle());

        app.handle_event(key(KeyCode::Esc)).expect("close");
        assert!(!app.show_help);
    }

    #[tokio::test]
    async fn quit_unmounts_the_control() {
        let (mut app, backend, popup) = app_with(config("google"));
        backend.reply_auth(Reply::Envelope(Envelope::ok(descriptor(
            "google",
            "S1",
            CodeFormat::Code,
        ))));

        app.handle_event(key(KeyCode::Enter)).expect("start");
        let quit = app.handle_event(ctrl('q')).expect("quit");
        settle(&mut app).await;

        assert!(quit);
        assert!(app.should_quit);
        assert!(!app.controller.is_mounted());
        assert!(popup.opened().is_empty());
    }

    #[test]
    fn redaction_keeps_short_prefix() {
        assert_eq!(redact_token("RT-0123456789"), "RT-012…[REDACTED]");
        assert_eq!(redact_token("RT"), "[REDACTED]");
    }
}
