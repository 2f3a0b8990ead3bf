use crate::controller::{AuthButtonProps, ButtonVariant};
use crate::text;
use anyhow::{Context, Result};
use oauth2_auth_backend::ClientOptions;
use oauth2_auth_popup::PopupGeometry;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub backend: BackendConfig,
    pub button: ButtonConfig,
    pub popup: PopupConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    pub base_url: String,
    pub connect_timeout_seconds: u64,
    pub timeout_seconds: u64,
    pub user_agent: String,
    /// Ask the backend to validate a freshly issued refresh token.
    pub verify_token: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ButtonConfig {
    pub provider: String,
    pub text: String,
    pub variant: ButtonVariant,
    pub disabled: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PopupConfig {
    /// Empty means the system browser.
    pub command: Vec<String>,
    #[serde(flatten)]
    pub geometry: PopupGeometry,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            connect_timeout_seconds: 5,
            timeout_seconds: 20,
            user_agent: "oauth2-auth/0.1".to_string(),
            verify_token: false,
        }
    }
}

impl Default for ButtonConfig {
    fn default() -> Self {
        Self {
            provider: String::new(),
            text: text::DEFAULT_BUTTON_TEXT.to_string(),
            variant: ButtonVariant::Contained,
            disabled: false,
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let config: Config =
            toml::from_str(&content).with_context(|| format!("parsing {}", path.display()))?;
        Ok(config)
    }

    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        Self::load(path).unwrap_or_else(|e| {
            tracing::warn!("Falling back to default config: {e:#}");
            Self::default()
        })
    }

    pub fn button_props(&self) -> AuthButtonProps {
        AuthButtonProps::new(self.button.provider.clone())
            .disabled(self.button.disabled)
            .button_text(self.button.text.clone())
            .button_variant(self.button.variant)
    }

    pub fn client_options(&self) -> ClientOptions {
        ClientOptions {
            connect_timeout: Duration::from_secs(self.backend.connect_timeout_seconds),
            timeout: Duration::from_secs(self.backend.timeout_seconds),
            user_agent: self.backend.user_agent.clone(),
        }
    }

    pub fn popup_geometry(&self) -> PopupGeometry {
        self.popup.geometry
    }
}
