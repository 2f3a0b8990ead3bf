use serde::{Deserialize, Serialize};
use std::fmt;

/// Response wrapper shared by every `/api/oauth2/*` endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub message: Option<String>,
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
        }
    }

    pub fn failure(message: Option<&str>) -> Self {
        Self {
            success: false,
            message: message.map(str::to_string),
            data: None,
        }
    }

    /// Server-provided failure text. An empty string counts as absent.
    pub fn failure_message(&self) -> Option<&str> {
        self.message.as_deref().filter(|m| !m.is_empty())
    }

    /// Splits the envelope into its payload or the failure text to show.
    ///
    /// `success: true` without `data` is a failure with no usable message;
    /// the message of a successful envelope is informational only.
    pub fn into_result(self) -> Result<T, Option<String>> {
        if self.success {
            return self.data.ok_or(None);
        }
        Err(self.failure_message().map(str::to_string))
    }
}

/// How the identity provider presents the authorization code to the user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CodeFormat {
    #[default]
    Code,
    CodeWithState,
}

impl CodeFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            CodeFormat::Code => "code",
            CodeFormat::CodeWithState => "code#state",
        }
    }
}

impl From<String> for CodeFormat {
    fn from(value: String) -> Self {
        if value == "code#state" {
            CodeFormat::CodeWithState
        } else {
            CodeFormat::Code
        }
    }
}

impl From<CodeFormat> for String {
    fn from(value: CodeFormat) -> Self {
        value.as_str().to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthDescriptor {
    pub provider: String,
    pub auth_url: String,
    pub state: String,
    #[serde(default)]
    pub use_pkce: bool,
    #[serde(default)]
    pub code_format: CodeFormat,
}

#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct ExchangeRequest {
    pub provider: String,
    pub code: String,
    pub state: String,
}

impl fmt::Debug for ExchangeRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExchangeRequest")
            .field("provider", &self.provider)
            .field("code", &"[REDACTED]")
            .field("state", &"[REDACTED]")
            .finish()
    }
}

#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct ExchangeData {
    pub refresh_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<i64>,
}

impl fmt::Debug for ExchangeData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExchangeData")
            .field("refresh_token", &"[REDACTED]")
            .field("access_token", &self.access_token.as_ref().map(|_| "[REDACTED]"))
            .field("expires_in", &self.expires_in)
            .finish()
    }
}

/// Entry of the `/api/oauth2/providers` listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderInfo {
    pub display_name: String,
    #[serde(default)]
    pub help_text: String,
    #[serde(default)]
    pub icon_url: String,
    #[serde(default)]
    pub code_format: CodeFormat,
}

#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenTestRequest {
    pub provider: String,
    pub refresh_token: String,
}

impl fmt::Debug for TokenTestRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenTestRequest")
            .field("provider", &self.provider)
            .field("refresh_token", &"[REDACTED]")
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenTestData {
    pub valid: bool,
    #[serde(default)]
    pub expires_in: Option<i64>,
}
