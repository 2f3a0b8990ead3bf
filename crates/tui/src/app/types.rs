use oauth2_auth_backend::ProviderInfo;
use std::collections::BTreeMap;

pub enum AppAsyncEvent {
    ProvidersLoaded {
        providers: Option<BTreeMap<String, ProviderInfo>>,
        error: Option<String>,
    },
    TokenIssued {
        refresh_token: String,
    },
    TokenChecked {
        valid: bool,
        expires_in: Option<i64>,
        error: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum TokenStatus {
    Checking,
    Valid { expires_in: Option<i64> },
    Invalid(String),
}
