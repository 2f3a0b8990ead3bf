use oauth2_auth_backend::AuthDescriptor;

/// Live state of one authorization attempt.
///
/// Dialog visibility and the loading indicator are derived from the
/// variant rather than stored separately.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum AuthSession {
    #[default]
    Idle,
    Fetching,
    AwaitingCode {
        descriptor: AuthDescriptor,
        code_input: String,
    },
    Exchanging {
        descriptor: AuthDescriptor,
        code_input: String,
    },
}

impl AuthSession {
    pub fn is_idle(&self) -> bool {
        matches!(self, AuthSession::Idle)
    }

    pub fn is_dialog_open(&self) -> bool {
        matches!(
            self,
            AuthSession::AwaitingCode { .. } | AuthSession::Exchanging { .. }
        )
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, AuthSession::Fetching | AuthSession::Exchanging { .. })
    }

    pub fn descriptor(&self) -> Option<&AuthDescriptor> {
        match self {
            AuthSession::AwaitingCode { descriptor, .. }
            | AuthSession::Exchanging { descriptor, .. } => Some(descriptor),
            _ => None,
        }
    }

    pub fn code_input(&self) -> Option<&str> {
        match self {
            AuthSession::AwaitingCode { code_input, .. }
            | AuthSession::Exchanging { code_input, .. } => Some(code_input),
            _ => None,
        }
    }

    /// Primary action is only available while editing a non-blank code.
    pub fn can_submit(&self) -> bool {
        match self {
            AuthSession::AwaitingCode { code_input, .. } => !code_input.trim().is_empty(),
            _ => false,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            AuthSession::Idle => "idle",
            AuthSession::Fetching => "fetching",
            AuthSession::AwaitingCode { .. } => "awaiting_code",
            AuthSession::Exchanging { .. } => "exchanging",
        }
    }
}
