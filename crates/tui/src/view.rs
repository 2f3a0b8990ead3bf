//! Toolkit-independent projection of the control. The render layer only
//! draws what this module computes.

use crate::controller::{AuthButtonProps, AuthSession, ButtonVariant};
use crate::text;
use oauth2_auth_backend::CodeFormat;

#[derive(Debug, Clone, PartialEq)]
pub struct ButtonView {
    pub label: String,
    pub variant: ButtonVariant,
    pub enabled: bool,
    pub loading: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ActionView {
    pub label: &'static str,
    pub enabled: bool,
    pub spinner: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CodeInputView {
    pub label: &'static str,
    pub value: String,
    pub placeholder: &'static str,
    pub helper: &'static str,
    pub disabled: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DialogView {
    pub title: &'static str,
    pub subtitle: Option<&'static str>,
    pub steps_title: &'static str,
    pub steps: [&'static str; 5],
    pub warning: Option<&'static str>,
    pub link_label: &'static str,
    pub link_text: &'static str,
    pub auth_url: String,
    pub reopen: ActionView,
    pub input: CodeInputView,
    pub cancel: ActionView,
    pub submit: ActionView,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AuthView {
    pub button: ButtonView,
    pub dialog: Option<DialogView>,
}

impl AuthView {
    pub fn project(props: &AuthButtonProps, session: &AuthSession) -> Self {
        let loading = session.is_loading();

        let button = ButtonView {
            label: if loading {
                text::LOADING.to_string()
            } else {
                props.label().to_string()
            },
            variant: props.button_variant,
            enabled: !props.disabled && !loading,
            loading,
        };

        let dialog = match (session.descriptor(), session.code_input()) {
            (Some(descriptor), Some(code_input)) => {
                let exchanging = matches!(session, AuthSession::Exchanging { .. });
                let code_state = descriptor.code_format == CodeFormat::CodeWithState;

                Some(DialogView {
                    title: text::DIALOG_TITLE,
                    subtitle: descriptor.use_pkce.then_some(text::PKCE_SUBTITLE),
                    steps_title: text::STEPS_TITLE,
                    steps: text::STEPS,
                    warning: code_state.then_some(text::CODE_STATE_WARNING),
                    link_label: text::LINK_LABEL,
                    link_text: text::LINK_TEXT,
                    auth_url: descriptor.auth_url.clone(),
                    reopen: ActionView {
                        label: text::REOPEN,
                        enabled: true,
                        spinner: false,
                    },
                    input: CodeInputView {
                        label: text::CODE_LABEL,
                        value: code_input.to_string(),
                        placeholder: if code_state {
                            text::CODE_STATE_PLACEHOLDER
                        } else {
                            text::CODE_PLACEHOLDER
                        },
                        helper: text::CODE_HELPER,
                        disabled: exchanging,
                    },
                    cancel: ActionView {
                        label: text::CANCEL,
                        enabled: !loading,
                        spinner: false,
                    },
                    submit: ActionView {
                        label: if exchanging {
                            text::EXCHANGING
                        } else {
                            text::SUBMIT
                        },
                        enabled: !loading && !code_input.trim().is_empty(),
                        spinner: exchanging,
                    },
                })
            }
            _ => None,
        };

        Self { button, dialog }
    }
}
