use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Unexpected HTTP status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed response envelope: {0}")]
    Decode(String),

    #[error("Invalid backend base URL: {0}")]
    InvalidBaseUrl(String),

    #[error("Operation not supported by this backend: {0}")]
    Unsupported(&'static str),
}

impl ApiError {
    pub fn user_message(&self) -> &'static str {
        match self {
            ApiError::Network(_) => "Network error. Check your connection.",
            ApiError::Status { .. } => "Server error. Please try again later.",
            ApiError::Decode(_) => "Unexpected response from the server.",
            ApiError::InvalidBaseUrl(_) => "Backend address is misconfigured.",
            ApiError::Unsupported(_) => "This backend does not support the operation.",
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
