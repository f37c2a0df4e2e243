use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Malformed response: {0}")]
    Decode(String),

    #[error("Backend error: {0}")]
    Service(String),

    #[error("Timeout: {0}")]
    Timeout(String),
}

impl ApiError {
    pub fn user_message(&self) -> &'static str {
        match self {
            ApiError::Network(_) => "Network error. Check the webmail host and your connection.",
            ApiError::Decode(_) => "The backend sent an unexpected response. Try again later.",
            ApiError::Service(_) => "The backend rejected the request.",
            ApiError::Timeout(_) => "Request timed out. Please try again.",
        }
    }
}

pub fn map_anyhow_error(error: &anyhow::Error) -> ApiError {
    if let Some(req_err) = error.downcast_ref::<reqwest::Error>() {
        if req_err.is_timeout() {
            return ApiError::Timeout(error.to_string());
        }
        if req_err.is_decode() {
            return ApiError::Decode(error.to_string());
        }
        return ApiError::Network(error.to_string());
    }

    let msg = error.to_string();
    let lower = msg.to_lowercase();
    if lower.contains("timeout") || lower.contains("timed out") {
        ApiError::Timeout(msg)
    } else if lower.contains("decode") || lower.contains("parse") {
        ApiError::Decode(msg)
    } else if lower.contains("connect") || lower.contains("network") || lower.contains("reach") {
        ApiError::Network(msg)
    } else {
        ApiError::Service(msg)
    }
}
