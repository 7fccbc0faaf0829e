use streams_core::ServiceError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error ({status}): {}", reason.as_deref().unwrap_or("unknown"))]
    Api {
        status: u16,
        code: Option<String>,
        reason: Option<String>,
    },

    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ClientError>;

impl From<ClientError> for ServiceError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Api {
                status,
                code,
                reason,
            } => ServiceError::Server {
                status,
                code,
                reason,
            },
            ClientError::Http(e) if e.is_decode() => ServiceError::Decode(e.to_string()),
            ClientError::Http(e) => ServiceError::Transport(e.to_string()),
            ClientError::InvalidUrl(url) => {
                ServiceError::Transport(format!("invalid URL: {}", url))
            }
            ClientError::Decode(e) => ServiceError::Decode(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_keeps_code_and_reason() {
        let err = ClientError::Api {
            status: 403,
            code: Some("KAFKAS-MGMT-11".to_string()),
            reason: Some("not allowed".to_string()),
        };
        assert_eq!(err.to_string(), "API error (403): not allowed");

        let service: ServiceError = err.into();
        assert!(service.is_unauthorized());
        assert_eq!(service.reason(), Some("not allowed"));
    }

    #[test]
    fn test_decode_error_maps_to_decode() {
        let err = serde_json::from_str::<u32>("nope").unwrap_err();
        let service: ServiceError = ClientError::from(err).into();
        assert!(matches!(service, ServiceError::Decode(_)));
    }
}
