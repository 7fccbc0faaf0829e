use thiserror::Error;

/// Machine-readable code the service returns when the user may not list instances.
pub const UNAUTHORIZED_USER_CODE: &str = "KAFKAS-MGMT-11";

/// Failure reported by one of the remote service calls.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    #[error("server returned {status}: {}", reason.as_deref().unwrap_or("no reason given"))]
    Server {
        status: u16,
        code: Option<String>,
        reason: Option<String>,
    },

    #[error("request failed: {0}")]
    Transport(String),

    #[error("failed to decode response: {0}")]
    Decode(String),
}

impl ServiceError {
    pub fn code(&self) -> Option<&str> {
        match self {
            ServiceError::Server { code, .. } => code.as_deref(),
            _ => None,
        }
    }

    /// Human-readable reason supplied by the server, if any.
    pub fn reason(&self) -> Option<&str> {
        match self {
            ServiceError::Server { reason, .. } => reason.as_deref(),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.code() == Some(UNAUTHORIZED_USER_CODE)
    }
}

#[derive(Debug, Error)]
pub enum ConsoleError {
    #[error("instance '{0}' has no id, refusing to call delete")]
    MissingInstanceId(String),

    #[error("typed name does not match instance '{0}'")]
    ConfirmationRequired(String),

    #[error("delete confirmation for '{0}' is already closed")]
    GateClosed(String),

    #[error(transparent)]
    Service(#[from] ServiceError),
}

pub type Result<T> = std::result::Result<T, ConsoleError>;
