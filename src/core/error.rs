//! API error taxonomy
//!
//! Every failure of a backend call resolves to one of these variants. None of
//! them is fatal: the UI turns each into a notification plus a safe state change.

use crate::core::models::MessageBody;

/// Errors produced by the REST client
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    /// 400 / 422: rejected input
    #[error("Validation error: {0}")]
    Validation(String),

    /// 401 that could not be recovered by a token refresh
    #[error("Unauthorized")]
    Unauthorized,

    /// 403: authenticated but not allowed
    #[error("Forbidden")]
    Forbidden,

    #[error("Not found")]
    NotFound,

    /// Any other non-success status
    #[error("Server error {status}: {message}")]
    Server { status: u16, message: String },

    /// The request never produced a response
    #[error("Network error: {0}")]
    Network(String),

    /// The response body did not match the expected shape
    #[error("Invalid response: {0}")]
    Decode(String),

    /// The refresh token was rejected; the local session was cleared
    #[error("Session expired")]
    SessionExpired,
}

impl ApiError {
    /// Map a non-success status and its body to an error.
    ///
    /// The backend reports failures as `{ "message": "..." }`; the message is
    /// kept when present.
    pub fn from_status(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<MessageBody>(body)
            .ok()
            .and_then(|b| b.message)
            .filter(|m| !m.trim().is_empty());

        match status {
            400 | 422 => {
                ApiError::Validation(message.unwrap_or_else(|| "Requête invalide".to_string()))
            }
            401 => ApiError::Unauthorized,
            403 => ApiError::Forbidden,
            404 => ApiError::NotFound,
            _ => ApiError::Server {
                status,
                message: message.unwrap_or_else(|| format!("Erreur {status}")),
            },
        }
    }

    /// HTTP status the error came from, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Validation(_) => Some(400),
            ApiError::Unauthorized | ApiError::SessionExpired => Some(401),
            ApiError::Forbidden => Some(403),
            ApiError::NotFound => Some(404),
            ApiError::Server { status, .. } => Some(*status),
            ApiError::Network(_) | ApiError::Decode(_) => None,
        }
    }

    /// Message suitable for a toast or an inline form error
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Validation(message) => message.clone(),
            ApiError::Unauthorized => "Veuillez vous connecter".to_string(),
            ApiError::SessionExpired => "Session expirée, veuillez vous reconnecter".to_string(),
            ApiError::Forbidden => "Accès refusé".to_string(),
            ApiError::NotFound => "Ressource introuvable".to_string(),
            ApiError::Server { message, .. } => message.clone(),
            ApiError::Network(_) => "Impossible de joindre le serveur".to_string(),
            ApiError::Decode(_) => "Réponse inattendue du serveur".to_string(),
        }
    }

    /// The backend's own message when it sent one, for auth forms
    pub fn backend_message(&self) -> Option<&str> {
        match self {
            ApiError::Validation(message) | ApiError::Server { message, .. } => Some(message),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Decode(err.to_string())
    }
}
