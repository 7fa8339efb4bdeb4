//! User-facing notices and geolocation failures

use crate::core::error::ApiError;

/// Default time before a toast disappears
pub const DEFAULT_DISMISS_MS: u32 = 5000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
    Warning,
    Info,
}

impl NoticeKind {
    pub fn css_class(self) -> &'static str {
        match self {
            NoticeKind::Success => "toast-success",
            NoticeKind::Error => "toast-error",
            NoticeKind::Warning => "toast-warning",
            NoticeKind::Info => "toast-info",
        }
    }
}

/// A message to show as a toast
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
    /// `None` keeps the toast until dismissed
    pub auto_dismiss_ms: Option<u32>,
}

impl Notice {
    fn new(kind: NoticeKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            auto_dismiss_ms: Some(DEFAULT_DISMISS_MS),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NoticeKind::Success, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NoticeKind::Error, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(NoticeKind::Warning, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NoticeKind::Info, message)
    }

    pub fn sticky(mut self) -> Self {
        self.auto_dismiss_ms = None;
        self
    }
}

impl From<&ApiError> for Notice {
    fn from(err: &ApiError) -> Self {
        match err {
            ApiError::SessionExpired => Notice::warning(err.user_message()),
            _ => Notice::error(err.user_message()),
        }
    }
}

/// Why the browser could not provide a position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeolocationFailure {
    PermissionDenied,
    PositionUnavailable,
    Timeout,
    Unsupported,
    Unknown,
}

/// Time allowed for a high-accuracy fix
pub const GEOLOCATION_TIMEOUT_MS: u32 = 10_000;

impl GeolocationFailure {
    /// Map a `GeolocationPositionError.code`
    pub fn from_code(code: u16) -> Self {
        match code {
            1 => GeolocationFailure::PermissionDenied,
            2 => GeolocationFailure::PositionUnavailable,
            3 => GeolocationFailure::Timeout,
            _ => GeolocationFailure::Unknown,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            GeolocationFailure::PermissionDenied => "Accès à la position refusé",
            GeolocationFailure::PositionUnavailable => "Position non disponible",
            GeolocationFailure::Timeout => "Délai de récupération dépassé",
            GeolocationFailure::Unsupported => {
                "La géolocalisation n'est pas supportée par votre navigateur"
            }
            GeolocationFailure::Unknown => "Erreur de géolocalisation",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geolocation_codes() {
        assert_eq!(
            GeolocationFailure::from_code(1).message(),
            "Accès à la position refusé"
        );
        assert_eq!(
            GeolocationFailure::from_code(2),
            GeolocationFailure::PositionUnavailable
        );
        assert_eq!(GeolocationFailure::from_code(3), GeolocationFailure::Timeout);
        assert_eq!(
            GeolocationFailure::from_code(9).message(),
            "Erreur de géolocalisation"
        );
    }

    #[test]
    fn test_notice_from_api_error() {
        let notice = Notice::from(&ApiError::Forbidden);
        assert_eq!(notice.kind, NoticeKind::Error);
        assert_eq!(notice.message, "Accès refusé");
        assert_eq!(Notice::from(&ApiError::SessionExpired).kind, NoticeKind::Warning);
    }

    #[test]
    fn test_sticky() {
        assert_eq!(Notice::info("x").auto_dismiss_ms, Some(DEFAULT_DISMISS_MS));
        assert_eq!(Notice::info("x").sticky().auto_dismiss_ms, None);
    }
}
