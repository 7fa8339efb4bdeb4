//! Session state machine
//!
//! The whole authentication state lives in one plain value, [`AuthStore`],
//! and changes only through [`reduce`], which applies an [`AuthAction`].
//! Credentials are held in memory only; the refresh token stays in the
//! backend's HTTP-only cookie and never reaches this module.

use chrono::{DateTime, Duration, Utc};

use crate::core::models::{Role, User};

/// Lifetime used when the backend sends an unparseable duration (15 minutes)
pub const DEFAULT_TOKEN_LIFETIME_SECS: i64 = 15 * 60;

/// Safety margin before the real expiry at which a token counts as expired
pub const EXPIRY_SAFETY_BUFFER_SECS: i64 = 30;

/// Parse a `<n><unit>` duration (`s`, `m`, `h`, `d`), e.g. `"15m"` or `"7d"`.
///
/// Anything that does not match exactly falls back to 15 minutes.
pub fn parse_token_lifetime(value: &str) -> Duration {
    let fallback = Duration::seconds(DEFAULT_TOKEN_LIFETIME_SECS);

    let Some(unit) = value.chars().last() else {
        return fallback;
    };
    let digits = &value[..value.len() - unit.len_utf8()];
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return fallback;
    }
    let Ok(amount) = digits.parse::<i64>() else {
        return fallback;
    };

    let seconds = match unit {
        's' => Some(amount),
        'm' => amount.checked_mul(60),
        'h' => amount.checked_mul(60 * 60),
        'd' => amount.checked_mul(24 * 60 * 60),
        _ => None,
    };

    seconds
        .and_then(Duration::try_seconds)
        .unwrap_or(fallback)
}

/// Expiry instant of a token issued at `issued_at` with the given lifetime string
pub fn compute_expiry(issued_at: DateTime<Utc>, expires_in: &str) -> DateTime<Utc> {
    issued_at
        .checked_add_signed(parse_token_lifetime(expires_in))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// A token is expired once `now >= expires_at - 30s`
pub fn is_expired_at(expires_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    now >= expires_at - Duration::seconds(EXPIRY_SAFETY_BUFFER_SECS)
}

/// In-memory credentials of the signed-in user
#[derive(Debug, Clone, PartialEq)]
pub struct Credentials {
    pub user: User,
    pub access_token: String,
    pub expires_at: DateTime<Utc>,
}

impl Credentials {
    pub fn issue(
        user: User,
        access_token: impl Into<String>,
        expires_in: &str,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            user,
            access_token: access_token.into(),
            expires_at: compute_expiry(now, expires_in),
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        is_expired_at(self.expires_at, now)
    }
}

/// Lifecycle phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionPhase {
    #[default]
    Anonymous,
    /// Login or registration in flight
    Authenticating,
    Authenticated,
    /// A token refresh is in flight; credentials are kept meanwhile
    Refreshing,
    /// Anonymous because the refresh token was rejected
    Expired,
}

/// Application auth state
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AuthStore {
    pub phase: SessionPhase,
    pub credentials: Option<Credentials>,
    /// Error of the last login / register / refresh attempt
    pub error: Option<String>,
}

/// Every state transition of the session
#[derive(Debug, Clone, PartialEq)]
pub enum AuthAction {
    LoginStarted,
    LoginSucceeded {
        user: User,
        access_token: String,
        expires_in: String,
    },
    LoginFailed(String),
    RegisterStarted,
    RegisterSucceeded {
        user: User,
        access_token: String,
        expires_in: String,
    },
    RegisterFailed(String),
    RefreshStarted,
    /// New token; `user` replaces the session user when the backend sends one
    RefreshSucceeded {
        access_token: String,
        expires_in: String,
        user: Option<User>,
    },
    RefreshFailed(String),
    ProfileUpdated(User),
    ClearError,
    LoggedOut,
}

impl AuthAction {
    /// Short name for logs
    pub fn name(&self) -> &'static str {
        match self {
            AuthAction::LoginStarted => "login_started",
            AuthAction::LoginSucceeded { .. } => "login_succeeded",
            AuthAction::LoginFailed(_) => "login_failed",
            AuthAction::RegisterStarted => "register_started",
            AuthAction::RegisterSucceeded { .. } => "register_succeeded",
            AuthAction::RegisterFailed(_) => "register_failed",
            AuthAction::RefreshStarted => "refresh_started",
            AuthAction::RefreshSucceeded { .. } => "refresh_succeeded",
            AuthAction::RefreshFailed(_) => "refresh_failed",
            AuthAction::ProfileUpdated(_) => "profile_updated",
            AuthAction::ClearError => "clear_error",
            AuthAction::LoggedOut => "logged_out",
        }
    }
}

/// Apply one action. Pure: the same inputs always give the same state.
pub fn reduce(state: &AuthStore, action: AuthAction, now: DateTime<Utc>) -> AuthStore {
    match action {
        AuthAction::LoginStarted | AuthAction::RegisterStarted => AuthStore {
            phase: SessionPhase::Authenticating,
            credentials: None,
            error: None,
        },
        AuthAction::LoginSucceeded {
            user,
            access_token,
            expires_in,
        }
        | AuthAction::RegisterSucceeded {
            user,
            access_token,
            expires_in,
        } => AuthStore {
            phase: SessionPhase::Authenticated,
            credentials: Some(Credentials::issue(user, access_token, &expires_in, now)),
            error: None,
        },
        AuthAction::LoginFailed(message) | AuthAction::RegisterFailed(message) => AuthStore {
            phase: SessionPhase::Anonymous,
            credentials: None,
            error: Some(message),
        },
        AuthAction::RefreshStarted => AuthStore {
            phase: SessionPhase::Refreshing,
            ..state.clone()
        },
        AuthAction::RefreshSucceeded {
            access_token,
            expires_in,
            user,
        } => match user.or_else(|| state.credentials.as_ref().map(|c| c.user.clone())) {
            Some(user) => AuthStore {
                phase: SessionPhase::Authenticated,
                credentials: Some(Credentials::issue(user, access_token, &expires_in, now)),
                error: None,
            },
            // A token without a user is not a session
            None => AuthStore::default(),
        },
        AuthAction::RefreshFailed(message) => AuthStore {
            phase: SessionPhase::Expired,
            credentials: None,
            error: Some(message),
        },
        AuthAction::ProfileUpdated(user) => match &state.credentials {
            Some(credentials) => AuthStore {
                credentials: Some(Credentials {
                    user,
                    ..credentials.clone()
                }),
                ..state.clone()
            },
            None => state.clone(),
        },
        AuthAction::ClearError => AuthStore {
            error: None,
            ..state.clone()
        },
        AuthAction::LoggedOut => AuthStore::default(),
    }
}

impl AuthStore {
    /// Both a token and a user are held
    pub fn is_authenticated(&self) -> bool {
        self.credentials
            .as_ref()
            .is_some_and(|c| !c.access_token.is_empty())
    }

    /// Authenticated with a token that is not (about to be) expired
    pub fn has_valid_token(&self, now: DateTime<Utc>) -> bool {
        self.credentials
            .as_ref()
            .is_some_and(|c| !c.access_token.is_empty() && !c.is_expired(now))
    }

    pub fn user(&self) -> Option<&User> {
        self.credentials.as_ref().map(|c| &c.user)
    }

    pub fn access_token(&self) -> Option<&str> {
        self.credentials.as_ref().map(|c| c.access_token.as_str())
    }

    pub fn role(&self) -> Option<Role> {
        self.user().map(User::role)
    }

    pub fn is_admin(&self) -> bool {
        self.role() == Some(Role::Admin)
    }

    pub fn is_loading(&self) -> bool {
        self.phase == SessionPhase::Authenticating
    }

    pub fn session_expired(&self) -> bool {
        self.phase == SessionPhase::Expired
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn user(role: Option<Role>) -> User {
        User {
            id: 1,
            nom: "Dupont".to_string(),
            prenom: "Jean".to_string(),
            email: "jean@example.fr".to_string(),
            nom_utilisateur: "jdupont".to_string(),
            role,
            date_creation: None,
            date_modification: None,
        }
    }

    fn logged_in(expires_in: &str) -> AuthStore {
        reduce(
            &AuthStore::default(),
            AuthAction::LoginSucceeded {
                user: user(None),
                access_token: "token-1".to_string(),
                expires_in: expires_in.to_string(),
            },
            t0(),
        )
    }

    // ========================================================================
    // Duration parsing
    // ========================================================================

    #[test]
    fn test_parse_token_lifetime_units() {
        assert_eq!(parse_token_lifetime("45s"), Duration::seconds(45));
        assert_eq!(parse_token_lifetime("15m"), Duration::minutes(15));
        assert_eq!(parse_token_lifetime("2h"), Duration::hours(2));
        assert_eq!(parse_token_lifetime("7d"), Duration::days(7));
        assert_eq!(parse_token_lifetime("0s"), Duration::zero());
    }

    #[test]
    fn test_parse_token_lifetime_malformed_defaults_to_15_minutes() {
        let fallback = Duration::minutes(15);
        for value in ["", "m", "15", "15w", "1.5h", "-5m", " 5m", "5m ", "5 m", "1h30m", "é"] {
            assert_eq!(parse_token_lifetime(value), fallback, "input {value:?}");
        }
    }

    #[test]
    fn test_parse_token_lifetime_overflow_defaults() {
        assert_eq!(
            parse_token_lifetime("99999999999999999999d"),
            Duration::minutes(15)
        );
        assert_eq!(
            parse_token_lifetime("9223372036854775807d"),
            Duration::minutes(15)
        );
    }

    #[test]
    fn test_compute_expiry() {
        assert_eq!(compute_expiry(t0(), "1h"), t0() + Duration::hours(1));
        assert_eq!(compute_expiry(t0(), "garbage"), t0() + Duration::minutes(15));
    }

    // ========================================================================
    // Expiry boundary
    // ========================================================================

    #[test]
    fn test_expiry_boundary_uses_greater_or_equal() {
        let exp = t0() + Duration::minutes(15);

        assert!(!is_expired_at(exp, exp - Duration::milliseconds(30_001)));
        assert!(is_expired_at(exp, exp - Duration::milliseconds(30_000)));
        assert!(is_expired_at(exp, exp - Duration::milliseconds(29_999)));
        assert!(is_expired_at(exp, exp + Duration::seconds(1)));
    }

    #[test]
    fn test_has_valid_token_tracks_expiry() {
        let state = logged_in("15m");
        assert!(state.has_valid_token(t0()));
        assert!(state.has_valid_token(t0() + Duration::seconds(15 * 60 - 31)));
        assert!(!state.has_valid_token(t0() + Duration::seconds(15 * 60 - 30)));
    }

    // ========================================================================
    // Transitions
    // ========================================================================

    #[test]
    fn test_login_flow() {
        let state = reduce(&AuthStore::default(), AuthAction::LoginStarted, t0());
        assert_eq!(state.phase, SessionPhase::Authenticating);
        assert!(state.is_loading());
        assert!(!state.is_authenticated());

        let state = logged_in("15m");
        assert_eq!(state.phase, SessionPhase::Authenticated);
        assert!(state.is_authenticated());
        assert_eq!(state.access_token(), Some("token-1"));
        assert_eq!(
            state.credentials.as_ref().map(|c| c.expires_at),
            Some(t0() + Duration::minutes(15))
        );
    }

    #[test]
    fn test_login_failure_returns_to_anonymous_with_error() {
        let started = reduce(&AuthStore::default(), AuthAction::LoginStarted, t0());
        let state = reduce(
            &started,
            AuthAction::LoginFailed("Identifiants invalides".to_string()),
            t0(),
        );

        assert_eq!(state.phase, SessionPhase::Anonymous);
        assert_eq!(state.error.as_deref(), Some("Identifiants invalides"));
        assert!(!state.is_authenticated());

        let cleared = reduce(&state, AuthAction::ClearError, t0());
        assert!(cleared.error.is_none());
    }

    #[test]
    fn test_refresh_success_keeps_user_and_renews_token() {
        let state = logged_in("15m");
        let refreshing = reduce(&state, AuthAction::RefreshStarted, t0());
        assert_eq!(refreshing.phase, SessionPhase::Refreshing);
        assert!(refreshing.is_authenticated());

        let later = t0() + Duration::minutes(20);
        let state = reduce(
            &refreshing,
            AuthAction::RefreshSucceeded {
                access_token: "token-2".to_string(),
                expires_in: "15m".to_string(),
                user: None,
            },
            later,
        );

        assert_eq!(state.phase, SessionPhase::Authenticated);
        assert_eq!(state.access_token(), Some("token-2"));
        assert_eq!(state.user().map(|u| u.id), Some(1));
        assert!(state.has_valid_token(later));
    }

    #[test]
    fn test_refresh_without_any_user_is_not_a_session() {
        let state = reduce(
            &AuthStore::default(),
            AuthAction::RefreshSucceeded {
                access_token: "orphan".to_string(),
                expires_in: "15m".to_string(),
                user: None,
            },
            t0(),
        );
        assert!(!state.is_authenticated());
        assert_eq!(state.phase, SessionPhase::Anonymous);
    }

    #[test]
    fn test_refresh_failure_expires_session() {
        let state = reduce(
            &logged_in("15m"),
            AuthAction::RefreshFailed("Session expirée".to_string()),
            t0(),
        );

        assert_eq!(state.phase, SessionPhase::Expired);
        assert!(state.session_expired());
        assert!(state.credentials.is_none());
        assert!(!state.is_authenticated());
    }

    #[test]
    fn test_profile_update_replaces_user_only() {
        let state = logged_in("15m");
        let mut renamed = user(Some(Role::Admin));
        renamed.prenom = "Jeanne".to_string();

        let updated = reduce(&state, AuthAction::ProfileUpdated(renamed), t0());
        assert_eq!(updated.user().map(|u| u.prenom.as_str()), Some("Jeanne"));
        assert_eq!(updated.access_token(), Some("token-1"));
        assert!(updated.is_admin());

        // No session: nothing to update
        let anonymous = reduce(
            &AuthStore::default(),
            AuthAction::ProfileUpdated(user(None)),
            t0(),
        );
        assert_eq!(anonymous, AuthStore::default());
    }

    #[test]
    fn test_logout_clears_everything() {
        let state = reduce(&logged_in("1d"), AuthAction::LoggedOut, t0());
        assert_eq!(state, AuthStore::default());
    }

    #[test]
    fn test_empty_token_is_not_authenticated() {
        let state = reduce(
            &AuthStore::default(),
            AuthAction::LoginSucceeded {
                user: user(None),
                access_token: String::new(),
                expires_in: "15m".to_string(),
            },
            t0(),
        );
        assert!(!state.is_authenticated());
    }
}
