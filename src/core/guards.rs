//! Route access decisions

use chrono::{DateTime, Utc};

use crate::core::session::AuthStore;

pub const LOGIN_PATH: &str = "/login";
pub const HOME_PATH: &str = "/pollutions";

pub const FORBIDDEN_NOTICE: &str = "Accès réservé aux administrateurs";

/// Outcome of a guard check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    Redirect {
        to: &'static str,
        /// Message to show after redirecting
        notice: Option<&'static str>,
    },
}

impl GuardDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, GuardDecision::Allow)
    }
}

/// Authenticated with a live token, otherwise back to the login page
pub fn require_authenticated(store: &AuthStore, now: DateTime<Utc>) -> GuardDecision {
    if store.is_authenticated() && store.has_valid_token(now) {
        GuardDecision::Allow
    } else {
        GuardDecision::Redirect {
            to: LOGIN_PATH,
            notice: None,
        }
    }
}

/// Admin role required; other users are sent to the declaration list
pub fn require_admin(store: &AuthStore, now: DateTime<Utc>) -> GuardDecision {
    match require_authenticated(store, now) {
        GuardDecision::Allow if store.is_admin() => GuardDecision::Allow,
        GuardDecision::Allow => GuardDecision::Redirect {
            to: HOME_PATH,
            notice: Some(FORBIDDEN_NOTICE),
        },
        redirect => redirect,
    }
}

/// Landing and auth pages: logged-in users go straight to the list
pub fn landing_guard(store: &AuthStore, now: DateTime<Utc>) -> GuardDecision {
    if store.has_valid_token(now) {
        GuardDecision::Redirect {
            to: HOME_PATH,
            notice: None,
        }
    } else {
        GuardDecision::Allow
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::{Role, User};
    use crate::core::session::{AuthAction, reduce};
    use chrono::Duration;

    fn logged_in(role: Option<Role>, now: DateTime<Utc>) -> AuthStore {
        let user = User {
            id: 1,
            nom: "Bernard".into(),
            prenom: "Lucie".into(),
            email: "lucie@example.com".into(),
            nom_utilisateur: "lucie".into(),
            role,
            date_creation: None,
            date_modification: None,
        };
        reduce(
            &AuthStore::default(),
            AuthAction::LoginSucceeded {
                user,
                access_token: "token".into(),
                expires_in: "15m".into(),
            },
            now,
        )
    }

    #[test]
    fn test_anonymous_redirected_to_login() {
        let now = Utc::now();
        assert_eq!(
            require_authenticated(&AuthStore::default(), now),
            GuardDecision::Redirect {
                to: "/login",
                notice: None
            }
        );
        assert!(landing_guard(&AuthStore::default(), now).is_allowed());
    }

    #[test]
    fn test_expired_token_redirected_to_login() {
        let now = Utc::now();
        let store = logged_in(None, now);

        assert!(require_authenticated(&store, now).is_allowed());
        // 15 minute lifetime minus the 30 second safety buffer
        let later = now + Duration::seconds(15 * 60 - 30);
        assert_eq!(
            require_authenticated(&store, later),
            GuardDecision::Redirect {
                to: LOGIN_PATH,
                notice: None
            }
        );
    }

    #[test]
    fn test_user_cannot_reach_admin() {
        let now = Utc::now();
        let store = logged_in(Some(Role::User), now);

        assert_eq!(
            require_admin(&store, now),
            GuardDecision::Redirect {
                to: HOME_PATH,
                notice: Some(FORBIDDEN_NOTICE)
            }
        );
        assert!(require_admin(&logged_in(Some(Role::Admin), now), now).is_allowed());
    }

    #[test]
    fn test_missing_role_is_not_admin() {
        let now = Utc::now();
        assert!(!require_admin(&logged_in(None, now), now).is_allowed());
    }

    #[test]
    fn test_admin_guard_requires_login_first() {
        assert_eq!(
            require_admin(&AuthStore::default(), Utc::now()),
            GuardDecision::Redirect {
                to: LOGIN_PATH,
                notice: None
            }
        );
    }

    #[test]
    fn test_landing_redirects_logged_in_users() {
        let now = Utc::now();
        assert_eq!(
            landing_guard(&logged_in(None, now), now),
            GuardDecision::Redirect {
                to: HOME_PATH,
                notice: None
            }
        );
    }
}
