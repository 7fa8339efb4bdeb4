//! REST client with session handling
//!
//! [`ApiClient`] owns the session store and the refresh coordinator. Every
//! non-auth request goes through [`ApiClient::execute`], which attaches the
//! bearer token and recovers from a 401 with a single shared token refresh.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::core::error::ApiError;
use crate::core::models::{
    LoginRequest, LoginResponse, MessageBody, RefreshTokenResponse, RegisterPayload, User,
};
use crate::core::refresh::{RefreshCoordinator, RefreshFailed, RefreshTicket};
use crate::core::session::{AuthAction, AuthStore, reduce};
use crate::core::transport::{ApiRequest, ApiResponse, HttpTransport};

/// Same-origin prefix the SSR server proxies to the backend
pub const DEFAULT_API_BASE: &str = "/api";

pub const LOGIN_PATH: &str = "/users/login";
pub const REGISTER_PATH: &str = "/users/register";
pub const REFRESH_PATH: &str = "/users/refresh-token";
pub const LOGOUT_PATH: &str = "/users/logout";

const LOGIN_FAILED: &str = "Échec de la connexion";
const REGISTER_FAILED: &str = "Échec de l'inscription";
const SESSION_EXPIRED: &str = "Session expirée";

pub type SessionListener = Box<dyn Fn(&AuthStore) + Send + Sync>;
type ExpiredHook = Box<dyn Fn() + Send + Sync>;

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Holds the current [`AuthStore`] and applies actions through the reducer
#[derive(Default)]
pub struct SessionStore {
    state: Mutex<AuthStore>,
    listeners: Mutex<Vec<SessionListener>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dispatch(&self, action: AuthAction) -> AuthStore {
        self.dispatch_at(action, Utc::now())
    }

    /// Apply an action at a given instant and notify subscribers
    pub fn dispatch_at(&self, action: AuthAction, now: DateTime<Utc>) -> AuthStore {
        tracing::debug!(action = action.name(), "Session action");
        let next = {
            let mut state = lock(&self.state);
            *state = reduce(&state, action, now);
            state.clone()
        };
        for listener in lock(&self.listeners).iter() {
            listener(&next);
        }
        next
    }

    pub fn snapshot(&self) -> AuthStore {
        lock(&self.state).clone()
    }

    pub fn access_token(&self) -> Option<String> {
        lock(&self.state).access_token().map(str::to_string)
    }

    /// Called with the new state after every dispatch
    pub fn subscribe(&self, listener: impl Fn(&AuthStore) + Send + Sync + 'static) {
        lock(&self.listeners).push(Box::new(listener));
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("state", &self.snapshot())
            .finish_non_exhaustive()
    }
}

/// Backend client shared by every page
pub struct ApiClient<T> {
    transport: Arc<T>,
    base_url: Arc<str>,
    session: Arc<SessionStore>,
    refresh: Arc<RefreshCoordinator>,
    expired_hooks: Arc<Mutex<Vec<ExpiredHook>>>,
}

impl<T> Clone for ApiClient<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            base_url: Arc::clone(&self.base_url),
            session: Arc::clone(&self.session),
            refresh: Arc::clone(&self.refresh),
            expired_hooks: Arc::clone(&self.expired_hooks),
        }
    }
}

impl<T: HttpTransport> ApiClient<T> {
    pub fn new(transport: T, base_url: &str) -> Self {
        Self::with_session(transport, base_url, Arc::new(SessionStore::new()))
    }

    pub fn with_session(transport: T, base_url: &str, session: Arc<SessionStore>) -> Self {
        Self {
            transport: Arc::new(transport),
            base_url: Arc::from(base_url.trim_end_matches('/')),
            session,
            refresh: Arc::new(RefreshCoordinator::new()),
            expired_hooks: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[cfg(test)]
    pub(crate) fn transport(&self) -> &T {
        &self.transport
    }

    /// Run `hook` whenever a failed refresh ends the session
    pub fn on_session_expired(&self, hook: impl Fn() + Send + Sync + 'static) {
        lock(&self.expired_hooks).push(Box::new(hook));
    }

    async fn send(&self, request: &ApiRequest, bearer: Option<&str>) -> Result<ApiResponse, ApiError> {
        self.transport
            .send(request.prepare(&self.base_url, bearer))
            .await
    }

    /// Send a request with the session token, refreshing once on 401.
    ///
    /// Non-success responses other than an unrecoverable 401 are returned as
    /// is; callers map them with [`ApiError::from_status`].
    pub async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        if request.is_auth_endpoint() {
            return self.send(&request, None).await;
        }

        let sent_token = self.session.access_token();
        let response = self.send(&request, sent_token.as_deref()).await?;
        if response.status != 401 {
            return Ok(response);
        }
        let Some(sent_token) = sent_token else {
            return Err(ApiError::Unauthorized);
        };

        match self.session.access_token() {
            // Another request already rotated the token while this one was in flight
            Some(current) if current != sent_token => {
                tracing::debug!(path = %request.path, "Replaying with rotated token");
                return self.replay(&request, &current).await;
            }
            // The session ended while this one was in flight
            None => {
                tracing::debug!(path = %request.path, "Session ended before the 401 arrived");
                return Err(ApiError::SessionExpired);
            }
            Some(_) => {}
        }

        let token = self.refreshed_token().await?;
        self.replay(&request, &token).await
    }

    async fn replay(&self, request: &ApiRequest, token: &str) -> Result<ApiResponse, ApiError> {
        let response = self.send(request, Some(token)).await?;
        if response.status == 401 {
            return Err(ApiError::Unauthorized);
        }
        Ok(response)
    }

    /// Join the single-flight refresh and return the new token
    async fn refreshed_token(&self) -> Result<String, ApiError> {
        match self.refresh.enter() {
            RefreshTicket::Leader => {
                let guard = self.refresh.lead();
                self.session.dispatch(AuthAction::RefreshStarted);

                match self.request_refresh().await {
                    Ok(refreshed) => {
                        let token = refreshed.access_token.clone();
                        self.session.dispatch(AuthAction::RefreshSucceeded {
                            access_token: refreshed.access_token,
                            expires_in: refreshed.access_token_expires_in,
                            user: refreshed.user,
                        });
                        let released = guard.finish(Ok(token.clone()));
                        tracing::info!(released, "Access token refreshed");
                        Ok(token)
                    }
                    Err(err) => {
                        tracing::warn!("Token refresh failed: {}", err);
                        self.session
                            .dispatch(AuthAction::RefreshFailed(SESSION_EXPIRED.to_string()));
                        guard.finish(Err(RefreshFailed::new(err.to_string())));
                        self.notify_session_expired();
                        Err(ApiError::SessionExpired)
                    }
                }
            }
            ticket => match ticket.outcome().await {
                Some(Ok(token)) => Ok(token),
                _ => Err(ApiError::SessionExpired),
            },
        }
    }

    async fn request_refresh(&self) -> Result<RefreshTokenResponse, ApiError> {
        let response = self.send(&ApiRequest::post(REFRESH_PATH), None).await?;
        if !response.is_success() {
            return Err(ApiError::from_status(response.status, &response.body));
        }
        Ok(serde_json::from_str(&response.body)?)
    }

    fn notify_session_expired(&self) {
        for hook in lock(&self.expired_hooks).iter() {
            hook();
        }
    }

    // ------------------------------------------------------------------------
    // Typed helpers
    // ------------------------------------------------------------------------

    pub async fn fetch_json<R: DeserializeOwned>(&self, request: ApiRequest) -> Result<R, ApiError> {
        let response = self.execute(request).await?;
        if !response.is_success() {
            return Err(ApiError::from_status(response.status, &response.body));
        }
        Ok(serde_json::from_str(&response.body)?)
    }

    /// Run a request whose response body is ignored
    pub async fn fetch_unit(&self, request: ApiRequest) -> Result<(), ApiError> {
        let response = self.execute(request).await?;
        if !response.is_success() {
            return Err(ApiError::from_status(response.status, &response.body));
        }
        Ok(())
    }

    pub async fn get_json<R: DeserializeOwned>(&self, path: &str) -> Result<R, ApiError> {
        self.fetch_json(ApiRequest::get(path)).await
    }

    pub async fn post_json<B: Serialize, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<R, ApiError> {
        self.fetch_json(ApiRequest::post(path).json(body)?).await
    }

    pub async fn put_json<B: Serialize, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<R, ApiError> {
        self.fetch_json(ApiRequest::put(path).json(body)?).await
    }

    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.fetch_unit(ApiRequest::delete(path)).await
    }

    // ------------------------------------------------------------------------
    // Session operations
    // ------------------------------------------------------------------------

    /// Log in with an email or username.
    ///
    /// On failure the session is left anonymous with the backend's message.
    pub async fn login(&self, identifier: &str, password: &str) -> Result<User, String> {
        self.session.dispatch(AuthAction::LoginStarted);

        let body = LoginRequest {
            identifiant: identifier.trim().to_string(),
            mot_de_passe: password.to_string(),
        };
        match self.authenticate(LOGIN_PATH, &body, LOGIN_FAILED).await {
            Ok(login) => {
                tracing::info!(user_id = login.user.id, "User logged in");
                let user = login.user.clone();
                self.session.dispatch(AuthAction::LoginSucceeded {
                    user: login.user,
                    access_token: login.access_token,
                    expires_in: login.access_token_expires_in,
                });
                Ok(user)
            }
            Err(message) => {
                tracing::info!("Login rejected: {}", message);
                self.session.dispatch(AuthAction::LoginFailed(message.clone()));
                Err(message)
            }
        }
    }

    /// Create an account; the backend logs the new user in directly
    pub async fn register(&self, payload: &RegisterPayload) -> Result<User, String> {
        self.session.dispatch(AuthAction::RegisterStarted);

        match self.authenticate(REGISTER_PATH, payload, REGISTER_FAILED).await {
            Ok(registered) => {
                tracing::info!(user_id = registered.user.id, "User registered");
                let user = registered.user.clone();
                self.session.dispatch(AuthAction::RegisterSucceeded {
                    user: registered.user,
                    access_token: registered.access_token,
                    expires_in: registered.access_token_expires_in,
                });
                Ok(user)
            }
            Err(message) => {
                self.session
                    .dispatch(AuthAction::RegisterFailed(message.clone()));
                Err(message)
            }
        }
    }

    async fn authenticate<B: Serialize>(
        &self,
        path: &str,
        body: &B,
        fallback: &str,
    ) -> Result<LoginResponse, String> {
        let request = ApiRequest::post(path)
            .json(body)
            .map_err(|e| e.user_message())?;
        let response = self
            .send(&request, None)
            .await
            .map_err(|e| e.user_message())?;

        if !response.is_success() {
            // 401 on login carries the reason ("Identifiants invalides")
            return Err(serde_json::from_str::<MessageBody>(&response.body)
                .ok()
                .and_then(|b| b.message)
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| fallback.to_string()));
        }
        serde_json::from_str(&response.body).map_err(|e| {
            tracing::warn!("Malformed auth response: {}", e);
            fallback.to_string()
        })
    }

    /// Restore the session from the refresh cookie at startup.
    ///
    /// Returns whether a session was restored. Failure is silent: the app just
    /// stays anonymous.
    pub async fn restore_session(&self) -> bool {
        match self.refresh.enter() {
            RefreshTicket::Leader => {
                let guard = self.refresh.lead();
                match self.request_refresh().await {
                    Ok(refreshed) if refreshed.user.is_some() => {
                        let token = refreshed.access_token.clone();
                        self.session.dispatch(AuthAction::RefreshSucceeded {
                            access_token: refreshed.access_token,
                            expires_in: refreshed.access_token_expires_in,
                            user: refreshed.user,
                        });
                        guard.finish(Ok(token));
                        tracing::info!("Session restored");
                        true
                    }
                    Ok(_) => {
                        tracing::debug!("Refresh response without user, staying anonymous");
                        guard.finish(Err(RefreshFailed::new("no user")));
                        false
                    }
                    Err(err) => {
                        tracing::debug!("No session to restore: {}", err);
                        guard.finish(Err(RefreshFailed::new(err.to_string())));
                        false
                    }
                }
            }
            ticket => matches!(ticket.outcome().await, Some(Ok(_))),
        }
    }

    /// Log out. Local state is cleared even when the backend call fails.
    pub async fn logout(&self) {
        match self.send(&ApiRequest::post(LOGOUT_PATH), None).await {
            Ok(response) if response.is_success() => {}
            Ok(response) => {
                tracing::warn!(status = response.status, "Logout rejected by backend");
            }
            Err(err) => tracing::warn!("Logout request failed: {}", err),
        }
        self.session.dispatch(AuthAction::LoggedOut);
        tracing::info!("User logged out");
    }

    /// Replace the session user after a profile edit
    pub fn update_profile(&self, user: User) {
        self.session.dispatch(AuthAction::ProfileUpdated(user));
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::core::session::SessionPhase;
    use crate::core::transport::{HttpRequest, Method};

    /// In-memory backend: `fresh` is the only token it accepts
    #[derive(Default)]
    pub(crate) struct MockTransport {
        pub calls: Mutex<Vec<HttpRequest>>,
        pub refresh_status: Mutex<u16>,
        pub logout_fails: bool,
        pub login_status: u16,
        /// Session rotated as a side effect of hitting `/rotate`
        pub rotate: Option<Arc<SessionStore>>,
        /// Canned bodies for successful non-auth requests, by URL
        pub bodies: Mutex<Vec<(String, String)>>,
    }

    impl MockTransport {
        pub fn new() -> Self {
            Self {
                refresh_status: Mutex::new(200),
                login_status: 200,
                ..Default::default()
            }
        }

        pub fn with_body(self, url: &str, body: &str) -> Self {
            lock(&self.bodies).push((url.to_string(), body.to_string()));
            self
        }

        pub fn urls(&self) -> Vec<String> {
            lock(&self.calls).iter().map(|c| c.url.clone()).collect()
        }

        pub fn refresh_count(&self) -> usize {
            self.urls().iter().filter(|u| u.ends_with(REFRESH_PATH)).count()
        }
    }

    pub(crate) fn user(id: i64) -> User {
        User {
            id,
            nom: "Dupont".into(),
            prenom: "Jean".into(),
            email: "jean@example.com".into(),
            nom_utilisateur: "jdupont".into(),
            role: None,
            date_creation: None,
            date_modification: None,
        }
    }

    fn login_body(token: &str) -> String {
        serde_json::json!({
            "user": user(7),
            "accessToken": token,
            "accessTokenExpiresIn": "15m"
        })
        .to_string()
    }

    impl HttpTransport for MockTransport {
        async fn send(&self, request: HttpRequest) -> Result<ApiResponse, ApiError> {
            lock(&self.calls).push(request.clone());
            let url = request.url.clone();

            if url.ends_with(REFRESH_PATH) {
                tokio::task::yield_now().await;
                let status = *lock(&self.refresh_status);
                return Ok(if status == 200 {
                    ApiResponse::new(
                        200,
                        serde_json::json!({
                            "accessToken": "fresh",
                            "accessTokenExpiresIn": "15m",
                            "user": user(7)
                        })
                        .to_string(),
                    )
                } else {
                    ApiResponse::new(status, r#"{"message":"Refresh token invalide"}"#)
                });
            }
            if url.ends_with(LOGIN_PATH) {
                return Ok(if self.login_status == 200 {
                    ApiResponse::new(200, login_body("fresh"))
                } else {
                    ApiResponse::new(
                        self.login_status,
                        r#"{"message":"Identifiants invalides"}"#,
                    )
                });
            }
            if url.ends_with(LOGOUT_PATH) {
                if self.logout_fails {
                    return Err(ApiError::Network("connection refused".into()));
                }
                return Ok(ApiResponse::new(200, "{}"));
            }
            if url.ends_with("/slow") {
                for _ in 0..20 {
                    tokio::task::yield_now().await;
                }
            }
            if url.ends_with("/rotate")
                && let Some(session) = &self.rotate
                && request.bearer.as_deref() == Some("stale")
            {
                session.dispatch(AuthAction::RefreshSucceeded {
                    access_token: "fresh".into(),
                    expires_in: "15m".into(),
                    user: None,
                });
            }

            match request.bearer.as_deref() {
                Some("fresh") if url.ends_with("/404") => Ok(ApiResponse::new(
                    404,
                    r#"{"message":"Ressource introuvable"}"#,
                )),
                Some("fresh") => {
                    let body = lock(&self.bodies)
                        .iter()
                        .find(|(u, _)| *u == url)
                        .map(|(_, b)| b.clone())
                        .unwrap_or_else(|| "{}".to_string());
                    Ok(ApiResponse::new(200, body))
                }
                _ => Ok(ApiResponse::new(401, r#"{"message":"Token expiré"}"#)),
            }
        }
    }

    pub(crate) fn stale_client(transport: MockTransport) -> ApiClient<MockTransport> {
        let client = ApiClient::new(transport, "/api");
        client.session().dispatch(AuthAction::LoginSucceeded {
            user: user(7),
            access_token: "stale".into(),
            expires_in: "15m".into(),
        });
        client
    }

    #[tokio::test]
    async fn test_bearer_attached_and_auth_endpoints_bare() {
        let client = stale_client(MockTransport::new());

        let _ = client.execute(ApiRequest::get("/pollution")).await;
        client.logout().await;

        let calls = lock(&client.transport.calls);
        assert_eq!(calls[0].bearer.as_deref(), Some("stale"));
        assert!(calls.iter().filter(|c| c.url.ends_with(LOGOUT_PATH)).all(|c| c.bearer.is_none()));
        assert!(calls.iter().filter(|c| c.url.ends_with(REFRESH_PATH)).all(|c| c.bearer.is_none()));
    }

    #[tokio::test]
    async fn test_concurrent_401s_share_one_refresh() {
        let client = stale_client(MockTransport::new());

        let (a, b, c) = futures::join!(
            client.execute(ApiRequest::get("/pollution/1")),
            client.execute(ApiRequest::get("/pollution/2")),
            client.execute(ApiRequest::get("/pollution/3")),
        );

        assert_eq!(a.unwrap().status, 200);
        assert_eq!(b.unwrap().status, 200);
        assert_eq!(c.unwrap().status, 200);
        assert_eq!(client.transport.refresh_count(), 1);

        // Replays happen after the refresh, in the order the requests were queued
        let calls = lock(&client.transport.calls);
        let replays: Vec<_> = calls
            .iter()
            .filter(|c| c.bearer.as_deref() == Some("fresh"))
            .map(|c| c.url.clone())
            .collect();
        assert_eq!(
            replays,
            vec!["/api/pollution/1", "/api/pollution/2", "/api/pollution/3"]
        );

        let state = client.session().snapshot();
        assert_eq!(state.phase, SessionPhase::Authenticated);
        assert_eq!(state.access_token(), Some("fresh"));
    }

    #[tokio::test]
    async fn test_refresh_failure_expires_session_for_all() {
        let transport = MockTransport::new();
        *lock(&transport.refresh_status) = 401;
        let client = stale_client(transport);

        let fired = Arc::new(Mutex::new(0));
        let counter = Arc::clone(&fired);
        client.on_session_expired(move || *lock(&counter) += 1);

        let (a, b) = futures::join!(
            client.execute(ApiRequest::get("/pollution/1")),
            client.execute(ApiRequest::get("/pollution/2")),
        );

        assert_eq!(a, Err(ApiError::SessionExpired));
        assert_eq!(b, Err(ApiError::SessionExpired));
        assert_eq!(client.transport.refresh_count(), 1);
        assert_eq!(*lock(&fired), 1);

        let state = client.session().snapshot();
        assert_eq!(state.phase, SessionPhase::Expired);
        assert!(!state.is_authenticated());
    }

    #[tokio::test]
    async fn test_401_after_failed_refresh_does_not_refresh_again() {
        let transport = MockTransport::new();
        *lock(&transport.refresh_status) = 401;
        let client = stale_client(transport);

        let fired = Arc::new(Mutex::new(0));
        let counter = Arc::clone(&fired);
        client.on_session_expired(move || *lock(&counter) += 1);

        // `/slow` answers 401 only after the refresh for `/pollution/1` failed
        let (a, b) = futures::join!(
            client.execute(ApiRequest::get("/pollution/1")),
            client.execute(ApiRequest::get("/slow")),
        );

        assert_eq!(a, Err(ApiError::SessionExpired));
        assert_eq!(b, Err(ApiError::SessionExpired));
        assert_eq!(client.transport.refresh_count(), 1);
        assert_eq!(*lock(&fired), 1);
        assert_eq!(client.session().snapshot().phase, SessionPhase::Expired);
    }

    #[tokio::test]
    async fn test_rotated_token_replays_without_refresh() {
        let session = Arc::new(SessionStore::new());
        let transport = MockTransport {
            rotate: Some(Arc::clone(&session)),
            ..MockTransport::new()
        };
        let client = ApiClient::with_session(transport, "/api", session);
        client.session().dispatch(AuthAction::LoginSucceeded {
            user: user(7),
            access_token: "stale".into(),
            expires_in: "15m".into(),
        });

        let response = client.execute(ApiRequest::get("/rotate")).await.unwrap();

        assert_eq!(response.status, 200);
        assert_eq!(client.transport.refresh_count(), 0);
    }

    #[tokio::test]
    async fn test_anonymous_401_is_unauthorized() {
        let client = ApiClient::new(MockTransport::new(), "/api");

        let result = client.execute(ApiRequest::get("/users")).await;

        assert_eq!(result, Err(ApiError::Unauthorized));
        assert_eq!(client.transport.refresh_count(), 0);
    }

    #[tokio::test]
    async fn test_login_success_and_failure() {
        let client = ApiClient::new(MockTransport::new(), "/api");
        let logged = client.login(" jdupont ", "secret123").await.unwrap();
        assert_eq!(logged.id, 7);
        assert!(client.session().snapshot().is_authenticated());

        let rejected = ApiClient::new(
            MockTransport {
                login_status: 401,
                ..MockTransport::new()
            },
            "/api",
        );
        let err = rejected.login("jdupont", "wrong").await.unwrap_err();
        assert_eq!(err, "Identifiants invalides");

        let state = rejected.session().snapshot();
        assert_eq!(state.phase, SessionPhase::Anonymous);
        assert_eq!(state.error.as_deref(), Some("Identifiants invalides"));
    }

    #[tokio::test]
    async fn test_login_sends_trimmed_identifier() {
        let client = ApiClient::new(MockTransport::new(), "/api");
        client.login("  jean@example.com ", "pw").await.unwrap();

        let calls = lock(&client.transport.calls);
        assert_eq!(
            calls[0].body,
            crate::core::transport::RequestBody::Json(serde_json::json!({
                "identifiant": "jean@example.com",
                "motDePasse": "pw"
            }))
        );
        assert_eq!(calls[0].method, Method::Post);
    }

    #[tokio::test]
    async fn test_logout_clears_state_even_on_network_error() {
        let client = stale_client(MockTransport {
            logout_fails: true,
            ..MockTransport::new()
        });

        client.logout().await;

        let state = client.session().snapshot();
        assert_eq!(state, AuthStore::default());
    }

    #[tokio::test]
    async fn test_restore_session() {
        let client = ApiClient::new(MockTransport::new(), "/api");
        assert!(client.restore_session().await);
        assert_eq!(client.session().snapshot().user().map(|u| u.id), Some(7));

        let transport = MockTransport::new();
        *lock(&transport.refresh_status) = 401;
        let anonymous = ApiClient::new(transport, "/api");
        assert!(!anonymous.restore_session().await);
        assert_eq!(anonymous.session().snapshot().phase, SessionPhase::Anonymous);
    }

    #[tokio::test]
    async fn test_listeners_see_every_dispatch() {
        let client = ApiClient::new(MockTransport::new(), "/api");
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        client
            .session()
            .subscribe(move |state| lock(&sink).push(state.phase));

        client.login("jdupont", "pw").await.unwrap();

        assert_eq!(
            *lock(&seen),
            vec![SessionPhase::Authenticating, SessionPhase::Authenticated]
        );
    }

    #[test]
    fn test_update_profile_replaces_user() {
        let client = stale_client(MockTransport::new());
        let mut renamed = user(7);
        renamed.prenom = "Jeanne".into();

        client.update_profile(renamed);

        assert_eq!(
            client.session().snapshot().user().map(User::full_name),
            Some("Jeanne Dupont".to_string())
        );
    }
}
