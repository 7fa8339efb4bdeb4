//! Auth context for managing user authentication state
//!
//! This module provides a reactive view of the session held by the
//! [`ApiClient`]:
//! - The client's [`SessionStore`](crate::core::client::SessionStore) is the
//!   single source of truth; every dispatch is mirrored into a signal
//! - Login, registration and logout go through the client
//! - The session is restored from the refresh cookie once after hydration
//! - An expired session sends the user back to the login page

use leptos::prelude::*;
use leptos_router::hooks::use_navigate;

use crate::core::client::{ApiClient, DEFAULT_API_BASE};
use crate::core::guards::LOGIN_PATH;
use crate::core::models::{RegisterPayload, User};
use crate::core::session::{AuthAction, AuthStore};
use crate::core::transport::PlatformTransport;
use crate::ui::notifications::use_notifications;

pub type Client = ApiClient<PlatformTransport>;

const SESSION_EXPIRED_NOTICE: &str = "Votre session a expiré, veuillez vous reconnecter";

/// Auth context providing authentication state and actions
#[derive(Clone, Copy)]
pub struct AuthContext {
    /// Mirror of the client's session store
    pub store: RwSignal<AuthStore>,
    /// False until the startup session restore has finished
    pub ready: RwSignal<bool>,
    client: StoredValue<Client>,
}

impl AuthContext {
    pub fn client(&self) -> Client {
        self.client.get_value()
    }

    pub fn is_authenticated(&self) -> bool {
        self.store.with(AuthStore::is_authenticated)
    }

    pub fn is_admin(&self) -> bool {
        self.store.with(AuthStore::is_admin)
    }

    /// Get current user (if authenticated)
    pub fn user(&self) -> Option<User> {
        self.store.with(|s| s.user().cloned())
    }

    /// Current user without subscribing the caller
    pub fn user_untracked(&self) -> Option<User> {
        self.store.with_untracked(|s| s.user().cloned())
    }

    pub fn error(&self) -> Option<String> {
        self.store.with(|s| s.error.clone())
    }

    pub fn is_loading(&self) -> bool {
        self.store.with(AuthStore::is_loading)
    }

    pub fn clear_error(&self) {
        self.client().session().dispatch(AuthAction::ClearError);
    }

    pub async fn login(&self, identifier: &str, password: &str) -> Result<User, String> {
        self.client().login(identifier, password).await
    }

    pub async fn register(&self, payload: &RegisterPayload) -> Result<User, String> {
        self.client().register(payload).await
    }

    pub async fn logout(&self) {
        self.client().logout().await;
    }
}

/// The server shares one transport, built from `Config` at startup, through
/// context
fn platform_transport() -> PlatformTransport {
    #[cfg(feature = "hydrate")]
    {
        PlatformTransport::new()
    }
    #[cfg(not(feature = "hydrate"))]
    {
        use_context::<PlatformTransport>().unwrap_or_else(PlatformTransport::unconfigured)
    }
}

/// Provide auth context to the component tree
pub fn provide_auth_context() -> AuthContext {
    let client = ApiClient::new(platform_transport(), DEFAULT_API_BASE);
    // Start anonymous on both server and client to avoid hydration mismatch
    let store = RwSignal::new(client.session().snapshot());
    let ready = RwSignal::new(false);

    client.session().subscribe(move |state| store.set(state.clone()));

    let notifications = use_notifications();
    client.on_session_expired(move || notifications.warning(SESSION_EXPIRED_NOTICE));

    let ctx = AuthContext {
        store,
        ready,
        client: StoredValue::new(client),
    };

    // Effects only run in the browser, after hydration
    Effect::new(move |_| {
        let client = ctx.client();
        leptos::task::spawn_local(async move {
            if client.restore_session().await {
                leptos::logging::log!("Session restored from refresh cookie");
            }
            ready.set(true);
        });
    });

    provide_context(ctx);
    ctx
}

/// Get auth context from the component tree
pub fn use_auth_context() -> AuthContext {
    expect_context::<AuthContext>()
}

/// Sends the user to the login page when a refresh fails.
///
/// Must be rendered inside the router.
#[component]
pub fn SessionExpiryRedirect() -> impl IntoView {
    let auth = use_auth_context();
    let navigate = use_navigate();

    Effect::new(move |_| {
        if auth.store.with(AuthStore::session_expired) {
            navigate(LOGIN_PATH, Default::default());
        }
    });
}
