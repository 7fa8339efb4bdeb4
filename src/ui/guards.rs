//! Route guard components
//!
//! Protected pages are wrapped in one of these. Until the startup session
//! restore has finished a spinner is shown, then the decision from
//! [`crate::core::guards`] either renders the page or redirects.

use chrono::{DateTime, Utc};
use leptos::prelude::*;
use leptos_router::hooks::use_navigate;

use crate::core::guards::{GuardDecision, landing_guard, require_admin, require_authenticated};
use crate::core::session::AuthStore;
use crate::ui::auth::use_auth_context;
use crate::ui::common::LoadingSpinner;
use crate::ui::notifications::use_notifications;

type GuardCheck = fn(&AuthStore, DateTime<Utc>) -> GuardDecision;

#[component]
fn Guarded(check: GuardCheck, children: ChildrenFn) -> impl IntoView {
    let auth = use_auth_context();
    let notifications = use_notifications();
    let navigate = use_navigate();

    let decision = Memo::new(move |_| {
        auth.ready
            .get()
            .then(|| auth.store.with(|store| check(store, Utc::now())))
    });

    Effect::new(move |_| {
        if let Some(GuardDecision::Redirect { to, notice }) = decision.get() {
            if let Some(notice) = notice {
                notifications.warning(notice);
            }
            navigate(to, Default::default());
        }
    });

    move || match decision.get() {
        Some(GuardDecision::Allow) => children().into_any(),
        _ => view! { <LoadingSpinner /> }.into_any(),
    }
}

/// Deferred navigation: set a path and an effect performs it.
///
/// Async handlers redirect through this instead of holding the router's
/// navigate closure.
pub fn use_redirect() -> RwSignal<Option<String>> {
    let navigate = use_navigate();
    let target = RwSignal::new(None::<String>);
    Effect::new(move |_| {
        if let Some(to) = target.get() {
            navigate(&to, Default::default());
        }
    });
    target
}

/// Signed-in users only
#[component]
pub fn RequireAuth(children: ChildrenFn) -> impl IntoView {
    Guarded(GuardedProps {
        check: require_authenticated,
        children,
    })
}

/// Administrators only
#[component]
pub fn RequireAdmin(children: ChildrenFn) -> impl IntoView {
    Guarded(GuardedProps {
        check: require_admin,
        children,
    })
}

/// Anonymous visitors only (landing, login, register)
#[component]
pub fn RedirectIfAuthenticated(children: ChildrenFn) -> impl IntoView {
    Guarded(GuardedProps {
        check: landing_guard,
        children,
    })
}
