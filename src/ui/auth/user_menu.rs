//! Navigation bar
//!
//! Shows login/register links when anonymous; otherwise the main sections,
//! the bookmark count, the admin link for administrators, the user's name
//! and a logout button.

use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::components::A;

use super::context::use_auth_context;
use crate::core::guards::LOGIN_PATH;
use crate::ui::common::CountBadge;
use crate::ui::guards::use_redirect;
use crate::ui::icon::{Icon, icons};
use crate::ui::notifications::use_notifications;
use crate::ui::storage::use_bookmarks;

#[component]
pub fn UserMenu() -> impl IntoView {
    let auth = use_auth_context();
    let bookmarks = use_bookmarks();
    let notifications = use_notifications();
    let redirect = use_redirect();

    let handle_logout = move |_| {
        spawn_local(async move {
            auth.logout().await;
            notifications.info("Vous êtes déconnecté");
            redirect.set(Some(LOGIN_PATH.to_string()));
        });
    };

    view! {
        <nav class="navbar">
            <A href="/" attr:class="navbar-brand">"Pollution Watch"</A>
            {move || match auth.user() {
                None => view! {
                    <div class="navbar-links">
                        <A href="/login" attr:class="nav-link">"Connexion"</A>
                        <A href="/register" attr:class="btn-base btn-primary btn-sm">"Inscription"</A>
                    </div>
                }.into_any(),
                Some(user) => view! {
                    <div class="navbar-links">
                        <A href="/pollutions" attr:class="nav-link">"Déclarations"</A>
                        <A href="/pollutions/new" attr:class="nav-link">
                            <Icon name=icons::PLUS class="icon-text" />
                            "Déclarer"
                        </A>
                        <A href="/pollutions/recap" attr:class="nav-link">"Récapitulatif"</A>
                        <A href="/favorites" attr:class="nav-link">
                            <Icon name=icons::BOOKMARK class="icon-text" />
                            "Favoris"
                            <CountBadge count=Signal::derive(move || bookmarks.count()) />
                        </A>
                        {user.is_admin().then(|| view! {
                            <A href="/admin" attr:class="nav-link nav-admin">
                                <Icon name=icons::SHIELD class="icon-text" />
                                "Administration"
                            </A>
                        })}
                    </div>
                    <div class="navbar-user">
                        <A href="/profile" attr:class="nav-link">
                            <Icon name=icons::USER class="icon-text" />
                            {user.full_name()}
                        </A>
                        <button class="btn-base btn-ghost btn-sm" on:click=handle_logout>
                            <Icon name=icons::LOGOUT class="icon-btn" />
                            "Déconnexion"
                        </button>
                    </div>
                }.into_any(),
            }}
        </nav>
    }
}
