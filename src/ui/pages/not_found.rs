//! Not found page component
//!
//! A 404 error page displayed when a route is not found.

use leptos::prelude::*;
use leptos_router::components::A;

use crate::ui::icon::{Icon, icons};

#[component]
pub fn NotFoundPage() -> impl IntoView {
    view! {
        <div class="not-found">
            <Icon name=icons::ALERT_CIRCLE class="icon-feature" />
            <h1 class="not-found-code">"404"</h1>
            <h2 class="title-lg">"Page introuvable"</h2>
            <p class="text-secondary">
                "La page que vous cherchez n'existe pas ou a été déplacée."
            </p>
            <A href="/" attr:class="btn-base btn-primary">"Retour à l'accueil"</A>
        </div>
    }
}
