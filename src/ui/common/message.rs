//! Inline error and empty-state messages

use crate::ui::{Icon, icons};
use leptos::prelude::*;

/// Shows the message when Some, nothing when None
#[component]
pub fn ErrorMessage(#[prop(into)] error: Signal<Option<String>>) -> impl IntoView {
    view! {
        <Show when=move || error.get().is_some()>
            <div class="error-message" role="alert">
                <Icon name=icons::ALERT_CIRCLE class="icon-text"/>
                <span>{move || error.get().unwrap_or_default()}</span>
            </div>
        </Show>
    }
}

#[component]
pub fn EmptyState(
    message: &'static str,
    #[prop(optional)]
    children: Option<Children>,
) -> impl IntoView {
    view! {
        <div class="empty-state">
            <p>{message}</p>
            {children.map(|c| c())}
        </div>
    }
}
