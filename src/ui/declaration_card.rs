use leptos::prelude::*;
use leptos_router::components::A;

use crate::core::models::PollutionDeclaration;
use crate::ui::auth::use_auth_context;
use crate::ui::common::{LevelBadge, TypeBadge};
use crate::ui::icon::{Icon, icons};
use crate::ui::notifications::use_notifications;
use crate::ui::storage::use_bookmarks;

/// Bookmark toggle for one declaration
#[component]
pub fn BookmarkButton(declaration: PollutionDeclaration) -> impl IntoView {
    let bookmarks = use_bookmarks();
    let notifications = use_notifications();
    let id = declaration.id;
    let declaration = StoredValue::new(declaration);

    let on_click = move |_| {
        let added = declaration.with_value(|d| bookmarks.toggle(d));
        if added {
            notifications.success("Ajouté aux favoris");
        } else {
            notifications.info("Retiré des favoris");
        }
    };

    view! {
        <button
            class="btn-icon bookmark-toggle"
            class:bookmarked=move || bookmarks.contains(id)
            title=move || if bookmarks.contains(id) { "Retirer des favoris" } else { "Ajouter aux favoris" }
            on:click=on_click
        >
            {move || {
                let name = if bookmarks.contains(id) { icons::BOOKMARK_FILLED } else { icons::BOOKMARK };
                view! { <Icon name=name class="icon-btn" /> }
            }}
        </button>
    }
}

/// Summary card used by the declaration list
#[component]
pub fn DeclarationCard(
    declaration: PollutionDeclaration,
    /// Asks for a confirmed deletion
    on_delete: Callback<PollutionDeclaration>,
) -> impl IntoView {
    let auth = use_auth_context();
    let id = declaration.id;
    let can_manage = {
        let declaration = declaration.clone();
        move || auth.user().is_some_and(|u| declaration.can_be_managed_by(&u))
    };
    let for_delete = StoredValue::new(declaration.clone());
    let titre = declaration.titre.clone();

    view! {
        <article class="card declaration-card">
            <header class="declaration-card-header">
                <A href=format!("/pollutions/{id}") attr:class="declaration-title">
                    {titre}
                </A>
                <BookmarkButton declaration=declaration.clone() />
            </header>
            <div class="badges">
                <TypeBadge pollution_type=declaration.pollution_type />
                <LevelBadge level=declaration.niveau />
            </div>
            <p class="declaration-location">
                <Icon name=icons::MAP_PIN class="icon-text" />
                {declaration.location_display()}
            </p>
            <p class="declaration-meta">
                {format!(
                    "Observé le {} par {}",
                    declaration.date_observation,
                    declaration.author_display()
                )}
            </p>
            <Show when=can_manage>
                <footer class="declaration-actions">
                    <A href=format!("/pollutions/{id}/edit") attr:class="btn-base btn-secondary btn-sm">
                        <Icon name=icons::EDIT class="icon-btn" />
                        "Modifier"
                    </A>
                    <button
                        class="btn-base btn-danger btn-sm"
                        on:click=move |_| on_delete.run(for_delete.get_value())
                    >
                        <Icon name=icons::TRASH class="icon-btn" />
                        "Supprimer"
                    </button>
                </footer>
            </Show>
        </article>
    }
}
