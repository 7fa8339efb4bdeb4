//! Bookmarked declarations

use leptos::prelude::*;
use leptos_router::components::A;

use crate::ui::common::{ConfirmDialog, EmptyState, LevelBadge, TypeBadge};
use crate::ui::icon::{Icon, icons};
use crate::ui::notifications::use_notifications;
use crate::ui::storage::use_bookmarks;

#[component]
pub fn FavoritesPage() -> impl IntoView {
    let bookmarks = use_bookmarks();
    let notifications = use_notifications();
    let confirm_clear = RwSignal::new(false);

    let clear = Callback::new(move |_| {
        bookmarks.clear();
        notifications.info("Favoris vidés");
    });

    view! {
        <div class="page">
            <div class="page-header">
                <h1 class="title-xl">
                    <Icon name=icons::BOOKMARK_FILLED class="icon-title" />
                    "Mes favoris"
                </h1>
                <Show when=move || { bookmarks.count() > 0 }>
                    <button
                        class="btn-base btn-ghost btn-sm"
                        on:click=move |_| confirm_clear.set(true)
                    >
                        "Tout retirer"
                    </button>
                </Show>
            </div>

            <Show
                when=move || { bookmarks.count() > 0 }
                fallback=|| view! {
                    <EmptyState message="Aucun favori pour le moment">
                        <A href="/pollutions" attr:class="btn-base btn-primary">
                            "Parcourir les déclarations"
                        </A>
                    </EmptyState>
                }
            >
                <ul class="bookmark-list">
                    <For
                        each=move || bookmarks.list()
                        key=|b| b.pollution_id
                        children=move |bookmark| {
                            let id = bookmark.pollution_id;
                            let titre = bookmark.titre.clone();
                            view! {
                                <li class="card bookmark-item">
                                    <A href=format!("/pollutions/{id}") attr:class="declaration-title">
                                        {titre}
                                    </A>
                                    <div class="badges">
                                        <TypeBadge pollution_type=bookmark.pollution_type />
                                        <LevelBadge level=bookmark.niveau />
                                    </div>
                                    <span class="text-secondary">
                                        {format!("Ajouté le {}", bookmark.saved_at.format("%d/%m/%Y"))}
                                    </span>
                                    <button
                                        class="btn-icon"
                                        title="Retirer des favoris"
                                        on:click=move |_| {
                                            bookmarks.remove(id);
                                            notifications.info("Retiré des favoris");
                                        }
                                    >
                                        <Icon name=icons::TRASH class="icon-btn" />
                                    </button>
                                </li>
                            }
                        }
                    />
                </ul>
            </Show>

            <ConfirmDialog
                title="Vider les favoris".to_string()
                message="Retirer toutes les déclarations de vos favoris ?".to_string()
                is_open=confirm_clear
                on_confirm=clear
                on_cancel=Callback::new(move |_| confirm_clear.set(false))
                confirm_text="Tout retirer"
            />
        </div>
    }
}
