//! Declaration detail page

use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::components::A;
use leptos_router::hooks::use_params_map;

use crate::core::ApiError;
use crate::core::models::{PhotoSource, PollutionDeclaration};
use crate::core::validation::is_previewable_photo_url;
use crate::ui::auth::use_auth_context;
use crate::ui::common::{ConfirmDialog, ErrorMessage, LevelBadge, LoadingSpinner, TypeBadge};
use crate::ui::declaration_card::BookmarkButton;
use crate::ui::guards::use_redirect;
use crate::ui::icon::{Icon, icons};
use crate::ui::notifications::use_notifications;
use crate::ui::storage::use_bookmarks;

/// Id from the `:id` route segment
pub fn use_declaration_id() -> Memo<Option<i64>> {
    let params = use_params_map();
    Memo::new(move |_| params.with(|p| p.get("id").and_then(|id| id.parse().ok())))
}

/// Every field of a declaration, read only
#[component]
pub fn DeclarationDetails(declaration: PollutionDeclaration) -> impl IntoView {
    let photo = declaration
        .photo_url
        .clone()
        .filter(|url| is_previewable_photo_url(url));
    let photo_caption = match declaration.photo_source() {
        PhotoSource::Upload => "Photo téléversée",
        PhotoSource::Url => "Photo externe",
    };
    let coordinates = match (declaration.latitude, declaration.longitude) {
        (Some(lat), Some(lon)) => Some(format!("{lat:.6}, {lon:.6}")),
        _ => None,
    };

    view! {
        <div class="declaration-details">
            <div class="badges">
                <TypeBadge pollution_type=declaration.pollution_type />
                <LevelBadge level=declaration.niveau />
            </div>
            <p class="description">{declaration.description.clone()}</p>
            <dl class="details-grid">
                <dt>"Date d'observation"</dt>
                <dd>{declaration.date_observation.clone()}</dd>
                <dt>"Localisation"</dt>
                <dd>
                    <Icon name=icons::MAP_PIN class="icon-text" />
                    {declaration.location_display()}
                </dd>
                {coordinates.map(|c| view! {
                    <dt>"Coordonnées GPS"</dt>
                    <dd>{c}</dd>
                })}
                <dt>"Déclaré par"</dt>
                <dd>{declaration.author_display()}</dd>
            </dl>
            {photo.map(|src| view! {
                <figure class="photo">
                    <img class="photo-full" src=src alt=declaration.titre.clone() />
                    <figcaption>{photo_caption}</figcaption>
                </figure>
            })}
        </div>
    }
}

#[component]
pub fn PollutionDetailPage() -> impl IntoView {
    let auth = use_auth_context();
    let notifications = use_notifications();
    let bookmarks = use_bookmarks();
    let redirect = use_redirect();
    let id = use_declaration_id();

    let declaration = RwSignal::new(None::<PollutionDeclaration>);
    let error = RwSignal::new(None::<String>);
    let confirm_open = RwSignal::new(false);

    Effect::new(move |_| {
        let Some(id) = id.get() else {
            error.set(Some(ApiError::NotFound.user_message()));
            return;
        };
        let client = auth.client();
        spawn_local(async move {
            match client.get_pollution(id).await {
                Ok(found) => {
                    error.set(None);
                    declaration.set(Some(found));
                }
                Err(err) => {
                    error.set(Some(err.user_message()));
                    notifications.api_error(&err);
                }
            }
        });
    });

    let can_manage = move || {
        declaration.with(|d| {
            d.as_ref()
                .zip(auth.user())
                .is_some_and(|(d, user)| d.can_be_managed_by(&user))
        })
    };

    let delete = Callback::new(move |_| {
        let Some(target) = declaration.get_untracked() else {
            return;
        };
        let client = auth.client();
        spawn_local(async move {
            match client.delete_pollution(target.id).await {
                Ok(()) => {
                    bookmarks.remove(target.id);
                    notifications.success("Déclaration supprimée");
                    redirect.set(Some("/pollutions".to_string()));
                }
                Err(err) => notifications.api_error(&err),
            }
        });
    });

    view! {
        <div class="page">
            <A href="/pollutions" attr:class="back-link">"← Retour à la liste"</A>
            <ErrorMessage error=error />
            {move || match declaration.get() {
                None if error.with(Option::is_none) => view! { <LoadingSpinner /> }.into_any(),
                None => ().into_any(),
                Some(d) => {
                    let id = d.id;
                    view! {
                        <article class="card">
                            <header class="page-header">
                                <h1 class="title-xl">{d.titre.clone()}</h1>
                                <div class="header-actions">
                                    <BookmarkButton declaration=d.clone() />
                                    <Show when=can_manage>
                                        <A href=format!("/pollutions/{id}/edit") attr:class="btn-base btn-secondary btn-sm">
                                            <Icon name=icons::EDIT class="icon-btn" />
                                            "Modifier"
                                        </A>
                                        <button
                                            class="btn-base btn-danger btn-sm"
                                            on:click=move |_| confirm_open.set(true)
                                        >
                                            <Icon name=icons::TRASH class="icon-btn" />
                                            "Supprimer"
                                        </button>
                                    </Show>
                                </div>
                            </header>
                            <DeclarationDetails declaration=d />
                        </article>
                    }.into_any()
                }
            }}
            <ConfirmDialog
                title="Supprimer la déclaration".to_string()
                message="Cette action est définitive.".to_string()
                is_open=confirm_open
                on_confirm=delete
                on_cancel=Callback::new(move |_| confirm_open.set(false))
                confirm_text="Supprimer"
            />
        </div>
    }
}
