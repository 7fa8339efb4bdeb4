//! Declaration moderation

use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::components::A;

use crate::core::api::PollutionQuery;
use crate::core::filter::DeclarationFilter;
use crate::core::models::PollutionDeclaration;
use crate::ui::auth::use_auth_context;
use crate::ui::common::{
    ConfirmDialog, EmptyState, ErrorMessage, LevelBadge, LoadingSpinner, SelectField, TypeBadge,
};
use crate::ui::icon::{Icon, icons};
use crate::ui::notifications::use_notifications;
use crate::ui::pages::pollution_list::{level_options, type_options};
use crate::ui::storage::use_bookmarks;

#[component]
pub fn AdminPollutionsPage() -> impl IntoView {
    let auth = use_auth_context();
    let notifications = use_notifications();
    let bookmarks = use_bookmarks();

    let declarations = RwSignal::new(Vec::<PollutionDeclaration>::new());
    let loading = RwSignal::new(true);
    let error = RwSignal::new(None::<String>);
    let type_label = RwSignal::new(String::new());
    let level_label = RwSignal::new(String::new());
    let pending_delete = RwSignal::new(None::<PollutionDeclaration>);

    Effect::new(move |_| {
        let client = auth.client();
        spawn_local(async move {
            match client.list_pollutions(&PollutionQuery::default()).await {
                Ok(list) => declarations.set(list),
                Err(err) => {
                    error.set(Some(err.user_message()));
                    notifications.api_error(&err);
                }
            }
            loading.set(false);
        });
    });

    let visible = Memo::new(move |_| {
        let filter = DeclarationFilter::from_inputs("", &type_label.get(), &level_label.get(), "", "");
        declarations.with(|list| filter.apply(list))
    });

    let confirm_delete = Callback::new(move |_| {
        let Some(target) = pending_delete.get_untracked() else {
            return;
        };
        let client = auth.client();
        spawn_local(async move {
            match client.delete_pollution(target.id).await {
                Ok(()) => {
                    declarations.update(|list| list.retain(|d| d.id != target.id));
                    bookmarks.remove(target.id);
                    notifications.success(format!("« {} » a été supprimée", target.titre));
                }
                Err(err) => notifications.api_error(&err),
            }
        });
    });

    view! {
        <div class="page">
            <h1 class="title-xl">"Modération des déclarations"</h1>
            <section class="card filters">
                <SelectField
                    label="Type"
                    value=type_label
                    on_change=Callback::new(move |v| type_label.set(v))
                    options=type_options()
                />
                <SelectField
                    label="Niveau"
                    value=level_label
                    on_change=Callback::new(move |v| level_label.set(v))
                    options=level_options()
                />
                <p class="result-count">
                    {move || format!("{} / {}", visible.with(Vec::len), declarations.with(Vec::len))}
                </p>
            </section>
            <ErrorMessage error=error />

            {move || if loading.get() {
                view! { <LoadingSpinner /> }.into_any()
            } else if visible.with(Vec::is_empty) {
                view! { <EmptyState message="Aucune déclaration" /> }.into_any()
            } else {
                view! {
                    <table class="card data-table">
                        <thead>
                            <tr>
                                <th>"Titre"</th>
                                <th>"Type"</th>
                                <th>"Niveau"</th>
                                <th>"Date"</th>
                                <th>"Auteur"</th>
                                <th></th>
                            </tr>
                        </thead>
                        <tbody>
                            <For
                                each=move || visible.get()
                                key=|d| d.id
                                children=move |d| {
                                    let for_delete = d.clone();
                                    let href = format!("/pollutions/{}", d.id);
                                    let titre = d.titre.clone();
                                    let author = d.author_display();
                                    view! {
                                        <tr>
                                            <td>
                                                <A href=href>{titre}</A>
                                            </td>
                                            <td><TypeBadge pollution_type=d.pollution_type /></td>
                                            <td><LevelBadge level=d.niveau /></td>
                                            <td>{d.date_observation.clone()}</td>
                                            <td>{author}</td>
                                            <td class="row-actions">
                                                <button
                                                    class="btn-base btn-danger btn-sm"
                                                    on:click=move |_| pending_delete.set(Some(for_delete.clone()))
                                                >
                                                    <Icon name=icons::TRASH class="icon-btn" />
                                                    "Supprimer"
                                                </button>
                                            </td>
                                        </tr>
                                    }
                                }
                            />
                        </tbody>
                    </table>
                }.into_any()
            }}

            <ConfirmDialog
                title="Supprimer la déclaration".to_string()
                message=Signal::derive(move || {
                    pending_delete
                        .with(|d| d.as_ref().map(|d| format!("Supprimer définitivement « {} » ?", d.titre)))
                        .unwrap_or_default()
                })
                is_open=Signal::derive(move || pending_delete.with(Option::is_some))
                on_confirm=confirm_delete
                on_cancel=Callback::new(move |_| pending_delete.set(None))
                confirm_text="Supprimer"
            />
        </div>
    }
}
