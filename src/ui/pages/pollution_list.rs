//! Declaration list with filters
//!
//! Typed search is debounced; every filter change, including a reload after a
//! deletion, restarts the list request and only the latest response is kept.

use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::components::A;

use crate::core::models::{PollutionDeclaration, PollutionLevel, PollutionType};
use crate::core::pipeline::{DebouncedInput, FilterInputs, LatestRequest, SEARCH_DEBOUNCE_MS};
use crate::ui::auth::use_auth_context;
use crate::ui::common::{ConfirmDialog, EmptyState, ErrorMessage, LoadingSpinner, SelectField};
use crate::ui::declaration_card::DeclarationCard;
use crate::ui::icon::{Icon, icons};
use crate::ui::notifications::use_notifications;
use crate::ui::storage::use_bookmarks;
use crate::ui::timer::sleep_ms;

pub fn type_options() -> Vec<String> {
    PollutionType::ALL.iter().map(ToString::to_string).collect()
}

pub fn level_options() -> Vec<String> {
    PollutionLevel::ALL.iter().map(ToString::to_string).collect()
}

#[component]
pub fn PollutionListPage() -> impl IntoView {
    let auth = use_auth_context();
    let notifications = use_notifications();
    let bookmarks = use_bookmarks();

    let search_input = RwSignal::new(String::new());
    let search = RwSignal::new(String::new());
    let type_label = RwSignal::new(String::new());
    let level_label = RwSignal::new(String::new());
    let date_from = RwSignal::new(String::new());
    let date_to = RwSignal::new(String::new());
    let mine_only = RwSignal::new(false);
    let reload = RwSignal::new(0u32);

    let debounce = StoredValue::new(DebouncedInput::with_initial(String::new()));
    let latest = StoredValue::new(LatestRequest::new());

    let declarations = RwSignal::new(Vec::<PollutionDeclaration>::new());
    let loading = RwSignal::new(true);
    let error = RwSignal::new(None::<String>);
    let pending_delete = RwSignal::new(None::<PollutionDeclaration>);

    let on_search = Callback::new(move |value: String| {
        search_input.set(value);
        let ticket = debounce.with_value(DebouncedInput::push);
        spawn_local(async move {
            sleep_ms(SEARCH_DEBOUNCE_MS).await;
            let value = search_input.get_untracked();
            // The page may be gone by now
            if let Some(settled) = debounce.try_with_value(|d| d.settle(ticket, value)).flatten() {
                search.set(settled);
            }
        });
    });

    let inputs = Memo::new(move |_| FilterInputs {
        search: search.get(),
        type_label: type_label.get(),
        level_label: level_label.get(),
        date_from: date_from.get(),
        date_to: date_to.get(),
        reload: reload.get(),
    });

    Effect::new(move |_| {
        let filter = inputs.get().to_filter();
        let mine = mine_only.get();
        let ticket = latest.with_value(LatestRequest::begin);
        let client = auth.client();
        loading.set(true);

        spawn_local(async move {
            let result = if mine {
                client.list_my_pollutions().await
            } else {
                client.list_pollutions(&filter.to_query()).await
            };
            if !latest.try_with_value(|l| l.is_current(ticket)).unwrap_or(false) {
                return;
            }
            match result {
                Ok(list) => {
                    declarations.set(filter.apply(&list));
                    error.set(None);
                }
                Err(err) => {
                    error.set(Some(err.user_message()));
                    notifications.api_error(&err);
                }
            }
            loading.set(false);
        });
    });

    let reset_filters = move |_| {
        on_search.run(String::new());
        type_label.set(String::new());
        level_label.set(String::new());
        date_from.set(String::new());
        date_to.set(String::new());
    };

    let confirm_delete = Callback::new(move |_| {
        let Some(declaration) = pending_delete.get_untracked() else {
            return;
        };
        let client = auth.client();
        spawn_local(async move {
            match client.delete_pollution(declaration.id).await {
                Ok(()) => {
                    bookmarks.remove(declaration.id);
                    notifications.success(format!("« {} » a été supprimée", declaration.titre));
                    reload.update(|n| *n += 1);
                }
                Err(err) => notifications.api_error(&err),
            }
        });
    });

    view! {
        <div class="page">
            <div class="page-header">
                <h1 class="title-xl">"Déclarations de pollution"</h1>
                <A href="/pollutions/new" attr:class="btn-base btn-primary">
                    <Icon name=icons::PLUS class="icon-btn" />
                    "Nouvelle déclaration"
                </A>
            </div>

            <section class="card filters">
                <div class="field search-field">
                    <label class="label">"Recherche"</label>
                    <input
                        type="search"
                        class="input-base"
                        placeholder="Titre, adresse, description..."
                        prop:value=move || search_input.get()
                        on:input=move |ev| on_search.run(event_target_value(&ev))
                    />
                </div>
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
                <div class="field">
                    <label class="label">"Du"</label>
                    <input
                        type="date"
                        class="input-base"
                        prop:value=move || date_from.get()
                        on:input=move |ev| date_from.set(event_target_value(&ev))
                    />
                </div>
                <div class="field">
                    <label class="label">"Au"</label>
                    <input
                        type="date"
                        class="input-base"
                        prop:value=move || date_to.get()
                        on:input=move |ev| date_to.set(event_target_value(&ev))
                    />
                </div>
                <label class="checkbox">
                    <input
                        type="checkbox"
                        prop:checked=move || mine_only.get()
                        on:change=move |ev| mine_only.set(event_target_checked(&ev))
                    />
                    "Mes déclarations"
                </label>
                <button class="btn-base btn-ghost btn-sm" on:click=reset_filters>
                    "Réinitialiser"
                </button>
            </section>

            <ErrorMessage error=error />

            {move || if loading.get() && declarations.with(Vec::is_empty) {
                view! { <LoadingSpinner message="Chargement des déclarations".to_string() /> }.into_any()
            } else if declarations.with(Vec::is_empty) {
                view! { <EmptyState message="Aucune déclaration ne correspond à vos critères" /> }.into_any()
            } else {
                view! {
                    <p class="result-count">
                        {move || format!("{} déclaration(s)", declarations.with(Vec::len))}
                    </p>
                    <div class="declaration-grid">
                        <For
                            each=move || declarations.get()
                            key=|d| (d.id, d.updated_at.clone())
                            children=move |declaration| view! {
                                <DeclarationCard
                                    declaration=declaration
                                    on_delete=Callback::new(move |d| pending_delete.set(Some(d)))
                                />
                            }
                        />
                    </div>
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
