//! User administration: search, role changes and deletion
//!
//! An admin never acts on their own account from here.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::core::filter::filter_users;
use crate::core::models::{Role, User};
use crate::ui::auth::use_auth_context;
use crate::ui::common::{ConfirmDialog, EmptyState, ErrorMessage, LoadingSpinner, RoleBadge};
use crate::ui::icon::{Icon, icons};
use crate::ui::notifications::use_notifications;

#[component]
pub fn AdminUsersPage() -> impl IntoView {
    let auth = use_auth_context();
    let notifications = use_notifications();

    let users = RwSignal::new(Vec::<User>::new());
    let loading = RwSignal::new(true);
    let error = RwSignal::new(None::<String>);
    let query = RwSignal::new(String::new());
    let pending_delete = RwSignal::new(None::<User>);

    Effect::new(move |_| {
        let client = auth.client();
        spawn_local(async move {
            match client.list_users(None).await {
                Ok(list) => users.set(list),
                Err(err) => {
                    error.set(Some(err.user_message()));
                    notifications.api_error(&err);
                }
            }
            loading.set(false);
        });
    });

    let visible = Memo::new(move |_| users.with(|u| filter_users(u, &query.get())));
    let is_self = move |user: &User| auth.user_untracked().is_some_and(|me| me.id == user.id);

    let toggle_role = move |user: User| {
        if is_self(&user) {
            notifications.warning("Vous ne pouvez pas modifier votre propre rôle");
            return;
        }
        let role = user.role().toggled();
        let client = auth.client();
        spawn_local(async move {
            match client.set_user_role(user.id, role).await {
                Ok(updated) => {
                    users.update(|list| {
                        if let Some(slot) = list.iter_mut().find(|u| u.id == updated.id) {
                            *slot = updated.clone();
                        }
                    });
                    let message = match role {
                        Role::Admin => format!("{} est maintenant administrateur", updated.full_name()),
                        Role::User => format!("{} n'est plus administrateur", updated.full_name()),
                    };
                    notifications.success(message);
                }
                Err(err) => notifications.api_error(&err),
            }
        });
    };

    let confirm_delete = Callback::new(move |_| {
        let Some(user) = pending_delete.get_untracked() else {
            return;
        };
        if is_self(&user) {
            return;
        }
        let client = auth.client();
        spawn_local(async move {
            match client.delete_user(user.id).await {
                Ok(()) => {
                    users.update(|list| list.retain(|u| u.id != user.id));
                    notifications.success(format!("{} a été supprimé", user.full_name()));
                }
                Err(err) => notifications.api_error(&err),
            }
        });
    });

    view! {
        <div class="page">
            <div class="page-header">
                <h1 class="title-xl">"Utilisateurs"</h1>
                <div class="field search-field">
                    <input
                        type="search"
                        class="input-base"
                        placeholder="Nom, prénom, email, identifiant..."
                        prop:value=move || query.get()
                        on:input=move |ev| query.set(event_target_value(&ev))
                    />
                </div>
            </div>
            <ErrorMessage error=error />

            {move || if loading.get() {
                view! { <LoadingSpinner /> }.into_any()
            } else if visible.with(Vec::is_empty) {
                view! { <EmptyState message="Aucun utilisateur trouvé" /> }.into_any()
            } else {
                view! {
                    <table class="card data-table">
                        <thead>
                            <tr>
                                <th>"Nom"</th>
                                <th>"Identifiant"</th>
                                <th>"Email"</th>
                                <th>"Rôle"</th>
                                <th></th>
                            </tr>
                        </thead>
                        <tbody>
                            <For
                                each=move || visible.get()
                                key=|u| (u.id, u.role())
                                children=move |user| {
                                    let own = is_self(&user);
                                    let for_toggle = user.clone();
                                    let for_delete = user.clone();
                                    let role_label = match user.role() {
                                        Role::Admin => "Rétrograder",
                                        Role::User => "Promouvoir",
                                    };
                                    view! {
                                        <tr class:self-row=own>
                                            <td>{user.full_name()}</td>
                                            <td>{user.nom_utilisateur.clone()}</td>
                                            <td>{user.email.clone()}</td>
                                            <td><RoleBadge role=user.role() /></td>
                                            <td class="row-actions">
                                                <button
                                                    class="btn-base btn-secondary btn-sm"
                                                    disabled=own
                                                    on:click=move |_| toggle_role(for_toggle.clone())
                                                >
                                                    <Icon name=icons::SHIELD class="icon-btn" />
                                                    {role_label}
                                                </button>
                                                <button
                                                    class="btn-base btn-danger btn-sm"
                                                    disabled=own
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
                title="Supprimer l'utilisateur".to_string()
                message=Signal::derive(move || {
                    pending_delete
                        .with(|u| u.as_ref().map(|u| format!("Supprimer définitivement le compte de {} ?", u.full_name())))
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
