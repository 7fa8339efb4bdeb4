//! New declaration page
//!
//! After a successful submission the form is replaced by a recap of what the
//! backend stored.

use chrono::Local;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::components::A;

use crate::core::models::{PollutionDeclaration, PollutionPayload};
use crate::core::validation::DeclarationForm;
use crate::ui::auth::use_auth_context;
use crate::ui::icon::{Icon, icons};
use crate::ui::notifications::use_notifications;
use crate::ui::pages::pollution_detail::DeclarationDetails;
use crate::ui::pages::pollution_form::PollutionForm;

#[component]
pub fn PollutionCreatePage() -> impl IntoView {
    let auth = use_auth_context();
    let notifications = use_notifications();

    let busy = RwSignal::new(false);
    let created = RwSignal::new(None::<PollutionDeclaration>);

    let on_submit = Callback::new(move |payload: PollutionPayload| {
        busy.set(true);
        let client = auth.client();
        spawn_local(async move {
            match client.create_pollution(&payload).await {
                Ok(declaration) => {
                    notifications.success("Déclaration enregistrée");
                    created.set(Some(declaration));
                }
                Err(err) => notifications.api_error(&err),
            }
            busy.set(false);
        });
    });

    let declare_another = move |_| created.set(None);

    view! {
        <div class="page page-narrow">
            {move || match created.get() {
                None => {
                    view! {
                        <h1 class="title-xl">"Nouvelle déclaration"</h1>
                        <PollutionForm
                            initial=DeclarationForm::new(Local::now().date_naive())
                            submit_label="Déclarer"
                            on_submit=on_submit
                            busy=busy
                        />
                    }.into_any()
                }
                Some(declaration) => {
                    let id = declaration.id;
                    view! {
                        <div class="card recap-card">
                            <h1 class="title-xl">
                                <Icon name=icons::CHECK class="icon-title" />
                                "Déclaration enregistrée"
                            </h1>
                            <h2 class="title-lg">{declaration.titre.clone()}</h2>
                            <DeclarationDetails declaration=declaration />
                            <div class="form-actions">
                                <A href=format!("/pollutions/{id}") attr:class="btn-base btn-primary">
                                    "Voir la déclaration"
                                </A>
                                <A href="/pollutions" attr:class="btn-base btn-secondary">
                                    "Retour à la liste"
                                </A>
                                <button class="btn-base btn-ghost" on:click=declare_another>
                                    <Icon name=icons::PLUS class="icon-btn" />
                                    "Nouvelle déclaration"
                                </button>
                            </div>
                        </div>
                    }.into_any()
                }
            }}
        </div>
    }
}
