//! Edit an existing declaration

use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::components::A;

use crate::core::ApiError;
use crate::core::models::{PollutionDeclaration, PollutionPayload, PollutionUpdate};
use crate::core::validation::DeclarationForm;
use crate::ui::auth::use_auth_context;
use crate::ui::common::{ErrorMessage, LoadingSpinner};
use crate::ui::guards::use_redirect;
use crate::ui::notifications::use_notifications;
use crate::ui::pages::pollution_detail::use_declaration_id;
use crate::ui::pages::pollution_form::PollutionForm;

#[component]
pub fn PollutionEditPage() -> impl IntoView {
    let auth = use_auth_context();
    let notifications = use_notifications();
    let redirect = use_redirect();
    let id = use_declaration_id();

    let declaration = RwSignal::new(None::<PollutionDeclaration>);
    let error = RwSignal::new(None::<String>);
    let busy = RwSignal::new(false);

    Effect::new(move |_| {
        let Some(id) = id.get() else {
            error.set(Some(ApiError::NotFound.user_message()));
            return;
        };
        let client = auth.client();
        spawn_local(async move {
            match client.get_pollution(id).await {
                Ok(found) => declaration.set(Some(found)),
                Err(err) => {
                    error.set(Some(err.user_message()));
                    notifications.api_error(&err);
                }
            }
        });
    });

    // Only the author or an admin may edit
    let allowed = Memo::new(move |_| {
        declaration.with(|d| {
            d.as_ref()
                .zip(auth.user())
                .map(|(d, user)| d.can_be_managed_by(&user))
        })
    });

    let on_submit = Callback::new(move |payload: PollutionPayload| {
        let Some(id) = id.get_untracked() else {
            return;
        };
        busy.set(true);
        let client = auth.client();
        spawn_local(async move {
            match client
                .update_pollution(id, &PollutionUpdate::from(payload))
                .await
            {
                Ok(_) => {
                    notifications.success("Déclaration mise à jour");
                    redirect.set(Some(format!("/pollutions/{id}")));
                }
                Err(err) => notifications.api_error(&err),
            }
            busy.set(false);
        });
    });

    view! {
        <div class="page page-narrow">
            <A href=move || id.get().map(|id| format!("/pollutions/{id}")).unwrap_or_else(|| "/pollutions".into()) attr:class="back-link">
                "← Retour"
            </A>
            <h1 class="title-xl">"Modifier la déclaration"</h1>
            <ErrorMessage error=error />
            {move || match (declaration.get(), allowed.get()) {
                (None, _) if error.with(Option::is_none) => view! { <LoadingSpinner /> }.into_any(),
                (Some(d), Some(true)) => view! {
                    <PollutionForm
                        initial=DeclarationForm::from_payload(&d.to_payload())
                        submit_label="Enregistrer"
                        on_submit=on_submit
                        busy=busy
                    />
                }.into_any(),
                (Some(_), _) => view! {
                    <p class="error-banner">"Vous ne pouvez modifier que vos propres déclarations"</p>
                }.into_any(),
                (None, _) => ().into_any(),
            }}
        </div>
    }
}
