//! Register form component
//!
//! Names, username, email and a confirmed password. Field rules live in
//! [`crate::core::validation::RegisterForm`].

use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::components::A;

use super::context::use_auth_context;
use crate::core::guards::HOME_PATH;
use crate::core::validation::{RegisterForm as RegisterFields, ValidationResult};
use crate::ui::common::{Button, ErrorMessage, FormField};
use crate::ui::guards::use_redirect;
use crate::ui::notifications::use_notifications;

#[component]
pub fn RegisterForm() -> impl IntoView {
    let auth = use_auth_context();
    let notifications = use_notifications();
    let redirect = use_redirect();

    let form = RwSignal::new(RegisterFields::default());
    let validation = RwSignal::new(ValidationResult::new());

    let field_error = move |field: &'static str| {
        Signal::derive(move || {
            validation.with(|v| v.error_for(field).map(ToString::to_string))
        })
    };

    // Editing a field clears the errors shown so far
    let setter = move |apply: fn(&mut RegisterFields, String)| {
        Callback::new(move |value: String| {
            form.update(|f| apply(f, value));
            validation.set(ValidationResult::new());
        })
    };

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        auth.clear_error();

        let payload = match form.with_untracked(RegisterFields::to_payload) {
            Ok(payload) => payload,
            Err(result) => {
                validation.set(result);
                return;
            }
        };

        spawn_local(async move {
            if let Ok(user) = auth.register(&payload).await {
                notifications.success(format!("Compte créé, bienvenue {}", user.prenom));
                redirect.set(Some(HOME_PATH.to_string()));
            }
        });
    };

    view! {
        <form on:submit=on_submit class="auth-form" novalidate>
            <div class="auth-header">
                <h2 class="title-xl">"Inscription"</h2>
                <p class="subtitle">"Créez un compte pour signaler une pollution"</p>
            </div>

            <ErrorMessage error=Signal::derive(move || auth.error()) />

            <div class="form-row">
                <FormField
                    label="Prénom"
                    required=true
                    autocomplete="given-name"
                    value=Signal::derive(move || form.with(|f| f.prenom.clone()))
                    on_input=setter(|f, v| f.prenom = v)
                    error=field_error("prenom")
                />
                <FormField
                    label="Nom"
                    required=true
                    autocomplete="family-name"
                    value=Signal::derive(move || form.with(|f| f.nom.clone()))
                    on_input=setter(|f, v| f.nom = v)
                    error=field_error("nom")
                />
            </div>
            <FormField
                label="Nom d'utilisateur"
                required=true
                autocomplete="username"
                value=Signal::derive(move || form.with(|f| f.nom_utilisateur.clone()))
                on_input=setter(|f, v| f.nom_utilisateur = v)
                error=field_error("nomUtilisateur")
            />
            <FormField
                label="Email"
                required=true
                input_type="email"
                autocomplete="email"
                placeholder="vous@exemple.fr"
                value=Signal::derive(move || form.with(|f| f.email.clone()))
                on_input=setter(|f, v| f.email = v)
                error=field_error("email")
            />
            <FormField
                label="Mot de passe"
                required=true
                input_type="password"
                autocomplete="new-password"
                value=Signal::derive(move || form.with(|f| f.password.clone()))
                on_input=setter(|f, v| f.password = v)
                error=field_error("password")
            />
            <FormField
                label="Confirmer le mot de passe"
                required=true
                input_type="password"
                autocomplete="new-password"
                value=Signal::derive(move || form.with(|f| f.confirm_password.clone()))
                on_input=setter(|f, v| f.confirm_password = v)
                error=field_error("confirmPassword")
            />

            <Button button_type="submit" loading=Signal::derive(move || auth.is_loading())>
                "Créer mon compte"
            </Button>

            <p class="auth-switch">
                "Déjà inscrit ? "
                <A href="/login">"Se connecter"</A>
            </p>
        </form>
    }
}
