//! Login form component
//!
//! Identifier (email or username) and password. Errors from the backend are
//! read from the session store.

use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::components::A;

use super::context::use_auth_context;
use crate::core::guards::HOME_PATH;
use crate::core::validation::validate_login;
use crate::ui::common::{Button, ErrorMessage, FormField};
use crate::ui::guards::use_redirect;
use crate::ui::notifications::use_notifications;

#[component]
pub fn LoginForm() -> impl IntoView {
    let auth = use_auth_context();
    let notifications = use_notifications();
    let redirect = use_redirect();

    let identifier = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let identifier_error = RwSignal::new(None::<String>);
    let password_error = RwSignal::new(None::<String>);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        auth.clear_error();

        let result = validate_login(&identifier.get_untracked(), &password.get_untracked());
        identifier_error.set(result.error_for("identifiant").map(ToString::to_string));
        password_error.set(result.error_for("password").map(ToString::to_string));
        if !result.is_valid() {
            return;
        }

        spawn_local(async move {
            let login = auth
                .login(&identifier.get_untracked(), &password.get_untracked())
                .await;
            match login {
                Ok(user) => {
                    notifications.success(format!("Bienvenue {}", user.prenom));
                    redirect.set(Some(HOME_PATH.to_string()));
                }
                // Already recorded in the session store
                Err(_) => password.set(String::new()),
            }
        });
    };

    view! {
        <form on:submit=on_submit class="auth-form" novalidate>
            <div class="auth-header">
                <h2 class="title-xl">"Connexion"</h2>
                <p class="subtitle">"Connectez-vous pour déclarer et suivre les pollutions"</p>
            </div>

            <ErrorMessage error=Signal::derive(move || auth.error()) />

            <FormField
                label="Email ou nom d'utilisateur"
                required=true
                autocomplete="username"
                value=identifier
                on_input=Callback::new(move |v| {
                    identifier.set(v);
                    identifier_error.set(None);
                })
                error=identifier_error
            />
            <FormField
                label="Mot de passe"
                required=true
                input_type="password"
                autocomplete="current-password"
                value=password
                on_input=Callback::new(move |v| {
                    password.set(v);
                    password_error.set(None);
                })
                error=password_error
            />

            <Button button_type="submit" loading=Signal::derive(move || auth.is_loading())>
                "Se connecter"
            </Button>

            <p class="auth-switch">
                "Pas encore de compte ? "
                <A href="/register">"Créer un compte"</A>
            </p>
        </form>
    }
}
