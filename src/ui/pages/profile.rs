//! User profile page
//!
//! Shows the signed-in account and lets the user edit their names, email and
//! username. A successful save also refreshes the session user.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::core::guards::LOGIN_PATH;
use crate::core::models::{User, UserUpdate};
use crate::core::validation::{ValidationResult, validate_profile};
use crate::ui::auth::use_auth_context;
use crate::ui::common::{Button, ButtonVariant, FormField, RoleBadge};
use crate::ui::guards::use_redirect;
use crate::ui::icon::{Icon, icons};
use crate::ui::notifications::use_notifications;

/// Editable profile fields
#[derive(Debug, Clone, Default, PartialEq)]
struct ProfileFields {
    nom: String,
    prenom: String,
    email: String,
    nom_utilisateur: String,
}

impl ProfileFields {
    fn from_user(user: &User) -> Self {
        Self {
            nom: user.nom.clone(),
            prenom: user.prenom.clone(),
            email: user.email.clone(),
            nom_utilisateur: user.nom_utilisateur.clone(),
        }
    }

    fn validate(&self) -> ValidationResult {
        validate_profile(&self.nom, &self.prenom, &self.email, &self.nom_utilisateur)
    }

    /// Only the fields that differ from `user`
    fn changes(&self, user: &User) -> UserUpdate {
        let changed = |new: &str, old: &str| (new.trim() != old).then(|| new.trim().to_string());
        UserUpdate {
            nom: changed(&self.nom, &user.nom),
            prenom: changed(&self.prenom, &user.prenom),
            email: changed(&self.email, &user.email),
            nom_utilisateur: changed(&self.nom_utilisateur, &user.nom_utilisateur),
            role: None,
        }
    }
}

fn initials(user: &User) -> String {
    user.prenom
        .chars()
        .take(1)
        .chain(user.nom.chars().take(1))
        .flat_map(char::to_uppercase)
        .collect()
}

#[component]
fn ProfileCard(user: User) -> impl IntoView {
    view! {
        <div class="card profile-card">
            <div class="avatar">{initials(&user)}</div>
            <div>
                <h2 class="title-lg">{user.full_name()}</h2>
                <p class="text-secondary">{format!("@{}", user.nom_utilisateur)}</p>
                <p class="text-secondary">{user.email.clone()}</p>
                <RoleBadge role=user.role() />
                {user.date_creation.clone().map(|d| view! {
                    <p class="text-secondary">{format!("Membre depuis le {}", d.get(..10).unwrap_or(&d))}</p>
                })}
            </div>
        </div>
    }
}

#[component]
pub fn ProfilePage() -> impl IntoView {
    let auth = use_auth_context();
    let notifications = use_notifications();
    let redirect = use_redirect();

    let editing = RwSignal::new(false);
    let saving = RwSignal::new(false);
    let fields = RwSignal::new(ProfileFields::default());
    let validation = RwSignal::new(ValidationResult::new());

    let field_error = move |field: &'static str| {
        Signal::derive(move || validation.with(|v| v.error_for(field).map(ToString::to_string)))
    };
    let field_value = move |get: fn(&ProfileFields) -> String| Signal::derive(move || fields.with(get));
    let setter = move |apply: fn(&mut ProfileFields, String)| {
        Callback::new(move |value: String| fields.update(|f| apply(f, value)))
    };

    let start_editing = Callback::new(move |_| {
        if let Some(user) = auth.user_untracked() {
            fields.set(ProfileFields::from_user(&user));
            validation.set(ValidationResult::new());
            editing.set(true);
        }
    });

    let save = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let Some(user) = auth.user_untracked() else {
            return;
        };
        let current = fields.get_untracked();
        let result = current.validate();
        if !result.is_valid() {
            validation.set(result);
            return;
        }
        let update = current.changes(&user);
        if update == UserUpdate::default() {
            editing.set(false);
            return;
        }

        saving.set(true);
        let client = auth.client();
        spawn_local(async move {
            match client.update_user(user.id, &update).await {
                Ok(_) => {
                    notifications.success("Profil mis à jour");
                    editing.set(false);
                }
                Err(err) => notifications.api_error(&err),
            }
            saving.set(false);
        });
    };

    let logout = move |_| {
        spawn_local(async move {
            auth.logout().await;
            notifications.info("Vous êtes déconnecté");
            redirect.set(Some(LOGIN_PATH.to_string()));
        });
    };

    view! {
        <div class="page page-narrow">
            <h1 class="title-xl">
                <Icon name=icons::USER class="icon-title" />
                "Mon profil"
            </h1>
            {move || auth.user().map(|user| view! { <ProfileCard user=user /> })}

            <Show
                when=move || editing.get()
                fallback=move || view! {
                    <div class="form-actions">
                        <Button variant=ButtonVariant::Secondary icon=icons::EDIT on_click=start_editing>
                            "Modifier mes informations"
                        </Button>
                    </div>
                }
            >
                <form class="card" on:submit=save novalidate>
                    <div class="form-row">
                        <FormField
                            label="Prénom"
                            required=true
                            value=field_value(|f| f.prenom.clone())
                            on_input=setter(|f, v| f.prenom = v)
                            error=field_error("prenom")
                        />
                        <FormField
                            label="Nom"
                            required=true
                            value=field_value(|f| f.nom.clone())
                            on_input=setter(|f, v| f.nom = v)
                            error=field_error("nom")
                        />
                    </div>
                    <FormField
                        label="Nom d'utilisateur"
                        required=true
                        value=field_value(|f| f.nom_utilisateur.clone())
                        on_input=setter(|f, v| f.nom_utilisateur = v)
                        error=field_error("nomUtilisateur")
                    />
                    <FormField
                        label="Email"
                        required=true
                        input_type="email"
                        value=field_value(|f| f.email.clone())
                        on_input=setter(|f, v| f.email = v)
                        error=field_error("email")
                    />
                    <div class="form-actions">
                        <Button
                            variant=ButtonVariant::Ghost
                            on_click=Callback::new(move |_| editing.set(false))
                        >
                            "Annuler"
                        </Button>
                        <Button button_type="submit" loading=saving>
                            "Enregistrer"
                        </Button>
                    </div>
                </form>
            </Show>

            <section class="card danger-zone">
                <h2 class="title-lg">"Session"</h2>
                <button class="btn-base btn-danger" on:click=logout>
                    <Icon name=icons::LOGOUT class="icon-btn" />
                    "Se déconnecter"
                </button>
            </section>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User {
            id: 7,
            nom: "Martin".into(),
            prenom: "Claire".into(),
            email: "claire@example.fr".into(),
            nom_utilisateur: "cmartin".into(),
            role: None,
            date_creation: None,
            date_modification: None,
        }
    }

    #[test]
    fn test_unchanged_profile_sends_nothing() {
        let user = user();
        let fields = ProfileFields::from_user(&user);
        assert_eq!(fields.changes(&user), UserUpdate::default());
    }

    #[test]
    fn test_only_changed_fields_are_sent() {
        let user = user();
        let fields = ProfileFields {
            email: " claire.martin@example.fr ".into(),
            ..ProfileFields::from_user(&user)
        };
        let update = fields.changes(&user);
        assert_eq!(update.email.as_deref(), Some("claire.martin@example.fr"));
        assert_eq!(update.nom, None);
        assert_eq!(update.nom_utilisateur, None);
    }

    #[test]
    fn test_invalid_email_blocks_save() {
        let fields = ProfileFields {
            email: "claire".into(),
            ..ProfileFields::from_user(&user())
        };
        assert!(fields.validate().error_for("email").is_some());
    }

    #[test]
    fn test_initials() {
        assert_eq!(initials(&user()), "CM");
    }
}
