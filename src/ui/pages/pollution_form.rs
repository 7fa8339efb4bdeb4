//! Declaration form shared by the create and edit pages

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::core::models::{LocationKind, PollutionPayload};
use crate::core::validation::{DeclarationForm, ValidationResult, is_previewable_photo_url};
use crate::ui::auth::use_auth_context;
use crate::ui::common::{Button, ButtonSize, ButtonVariant, FormField, SelectField, TextAreaField};
use crate::ui::geolocation::current_position;
use crate::ui::icon::{Icon, icons};
use crate::ui::notifications::use_notifications;
use crate::ui::pages::pollution_list::{level_options, type_options};
use crate::ui::upload::read_photo;

const LOCATION_MODES: [(LocationKind, &str); 3] = [
    (LocationKind::Address, "Adresse"),
    (LocationKind::Gps, "Coordonnées GPS"),
    (LocationKind::Both, "Les deux"),
];

#[component]
pub fn PollutionForm(
    initial: DeclarationForm,
    submit_label: &'static str,
    on_submit: Callback<PollutionPayload>,
    #[prop(into)]
    busy: Signal<bool>,
) -> impl IntoView {
    let auth = use_auth_context();
    let notifications = use_notifications();

    let form = RwSignal::new(initial);
    let validation = RwSignal::new(ValidationResult::new());
    let locating = RwSignal::new(false);
    let uploading = RwSignal::new(false);

    let field_error = move |field: &'static str| {
        Signal::derive(move || {
            validation.with(|v| v.error_for(field).map(ToString::to_string))
        })
    };
    let field_value = move |get: fn(&DeclarationForm) -> String| {
        Signal::derive(move || form.with(get))
    };
    let setter = move |apply: fn(&mut DeclarationForm, String)| {
        Callback::new(move |value: String| {
            form.update(|f| apply(f, value));
            validation.set(ValidationResult::new());
        })
    };

    let use_my_position = move |_| {
        locating.set(true);
        spawn_local(async move {
            match current_position().await {
                Ok(position) => {
                    form.update(|f| {
                        if !f.shows_gps() {
                            f.set_location_mode(LocationKind::Both);
                        }
                        f.latitude = format!("{:.6}", position.latitude);
                        f.longitude = format!("{:.6}", position.longitude);
                    });
                    notifications.success("Position récupérée");
                }
                Err(failure) => notifications.error(failure.message()),
            }
            locating.set(false);
        });
    };

    let on_photo_selected = move |ev: leptos::ev::Event| {
        let client = auth.client();
        spawn_local(async move {
            let photo = match read_photo(ev).await {
                Some(Ok(photo)) => photo,
                Some(Err(err)) => {
                    notifications.error(err.to_string());
                    return;
                }
                None => return,
            };
            uploading.set(true);
            match client
                .upload_photo(&photo.name, &photo.content_type, photo.bytes)
                .await
            {
                Ok(url) => {
                    form.update(|f| f.photo_url = url);
                    notifications.success("Photo téléversée");
                }
                Err(err) => notifications.api_error(&err),
            }
            uploading.set(false);
        });
    };

    let submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        match form.with_untracked(DeclarationForm::to_payload) {
            Ok(payload) => {
                validation.set(ValidationResult::new());
                on_submit.run(payload);
            }
            Err(result) => {
                notifications.error("Veuillez corriger les champs en erreur");
                validation.set(result);
            }
        }
    };

    let photo_preview = move || {
        form.with(|f| {
            is_previewable_photo_url(&f.photo_url).then(|| f.photo_url.trim().to_string())
        })
    };

    view! {
        <form class="card declaration-form" on:submit=submit novalidate>
            <FormField
                label="Titre"
                required=true
                value=field_value(|f| f.titre.clone())
                on_input=setter(|f, v| f.titre = v)
                error=field_error("titre")
            />
            <div class="form-row">
                <SelectField
                    label="Type"
                    required=true
                    empty_label="Choisir un type"
                    value=field_value(|f| f.type_label.clone())
                    on_change=setter(|f, v| f.type_label = v)
                    options=type_options()
                    error=field_error("type")
                />
                <SelectField
                    label="Niveau de gravité"
                    required=true
                    empty_label="Choisir un niveau"
                    value=field_value(|f| f.niveau_label.clone())
                    on_change=setter(|f, v| f.niveau_label = v)
                    options=level_options()
                    error=field_error("niveau")
                />
                <FormField
                    label="Date d'observation"
                    required=true
                    input_type="date"
                    value=field_value(|f| f.date_observation.clone())
                    on_input=setter(|f, v| f.date_observation = v)
                    error=field_error("dateObservation")
                />
            </div>
            <TextAreaField
                label="Description"
                required=true
                placeholder="Décrivez ce que vous avez observé"
                value=field_value(|f| f.description.clone())
                on_input=setter(|f, v| f.description = v)
                error=field_error("description")
            />

            <fieldset class="location">
                <legend class="label">"Localisation"</legend>
                <div class="segmented">
                    {LOCATION_MODES.into_iter().map(|(mode, label)| view! {
                        <label class="segment" class:active=move || form.with(|f| f.location_mode == mode)>
                            <input
                                type="radio"
                                name="location-mode"
                                prop:checked=move || form.with(|f| f.location_mode == mode)
                                on:change=move |_| form.update(|f| f.set_location_mode(mode))
                            />
                            {label}
                        </label>
                    }).collect_view()}
                </div>

                <Show when=move || form.with(DeclarationForm::shows_address)>
                    <FormField
                        label="Adresse"
                        autocomplete="street-address"
                        value=field_value(|f| f.adresse.clone())
                        on_input=setter(|f, v| f.adresse = v)
                    />
                </Show>
                <Show when=move || form.with(DeclarationForm::shows_gps)>
                    <div class="form-row">
                        <FormField
                            label="Latitude"
                            placeholder="45.764043"
                            value=field_value(|f| f.latitude.clone())
                            on_input=setter(|f, v| f.latitude = v)
                            error=field_error("latitude")
                        />
                        <FormField
                            label="Longitude"
                            placeholder="4.835659"
                            value=field_value(|f| f.longitude.clone())
                            on_input=setter(|f, v| f.longitude = v)
                            error=field_error("longitude")
                        />
                    </div>
                </Show>
                <Button
                    variant=ButtonVariant::Secondary
                    size=ButtonSize::Small
                    icon=icons::MAP_PIN
                    loading=locating
                    on_click=Callback::new(use_my_position)
                >
                    "Utiliser ma position"
                </Button>
                {move || validation.with(|v| v.error_for("location").map(ToString::to_string)).map(|err| view! {
                    <div class="field-error">
                        <Icon name=icons::ALERT_CIRCLE class="icon-text"/>
                        <span>{err}</span>
                    </div>
                })}
            </fieldset>

            <fieldset class="photo">
                <legend class="label">"Photo"</legend>
                <FormField
                    label="URL de la photo"
                    placeholder="https://..."
                    value=field_value(|f| f.photo_url.clone())
                    on_input=setter(|f, v| f.photo_url = v)
                />
                <div class="field">
                    <label class="label">"Ou téléverser une image (5 Mo max.)"</label>
                    <input
                        type="file"
                        accept="image/*"
                        disabled=move || uploading.get()
                        on:change=on_photo_selected
                    />
                </div>
                {move || match photo_preview() {
                    Some(src) => view! {
                        <img class="photo-preview" src=src alt="Aperçu de la photo" />
                    }.into_any(),
                    None if form.with(|f| !f.photo_url.trim().is_empty()) => view! {
                        <p class="text-secondary">"Aperçu indisponible pour cette URL"</p>
                    }.into_any(),
                    None => ().into_any(),
                }}
            </fieldset>

            <div class="form-actions">
                <Button
                    button_type="submit"
                    loading=Signal::derive(move || busy.get() || uploading.get())
                >
                    {submit_label}
                </Button>
            </div>
        </form>
    }
}
