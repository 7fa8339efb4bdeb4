use crate::ui::icon::{Icon, icons};
use leptos::prelude::*;

#[component]
fn FieldError(error: Option<Signal<Option<String>>>) -> impl IntoView {
    move || {
        error.and_then(|e| e.get()).map(|err| view! {
            <div class="field-error">
                <Icon name=icons::ALERT_CIRCLE class="icon-text"/>
                <span>{err}</span>
            </div>
        })
    }
}

/// Generic form field component with label and input
#[component]
pub fn FormField(
    label: &'static str,
    /// Shows a red asterisk
    #[prop(default = false)]
    required: bool,
    /// Input type (text, password, email, date...)
    #[prop(default = "text")]
    input_type: &'static str,
    #[prop(default = "")]
    placeholder: &'static str,
    #[prop(default = "")]
    autocomplete: &'static str,
    #[prop(into)]
    value: Signal<String>,
    on_input: Callback<String>,
    #[prop(into, default = Signal::stored(false))]
    disabled: Signal<bool>,
    #[prop(optional, into)]
    error: Option<Signal<Option<String>>>,
) -> impl IntoView {
    view! {
        <div class="field">
            <label class="label">
                {label}
                {required.then(|| view! { <span class="required">"*"</span> })}
            </label>
            <input
                type=input_type
                class="input-base"
                class:input-invalid=move || error.and_then(|e| e.get()).is_some()
                placeholder=placeholder
                autocomplete=autocomplete
                prop:value=move || value.get()
                on:input=move |ev| on_input.run(event_target_value(&ev))
                disabled=move || disabled.get()
            />
            <FieldError error=error />
        </div>
    }
}

#[component]
pub fn TextAreaField(
    label: &'static str,
    #[prop(default = false)]
    required: bool,
    #[prop(default = "")]
    placeholder: &'static str,
    #[prop(default = 4)]
    rows: u32,
    #[prop(into)]
    value: Signal<String>,
    on_input: Callback<String>,
    #[prop(optional, into)]
    error: Option<Signal<Option<String>>>,
) -> impl IntoView {
    view! {
        <div class="field">
            <label class="label">
                {label}
                {required.then(|| view! { <span class="required">"*"</span> })}
            </label>
            <textarea
                class="input-base textarea"
                class:input-invalid=move || error.and_then(|e| e.get()).is_some()
                placeholder=placeholder
                rows=rows
                prop:value=move || value.get()
                on:input=move |ev| on_input.run(event_target_value(&ev))
            ></textarea>
            <FieldError error=error />
        </div>
    }
}

/// Select with a leading empty option
#[component]
pub fn SelectField(
    label: &'static str,
    #[prop(default = false)]
    required: bool,
    #[prop(into)]
    value: Signal<String>,
    on_change: Callback<String>,
    /// Option labels; the value sent is the label itself
    options: Vec<String>,
    /// Text of the empty option
    #[prop(default = "Tous")]
    empty_label: &'static str,
    #[prop(optional, into)]
    error: Option<Signal<Option<String>>>,
) -> impl IntoView {
    view! {
        <div class="field">
            <label class="label">
                {label}
                {required.then(|| view! { <span class="required">"*"</span> })}
            </label>
            <select
                class="select-base"
                class:input-invalid=move || error.and_then(|e| e.get()).is_some()
                prop:value=move || value.get()
                on:change=move |ev| on_change.run(event_target_value(&ev))
            >
                <option value="">{empty_label}</option>
                {options.into_iter().map(|option| {
                    view! { <option value=option.clone()>{option.clone()}</option> }
                }).collect_view()}
            </select>
            <FieldError error=error />
        </div>
    }
}
