use crate::ui::icon::Icon;
use leptos::prelude::*;

#[derive(Clone, Copy, PartialEq)]
pub enum ButtonVariant {
    Primary,
    Secondary,
    Danger,
    Ghost,
}

#[derive(Clone, Copy, PartialEq)]
pub enum ButtonSize {
    Small,
    Medium,
}

impl ButtonVariant {
    fn class(&self) -> &'static str {
        match self {
            ButtonVariant::Primary => "btn-primary",
            ButtonVariant::Secondary => "btn-secondary",
            ButtonVariant::Danger => "btn-danger",
            ButtonVariant::Ghost => "btn-ghost",
        }
    }
}

impl ButtonSize {
    fn class(&self) -> &'static str {
        match self {
            ButtonSize::Small => "btn-sm",
            ButtonSize::Medium => "",
        }
    }
}

/// Button with variants, an optional icon and a loading state
#[component]
pub fn Button(
    #[prop(default = ButtonVariant::Primary)]
    variant: ButtonVariant,
    #[prop(default = ButtonSize::Medium)]
    size: ButtonSize,
    /// `button` or `submit`
    #[prop(default = "button")]
    button_type: &'static str,
    /// Not needed for submit buttons
    #[prop(optional)]
    on_click: Option<Callback<()>>,
    #[prop(into, default = Signal::stored(false))]
    disabled: Signal<bool>,
    /// Shows a spinner and blocks clicks
    #[prop(into, default = Signal::stored(false))]
    loading: Signal<bool>,
    #[prop(optional)]
    title: Option<String>,
    #[prop(optional)]
    icon: Option<&'static str>,
    children: Children,
) -> impl IntoView {
    let classes = format!("btn-base {} {}", variant.class(), size.class());

    view! {
        <button
            type=button_type
            class=classes
            on:click=move |_| {
                if !loading.get_untracked() {
                    if let Some(on_click) = on_click {
                        on_click.run(());
                    }
                }
            }
            disabled=move || disabled.get() || loading.get()
            title=title
        >
            {move || if loading.get() {
                view! { <span class="btn-spinner" aria-hidden="true"></span> }.into_any()
            } else if let Some(icon_name) = icon {
                view! { <Icon name=icon_name class="icon-btn"/> }.into_any()
            } else {
                ().into_any()
            }}
            {children()}
        </button>
    }
}
