use leptos::prelude::*;

/// Centered loading spinner with an optional label
#[component]
pub fn LoadingSpinner(
    #[prop(default = String::new())]
    message: String,
) -> impl IntoView {
    view! {
        <div class="spinner-container spinner-centered">
            <div class="spinner" role="status" aria-live="polite">
                <span class="sr-only">"Chargement..."</span>
            </div>
            {(!message.is_empty()).then(|| view! {
                <div class="spinner-label">{message.clone()}</div>
            })}
        </div>
    }
}
