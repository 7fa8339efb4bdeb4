use leptos::prelude::*;

#[cfg(feature = "hydrate")]
use leptos::wasm_bindgen::JsCast;

/// Base modal component with consistent structure
#[component]
pub fn BaseModal(
    title: String,
    #[prop(into)]
    is_open: Signal<bool>,
    on_close: Callback<()>,
    children: ChildrenFn,
) -> impl IntoView {
    // Close on Escape key
    #[cfg(feature = "hydrate")]
    {
        use leptos::ev::keydown;

        let handle_keydown = window_event_listener(keydown, move |ev| {
            if ev.key() == "Escape" && is_open.get_untracked() {
                on_close.run(());
            }
        });

        on_cleanup(move || drop(handle_keydown));
    }

    let children = StoredValue::new(children);

    view! {
        <Show when=move || is_open.get()>
            <div
                class="modal-backdrop"
                on:click=move |e| {
                    #[cfg(feature = "hydrate")]
                    {
                        let on_backdrop = e
                            .target()
                            .and_then(|t| t.dyn_into::<web_sys::Element>().ok())
                            .is_some_and(|el| el.class_list().contains("modal-backdrop"));
                        if on_backdrop {
                            on_close.run(());
                        }
                    }
                    #[cfg(not(feature = "hydrate"))]
                    {
                        let _ = e;
                    }
                }
            >
                <div class="modal card" role="dialog" aria-modal="true">
                    <div class="card-header">
                        <h3 class="title-lg">{title.clone()}</h3>
                        <button
                            class="btn-icon"
                            on:click=move |_| on_close.run(())
                            aria-label="Fermer"
                        >
                            "×"
                        </button>
                    </div>
                    <div class="modal-body">
                        {children.with_value(|children| children())}
                    </div>
                </div>
            </div>
        </Show>
    }
}

/// Confirmation dialog, used before every deletion
#[component]
pub fn ConfirmDialog(
    title: String,
    #[prop(into)]
    message: Signal<String>,
    #[prop(into)]
    is_open: Signal<bool>,
    on_confirm: Callback<()>,
    on_cancel: Callback<()>,
    #[prop(default = "Confirmer")]
    confirm_text: &'static str,
    /// Uses the danger button
    #[prop(default = true)]
    is_destructive: bool,
) -> impl IntoView {
    view! {
        <BaseModal
            title=title
            is_open=is_open
            on_close=on_cancel
        >
            <p class="text-secondary">{move || message.get()}</p>
            <div class="modal-actions">
                <button
                    class="btn-base btn-secondary"
                    on:click=move |_| on_cancel.run(())
                >
                    "Annuler"
                </button>
                <button
                    class=if is_destructive { "btn-base btn-danger" } else { "btn-base btn-primary" }
                    on:click=move |_| {
                        on_confirm.run(());
                        on_cancel.run(());
                    }
                >
                    {confirm_text}
                </button>
            </div>
        </BaseModal>
    }
}
