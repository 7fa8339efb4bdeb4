//! Register page component

use leptos::prelude::*;

use crate::ui::auth::RegisterForm;

#[component]
pub fn RegisterPage() -> impl IntoView {
    view! {
        <div class="auth-page">
            <div class="card auth-card">
                <RegisterForm />
            </div>
        </div>
    }
}
