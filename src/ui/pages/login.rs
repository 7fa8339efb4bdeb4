//! Login page component

use leptos::prelude::*;

use crate::ui::auth::LoginForm;

#[component]
pub fn LoginPage() -> impl IntoView {
    view! {
        <div class="auth-page">
            <div class="card auth-card">
                <LoginForm />
            </div>
        </div>
    }
}
