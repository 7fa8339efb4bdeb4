use leptos::prelude::*;

use crate::core::models::{PollutionLevel, PollutionType, Role};

/// Severity badge, colored by level
#[component]
pub fn LevelBadge(level: PollutionLevel) -> impl IntoView {
    view! {
        <span class=format!("badge {}", level.css_class())>{level.to_string()}</span>
    }
}

#[component]
pub fn TypeBadge(pollution_type: PollutionType) -> impl IntoView {
    view! {
        <span class="badge badge-type">{pollution_type.to_string()}</span>
    }
}

#[component]
pub fn RoleBadge(role: Role) -> impl IntoView {
    let class = match role {
        Role::Admin => "badge badge-admin",
        Role::User => "badge badge-default",
    };
    view! { <span class=class>{role.to_string()}</span> }
}

/// Numeric badge, hidden at zero
#[component]
pub fn CountBadge(#[prop(into)] count: Signal<usize>) -> impl IntoView {
    move || {
        let count = count.get();
        (count > 0).then(|| view! { <span class="badge badge-count">{count}</span> })
    }
}
