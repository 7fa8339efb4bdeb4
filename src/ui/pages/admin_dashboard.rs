//! Administration overview

use chrono::Local;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::components::A;

use crate::core::api::PollutionQuery;
use crate::core::stats::{DashboardStats, RECENT_WINDOW_DAYS};
use crate::ui::auth::use_auth_context;
use crate::ui::common::{ErrorMessage, LevelBadge, LoadingSpinner};
use crate::ui::icon::{Icon, icons};
use crate::ui::notifications::use_notifications;

#[component]
fn StatCard(label: String, value: usize, icon: &'static str) -> impl IntoView {
    view! {
        <div class="card stat-card">
            <Icon name=icon class="icon-stat" />
            <span class="stat-number">{value}</span>
            <span class="text-secondary">{label}</span>
        </div>
    }
}

#[component]
pub fn AdminDashboardPage() -> impl IntoView {
    let auth = use_auth_context();
    let notifications = use_notifications();

    let stats = RwSignal::new(None::<DashboardStats>);
    let error = RwSignal::new(None::<String>);

    Effect::new(move |_| {
        let client = auth.client();
        spawn_local(async move {
            let everything = PollutionQuery::default();
            let (users, declarations) = futures::join!(
                client.list_users(None),
                client.list_pollutions(&everything)
            );
            match users.and_then(|u| declarations.map(|d| (u, d))) {
                Ok((users, declarations)) => stats.set(Some(DashboardStats::compute(
                    &users,
                    &declarations,
                    Local::now().date_naive(),
                ))),
                Err(err) => {
                    error.set(Some(err.user_message()));
                    notifications.api_error(&err);
                }
            }
        });
    });

    view! {
        <div class="page">
            <h1 class="title-xl">
                <Icon name=icons::SHIELD class="icon-title" />
                "Administration"
            </h1>
            <nav class="admin-nav">
                <A href="/admin/users" attr:class="btn-base btn-secondary">
                    <Icon name=icons::USER class="icon-btn" />
                    "Utilisateurs"
                </A>
                <A href="/admin/pollutions" attr:class="btn-base btn-secondary">
                    <Icon name=icons::ALERT_CIRCLE class="icon-btn" />
                    "Modération des déclarations"
                </A>
            </nav>
            <ErrorMessage error=error />
            {move || match stats.get() {
                None if error.with(Option::is_none) => view! { <LoadingSpinner /> }.into_any(),
                None => ().into_any(),
                Some(stats) => view! {
                    <div class="stats-grid">
                        <StatCard label="utilisateurs".to_string() value=stats.total_users icon=icons::USER />
                        <StatCard label="déclarations".to_string() value=stats.total_pollutions icon=icons::CHART />
                        <StatCard
                            label=format!("observées ces {RECENT_WINDOW_DAYS} derniers jours")
                            value=stats.recent_pollutions
                            icon=icons::ALERT_CIRCLE
                        />
                    </div>
                    <section class="card">
                        <h2 class="title-lg">"Répartition par gravité"</h2>
                        {stats.by_level.iter().map(|(level, n)| view! {
                            <div class="stat-row">
                                <LevelBadge level=*level />
                                <span class="stat-value">{*n}</span>
                            </div>
                        }).collect_view()}
                    </section>
                }.into_any(),
            }}
        </div>
    }
}
