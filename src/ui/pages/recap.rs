//! Statistics over every declaration

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::core::api::PollutionQuery;
use crate::core::stats::PollutionStats;
use crate::ui::auth::use_auth_context;
use crate::ui::common::{ErrorMessage, LevelBadge, LoadingSpinner};
use crate::ui::icon::{Icon, icons};
use crate::ui::notifications::use_notifications;

/// One labelled bar of a breakdown
#[component]
fn StatBar(label: String, count: usize, percent: u32) -> impl IntoView {
    view! {
        <div class="stat-row">
            <span class="stat-label">{label}</span>
            <div class="stat-bar">
                <div class="stat-bar-fill" style=format!("width: {percent}%")></div>
            </div>
            <span class="stat-value">{format!("{count} ({percent} %)")}</span>
        </div>
    }
}

#[component]
pub fn RecapPage() -> impl IntoView {
    let auth = use_auth_context();
    let notifications = use_notifications();

    let stats = RwSignal::new(None::<PollutionStats>);
    let error = RwSignal::new(None::<String>);

    Effect::new(move |_| {
        let client = auth.client();
        spawn_local(async move {
            match client.list_pollutions(&PollutionQuery::default()).await {
                Ok(list) => stats.set(Some(PollutionStats::compute(&list))),
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
                <Icon name=icons::CHART class="icon-title" />
                "Récapitulatif"
            </h1>
            <ErrorMessage error=error />
            {move || match stats.get() {
                None if error.with(Option::is_none) => view! { <LoadingSpinner /> }.into_any(),
                None => ().into_any(),
                Some(stats) => view! {
                    <div class="stats-grid">
                        <section class="card stat-total">
                            <span class="stat-number">{stats.total}</span>
                            <span class="text-secondary">"déclarations au total"</span>
                        </section>
                        <section class="card">
                            <h2 class="title-lg">"Par type"</h2>
                            {stats.by_type.iter().map(|(t, n)| view! {
                                <StatBar label=t.to_string() count=*n percent=stats.percent(*n) />
                            }).collect_view()}
                        </section>
                        <section class="card">
                            <h2 class="title-lg">"Par niveau de gravité"</h2>
                            {stats.by_level.iter().map(|(level, n)| view! {
                                <div class="stat-row">
                                    <LevelBadge level=*level />
                                    <span class="stat-value">
                                        {format!("{n} ({} %)", stats.percent(*n))}
                                    </span>
                                </div>
                            }).collect_view()}
                        </section>
                    </div>
                }.into_any(),
            }}
        </div>
    }
}
