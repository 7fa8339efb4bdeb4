//! Landing page for anonymous visitors

use leptos::prelude::*;
use leptos_router::components::A;

use crate::core::models::PollutionType;
use crate::ui::icon::{Icon, icons};

#[component]
pub fn LandingPage() -> impl IntoView {
    view! {
        <section class="hero">
            <h1 class="hero-title">"Signalez les pollutions près de chez vous"</h1>
            <p class="hero-subtitle">
                "Déclarez une pollution observée, localisez-la par adresse ou GPS, "
                "joignez une photo et suivez les signalements de la communauté."
            </p>
            <div class="hero-actions">
                <A href="/register" attr:class="btn-base btn-primary">"Créer un compte"</A>
                <A href="/login" attr:class="btn-base btn-secondary">"Se connecter"</A>
            </div>
        </section>

        <section class="features">
            <div class="feature card">
                <Icon name=icons::MAP_PIN class="icon-feature" />
                <h3>"Localiser"</h3>
                <p>"Adresse, coordonnées GPS ou votre position actuelle."</p>
            </div>
            <div class="feature card">
                <Icon name=icons::SEARCH class="icon-feature" />
                <h3>"Rechercher"</h3>
                <p>"Filtrez par type, niveau de gravité et période d'observation."</p>
            </div>
            <div class="feature card">
                <Icon name=icons::BOOKMARK class="icon-feature" />
                <h3>"Suivre"</h3>
                <p>"Ajoutez des déclarations à vos favoris pour les retrouver."</p>
            </div>
        </section>

        <section class="types">
            <h2 class="title-lg">"Types de pollution suivis"</h2>
            <ul class="type-list">
                {PollutionType::ALL
                    .into_iter()
                    .map(|t| view! { <li class="badge badge-type">{t.to_string()}</li> })
                    .collect_view()}
            </ul>
        </section>
    }
}
