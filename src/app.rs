use leptos::prelude::*;
use leptos_meta::{MetaTags, Stylesheet, Title, provide_meta_context};
use leptos_router::components::{Route, Router, Routes};
use leptos_router::path;

use crate::ui::auth::{SessionExpiryRedirect, UserMenu};
use crate::ui::guards::{RedirectIfAuthenticated, RequireAdmin, RequireAuth};
use crate::ui::pages::{
    AdminDashboardPage, AdminPollutionsPage, AdminUsersPage, FavoritesPage, LandingPage,
    LoginPage, NotFoundPage, PollutionCreatePage, PollutionDetailPage, PollutionEditPage,
    PollutionListPage, ProfilePage, RecapPage, RegisterPage,
};
use crate::ui::{NotificationsContainer, provide_auth_context, provide_bookmarks, provide_notifications};

pub fn shell(options: LeptosOptions) -> impl IntoView {
    view! {
        <!DOCTYPE html>
        <html lang="fr">
            <head>
                <meta charset="utf-8"/>
                <meta name="viewport" content="width=device-width, initial-scale=1"/>
                <AutoReload options=options.clone() />
                <HydrationScripts options/>
                <MetaTags/>
            </head>
            <body>
                <App/>
            </body>
        </html>
    }
}

#[component]
pub fn App() -> impl IntoView {
    // Provides context that manages stylesheets, titles, meta tags, etc.
    provide_meta_context();

    // Notifications first: the auth context reports session expiry through them
    provide_notifications();
    let auth = provide_auth_context();
    provide_bookmarks(auth);

    view! {
        // id=leptos means cargo-leptos will hot-reload this stylesheet
        <Stylesheet id="leptos" href="/pkg/pollution-watch.css"/>
        <Title text="Pollution Watch"/>

        <Router>
            <UserMenu />
            <SessionExpiryRedirect />
            <main class="app-main">
                <Routes fallback=|| view! { <NotFoundPage /> }>
                    <Route
                        path=path!("/")
                        view=|| view! { <RedirectIfAuthenticated><LandingPage /></RedirectIfAuthenticated> }
                    />
                    <Route
                        path=path!("/login")
                        view=|| view! { <RedirectIfAuthenticated><LoginPage /></RedirectIfAuthenticated> }
                    />
                    <Route
                        path=path!("/register")
                        view=|| view! { <RedirectIfAuthenticated><RegisterPage /></RedirectIfAuthenticated> }
                    />

                    // Static segments before `:id`
                    <Route
                        path=path!("/pollutions/new")
                        view=|| view! { <RequireAuth><PollutionCreatePage /></RequireAuth> }
                    />
                    <Route
                        path=path!("/pollutions/recap")
                        view=|| view! { <RequireAuth><RecapPage /></RequireAuth> }
                    />
                    <Route
                        path=path!("/pollutions/:id/edit")
                        view=|| view! { <RequireAuth><PollutionEditPage /></RequireAuth> }
                    />
                    <Route
                        path=path!("/pollutions/:id")
                        view=|| view! { <RequireAuth><PollutionDetailPage /></RequireAuth> }
                    />
                    <Route
                        path=path!("/pollutions")
                        view=|| view! { <RequireAuth><PollutionListPage /></RequireAuth> }
                    />
                    <Route
                        path=path!("/favorites")
                        view=|| view! { <RequireAuth><FavoritesPage /></RequireAuth> }
                    />
                    <Route
                        path=path!("/profile")
                        view=|| view! { <RequireAuth><ProfilePage /></RequireAuth> }
                    />

                    <Route
                        path=path!("/admin")
                        view=|| view! { <RequireAdmin><AdminDashboardPage /></RequireAdmin> }
                    />
                    <Route
                        path=path!("/admin/users")
                        view=|| view! { <RequireAdmin><AdminUsersPage /></RequireAdmin> }
                    />
                    <Route
                        path=path!("/admin/pollutions")
                        view=|| view! { <RequireAdmin><AdminPollutionsPage /></RequireAdmin> }
                    />
                </Routes>
            </main>
            <NotificationsContainer />
        </Router>
    }
}
