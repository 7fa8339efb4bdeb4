use leptos::prelude::*;

#[component]
pub fn Icon(
    /// Icon name, without the .svg extension
    name: &'static str,
    #[prop(default = "icon")]
    class: &'static str,
) -> impl IntoView {
    let icon_path = format!("/icons/{}.svg", name);

    view! {
        <img
            src=icon_path
            class=class
            alt=name
            draggable=false
        />
    }
}

/// Icons shipped in `public/icons`
pub mod icons {
    pub const ALERT_CIRCLE: &str = "alert-circle";
    pub const BOOKMARK: &str = "bookmark";
    pub const BOOKMARK_FILLED: &str = "bookmark-filled";
    pub const CHART: &str = "chart";
    pub const CHECK: &str = "check";
    pub const EDIT: &str = "edit";
    pub const LOGOUT: &str = "logout";
    pub const MAP_PIN: &str = "map-pin";
    pub const PLUS: &str = "plus";
    pub const SEARCH: &str = "search";
    pub const SHIELD: &str = "shield";
    pub const TRASH: &str = "trash";
    pub const USER: &str = "user";
    pub const X: &str = "x";
}
