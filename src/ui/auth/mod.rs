//! Authentication UI module
//!
//! Auth context over the API client's session, the login and register
//! forms, and the navigation bar.

mod context;
mod login_form;
mod register_form;
mod user_menu;

pub use context::{
    AuthContext, Client, SessionExpiryRedirect, provide_auth_context, use_auth_context,
};
pub use login_form::LoginForm;
pub use register_form::RegisterForm;
pub use user_menu::UserMenu;
