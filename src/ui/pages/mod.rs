//! Application pages
//!
//! One component per route. Access control is applied by the router, not by
//! the pages themselves.

mod admin_dashboard;
mod admin_pollutions;
mod admin_users;
mod favorites;
mod landing;
mod login;
mod not_found;
mod pollution_create;
mod pollution_detail;
mod pollution_edit;
mod pollution_form;
mod pollution_list;
mod profile;
mod recap;
mod register;

pub use admin_dashboard::AdminDashboardPage;
pub use admin_pollutions::AdminPollutionsPage;
pub use admin_users::AdminUsersPage;
pub use favorites::FavoritesPage;
pub use landing::LandingPage;
pub use login::LoginPage;
pub use not_found::NotFoundPage;
pub use pollution_create::PollutionCreatePage;
pub use pollution_detail::PollutionDetailPage;
pub use pollution_edit::PollutionEditPage;
pub use pollution_list::PollutionListPage;
pub use profile::ProfilePage;
pub use recap::RecapPage;
pub use register::RegisterPage;
