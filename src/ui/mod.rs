pub mod auth;
pub mod common;
pub mod declaration_card;
pub mod geolocation;
pub mod guards;
pub mod icon;
pub mod notifications;
pub mod pages;
pub mod storage;
pub mod timer;
pub mod upload;

pub use auth::{AuthContext, provide_auth_context, use_auth_context};
pub use icon::{Icon, icons};
pub use notifications::{NotificationsContainer, provide_notifications, use_notifications};
pub use storage::{provide_bookmarks, use_bookmarks};
