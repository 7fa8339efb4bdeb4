//! Common reusable UI components
//!
//! Components shared by several pages: buttons, form fields, badges,
//! dialogs and loading states.

pub mod badge;
pub mod button;
pub mod form;
pub mod message;
pub mod modal;
pub mod spinner;

pub use badge::{CountBadge, LevelBadge, RoleBadge, TypeBadge};
pub use button::{Button, ButtonSize, ButtonVariant};
pub use form::{FormField, SelectField, TextAreaField};
pub use message::{EmptyState, ErrorMessage};
pub use modal::{BaseModal, ConfirmDialog};
pub use spinner::LoadingSpinner;
