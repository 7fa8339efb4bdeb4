//! Core domain models and business logic for pollution declarations
//!
//! Framework-free: everything here compiles for both the browser and the
//! server and is unit tested natively.

pub mod api;
pub mod bookmarks;
pub mod client;
#[cfg(feature = "ssr")]
pub mod config;
pub mod error;
pub mod filter;
pub mod guards;
pub mod models;
pub mod notice;
pub mod pipeline;
#[cfg(feature = "ssr")]
pub mod proxy;
pub mod refresh;
pub mod session;
pub mod stats;
pub mod transport;
pub mod validation;

pub use error::ApiError;
pub use models::*;
