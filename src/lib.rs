//! Pollution Watch - citizen pollution declarations
//!
//! A web application for reporting pollution sightings, browsing and filtering
//! them, and moderating accounts and declarations, built with Leptos and
//! WebAssembly on top of an external REST backend.

#![recursion_limit = "4096"]

pub mod app;
pub mod core;
pub mod ui;

#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    use crate::app::*;
    console_error_panic_hook::set_once();
    leptos::mount::hydrate_body(App);
}
