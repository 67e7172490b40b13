//! DocSign web client - browser bindings for the signature placement core
//!
//! The JS viewer forwards its load/page events and pointer events here; this
//! crate turns DOM values into core types, keeps the session, and uploads
//! the signing bundles with `fetch`.

use wasm_bindgen::prelude::*;

pub mod client;
pub mod dom;
pub mod logging;
pub mod upload;

pub use client::SigningClient;

#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    logging::init(tracing::Level::INFO);
    tracing::info!("DocSign WASM initialized");
}
