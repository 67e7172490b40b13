//! Browser tests for the JS-facing client
//!
//! Run with `wasm-pack test --headless --chrome apps/docsign-web/wasm`.

#![cfg(target_arch = "wasm32")]

use docsign_wasm::SigningClient;
use wasm_bindgen_test::*;
use web_sys::DomRect;

wasm_bindgen_test_configure!(run_in_browser);

const PNG: &str = "data:image/png;base64,iVBORw0KGgo=";

fn page() -> Option<DomRect> {
    DomRect::new_with_x_and_y_and_width_and_height(100.0, 50.0, 600.0, 800.0).ok()
}

fn client_with_document() -> (SigningClient, String) {
    let client = SigningClient::new("user-1", "https://api.example.com", None);
    let id = client.open_file("contract.pdf", b"%PDF-1.7");
    assert!(client.on_document_load(&id, 2));
    client.load_signature_data_url(PNG).unwrap();
    (client, id)
}

#[wasm_bindgen_test]
fn double_click_creates_and_removes() {
    let (client, doc) = client_with_document();

    let id = client
        .background_double_click(&doc, 400.0, 450.0, page())
        .unwrap();
    assert_eq!(client.placement_count(), 1);

    assert!(client.placement_double_click(id));
    assert_eq!(client.placement_count(), 0);
}

#[wasm_bindgen_test]
fn drag_reports_changes_until_release() {
    let (client, doc) = client_with_document();
    client
        .background_double_click(&doc, 400.0, 450.0, page())
        .unwrap();

    assert_eq!(client.pointer_down(&doc, 400.0, 450.0, page()).as_deref(), Some("body"));
    assert!(client.pointer_move(&doc, 420.0, 470.0, page()));
    client.pointer_up();
    assert!(!client.pointer_move(&doc, 500.0, 500.0, page()));
}

#[wasm_bindgen_test]
fn missing_page_box_is_ignored() {
    let (client, doc) = client_with_document();
    assert!(client
        .background_double_click(&doc, 400.0, 450.0, None)
        .is_none());
}

#[wasm_bindgen_test]
fn preview_client_is_read_only() {
    let client = SigningClient::new("user-1", "https://api.example.com", Some(true));
    let doc = client.open_file("contract.pdf", b"%PDF-1.7");
    client.on_document_load(&doc, 1);
    client.load_signature_data_url(PNG).unwrap();

    assert!(client
        .background_double_click(&doc, 400.0, 450.0, page())
        .is_none());
}

#[wasm_bindgen_test]
fn rejects_non_image_signature() {
    let client = SigningClient::new("user-1", "https://api.example.com", None);
    assert!(client
        .load_signature_data_url("data:text/plain;base64,aGk=")
        .is_err());
}

#[wasm_bindgen_test]
fn console_logging_installs_once() {
    docsign_wasm::logging::init(tracing::Level::INFO);
    assert!(!docsign_wasm::logging::init(tracing::Level::DEBUG));
    tracing::warn!("console logging reachable from tests");
}
