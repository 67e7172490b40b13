//! Conversions between DOM values and core types

use std::fmt::Display;

use docsign_core::{Hit, ResizeHandle, ScreenPoint, ScreenRect};
use wasm_bindgen::JsValue;
use web_sys::DomRect;

/// Bounding box of the page's content layer as reported by `getBoundingClientRect()`
pub fn screen_rect(rect: &DomRect) -> ScreenRect {
    ScreenRect::new(rect.left(), rect.top(), rect.width(), rect.height())
}

/// `None` when the viewer has not rendered the page yet
pub fn page_rect(rect: Option<DomRect>) -> Option<ScreenRect> {
    rect.as_ref().map(screen_rect)
}

pub fn pointer(client_x: f64, client_y: f64) -> ScreenPoint {
    ScreenPoint::new(client_x, client_y)
}

pub fn parse_handle(handle: &str) -> Result<ResizeHandle, JsValue> {
    handle.parse().map_err(|e: String| JsValue::from_str(&e))
}

/// Name of what a pointer-down landed on, for the viewer's cursor styling
pub fn hit_name(hit: Hit) -> &'static str {
    match hit {
        Hit::Body(_) => "body",
        Hit::Handle(_, handle) => handle.as_str(),
    }
}

pub fn js_error(err: impl Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}
