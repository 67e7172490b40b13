//! Upload collaborator backed by `fetch`
//!
//! Each bundle is one multipart `POST {api_base}/sign/file` carrying the
//! document, the signature image and the placement geometry. Cookies are
//! sent along so the backend can authenticate the user.

use async_trait::async_trait;
use docsign_core::{BundleMetadata, SignatureImage, UploadError, Uploader};
use js_sys::{Array, Reflect, Uint8Array};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Blob, BlobPropertyBag, FormData, Request, RequestCredentials, RequestInit, Response};

pub struct FetchUploader {
    api_base: String,
}

impl FetchUploader {
    pub fn new(api_base: &str) -> Self {
        Self {
            api_base: api_base.trim_end_matches('/').to_string(),
        }
    }

    pub fn endpoint(&self) -> String {
        format!("{}/sign/file", self.api_base)
    }

    async fn post(
        &self,
        document: &[u8],
        image: &SignatureImage,
        metadata: &BundleMetadata,
    ) -> Result<(), JsValue> {
        let form = FormData::new()?;
        form.append_with_blob_and_filename(
            "pdf",
            &blob(document, "application/pdf")?,
            &metadata.file_name,
        )?;
        form.append_with_blob_and_filename(
            "signature",
            &blob(image.bytes(), image.content_type())?,
            &image.file_name(),
        )?;
        for (name, value) in form_fields(metadata) {
            form.append_with_str(name, &value)?;
        }

        let opts = RequestInit::new();
        opts.set_method("POST");
        opts.set_credentials(RequestCredentials::Include);
        opts.set_body(&form);

        let request = Request::new_with_str_and_init(&self.endpoint(), &opts)?;
        let window = web_sys::window().ok_or("No window")?;
        let response = JsFuture::from(window.fetch_with_request(&request)).await?;
        let response: Response = response.dyn_into()?;

        if response.ok() {
            return Ok(());
        }
        Err(JsValue::from_str(&failure_reason(&response).await))
    }
}

#[async_trait(?Send)]
impl Uploader for FetchUploader {
    async fn submit(
        &self,
        document: &[u8],
        image: &SignatureImage,
        metadata: &BundleMetadata,
    ) -> Result<(), UploadError> {
        self.post(document, image, metadata).await.map_err(|e| {
            let reason = e
                .as_string()
                .unwrap_or_else(|| format!("{:?}", e));
            web_sys::console::error_1(&format!("Upload failed: {}", reason).into());
            UploadError::new(reason)
        })
    }
}

/// Text fields of the multipart body, in the order the backend documents them
pub fn form_fields(metadata: &BundleMetadata) -> Vec<(&'static str, String)> {
    vec![
        ("userId", metadata.user_id.to_string()),
        ("page", metadata.page.to_string()),
        ("x", metadata.x.to_string()),
        ("y", metadata.y.to_string()),
        ("width", metadata.width.to_string()),
        ("height", metadata.height.to_string()),
        ("docId", metadata.document_id.to_string()),
    ]
}

fn blob(bytes: &[u8], content_type: &str) -> Result<Blob, JsValue> {
    let parts = Array::new();
    parts.push(&Uint8Array::from(bytes));
    let bag = BlobPropertyBag::new();
    bag.set_type(content_type);
    Blob::new_with_u8_array_sequence_and_options(&parts, &bag)
}

/// The backend's `error` field when the body is JSON, otherwise the HTTP status
async fn failure_reason(response: &Response) -> String {
    let status = format!("HTTP {}", response.status());
    let Ok(json) = response.json() else {
        return status;
    };
    match JsFuture::from(json).await {
        Ok(body) => Reflect::get(&body, &"error".into())
            .ok()
            .and_then(|v| v.as_string())
            .unwrap_or(status),
        Err(_) => status,
    }
}
