//! Replay a scripted signing session and print the bundles it would upload
//!
//! Usage: cargo run -p docsign-core --example replay_session -- [session.toml]
//!
//! Set RUST_LOG to adjust verbosity (defaults to `docsign_core=debug`).

use std::cell::RefCell;
use std::env;

use anyhow::Result;
use async_trait::async_trait;
use docsign_core::{
    submit_all, BundleMetadata, Document, ResizeHandle, ScreenPoint, ScreenRect, SessionConfig,
    SignatureImage, SigningSession, UploadError, Uploader, UserId,
};
use tracing_subscriber::EnvFilter;

/// Prints each bundle instead of sending it
struct PrintingUploader;

#[async_trait(?Send)]
impl Uploader for PrintingUploader {
    async fn submit(
        &self,
        document: &[u8],
        image: &SignatureImage,
        metadata: &BundleMetadata,
    ) -> Result<(), UploadError> {
        let json = serde_json::to_string(metadata).map_err(|e| UploadError::new(e.to_string()))?;
        println!(
            "POST /sign/file  pdf={}B signature={}({}B) {}",
            document.len(),
            image.file_name(),
            image.bytes().len(),
            json
        );
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("docsign_core=debug")),
        )
        .init();

    let config = match env::args().nth(1) {
        Some(path) => SessionConfig::from_file(path)?,
        None => SessionConfig::default(),
    };

    let user = UserId::new("demo-user");
    let document = Document::from_bytes(
        user.clone(),
        "agreement.pdf",
        "application/pdf",
        b"%PDF-1.7\n%demo\n".to_vec(),
    );
    let doc = document.id.clone();

    let mut session = SigningSession::new(user, config);
    session.open_document(document);
    session.document_loaded(&doc, 2);
    session.load_signature_image(SignatureImage::from_data_url(
        "data:image/png;base64,iVBORw0KGgo=",
    )?);

    // Page box as a viewer at 100% zoom would report it
    let page = ScreenRect::new(200.0, 80.0, 612.0, 792.0);
    let at = |x: f64, y: f64| ScreenPoint::new(page.left + x * page.width, page.top + y * page.height);

    let first = session.background_activated_twice(&doc, at(0.25, 0.1), Some(&page));
    session.page_changed(&doc, 1);
    let second = session.background_activated_twice(&doc, at(0.7, 0.15), Some(&page));

    if let Some(second) = second {
        let rect = session.placement(second).map(|p| p.rect);
        if let Some(rect) = rect {
            session.pointer_down(&doc, at(rect.x + 0.01, rect.y + 0.01), Some(&page));
            session.pointer_moved(&doc, at(rect.x - 0.2, rect.y + 0.1), Some(&page));
            session.pointer_released();
        }
        session.pointer_down_on_handle(second, ResizeHandle::SouthEast);
        session.pointer_moved(&doc, at(0.95, 0.99), Some(&page));
        session.pointer_released();
    }

    println!("placements:");
    for placement in session.placements().iter() {
        println!(
            "  {} page {} at ({:.3}, {:.3}) size {:.3} x {:.3}",
            placement.id,
            placement.page,
            placement.rect.x,
            placement.rect.y,
            placement.rect.width,
            placement.rect.height
        );
    }
    if first.is_none() {
        println!("  (first placement was not created)");
    }

    let session = RefCell::new(session);
    let report = submit_all(&session, &PrintingUploader).await?;
    println!(
        "submitted {} bundle(s), skipped {} document(s)",
        report.submitted,
        report.skipped_documents.len()
    );

    Ok(())
}
