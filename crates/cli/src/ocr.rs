//! # Image OCR
//!
//! Bridges to the local Tesseract executable to pull text out of scanned
//! report images. Tesseract writes the recognized text to stdout; stderr is
//! only surfaced when the process fails.

use anyhow::{bail, Context, Result};
use std::path::Path;
use tokio::process::Command;
use tracing::info;

/// Runs a full-image OCR pass over the file.
pub async fn extract_text(image_path: &Path) -> Result<String> {
    info!("Running OCR on image file: {}", image_path.display());

    let output = Command::new("tesseract")
        .arg(image_path)
        .arg("stdout")
        .args(["-l", "eng"])
        .output()
        .await
        .context("failed to launch tesseract; is it installed?")?;

    if !output.status.success() {
        bail!(
            "tesseract exited with {}: {}",
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}
