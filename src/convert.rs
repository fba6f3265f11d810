use std::io::Write as _;
use std::time::Instant;

use tokio::process::Command;

use crate::error::AppError;
use crate::telemetry::metrics::PDF_CONVERSION_DURATION;

/// Converts an HTML document to PDF by shelling out to a wkhtmltopdf-style
/// binary. The intermediate HTML lives in a uniquely named temp file that is
/// removed on every exit path; the produced PDF is read back and removed
/// before returning.
#[tracing::instrument(name = "convert pdf", skip(html), fields(html_bytes = html.len()))]
pub async fn convert_to_pdf(binary: &str, html: &str) -> Result<Vec<u8>, AppError> {
    let start = Instant::now();

    // NamedTempFile deletes the HTML on drop, success or failure alike.
    let mut temp_html = tempfile::Builder::new()
        .prefix("autodoc-")
        .suffix(".html")
        .tempfile()
        .map_err(|e| AppError::Internal(format!("failed to create temp file: {e}")))?;
    temp_html
        .write_all(html.as_bytes())
        .and_then(|()| temp_html.flush())
        .map_err(|e| AppError::Internal(format!("failed to write temp HTML: {e}")))?;

    let html_path = temp_html.path().to_path_buf();
    let pdf_path = html_path.with_extension("pdf");

    let output = Command::new(binary)
        .arg("--enable-local-file-access")
        .arg(&html_path)
        .arg(&pdf_path)
        .output()
        .await
        .map_err(|e| AppError::Conversion(format!("failed to run {binary}: {e}")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let _ = std::fs::remove_file(&pdf_path);
        return Err(AppError::Conversion(format!(
            "{binary} exited with {}: {}",
            output.status,
            stderr.trim()
        )));
    }

    let pdf = tokio::fs::read(&pdf_path)
        .await
        .map_err(|e| AppError::Conversion(format!("failed to read produced PDF: {e}")))?;
    let _ = tokio::fs::remove_file(&pdf_path).await;

    PDF_CONVERSION_DURATION.record(start.elapsed().as_secs_f64(), &[]);
    tracing::info!(pdf_bytes = pdf.len(), "PDF conversion complete");

    Ok(pdf)
}
