//! Resume upload: turns an uploaded PDF or plain-text file into resume text.

use bytes::Bytes;
use thiserror::Error;
use tracing::debug;

use crate::errors::AppError;

/// Upper bound on accepted uploads.
pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("Uploaded file is empty")]
    Empty,

    #[error("Uploaded file exceeds the 5 MiB limit")]
    TooLarge,

    #[error("Unsupported file type '{0}'; upload a PDF or .txt file")]
    Unsupported(String),

    #[error("Could not read text from PDF: {0}")]
    Pdf(String),

    #[error("Text file is not valid UTF-8")]
    Encoding,

    #[error("No text found in uploaded file")]
    NoText,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum UploadKind {
    Pdf,
    Text,
}

fn detect_kind(file_name: Option<&str>, content_type: Option<&str>, data: &[u8]) -> Option<UploadKind> {
    if data.starts_with(b"%PDF") || content_type == Some("application/pdf") {
        return Some(UploadKind::Pdf);
    }
    let lower = file_name.map(str::to_lowercase).unwrap_or_default();
    if lower.ends_with(".pdf") {
        Some(UploadKind::Pdf)
    } else if lower.ends_with(".txt") || content_type.is_some_and(|c| c.starts_with("text/")) {
        Some(UploadKind::Text)
    } else {
        None
    }
}

/// Extracts resume text from an uploaded file.
pub fn extract_resume_text(
    file_name: Option<&str>,
    content_type: Option<&str>,
    data: Bytes,
) -> Result<String, UploadError> {
    if data.is_empty() {
        return Err(UploadError::Empty);
    }
    if data.len() > MAX_UPLOAD_BYTES {
        return Err(UploadError::TooLarge);
    }

    let kind = detect_kind(file_name, content_type, &data).ok_or_else(|| {
        UploadError::Unsupported(
            file_name
                .or(content_type)
                .unwrap_or("unknown")
                .to_string(),
        )
    })?;

    let text = match kind {
        UploadKind::Pdf => {
            pdf_extract::extract_text_from_mem(&data).map_err(|e| UploadError::Pdf(e.to_string()))?
        }
        UploadKind::Text => String::from_utf8(data.to_vec()).map_err(|_| UploadError::Encoding)?,
    };

    let text = normalize_whitespace(&text);
    if text.is_empty() {
        return Err(UploadError::NoText);
    }
    debug!(kind = ?kind, chars = text.len(), "extracted resume text");
    Ok(text)
}

/// Runs `extract_resume_text` on the blocking pool; PDF parsing is CPU-bound.
pub async fn extract_resume_text_blocking(
    file_name: Option<String>,
    content_type: Option<String>,
    data: Bytes,
) -> Result<String, AppError> {
    let text = tokio::task::spawn_blocking(move || {
        extract_resume_text(file_name.as_deref(), content_type.as_deref(), data)
    })
    .await
    .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in resume upload: {e}")))??;
    Ok(text)
}

/// Trims each line and collapses runs of blank lines left behind by PDF
/// extraction.
fn normalize_whitespace(text: &str) -> String {
    let mut out = Vec::new();
    let mut blank_run = false;
    for line in text.lines().map(str::trim) {
        if line.is_empty() {
            if !blank_run && !out.is_empty() {
                out.push("");
            }
            blank_run = true;
        } else {
            out.push(line);
            blank_run = false;
        }
    }
    while out.last() == Some(&"") {
        out.pop();
    }
    out.join("\n")
}
