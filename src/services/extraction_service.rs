use crate::error::{Error, Result};
use std::path::Path;
use tokio::fs;
use tokio::process::Command;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    PlainText,
}

impl DocumentFormat {
    pub fn detect(file_name: &str, data: &[u8]) -> Result<Self> {
        let ext = Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "pdf" => {
                if !data.starts_with(b"%PDF") {
                    return Err(Error::BadRequest("Invalid PDF file content".into()));
                }
                Ok(DocumentFormat::Pdf)
            }
            "txt" | "md" | "text" => Ok(DocumentFormat::PlainText),
            "" if data.starts_with(b"%PDF") => Ok(DocumentFormat::Pdf),
            other => Err(Error::BadRequest(format!(
                "File type .{} is not supported; upload a PDF or plain-text document",
                other
            ))),
        }
    }
}

/// Turns uploaded documents into raw text. PDFs go through the poppler
/// `pdftotext` binary; plain text is decoded directly.
#[derive(Clone)]
pub struct ExtractionService {
    pdftotext_bin: String,
}

impl ExtractionService {
    pub fn new(pdftotext_bin: String) -> Self {
        Self { pdftotext_bin }
    }

    pub async fn extract(&self, file_name: &str, data: &[u8]) -> Result<String> {
        if data.is_empty() {
            return Err(Error::BadRequest("Uploaded file is empty".into()));
        }

        let text = match DocumentFormat::detect(file_name, data)? {
            DocumentFormat::Pdf => self.extract_pdf(data).await?,
            DocumentFormat::PlainText => String::from_utf8_lossy(data).into_owned(),
        };

        let text = text.trim().to_string();
        if text.is_empty() {
            tracing::warn!(file_name, "document produced no text");
            return Err(Error::Extraction(
                "no text found; ensure the file is not scanned, corrupted or password-protected"
                    .into(),
            ));
        }

        tracing::info!(file_name, chars = text.chars().count(), "extracted document text");
        Ok(text)
    }

    async fn extract_pdf(&self, data: &[u8]) -> Result<String> {
        let temp_path = std::env::temp_dir().join(format!("quiz_upload_{}.pdf", uuid::Uuid::new_v4()));
        fs::write(&temp_path, data).await?;

        let output = Command::new(&self.pdftotext_bin)
            .arg("-layout")
            .arg(&temp_path)
            .arg("-")
            .output()
            .await;

        let _ = fs::remove_file(&temp_path).await;

        match output {
            Ok(out) if out.status.success() => Ok(String::from_utf8_lossy(&out.stdout).into_owned()),
            Ok(out) => {
                let stderr = String::from_utf8_lossy(&out.stderr);
                tracing::error!("pdftotext failed: {}", stderr.trim());
                Err(Error::Extraction(format!(
                    "the PDF could not be read ({})",
                    stderr.trim()
                )))
            }
            Err(e) => {
                tracing::error!("Failed to run {}: {}", self.pdftotext_bin, e);
                Err(Error::Extraction("PDF text extraction is not available".into()))
            }
        }
    }
}
