/// Document ingestion: extract plain text from a referral document on disk.
///
/// Dispatch is by file extension. Plain text and markdown are read as
/// UTF-8, DOCX referral letters go through `docx-rs`, PDFs through
/// `pdf-extract`, and HTML reuses the guideline page text extraction.
/// Anything else is a typed error.
use std::path::Path;

use tracing::info;

use crate::error::AppError;
use crate::fetch;

pub fn ingest_file(path: &Path) -> Result<String, AppError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    let text = match ext.as_str() {
        "txt" | "md" => read_file(path)?,
        "docx" => {
            let bytes = std::fs::read(path).map_err(|e| AppError::Ingest {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
            let docx = docx_rs::read_docx(&bytes).map_err(|e| AppError::Ingest {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
            docx_text(&docx.document)
        }
        "pdf" => {
            let bytes = std::fs::read(path).map_err(|e| AppError::Ingest {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
            pdf_extract::extract_text_from_mem(&bytes).map_err(|e| AppError::Ingest {
                path: path.display().to_string(),
                message: e.to_string(),
            })?
        }
        "html" | "htm" => {
            let html = read_file(path)?;
            fetch::parse_guideline_page(&path.display().to_string(), &html).text
        }
        other => {
            return Err(AppError::Unsupported(if other.is_empty() {
                "(no extension)".to_string()
            } else {
                other.to_string()
            }));
        }
    };

    info!(
        path = %path.display(),
        chars = text.chars().count(),
        "document ingested"
    );
    Ok(text)
}

/// Collect the run text of every paragraph, one line per paragraph.
/// Tables and other non-paragraph body content carry no referral prose
/// in practice and are skipped.
fn docx_text(document: &docx_rs::Document) -> String {
    let mut paragraphs = Vec::new();
    for child in &document.children {
        if let docx_rs::DocumentChild::Paragraph(paragraph) = child {
            let mut line = String::new();
            for pc in &paragraph.children {
                if let docx_rs::ParagraphChild::Run(run) = pc {
                    for rc in &run.children {
                        if let docx_rs::RunChild::Text(t) = rc {
                            line.push_str(&t.text);
                        }
                    }
                }
            }
            let line = line.trim();
            if !line.is_empty() {
                paragraphs.push(line.to_string());
            }
        }
    }
    paragraphs.join("\n")
}

fn read_file(path: &Path) -> Result<String, AppError> {
    std::fs::read_to_string(path).map_err(|e| AppError::Ingest {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_plain_text() {
        let dir = std::env::temp_dir();
        let path = dir.join("referral-triage-ingest-test.txt");
        std::fs::write(&path, "referral letter body").unwrap();
        let text = ingest_file(&path).unwrap();
        assert_eq!(text, "referral letter body");
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn extracts_html_text() {
        let dir = std::env::temp_dir();
        let path = dir.join("referral-triage-ingest-test.html");
        std::fs::write(&path, "<html><body><p>scanned  referral</p></body></html>").unwrap();
        let text = ingest_file(&path).unwrap();
        assert_eq!(text, "scanned referral");
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn extracts_docx_paragraphs() {
        let dir = std::env::temp_dir();
        let path = dir.join("referral-triage-ingest-test.docx");
        let file = std::fs::File::create(&path).unwrap();
        docx_rs::Docx::new()
            .add_paragraph(
                docx_rs::Paragraph::new()
                    .add_run(docx_rs::Run::new().add_text("Referral for two week wait clinic.")),
            )
            .add_paragraph(
                docx_rs::Paragraph::new()
                    .add_run(docx_rs::Run::new().add_text("Chest pain on exertion.")),
            )
            .build()
            .pack(file)
            .unwrap();

        let text = ingest_file(&path).unwrap();
        assert!(text.contains("Referral for two week wait clinic."));
        assert!(text.contains("Chest pain on exertion."));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn unsupported_extension_is_typed_error() {
        let err = ingest_file(Path::new("letter.xlsx")).unwrap_err();
        assert!(matches!(err, AppError::Unsupported(ref ext) if ext == "xlsx"));
    }

    #[test]
    fn missing_extension_is_typed_error() {
        let err = ingest_file(Path::new("letter")).unwrap_err();
        assert!(matches!(err, AppError::Unsupported(_)));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = ingest_file(Path::new("/nonexistent/letter.txt")).unwrap_err();
        match err {
            AppError::Ingest { path, .. } => assert!(path.contains("letter.txt")),
            other => panic!("expected ingest error, got {other:?}"),
        }
    }
}
