use std::path::Path;

use crate::backend_service::KnowledgeBackend;
use crate::error::{ExplorerError, Result};
use crate::models::ContentUpload;

/// Reads `path` and uploads it under `topic`.
pub async fn upload_file(backend: &dyn KnowledgeBackend, topic: &str, path: &Path) -> Result<()> {
    let topic = topic.trim();
    if topic.is_empty() {
        return Err(ExplorerError::Validation(
            "Please provide both topic and file".to_string(),
        ));
    }

    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .ok_or_else(|| ExplorerError::Validation(format!("not a file: {}", path.display())))?;

    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ExplorerError::Validation(format!(
                "file not found: {}",
                path.display()
            )))
        }
        Err(e) => return Err(e.into()),
    };
    if bytes.is_empty() {
        return Err(ExplorerError::Validation(format!("{} is empty", file_name)));
    }

    log::info!("Uploading {} ({} bytes)", file_name, bytes.len());
    backend
        .upload(&ContentUpload {
            topic: topic.to_string(),
            file_name,
            bytes,
        })
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::StubBackend;
    use std::io::Write;

    #[tokio::test]
    async fn uploads_file_contents_with_topic() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("runbook.md");
        std::fs::File::create(&path)
            .unwrap()
            .write_all(b"# Restart procedure")
            .unwrap();
        let backend = StubBackend::new();

        upload_file(&backend, " Operations ", &path).await.unwrap();

        let uploads = backend.uploads();
        assert_eq!(uploads.len(), 1);
        assert_eq!(uploads[0].topic, "Operations");
        assert_eq!(uploads[0].file_name, "runbook.md");
        assert_eq!(uploads[0].bytes, b"# Restart procedure");
    }

    #[tokio::test]
    async fn rejects_missing_topic_missing_file_and_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let empty = dir.path().join("empty.txt");
        std::fs::File::create(&empty).unwrap();
        let backend = StubBackend::new();

        for (topic, path) in [
            ("", empty.clone()),
            ("Ops", dir.path().join("missing.pdf")),
            ("Ops", empty.clone()),
        ] {
            let err = upload_file(&backend, topic, &path).await.unwrap_err();
            assert!(matches!(err, ExplorerError::Validation(_)), "{:?}", err);
        }
        assert!(backend.calls().is_empty());
    }
}
