use std::collections::HashMap;

use sha2::{Digest, Sha256};
use tracing::debug;

use crate::documents::extract::{extract_document, ExtractError};
use crate::models::document::{DocumentKind, DocumentPayload, UploadedDocument};

/// Extraction results for one batch, keyed by the SHA-256 of the uploaded bytes.
///
/// Created per dispatch and dropped with it; nothing is shared across requests.
#[derive(Debug, Default)]
pub struct ExtractionCache {
    entries: HashMap<String, DocumentPayload>,
    hits: usize,
}

impl ExtractionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached payload for identical bytes, or extracts on a blocking thread.
    /// Failures are not cached.
    pub async fn get_or_extract(
        &mut self,
        document: &UploadedDocument,
    ) -> Result<DocumentPayload, ExtractError> {
        if DocumentKind::from_mime(&document.media_type).is_none() {
            return Err(ExtractError::UnsupportedMediaType(
                document.media_type.clone(),
            ));
        }

        let key = content_key(&document.bytes);
        if let Some(payload) = self.entries.get(&key) {
            self.hits += 1;
            debug!("Extraction cache hit for '{}'", document.file_name);
            return Ok(payload.clone());
        }

        let owned = document.clone();
        let payload = tokio::task::spawn_blocking(move || extract_document(&owned))
            .await
            .map_err(|e| ExtractError::Aborted(e.to_string()))??;

        self.entries.insert(key, payload.clone());
        Ok(payload)
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn hits(&self) -> usize {
        self.hits
    }
}

pub fn content_key(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;

    use super::*;
    use crate::documents::extract::fixtures::docx_bytes;
    use crate::models::document::DOCX_MIME;

    fn docx_upload(name: &str, paragraphs: &[&str]) -> UploadedDocument {
        UploadedDocument {
            file_name: name.to_string(),
            media_type: DOCX_MIME.to_string(),
            bytes: Bytes::from(docx_bytes(paragraphs)),
        }
    }

    #[test]
    fn test_content_key_is_sha256_hex() {
        assert_eq!(
            content_key(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[tokio::test]
    async fn test_identical_uploads_extracted_once() {
        let mut cache = ExtractionCache::new();
        let first = docx_upload("a.docx", &["Jane Doe"]);
        let copy = UploadedDocument {
            file_name: "copy.docx".to_string(),
            ..first.clone()
        };

        let a = cache.get_or_extract(&first).await.unwrap();
        let b = cache.get_or_extract(&copy).await.unwrap();

        assert_eq!(a, b);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.hits(), 1);
    }

    #[tokio::test]
    async fn test_different_uploads_cached_separately() {
        let mut cache = ExtractionCache::new();
        cache
            .get_or_extract(&docx_upload("a.docx", &["Jane Doe"]))
            .await
            .unwrap();
        cache
            .get_or_extract(&docx_upload("b.docx", &["John Roe"]))
            .await
            .unwrap();
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.hits(), 0);
    }

    #[tokio::test]
    async fn test_failures_are_not_cached() {
        let mut cache = ExtractionCache::new();
        let broken = UploadedDocument {
            file_name: "broken.docx".to_string(),
            media_type: DOCX_MIME.to_string(),
            bytes: Bytes::from_static(b"not a zip"),
        };
        assert!(cache.get_or_extract(&broken).await.is_err());
        assert_eq!(cache.len(), 0);
    }

    #[tokio::test]
    async fn test_unsupported_type_checked_before_lookup() {
        let mut cache = ExtractionCache::new();
        let docx = docx_upload("a.docx", &["Jane Doe"]);
        cache.get_or_extract(&docx).await.unwrap();

        let mislabeled = UploadedDocument {
            media_type: "text/html".to_string(),
            ..docx
        };
        let result = cache.get_or_extract(&mislabeled).await;
        assert!(matches!(result, Err(ExtractError::UnsupportedMediaType(_))));
    }
}
