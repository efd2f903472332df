//! The Selected File entity and loading it from disk.

use crate::error::Doc2SpeechError;
use crate::intake;
use crate::intake::media::media_type_for_path;
use bytes::Bytes;
use chrono::{DateTime, Local, Utc};
use std::fmt;
use std::path::Path;
use tracing::debug;

/// A user-provided document held in memory.
///
/// Cloning is cheap: the content is shared. The media type is whatever the
/// source declared; intake decides whether it is acceptable.
#[derive(Clone)]
pub struct SelectedFile {
    /// Display name (file name without directories).
    pub name: String,
    /// Declared media type.
    pub media_type: String,
    /// Last-modified timestamp as reported by the source.
    pub last_modified: DateTime<Utc>,
    content: Bytes,
}

impl SelectedFile {
    /// Build a candidate from in-memory content, stamped with the current time.
    pub fn from_bytes(
        name: impl Into<String>,
        media_type: impl Into<String>,
        content: impl Into<Bytes>,
    ) -> Self {
        Self {
            name: name.into(),
            media_type: media_type.into(),
            last_modified: Utc::now(),
            content: content.into(),
        }
    }

    pub fn with_last_modified(mut self, at: DateTime<Utc>) -> Self {
        self.last_modified = at;
        self
    }

    /// Load a file from disk.
    ///
    /// The media type is inferred from the extension unless `media_type`
    /// overrides it. A file larger than `max_size` is rejected from its
    /// metadata without being read; every other check is left to intake.
    pub async fn load(
        path: &Path,
        media_type: Option<&str>,
        max_size: u64,
    ) -> Result<Self, Doc2SpeechError> {
        let metadata = match tokio::fs::metadata(path).await {
            Ok(m) => m,
            Err(e) => return Err(map_read_error(path, e)),
        };
        if !metadata.is_file() {
            return Err(Doc2SpeechError::FileNotFound {
                path: path.to_path_buf(),
            });
        }

        let media_type = media_type
            .map(str::to_string)
            .unwrap_or_else(|| media_type_for_path(path).to_string());

        if metadata.len() > max_size {
            debug!("Not reading {}: {} bytes", path.display(), metadata.len());
            // Fails here; `check` keeps the type-before-size order.
            intake::check(&media_type, metadata.len(), max_size)?;
        }

        let content = tokio::fs::read(path)
            .await
            .map_err(|e| map_read_error(path, e))?;

        let last_modified = metadata
            .modified()
            .map(DateTime::<Utc>::from)
            .unwrap_or_else(|_| Utc::now());

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        debug!("Loaded {} ({} bytes, {})", path.display(), content.len(), media_type);

        Ok(Self {
            name,
            media_type,
            last_modified,
            content: Bytes::from(content),
        })
    }

    pub fn size(&self) -> u64 {
        self.content.len() as u64
    }

    /// Shared content; cloning the returned buffer does not copy.
    pub fn content(&self) -> &Bytes {
        &self.content
    }

    /// Whether both values share one underlying buffer, i.e. come from the
    /// same intake rather than merely having equal bytes.
    pub fn same_content(&self, other: &SelectedFile) -> bool {
        self.content.as_ptr() == other.content.as_ptr()
            && self.content.len() == other.content.len()
    }

    /// Size formatted in mebibytes with two decimals, e.g. `2.00 MB`.
    pub fn size_label(&self) -> String {
        format!("{:.2} MB", self.size() as f64 / 1024.0 / 1024.0)
    }

    /// Last-modified date in the local time zone, e.g. `2026-10-16`.
    pub fn last_modified_label(&self) -> String {
        self.last_modified
            .with_timezone(&Local)
            .format("%Y-%m-%d")
            .to_string()
    }
}

impl fmt::Debug for SelectedFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectedFile")
            .field("name", &self.name)
            .field("media_type", &self.media_type)
            .field("size", &self.size())
            .field("last_modified", &self.last_modified)
            .finish()
    }
}

fn map_read_error(path: &Path, e: std::io::Error) -> Doc2SpeechError {
    match e.kind() {
        std::io::ErrorKind::NotFound => Doc2SpeechError::FileNotFound {
            path: path.to_path_buf(),
        },
        std::io::ErrorKind::PermissionDenied => Doc2SpeechError::PermissionDenied {
            path: path.to_path_buf(),
        },
        _ => Doc2SpeechError::ReadFailed {
            path: path.to_path_buf(),
            source: e,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_MAX_FILE_SIZE;
    use crate::error::ValidationError;
    use crate::intake::media::{PDF_MEDIA_TYPE, PPTX_MEDIA_TYPE};
    use chrono::TimeZone;

    #[test]
    fn size_label_two_decimals() {
        let f = SelectedFile::from_bytes("a.pdf", PDF_MEDIA_TYPE, vec![0u8; 2 * 1024 * 1024]);
        assert_eq!(f.size_label(), "2.00 MB");
        let g = SelectedFile::from_bytes("b.pdf", PDF_MEDIA_TYPE, vec![0u8; 1536 * 1024]);
        assert_eq!(g.size_label(), "1.50 MB");
    }

    #[test]
    fn clones_share_content() {
        let f = SelectedFile::from_bytes("a.pdf", PDF_MEDIA_TYPE, vec![1u8, 2, 3]);
        let g = f.clone();
        assert!(f.same_content(&g));
        assert_eq!(f.content().as_ptr(), g.content().as_ptr());

        let twin = SelectedFile::from_bytes("a.pdf", PDF_MEDIA_TYPE, vec![1u8, 2, 3]);
        assert!(!f.same_content(&twin));
    }

    #[test]
    fn debug_omits_content() {
        let f = SelectedFile::from_bytes("a.pdf", PDF_MEDIA_TYPE, vec![0xAB; 4])
            .with_last_modified(Utc.with_ymd_and_hms(2024, 1, 2, 12, 0, 0).unwrap());
        let s = format!("{f:?}");
        assert!(s.contains("size: 4"));
        assert!(!s.contains("171"));
    }

    #[tokio::test]
    async fn load_infers_media_type() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("slides.pptx");
        tokio::fs::write(&path, b"PK\x03\x04rest").await.unwrap();

        let f = SelectedFile::load(&path, None, DEFAULT_MAX_FILE_SIZE).await.unwrap();
        assert_eq!(f.name, "slides.pptx");
        assert_eq!(f.media_type, PPTX_MEDIA_TYPE);
        assert_eq!(f.size(), 8);
    }

    #[tokio::test]
    async fn load_honours_override() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scan.bin");
        tokio::fs::write(&path, b"%PDF-1.7").await.unwrap();

        let f = SelectedFile::load(&path, Some(PDF_MEDIA_TYPE), DEFAULT_MAX_FILE_SIZE)
            .await
            .unwrap();
        assert_eq!(f.media_type, PDF_MEDIA_TYPE);
    }

    #[tokio::test]
    async fn load_missing_file() {
        let missing = Path::new("/definitely/not/here.pdf");
        let err = SelectedFile::load(missing, None, DEFAULT_MAX_FILE_SIZE)
            .await
            .unwrap_err();
        assert!(matches!(err, Doc2SpeechError::FileNotFound { .. }));
    }

    #[tokio::test]
    async fn load_directory_is_not_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = SelectedFile::load(dir.path(), None, DEFAULT_MAX_FILE_SIZE)
            .await
            .unwrap_err();
        assert!(matches!(err, Doc2SpeechError::FileNotFound { .. }));
    }

    #[tokio::test]
    async fn oversized_file_is_rejected_before_reading() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("huge.pdf");
        // Sparse: the length is set without writing any data.
        std::fs::File::create(&path)
            .unwrap()
            .set_len(DEFAULT_MAX_FILE_SIZE + 1024 * 1024)
            .unwrap();

        let err = SelectedFile::load(&path, None, DEFAULT_MAX_FILE_SIZE)
            .await
            .unwrap_err();
        assert!(
            matches!(
                err,
                Doc2SpeechError::Validation(ValidationError::TooLarge { size, limit })
                    if size == DEFAULT_MAX_FILE_SIZE + 1024 * 1024 && limit == DEFAULT_MAX_FILE_SIZE
            ),
            "got: {err:?}"
        );
    }

    #[tokio::test]
    async fn oversized_wrong_type_reports_the_type() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::File::create(&path).unwrap().set_len(2048).unwrap();

        let err = SelectedFile::load(&path, None, 1024).await.unwrap_err();
        assert!(
            matches!(
                err,
                Doc2SpeechError::Validation(ValidationError::UnsupportedType { .. })
            ),
            "got: {err:?}"
        );
    }

    #[tokio::test]
    async fn file_at_the_limit_is_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("edge.pdf");
        tokio::fs::write(&path, vec![b'x'; 1024]).await.unwrap();

        let f = SelectedFile::load(&path, None, 1024).await.unwrap();
        assert_eq!(f.size(), 1024);
    }
}
