//! File registry types.
//!
//! A [`FileDescriptor`] is what callers hand to registration; a
//! [`FileRecord`] is the immutable registry entry derived from it. The
//! [`FileKind`] is computed exactly once, at registration, and drives every
//! later dispatch decision; nothing downstream re-derives it from the name.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Closed set of file categories the workflow understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    /// csv
    Tabular,
    /// pdf
    Document,
    /// jpg, jpeg, png, gif, webp
    Image,
    /// mp3, wav
    Audio,
    /// Anything else; fails at classification.
    Unsupported,
}

impl FileKind {
    /// Categorize by the file name's extension, case-insensitively.
    pub fn from_name(name: &str) -> Self {
        let ext = Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase());

        match ext.as_deref() {
            Some("csv") => FileKind::Tabular,
            Some("pdf") => FileKind::Document,
            Some("jpg" | "jpeg" | "png" | "gif" | "webp") => FileKind::Image,
            Some("mp3" | "wav") => FileKind::Audio,
            _ => FileKind::Unsupported,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FileKind::Tabular => "tabular",
            FileKind::Document => "document",
            FileKind::Image => "image",
            FileKind::Audio => "audio",
            FileKind::Unsupported => "unsupported",
        }
    }

    /// Whether files of this kind have a classification endpoint at all.
    pub fn is_supported(&self) -> bool {
        !matches!(self, FileKind::Unsupported)
    }
}

/// A candidate file as handed to registration.
///
/// No existence check happens here; unsupported or unreadable files surface
/// at classification, where they fail explicitly.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileDescriptor {
    pub name: String,
    pub path: String,
    pub mime_type: Option<String>,
    pub size_bytes: u64,
}

impl FileDescriptor {
    /// Build a descriptor from a path alone, without touching the
    /// filesystem. The name comes from the last path component and the MIME
    /// type from the extension, so this also works for server-side paths
    /// returned by folder listing.
    pub fn from_path(path: impl Into<String>) -> Self {
        let path = path.into();
        let name = Path::new(&path)
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.clone());
        let mime_type = mime_guess::MimeGuess::from_path(&path)
            .first()
            .map(|m| m.to_string());

        Self {
            name,
            path,
            mime_type,
            size_bytes: 0,
        }
    }

    /// Build a descriptor for a local file, reading its size from disk.
    pub fn from_local(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let metadata = std::fs::metadata(path.as_ref())?;
        let mut descriptor = Self::from_path(path.as_ref().to_string_lossy().to_string());
        descriptor.size_bytes = metadata.len();
        Ok(descriptor)
    }
}

/// Immutable registry entry. Indices are assigned consecutively from 0 and
/// never reused while the registry lives; only a full reset empties it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRecord {
    pub index: usize,
    pub name: String,
    pub path: String,
    pub mime_type: Option<String>,
    pub size_bytes: u64,
    pub kind: FileKind,
}

impl FileRecord {
    pub(crate) fn from_descriptor(index: usize, descriptor: FileDescriptor) -> Self {
        let kind = FileKind::from_name(&descriptor.name);
        Self {
            index,
            name: descriptor.name,
            path: descriptor.path,
            mime_type: descriptor.mime_type,
            size_bytes: descriptor.size_bytes,
            kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_name() {
        assert_eq!(FileKind::from_name("people.csv"), FileKind::Tabular);
        assert_eq!(FileKind::from_name("report.pdf"), FileKind::Document);
        assert_eq!(FileKind::from_name("scan.jpeg"), FileKind::Image);
        assert_eq!(FileKind::from_name("photo.webp"), FileKind::Image);
        assert_eq!(FileKind::from_name("call.wav"), FileKind::Audio);
        assert_eq!(FileKind::from_name("notes.txt"), FileKind::Unsupported);
        assert_eq!(FileKind::from_name("no_extension"), FileKind::Unsupported);
    }

    #[test]
    fn test_kind_is_case_insensitive() {
        assert_eq!(FileKind::from_name("EXPORT.CSV"), FileKind::Tabular);
        assert_eq!(FileKind::from_name("Photo.JPG"), FileKind::Image);
        assert_eq!(FileKind::from_name("Interview.Mp3"), FileKind::Audio);
    }

    #[test]
    fn test_descriptor_from_path() {
        let descriptor = FileDescriptor::from_path("/srv/uploads/people.csv");
        assert_eq!(descriptor.name, "people.csv");
        assert_eq!(descriptor.path, "/srv/uploads/people.csv");
        assert_eq!(descriptor.mime_type.as_deref(), Some("text/csv"));
        assert_eq!(descriptor.size_bytes, 0);
    }

    #[test]
    fn test_descriptor_from_local_reads_size() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("people.csv");
        std::fs::write(&path, "id,name\n1,alice\n").unwrap();

        let descriptor = FileDescriptor::from_local(&path).unwrap();
        assert_eq!(descriptor.name, "people.csv");
        assert_eq!(descriptor.size_bytes, 16);
    }

    #[test]
    fn test_record_computes_kind_once() {
        let record = FileRecord::from_descriptor(3, FileDescriptor::from_path("a/b/scan.PNG"));
        assert_eq!(record.index, 3);
        assert_eq!(record.kind, FileKind::Image);
    }
}
