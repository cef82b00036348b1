// Canvas metadata and its JSON sidecar.
//
// The sidecar lives next to the source image as `<stem>.metadata.json`:
//
//   {
//     "Width": 800, "Height": 600,
//     "OffsetX": 0, "OffsetY": 0,
//     "BackgroundColor": 0,
//     "BackgroundImage": "bg01"      (optional)
//   }
//
// Missing numeric fields default to zero. Width and Height are read as
// plain integers; whether the final canvas fits the 16-bit header fields is
// decided when the container is assembled.

use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Canvas geometry and background settings for one AKB image.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct CanvasMetadata {
    pub width: i32,
    pub height: i32,
    pub offset_x: i32,
    pub offset_y: i32,
    /// Packed colour, passed through unchanged.
    pub background_color: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_image: Option<String>,
}

impl CanvasMetadata {
    /// Metadata for an image placed at the origin of a canvas of its own size.
    pub fn for_source(width: u32, height: u32) -> Self {
        Self {
            width: i32::try_from(width).unwrap_or(i32::MAX),
            height: i32::try_from(height).unwrap_or(i32::MAX),
            ..Default::default()
        }
    }

    /// Background image name, if present and non-empty.
    pub fn background_name(&self) -> Option<&str> {
        self.background_image.as_deref().filter(|s| !s.is_empty())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum MetadataError {
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{}: invalid metadata: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Sidecar path for an image or container path.
pub fn sidecar_path(path: &Path) -> PathBuf {
    path.with_extension("metadata.json")
}

/// Read and parse a sidecar file.
pub fn load_sidecar(path: &Path) -> Result<CanvasMetadata, MetadataError> {
    let json = std::fs::read_to_string(path).map_err(|source| MetadataError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&json).map_err(|source| MetadataError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Read a sidecar, or fall back to [`CanvasMetadata::for_source`].
///
/// A missing or malformed sidecar is not an error: the problem is logged and
/// the image is placed at the origin of a canvas of its own size. The flag is
/// true when the sidecar was used.
pub fn load_or_default(
    path: &Path,
    source_width: u32,
    source_height: u32,
) -> (CanvasMetadata, bool) {
    match load_sidecar(path) {
        Ok(meta) => (meta, true),
        Err(e) => {
            log::warn!("{e}");
            log::warn!("failed to load metadata json, using default settings");
            (CanvasMetadata::for_source(source_width, source_height), false)
        }
    }
}

/// Write a sidecar as indented JSON.
pub fn save_sidecar(path: &Path, meta: &CanvasMetadata) -> Result<(), MetadataError> {
    let json = serde_json::to_string_pretty(meta).map_err(|source| MetadataError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    std::fs::write(path, json).map_err(|source| MetadataError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testlog::{capture, warnings};

    #[test]
    fn parses_pascal_case_fields() {
        let json = r#"{"Width":640,"Height":480,"OffsetX":12,"OffsetY":-3,
            "BackgroundColor":-16777216,"BackgroundImage":"bg01"}"#;
        let meta: CanvasMetadata = serde_json::from_str(json).unwrap();
        assert_eq!(meta.width, 640);
        assert_eq!(meta.height, 480);
        assert_eq!(meta.offset_x, 12);
        assert_eq!(meta.offset_y, -3);
        assert_eq!(meta.background_color, -16777216);
        assert_eq!(meta.background_name(), Some("bg01"));
    }

    #[test]
    fn oversized_canvas_still_parses() {
        let json = r#"{"Width":70000,"Height":-1,"OffsetX":5,"BackgroundImage":"bg"}"#;
        let meta: CanvasMetadata = serde_json::from_str(json).unwrap();
        assert_eq!(meta.width, 70_000);
        assert_eq!(meta.height, -1);
        assert_eq!(meta.offset_x, 5);
        assert_eq!(meta.background_name(), Some("bg"));
    }

    #[test]
    fn sidecar_used_when_present() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ok.metadata.json");
        std::fs::write(&path, r#"{"Width":9,"Height":9,"OffsetX":1}"#).unwrap();
        let ((meta, used), logs) = capture(|| load_or_default(&path, 2, 2));
        assert!(used);
        assert!(warnings(&logs).is_empty());
        assert_eq!(meta.width, 9);
        assert_eq!(meta.offset_x, 1);
    }

    #[test]
    fn missing_fields_default() {
        let meta: CanvasMetadata = serde_json::from_str(r#"{"Width":10}"#).unwrap();
        assert_eq!(meta.width, 10);
        assert_eq!(meta.height, 0);
        assert!(meta.background_image.is_none());
    }

    #[test]
    fn empty_name_counts_as_absent() {
        let meta = CanvasMetadata {
            background_image: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(meta.background_name(), None);
    }

    #[test]
    fn absent_name_is_not_serialized() {
        let json = serde_json::to_string(&CanvasMetadata::for_source(3, 4)).unwrap();
        assert!(!json.contains("BackgroundImage"));
        assert!(json.contains("\"Width\":3"));
    }

    #[test]
    fn sidecar_path_replaces_extension() {
        assert_eq!(
            sidecar_path(Path::new("dir/title.png")),
            PathBuf::from("dir/title.metadata.json")
        );
    }

    #[test]
    fn fallback_on_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let ((meta, used), logs) =
            capture(|| load_or_default(&dir.path().join("nope.metadata.json"), 100, 50));
        assert_eq!(meta, CanvasMetadata::for_source(100, 50));
        assert!(!used);
        let warns = warnings(&logs);
        assert_eq!(warns.len(), 2);
        assert!(warns[0].contains("nope.metadata.json"));
        assert_eq!(warns[1], "failed to load metadata json, using default settings");
    }

    #[test]
    fn fallback_on_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.metadata.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(load_sidecar(&path), Err(MetadataError::Json { .. })));
        assert_eq!(
            load_or_default(&path, 7, 8),
            (CanvasMetadata::for_source(7, 8), false)
        );
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("x.metadata.json");
        let meta = CanvasMetadata {
            width: 150,
            height: 150,
            offset_x: 50,
            offset_y: 50,
            background_color: 0x00FF00,
            background_image: Some("背景".to_string()),
        };
        save_sidecar(&path, &meta).unwrap();
        assert_eq!(load_sidecar(&path).unwrap(), meta);
    }
}
