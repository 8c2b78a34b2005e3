//! Disk persistence for collections using bincode serialization.
//!
//! Collections are serialized to `.scol` files using bincode. Writes use
//! atomic temp-file + rename to prevent corruption on crash.
//! A CRC32 checksum is appended as a 4-byte footer for integrity verification.

use crate::error::ConfigurationError;
use crate::storage::collection::Collection;
use std::fs;
use std::path::{Path, PathBuf};

/// File extension of collection snapshots.
pub const SNAPSHOT_EXTENSION: &str = "scol";

/// Magic bytes appended before the CRC32 footer.
const SNAPSHOT_CRC_MAGIC: &[u8; 4] = b"SCR1";

/// Save a collection to disk using bincode serialization with atomic write.
/// Appends a CRC32 checksum footer: [magic "SCR1"][u32 CRC32 BE].
pub fn save_collection(
    collection: &Collection,
    dir: &Path,
) -> Result<PathBuf, ConfigurationError> {
    let path = dir.join(format!("{}.{}", collection.name, SNAPSHOT_EXTENSION));
    let tmp_path = dir.join(format!("{}.{}.tmp", collection.name, SNAPSHOT_EXTENSION));
    let io_err = |path: &Path, source: std::io::Error| ConfigurationError::Io {
        path: path.to_path_buf(),
        source,
    };

    let bytes = bincode::serialize(collection).map_err(|e| ConfigurationError::CorruptSnapshot {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    // Compute CRC32 over the bincode payload
    let crc = crc32fast::hash(&bytes);

    fs::create_dir_all(dir).map_err(|e| io_err(dir, e))?;

    // Write: [bincode payload][magic 4 bytes][CRC32 4 bytes BE]
    let mut output = Vec::with_capacity(bytes.len() + 8);
    output.extend_from_slice(&bytes);
    output.extend_from_slice(SNAPSHOT_CRC_MAGIC);
    output.extend_from_slice(&crc.to_be_bytes());

    // Atomic write: write to temp, then rename
    fs::write(&tmp_path, &output).map_err(|e| io_err(&tmp_path, e))?;
    fs::rename(&tmp_path, &path).map_err(|e| io_err(&path, e))?;

    tracing::info!(
        collection = %collection.name,
        documents = collection.len(),
        bytes = bytes.len(),
        "Saved collection snapshot (CRC32={:#010x})",
        crc
    );
    Ok(path)
}

/// Load a collection from disk, verifying the CRC32 footer.
pub fn load_collection(path: &Path) -> Result<Collection, ConfigurationError> {
    let corrupt = |reason: String| ConfigurationError::CorruptSnapshot {
        path: path.to_path_buf(),
        reason,
    };

    let raw = fs::read(path).map_err(|source| ConfigurationError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    // Footer: last 8 bytes = [magic "SCR1"][CRC32 BE]
    if raw.len() < 8 || &raw[raw.len() - 8..raw.len() - 4] != SNAPSHOT_CRC_MAGIC {
        return Err(corrupt("missing CRC32 footer".to_string()));
    }
    let payload = &raw[..raw.len() - 8];
    let stored_crc = u32::from_be_bytes([
        raw[raw.len() - 4],
        raw[raw.len() - 3],
        raw[raw.len() - 2],
        raw[raw.len() - 1],
    ]);
    let computed_crc = crc32fast::hash(payload);
    if computed_crc != stored_crc {
        return Err(corrupt(format!(
            "CRC32 mismatch: expected {:#010x}, got {:#010x}",
            stored_crc, computed_crc
        )));
    }
    tracing::debug!("Snapshot CRC32 verified: {:#010x}", stored_crc);

    let mut collection: Collection =
        bincode::deserialize(payload).map_err(|e| corrupt(e.to_string()))?;
    collection.rebuild_lookup().map_err(corrupt)?;
    collection
        .validate()
        .map_err(|e| corrupt(format!("validation failed: {}", e)))?;

    tracing::info!(
        collection = %collection.name,
        documents = collection.len(),
        dimension = collection.dimension,
        "Loaded collection snapshot"
    );
    Ok(collection)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;
    use crate::storage::distance::DistanceMetric;
    use crate::storage::VectorStore;
    use tempfile::TempDir;

    fn sample() -> Collection {
        let mut col = Collection::new("climate_search", 3, DistanceMetric::Cosine);
        col.insert(
            Document::with_fields("news_0", "sea ice minimum", "Ice", None, -0.7),
            vec![1.0, 0.0, 0.0],
        )
        .unwrap();
        col.insert(
            Document::with_fields(
                "news_1",
                "wind farm opens",
                "Wind",
                Some("https://example.org/wind".into()),
                0.8,
            ),
            vec![0.0, 1.0, 0.0],
        )
        .unwrap();
        col
    }

    #[test]
    fn test_save_and_load() {
        let tmp = TempDir::new().unwrap();
        let path = save_collection(&sample(), tmp.path()).unwrap();
        assert!(path.ends_with("climate_search.scol"));

        let loaded = load_collection(&path).unwrap();
        assert_eq!(loaded.name, "climate_search");
        assert_eq!(loaded.len(), 2);
        assert_eq!(
            loaded.get_document("news_1").unwrap().url(),
            Some("https://example.org/wind")
        );
        assert_eq!(loaded.query(&[0.0, 1.0, 0.0], 1).unwrap(), vec!["news_1"]);
    }

    #[test]
    fn test_no_tmp_file_left_behind() {
        let tmp = TempDir::new().unwrap();
        save_collection(&sample(), tmp.path()).unwrap();
        assert!(!tmp.path().join("climate_search.scol.tmp").exists());
    }

    #[test]
    fn test_corrupted_payload_rejected() {
        let tmp = TempDir::new().unwrap();
        let path = save_collection(&sample(), tmp.path()).unwrap();
        let mut raw = fs::read(&path).unwrap();
        raw[4] ^= 0xFF;
        fs::write(&path, &raw).unwrap();
        let err = load_collection(&path).unwrap_err();
        assert!(matches!(err, ConfigurationError::CorruptSnapshot { .. }));
    }

    #[test]
    fn test_missing_footer_rejected() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("bad.scol");
        fs::write(&path, b"short").unwrap();
        assert!(matches!(
            load_collection(&path),
            Err(ConfigurationError::CorruptSnapshot { .. })
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let tmp = TempDir::new().unwrap();
        let err = load_collection(&tmp.path().join("absent.scol")).unwrap_err();
        assert!(matches!(err, ConfigurationError::Io { .. }));
    }
}
