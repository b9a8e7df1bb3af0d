// ==========================================
// Appliance Registry - Staged upload
// ==========================================
// An uploaded workbook spilled to a temporary file for the reader
// The file is removed when the upload is dropped or closed,
// whichever path the import took
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tempfile::{Builder, TempPath};
use tracing::{debug, warn};

const CHUNK_SIZE: usize = 64 * 1024;

pub struct StagedUpload {
    path: TempPath,
    original_name: String,
    size: usize,
}

impl StagedUpload {
    /// Drains `reader` into an owned buffer, then stages it
    ///
    /// # Arguments
    /// - reader: upload byte stream, consumed to the end
    /// - original_name: client file name (its extension selects the parser)
    pub fn from_reader<R: Read>(mut reader: R, original_name: &str) -> ImportResult<Self> {
        let mut buffer = Vec::new();
        let mut chunk = vec![0u8; CHUNK_SIZE];
        loop {
            let read = reader.read(&mut chunk)?;
            if read == 0 {
                break;
            }
            buffer.extend_from_slice(&chunk[..read]);
        }
        Self::from_bytes(&buffer, original_name)
    }

    pub fn from_bytes(bytes: &[u8], original_name: &str) -> ImportResult<Self> {
        let extension = Path::new(original_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| format!(".{}", e.to_lowercase()))
            .ok_or_else(|| ImportError::UnsupportedFormat(original_name.to_string()))?;

        let mut file = Builder::new()
            .prefix("registry-upload-")
            .suffix(&extension)
            .tempfile()?;
        file.write_all(bytes)?;
        file.flush()?;

        let path = file.into_temp_path();
        debug!(file = %path.display(), size = bytes.len(), "upload staged");
        Ok(Self {
            path,
            original_name: original_name.to_string(),
            size: bytes.len(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn original_name(&self) -> &str {
        &self.original_name
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Deletes the staged file now, reporting failures instead of ignoring them
    pub fn close(self) -> ImportResult<()> {
        let shown = self.path.display().to_string();
        self.path.close().map_err(|e| {
            warn!(file = %shown, error = %e, "staged upload cleanup failed");
            ImportError::FileReadError(e.to_string())
        })
    }

    /// Keeps the staged file on disk and returns its location
    pub fn keep(self) -> ImportResult<PathBuf> {
        self.path
            .keep()
            .map_err(|e| ImportError::InternalError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_from_reader_stages_all_bytes() {
        let payload = "fuelId,fuelName\nFUEL001,Briquettes\n".repeat(5_000);
        let upload = StagedUpload::from_reader(Cursor::new(payload.clone()), "fuels.CSV").unwrap();

        assert_eq!(upload.size(), payload.len());
        assert_eq!(upload.original_name(), "fuels.CSV");
        assert!(upload.path().to_string_lossy().ends_with(".csv"));
        assert_eq!(std::fs::read_to_string(upload.path()).unwrap(), payload);
    }

    #[test]
    fn test_drop_and_close_remove_file() {
        let upload = StagedUpload::from_bytes(b"a,b\n", "x.csv").unwrap();
        let path = upload.path().to_path_buf();
        drop(upload);
        assert!(!path.exists());

        let upload = StagedUpload::from_bytes(b"a,b\n", "x.csv").unwrap();
        let path = upload.path().to_path_buf();
        upload.close().unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_close_reports_missing_file() {
        let upload = StagedUpload::from_bytes(b"a,b\n", "x.csv").unwrap();
        std::fs::remove_file(upload.path()).unwrap();
        assert!(matches!(upload.close(), Err(ImportError::FileReadError(_))));
    }

    #[test]
    fn test_keep_leaves_file() {
        let upload = StagedUpload::from_bytes(b"a,b\n", "x.csv").unwrap();
        let path = upload.keep().unwrap();
        assert!(path.exists());
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_name_without_extension_rejected() {
        assert!(matches!(
            StagedUpload::from_bytes(b"", "upload"),
            Err(ImportError::UnsupportedFormat(_))
        ));
    }
}
