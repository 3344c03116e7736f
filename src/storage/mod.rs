//! Image storage on the local filesystem.
//!
//! Uploaded images land in `<data dir>/uploads` under a sanitized file name
//! with a random suffix, and are served back under `/uploads/{name}`. The
//! store hands out the public URL path; it never leaks filesystem paths.

use std::fs;
use std::path::PathBuf;

use crate::auth::random_hex;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("empty upload")]
    Empty,
    #[error("failed to write upload: {0}")]
    Io(#[from] std::io::Error),
}

/// Local object storage for event images
#[derive(Clone)]
pub struct ObjectStorage {
    uploads_dir: PathBuf,
}

impl ObjectStorage {
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            uploads_dir: data_dir.join("uploads"),
        }
    }

    /// Keep only filename-safe characters; collapse anything else to '-'
    fn sanitize(name: &str) -> String {
        let cleaned: String = name
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                    c
                } else {
                    '-'
                }
            })
            .collect();
        if cleaned.trim_matches('-').is_empty() {
            "image".to_string()
        } else {
            cleaned
        }
    }

    /// Write an uploaded image, returning its public URL path
    pub fn save(&self, original_name: &str, bytes: &[u8]) -> Result<String, StorageError> {
        if bytes.is_empty() {
            return Err(StorageError::Empty);
        }

        fs::create_dir_all(&self.uploads_dir)?;

        // Random prefix keeps same-named uploads from clobbering each other
        let file_name = format!("{}-{}", random_hex(8), Self::sanitize(original_name));
        fs::write(self.uploads_dir.join(&file_name), bytes)?;

        Ok(format!("/uploads/{}", file_name))
    }

    /// Read a stored image by its public file name. Names containing path
    /// separators are rejected so requests cannot escape the uploads dir.
    pub fn open(&self, file_name: &str) -> Option<Vec<u8>> {
        if file_name.contains('/') || file_name.contains('\\') || file_name.contains("..") {
            return None;
        }
        fs::read(self.uploads_dir.join(file_name)).ok()
    }
}
