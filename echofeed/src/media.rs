//! Object storage adapter.
//!
//! The store is an opaque blob service: it accepts bytes under a path
//! scoped to the uploading user and returns a publicly fetchable URL.
//! Uploads may report fractional progress while in flight.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BlobError {
    #[error("upload failed: {0}")]
    Upload(String),
}

#[allow(async_fn_in_trait)]
pub trait BlobStore {
    /// Store `bytes` under `path` and return the public URL. `progress`
    /// receives values in 0..=100 while the upload is in flight.
    async fn upload(
        &self,
        path: &str,
        bytes: &[u8],
        progress: &mut dyn FnMut(f32),
    ) -> Result<String, BlobError>;
}

/// Upload path under the user's id with a timestamp-disambiguated
/// filename, so re-uploads of the same file never collide.
pub fn blob_path(user_id: &str, filename: &str, now: DateTime<Utc>) -> String {
    format!("{}/{}_{}", user_id, now.timestamp_millis(), filename)
}

/// In-memory blob store for tests.
#[derive(Default)]
pub struct MemoryBlobStore {
    blobs: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.blobs.lock().map(|b| b.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl BlobStore for MemoryBlobStore {
    async fn upload(
        &self,
        path: &str,
        bytes: &[u8],
        progress: &mut dyn FnMut(f32),
    ) -> Result<String, BlobError> {
        progress(0.0);
        {
            let mut blobs = self
                .blobs
                .lock()
                .map_err(|_| BlobError::Upload("store poisoned".to_string()))?;
            blobs.insert(path.to_string(), bytes.to_vec());
        }
        progress(100.0);
        Ok(format!("memory://{path}"))
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn blob_path_is_user_scoped_and_timestamped() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).single().expect("timestamp");
        let path = blob_path("u1", "clip.mp4", now);
        assert!(path.starts_with("u1/"));
        assert!(path.ends_with("_clip.mp4"));
    }

    #[tokio::test]
    async fn memory_store_reports_progress_and_returns_url() {
        let store = MemoryBlobStore::new();
        let mut seen = Vec::new();
        let url = store
            .upload("u1/1_clip.mp4", b"bytes", &mut |p| seen.push(p))
            .await
            .expect("upload");
        assert_eq!(url, "memory://u1/1_clip.mp4");
        assert_eq!(seen.first().copied(), Some(0.0));
        assert_eq!(seen.last().copied(), Some(100.0));
        assert_eq!(store.len(), 1);
    }
}
