//! Owned preview resources.
//!
//! A [`PreviewHandle`] owns the bytes of one processed image. It is not
//! `Clone`: whoever holds it owns the resource, and dropping it releases it.
//! The [`PreviewStore`] that minted it counts creations and releases so the
//! one-live-preview invariant can be observed.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;
use veil_core::OutputFormat;

/// Base name of downloaded previews.
pub const DOWNLOAD_STEM: &str = "faceswap";

#[derive(Debug, Default)]
struct PreviewCounters {
    created: AtomicU64,
    released: AtomicU64,
}

/// Mints preview handles and tracks how many are live.
#[derive(Debug, Clone, Default)]
pub struct PreviewStore {
    counters: Arc<PreviewCounters>,
}

impl PreviewStore {
    /// Create a new store with no previews.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of processed image bytes as a new preview.
    #[must_use]
    pub fn create(
        &self,
        bytes: Vec<u8>,
        content_type: Option<String>,
        format: OutputFormat,
    ) -> PreviewHandle {
        let handle = PreviewHandle {
            id: Uuid::new_v4(),
            mime_type: content_type.unwrap_or_else(|| format.mime_type().to_string()),
            bytes: Arc::from(bytes),
            format,
            created_at: Utc::now(),
            counters: Arc::clone(&self.counters),
        };
        self.counters.created.fetch_add(1, Ordering::SeqCst);
        debug!("Created preview {} ({} bytes)", handle.id, handle.bytes.len());
        handle
    }

    /// Previews created so far.
    #[must_use]
    pub fn created_count(&self) -> u64 {
        self.counters.created.load(Ordering::SeqCst)
    }

    /// Previews released so far.
    #[must_use]
    pub fn released_count(&self) -> u64 {
        self.counters.released.load(Ordering::SeqCst)
    }

    /// Previews currently alive.
    #[must_use]
    pub fn live_count(&self) -> u64 {
        // `released` is loaded first so it can never exceed `created`.
        let released = self.released_count();
        self.created_count().saturating_sub(released)
    }
}

/// Exclusively owned processed image.
pub struct PreviewHandle {
    id: Uuid,
    bytes: Arc<[u8]>,
    mime_type: String,
    format: OutputFormat,
    created_at: DateTime<Utc>,
    counters: Arc<PreviewCounters>,
}

impl PreviewHandle {
    /// Unique id of this preview.
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Image bytes, shared read-only for display or saving.
    #[must_use]
    pub fn bytes(&self) -> Arc<[u8]> {
        Arc::clone(&self.bytes)
    }

    /// Size in bytes.
    #[must_use]
    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    /// MIME type of the image.
    #[must_use]
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Format the image was requested in.
    #[must_use]
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// File name offered for download, e.g. `faceswap.png`.
    #[must_use]
    pub fn download_file_name(&self) -> String {
        format!("{DOWNLOAD_STEM}.{}", self.format.extension())
    }

    /// Serializable summary for display.
    #[must_use]
    pub fn info(&self) -> PreviewInfo {
        PreviewInfo {
            id: self.id,
            mime_type: self.mime_type.clone(),
            size: self.size(),
            download_file_name: self.download_file_name(),
            created_at: self.created_at,
        }
    }
}

impl fmt::Debug for PreviewHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PreviewHandle")
            .field("id", &self.id)
            .field("size", &self.bytes.len())
            .field("mime_type", &self.mime_type)
            .field("format", &self.format)
            .finish_non_exhaustive()
    }
}

impl Drop for PreviewHandle {
    fn drop(&mut self) {
        self.counters.released.fetch_add(1, Ordering::SeqCst);
        debug!("Released preview {}", self.id);
    }
}

/// Display summary of a preview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreviewInfo {
    /// Unique id of the preview
    pub id: Uuid,
    /// MIME type of the image
    pub mime_type: String,
    /// Size in bytes
    pub size: usize,
    /// Suggested download file name
    pub download_file_name: String,
    /// When the preview was created
    pub created_at: DateTime<Utc>,
}
