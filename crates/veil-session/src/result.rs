//! What the last submission produced.

use crate::preview::PreviewHandle;
use veil_client::ResponseMetadata;

/// Message shown after a successful redaction.
pub const SUCCESS_MESSAGE: &str = "done";

/// Result state written by the current submission.
#[derive(Debug, Default)]
pub struct ResultState {
    preview: Option<PreviewHandle>,
    /// Latest user-facing message
    pub status_message: Option<String>,
    /// Metadata from the latest successful response
    pub metadata: ResponseMetadata,
}

impl ResultState {
    /// Reset message and metadata before a new request. The preview stays.
    pub fn clear_for_submission(&mut self) {
        self.status_message = None;
        self.metadata = ResponseMetadata::default();
    }

    /// Release the current preview, then install the one `create` returns.
    ///
    /// `create` runs only after the old handle has been dropped.
    pub fn replace_preview(&mut self, create: impl FnOnce() -> PreviewHandle) {
        drop(self.preview.take());
        self.preview = Some(create());
    }

    /// The live preview, if any.
    #[must_use]
    pub fn preview(&self) -> Option<&PreviewHandle> {
        self.preview.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preview::PreviewStore;
    use veil_core::OutputFormat;

    #[test]
    fn test_clear_keeps_preview() {
        let store = PreviewStore::new();
        let mut result = ResultState::default();
        result.replace_preview(|| store.create(vec![1], None, OutputFormat::Png));
        result.status_message = Some("done".to_string());
        result.metadata.detector = Some("mediapipe".to_string());

        result.clear_for_submission();

        assert!(result.status_message.is_none());
        assert!(result.metadata.is_empty());
        assert!(result.preview().is_some());
        assert_eq!(store.live_count(), 1);
    }

    #[test]
    fn test_old_preview_released_before_new_created() {
        let store = PreviewStore::new();
        let mut result = ResultState::default();
        result.replace_preview(|| store.create(vec![1], None, OutputFormat::Png));

        result.replace_preview(|| {
            assert_eq!(store.live_count(), 0, "previous preview still alive");
            store.create(vec![2], None, OutputFormat::Png)
        });

        assert_eq!(store.live_count(), 1);
        assert_eq!(store.released_count(), 1);
        assert_eq!(result.preview().map(PreviewHandle::size), Some(1));
    }

    #[test]
    fn test_drop_releases_last_preview() {
        let store = PreviewStore::new();
        let mut result = ResultState::default();
        result.replace_preview(|| store.create(vec![1], None, OutputFormat::Png));
        drop(result);
        assert_eq!(store.live_count(), 0);
    }
}
