use crate::config::DEFAULT_MAX_UPLOAD_BYTES;
use crate::i18n::Language;
use base64::Engine;
use bytes::Bytes;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum IntakeError {
    #[error("Invalid file type: {0}")]
    InvalidType(String),
    #[error("File too large: {size_bytes} bytes (limit {max_bytes})")]
    TooLarge { size_bytes: usize, max_bytes: usize },
}

impl IntakeError {
    pub fn user_message(&self, language: Language) -> &'static str {
        let t = language.translations();
        match self {
            IntakeError::InvalidType(_) => t.invalid_file_type,
            IntakeError::TooLarge { .. } => t.file_too_large,
        }
    }
}

/// An image the user picked, exactly as it was handed over.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedImage {
    pub bytes: Bytes,
    pub mime_type: String,
    pub file_name: Option<String>,
}

impl SelectedImage {
    pub fn new(bytes: impl Into<Bytes>, mime_type: impl Into<String>) -> Self {
        Self {
            bytes: bytes.into(),
            mime_type: mime_type.into(),
            file_name: None,
        }
    }

    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    /// Local-only `data:` URL for showing the image back to the user.
    pub fn to_data_url(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.mime_type,
            base64::engine::general_purpose::STANDARD.encode(&self.bytes)
        )
    }
}

/// Upload control state: the accepted file, its preview and the drop-zone highlight.
#[derive(Debug, Clone)]
pub struct ImageIntake {
    max_bytes: usize,
    drag_over: bool,
    accepted: Option<SelectedImage>,
    preview: Option<String>,
    error: Option<IntakeError>,
}

impl Default for ImageIntake {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_UPLOAD_BYTES)
    }
}

impl ImageIntake {
    pub fn new(max_bytes: usize) -> Self {
        Self {
            max_bytes,
            drag_over: false,
            accepted: None,
            preview: None,
            error: None,
        }
    }

    pub fn validate(&self, candidate: &SelectedImage) -> Result<(), IntakeError> {
        if candidate.size() > self.max_bytes {
            return Err(IntakeError::TooLarge {
                size_bytes: candidate.size(),
                max_bytes: self.max_bytes,
            });
        }
        if !candidate.mime_type.starts_with("image/") {
            return Err(IntakeError::InvalidType(candidate.mime_type.clone()));
        }
        Ok(())
    }

    /// Runs validation and, on success, returns the file for the caller.
    /// A rejection is kept in `error()` and nothing is returned.
    pub fn select(&mut self, candidate: SelectedImage) -> Option<SelectedImage> {
        if let Err(e) = self.validate(&candidate) {
            tracing::warn!("Rejected upload: {}", e);
            self.error = Some(e);
            return None;
        }

        self.error = None;
        self.preview = Some(candidate.to_data_url());
        self.accepted = Some(candidate.clone());
        Some(candidate)
    }

    pub fn drop(&mut self, candidate: SelectedImage) -> Option<SelectedImage> {
        self.drag_over = false;
        self.select(candidate)
    }

    pub fn drag_over(&mut self) {
        self.drag_over = true;
    }

    pub fn drag_leave(&mut self) {
        self.drag_over = false;
    }

    pub fn clear(&mut self) {
        self.accepted = None;
        self.preview = None;
        self.error = None;
    }

    pub fn is_drag_over(&self) -> bool {
        self.drag_over
    }

    pub fn accepted(&self) -> Option<&SelectedImage> {
        self.accepted.as_ref()
    }

    pub fn preview(&self) -> Option<&str> {
        self.preview.as_deref()
    }

    pub fn error(&self) -> Option<&IntakeError> {
        self.error.as_ref()
    }

    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_HEADER: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];

    #[test]
    fn test_rejects_non_image_types() {
        let mut intake = ImageIntake::default();
        for mime in ["application/pdf", "text/plain", "", "video/mp4", "imagex/png"] {
            let emitted = intake.select(SelectedImage::new(PNG_HEADER.to_vec(), mime));
            assert!(emitted.is_none(), "{} should be rejected", mime);
            assert!(matches!(intake.error(), Some(IntakeError::InvalidType(_))));
            assert!(intake.accepted().is_none());
            assert!(intake.preview().is_none());
        }
    }

    #[test]
    fn test_rejects_oversize_regardless_of_type() {
        let mut intake = ImageIntake::default();
        let big = vec![0u8; 10 * 1024 * 1024 + 1];

        for mime in ["image/png", "application/zip"] {
            let emitted = intake.select(SelectedImage::new(big.clone(), mime));
            assert!(emitted.is_none());
            assert!(matches!(intake.error(), Some(IntakeError::TooLarge { .. })));
        }
    }

    #[test]
    fn test_accepts_exactly_at_ceiling() {
        let mut intake = ImageIntake::new(16);
        let emitted = intake.select(SelectedImage::new(vec![1u8; 16], "image/jpeg"));
        assert!(emitted.is_some());
        assert!(intake.error().is_none());
    }

    #[test]
    fn test_accepted_file_is_unchanged_and_previewed() {
        let mut intake = ImageIntake::default();
        let candidate = SelectedImage::new(PNG_HEADER.to_vec(), "image/png").with_file_name("scan.png");

        let emitted = intake.select(candidate.clone()).expect("png should be accepted");

        assert_eq!(emitted, candidate);
        assert_eq!(emitted.bytes.as_ref(), PNG_HEADER);
        assert_eq!(intake.accepted(), Some(&candidate));
        assert_eq!(intake.preview(), Some("data:image/png;base64,iVBORw0KGgo="));
    }

    #[test]
    fn test_accepting_clears_previous_rejection() {
        let mut intake = ImageIntake::default();
        intake.select(SelectedImage::new(vec![1], "text/plain"));
        assert!(intake.error().is_some());

        intake.select(SelectedImage::new(vec![1], "image/gif"));
        assert!(intake.error().is_none());
    }

    #[test]
    fn test_drag_toggles_and_drop_validates() {
        let mut intake = ImageIntake::default();
        intake.drag_over();
        assert!(intake.is_drag_over());
        intake.drag_leave();
        assert!(!intake.is_drag_over());

        intake.drag_over();
        let emitted = intake.drop(SelectedImage::new(vec![1, 2, 3], "text/csv"));
        assert!(emitted.is_none());
        assert!(!intake.is_drag_over());
        assert!(intake.error().is_some());
    }

    #[test]
    fn test_clear_resets_file_and_preview() {
        let mut intake = ImageIntake::default();
        intake.select(SelectedImage::new(PNG_HEADER.to_vec(), "image/png"));
        intake.clear();

        assert!(intake.accepted().is_none());
        assert!(intake.preview().is_none());
        assert!(intake.error().is_none());
    }

    #[test]
    fn test_user_message_is_localized() {
        let err = IntakeError::InvalidType("text/plain".into());
        assert_eq!(
            err.user_message(Language::En),
            "Invalid file type. Please select an image file."
        );
        assert_ne!(err.user_message(Language::Fr), err.user_message(Language::En));
    }
}
