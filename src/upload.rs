//! Document upload state machine.
//!
//! Validation happens locally before any request: only `.txt` files are
//! accepted. Terminal status banners auto-hide after five seconds unless a
//! newer status supersedes them first.

use std::time::{Duration, Instant};

pub const ACCEPTED_EXTENSION: &str = ".txt";
pub const REJECTED_MESSAGE: &str = "Only .txt files are supported";

const STATUS_HIDE_DELAY: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadStatus {
    Idle,
    Uploading,
    Success,
    Error,
    Rejected,
}

pub struct UploadController {
    status: UploadStatus,
    status_message: Option<String>,
    hide_after: Option<Instant>,
    busy: bool,
}

impl UploadController {
    pub fn new() -> Self {
        Self {
            status: UploadStatus::Idle,
            status_message: None,
            hide_after: None,
            busy: false,
        }
    }

    /// True while an upload request is in flight.
    pub fn busy(&self) -> bool {
        self.busy
    }

    pub fn status(&self) -> UploadStatus {
        self.status
    }

    /// Banner text while one is visible.
    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }

    /// Validate `filename` and enter the uploading state. Returns false when
    /// the file is rejected locally or an upload is already in flight; no
    /// request may be issued in either case.
    pub fn begin_upload(&mut self, filename: &str) -> bool {
        if self.busy {
            return false;
        }
        if !filename.ends_with(ACCEPTED_EXTENSION) {
            self.set_status(UploadStatus::Rejected, REJECTED_MESSAGE.to_string());
            return false;
        }

        self.set_status(UploadStatus::Uploading, "Uploading...".to_string());
        self.busy = true;
        true
    }

    /// Resolve the in-flight upload with the server outcome. `Ok` carries
    /// the server-confirmed filename.
    pub fn finish_upload(&mut self, result: anyhow::Result<String>) {
        match result {
            Ok(filename) => {
                self.set_status(UploadStatus::Success, format!("File uploaded: {filename}"));
            }
            Err(err) => {
                self.set_status(UploadStatus::Error, format!("Upload failed: {err}"));
            }
        }
        self.busy = false;
    }

    /// Hide an expired status banner. Called on every timer tick.
    pub fn tick(&mut self, now: Instant) {
        if let Some(deadline) = self.hide_after {
            if now >= deadline {
                self.status = UploadStatus::Idle;
                self.status_message = None;
                self.hide_after = None;
            }
        }
    }

    // Uploading never expires on its own; every other status gets the
    // five-second hide deadline. Setting a status drops any older deadline.
    fn set_status(&mut self, status: UploadStatus, message: String) {
        self.status = status;
        self.status_message = Some(message);
        self.hide_after = if status == UploadStatus::Uploading {
            None
        } else {
            Some(Instant::now() + STATUS_HIDE_DELAY)
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[test]
    fn wrong_extension_is_rejected_without_a_request() {
        let mut upload = UploadController::new();

        assert!(!upload.begin_upload("notes.pdf"));
        assert_eq!(upload.status(), UploadStatus::Rejected);
        assert_eq!(upload.status_message(), Some(REJECTED_MESSAGE));
        assert!(!upload.busy());
    }

    #[test]
    fn txt_file_enters_uploading_state() {
        let mut upload = UploadController::new();

        assert!(upload.begin_upload("notes.txt"));
        assert_eq!(upload.status(), UploadStatus::Uploading);
        assert!(upload.busy());
    }

    #[test]
    fn second_upload_while_busy_is_rejected() {
        let mut upload = UploadController::new();

        assert!(upload.begin_upload("first.txt"));
        assert!(!upload.begin_upload("second.txt"));
        // The in-flight upload keeps its state.
        assert_eq!(upload.status(), UploadStatus::Uploading);
    }

    #[test]
    fn success_message_embeds_confirmed_filename() {
        let mut upload = UploadController::new();

        upload.begin_upload("notes.txt");
        upload.finish_upload(Ok("notes.txt".to_string()));

        assert_eq!(upload.status(), UploadStatus::Success);
        assert!(upload.status_message().unwrap().contains("notes.txt"));
        assert!(!upload.busy());
    }

    #[test]
    fn failure_message_embeds_server_detail() {
        let mut upload = UploadController::new();

        upload.begin_upload("notes.txt");
        upload.finish_upload(Err(anyhow!("file too large")));

        assert_eq!(upload.status(), UploadStatus::Error);
        assert!(upload.status_message().unwrap().contains("file too large"));
        assert!(!upload.busy());
    }

    #[test]
    fn terminal_status_hides_after_delay() {
        let mut upload = UploadController::new();
        upload.begin_upload("notes.txt");
        upload.finish_upload(Ok("notes.txt".to_string()));

        // Before the deadline the banner stays.
        upload.tick(Instant::now());
        assert_eq!(upload.status(), UploadStatus::Success);

        upload.tick(Instant::now() + Duration::from_secs(6));
        assert_eq!(upload.status(), UploadStatus::Idle);
        assert!(upload.status_message().is_none());
    }

    #[test]
    fn uploading_banner_never_expires_on_its_own() {
        let mut upload = UploadController::new();
        upload.begin_upload("notes.txt");

        upload.tick(Instant::now() + Duration::from_secs(60));
        assert_eq!(upload.status(), UploadStatus::Uploading);
    }

    #[test]
    fn newer_status_supersedes_pending_hide() {
        let mut upload = UploadController::new();

        // A rejection schedules a hide...
        upload.begin_upload("notes.pdf");
        // ...but a new attempt replaces it before the deadline fires.
        upload.begin_upload("notes.txt");

        upload.tick(Instant::now() + Duration::from_secs(6));
        assert_eq!(upload.status(), UploadStatus::Uploading);
    }
}
