//! Digital sign-off workflow of the batch panel
//!
//! Editing -> (Release) -> Confirming -> (Confirm) -> releasing -> Editing.
//! The confirmation step always resets once the release callback returns,
//! whatever its outcome.

/// Step of the sign-off block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SignOffStep {
    #[default]
    Editing,
    Confirming,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignOff {
    reviewer: String,
    step: SignOffStep,
    releasing: bool,
}

impl SignOff {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reviewer(&self) -> &str {
        &self.reviewer
    }

    pub fn step(&self) -> SignOffStep {
        self.step
    }

    pub fn is_releasing(&self) -> bool {
        self.releasing
    }

    pub fn set_reviewer(&mut self, name: impl Into<String>) {
        self.reviewer = name.into();
    }

    /// The release control is enabled iff the trimmed reviewer name is non-empty.
    pub fn can_release(&self) -> bool {
        !self.reviewer.trim().is_empty()
    }

    /// Open the confirmation step. Returns false when the name is blank.
    pub fn request_confirmation(&mut self) -> bool {
        if !self.can_release() {
            return false;
        }
        self.step = SignOffStep::Confirming;
        true
    }

    pub fn cancel(&mut self) {
        self.step = SignOffStep::Editing;
    }

    /// Start the release; yields the trimmed reviewer name to sign with.
    pub fn confirm(&mut self) -> Option<String> {
        if self.step != SignOffStep::Confirming || self.releasing || !self.can_release() {
            return None;
        }
        self.releasing = true;
        Some(self.reviewer.trim().to_string())
    }

    /// Release callback returned, successful or not.
    pub fn finish(&mut self) {
        self.releasing = false;
        self.step = SignOffStep::Editing;
    }
}

/// Question shown in the confirmation step
pub fn confirmation_prompt(batch_id: &str) -> String {
    format!("Are you sure you want to release {}?", batch_id)
}

/// Extra warning when the batch carries exceptions
pub fn exception_warning(exception_count: usize) -> Option<String> {
    if exception_count == 0 {
        None
    } else {
        Some(format!("This batch has {} exception(s).", exception_count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_release_disabled_for_blank_names() {
        let mut signoff = SignOff::new();
        assert!(!signoff.can_release());

        signoff.set_reviewer("   ");
        assert!(!signoff.can_release());
        assert!(!signoff.request_confirmation());
        assert_eq!(signoff.step(), SignOffStep::Editing);

        signoff.set_reviewer(" J. Doe ");
        assert!(signoff.can_release());
    }

    #[test]
    fn test_confirm_yields_trimmed_name_once() {
        let mut signoff = SignOff::new();
        signoff.set_reviewer("  QA Reviewer ");

        assert!(signoff.confirm().is_none());
        assert!(signoff.request_confirmation());
        assert_eq!(signoff.confirm().as_deref(), Some("QA Reviewer"));
        assert!(signoff.is_releasing());
        assert!(signoff.confirm().is_none());
    }

    #[test]
    fn test_finish_resets_regardless_of_outcome() {
        let mut signoff = SignOff::new();
        signoff.set_reviewer("QA");
        signoff.request_confirmation();
        signoff.confirm();

        signoff.finish();
        assert_eq!(signoff.step(), SignOffStep::Editing);
        assert!(!signoff.is_releasing());
        assert_eq!(signoff.reviewer(), "QA");
    }

    #[test]
    fn test_cancel_returns_to_editing() {
        let mut signoff = SignOff::new();
        signoff.set_reviewer("QA");
        signoff.request_confirmation();
        signoff.cancel();
        assert_eq!(signoff.step(), SignOffStep::Editing);
    }

    #[test]
    fn test_confirmation_text() {
        assert_eq!(confirmation_prompt("STL-9"), "Are you sure you want to release STL-9?");
        assert_eq!(exception_warning(0), None);
        assert_eq!(exception_warning(2).as_deref(), Some("This batch has 2 exception(s)."));
    }
}
