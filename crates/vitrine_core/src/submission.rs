//! Submission gate results.

use crate::FieldProblem;
use serde::{Serialize, Serializer};

/// Why the draft cannot currently be submitted, in decreasing priority.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum BlockReason {
    /// At least one upload is in flight
    #[display("uploads in progress")]
    UploadsInProgress,
    /// At least one selected file has not been uploaded
    #[display("unuploaded images pending")]
    PendingUploads,
    /// At least one remote delete is in flight
    #[display("image removal in progress")]
    RemovalInProgress,
    /// A product field is missing or invalid
    #[display("{}", _0)]
    Field(FieldProblem),
}

/// Result of evaluating the submission gate.
///
/// # Examples
///
/// ```
/// use vitrine_core::{BlockReason, SubmissionState};
///
/// let state = SubmissionState::blocked(BlockReason::UploadsInProgress);
/// assert!(!state.can_submit);
/// assert_eq!(state.reason_text().as_deref(), Some("uploads in progress"));
/// assert_eq!(state.label(), "Uploading images…");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmissionState {
    /// Whether the save action is permitted
    pub can_submit: bool,
    /// Blocking reason, if any
    #[serde(serialize_with = "serialize_reason")]
    pub reason: Option<BlockReason>,
}

fn serialize_reason<S>(reason: &Option<BlockReason>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    reason
        .as_ref()
        .map(ToString::to_string)
        .serialize(serializer)
}

impl SubmissionState {
    /// Nothing blocks submission.
    pub fn ready() -> Self {
        Self {
            can_submit: true,
            reason: None,
        }
    }

    /// Submission is blocked for the given reason.
    pub fn blocked(reason: BlockReason) -> Self {
        Self {
            can_submit: false,
            reason: Some(reason),
        }
    }

    /// Blocking reason as text.
    pub fn reason_text(&self) -> Option<String> {
        self.reason.as_ref().map(ToString::to_string)
    }

    /// Label for the save button.
    pub fn label(&self) -> &'static str {
        match &self.reason {
            None => "Save product",
            Some(BlockReason::UploadsInProgress) => "Uploading images…",
            Some(BlockReason::PendingUploads) => "Upload pending images",
            Some(BlockReason::RemovalInProgress) => "Removing image…",
            Some(BlockReason::Field(_)) => "Complete required fields",
        }
    }
}

impl Default for SubmissionState {
    fn default() -> Self {
        Self::ready()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_reason_as_text() {
        let blocked = SubmissionState::blocked(BlockReason::PendingUploads);
        let json = serde_json::to_value(&blocked).unwrap();
        assert_eq!(json["can_submit"], false);
        assert_eq!(json["reason"], "unuploaded images pending");

        let ready = serde_json::to_value(SubmissionState::ready()).unwrap();
        assert!(ready["reason"].is_null());
    }

    #[test]
    fn test_field_reason_label() {
        let state = SubmissionState::blocked(BlockReason::Field(FieldProblem::MissingName));
        assert_eq!(state.label(), "Complete required fields");
        assert_eq!(state.reason_text().as_deref(), Some("product name is required"));
    }
}
