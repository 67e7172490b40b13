use thiserror::Error;

/// Failure reported by the upload collaborator for a single bundle
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{reason}")]
pub struct UploadError {
    pub reason: String,
}

impl UploadError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmitError {
    #[error("Please upload a signature image before submitting")]
    MissingSignatureImage,

    #[error("Please place at least one signature before submitting")]
    NoPlacements,

    /// The run stopped at the `attempt`-th bundle (1-based); `submitted`
    /// bundles had already been accepted and are not rolled back
    #[error("Upload {attempt} failed after {submitted} signature(s) were submitted: {reason}")]
    Upload {
        attempt: usize,
        submitted: usize,
        reason: String,
    },
}

impl SubmitError {
    /// Whether the run was refused before any upload was attempted
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            SubmitError::MissingSignatureImage | SubmitError::NoPlacements
        )
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Default signature width {0} is outside 0.05..=0.30")]
    Width(f64),

    #[error("Default signature height {0} is outside 0.03..=0.20")]
    Height(f64),

    #[error("Handle tolerance {0} must be positive and below 0.5")]
    HandleTolerance(f64),
}
