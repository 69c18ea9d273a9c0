use thiserror::Error;

/// Failures of the filter → aggregate pipeline.
///
/// An empty selection and an undefined ticket average are *not* errors; they
/// are represented in the report itself.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReportError {
    /// The date interval is incomplete or reversed.
    #[error("invalid filter criteria: {0}")]
    InvalidCriteria(String),
}
