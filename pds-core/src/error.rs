use thiserror::Error;

/// Errors reported by the sampler.
///
/// Rejected candidates are not errors; they are absorbed by the sampling
/// loop. The only failure is a configuration that cannot describe a
/// sampling run, and it is caught before anything is allocated.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SampleError {
    #[error("invalid configuration: `{field}` {reason}")]
    InvalidConfiguration {
        field: &'static str,
        reason: String,
    },
}

impl SampleError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        SampleError::InvalidConfiguration {
            field,
            reason: reason.into(),
        }
    }
}
