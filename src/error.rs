use thiserror::Error;

/// Boxed error returned by occlusion backends.
pub type OracleError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors produced by an exposure analysis.
///
/// `Validation` is raised before any computation starts. `Run` and
/// `Cancelled` abort a run that was already in flight; in every case no
/// report is produced.
#[derive(Debug, Error)]
pub enum ExposureError {
    #[error("invalid analysis input: {0}")]
    Validation(String),

    #[error(
        "occlusion query failed for {building} floor {floor} unit {unit} at hour {hour:.2}"
    )]
    Run {
        building: String,
        floor: usize,
        unit: usize,
        hour: f64,
        #[source]
        source: OracleError,
    },

    #[error("analysis was cancelled")]
    Cancelled,
}

impl ExposureError {
    pub(crate) fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_run_error_keeps_source() {
        let err = ExposureError::Run {
            building: "A".to_string(),
            floor: 2,
            unit: 1,
            hour: 9.5,
            source: "backend offline".into(),
        };
        assert_eq!(
            err.to_string(),
            "occlusion query failed for A floor 2 unit 1 at hour 9.50"
        );
        assert_eq!(err.source().unwrap().to_string(), "backend offline");
    }

    #[test]
    fn test_validation_message() {
        let err = ExposureError::validation("no target buildings");
        assert_eq!(err.to_string(), "invalid analysis input: no target buildings");
    }
}
