//! Infra error wrapper and conversions from transport errors

use worklens_domain::WorkLensError;

/// Newtype so infra can own `From` conversions for foreign error types
#[derive(Debug)]
pub struct InfraError(pub WorkLensError);

impl From<reqwest::Error> for InfraError {
    fn from(err: reqwest::Error) -> Self {
        let message = format!("http error: {err}");
        if err.is_timeout() || err.is_connect() || err.is_request() {
            InfraError(WorkLensError::Network(message))
        } else if err.is_decode() {
            InfraError(WorkLensError::Internal(message))
        } else {
            InfraError(WorkLensError::Network(message))
        }
    }
}

impl From<InfraError> for WorkLensError {
    fn from(err: InfraError) -> Self {
        err.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infra_error_unwraps_to_domain() {
        let err = InfraError(WorkLensError::Network("down".into()));
        let domain: WorkLensError = err.into();
        assert!(matches!(domain, WorkLensError::Network(_)));
    }
}
