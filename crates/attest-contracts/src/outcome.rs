//! Verification outcome records.
//!
//! The verifier's entry points return `VerifyResult<bool>`. Callers that
//! want a value they can store in a report or print as JSON convert it into
//! a `VerificationOutcome`.

use serde::Serialize;

use crate::error::VerificationError;

/// The result of one verification call.
///
/// `passed` is true only when `error` is `None`. Produced fresh per call and
/// never persisted by this workspace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerificationOutcome {
    pub passed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<VerificationError>,
}

impl VerificationOutcome {
    pub fn passed() -> Self {
        Self {
            passed: true,
            error: None,
        }
    }

    pub fn failed(error: VerificationError) -> Self {
        Self {
            passed: false,
            error: Some(error),
        }
    }
}

impl From<Result<bool, VerificationError>> for VerificationOutcome {
    fn from(result: Result<bool, VerificationError>) -> Self {
        match result {
            Ok(true) => Self::passed(),
            // The entry points never return Ok(false); keep it as a failure
            // without a classified error rather than reporting success.
            Ok(false) => Self {
                passed: false,
                error: None,
            },
            Err(e) => Self::failed(e),
        }
    }
}
