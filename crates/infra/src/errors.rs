//! Conversions from external infrastructure errors into domain errors.

use reqwest::Error as HttpError;
use reqwest::StatusCode;
use serde_json::Error as JsonError;
use slotwise_domain::SlotwiseError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub SlotwiseError);

impl From<InfraError> for SlotwiseError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<SlotwiseError> for InfraError {
    fn from(value: SlotwiseError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoSlotwiseError {
    fn into_slotwise(self) -> SlotwiseError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → SlotwiseError */
/* -------------------------------------------------------------------------- */

impl IntoSlotwiseError for HttpError {
    fn into_slotwise(self) -> SlotwiseError {
        if self.is_timeout() {
            return SlotwiseError::Provider("HTTP request timed out".into());
        }

        if self.is_connect() {
            return SlotwiseError::Provider("HTTP connection failure".into());
        }

        if self.is_decode() {
            return SlotwiseError::Provider(format!("failed to decode provider response: {self}"));
        }

        SlotwiseError::Provider(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_slotwise())
    }
}

/* -------------------------------------------------------------------------- */
/* serde_json::Error → SlotwiseError */
/* -------------------------------------------------------------------------- */

impl IntoSlotwiseError for JsonError {
    fn into_slotwise(self) -> SlotwiseError {
        SlotwiseError::Provider(format!("malformed provider payload: {self}"))
    }
}

impl From<JsonError> for InfraError {
    fn from(value: JsonError) -> Self {
        InfraError(value.into_slotwise())
    }
}

/* -------------------------------------------------------------------------- */
/* HTTP status → SlotwiseError */
/* -------------------------------------------------------------------------- */

/// Reason strings the provider uses for quota/rate 403s, as opposed to
/// genuine permission failures on the same status code.
const RATE_LIMIT_REASONS: [&str; 3] =
    ["rateLimitExceeded", "userRateLimitExceeded", "quotaExceeded"];

fn is_rate_limited(body: &str) -> bool {
    RATE_LIMIT_REASONS.iter().any(|reason| body.contains(reason))
}

/// Map a non-success provider status to the domain taxonomy.
///
/// 401 is handled by the caller (it triggers the one refresh-and-retry before
/// becoming `AuthExpired`); 404 and 410 on event-targeted calls both mean the
/// event is gone, which keeps delete idempotent from the caller's view. 403
/// is split on the body: a rate-limit reason is a transient `Provider` fault,
/// anything else is a request the caller is not allowed to make.
pub fn status_to_error(status: StatusCode, context: &str, body: &str) -> SlotwiseError {
    let message = format!("{context}: HTTP {} - {body}", status.as_u16());

    match status {
        StatusCode::UNAUTHORIZED => SlotwiseError::AuthExpired(message),
        StatusCode::NOT_FOUND | StatusCode::GONE => SlotwiseError::EventNotFound(message),
        StatusCode::FORBIDDEN if is_rate_limited(body) => SlotwiseError::Provider(message),
        StatusCode::TOO_MANY_REQUESTS => SlotwiseError::Provider(message),
        status if status.is_client_error() => SlotwiseError::InvalidInput(message),
        _ => SlotwiseError::Provider(message),
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
