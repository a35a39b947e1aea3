//! Negative status codes returned by the action gateway.

/// Status codes the gateway reports in place of a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorCode {
    Internal = -1,
    Args = -2,
    Again = -3,
    RateLimit = -4,
    Failed = -5,
    TooManyIps = -6,
    AccessDenied = -7,
    Exist = -8,
    /// Also what `us` answers for a wrong email/password pair.
    NotExist = -9,
    Circular = -10,
    AccessViolation = -11,
    AppKey = -12,
    Expired = -13,
    NotConfirmed = -14,
    Blocked = -15,
    OverQuota = -16,
    TempUnavail = -17,
    TooManyConnections = -18,
    Unknown = -9999,
}

const KNOWN: [ApiErrorCode; 18] = [
    ApiErrorCode::Internal,
    ApiErrorCode::Args,
    ApiErrorCode::Again,
    ApiErrorCode::RateLimit,
    ApiErrorCode::Failed,
    ApiErrorCode::TooManyIps,
    ApiErrorCode::AccessDenied,
    ApiErrorCode::Exist,
    ApiErrorCode::NotExist,
    ApiErrorCode::Circular,
    ApiErrorCode::AccessViolation,
    ApiErrorCode::AppKey,
    ApiErrorCode::Expired,
    ApiErrorCode::NotConfirmed,
    ApiErrorCode::Blocked,
    ApiErrorCode::OverQuota,
    ApiErrorCode::TempUnavail,
    ApiErrorCode::TooManyConnections,
];

impl From<i64> for ApiErrorCode {
    fn from(code: i64) -> Self {
        KNOWN
            .iter()
            .copied()
            .find(|known| known.code() == code)
            .unwrap_or(ApiErrorCode::Unknown)
    }
}

impl ApiErrorCode {
    /// Numeric code as sent by the service.
    pub fn code(&self) -> i64 {
        *self as i64
    }

    /// Whether the same request could succeed later without changes.
    ///
    /// The client never retries on its own; this only feeds user-facing hints.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            ApiErrorCode::Again
                | ApiErrorCode::RateLimit
                | ApiErrorCode::TempUnavail
                | ApiErrorCode::TooManyConnections
        )
    }

    /// Get human-readable description of the error.
    pub fn description(&self) -> &'static str {
        match self {
            ApiErrorCode::Internal => "Internal error",
            ApiErrorCode::Args => "Invalid arguments",
            ApiErrorCode::Again => "Try again",
            ApiErrorCode::RateLimit => "Rate limit exceeded",
            ApiErrorCode::Failed => "Upload failed",
            ApiErrorCode::TooManyIps => "Too many IPs",
            ApiErrorCode::AccessDenied => "Access denied",
            ApiErrorCode::Exist => "Resource already exists",
            ApiErrorCode::NotExist => "Resource does not exist",
            ApiErrorCode::Circular => "Circular linking",
            ApiErrorCode::AccessViolation => "Access violation",
            ApiErrorCode::AppKey => "Application key required",
            ApiErrorCode::Expired => "Session expired",
            ApiErrorCode::NotConfirmed => "Not confirmed",
            ApiErrorCode::Blocked => "Resource blocked",
            ApiErrorCode::OverQuota => "Over quota",
            ApiErrorCode::TempUnavail => "Temporarily unavailable",
            ApiErrorCode::TooManyConnections => "Too many connections",
            ApiErrorCode::Unknown => "Unknown error",
        }
    }
}
