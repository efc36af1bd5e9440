use std::fmt;

/// Failure taxonomy for remote calls.
///
/// `Http::message` is only set when the response carried a structured error
/// body; an unparsable body leaves it empty.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ApiError {
    Config(String),
    Network(String),
    Timeout(String),
    Http {
        status: u16,
        message: Option<String>,
        code: Option<String>,
    },
    Parse(String),
    Serialization(String),
}

impl ApiError {
    /// HTTP status of the failed response, if the server answered at all.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Message from a structured error body.
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Http { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    /// Application code from a structured error body, e.g. `ACCOUNT_DELETED`.
    #[must_use]
    pub fn server_code(&self) -> Option<&str> {
        match self {
            ApiError::Http { code, .. } => code.as_deref(),
            _ => None,
        }
    }

    /// True for failures where no usable response was received.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self, ApiError::Network(_) | ApiError::Timeout(_))
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Config(message) => write!(formatter, "Config error: {message}"),
            ApiError::Network(message) => write!(formatter, "Network error: {message}"),
            ApiError::Timeout(message) => write!(formatter, "Timeout: {message}"),
            ApiError::Http {
                status, message, ..
            } => {
                let message = message.as_deref().unwrap_or("Request failed.");
                write!(formatter, "Request failed ({status}): {message}")
            }
            ApiError::Parse(message) => write!(formatter, "Response error: {message}"),
            ApiError::Serialization(message) => {
                write!(formatter, "Request error: {message}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::ApiError;

    #[test]
    fn http_display_falls_back_without_structured_body() {
        let err = ApiError::Http {
            status: 502,
            message: None,
            code: None,
        };
        assert_eq!(err.to_string(), "Request failed (502): Request failed.");
        assert_eq!(err.status(), Some(502));
        assert_eq!(err.server_message(), None);
    }

    #[test]
    fn http_exposes_structured_fields() {
        let err = ApiError::Http {
            status: 410,
            message: Some("Code expired".to_string()),
            code: Some("OTP_EXPIRED".to_string()),
        };
        assert_eq!(err.server_message(), Some("Code expired"));
        assert_eq!(err.server_code(), Some("OTP_EXPIRED"));
        assert!(!err.is_transport());
    }

    #[test]
    fn transport_errors_have_no_status() {
        let err = ApiError::Timeout("Request timed out.".to_string());
        assert!(err.is_transport());
        assert_eq!(err.status(), None);
    }
}
