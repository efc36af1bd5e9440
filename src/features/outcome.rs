//! What a flow hands back to its caller: an optional transient notice and an
//! optional navigation target. Flows never return transport errors; those are
//! logged here and swallowed.

use crate::{app_lib::ApiError, routes::Route};
use std::fmt;
use tracing::warn;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

/// Transient user notification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.level {
            NoticeLevel::Success => write!(formatter, "{}", self.message),
            NoticeLevel::Error => write!(formatter, "error: {}", self.message),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FlowOutcome {
    pub notice: Option<Notice>,
    pub navigate: Option<Route>,
}

impl FlowOutcome {
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn navigate(route: Route) -> Self {
        Self {
            notice: None,
            navigate: Some(route),
        }
    }

    #[must_use]
    pub fn notice(notice: Notice) -> Self {
        Self {
            notice: Some(notice),
            navigate: None,
        }
    }

    #[must_use]
    pub fn with_notice(mut self, notice: Notice) -> Self {
        self.notice = Some(notice);
        self
    }

    #[must_use]
    pub fn with_navigation(mut self, route: Route) -> Self {
        self.navigate = Some(route);
        self
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        self.notice
            .as_ref()
            .is_some_and(|notice| notice.level == NoticeLevel::Error)
    }
}

/// Statuses whose structured error message a flow shows to the user.
pub(crate) enum Surface<'a> {
    Statuses(&'a [u16]),
    Any,
}

/// Turns a failed call into a notice when the error body is structured and the
/// status is allowed; everything else is logged and dropped.
pub(crate) fn surface_error(operation: &str, err: &ApiError, surface: Surface<'_>) -> Option<Notice> {
    let allowed = match (surface, err.status()) {
        (Surface::Any, Some(_)) => true,
        (Surface::Statuses(statuses), Some(status)) => statuses.contains(&status),
        (_, None) => false,
    };

    match err.server_message() {
        Some(message) if allowed => Some(Notice::error(message)),
        _ => {
            warn!(operation, error = %err, "request failed");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn http(status: u16, message: Option<&str>) -> ApiError {
        ApiError::Http {
            status,
            message: message.map(str::to_string),
            code: None,
        }
    }

    #[test]
    fn surface_error_respects_allowed_statuses() {
        let err = http(400, Some("Invalid credentials"));
        assert_eq!(
            surface_error("login", &err, Surface::Statuses(&[400, 401])),
            Some(Notice::error("Invalid credentials"))
        );
        assert_eq!(
            surface_error("login", &http(500, Some("boom")), Surface::Statuses(&[400])),
            None
        );
    }

    #[test]
    fn surface_error_drops_unstructured_and_transport_errors() {
        assert_eq!(surface_error("x", &http(400, None), Surface::Any), None);
        let err = ApiError::Network("down".to_string());
        assert_eq!(surface_error("x", &err, Surface::Any), None);
    }

    #[test]
    fn outcome_builders() {
        let outcome = FlowOutcome::navigate(Route::Login).with_notice(Notice::error("bad"));
        assert!(outcome.is_error());
        assert_eq!(outcome.navigate, Some(Route::Login));
        assert!(!FlowOutcome::none().is_error());
    }
}
