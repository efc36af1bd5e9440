//! Session bootstrap pipeline run before a protected route renders.
//!
//! Each stage returns a `BootstrapOutcome`; only `Authenticated` lets the next
//! stage run. The guard then maps the final outcome to a `RouteDecision`.
//! Nothing is retried: a failed evaluation redirects and the next evaluation
//! starts from the token exchange again.

use crate::{
    app_lib::{ApiError, Exchange},
    features::{
        auth::{
            token::SessionToken,
            types::{TokenResponse, non_empty},
        },
        backend::Backend,
    },
    routes::Route,
};
use tracing::debug;

/// Which check a protected route requires.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Guard {
    Session,
    Admin,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BootstrapOutcome {
    Authenticated(SessionToken),
    Unauthenticated,
    Forbidden,
    Error(ApiError),
}

/// Result of evaluating a route.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RouteDecision {
    /// The page may render; carries the bearer token when one was issued.
    Render { token: Option<SessionToken> },
    Redirect(Route),
}

impl Guard {
    /// Maps a pipeline outcome to a routing decision.
    #[must_use]
    pub fn decide(self, outcome: BootstrapOutcome) -> RouteDecision {
        match outcome {
            BootstrapOutcome::Authenticated(token) => RouteDecision::Render { token: Some(token) },
            BootstrapOutcome::Unauthenticated => RouteDecision::Redirect(Route::Login),
            BootstrapOutcome::Forbidden => RouteDecision::Redirect(Route::Home),
            BootstrapOutcome::Error(_) => match self {
                Guard::Session => RouteDecision::Redirect(Route::Login),
                Guard::Admin => RouteDecision::Redirect(Route::Home),
            },
        }
    }
}

/// Runs the pipeline for the guard: token exchange, then the admin check if needed.
pub async fn run(backend: &dyn Backend, guard: Guard) -> BootstrapOutcome {
    let outcome = exchange_token(backend).await;
    match (guard, outcome) {
        (Guard::Admin, BootstrapOutcome::Authenticated(token)) => {
            check_admin(backend, token).await
        }
        (_, outcome) => outcome,
    }
}

/// Runs the pipeline and maps it to a routing decision.
pub async fn evaluate(backend: &dyn Backend, guard: Guard) -> RouteDecision {
    let outcome = run(backend, guard).await;
    if let BootstrapOutcome::Error(err) = &outcome {
        debug!(?guard, error = %err, "session bootstrap failed");
    }
    guard.decide(outcome)
}

/// Stages 1 and 2: exchange the ambient credential and validate the body.
pub async fn exchange_token(backend: &dyn Backend) -> BootstrapOutcome {
    match backend.issue_token().await {
        Ok(exchange) => exchange
            .into_body()
            .map_or(BootstrapOutcome::Unauthenticated, token_from_response),
        Err(ApiError::Http { status, .. }) => {
            debug!(status, "token issuance rejected");
            BootstrapOutcome::Unauthenticated
        }
        Err(err) => BootstrapOutcome::Error(err),
    }
}

fn token_from_response(response: TokenResponse) -> BootstrapOutcome {
    if !response.success {
        return BootstrapOutcome::Unauthenticated;
    }
    match non_empty(response.access_token).and_then(SessionToken::new) {
        Some(token) => BootstrapOutcome::Authenticated(token),
        None => BootstrapOutcome::Unauthenticated,
    }
}

/// Stages 3 and 4: verify admin privilege for an issued token.
///
/// An empty 204 success means the session expired between the two calls and
/// sends the caller to login; any refusal sends the caller home.
pub async fn check_admin(backend: &dyn Backend, token: SessionToken) -> BootstrapOutcome {
    match backend.check_admin_access(&token).await {
        Ok(Exchange::Body(response)) if response.success && response.has_access => {
            BootstrapOutcome::Authenticated(token)
        }
        Ok(Exchange::Body(_)) => BootstrapOutcome::Forbidden,
        Ok(Exchange::Empty) => BootstrapOutcome::Unauthenticated,
        Err(ApiError::Http { status, .. }) => {
            debug!(status, "admin access denied");
            BootstrapOutcome::Forbidden
        }
        Err(err) => BootstrapOutcome::Error(err),
    }
}
