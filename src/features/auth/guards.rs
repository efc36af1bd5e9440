//! Route evaluation: decides whether a page may render for the current caller.

use crate::{
    features::{
        auth::{
            bootstrap::{self, BootstrapOutcome, Guard, RouteDecision},
            token::SessionToken,
        },
        context::AppContext,
    },
    routes::{GuardClass, Route, RouteError},
};
use tracing::{Instrument, debug, info_span};

/// Evaluates a typed route. Public routes render without any call; protected
/// routes run the bootstrap pipeline and adopt the issued token into the auth
/// state so the page can use the loaded user.
pub async fn guard_route(ctx: &AppContext, route: &Route) -> RouteDecision {
    let guard = match route.guard() {
        GuardClass::Public => return RouteDecision::Render { token: None },
        GuardClass::Session => Guard::Session,
        GuardClass::Admin => Guard::Admin,
    };

    let span = info_span!("route.guard", route = %route.path(), ?guard);
    async move {
        match bootstrap::evaluate(ctx.backend(), guard).await {
            RouteDecision::Render { token: Some(token) } => adopt(ctx, guard, token).await,
            RouteDecision::Redirect(Route::Login) => {
                ctx.auth().clear(ctx.backend());
                RouteDecision::Redirect(Route::Login)
            }
            decision => decision,
        }
    }
    .instrument(span)
    .await
}

/// Parses and evaluates a raw application path.
///
/// # Errors
/// Returns `RouteError::NotFound` for unknown paths. Pages with an unusable
/// query resolve to their redirect instead of an error.
pub async fn guard_path(ctx: &AppContext, raw: &str) -> Result<RouteDecision, RouteError> {
    match Route::parse(raw) {
        Ok(route) => Ok(guard_route(ctx, &route).await),
        Err(RouteError::InvalidQuery { redirect }) => Ok(RouteDecision::Redirect(*redirect)),
        Err(err) => Err(err),
    }
}

async fn adopt(ctx: &AppContext, guard: Guard, token: SessionToken) -> RouteDecision {
    let auth = ctx.auth();
    if auth.token().as_ref() == Some(&token) && auth.user().is_some() {
        ctx.backend().attach_bearer(&token);
        return RouteDecision::Render { token: Some(token) };
    }

    match auth.establish(ctx.backend(), token.clone()).await {
        Ok(_) => RouteDecision::Render { token: Some(token) },
        Err(err) => {
            debug!(error = %err, "user info unavailable for issued token");
            guard.decide(BootstrapOutcome::Error(err))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        app_lib::{ApiError, Exchange},
        features::{
            auth::types::{AdminAccessResponse, TokenResponse},
            testing::{FakeBackend, http_error, sample_user},
            users::types::Role,
        },
    };
    use std::sync::Arc;

    fn token_ok(raw: &str) -> Result<Exchange<TokenResponse>, ApiError> {
        Ok(Exchange::Body(TokenResponse {
            success: true,
            access_token: Some(raw.to_string()),
        }))
    }

    fn context(backend: FakeBackend) -> (AppContext, Arc<FakeBackend>) {
        let backend = Arc::new(backend);
        (AppContext::new(backend.clone()), backend)
    }

    #[tokio::test]
    async fn public_routes_make_no_calls() {
        let (ctx, backend) = context(FakeBackend::default());
        let decision = guard_route(&ctx, &Route::Login).await;
        assert_eq!(decision, RouteDecision::Render { token: None });
        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn session_route_loads_user_once() {
        let (ctx, backend) = context(
            FakeBackend::default()
                .with_token(token_ok("t1"))
                .with_user_info(Ok(sample_user("u1", Role::User))),
        );

        let first = guard_route(&ctx, &Route::Home).await;
        let second = guard_route(&ctx, &Route::Home).await;

        assert_eq!(first, second);
        assert!(ctx.auth().is_authenticated());
        assert_eq!(backend.bearer(), Some("t1".to_string()));
        assert_eq!(
            backend.calls(),
            vec!["issue_token", "user_info:t1", "issue_token"]
        );
    }

    #[tokio::test]
    async fn expired_session_clears_state_and_redirects_to_login() {
        let (ctx, backend) = context(FakeBackend::default().with_token(Ok(Exchange::Empty)));
        ctx.auth().set_token(SessionToken::new("stale".to_string()));
        ctx.auth().set_user(Some(sample_user("u1", Role::User)));

        let decision = guard_route(&ctx, &Route::Home).await;

        assert_eq!(decision, RouteDecision::Redirect(Route::Login));
        assert!(ctx.auth().token().is_none());
        assert!(ctx.auth().user().is_none());
        assert!(backend.bearer().is_none());
    }

    #[tokio::test]
    async fn user_fetch_failure_on_admin_route_redirects_home() {
        let (ctx, _backend) = context(
            FakeBackend::default()
                .with_token(token_ok("t1"))
                .with_admin_access(Ok(Exchange::Body(AdminAccessResponse {
                    success: true,
                    has_access: true,
                })))
                .with_user_info(Err(http_error(500, None))),
        );

        let decision = guard_route(&ctx, &Route::AdminUsers).await;

        assert_eq!(decision, RouteDecision::Redirect(Route::Home));
        assert!(!ctx.auth().is_authenticated());
    }

    #[tokio::test]
    async fn guard_path_handles_bad_queries_and_unknown_paths() {
        let (ctx, backend) = context(FakeBackend::default());

        let decision = guard_path(&ctx, "/auth/verify-otp?token=abc").await;
        assert_eq!(decision, Ok(RouteDecision::Redirect(Route::Home)));

        let missing = guard_path(&ctx, "/nowhere").await;
        assert!(matches!(missing, Err(RouteError::NotFound(_))));
        assert!(backend.calls().is_empty());
    }
}
