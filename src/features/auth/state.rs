//! Client auth state: the in-memory bearer token and the mirrored user record.
//! The setters are the only mutation path; flows never reach into each other's
//! data. Initialization runs the token exchange once and exposes progress so
//! callers do not read "no user" as "logged out" before the check finishes.

use crate::{
    app_lib::ApiError,
    features::{
        auth::{
            bootstrap::{self, BootstrapOutcome},
            token::SessionToken,
        },
        backend::Backend,
        users::types::User,
    },
};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, warn};

#[derive(Default)]
struct Inner {
    token: Option<SessionToken>,
    user: Option<User>,
    loading: bool,
    check_complete: bool,
}

/// Cloneable handle to the shared auth state. Last writer wins.
#[derive(Clone, Default)]
pub struct AuthState {
    inner: Arc<RwLock<Inner>>,
}

impl AuthState {
    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    #[must_use]
    pub fn token(&self) -> Option<SessionToken> {
        self.read().token.clone()
    }

    #[must_use]
    pub fn user(&self) -> Option<User> {
        self.read().user.clone()
    }

    /// Replaces the token. No validation; callers keep token and user consistent.
    pub fn set_token(&self, token: Option<SessionToken>) {
        self.write().token = token;
    }

    /// Replaces the user. No validation; callers keep token and user consistent.
    pub fn set_user(&self, user: Option<User>) {
        self.write().user = user;
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        let inner = self.read();
        inner.token.is_some() && inner.user.is_some()
    }

    /// True while initialization is in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.read().loading
    }

    /// True once initialization has finished, whatever its result.
    #[must_use]
    pub fn is_check_complete(&self) -> bool {
        self.read().check_complete
    }

    /// Clears token and user and detaches the bearer header.
    pub fn clear(&self, backend: &dyn Backend) {
        backend.detach_bearer();
        let mut inner = self.write();
        inner.token = None;
        inner.user = None;
    }

    /// Stores a fresh session: attaches the bearer header, then loads the user.
    /// If the user cannot be loaded the token is dropped again.
    ///
    /// # Errors
    /// Returns the user-info failure after the state has been cleared.
    pub async fn establish(
        &self,
        backend: &dyn Backend,
        token: SessionToken,
    ) -> Result<User, ApiError> {
        backend.attach_bearer(&token);
        self.set_token(Some(token.clone()));

        match backend.user_info(&token).await {
            Ok(user) => {
                self.set_user(Some(user.clone()));
                Ok(user)
            }
            Err(err) => {
                self.clear(backend);
                Err(err)
            }
        }
    }

    /// Runs the one-time session check. Later calls are no-ops.
    /// Failures clear the state silently.
    pub async fn initialize(&self, backend: &dyn Backend) {
        {
            let mut inner = self.write();
            if inner.loading || inner.check_complete {
                return;
            }
            inner.loading = true;
        }

        match bootstrap::exchange_token(backend).await {
            BootstrapOutcome::Authenticated(token) => {
                if let Err(err) = self.establish(backend, token).await {
                    warn!(error = %err, "failed to load user during session check");
                }
            }
            BootstrapOutcome::Error(err) => {
                warn!(error = %err, "session check failed");
                self.clear(backend);
            }
            outcome => {
                debug!(?outcome, "no active session");
                self.clear(backend);
            }
        }

        let mut inner = self.write();
        inner.loading = false;
        inner.check_complete = true;
    }

    /// Re-fetches the canonical user record for the current token instead of
    /// patching the local copy. Keeps the old record if the fetch fails.
    pub async fn refresh_user(&self, backend: &dyn Backend) -> Option<User> {
        let token = self.token()?;
        match backend.user_info(&token).await {
            Ok(user) => {
                self.set_user(Some(user.clone()));
                Some(user)
            }
            Err(err) => {
                warn!(error = %err, "failed to refresh user");
                self.user()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        app_lib::Exchange,
        features::{
            auth::types::TokenResponse,
            testing::{FakeBackend, http_error, sample_user},
            users::types::Role,
        },
    };

    fn token_ok(raw: &str) -> Result<Exchange<TokenResponse>, ApiError> {
        Ok(Exchange::Body(TokenResponse {
            success: true,
            access_token: Some(raw.to_string()),
        }))
    }

    fn assert_invariant(state: &AuthState) {
        assert_eq!(state.token().is_some(), state.user().is_some());
    }

    #[test]
    fn starts_empty_and_incomplete() {
        let state = AuthState::default();
        assert!(state.token().is_none());
        assert!(state.user().is_none());
        assert!(!state.is_loading());
        assert!(!state.is_check_complete());
    }

    #[tokio::test]
    async fn initialize_seeds_token_and_user() {
        let backend = FakeBackend::default()
            .with_token(token_ok("t1"))
            .with_user_info(Ok(sample_user("u1", Role::User)));
        let state = AuthState::default();

        state.initialize(&backend).await;

        assert!(state.is_authenticated());
        assert_eq!(state.token().map(|t| t.expose().to_string()), Some("t1".to_string()));
        assert_eq!(state.user().map(|u| u.username), Some("user-u1".to_string()));
        assert_eq!(backend.bearer(), Some("t1".to_string()));
        assert!(state.is_check_complete());
        assert!(!state.is_loading());
    }

    #[tokio::test]
    async fn initialize_clears_on_empty_session() {
        let backend = FakeBackend::default().with_token(Ok(Exchange::Empty));
        let state = AuthState::default();
        state.set_token(SessionToken::new("stale".to_string()));

        state.initialize(&backend).await;

        assert!(state.token().is_none());
        assert!(backend.bearer().is_none());
        assert!(state.is_check_complete());
        assert_invariant(&state);
    }

    #[tokio::test]
    async fn initialize_clears_when_user_fetch_fails() {
        let backend = FakeBackend::default()
            .with_token(token_ok("t1"))
            .with_user_info(Err(http_error(401, Some("expired"))));
        let state = AuthState::default();

        state.initialize(&backend).await;

        assert!(state.token().is_none());
        assert!(backend.bearer().is_none());
        assert!(state.is_check_complete());
        assert_invariant(&state);
    }

    #[tokio::test]
    async fn initialize_clears_on_transport_error() {
        let backend =
            FakeBackend::default().with_token(Err(ApiError::Network("down".to_string())));
        let state = AuthState::default();

        state.initialize(&backend).await;

        assert!(!state.is_authenticated());
        assert!(state.is_check_complete());
    }

    #[tokio::test]
    async fn initialize_runs_once() {
        let backend = FakeBackend::default()
            .with_token(token_ok("t1"))
            .with_user_info(Ok(sample_user("u1", Role::User)));
        let state = AuthState::default();

        state.initialize(&backend).await;
        state.initialize(&backend).await;

        assert_eq!(backend.calls(), vec!["issue_token", "user_info:t1"]);
    }

    #[tokio::test]
    async fn refresh_user_replaces_record_and_keeps_it_on_failure() {
        let mut updated = sample_user("u1", Role::User);
        updated.is_two_factor_enabled = true;
        let backend = FakeBackend::default()
            .with_user_info(Ok(updated.clone()))
            .with_user_info(Err(ApiError::Network("down".to_string())));
        let state = AuthState::default();
        state.set_token(SessionToken::new("t1".to_string()));
        state.set_user(Some(sample_user("u1", Role::User)));

        assert_eq!(state.refresh_user(&backend).await, Some(updated.clone()));
        assert_eq!(state.refresh_user(&backend).await, Some(updated));
    }

    #[tokio::test]
    async fn refresh_without_token_does_nothing() {
        let backend = FakeBackend::default();
        let state = AuthState::default();
        assert_eq!(state.refresh_user(&backend).await, None);
        assert!(backend.calls().is_empty());
    }
}
