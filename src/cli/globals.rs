use crate::{
    app_lib::{ApiClient, AppConfig, config::ConfigOverrides},
    features::AppContext,
};
use anyhow::{Context, Result};
use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;

/// Connection settings shared by every subcommand.
#[derive(Debug, Clone)]
pub struct GlobalArgs {
    pub api_url: String,
    pub cookie: Option<SecretString>,
    pub timeout_seconds: Option<u64>,
    pub export_cookie: bool,
}

impl GlobalArgs {
    #[must_use]
    pub fn new(api_url: String) -> Self {
        Self {
            api_url,
            cookie: None,
            timeout_seconds: None,
            export_cookie: false,
        }
    }

    #[must_use]
    pub fn with_cookie(mut self, cookie: Option<String>) -> Self {
        self.cookie = cookie.map(SecretString::from);
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout_seconds: Option<u64>) -> Self {
        self.timeout_seconds = timeout_seconds;
        self
    }

    #[must_use]
    pub fn with_export_cookie(mut self, export_cookie: bool) -> Self {
        self.export_cookie = export_cookie;
        self
    }

    /// Resolves the config and builds the client and an empty auth state.
    ///
    /// # Errors
    /// Returns an error if the API URL is invalid or the HTTP client cannot be built.
    pub fn connect(&self) -> Result<Session> {
        let mut config = AppConfig::new(&self.api_url).context("invalid --api-url")?;
        config.apply_overrides(ConfigOverrides::new(
            self.cookie.as_ref().map(ExposeSecret::expose_secret),
            self.timeout_seconds,
        ));

        let api = ApiClient::new(&config).context("failed to build API client")?;
        let ctx = AppContext::new(Arc::new(api.clone()));

        Ok(Session {
            ctx,
            api,
            export_cookie: self.export_cookie,
        })
    }
}

/// One CLI invocation's client session.
pub struct Session {
    pub ctx: AppContext,
    api: ApiClient,
    export_cookie: bool,
}

impl Session {
    /// Prints the cookie header when requested so the next run can resume the session.
    pub fn finish(&self) {
        if !self.export_cookie {
            return;
        }
        match self.api.cookie_header() {
            Some(cookie) => println!("cookie: {}", cookie.expose_secret()),
            None => eprintln!("no session cookie to export"),
        }
    }
}
