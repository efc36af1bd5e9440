use secrecy::{ExposeSecret, SecretString};

/// Short-lived bearer credential. Memory only, never logged.
#[derive(Clone, Debug)]
pub struct SessionToken(SecretString);

impl SessionToken {
    /// Wraps a raw token, rejecting empty values.
    #[must_use]
    pub fn new(raw: String) -> Option<Self> {
        if raw.trim().is_empty() {
            None
        } else {
            Some(Self(SecretString::from(raw)))
        }
    }

    #[must_use]
    pub fn as_secret(&self) -> &SecretString {
        &self.0
    }

    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl PartialEq for SessionToken {
    fn eq(&self, other: &Self) -> bool {
        self.expose() == other.expose()
    }
}

impl Eq for SessionToken {}

#[cfg(test)]
mod tests {
    use super::SessionToken;

    #[test]
    fn rejects_blank_tokens() {
        assert!(SessionToken::new(String::new()).is_none());
        assert!(SessionToken::new("  ".to_string()).is_none());
    }

    #[test]
    fn debug_does_not_leak() {
        let token = SessionToken::new("secret-token".to_string());
        assert!(token.is_some_and(|token| !format!("{token:?}").contains("secret-token")));
    }
}
