//! Identity provider configuration.
//!
//! Values come from the application (see the `ecolesson` crate's
//! `AppConfig`), not from hardcoded constants in the providers.

use std::time::Duration;

/// Default Identity Toolkit endpoint.
pub const DEFAULT_FIREBASE_ENDPOINT: &str = "https://identitytoolkit.googleapis.com/v1";

/// Firebase Authentication (Identity Toolkit REST API) configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FirebaseConfig {
    /// Web API key of the Firebase project.
    pub api_key: String,

    /// Base URL of the Identity Toolkit API.
    ///
    /// Default: [`DEFAULT_FIREBASE_ENDPOINT`]. Tests point it at a mock server.
    pub endpoint: String,

    /// Per-request timeout.
    ///
    /// Default: 10 seconds
    pub request_timeout: Duration,
}

impl FirebaseConfig {
    /// Create a configuration for the given API key.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            endpoint: DEFAULT_FIREBASE_ENDPOINT.to_string(),
            request_timeout: Duration::from_secs(10),
        }
    }

    /// Override the API endpoint.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Set the request timeout.
    #[must_use]
    pub const fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// URL of an `accounts:<method>` call.
    #[must_use]
    pub fn accounts_url(&self, method: &str) -> String {
        format!("{}/accounts:{method}", self.endpoint.trim_end_matches('/'))
    }
}

/// Credential rules enforced by the in-memory provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CredentialPolicy {
    /// Minimum password length in characters.
    ///
    /// Default: 6 (Firebase's rule)
    pub min_password_length: usize,
}

impl CredentialPolicy {
    /// Set the minimum password length.
    #[must_use]
    pub const fn with_min_password_length(mut self, length: usize) -> Self {
        self.min_password_length = length;
        self
    }

    /// Whether `email` looks like `local@domain.tld`.
    #[must_use]
    pub fn is_valid_email(email: &str) -> bool {
        let Some((local, domain)) = email.split_once('@') else {
            return false;
        };

        !local.is_empty()
            && !domain.contains('@')
            && !email.chars().any(char::is_whitespace)
            && domain
                .split_once('.')
                .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty() && !tld.ends_with('.'))
    }

    /// Whether `password` satisfies the length rule.
    #[must_use]
    pub fn is_strong_enough(&self, password: &str) -> bool {
        password.chars().count() >= self.min_password_length
    }
}

impl Default for CredentialPolicy {
    fn default() -> Self {
        Self {
            min_password_length: 6,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accounts_url_trims_trailing_slash() {
        let config = FirebaseConfig::new("key").with_endpoint("http://127.0.0.1:9099/v1/");
        assert_eq!(
            config.accounts_url("signUp"),
            "http://127.0.0.1:9099/v1/accounts:signUp"
        );
    }

    #[test]
    fn test_email_format() {
        assert!(CredentialPolicy::is_valid_email("ana@eco.com.br"));
        assert!(!CredentialPolicy::is_valid_email("ana"));
        assert!(!CredentialPolicy::is_valid_email("@eco.com"));
        assert!(!CredentialPolicy::is_valid_email("ana@eco"));
        assert!(!CredentialPolicy::is_valid_email("ana@.com"));
        assert!(!CredentialPolicy::is_valid_email("a na@eco.com"));
        assert!(!CredentialPolicy::is_valid_email("ana@eco@x.com"));
    }

    #[test]
    fn test_password_length() {
        let policy = CredentialPolicy::default();
        assert!(!policy.is_strong_enough("12345"));
        assert!(policy.is_strong_enough("123456"));
        assert!(!policy.with_min_password_length(8).is_strong_enough("123456"));
    }
}
