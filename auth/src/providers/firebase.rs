//! Firebase Authentication provider (Identity Toolkit REST API).
//!
//! Uses the e-mail/password endpoints:
//!
//! - `accounts:signUp` → [`IdentityProvider::create_account`]
//! - `accounts:signInWithPassword` → [`IdentityProvider::authenticate`]
//! - `accounts:update` → [`IdentityProvider::update_display_name`]
//!
//! The session lives in process memory only. ID tokens are kept per user so
//! a freshly created account can have its display name set before anyone
//! signs in with it. Tokens are never refreshed.

use super::{AuthStateListener, IdentityProvider, ListenerRegistry, Subscription};
use crate::config::FirebaseConfig;
use crate::error::ProviderError;
use crate::identity::{Identity, UserId};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};

#[derive(Debug, Default)]
struct FirebaseSession {
    current: Option<Identity>,
    id_tokens: HashMap<UserId, String>,
}

/// Identity provider backed by Firebase Authentication.
#[derive(Debug, Clone)]
pub struct FirebaseIdentityProvider {
    config: Arc<FirebaseConfig>,
    http: reqwest::Client,
    session: Arc<Mutex<FirebaseSession>>,
    listeners: ListenerRegistry,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PasswordRequest<'a> {
    email: &'a str,
    password: &'a str,
    return_secure_token: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UpdateProfileRequest<'a> {
    id_token: &'a str,
    display_name: &'a str,
    return_secure_token: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccountResponse {
    local_id: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    id_token: Option<String>,
}

impl AccountResponse {
    fn into_identity(self) -> (Identity, Option<String>) {
        let identity = Identity {
            id: UserId::new(self.local_id),
            display_name: self.display_name.filter(|name| !name.is_empty()),
            email: self.email,
        };
        (identity, self.id_token)
    }
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

impl FirebaseIdentityProvider {
    /// Create a provider for the given project configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be built (TLS backend
    /// initialization failure).
    pub fn new(config: FirebaseConfig) -> Result<Self, ProviderError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ProviderError::unknown(format!("HTTP client: {e}")))?;

        Ok(Self {
            config: Arc::new(config),
            http,
            session: Arc::new(Mutex::new(FirebaseSession::default())),
            listeners: ListenerRegistry::new(),
        })
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FirebaseSession> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn call<B, T>(&self, method: &str, body: &B) -> Result<T, ProviderError>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let url = self.config.accounts_url(method);
        tracing::debug!(method, "Identity Toolkit request");

        let response = self
            .http
            .post(&url)
            .query(&[("key", self.config.api_key.as_str())])
            .json(body)
            .send()
            .await
            .map_err(|e| ProviderError::unknown(format!("{method}: {e}")))?;

        let status = response.status();
        if status.is_success() {
            return response
                .json::<T>()
                .await
                .map_err(|e| ProviderError::unknown(format!("{method}: invalid response: {e}")));
        }

        let text = response.text().await.unwrap_or_default();
        let error = serde_json::from_str::<ErrorEnvelope>(&text).map_or_else(
            |_| ProviderError::unknown(format!("{method}: HTTP {status}")),
            |envelope| ProviderError::from_code(&envelope.error.message),
        );
        tracing::debug!(method, %status, kind = ?error.kind, "Identity Toolkit rejected request");
        Err(error)
    }
}

impl IdentityProvider for FirebaseIdentityProvider {
    fn subscribe(&self, listener: AuthStateListener) -> Subscription {
        let session = self.lock();
        self.listeners.register(listener, Ok(session.current.clone()))
    }

    fn create_account(
        &self,
        email: &str,
        password: &str,
    ) -> impl Future<Output = Result<Identity, ProviderError>> + Send {
        let provider = self.clone();
        let email = email.to_string();
        let password = password.to_string();

        async move {
            let request = PasswordRequest {
                email: &email,
                password: &password,
                return_secure_token: true,
            };
            let response: AccountResponse = provider.call("signUp", &request).await?;
            let (identity, token) = response.into_identity();

            if let Some(token) = token {
                provider.lock().id_tokens.insert(identity.id.clone(), token);
            }

            tracing::info!(user_id = %identity.id, "Account created");
            Ok(identity)
        }
    }

    fn update_display_name(
        &self,
        identity: &Identity,
        name: &str,
    ) -> impl Future<Output = Result<(), ProviderError>> + Send {
        let provider = self.clone();
        let user_id = identity.id.clone();
        let name = name.to_string();

        async move {
            let token = provider
                .lock()
                .id_tokens
                .get(&user_id)
                .cloned()
                .ok_or_else(|| ProviderError::unknown(format!("no ID token for user {user_id}")))?;

            let request = UpdateProfileRequest {
                id_token: &token,
                display_name: &name,
                return_secure_token: false,
            };
            let _: AccountResponse = provider.call("update", &request).await?;

            let session = &mut *provider.lock();
            if let Some(current) = session.current.as_mut().filter(|c| c.id == user_id) {
                current.display_name = Some(name);
                provider.listeners.notify(&Ok(Some(current.clone())));
            }
            Ok(())
        }
    }

    fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> impl Future<Output = Result<Identity, ProviderError>> + Send {
        let provider = self.clone();
        let email = email.to_string();
        let password = password.to_string();

        async move {
            let request = PasswordRequest {
                email: &email,
                password: &password,
                return_secure_token: true,
            };
            let response: AccountResponse = provider.call("signInWithPassword", &request).await?;
            let (identity, token) = response.into_identity();

            let session = &mut *provider.lock();
            if let Some(token) = token {
                session.id_tokens.insert(identity.id.clone(), token);
            }
            session.current = Some(identity.clone());
            provider.listeners.notify(&Ok(Some(identity.clone())));

            tracing::info!(user_id = %identity.id, "Signed in");
            Ok(identity)
        }
    }

    fn terminate_session(&self) -> impl Future<Output = Result<(), ProviderError>> + Send {
        let provider = self.clone();

        async move {
            let session = &mut *provider.lock();
            if let Some(previous) = session.current.take() {
                session.id_tokens.remove(&previous.id);
                provider.listeners.notify(&Ok(None));
                tracing::info!(user_id = %previous.id, "Signed out");
            }
            Ok(())
        }
    }

    fn current_identity(&self) -> Option<Identity> {
        self.lock().current.clone()
    }
}
