//! In-memory identity provider.
//!
//! Behaves like the real provider (e-mail format, password length and
//! duplicate checks, listener notifications) without any network. Adds call
//! counters, optional latency and failure injection for tests.

use crate::config::CredentialPolicy;
use crate::error::{ProviderError, ProviderErrorKind};
use crate::identity::{Identity, UserId};
use crate::providers::{AuthStateListener, IdentityProvider, ListenerRegistry, Subscription};
use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

#[derive(Debug, Clone)]
struct Account {
    identity: Identity,
    password: String,
}

#[derive(Debug, Default)]
struct Failures {
    create_account: Option<ProviderError>,
    update_display_name: Option<ProviderError>,
    authenticate: Option<ProviderError>,
    terminate_session: Option<ProviderError>,
    keep_session_on_sign_out: bool,
}

#[derive(Debug, Default)]
struct MemoryState {
    /// Keyed by lowercase e-mail.
    accounts: HashMap<String, Account>,
    current: Option<Identity>,
    failures: Failures,
}

#[derive(Debug, Default)]
struct Calls {
    subscribe: AtomicUsize,
    create_account: AtomicUsize,
    update_display_name: AtomicUsize,
    authenticate: AtomicUsize,
    terminate_session: AtomicUsize,
}

/// Snapshot of how often each provider operation was called.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallCounts {
    /// `subscribe` calls.
    pub subscribe: usize,
    /// `create_account` calls.
    pub create_account: usize,
    /// `update_display_name` calls.
    pub update_display_name: usize,
    /// `authenticate` calls.
    pub authenticate: usize,
    /// `terminate_session` calls.
    pub terminate_session: usize,
}

impl CallCounts {
    /// Total number of requests (everything except `subscribe`).
    #[must_use]
    pub const fn requests(&self) -> usize {
        self.create_account + self.update_display_name + self.authenticate + self.terminate_session
    }
}

/// In-memory identity provider.
///
/// Clones share the same accounts, session and listeners.
#[derive(Debug, Clone, Default)]
pub struct InMemoryIdentityProvider {
    state: Arc<Mutex<MemoryState>>,
    listeners: ListenerRegistry,
    calls: Arc<Calls>,
    latency: Duration,
    policy: CredentialPolicy,
}

impl InMemoryIdentityProvider {
    /// Create an empty provider with no latency.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay every request by `latency`.
    #[must_use]
    pub const fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Use a custom credential policy.
    #[must_use]
    pub const fn with_policy(mut self, policy: CredentialPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Seed an account.
    #[must_use]
    pub fn with_account(self, name: Option<&str>, email: &str, password: &str) -> Self {
        let mut identity = Identity::new(uuid::Uuid::new_v4().to_string()).with_email(email);
        identity.display_name = name.map(str::to_string);

        self.lock().accounts.insert(
            email.to_lowercase(),
            Account {
                identity,
                password: password.to_string(),
            },
        );
        self
    }

    /// Start with `email` already signed in, as if the session had been
    /// restored from the provider's own persistence.
    #[must_use]
    pub fn with_restored_session(self, email: &str) -> Self {
        {
            let mut state = self.lock();
            let identity = state
                .accounts
                .get(&email.to_lowercase())
                .map(|account| account.identity.clone());
            state.current = identity;
        }
        self
    }

    /// Fail the next `create_account` call.
    pub fn fail_next_create_account(&self, error: ProviderError) {
        self.lock().failures.create_account = Some(error);
    }

    /// Fail the next `update_display_name` call.
    pub fn fail_next_update_display_name(&self, error: ProviderError) {
        self.lock().failures.update_display_name = Some(error);
    }

    /// Fail the next `authenticate` call.
    pub fn fail_next_authenticate(&self, error: ProviderError) {
        self.lock().failures.authenticate = Some(error);
    }

    /// Fail the next `terminate_session` call.
    pub fn fail_next_terminate_session(&self, error: ProviderError) {
        self.lock().failures.terminate_session = Some(error);
    }

    /// Make `terminate_session` report success while keeping the session.
    pub fn keep_session_on_sign_out(&self, keep: bool) {
        self.lock().failures.keep_session_on_sign_out = keep;
    }

    /// Report an error on the notification channel.
    pub fn emit_error(&self, error: ProviderError) {
        let _state = self.lock();
        self.listeners.notify(&Err(error));
    }

    /// Change the current identity without any request, as an external
    /// event would (e.g. the session being revoked elsewhere).
    pub fn force_identity(&self, identity: Option<Identity>) {
        let mut state = self.lock();
        state.current.clone_from(&identity);
        self.listeners.notify(&Ok(identity));
    }

    /// Look up a stored account's identity by e-mail.
    #[must_use]
    pub fn account(&self, email: &str) -> Option<Identity> {
        self.lock()
            .accounts
            .get(&email.to_lowercase())
            .map(|account| account.identity.clone())
    }

    /// Call counters so far.
    #[must_use]
    pub fn calls(&self) -> CallCounts {
        CallCounts {
            subscribe: self.calls.subscribe.load(Ordering::SeqCst),
            create_account: self.calls.create_account.load(Ordering::SeqCst),
            update_display_name: self.calls.update_display_name.load(Ordering::SeqCst),
            authenticate: self.calls.authenticate.load(Ordering::SeqCst),
            terminate_session: self.calls.terminate_session.load(Ordering::SeqCst),
        }
    }

    /// Number of registered listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }

    fn do_create_account(&self, email: &str, password: &str) -> Result<Identity, ProviderError> {
        let mut state = self.lock();

        if let Some(error) = state.failures.create_account.take() {
            return Err(error);
        }
        if !CredentialPolicy::is_valid_email(email) {
            return Err(ProviderError::new(ProviderErrorKind::InvalidEmailFormat, email));
        }
        if !self.policy.is_strong_enough(password) {
            return Err(ProviderError::new(
                ProviderErrorKind::WeakCredential,
                format!(
                    "password shorter than {} characters",
                    self.policy.min_password_length
                ),
            ));
        }

        let key = email.to_lowercase();
        if state.accounts.contains_key(&key) {
            return Err(ProviderError::new(ProviderErrorKind::EmailAlreadyInUse, email));
        }

        let identity = Identity::new(uuid::Uuid::new_v4().to_string()).with_email(email);
        state.accounts.insert(
            key,
            Account {
                identity: identity.clone(),
                password: password.to_string(),
            },
        );
        Ok(identity)
    }

    fn do_update_display_name(&self, user_id: &UserId, name: &str) -> Result<(), ProviderError> {
        let mut state = self.lock();

        if let Some(error) = state.failures.update_display_name.take() {
            return Err(error);
        }

        let account = state
            .accounts
            .values_mut()
            .find(|account| account.identity.id == *user_id)
            .ok_or_else(|| ProviderError::unknown(format!("user {user_id} not found")))?;
        account.identity.display_name = Some(name.to_string());

        if let Some(current) = state.current.as_mut().filter(|c| c.id == *user_id) {
            current.display_name = Some(name.to_string());
            self.listeners.notify(&Ok(Some(current.clone())));
        }
        Ok(())
    }

    fn do_authenticate(&self, email: &str, password: &str) -> Result<Identity, ProviderError> {
        let mut state = self.lock();

        if let Some(error) = state.failures.authenticate.take() {
            return Err(error);
        }
        if !CredentialPolicy::is_valid_email(email) {
            return Err(ProviderError::new(ProviderErrorKind::InvalidEmailFormat, email));
        }

        let identity = state
            .accounts
            .get(&email.to_lowercase())
            .filter(|account| account.password == password)
            .map(|account| account.identity.clone())
            .ok_or_else(|| {
                ProviderError::new(ProviderErrorKind::InvalidCredentials, "invalid login credentials")
            })?;

        state.current = Some(identity.clone());
        self.listeners.notify(&Ok(Some(identity.clone())));
        Ok(identity)
    }

    fn do_terminate_session(&self) -> Result<(), ProviderError> {
        let mut state = self.lock();

        if let Some(error) = state.failures.terminate_session.take() {
            return Err(error);
        }
        if state.failures.keep_session_on_sign_out {
            return Ok(());
        }
        if state.current.take().is_some() {
            self.listeners.notify(&Ok(None));
        }
        Ok(())
    }
}

impl IdentityProvider for InMemoryIdentityProvider {
    fn subscribe(&self, listener: AuthStateListener) -> Subscription {
        self.calls.subscribe.fetch_add(1, Ordering::SeqCst);
        let state = self.lock();
        self.listeners.register(listener, Ok(state.current.clone()))
    }

    fn create_account(
        &self,
        email: &str,
        password: &str,
    ) -> impl Future<Output = Result<Identity, ProviderError>> + Send {
        self.calls.create_account.fetch_add(1, Ordering::SeqCst);
        let provider = self.clone();
        let email = email.to_string();
        let password = password.to_string();

        async move {
            provider.simulate_latency().await;
            provider.do_create_account(&email, &password)
        }
    }

    fn update_display_name(
        &self,
        identity: &Identity,
        name: &str,
    ) -> impl Future<Output = Result<(), ProviderError>> + Send {
        self.calls.update_display_name.fetch_add(1, Ordering::SeqCst);
        let provider = self.clone();
        let user_id = identity.id.clone();
        let name = name.to_string();

        async move {
            provider.simulate_latency().await;
            provider.do_update_display_name(&user_id, &name)
        }
    }

    fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> impl Future<Output = Result<Identity, ProviderError>> + Send {
        self.calls.authenticate.fetch_add(1, Ordering::SeqCst);
        let provider = self.clone();
        let email = email.to_string();
        let password = password.to_string();

        async move {
            provider.simulate_latency().await;
            provider.do_authenticate(&email, &password)
        }
    }

    fn terminate_session(&self) -> impl Future<Output = Result<(), ProviderError>> + Send {
        self.calls.terminate_session.fetch_add(1, Ordering::SeqCst);
        let provider = self.clone();

        async move {
            provider.simulate_latency().await;
            provider.do_terminate_session()
        }
    }

    fn current_identity(&self) -> Option<Identity> {
        self.lock().current.clone()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::sync::Mutex as StdMutex;

    fn provider() -> InMemoryIdentityProvider {
        InMemoryIdentityProvider::new().with_account(Some("Ana"), "ana@eco.com", "segredo1")
    }

    #[tokio::test]
    async fn test_create_account_rules() {
        let provider = provider();

        let taken = provider.create_account("ANA@eco.com", "123456").await;
        assert_eq!(taken.unwrap_err().kind, ProviderErrorKind::EmailAlreadyInUse);

        let malformed = provider.create_account("ana.eco.com", "123456").await;
        assert_eq!(malformed.unwrap_err().kind, ProviderErrorKind::InvalidEmailFormat);

        let weak = provider.create_account("bia@eco.com", "123").await;
        assert_eq!(weak.unwrap_err().kind, ProviderErrorKind::WeakCredential);

        let created = provider.create_account("bia@eco.com", "123456").await.unwrap();
        assert_eq!(created.email.as_deref(), Some("bia@eco.com"));
        assert!(provider.current_identity().is_none());
    }

    #[tokio::test]
    async fn test_authenticate_sets_current_and_notifies() {
        let provider = provider();
        let seen = Arc::new(StdMutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let _subscription =
            provider.subscribe(Box::new(move |change| sink.lock().unwrap().push(change)));

        let wrong = provider.authenticate("ana@eco.com", "errada").await;
        assert_eq!(wrong.unwrap_err().kind, ProviderErrorKind::InvalidCredentials);

        let identity = provider.authenticate("ana@eco.com", "segredo1").await.unwrap();
        assert_eq!(provider.current_identity(), Some(identity.clone()));
        assert_eq!(*seen.lock().unwrap(), vec![Ok(None), Ok(Some(identity))]);
    }

    #[tokio::test]
    async fn test_display_name_change_of_current_identity_notifies() {
        let provider = provider().with_restored_session("ana@eco.com");
        let seen = Arc::new(StdMutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let _subscription =
            provider.subscribe(Box::new(move |change| sink.lock().unwrap().push(change)));

        let current = provider.current_identity().unwrap();
        provider.update_display_name(&current, "Ana Clara").await.unwrap();

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        let latest = seen[1].clone().unwrap().unwrap();
        assert_eq!(latest.display_name.as_deref(), Some("Ana Clara"));
    }

    #[tokio::test]
    async fn test_failure_injection_is_one_shot() {
        let provider = provider();
        provider.fail_next_authenticate(ProviderError::unknown("offline"));

        assert!(provider.authenticate("ana@eco.com", "segredo1").await.is_err());
        assert!(provider.authenticate("ana@eco.com", "segredo1").await.is_ok());
        assert_eq!(provider.calls().authenticate, 2);
    }

    #[tokio::test]
    async fn test_keep_session_on_sign_out() {
        let provider = provider().with_restored_session("ana@eco.com");
        provider.keep_session_on_sign_out(true);

        provider.terminate_session().await.unwrap();

        assert!(provider.current_identity().is_some());
    }
}
