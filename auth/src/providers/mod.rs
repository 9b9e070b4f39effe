//! Identity providers.
//!
//! This module defines the trait the session logic uses to talk to the
//! external identity service. The reducer depends on the trait; the
//! application picks a concrete implementation at startup.
//!
//! # Architecture
//!
//! Two channels connect the application to a provider:
//!
//! ```text
//!  user intent                         provider state change
//!      │                                        │
//!      ▼                                        ▼
//! ┌──────────────┐   request/response   ┌──────────────┐
//! │ SessionReducer│ ──────────────────▶ │   Provider   │
//! └──────────────┘                      └──────┬───────┘
//!      ▲                                       │ notification
//!      │ IdentityChanged                       ▼
//! ┌──────────────┐                      ┌──────────────┐
//! │    Store     │ ◀─────────────────── │SessionObserver│
//! └──────────────┘                      └──────────────┘
//! ```
//!
//! Request results never write the session identity; only notifications do.
//!
//! - **Testing**: `mocks::InMemoryIdentityProvider` (deterministic, failure injection)
//! - **Production**: [`FirebaseIdentityProvider`] (Identity Toolkit REST API)

use crate::error::ProviderError;
use crate::identity::Identity;
use std::fmt;
use std::future::Future;

pub mod firebase;
pub mod listeners;

pub use firebase::FirebaseIdentityProvider;
pub use listeners::ListenerRegistry;

/// What a provider reports to its listeners.
///
/// `Err` is an error on the notification channel itself; observers treat it
/// as "no authenticated user".
pub type AuthStateChange = Result<Option<Identity>, ProviderError>;

/// Callback registered with [`IdentityProvider::subscribe`].
pub type AuthStateListener = Box<dyn Fn(AuthStateChange) + Send + Sync>;

/// Identity provider.
///
/// # Implementation Notes
///
/// - `subscribe` calls the listener once immediately with the current
///   state, then on every sign-in, sign-out and display-name change of the
///   current identity.
/// - Listeners are invoked synchronously and must not call back into the
///   provider.
/// - `create_account` does not make the new account the current identity.
pub trait IdentityProvider: Send + Sync {
    /// Register a listener for authentication state changes.
    ///
    /// The listener stays registered until the returned [`Subscription`]
    /// is released.
    fn subscribe(&self, listener: AuthStateListener) -> Subscription;

    /// Create an account.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The e-mail is taken → `EmailAlreadyInUse`
    /// - The e-mail is malformed → `InvalidEmailFormat`
    /// - The password is too weak → `WeakCredential`
    /// - Anything else → `Unknown`
    fn create_account(
        &self,
        email: &str,
        password: &str,
    ) -> impl Future<Output = Result<Identity, ProviderError>> + Send;

    /// Change the display name of `identity`.
    ///
    /// # Errors
    ///
    /// Returns error if the provider rejects the update or cannot be reached.
    fn update_display_name(
        &self,
        identity: &Identity,
        name: &str,
    ) -> impl Future<Output = Result<(), ProviderError>> + Send;

    /// Authenticate with e-mail and password.
    ///
    /// On success the account becomes the current identity and listeners are
    /// notified.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The credentials do not match an account → `InvalidCredentials`
    /// - The e-mail is malformed → `InvalidEmailFormat`
    /// - Anything else → `Unknown`
    fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> impl Future<Output = Result<Identity, ProviderError>> + Send;

    /// End the current session.
    ///
    /// # Errors
    ///
    /// Returns error if the provider could not terminate the session.
    fn terminate_session(&self) -> impl Future<Output = Result<(), ProviderError>> + Send;

    /// Synchronous snapshot of the current identity.
    fn current_identity(&self) -> Option<Identity>;
}

/// Handle for a registered listener.
///
/// Releasing the handle (via [`Subscription::unsubscribe`] or drop) removes
/// the listener. Releasing more than once is harmless.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    /// Create a subscription that runs `cancel` when released.
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// Remove the listener now.
    pub fn unsubscribe(mut self) {
        self.release();
    }

    /// Whether the listener is still registered through this handle.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.cancel.is_some()
    }

    fn release(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish()
    }
}
