//! Bridge from provider notifications to session actions.

use crate::actions::SessionAction;
use crate::providers::{IdentityProvider, Subscription};
use std::future::Future;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Subscribes to a provider and forwards every notification as
/// [`SessionAction::IdentityChanged`].
///
/// Notifications are forwarded one at a time, in the order the provider
/// emitted them. A notification-channel error is forwarded as "no identity".
///
/// One observer per mounted root. Starting a second observer without
/// stopping the first leaves two subscriptions alive.
#[derive(Debug)]
pub struct SessionObserver {
    subscription: Option<Subscription>,
    forwarder: Option<JoinHandle<()>>,
}

impl SessionObserver {
    /// Subscribe to `provider` and forward notifications through `forward`.
    ///
    /// The provider delivers its current state immediately, so the first
    /// `IdentityChanged` is on its way when this returns.
    ///
    /// Must be called inside a Tokio runtime.
    pub fn start<P, F, Fut>(provider: &P, forward: F) -> Self
    where
        P: IdentityProvider,
        F: Fn(SessionAction) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send,
    {
        let (tx, mut rx) = mpsc::unbounded_channel();

        let subscription = provider.subscribe(Box::new(move |change| {
            let identity = change.unwrap_or_else(|error| {
                tracing::warn!(%error, "Identity provider reported an error, treating as signed out");
                None
            });
            if tx.send(identity).is_err() {
                tracing::trace!("Session observer stopped, dropping notification");
            }
        }));

        let forwarder = tokio::spawn(async move {
            while let Some(identity) = rx.recv().await {
                forward(SessionAction::IdentityChanged(identity)).await;
            }
        });

        tracing::debug!("Session observer started");
        Self {
            subscription: Some(subscription),
            forwarder: Some(forwarder),
        }
    }

    /// Release the subscription. Calling it again does nothing.
    ///
    /// Notifications not yet forwarded are discarded.
    pub fn stop(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
            tracing::debug!("Session observer stopped");
        }
        if let Some(forwarder) = self.forwarder.take() {
            forwarder.abort();
        }
    }

    /// Whether the subscription is still held.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.subscription.is_some()
    }
}

impl Drop for SessionObserver {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::ProviderError;
    use crate::identity::Identity;
    use crate::mocks::InMemoryIdentityProvider;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    fn collecting(
        provider: &InMemoryIdentityProvider,
    ) -> (SessionObserver, Arc<Mutex<Vec<SessionAction>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let observer = SessionObserver::start(provider, move |action| {
            let sink = Arc::clone(&sink);
            async move { sink.lock().unwrap().push(action) }
        });
        (observer, seen)
    }

    async fn settle() {
        tokio::time::sleep(Duration::from_millis(20)).await;
    }

    #[tokio::test]
    async fn test_initial_state_forwarded_immediately() {
        let provider = InMemoryIdentityProvider::new();
        let (_observer, seen) = collecting(&provider);
        settle().await;

        assert_eq!(*seen.lock().unwrap(), vec![SessionAction::IdentityChanged(None)]);
    }

    #[tokio::test]
    async fn test_error_is_fail_closed() {
        let provider = InMemoryIdentityProvider::new();
        let (_observer, seen) = collecting(&provider);

        provider.force_identity(Some(Identity::new("u1")));
        provider.emit_error(ProviderError::unknown("channel broke"));
        settle().await;

        assert_eq!(
            *seen.lock().unwrap(),
            vec![
                SessionAction::IdentityChanged(None),
                SessionAction::IdentityChanged(Some(Identity::new("u1"))),
                SessionAction::IdentityChanged(None),
            ]
        );
    }

    #[tokio::test]
    async fn test_stop_releases_subscription_and_is_idempotent() {
        let provider = InMemoryIdentityProvider::new();
        let (mut observer, seen) = collecting(&provider);
        settle().await;

        observer.stop();
        observer.stop();
        provider.force_identity(Some(Identity::new("u1")));
        settle().await;

        assert!(!observer.is_active());
        assert_eq!(provider.listener_count(), 0);
        assert_eq!(seen.lock().unwrap().len(), 1);
    }
}
