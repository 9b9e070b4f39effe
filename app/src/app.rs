//! The application context object.
//!
//! [`EcoLesson`] is built once at the root and owns the Store and the
//! session observer. There is no global session: everything that needs
//! the session goes through this object.

use crate::catalog::CatalogEnvironment;
use crate::config::AppConfig;
use crate::courses::{CourseApi, CoursesEnvironment};
use crate::reducer::{AppAction, AppEnvironment, AppReducer, AppState};
use crate::view::{self, Frame};
use ecolesson_auth::{IdentityProvider, Session, SessionEnvironment, SessionObserver};
use ecolesson_core::environment::{Clock, SystemClock};
use ecolesson_runtime::{EffectHandle, Store, StoreError};
use std::sync::Arc;
use std::time::Duration;

/// Store type of the application.
pub type AppStore<P, C> = Store<AppState, AppAction, AppEnvironment<P, C>, AppReducer<P, C>>;

/// Application root: Store plus session observer.
///
/// Dropping it releases the provider subscription.
pub struct EcoLesson<P, C>
where
    P: IdentityProvider + Clone + 'static,
    C: CourseApi + Clone + 'static,
{
    store: AppStore<P, C>,
    observer: SessionObserver,
}

impl<P, C> EcoLesson<P, C>
where
    P: IdentityProvider + Clone + 'static,
    C: CourseApi + Clone + 'static,
{
    /// Build the application and subscribe to `provider`.
    ///
    /// Must be called inside a Tokio runtime.
    #[must_use]
    pub fn start(config: &AppConfig, provider: P, api: C) -> Self {
        Self::with_clock(config, provider, api, Arc::new(SystemClock))
    }

    /// Like [`EcoLesson::start`] with an explicit clock.
    #[must_use]
    pub fn with_clock(config: &AppConfig, provider: P, api: C, clock: Arc<dyn Clock>) -> Self {
        let environment = AppEnvironment {
            session: SessionEnvironment::new(provider.clone()),
            courses: CoursesEnvironment::new(api, clock, config.page, config.page_size),
            catalog: CatalogEnvironment::new(config.catalog_delay),
        };
        let store = Store::new(AppState::default(), AppReducer::new(), environment);

        let forward = store.clone();
        let observer = SessionObserver::start(&provider, move |action| {
            let store = forward.clone();
            async move {
                if let Err(error) = store.send(AppAction::Session(action)).await {
                    tracing::debug!(%error, "Dropped session notification");
                }
            }
        });

        tracing::info!(api = %config.api_base_url, "EcoLesson started");
        Self { store, observer }
    }

    /// Dispatch an action.
    ///
    /// Returns once the reducer ran; the handle resolves when the action's
    /// effects (and their follow-up actions) are done.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownInProgress`] after [`EcoLesson::shutdown`].
    pub async fn dispatch(&self, action: AppAction) -> Result<EffectHandle, StoreError> {
        self.store.send(action).await
    }

    /// Dispatch an action and wait for its effects.
    ///
    /// Provider notifications caused by the action may still be in flight;
    /// use [`EcoLesson::wait_for`] for those.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownInProgress`] after [`EcoLesson::shutdown`].
    pub async fn dispatch_and_wait(&self, action: AppAction) -> Result<(), StoreError> {
        let mut handle = self.dispatch(action).await?;
        handle.wait().await;
        Ok(())
    }

    /// Render the current frame without consuming its alert.
    pub async fn peek(&self) -> Frame {
        self.store.state(view::render).await
    }

    /// Render the current frame and mark its alert as shown.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownInProgress`] after [`EcoLesson::shutdown`].
    pub async fn render(&self) -> Result<Frame, StoreError> {
        let frame = self.peek().await;
        if let Some(alert) = &frame.alert {
            self.store.send(alert.shown()).await?;
        }
        Ok(frame)
    }

    /// Snapshot of the observed session.
    pub async fn session(&self) -> Session {
        self.store.state(|state| state.session.session.clone()).await
    }

    /// Read application state.
    pub async fn state<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&AppState) -> T,
    {
        self.store.state(f).await
    }

    /// Wait until `predicate` holds.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Timeout`] if it does not hold within `timeout`.
    pub async fn wait_for<F>(&self, predicate: F, timeout: Duration) -> Result<(), StoreError>
    where
        F: FnMut(&AppState) -> bool,
    {
        self.store.wait_until(predicate, timeout).await
    }

    /// The underlying Store.
    #[must_use]
    pub const fn store(&self) -> &AppStore<P, C> {
        &self.store
    }

    /// Whether the provider subscription is held.
    #[must_use]
    pub const fn is_observing(&self) -> bool {
        self.observer.is_active()
    }

    /// Release the subscription, then drain running effects.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownTimeout`] if effects are still running
    /// after `timeout`.
    pub async fn shutdown(mut self, timeout: Duration) -> Result<(), StoreError> {
        self.observer.stop();
        self.store.shutdown(timeout).await
    }
}
