//! Session reducer.
//!
//! Turns user intents into provider requests and provider results into
//! state. It never writes `session.identity` in response to a request
//! result; only `IdentityChanged` does.
//!
//! # Flow
//!
//! 1. Validate the form (trimmed fields must be non-empty)
//! 2. Mark the request in flight
//! 3. Issue the provider request as an effect
//! 4. Record the outcome (notice or failure) when the effect reports back
//!
//! Requests that arrive before the first provider notification are
//! dropped: nothing is mounted yet, so no user could have issued them.
//!
//! # Sign-out post-condition
//!
//! After the provider reports a successful sign-out, the reducer's effect
//! reads the provider's identity snapshot. If an identity is still present
//! the sign-out fails with [`AuthError::SignOutUnverified`].

use crate::actions::SessionAction;
use crate::environment::SessionEnvironment;
use crate::error::{AuthError, Operation};
use crate::identity::Identity;
use crate::providers::IdentityProvider;
use crate::state::{Notice, SessionFailure, SessionState};
use ecolesson_core::effect::Effect;
use ecolesson_core::reducer::Reducer;
use ecolesson_core::{smallvec, SmallVec};

/// Session reducer.
///
/// Generic over the identity provider so tests run against the in-memory
/// provider and the application against Firebase.
#[derive(Debug, Clone)]
pub struct SessionReducer<P> {
    _phantom: std::marker::PhantomData<P>,
}

impl<P> SessionReducer<P> {
    /// Create a session reducer.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            _phantom: std::marker::PhantomData,
        }
    }
}

impl<P> Default for SessionReducer<P> {
    fn default() -> Self {
        Self::new()
    }
}

/// Return the first field (in form order) that is blank after trimming.
fn first_blank(fields: &[(&'static str, &str)]) -> Option<&'static str> {
    fields
        .iter()
        .find(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| *name)
}

impl<P> SessionReducer<P>
where
    P: IdentityProvider + Clone + 'static,
{
    fn fail(state: &mut SessionState, operation: Operation, error: AuthError) {
        match &error {
            AuthError::SignOutUnverified { user_id } => {
                tracing::error!(%user_id, "Sign-out reported success but the provider still has a user");
            },
            AuthError::MissingField { field } => {
                tracing::debug!(?operation, field, "Form rejected");
            },
            other => tracing::warn!(?operation, error = %other, "Session operation failed"),
        }
        state.failure = Some(SessionFailure { operation, error });
    }

    fn sign_up(
        provider: P,
        name: String,
        email: String,
        password: String,
    ) -> Effect<SessionAction> {
        Effect::Future(Box::pin(async move {
            let created = provider.create_account(&email, &password).await;
            let mut identity = match created {
                Ok(identity) => identity,
                Err(error) => return Some(SessionAction::SignUpFailed { error: error.into() }),
            };

            match provider.update_display_name(&identity, &name).await {
                Ok(()) => {
                    identity.display_name = Some(name);
                    Some(SessionAction::SignUpCompleted { identity })
                },
                Err(error) => Some(SessionAction::SignUpFailed { error: error.into() }),
            }
        }))
    }

    fn sign_in(provider: P, email: String, password: String) -> Effect<SessionAction> {
        Effect::Future(Box::pin(async move {
            Some(match provider.authenticate(&email, &password).await {
                Ok(identity) => SessionAction::SignInSettled { identity },
                Err(error) => SessionAction::SignInFailed { error: error.into() },
            })
        }))
    }

    fn sign_out(provider: P) -> Effect<SessionAction> {
        Effect::Future(Box::pin(async move {
            if let Err(error) = provider.terminate_session().await {
                return Some(SessionAction::SignOutFailed { error: error.into() });
            }

            Some(match provider.current_identity() {
                None => SessionAction::SignOutCompleted,
                Some(still) => SessionAction::SignOutFailed {
                    error: AuthError::SignOutUnverified {
                        user_id: still.id.to_string(),
                    },
                },
            })
        }))
    }

    fn update_profile(provider: P, identity: Identity, name: String) -> Effect<SessionAction> {
        Effect::Future(Box::pin(async move {
            Some(match provider.update_display_name(&identity, &name).await {
                Ok(()) => SessionAction::ProfileUpdated,
                Err(error) => SessionAction::ProfileUpdateFailed { error: error.into() },
            })
        }))
    }
}

impl<P> Reducer for SessionReducer<P>
where
    P: IdentityProvider + Clone + 'static,
{
    type State = SessionState;
    type Action = SessionAction;
    type Environment = SessionEnvironment<P>;

    #[allow(clippy::too_many_lines)] // One arm per action
    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        // No screen is mounted until the provider has reported once.
        if state.session.initializing {
            if let Some(operation) = action.requested_operation() {
                tracing::warn!(?operation, "Request ignored while the session initializes");
                return smallvec![Effect::None];
            }
        }

        match action {
            SessionAction::IdentityChanged(identity) => {
                tracing::debug!(
                    authenticated = identity.is_some(),
                    first = state.session.initializing,
                    "Identity changed"
                );
                state.session.observe(identity);
                smallvec![Effect::None]
            },

            SessionAction::SignUpRequested {
                name,
                email,
                password,
            } => {
                if state.pending.sign_up {
                    tracing::debug!("Sign-up already in flight");
                    return smallvec![Effect::None];
                }
                let blank = first_blank(&[
                    ("name", name.as_str()),
                    ("email", email.as_str()),
                    ("password", password.as_str()),
                ]);
                if let Some(field) = blank {
                    Self::fail(state, Operation::SignUp, AuthError::MissingField { field });
                    return smallvec![Effect::None];
                }

                tracing::debug!("Requesting account creation");
                state.pending.sign_up = true;
                state.failure = None;
                smallvec![Self::sign_up(
                    env.provider.clone(),
                    name.trim().to_string(),
                    email.trim().to_string(),
                    password,
                )]
            },

            SessionAction::SignUpCompleted { identity } => {
                tracing::info!(user_id = %identity.id, "Sign-up completed");
                state.pending.sign_up = false;
                state.notice = Some(Notice::AccountCreated);
                smallvec![Effect::None]
            },

            SessionAction::SignUpFailed { error } => {
                state.pending.sign_up = false;
                Self::fail(state, Operation::SignUp, error);
                smallvec![Effect::None]
            },

            SessionAction::SignInRequested { email, password } => {
                if state.pending.sign_in {
                    tracing::debug!("Sign-in already in flight");
                    return smallvec![Effect::None];
                }
                if let Some(field) = first_blank(&[("email", email.as_str()), ("password", password.as_str())]) {
                    Self::fail(state, Operation::SignIn, AuthError::MissingField { field });
                    return smallvec![Effect::None];
                }

                tracing::debug!("Requesting authentication");
                state.pending.sign_in = true;
                state.failure = None;
                smallvec![Self::sign_in(
                    env.provider.clone(),
                    email.trim().to_string(),
                    password,
                )]
            },

            SessionAction::SignInSettled { identity } => {
                tracing::debug!(user_id = %identity.id, "Authentication accepted, waiting for notification");
                state.pending.sign_in = false;
                smallvec![Effect::None]
            },

            SessionAction::SignInFailed { error } => {
                state.pending.sign_in = false;
                Self::fail(state, Operation::SignIn, error);
                smallvec![Effect::None]
            },

            SessionAction::SignOutRequested => {
                if state.pending.sign_out {
                    tracing::debug!("Sign-out already in flight");
                    return smallvec![Effect::None];
                }

                tracing::debug!("Requesting session termination");
                state.pending.sign_out = true;
                state.failure = None;
                smallvec![Self::sign_out(env.provider.clone())]
            },

            SessionAction::SignOutCompleted => {
                state.pending.sign_out = false;
                smallvec![Effect::None]
            },

            SessionAction::SignOutFailed { error } => {
                state.pending.sign_out = false;
                Self::fail(state, Operation::SignOut, error);
                smallvec![Effect::None]
            },

            SessionAction::ProfileUpdateRequested { name } => {
                let Some(identity) = state.session.identity.clone() else {
                    Self::fail(state, Operation::ProfileUpdate, AuthError::NoAuthenticatedUser);
                    return smallvec![Effect::None];
                };
                if state.pending.profile_update {
                    tracing::debug!("Profile update already in flight");
                    return smallvec![Effect::None];
                }

                tracing::debug!(user_id = %identity.id, "Requesting display-name change");
                state.pending.profile_update = true;
                state.failure = None;
                smallvec![Self::update_profile(env.provider.clone(), identity, name)]
            },

            SessionAction::ProfileUpdated => {
                state.pending.profile_update = false;
                state.notice = Some(Notice::ProfileUpdated);
                smallvec![Effect::None]
            },

            SessionAction::ProfileUpdateFailed { error } => {
                state.pending.profile_update = false;
                Self::fail(state, Operation::ProfileUpdate, error);
                smallvec![Effect::None]
            },

            SessionAction::NoticeShown => {
                state.notice = None;
                smallvec![Effect::None]
            },

            SessionAction::ErrorDismissed => {
                state.failure = None;
                smallvec![Effect::None]
            },
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::error::{ProviderError, ProviderErrorKind};
    use crate::mocks::InMemoryIdentityProvider;
    use crate::state::{InFlight, Session};
    use ecolesson_testing::helpers::resolve_all;
    use ecolesson_testing::{ReducerTest, assertions};

    type TestReducer = SessionReducer<InMemoryIdentityProvider>;

    fn env(provider: &InMemoryIdentityProvider) -> SessionEnvironment<InMemoryIdentityProvider> {
        SessionEnvironment::new(provider.clone())
    }

    fn signed_out_state() -> SessionState {
        SessionState {
            session: Session {
                identity: None,
                initializing: false,
            },
            ..SessionState::default()
        }
    }

    fn signed_in_state() -> SessionState {
        SessionState {
            session: Session {
                identity: Some(Identity::new("u1").with_email("ana@eco.com")),
                initializing: false,
            },
            ..SessionState::default()
        }
    }

    #[test]
    fn test_first_notification_ends_initialization() {
        let provider = InMemoryIdentityProvider::new();
        ReducerTest::new(TestReducer::new())
            .with_env(env(&provider))
            .given_state(SessionState::default())
            .when_action(SessionAction::IdentityChanged(None))
            .then_state(|s| {
                assert!(!s.session.initializing);
                assert!(s.session.identity.is_none());
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn test_sign_up_with_blank_field_never_reaches_provider() {
        let provider = InMemoryIdentityProvider::new();
        let observed = provider.clone();

        ReducerTest::new(TestReducer::new())
            .with_env(env(&provider))
            .given_state(signed_out_state())
            .when_action(SessionAction::SignUpRequested {
                name: "Ana".into(),
                email: "   ".into(),
                password: "segredo1".into(),
            })
            .then_state(|s| {
                let failure = s.failure.as_ref().unwrap();
                assert_eq!(failure.error, AuthError::MissingField { field: "email" });
                assert_eq!(failure.user_message(), "Por favor, preencha todos os campos.");
                assert!(!s.pending.sign_up);
            })
            .then_effects(assertions::assert_no_effects)
            .run();

        assert_eq!(observed.calls().requests(), 0);
    }

    #[test]
    fn test_sign_in_with_blank_password_is_rejected() {
        let provider = InMemoryIdentityProvider::new();

        ReducerTest::new(TestReducer::new())
            .with_env(env(&provider))
            .given_state(signed_out_state())
            .when_action(SessionAction::SignInRequested {
                email: "ana@eco.com".into(),
                password: String::new(),
            })
            .then_state(|s| {
                assert_eq!(
                    s.failure.as_ref().unwrap().user_message(),
                    "Por favor, preencha e-mail e senha."
                );
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn test_second_sign_out_while_in_flight_is_ignored() {
        let provider = InMemoryIdentityProvider::new();

        ReducerTest::new(TestReducer::new())
            .with_env(env(&provider))
            .given_state(signed_in_state())
            .when_action(SessionAction::SignOutRequested)
            .when_action(SessionAction::SignOutRequested)
            .then_state(|s| assert!(s.pending.sign_out))
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn test_profile_update_without_identity_reports_no_user() {
        let provider = InMemoryIdentityProvider::new();
        let observed = provider.clone();

        ReducerTest::new(TestReducer::new())
            .with_env(env(&provider))
            .given_state(signed_out_state())
            .when_action(SessionAction::ProfileUpdateRequested { name: "Ana".into() })
            .then_state(|s| {
                let failure = s.failure.as_ref().unwrap();
                assert_eq!(failure.error, AuthError::NoAuthenticatedUser);
                assert_eq!(failure.user_message(), "Nenhum usuário autenticado.");
            })
            .then_effects(assertions::assert_no_effects)
            .run();

        assert_eq!(observed.calls().update_display_name, 0);
    }

    #[test]
    fn test_request_results_do_not_write_identity() {
        let provider = InMemoryIdentityProvider::new();

        ReducerTest::new(TestReducer::new())
            .with_env(env(&provider))
            .given_state(SessionState::default())
            .when_action(SessionAction::SignInSettled {
                identity: Identity::new("u1"),
            })
            .then_state(|s| {
                assert!(s.session.identity.is_none());
                assert!(s.session.initializing);
            })
            .run();
    }

    #[test]
    fn test_notice_is_consumed_once() {
        let provider = InMemoryIdentityProvider::new();

        ReducerTest::new(TestReducer::new())
            .with_env(env(&provider))
            .given_state(SessionState::default())
            .when_action(SessionAction::SignUpCompleted {
                identity: Identity::new("u1"),
            })
            .when_action(SessionAction::NoticeShown)
            .then_state(|s| assert_eq!(s.notice, None))
            .run();
    }

    #[tokio::test]
    async fn test_sign_up_creates_account_then_sets_name() {
        let provider = InMemoryIdentityProvider::new();
        let reducer = TestReducer::new();
        let env = env(&provider);
        let mut state = signed_out_state();

        let effects = reducer.reduce(
            &mut state,
            SessionAction::SignUpRequested {
                name: "  Ana  ".into(),
                email: " ana@eco.com ".into(),
                password: "segredo1".into(),
            },
            &env,
        );
        assert!(state.pending.sign_up);

        let produced = resolve_all(effects).await;
        let [SessionAction::SignUpCompleted { identity }] = produced.as_slice() else {
            panic!("unexpected actions: {produced:?}");
        };
        assert_eq!(identity.display_name.as_deref(), Some("Ana"));
        assert_eq!(
            provider.account("ana@eco.com").unwrap().display_name.as_deref(),
            Some("Ana")
        );
        assert_eq!(provider.calls().create_account, 1);
        assert_eq!(provider.calls().update_display_name, 1);
    }

    #[tokio::test]
    async fn test_sign_up_maps_provider_error() {
        let provider = InMemoryIdentityProvider::new().with_account(None, "ana@eco.com", "segredo1");
        let reducer = TestReducer::new();
        let env = env(&provider);
        let mut state = signed_out_state();

        let effects = reducer.reduce(
            &mut state,
            SessionAction::SignUpRequested {
                name: "Ana".into(),
                email: "ana@eco.com".into(),
                password: "segredo1".into(),
            },
            &env,
        );
        for action in resolve_all(effects).await {
            let _ = reducer.reduce(&mut state, action, &env);
        }

        assert!(!state.pending.sign_up);
        assert_eq!(
            state.failure.as_ref().unwrap().user_message(),
            "Este e-mail já está em uso."
        );
        assert_eq!(provider.calls().update_display_name, 0);
    }

    #[tokio::test]
    async fn test_unverified_sign_out_is_a_hard_error() {
        let provider = InMemoryIdentityProvider::new()
            .with_account(None, "ana@eco.com", "segredo1")
            .with_restored_session("ana@eco.com");
        provider.keep_session_on_sign_out(true);
        let reducer = TestReducer::new();
        let env = env(&provider);
        let mut state = signed_in_state();

        let effects = reducer.reduce(&mut state, SessionAction::SignOutRequested, &env);
        for action in resolve_all(effects).await {
            let _ = reducer.reduce(&mut state, action, &env);
        }

        let failure = state.failure.unwrap();
        assert!(matches!(failure.error, AuthError::SignOutUnverified { .. }));
        assert_eq!(
            failure.user_message(),
            "Não foi possível confirmar o logout. Reinicie o aplicativo."
        );
        assert!(!state.pending.sign_out);
    }

    #[tokio::test]
    async fn test_sign_in_unknown_error_uses_generic_message() {
        let provider = InMemoryIdentityProvider::new();
        provider.fail_next_authenticate(ProviderError::new(ProviderErrorKind::Unknown, "quota"));
        let reducer = TestReducer::new();
        let env = env(&provider);
        let mut state = signed_out_state();

        let effects = reducer.reduce(
            &mut state,
            SessionAction::SignInRequested {
                email: "ana@eco.com".into(),
                password: "segredo1".into(),
            },
            &env,
        );
        for action in resolve_all(effects).await {
            let _ = reducer.reduce(&mut state, action, &env);
        }

        assert_eq!(
            state.failure.unwrap().user_message(),
            "Não foi possível fazer login. Tente novamente."
        );
    }

    #[test]
    fn test_requests_before_first_notification_are_dropped() {
        let provider = InMemoryIdentityProvider::new().with_account(None, "ana@eco.com", "segredo1");
        let observed = provider.clone();

        ReducerTest::new(TestReducer::new())
            .with_env(env(&provider))
            .given_state(SessionState::default())
            .when_action(SessionAction::SignInRequested {
                email: "ana@eco.com".into(),
                password: "segredo1".into(),
            })
            .then_state(|s| {
                assert!(s.session.initializing);
                assert!(!s.pending.sign_in);
                assert!(s.failure.is_none());
            })
            .then_effects(assertions::assert_no_effects)
            .run();

        ReducerTest::new(TestReducer::new())
            .with_env(env(&provider))
            .given_state(SessionState::default())
            .when_action(SessionAction::SignUpRequested {
                name: "Ana".into(),
                email: "bia@eco.com".into(),
                password: "segredo1".into(),
            })
            .when_action(SessionAction::SignOutRequested)
            .when_action(SessionAction::ProfileUpdateRequested { name: "Ana".into() })
            .then_state(|s| {
                assert_eq!(s.pending, InFlight::default());
                assert!(s.failure.is_none());
            })
            .then_effects(assertions::assert_no_effects)
            .run();

        assert_eq!(observed.calls().requests(), 0);
    }
}
