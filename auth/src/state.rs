//! Session state.

use crate::error::{AuthError, Operation};
use crate::identity::Identity;

/// Process-local record of the current identity.
///
/// Written only by `SessionAction::IdentityChanged`, i.e. by provider
/// notifications. `initializing` starts `true` and turns `false` on the
/// first notification; nothing sets it back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Current identity, if any.
    pub identity: Option<Identity>,
    /// `true` until the provider's first notification.
    pub initializing: bool,
}

impl Session {
    /// Apply a provider notification.
    pub fn observe(&mut self, identity: Option<Identity>) {
        self.identity = identity;
        self.initializing = false;
    }

    /// Whether an identity is present.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self {
            identity: None,
            initializing: true,
        }
    }
}

/// Requests currently waiting on the provider.
///
/// Each flag also rejects a second request of the same kind while the
/// first is running.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InFlight {
    /// Sign-up running.
    pub sign_up: bool,
    /// Sign-in running.
    pub sign_in: bool,
    /// Sign-out running.
    pub sign_out: bool,
    /// Profile update running.
    pub profile_update: bool,
}

impl InFlight {
    /// Whether any request is running.
    #[must_use]
    pub const fn any(&self) -> bool {
        self.sign_up || self.sign_in || self.sign_out || self.profile_update
    }
}

/// The last failed operation, kept until the user dismisses it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionFailure {
    /// What the user was trying to do.
    pub operation: Operation,
    /// Why it failed.
    pub error: AuthError,
}

impl SessionFailure {
    /// Message to show in the alert.
    #[must_use]
    pub const fn user_message(&self) -> &'static str {
        self.error.user_message(self.operation)
    }
}

/// One-shot success notices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    /// Shown on the sign-in screen right after sign-up.
    AccountCreated,
    /// Shown on the profile screen after a name change.
    ProfileUpdated,
}

impl Notice {
    /// Message text.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::AccountCreated => "Cadastro realizado com sucesso! Faça seu login.",
            Self::ProfileUpdated => "Perfil atualizado com sucesso!",
        }
    }
}

/// State owned by the session reducer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    /// Provider-observed session.
    pub session: Session,
    /// Requests in flight.
    pub pending: InFlight,
    /// Last failure, until dismissed.
    pub failure: Option<SessionFailure>,
    /// Pending one-shot notice, until shown.
    pub notice: Option<Notice>,
}
