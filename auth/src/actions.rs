//! Session actions.

use crate::error::{AuthError, Operation};
use crate::identity::Identity;

/// Everything the session reducer reacts to.
///
/// `*Requested` actions come from the user; the rest are produced by
/// effects or by the [`SessionObserver`](crate::observer::SessionObserver).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionAction {
    /// Provider notification (the only writer of the session identity).
    IdentityChanged(Option<Identity>),

    /// Submit the sign-up form.
    SignUpRequested {
        /// Display name
        name: String,
        /// E-mail
        email: String,
        /// Password
        password: String,
    },
    /// Account created and named.
    SignUpCompleted {
        /// The new account
        identity: Identity,
    },
    /// Sign-up failed.
    SignUpFailed {
        /// Cause
        error: AuthError,
    },

    /// Submit the sign-in form.
    SignInRequested {
        /// E-mail
        email: String,
        /// Password
        password: String,
    },
    /// The provider accepted the credentials.
    ///
    /// The session switches when the matching notification arrives, not here.
    SignInSettled {
        /// Identity returned by the provider
        identity: Identity,
    },
    /// Sign-in failed.
    SignInFailed {
        /// Cause
        error: AuthError,
    },

    /// Tap on "sign out".
    SignOutRequested,
    /// The provider ended the session and reports no identity.
    SignOutCompleted,
    /// Sign-out failed or could not be verified.
    SignOutFailed {
        /// Cause
        error: AuthError,
    },

    /// Save a new display name.
    ProfileUpdateRequested {
        /// New display name
        name: String,
    },
    /// The provider saved the name.
    ProfileUpdated,
    /// Profile update failed.
    ProfileUpdateFailed {
        /// Cause
        error: AuthError,
    },

    /// The pending notice was displayed; drop it.
    NoticeShown,
    /// The failure alert was closed.
    ErrorDismissed,
}

impl SessionAction {
    /// Operation a user request starts; `None` for results and notifications.
    #[must_use]
    pub const fn requested_operation(&self) -> Option<Operation> {
        match self {
            Self::SignUpRequested { .. } => Some(Operation::SignUp),
            Self::SignInRequested { .. } => Some(Operation::SignIn),
            Self::SignOutRequested => Some(Operation::SignOut),
            Self::ProfileUpdateRequested { .. } => Some(Operation::ProfileUpdate),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_user_requests_start_an_operation() {
        assert_eq!(
            SessionAction::SignOutRequested.requested_operation(),
            Some(Operation::SignOut)
        );
        assert_eq!(
            SessionAction::ProfileUpdateRequested { name: "Ana".into() }.requested_operation(),
            Some(Operation::ProfileUpdate)
        );
        assert_eq!(SessionAction::SignOutCompleted.requested_operation(), None);
        assert_eq!(SessionAction::IdentityChanged(None).requested_operation(), None);
    }
}
