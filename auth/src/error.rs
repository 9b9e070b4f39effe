//! Error types for identity provider and session operations.

use thiserror::Error;

/// Result type alias for session operations.
pub type Result<T> = std::result::Result<T, AuthError>;

/// Failure kinds reported by an identity provider.
///
/// Providers speak in their own codes; [`ProviderErrorKind::from_code`]
/// folds them into this fixed table so the user always sees one of a
/// handful of messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderErrorKind {
    /// An account already exists for the e-mail.
    EmailAlreadyInUse,
    /// The e-mail is not syntactically valid.
    InvalidEmailFormat,
    /// The password does not meet the provider's strength rules.
    WeakCredential,
    /// Wrong e-mail/password combination (or unknown account).
    InvalidCredentials,
    /// Anything else (network, quota, disabled account, ...).
    Unknown,
}

impl ProviderErrorKind {
    /// Map a provider error code to a kind.
    ///
    /// Accepts SDK-style codes (`auth/email-already-in-use`) and REST
    /// codes, including REST messages carrying a suffix such as
    /// `WEAK_PASSWORD : Password should be at least 6 characters`.
    #[must_use]
    pub fn from_code(code: &str) -> Self {
        let code = code.trim();
        let head = code.split([' ', ':']).next().unwrap_or(code);

        match head {
            "auth/email-already-in-use" | "EMAIL_EXISTS" => Self::EmailAlreadyInUse,
            "auth/invalid-email" | "INVALID_EMAIL" | "MISSING_EMAIL" => Self::InvalidEmailFormat,
            "auth/weak-password" | "WEAK_PASSWORD" => Self::WeakCredential,
            "auth/invalid-credential"
            | "auth/invalid-login-credentials"
            | "auth/user-not-found"
            | "auth/wrong-password"
            | "EMAIL_NOT_FOUND"
            | "INVALID_PASSWORD"
            | "INVALID_LOGIN_CREDENTIALS" => Self::InvalidCredentials,
            _ => Self::Unknown,
        }
    }
}

/// Error reported by an identity provider.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{kind:?}: {message}")]
pub struct ProviderError {
    /// Classified kind.
    pub kind: ProviderErrorKind,
    /// Provider's own description, for logs.
    pub message: String,
}

impl ProviderError {
    /// Create a provider error.
    #[must_use]
    pub fn new(kind: ProviderErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Create a provider error by classifying a raw provider code.
    #[must_use]
    pub fn from_code(code: &str) -> Self {
        Self::new(ProviderErrorKind::from_code(code), code)
    }

    /// Create an [`ProviderErrorKind::Unknown`] error.
    #[must_use]
    pub fn unknown(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Unknown, message)
    }
}

/// The user-initiated session operation a failure belongs to.
///
/// Generic fallback messages depend on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Account creation plus display-name update.
    SignUp,
    /// E-mail/password authentication.
    SignIn,
    /// Session termination.
    SignOut,
    /// Display-name change.
    ProfileUpdate,
}

impl Operation {
    /// Message shown when the operation fails for an unclassified reason.
    #[must_use]
    pub const fn fallback_message(self) -> &'static str {
        match self {
            Self::SignUp => "Erro durante o cadastro. Tente novamente.",
            Self::SignIn => "Não foi possível fazer login. Tente novamente.",
            Self::SignOut => "Não foi possível fazer logout",
            Self::ProfileUpdate => "Não foi possível atualizar o perfil.",
        }
    }
}

/// Error taxonomy for session operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    // ═══════════════════════════════════════════════════════════
    // Validation Errors (never reach the provider)
    // ═══════════════════════════════════════════════════════════
    /// A required form field was empty after trimming.
    #[error("Required field is empty: {field}")]
    MissingField {
        /// Name of the first empty field
        field: &'static str,
    },

    // ═══════════════════════════════════════════════════════════
    // Provider Errors
    // ═══════════════════════════════════════════════════════════
    /// The identity provider rejected the request.
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    // ═══════════════════════════════════════════════════════════
    // Session Errors
    // ═══════════════════════════════════════════════════════════
    /// The operation needs an authenticated identity and there is none.
    #[error("No authenticated user")]
    NoAuthenticatedUser,

    /// Sign-out succeeded but the provider still reports an identity.
    #[error("Sign-out could not be verified: provider still reports user {user_id}")]
    SignOutUnverified {
        /// Identity the provider still reports
        user_id: String,
    },
}

impl AuthError {
    /// User-facing (Portuguese) message for this error in the context of `operation`.
    #[must_use]
    pub const fn user_message(&self, operation: Operation) -> &'static str {
        match self {
            Self::MissingField { .. } => match operation {
                Operation::SignIn => "Por favor, preencha e-mail e senha.",
                _ => "Por favor, preencha todos os campos.",
            },
            Self::Provider(error) => match error.kind {
                ProviderErrorKind::EmailAlreadyInUse => "Este e-mail já está em uso.",
                ProviderErrorKind::InvalidEmailFormat => "O formato do e-mail é inválido.",
                ProviderErrorKind::WeakCredential => "A senha deve ter pelo menos 6 caracteres.",
                ProviderErrorKind::InvalidCredentials => {
                    "Credenciais inválidas. Verifique seu e-mail e senha."
                },
                ProviderErrorKind::Unknown => operation.fallback_message(),
            },
            Self::NoAuthenticatedUser => "Nenhum usuário autenticado.",
            Self::SignOutUnverified { .. } => {
                "Não foi possível confirmar o logout. Reinicie o aplicativo."
            },
        }
    }
}
