//! Authenticated identity model.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Provider-assigned unique identifier of a user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(pub String);

impl UserId {
    /// Wrap a provider identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An authenticated user as reported by the identity provider.
///
/// Opaque to the session core apart from presence; screens read the
/// optional fields for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Unique id.
    pub id: UserId,
    /// Display name, if the user set one.
    pub display_name: Option<String>,
    /// E-mail, if known.
    pub email: Option<String>,
}

impl Identity {
    /// Create an identity with no optional fields.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: UserId::new(id),
            display_name: None,
            email: None,
        }
    }

    /// Set the e-mail.
    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Set the display name.
    #[must_use]
    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    /// Name used in greetings: the e-mail local part, capitalized.
    ///
    /// Falls back to `"Usuário"` when there is no usable e-mail.
    #[must_use]
    pub fn greeting_name(&self) -> String {
        let local = self
            .email
            .as_deref()
            .and_then(|email| email.split('@').next())
            .unwrap_or_default();

        let mut chars = local.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => "Usuário".to_string(),
        }
    }

    /// Single uppercase letter for the avatar.
    ///
    /// Display name first, then e-mail, then `'U'`.
    #[must_use]
    pub fn avatar_initial(&self) -> String {
        [self.display_name.as_deref(), self.email.as_deref()]
            .into_iter()
            .flatten()
            .find_map(|value| value.chars().next())
            .map_or_else(|| "U".to_string(), |c| c.to_uppercase().collect())
    }
}
