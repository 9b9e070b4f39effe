//! Screen stacks and the navigation selector.
//!
//! Which stack is visible is never stored; [`select`] derives it from the
//! session each time. The [`Navigator`] only holds history inside the
//! currently selected stack and is rebuilt whenever the selection changes.

use ecolesson_auth::Session;
use std::fmt;
use thiserror::Error;

/// Every screen of the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Screen {
    /// E-mail/password sign-in.
    SignIn,
    /// Account creation.
    SignUp,
    /// Greeting and category menu.
    Home,
    /// Course listing from the REST API.
    Courses,
    /// Job openings.
    Jobs,
    /// Partner companies.
    Companies,
    /// The user's certificates.
    Certificates,
    /// Identity details and profile editing.
    Profile,
    /// Version and build metadata.
    About,
}

impl Screen {
    /// Stack the screen belongs to.
    #[must_use]
    pub const fn stack(self) -> StackKind {
        match self {
            Self::SignIn | Self::SignUp => StackKind::Unauthenticated,
            Self::Home
            | Self::Courses
            | Self::Jobs
            | Self::Companies
            | Self::Certificates
            | Self::Profile
            | Self::About => StackKind::Authenticated,
        }
    }

    /// Header title.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::SignIn => "EcoLesson",
            Self::SignUp => "Cadastre-se no EcoLesson",
            Self::Home => "Categorias",
            Self::Courses => "Cursos Disponíveis",
            Self::Jobs => "Vagas Disponíveis",
            Self::Companies => "Empresas Parceiras",
            Self::Certificates => "Meus Certificados",
            Self::Profile => "Meu Perfil",
            Self::About => "Sobre o App",
        }
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// The two screen stacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StackKind {
    /// Visible while an identity is present.
    Authenticated,
    /// Visible while no identity is present.
    Unauthenticated,
}

impl StackKind {
    /// First screen of the stack.
    #[must_use]
    pub const fn root(self) -> Screen {
        match self {
            Self::Authenticated => Screen::Home,
            Self::Unauthenticated => Screen::SignIn,
        }
    }
}

/// Output of the navigation selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// Waiting for the provider's first notification. Nothing is mounted.
    Loading,
    /// Stack rooted at [`Screen::Home`].
    Authenticated,
    /// Stack rooted at [`Screen::SignIn`].
    Unauthenticated,
}

impl Selection {
    /// Selected stack, `None` while loading.
    #[must_use]
    pub const fn stack(self) -> Option<StackKind> {
        match self {
            Self::Loading => None,
            Self::Authenticated => Some(StackKind::Authenticated),
            Self::Unauthenticated => Some(StackKind::Unauthenticated),
        }
    }
}

/// Text shown while [`Selection::Loading`].
pub const LOADING_MESSAGE: &str = "Verificando autenticação...";

/// Navigation selector.
///
/// Depends only on `session.initializing` and whether an identity is
/// present.
#[must_use]
pub const fn select(session: &Session) -> Selection {
    if session.initializing {
        Selection::Loading
    } else if session.is_authenticated() {
        Selection::Authenticated
    } else {
        Selection::Unauthenticated
    }
}

/// User navigation intents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationAction {
    /// Go to a screen of the current stack.
    Push(Screen),
    /// Go back one screen.
    Back,
    /// Return to the stack root.
    PopToRoot,
}

/// Navigation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum NavigationError {
    /// The screen is not part of the mounted stack.
    #[error("screen {screen} is not part of the {stack:?} stack")]
    WrongStack {
        /// Requested screen.
        screen: Screen,
        /// Mounted stack.
        stack: StackKind,
    },
}

/// History inside one stack.
///
/// Never empty: the first entry is the stack root and cannot be popped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigator {
    kind: StackKind,
    history: Vec<Screen>,
}

impl Navigator {
    /// Navigator showing the root of `kind`.
    #[must_use]
    pub fn new(kind: StackKind) -> Self {
        Self {
            kind,
            history: vec![kind.root()],
        }
    }

    /// Mounted stack.
    #[must_use]
    pub const fn kind(&self) -> StackKind {
        self.kind
    }

    /// Screen on top.
    #[must_use]
    pub fn current(&self) -> Screen {
        self.history.last().copied().unwrap_or(self.kind.root())
    }

    /// Number of screens in history, root included.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.history.len()
    }

    /// Whether [`Navigator::back`] would do anything.
    #[must_use]
    pub fn can_go_back(&self) -> bool {
        self.history.len() > 1
    }

    /// Go to `screen`.
    ///
    /// A screen already in history is returned to (the screens above it are
    /// dropped) instead of being pushed a second time.
    ///
    /// # Errors
    ///
    /// Returns [`NavigationError::WrongStack`] if `screen` belongs to the
    /// other stack; history is left untouched.
    pub fn push(&mut self, screen: Screen) -> Result<(), NavigationError> {
        if screen.stack() != self.kind {
            return Err(NavigationError::WrongStack {
                screen,
                stack: self.kind,
            });
        }
        match self.history.iter().position(|s| *s == screen) {
            Some(index) => self.history.truncate(index + 1),
            None => self.history.push(screen),
        }
        Ok(())
    }

    /// Pop the top screen. Returns `false` at the root.
    pub fn back(&mut self) -> bool {
        if self.can_go_back() {
            self.history.pop();
            true
        } else {
            false
        }
    }

    /// Drop everything above the root.
    pub fn pop_to_root(&mut self) {
        self.history.truncate(1);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use ecolesson_auth::Identity;
    use proptest::prelude::*;

    #[test]
    fn test_navigator_starts_at_root() {
        let auth = Navigator::new(StackKind::Authenticated);
        assert_eq!(auth.current(), Screen::Home);
        assert_eq!(auth.depth(), 1);
        assert!(!auth.can_go_back());

        let guest = Navigator::new(StackKind::Unauthenticated);
        assert_eq!(guest.current(), Screen::SignIn);
    }

    #[test]
    fn test_push_and_back() {
        let mut nav = Navigator::new(StackKind::Authenticated);
        nav.push(Screen::Companies).unwrap();
        nav.push(Screen::Jobs).unwrap();
        assert_eq!(nav.current(), Screen::Jobs);
        assert_eq!(nav.depth(), 3);

        assert!(nav.back());
        assert_eq!(nav.current(), Screen::Companies);
        assert!(nav.back());
        assert!(!nav.back());
        assert_eq!(nav.current(), Screen::Home);
    }

    #[test]
    fn test_push_existing_screen_returns_to_it() {
        let mut nav = Navigator::new(StackKind::Authenticated);
        nav.push(Screen::Jobs).unwrap();
        nav.push(Screen::Companies).unwrap();
        nav.push(Screen::Jobs).unwrap();
        assert_eq!(nav.depth(), 2);

        nav.push(Screen::Home).unwrap();
        assert_eq!(nav.depth(), 1);
    }

    #[test]
    fn test_push_other_stack_is_rejected() {
        let mut nav = Navigator::new(StackKind::Unauthenticated);
        let error = nav.push(Screen::Home).unwrap_err();
        assert_eq!(
            error,
            NavigationError::WrongStack {
                screen: Screen::Home,
                stack: StackKind::Unauthenticated
            }
        );
        assert_eq!(nav.current(), Screen::SignIn);
    }

    #[test]
    fn test_pop_to_root() {
        let mut nav = Navigator::new(StackKind::Unauthenticated);
        nav.push(Screen::SignUp).unwrap();
        nav.pop_to_root();
        assert_eq!(nav.current(), Screen::SignIn);
        assert_eq!(nav.depth(), 1);
    }

    #[test]
    fn test_select() {
        assert_eq!(select(&Session::default()), Selection::Loading);
        assert_eq!(
            select(&Session {
                identity: None,
                initializing: false
            }),
            Selection::Unauthenticated
        );
        assert_eq!(
            select(&Session {
                identity: Some(Identity::new("u1")),
                initializing: false
            }),
            Selection::Authenticated
        );
        // A notification can never arrive with initializing still set, but
        // the selector must not mount anything in that case either.
        assert_eq!(
            select(&Session {
                identity: Some(Identity::new("u1")),
                initializing: true
            }),
            Selection::Loading
        );
    }

    fn arb_identity() -> impl Strategy<Value = Option<Identity>> {
        proptest::option::of(
            ("[a-z0-9]{1,12}", proptest::option::of("[A-Za-z ]{0,12}"), proptest::option::of("[a-z]{1,6}@eco\\.com"))
                .prop_map(|(id, name, email)| Identity {
                    id: ecolesson_auth::UserId::new(id),
                    display_name: name,
                    email,
                }),
        )
    }

    proptest! {
        #[test]
        fn prop_selection_depends_only_on_flags(
            a in arb_identity(),
            b in arb_identity(),
            initializing in any::<bool>(),
        ) {
            let first = Session { identity: a.clone(), initializing };
            let second = Session { identity: b.clone(), initializing };

            if a.is_some() == b.is_some() {
                prop_assert_eq!(select(&first), select(&second));
            }
            prop_assert_eq!(select(&first), select(&first.clone()));
            prop_assert_eq!(select(&first).stack().is_none(), initializing);
        }

        #[test]
        fn prop_navigator_never_leaves_its_stack(
            pushes in proptest::collection::vec(0usize..9, 0..30),
            backs in proptest::collection::vec(any::<bool>(), 0..30),
        ) {
            const ALL: [Screen; 9] = [
                Screen::SignIn, Screen::SignUp, Screen::Home, Screen::Courses, Screen::Jobs,
                Screen::Companies, Screen::Certificates, Screen::Profile, Screen::About,
            ];
            let mut nav = Navigator::new(StackKind::Authenticated);
            for (index, back) in pushes.into_iter().zip(backs) {
                let _ = nav.push(ALL[index]);
                if back {
                    nav.back();
                }
                prop_assert_eq!(nav.current().stack(), StackKind::Authenticated);
                prop_assert!(nav.depth() >= 1);
            }
        }
    }
}
