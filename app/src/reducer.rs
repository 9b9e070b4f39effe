//! Root reducer.
//!
//! Composes the session, course and catalog reducers and owns navigation.
//! Child reducers run on their own state slice; their effects are lifted
//! into [`AppAction`] with [`Effect::map`].
//!
//! Navigation follows the session: after every session action the selected
//! stack is recomputed and, if it changed, the navigator is rebuilt at the
//! new root. History never survives a sign-in or sign-out.

use crate::catalog::{CatalogAction, CatalogEnvironment, CatalogKind, CatalogReducer, CatalogState};
use crate::courses::{CourseAction, CourseApi, CoursesEnvironment, CoursesReducer, CoursesState};
use crate::navigation::{select, NavigationAction, Navigator, Screen, Selection};
use crate::view::{self, Alert};
use ecolesson_auth::{IdentityProvider, SessionAction, SessionEnvironment, SessionReducer, SessionState};
use ecolesson_core::effect::Effect;
use ecolesson_core::reducer::Reducer;
use ecolesson_core::{smallvec, SmallVec};

type Effects<A> = SmallVec<[Effect<A>; 4]>;

/// Whole-application state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppState {
    /// Session slice.
    pub session: SessionState,
    /// History of the mounted stack; `None` while the session initializes.
    pub navigator: Option<Navigator>,
    /// Course listing slice.
    pub courses: CoursesState,
    /// Static catalog slice.
    pub catalog: CatalogState,
}

impl AppState {
    /// Navigation selector output for the current session.
    #[must_use]
    pub const fn selection(&self) -> Selection {
        select(&self.session.session)
    }

    /// Screen on top of the mounted stack.
    #[must_use]
    pub fn current_screen(&self) -> Option<Screen> {
        self.navigator.as_ref().map(Navigator::current)
    }
}

/// Every input of the application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppAction {
    /// Session intents, results and notifications.
    Session(SessionAction),
    /// Navigation intents.
    Navigation(NavigationAction),
    /// Course listing.
    Courses(CourseAction),
    /// Static catalog.
    Catalog(CatalogAction),
    /// The user saw this alert; clear it if it is still the one showing.
    AlertShown(Box<Alert>),
}

/// Whole-application dependencies.
#[derive(Clone)]
pub struct AppEnvironment<P, C> {
    /// Identity provider.
    pub session: SessionEnvironment<P>,
    /// Course API, clock and paging.
    pub courses: CoursesEnvironment<C>,
    /// Catalog load time.
    pub catalog: CatalogEnvironment,
}

/// Root reducer.
#[derive(Debug, Clone)]
pub struct AppReducer<P, C> {
    session: SessionReducer<P>,
    courses: CoursesReducer<C>,
    catalog: CatalogReducer,
}

impl<P, C> AppReducer<P, C> {
    /// Create the root reducer.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            session: SessionReducer::new(),
            courses: CoursesReducer::new(),
            catalog: CatalogReducer,
        }
    }
}

impl<P, C> Default for AppReducer<P, C> {
    fn default() -> Self {
        Self::new()
    }
}

fn lift<A, F>(effects: Effects<A>, f: F) -> Effects<AppAction>
where
    A: Send + 'static,
    F: Fn(A) -> AppAction + Copy + Send + Sync + 'static,
{
    effects
        .into_iter()
        .filter(|effect| !effect.is_none())
        .map(|effect| effect.map(f))
        .collect()
}

impl<P, C> AppReducer<P, C>
where
    P: IdentityProvider + Clone + 'static,
    C: CourseApi + Clone + 'static,
{
    /// Rebuild the navigator if the selected stack changed.
    fn sync_navigation(state: &mut AppState) {
        let selected = state.selection().stack();
        let mounted = state.navigator.as_ref().map(Navigator::kind);
        if selected == mounted {
            return;
        }

        tracing::info!(from = ?mounted, to = ?selected, "Switching screen stack");
        state.navigator = selected.map(Navigator::new);
        // Screens of the old stack are gone; so is their local state.
        state.courses.discard();
        state.catalog.discard();
    }

    /// Effects of a screen being mounted.
    fn enter(&self, state: &mut AppState, screen: Screen, env: &AppEnvironment<P, C>) -> Effects<AppAction> {
        let kind = match screen {
            Screen::Courses => {
                let effects = self.courses.reduce(&mut state.courses, CourseAction::Load, &env.courses);
                return lift(effects, AppAction::Courses);
            },
            Screen::Jobs => CatalogKind::Jobs,
            Screen::Companies => CatalogKind::Companies,
            Screen::Certificates => CatalogKind::Certificates,
            Screen::SignIn | Screen::SignUp | Screen::Home | Screen::Profile | Screen::About => {
                return Effects::new();
            },
        };
        let effects = self.catalog.reduce(&mut state.catalog, CatalogAction::Load(kind), &env.catalog);
        lift(effects, AppAction::Catalog)
    }

    fn navigate(
        &self,
        state: &mut AppState,
        action: NavigationAction,
        env: &AppEnvironment<P, C>,
    ) -> Effects<AppAction> {
        let Some(navigator) = state.navigator.as_mut() else {
            tracing::warn!(?action, "Navigation ignored while the session initializes");
            return Effects::new();
        };

        match action {
            NavigationAction::Push(screen) => {
                let depth = navigator.depth();
                if let Err(error) = navigator.push(screen) {
                    tracing::warn!(%error, "Navigation rejected");
                    return Effects::new();
                }
                if navigator.depth() > depth {
                    return self.enter(state, screen, env);
                }
            },
            NavigationAction::Back => {
                if !navigator.back() {
                    tracing::debug!("Already at the stack root");
                }
            },
            NavigationAction::PopToRoot => navigator.pop_to_root(),
        }
        Effects::new()
    }
}

impl<P, C> Reducer for AppReducer<P, C>
where
    P: IdentityProvider + Clone + 'static,
    C: CourseApi + Clone + 'static,
{
    type State = AppState;
    type Action = AppAction;
    type Environment = AppEnvironment<P, C>;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        let effects = match action {
            AppAction::Session(action) => {
                let account_created = matches!(action, SessionAction::SignUpCompleted { .. });
                let effects = self.session.reduce(&mut state.session, action, &env.session);
                Self::sync_navigation(state);

                // Back to the sign-in screen, where the notice is shown.
                if account_created {
                    if let Some(navigator) = state.navigator.as_mut() {
                        navigator.pop_to_root();
                    }
                }
                lift(effects, AppAction::Session)
            },

            AppAction::Navigation(action) => self.navigate(state, action, env),

            AppAction::Courses(action) => {
                let effects = self.courses.reduce(&mut state.courses, action, &env.courses);
                lift(effects, AppAction::Courses)
            },

            AppAction::Catalog(action) => {
                let effects = self.catalog.reduce(&mut state.catalog, action, &env.catalog);
                lift(effects, AppAction::Catalog)
            },

            AppAction::AlertShown(shown) => {
                if view::alert(state).as_ref() != Some(&*shown) {
                    tracing::debug!(title = shown.title, "Alert replaced before it was cleared");
                    return smallvec![Effect::None];
                }
                return self.reduce(state, shown.dismiss, env);
            },
        };

        if effects.is_empty() {
            smallvec![Effect::None]
        } else {
            effects
        }
    }
}
