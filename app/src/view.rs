//! Screen view-models.
//!
//! [`render`] is a pure function of [`AppState`]: it returns what the
//! mounted screen shows and, at most, one alert. Every alert carries the
//! action that clears it; [`EcoLesson::render`](crate::app::EcoLesson::render)
//! dispatches [`Alert::shown`] so an alert is shown once.

use crate::build_info::BuildInfo;
use crate::catalog::{CatalogAction, CatalogState, Certificate, Company, Job, Listing};
use crate::courses::{Course, CourseAction, CoursesState};
use crate::navigation::{Screen, Selection, LOADING_MESSAGE};
use crate::reducer::{AppAction, AppState};
use ecolesson_auth::{Identity, Operation, SessionAction, SessionState};

/// Placeholder for missing profile fields.
pub const NOT_INFORMED: &str = "Não informado";

/// One entry of the home menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuEntry {
    /// Category title.
    pub title: &'static str,
    /// Count label under the title.
    pub count: &'static str,
    /// Screen opened by the entry.
    pub screen: Screen,
}

/// Home menu, in display order.
pub const HOME_MENU: [MenuEntry; 4] = [
    MenuEntry {
        title: "Cursos",
        count: "5+ Cursos",
        screen: Screen::Courses,
    },
    MenuEntry {
        title: "Vagas",
        count: "10+ Vagas",
        screen: Screen::Jobs,
    },
    MenuEntry {
        title: "Empresas",
        count: "8+ Empresas",
        screen: Screen::Companies,
    },
    MenuEntry {
        title: "Certificados",
        count: "Meus Certificados",
        screen: Screen::Certificates,
    },
];

/// A course card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseCard {
    /// Course id.
    pub id: i64,
    /// Course name.
    pub name: String,
    /// Number of videos.
    pub video_count: u32,
    /// Workload label.
    pub hours: String,
}

impl From<&Course> for CourseCard {
    fn from(course: &Course) -> Self {
        Self {
            id: course.id,
            name: course.name.clone(),
            video_count: course.video_count(),
            hours: course.hours_label(),
        }
    }
}

/// Course screen body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoursesView {
    /// Request running.
    Loading,
    /// Nothing to show; offers a retry.
    Empty {
        /// Empty-state text.
        message: &'static str,
        /// Action of the retry button.
        retry: AppAction,
    },
    /// Course cards.
    List(Vec<CourseCard>),
}

/// Body of a static list screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListView<T: 'static> {
    /// Simulated load running.
    Loading {
        /// Loading text.
        message: &'static str,
    },
    /// No items.
    Empty {
        /// Empty-state text.
        message: &'static str,
    },
    /// Items.
    List(&'static [T]),
}

impl<T: 'static> ListView<T> {
    fn of(listing: &Listing<T>, loading: &'static str, empty: &'static str) -> Self {
        match listing {
            Listing::NotLoaded | Listing::Loading => Self::Loading { message: loading },
            Listing::Loaded([]) => Self::Empty { message: empty },
            Listing::Loaded(items) => Self::List(*items),
        }
    }
}

/// Profile screen fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileView {
    /// Avatar letter.
    pub avatar_initial: String,
    /// Display name or [`NOT_INFORMED`].
    pub name: String,
    /// E-mail or [`NOT_INFORMED`].
    pub email: String,
    /// Provider id.
    pub user_id: String,
    /// A name change is being saved.
    pub saving: bool,
    /// A sign-out is running.
    pub signing_out: bool,
}

/// What the mounted screen shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScreenView {
    /// Session still initializing; no screen is mounted.
    Loading {
        /// Loading text.
        message: &'static str,
    },
    /// Sign-in form.
    SignIn {
        /// Request running; the submit button is disabled.
        submitting: bool,
    },
    /// Sign-up form.
    SignUp {
        /// Request running; the submit button is disabled.
        submitting: bool,
    },
    /// Greeting and menu.
    Home {
        /// `"Olá, <name>,"`.
        greeting: String,
        /// Subtitle under the greeting.
        subtitle: &'static str,
        /// Avatar letter.
        avatar_initial: String,
        /// Category menu.
        menu: &'static [MenuEntry],
    },
    /// Course listing.
    Courses(CoursesView),
    /// Job openings.
    Jobs(ListView<Job>),
    /// Partner companies.
    Companies(ListView<Company>),
    /// Certificates.
    Certificates(ListView<Certificate>),
    /// Profile.
    Profile(ProfileView),
    /// Build metadata.
    About(BuildInfo),
}

/// A modal message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    /// Title.
    pub title: &'static str,
    /// Body.
    pub message: String,
    /// Action that clears the alert's source.
    pub dismiss: AppAction,
}

impl Alert {
    /// Close this alert, and only this one.
    ///
    /// Unlike [`Alert::dismiss`], the action is ignored if a different alert
    /// is showing by the time it is reduced.
    #[must_use]
    pub fn shown(&self) -> AppAction {
        AppAction::AlertShown(Box::new(self.clone()))
    }
}

/// One rendered frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Mounted screen, `None` while loading.
    pub screen: Option<Screen>,
    /// Screen header title.
    pub title: Option<&'static str>,
    /// Screen body.
    pub view: ScreenView,
    /// Alert to present over the screen.
    pub alert: Option<Alert>,
    /// Whether a back button is shown.
    pub can_go_back: bool,
}

/// Render the application state.
#[must_use]
pub fn render(state: &AppState) -> Frame {
    let (Selection::Authenticated | Selection::Unauthenticated, Some(navigator)) =
        (state.selection(), state.navigator.as_ref())
    else {
        return Frame {
            screen: None,
            title: None,
            view: ScreenView::Loading {
                message: LOADING_MESSAGE,
            },
            alert: None,
            can_go_back: false,
        };
    };

    let screen = navigator.current();
    Frame {
        screen: Some(screen),
        title: Some(screen.title()),
        view: screen_view(state, screen),
        alert: alert(state),
        can_go_back: navigator.can_go_back(),
    }
}

fn screen_view(state: &AppState, screen: Screen) -> ScreenView {
    let session = &state.session;
    let identity = session.session.identity.as_ref();
    match screen {
        Screen::SignIn => ScreenView::SignIn {
            submitting: session.pending.sign_in,
        },
        Screen::SignUp => ScreenView::SignUp {
            submitting: session.pending.sign_up,
        },
        Screen::Home => ScreenView::Home {
            greeting: format!("Olá, {},", identity.map_or_else(|| "Usuário".to_string(), Identity::greeting_name)),
            subtitle: "O que você gostaria de aprender hoje?",
            avatar_initial: identity.map_or_else(|| "U".to_string(), Identity::avatar_initial),
            menu: &HOME_MENU,
        },
        Screen::Courses => ScreenView::Courses(courses_view(&state.courses)),
        Screen::Jobs => ScreenView::Jobs(ListView::of(
            &state.catalog.jobs,
            "Carregando vagas...",
            "Nenhuma vaga disponível",
        )),
        Screen::Companies => ScreenView::Companies(ListView::of(
            &state.catalog.companies,
            "Carregando empresas...",
            "Nenhuma empresa cadastrada",
        )),
        Screen::Certificates => ScreenView::Certificates(ListView::of(
            &state.catalog.certificates,
            "Carregando certificados...",
            "Você ainda não possui certificados",
        )),
        Screen::Profile => ScreenView::Profile(profile_view(session, identity)),
        Screen::About => ScreenView::About(BuildInfo::current()),
    }
}

fn courses_view(courses: &CoursesState) -> CoursesView {
    if courses.loading {
        CoursesView::Loading
    } else if courses.courses.is_empty() {
        CoursesView::Empty {
            message: "Nenhum curso disponível",
            retry: AppAction::Courses(CourseAction::Load),
        }
    } else {
        CoursesView::List(courses.courses.iter().map(CourseCard::from).collect())
    }
}

fn profile_view(session: &SessionState, identity: Option<&Identity>) -> ProfileView {
    let field = |value: Option<&String>| value.map_or(NOT_INFORMED, String::as_str).to_string();
    ProfileView {
        avatar_initial: identity.map_or_else(|| "U".to_string(), Identity::avatar_initial),
        name: field(identity.and_then(|i| i.display_name.as_ref())),
        email: field(identity.and_then(|i| i.email.as_ref())),
        user_id: identity.map_or_else(|| "Não disponível".to_string(), |i| i.id.to_string()),
        saving: session.pending.profile_update,
        signing_out: session.pending.sign_out,
    }
}

/// Pick the alert to show: failures before notices, session before screens.
pub(crate) fn alert(state: &AppState) -> Option<Alert> {
    if let Some(failure) = &state.session.failure {
        let title = match failure.operation {
            Operation::SignIn => "Erro de Login",
            Operation::SignUp | Operation::SignOut | Operation::ProfileUpdate => "Erro",
        };
        return Some(Alert {
            title,
            message: failure.user_message().to_string(),
            dismiss: AppAction::Session(SessionAction::ErrorDismissed),
        });
    }
    if let Some(error) = &state.courses.error {
        return Some(Alert {
            title: "Erro ao carregar cursos",
            message: error.user_message(),
            dismiss: AppAction::Courses(CourseAction::ErrorDismissed),
        });
    }
    if let Some(notice) = state.session.notice {
        return Some(Alert {
            title: "Sucesso",
            message: notice.message().to_string(),
            dismiss: AppAction::Session(SessionAction::NoticeShown),
        });
    }
    catalog_alert(&state.catalog)
}

fn catalog_alert(catalog: &CatalogState) -> Option<Alert> {
    catalog.notice.map(|notice| Alert {
        title: "Sucesso",
        message: notice.message().to_string(),
        dismiss: AppAction::Catalog(CatalogAction::NoticeShown),
    })
}
