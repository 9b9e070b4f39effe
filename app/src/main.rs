//! EcoLesson demo binary
//!
//! Walks through the session lifecycle against the configured identity
//! provider (Firebase when `ECOLESSON_FIREBASE_API_KEY` is set, otherwise
//! an in-memory provider) and prints every rendered screen.

use anyhow::Context;
use ecolesson::catalog::{CatalogAction, Listing};
use ecolesson::view::{CoursesView, ListView};
use ecolesson::{
    AppAction, AppConfig, CourseApi, EcoLesson, Frame, HttpCourseApi, NavigationAction, Screen,
    ScreenView,
};
use ecolesson_auth::mocks::InMemoryIdentityProvider;
use ecolesson_auth::{FirebaseIdentityProvider, IdentityProvider, SessionAction};
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEMO_NAME: &str = "Demo EcoLesson";
const DEMO_EMAIL: &str = "demo@ecolesson.com";
const DEMO_PASSWORD: &str = "ecolesson123";

/// Upper bound for any single step of the walkthrough.
const STEP_TIMEOUT: Duration = Duration::from_secs(15);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env().context("invalid configuration")?;
    let api = HttpCourseApi::new(&config.api_base_url);

    println!("=== EcoLesson ===\n");

    match config.firebase.clone() {
        Some(firebase) => {
            println!("Identity provider: Firebase ({})", firebase.endpoint);
            let provider = FirebaseIdentityProvider::new(firebase)?;
            walkthrough(&config, provider, api).await
        },
        None => {
            println!("Identity provider: in-memory");
            walkthrough(&config, InMemoryIdentityProvider::new(), api).await
        },
    }
}

async fn walkthrough<P, C>(config: &AppConfig, provider: P, api: C) -> anyhow::Result<()>
where
    P: IdentityProvider + Clone + 'static,
    C: CourseApi + Clone + 'static,
{
    let app = EcoLesson::start(config, provider, api);

    app.wait_for(|s| !s.session.session.initializing, STEP_TIMEOUT)
        .await
        .context("identity provider never reported a session")?;
    show(&app, "Startup").await?;

    // Sign-up, then back on the sign-in screen with a notice
    if app.session().await.identity.is_none() {
        navigate(&app, NavigationAction::Push(Screen::SignUp)).await?;
        show(&app, "Sign-up form").await?;
        app.dispatch_and_wait(AppAction::Session(SessionAction::SignUpRequested {
            name: DEMO_NAME.into(),
            email: DEMO_EMAIL.into(),
            password: DEMO_PASSWORD.into(),
        }))
        .await?;
        show(&app, "After sign-up").await?;

        app.dispatch_and_wait(AppAction::Session(SessionAction::SignInRequested {
            email: DEMO_EMAIL.into(),
            password: DEMO_PASSWORD.into(),
        }))
        .await?;
        if app
            .wait_for(|s| s.session.session.identity.is_some(), STEP_TIMEOUT)
            .await
            .is_err()
        {
            show(&app, "Sign-in failed").await?;
            return Ok(app.shutdown(STEP_TIMEOUT).await?);
        }
    }
    show(&app, "Signed in").await?;

    navigate(&app, NavigationAction::Push(Screen::Courses)).await?;
    show(&app, "Courses").await?;

    navigate(&app, NavigationAction::Back).await?;
    navigate(&app, NavigationAction::Push(Screen::Jobs)).await?;
    app.wait_for(|s| matches!(s.catalog.jobs, Listing::Loaded(_)), STEP_TIMEOUT)
        .await?;
    show(&app, "Jobs").await?;
    app.dispatch_and_wait(AppAction::Catalog(CatalogAction::ApplyToJob { job_id: 1 }))
        .await?;
    show(&app, "Applied to a job").await?;

    navigate(&app, NavigationAction::PopToRoot).await?;
    navigate(&app, NavigationAction::Push(Screen::Profile)).await?;
    app.dispatch_and_wait(AppAction::Session(SessionAction::ProfileUpdateRequested {
        name: DEMO_NAME.into(),
    }))
    .await?;
    show(&app, "Profile").await?;

    navigate(&app, NavigationAction::Push(Screen::About)).await?;
    show(&app, "About").await?;

    app.dispatch_and_wait(AppAction::Session(SessionAction::SignOutRequested))
        .await?;
    app.wait_for(|s| s.session.session.identity.is_none(), STEP_TIMEOUT)
        .await
        .context("sign-out was never observed")?;
    show(&app, "Signed out").await?;

    app.shutdown(STEP_TIMEOUT).await?;
    println!("\n=== Done ===");
    Ok(())
}

async fn navigate<P, C>(app: &EcoLesson<P, C>, action: NavigationAction) -> anyhow::Result<()>
where
    P: IdentityProvider + Clone + 'static,
    C: CourseApi + Clone + 'static,
{
    println!("\n>>> {action:?}");
    app.dispatch_and_wait(AppAction::Navigation(action)).await?;
    Ok(())
}

async fn show<P, C>(app: &EcoLesson<P, C>, label: &str) -> anyhow::Result<()>
where
    P: IdentityProvider + Clone + 'static,
    C: CourseApi + Clone + 'static,
{
    let frame = app.render().await?;
    println!("\n--- {label} ---");
    print_frame(&frame);
    Ok(())
}

fn print_frame(frame: &Frame) {
    if let Some(title) = frame.title {
        println!("[{title}]{}", if frame.can_go_back { "  ← Voltar" } else { "" });
    }

    match &frame.view {
        ScreenView::Loading { message } => println!("{message}"),
        ScreenView::SignIn { submitting } => println!("Usuário / Senha  [Entrar{}]", busy(*submitting)),
        ScreenView::SignUp { submitting } => {
            println!("Nome Completo / E-mail / Senha  [Cadastrar{}]", busy(*submitting));
        },
        ScreenView::Home {
            greeting,
            subtitle,
            menu,
            ..
        } => {
            println!("{greeting}\n{subtitle}");
            for entry in *menu {
                println!("  • {} ({})", entry.title, entry.count);
            }
        },
        ScreenView::Courses(CoursesView::Loading) => println!("Carregando cursos..."),
        ScreenView::Courses(CoursesView::Empty { message, .. }) => {
            println!("{message}  [Tentar Novamente]");
        },
        ScreenView::Courses(CoursesView::List(cards)) => {
            for card in cards {
                println!("  • {} - {} vídeos, {}", card.name, card.video_count, card.hours);
            }
        },
        ScreenView::Jobs(list) => print_list(list, |job| {
            format!("{} - {} ({})", job.title, job.company, job.salary_label())
        }),
        ScreenView::Companies(list) => print_list(list, |company| {
            format!("{} - CNPJ: {}", company.name, company.cnpj)
        }),
        ScreenView::Certificates(list) => print_list(list, |certificate| {
            format!("{} - {}", certificate.course_name, certificate.issued_on_label())
        }),
        ScreenView::Profile(profile) => {
            println!("Nome: {}\nE-mail: {}\nID do Usuário: {}", profile.name, profile.email, profile.user_id);
        },
        ScreenView::About(info) => {
            println!(
                "{} {}\nHash do Commit: {}\nData do Build: {}",
                info.app_name,
                info.version,
                info.short_hash(),
                info.build_date
            );
        },
    }

    if let Some(alert) = &frame.alert {
        println!("(!) {}: {}", alert.title, alert.message);
    }
}

fn print_list<T: 'static>(list: &ListView<T>, line: impl Fn(&T) -> String) {
    match list {
        ListView::Loading { message } | ListView::Empty { message } => println!("{message}"),
        ListView::List(items) => {
            for item in *items {
                println!("  • {}", line(item));
            }
        },
    }
}

const fn busy(submitting: bool) -> &'static str {
    if submitting { "…" } else { "" }
}
