//! Course listing reducer.

use super::client::{CourseApi, CourseError};
use super::model::Course;
use ecolesson_core::effect::Effect;
use ecolesson_core::environment::Clock;
use ecolesson_core::reducer::Reducer;
use ecolesson_core::{smallvec, DateTime, SmallVec, Utc};
use std::sync::Arc;

/// Course listing state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoursesState {
    /// Last successfully loaded page; empty after a failure.
    pub courses: Vec<Course>,
    /// A request is running.
    pub loading: bool,
    /// Last failure, until dismissed or a new load starts.
    pub error: Option<CourseError>,
    /// When `courses` was last replaced by a successful load.
    pub loaded_at: Option<DateTime<Utc>>,
    /// Bumped by [`CoursesState::discard`]; results of older loads are dropped.
    pub generation: u64,
}

impl CoursesState {
    /// Forget everything, including loads still running.
    pub fn discard(&mut self) {
        *self = Self {
            generation: self.generation.wrapping_add(1),
            ..Self::default()
        };
    }

    fn accepts(&self, generation: u64) -> bool {
        self.loading && self.generation == generation
    }
}

/// Course listing actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CourseAction {
    /// Request a (re)load. Ignored while a load is running.
    Load,
    /// Load finished.
    Loaded {
        /// Generation the load was started in.
        generation: u64,
        /// The page.
        courses: Vec<Course>,
    },
    /// Load failed.
    LoadFailed {
        /// Generation the load was started in.
        generation: u64,
        /// Cause.
        error: CourseError,
    },
    /// The failure alert was closed.
    ErrorDismissed,
}

/// Course listing dependencies.
#[derive(Clone)]
pub struct CoursesEnvironment<C> {
    /// Listing source.
    pub api: C,
    /// Stamps `loaded_at`.
    pub clock: Arc<dyn Clock>,
    /// Page to request.
    pub page: u32,
    /// Page size to request.
    pub page_size: u32,
}

impl<C> CoursesEnvironment<C> {
    /// Environment requesting `page` of `page_size` courses.
    pub fn new(api: C, clock: Arc<dyn Clock>, page: u32, page_size: u32) -> Self {
        Self {
            api,
            clock,
            page,
            page_size,
        }
    }
}

/// Course listing reducer.
#[derive(Debug, Clone)]
pub struct CoursesReducer<C> {
    _phantom: std::marker::PhantomData<C>,
}

impl<C> CoursesReducer<C> {
    /// Create a course reducer.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            _phantom: std::marker::PhantomData,
        }
    }
}

impl<C> Default for CoursesReducer<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> Reducer for CoursesReducer<C>
where
    C: CourseApi + Clone + 'static,
{
    type State = CoursesState;
    type Action = CourseAction;
    type Environment = CoursesEnvironment<C>;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            CourseAction::Load => {
                if state.loading {
                    tracing::debug!("Course load already in flight");
                    return smallvec![Effect::None];
                }
                state.loading = true;
                state.error = None;

                let api = env.api.clone();
                let (page, page_size) = (env.page, env.page_size);
                let generation = state.generation;
                smallvec![Effect::Future(Box::pin(async move {
                    Some(match api.fetch_courses(page, page_size).await {
                        Ok(courses) => CourseAction::Loaded { generation, courses },
                        Err(error) => CourseAction::LoadFailed { generation, error },
                    })
                }))]
            },

            CourseAction::Loaded { generation, .. } | CourseAction::LoadFailed { generation, .. }
                if !state.accepts(generation) =>
            {
                tracing::debug!(generation, current = state.generation, "Stale course result dropped");
                smallvec![Effect::None]
            },

            CourseAction::Loaded { courses, .. } => {
                tracing::info!(count = courses.len(), "Courses loaded");
                state.courses = courses;
                state.loading = false;
                state.loaded_at = Some(env.clock.now());
                smallvec![Effect::None]
            },

            CourseAction::LoadFailed { error, .. } => {
                tracing::warn!(%error, "Course load failed");
                state.courses.clear();
                state.loading = false;
                state.error = Some(error);
                smallvec![Effect::None]
            },

            CourseAction::ErrorDismissed => {
                state.error = None;
                smallvec![Effect::None]
            },
        }
    }
}
