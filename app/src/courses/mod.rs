//! Course listing feature.
//!
//! Courses come from the REST backend (`GET <base>/cursos`). A failed load
//! empties the list and keeps the error until the user retries or dismisses
//! it; the screen always offers a retry when the list is empty.

pub mod client;
pub mod model;
pub mod reducer;

pub use client::{CourseApi, CourseError, HttpCourseApi};
pub use model::{parse_course_listing, Course};
pub use reducer::{CourseAction, CoursesEnvironment, CoursesReducer, CoursesState};
