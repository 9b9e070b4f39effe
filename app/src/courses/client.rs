//! Course listing REST client.

use super::model::{parse_course_listing, Course};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::Client;
use std::future::Future;
use thiserror::Error;

/// Characters of an error body kept in [`CourseError::Status`].
const ERROR_BODY_LIMIT: usize = 200;

/// Course listing failures. Both kinds are retryable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CourseError {
    /// The backend answered with a non-success status.
    #[error("Erro {status}: {reason}\n{body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Canonical reason phrase.
        reason: String,
        /// Start of the response body.
        body: String,
    },

    /// The backend could not be reached or the body could not be read.
    #[error("{0}")]
    Transport(String),
}

impl CourseError {
    /// Alert text for the course screen.
    #[must_use]
    pub fn user_message(&self) -> String {
        let mut message = format!("Não foi possível carregar os cursos.\n\n{self}");
        if matches!(self, Self::Transport(_)) {
            message.push_str("\n\nVerifique se a API está rodando e acessível.");
        }
        message
    }
}

/// Source of course listings.
pub trait CourseApi: Send + Sync {
    /// Fetch one page of courses.
    ///
    /// # Errors
    ///
    /// Returns [`CourseError`] on transport failure or non-success status.
    /// A body that is empty or not a course listing is not an error.
    fn fetch_courses(
        &self,
        page: u32,
        page_size: u32,
    ) -> impl Future<Output = Result<Vec<Course>, CourseError>> + Send;
}

/// [`CourseApi`] over HTTP.
#[derive(Debug, Clone)]
pub struct HttpCourseApi {
    client: Client,
    base_url: String,
}

impl HttpCourseApi {
    /// Client for the API at `base_url` (e.g. `http://localhost:5030/api/v1`).
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Listing endpoint.
    #[must_use]
    pub fn courses_url(&self) -> String {
        format!("{}/cursos", self.base_url)
    }
}

impl CourseApi for HttpCourseApi {
    async fn fetch_courses(&self, page: u32, page_size: u32) -> Result<Vec<Course>, CourseError> {
        let url = self.courses_url();
        tracing::debug!(%url, page, page_size, "Fetching courses");

        let response = self
            .client
            .get(&url)
            .query(&[("page", page), ("pageSize", page_size)])
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(|e| CourseError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| CourseError::Transport(e.to_string()))?;

        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "Course listing request failed");
            return Err(CourseError::Status {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or_default().to_string(),
                body: body.chars().take(ERROR_BODY_LIMIT).collect(),
            });
        }

        let courses = parse_course_listing(&body);
        tracing::debug!(count = courses.len(), "Courses received");
        Ok(courses)
    }
}
