//! Course records and tolerant parsing of the listing payload.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Placeholder name some backends return for unnamed records.
const PLACEHOLDER_NAME: &str = "string";

/// A course as shown in the listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    /// Backend id.
    pub id: i64,
    /// Course name, never blank.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Workload in hours, if the backend reports one.
    pub hours: Option<u32>,
}

impl Course {
    /// Number of videos shown on the card.
    ///
    /// Derived from the id so it is stable across loads; always in `5..=30`.
    #[must_use]
    pub fn video_count(&self) -> u32 {
        let seed = i128::from(self.id) * 7 + 13;
        // rem_euclid keeps negative ids in range
        let offset = u32::try_from(seed.rem_euclid(26)).unwrap_or_default();
        offset + 5
    }

    /// Workload label, `"0h"` when unknown.
    #[must_use]
    pub fn hours_label(&self) -> String {
        match self.hours {
            Some(hours) if hours > 0 => format!("{hours}h"),
            _ => "0h".to_string(),
        }
    }
}

/// Parse a course listing body.
///
/// Accepts `{"data": [...]}` and, when that yields nothing, a bare
/// top-level array. Anything unparseable yields an empty list. Records
/// without a numeric id, or whose name is blank or the `"string"`
/// placeholder, are dropped.
#[must_use]
pub fn parse_course_listing(body: &str) -> Vec<Course> {
    let Ok(payload) = serde_json::from_str::<Value>(body) else {
        tracing::debug!("Course listing body is not JSON, treating as empty");
        return Vec::new();
    };

    let records = match &payload {
        Value::Object(map) => map.get("data").and_then(Value::as_array),
        Value::Array(items) => Some(items),
        _ => None,
    };

    records
        .map(|items| items.iter().filter_map(course_from_record).collect())
        .unwrap_or_default()
}

fn course_from_record(record: &Value) -> Option<Course> {
    let id = first_of(record, &["idCurso", "id"]).and_then(Value::as_i64)?;
    let name = first_of(record, &["nomeCurso", "nome"])
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|name| !name.is_empty() && !name.eq_ignore_ascii_case(PLACEHOLDER_NAME))?;
    let description = record
        .get("descricao")
        .and_then(Value::as_str)
        .map(ToString::to_string);
    let hours = first_of(record, &["qtHoras", "duracaoHoras", "horas"])
        .and_then(Value::as_u64)
        .and_then(|hours| u32::try_from(hours).ok());

    Some(Course {
        id,
        name: name.to_string(),
        description,
        hours,
    })
}

/// First key present with a non-null value.
fn first_of<'a>(record: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| record.get(*key))
        .find(|value| !value.is_null())
}
