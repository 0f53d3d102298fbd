//! Cursor pagination.
//!
//! [`guard`] enforces the shared query invariants for every paginated
//! operation; [`paginate`] slices an ordered collection by a validated window.

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::validation::{RequestPart, ValidationViolation};

pub const MIN_LIMIT: i64 = 1;
pub const MAX_LIMIT: i64 = 200;
pub const DEFAULT_LIMIT: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PaginationError {
    #[error("limit must be an integer between 1 and 200")]
    Range,
    #[error("startingAfter and endingBefore are mutually exclusive")]
    Exclusivity,
}

impl From<PaginationError> for ValidationViolation {
    fn from(err: PaginationError) -> Self {
        let message = format!("Request schema validation error: {}", err);
        match err {
            PaginationError::Range => ValidationViolation::new(
                RequestPart::Querystring,
                Some("/limit".to_string()),
                "limit",
                message,
            ),
            PaginationError::Exclusivity => {
                ValidationViolation::new(RequestPart::Querystring, None, "exclusivity", message)
            }
        }
    }
}

/// Validated (limit, startingAfter, endingBefore) triple.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationWindow {
    #[serde(default = "default_limit")]
    pub limit: usize,
    #[serde(default)]
    pub starting_after: Option<String>,
    #[serde(default)]
    pub ending_before: Option<String>,
}

fn default_limit() -> usize {
    DEFAULT_LIMIT
}

impl Default for PaginationWindow {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            starting_after: None,
            ending_before: None,
        }
    }
}

/// Check the pagination invariants on a coerced query object.
///
/// The range is checked before exclusivity. An absent `limit` takes the default.
pub fn guard(query: &Value) -> Result<PaginationWindow, PaginationError> {
    let limit = match query.get("limit") {
        None | Some(Value::Null) => DEFAULT_LIMIT,
        Some(value) => match value.as_i64() {
            Some(n) if (MIN_LIMIT..=MAX_LIMIT).contains(&n) => n as usize,
            _ => return Err(PaginationError::Range),
        },
    };

    let cursor = |name: &str| query.get(name).map(cursor_text);
    let starting_after = cursor("startingAfter");
    let ending_before = cursor("endingBefore");
    if starting_after.is_some() && ending_before.is_some() {
        return Err(PaginationError::Exclusivity);
    }

    Ok(PaginationWindow {
        limit,
        starting_after,
        ending_before,
    })
}

fn cursor_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Slice `items` (already in display order) by `window`.
///
/// An unknown cursor id yields an empty page.
pub fn paginate<T: Clone>(
    items: &[T],
    window: &PaginationWindow,
    id_of: impl Fn(&T) -> &str,
) -> Vec<T> {
    let position = |cursor: &str| items.iter().position(|item| id_of(item) == cursor);

    let range = if let Some(after) = &window.starting_after {
        match position(after) {
            Some(i) => (i + 1)..items.len().min(i + 1 + window.limit),
            None => return Vec::new(),
        }
    } else if let Some(before) = &window.ending_before {
        match position(before) {
            Some(i) => i.saturating_sub(window.limit)..i,
            None => return Vec::new(),
        }
    } else {
        0..items.len().min(window.limit)
    };

    items[range].to_vec()
}
