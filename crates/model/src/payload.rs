use serde_json::Value;

use crate::course::{CombinedInfo, CourseRecord};

/// Why a tool result payload could not be normalized.
#[derive(Debug, thiserror::Error)]
pub enum PayloadError {
    /// The payload was a string, but not a JSON document.
    #[error("result is not valid JSON: {0}")]
    InvalidJson(#[source] serde_json::Error),
    /// The payload parsed, but has neither of the accepted shapes.
    #[error("unexpected result shape: {0}")]
    UnexpectedShape(String),
}

/// The shapes the course-info tool result arrives in.
///
/// Producers either send the full object with named collections, or a bare
/// array of course records. Both normalize to [`CombinedInfo`].
#[derive(Clone, Debug, PartialEq)]
pub enum CourseInfoPayload {
    /// `{"course_info": [...], "professor_info": [...]}`
    Combined(CombinedInfo),
    /// `[course, course, ...]`
    Bare(Vec<CourseRecord>),
}

impl CourseInfoPayload {
    /// Classifies a raw tool result.
    ///
    /// A string result is parsed exactly once before classification. A
    /// `null` result is read as an empty object.
    pub fn parse(raw: &Value) -> Result<Self, PayloadError> {
        let parsed;
        let value = match raw {
            Value::String(text) => {
                parsed = serde_json::from_str::<Value>(text)
                    .map_err(PayloadError::InvalidJson)?;
                &parsed
            }
            other => other,
        };

        match value {
            Value::Null => Ok(Self::Combined(CombinedInfo::default())),
            Value::Array(_) => serde_json::from_value(value.clone())
                .map(Self::Bare)
                .map_err(|err| PayloadError::UnexpectedShape(format!("{err}"))),
            Value::Object(_) => serde_json::from_value(value.clone())
                .map(Self::Combined)
                .map_err(|err| PayloadError::UnexpectedShape(format!("{err}"))),
            other => Err(PayloadError::UnexpectedShape(format!(
                "expected an object or an array, got {other}"
            ))),
        }
    }

    /// Converts into the canonical form.
    #[inline]
    pub fn into_combined(self) -> CombinedInfo {
        match self {
            Self::Combined(info) => info,
            Self::Bare(course_info) => CombinedInfo {
                course_info,
                professor_info: vec![],
                error: None,
            },
        }
    }
}

impl CombinedInfo {
    /// Normalizes a raw course-info tool result.
    ///
    /// See [`CourseInfoPayload::parse`].
    #[inline]
    pub fn from_payload(raw: &Value) -> Result<Self, PayloadError> {
        CourseInfoPayload::parse(raw).map(CourseInfoPayload::into_combined)
    }
}
