use serde_json::Value;

use crate::domain::{FilterSpec, SearchOutcome};

/// Why sanitized model output was not accepted as a filter.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterRejection {
    /// Nothing left after sanitization.
    Empty,
    /// Not parseable as JSON.
    Malformed(String),
    /// Valid JSON, but the top level is not an object.
    NotAnObject(&'static str),
}

impl FilterRejection {
    /// Every rejection surfaces as the same user-facing outcome.
    pub fn into_outcome(self) -> SearchOutcome {
        SearchOutcome::invalid_filter()
    }
}

impl std::fmt::Display for FilterRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FilterRejection::Empty => write!(f, "model returned no usable answer"),
            FilterRejection::Malformed(e) => write!(f, "model answer is not valid JSON: {e}"),
            FilterRejection::NotAnObject(kind) => {
                write!(f, "model answer is a JSON {kind}, expected an object")
            }
        }
    }
}

/// Parse sanitized model output into a [`FilterSpec`].
///
/// Only the top-level shape is checked. Field names and operators are passed
/// through verbatim for the store to interpret.
pub fn validate_filter(candidate: Option<&str>) -> Result<FilterSpec, FilterRejection> {
    let text = candidate.ok_or(FilterRejection::Empty)?;

    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(map)) => Ok(FilterSpec::new(map)),
        Ok(other) => Err(FilterRejection::NotAnObject(json_kind(&other))),
        Err(e) => Err(FilterRejection::Malformed(e.to_string())),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_object() {
        let filter = validate_filter(Some("{\"color\":\"red\"}")).expect("valid filter");
        assert_eq!(serde_json::to_value(&filter).unwrap(), json!({ "color": "red" }));
    }

    #[test]
    fn malformed_json_gives_invalid_filter_outcome() {
        let rejection = validate_filter(Some("{not json")).unwrap_err();
        assert!(matches!(rejection, FilterRejection::Malformed(_)));

        let outcome = rejection.into_outcome();
        assert_eq!(outcome.kind(), "invalid_filter");
        assert_eq!(outcome.suggestions().len(), 5);
    }

    #[test]
    fn empty_candidate_is_not_parsed() {
        assert_eq!(validate_filter(None), Err(FilterRejection::Empty));
    }

    #[test]
    fn non_object_json_is_rejected() {
        assert_eq!(
            validate_filter(Some("[{\"color\":\"red\"}]")),
            Err(FilterRejection::NotAnObject("array"))
        );
        assert_eq!(
            validate_filter(Some("\"red\"")),
            Err(FilterRejection::NotAnObject("string"))
        );
    }

    #[test]
    fn unknown_fields_pass_through() {
        let filter = validate_filter(Some("{\"warpDrive\": {\"$gte\": 9}}")).expect("object");
        assert_eq!(filter.keys().collect::<Vec<_>>(), vec!["warpDrive"]);
    }
}
