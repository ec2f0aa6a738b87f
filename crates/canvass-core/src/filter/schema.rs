// ── Filter schema ──
//
// Domain-side view of the server's search criteria. The wire shape
// (`canvass_api::models::SearchCriteria`) arrives as untagged JSON; this
// module resolves every field into an explicit variant exactly once per
// session -- the schema is authoritative and static until the next login.

use indexmap::IndexMap;
use tracing::warn;

use canvass_api::models::{CriteriaValue, RangeBound, SearchCriteria};

/// Resolved schema for one filterable field.
///
/// A `{min, max}` range over strings counts as a date range when the field
/// name contains `date` (case-insensitive), otherwise it is a plain
/// lexicographic range.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldSchema {
    /// Enumerated options, rendered as a multi-select.
    Options(Vec<String>),
    /// Numeric domain bounds. Values at the extremes mean "no constraint".
    NumericRange { min: f64, max: f64 },
    /// Date range, bounds in the server's string format (ISO dates).
    DateRange { min: String, max: String },
    /// Lexicographic string range.
    StringRange { min: String, max: String },
}

/// All filterable fields, in the order the server declared them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSchema {
    fields: IndexMap<String, FieldSchema>,
}

impl FilterSchema {
    /// Resolve a wire criteria response into field schemas.
    ///
    /// Fields with an unrecognized shape (mixed number/string bounds) are
    /// skipped with a warning rather than failing the whole schema -- but
    /// note that a failed criteria *fetch* is terminal for the screen; this
    /// leniency only applies per-field within a successful response.
    pub fn from_wire(criteria: SearchCriteria) -> Self {
        let mut fields = IndexMap::new();
        for (name, value) in criteria {
            match resolve_field(&name, value) {
                Some(schema) => {
                    fields.insert(name, schema);
                }
                None => warn!(field = %name, "skipping criteria field with mixed bounds"),
            }
        }
        Self { fields }
    }

    pub fn get(&self, field: &str) -> Option<&FieldSchema> {
        self.fields.get(field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldSchema)> {
        self.fields.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }
}

fn resolve_field(name: &str, value: CriteriaValue) -> Option<FieldSchema> {
    match value {
        CriteriaValue::Options(options) => Some(FieldSchema::Options(options)),
        CriteriaValue::Range {
            min: RangeBound::Number(min),
            max: RangeBound::Number(max),
        } => Some(FieldSchema::NumericRange { min, max }),
        CriteriaValue::Range {
            min: RangeBound::Text(min),
            max: RangeBound::Text(max),
        } => {
            if is_date_field(name) {
                Some(FieldSchema::DateRange { min, max })
            } else {
                Some(FieldSchema::StringRange { min, max })
            }
        }
        CriteriaValue::Range { .. } => None,
    }
}

/// A string-range field is a date range when its name mentions dates.
pub fn is_date_field(name: &str) -> bool {
    name.to_ascii_lowercase().contains("date")
}

/// Slider/input step size for a numeric field.
///
/// `age` is the store's one integer-valued field; geographic coordinates
/// need micro-degree precision; everything else (height, weight) is
/// measured in hundredths.
pub fn numeric_step(field: &str) -> f64 {
    if field == "age" {
        1.0
    } else if field.contains("latitude") || field.contains("longitude") {
        0.000_001
    } else {
        0.01
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn wire(json: &str) -> SearchCriteria {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn resolves_each_shape_once() {
        let schema = FilterSchema::from_wire(wire(
            r#"{
                "gender": ["male", "female"],
                "age": {"min": 18, "max": 99},
                "birth_date": {"min": "1950-01-01", "max": "2007-12-31"},
                "address.plz": {"min": "01067", "max": "99998"}
            }"#,
        ));

        assert_eq!(
            schema.get("gender"),
            Some(&FieldSchema::Options(vec![
                "male".to_owned(),
                "female".to_owned()
            ]))
        );
        assert_eq!(
            schema.get("age"),
            Some(&FieldSchema::NumericRange { min: 18.0, max: 99.0 })
        );
        assert!(matches!(
            schema.get("birth_date"),
            Some(FieldSchema::DateRange { .. })
        ));
        // Postal codes are string ranges: no "date" in the name.
        assert!(matches!(
            schema.get("address.plz"),
            Some(FieldSchema::StringRange { .. })
        ));
    }

    #[test]
    fn field_order_follows_server_declaration() {
        let schema = FilterSchema::from_wire(wire(
            r#"{"weight": {"min": 40, "max": 150}, "age": {"min": 18, "max": 99}}"#,
        ));
        let names: Vec<&str> = schema.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, ["weight", "age"]);
    }

    #[test]
    fn mixed_bounds_are_skipped_not_fatal() {
        let schema = FilterSchema::from_wire(wire(
            r#"{"odd": {"min": 1, "max": "zzz"}, "age": {"min": 18, "max": 99}}"#,
        ));
        assert_eq!(schema.len(), 1);
        assert!(schema.get("odd").is_none());
    }

    #[test]
    fn date_detection_is_case_insensitive() {
        assert!(is_date_field("birth_date"));
        assert!(is_date_field("lastDateSeen"));
        assert!(!is_date_field("address.plz"));
    }

    #[test]
    fn step_sizes() {
        assert_eq!(numeric_step("age"), 1.0);
        assert_eq!(numeric_step("address.latitude"), 0.000_001);
        assert_eq!(numeric_step("address.longitude"), 0.000_001);
        assert_eq!(numeric_step("height"), 0.01);
    }
}
