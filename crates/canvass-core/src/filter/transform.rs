// ── Persistence transform ──
//
// Campaigns persist their prospect filter in a nested API form:
//
//   flat editing form:  { "min_age": 25, "max_age": 94, "gender": "female" }
//   nested API form:    { "age": {"min": 25, "max": 94}, "gender": "female" }
//
// Both directions live here. The flat form is what the filter engine
// edits; the nested form is what `Campaign::prospect_filter` stores.

use std::collections::BTreeSet;

use serde_json::{Map, Value};

use super::value::{FilterEntry, FilterValue};

fn entry_to_json(entry: &FilterEntry) -> Value {
    serde_json::to_value(entry).unwrap_or(Value::Null)
}

/// Flat editing form → nested API form.
///
/// `min_`/`max_` pairs are collected per field into `{min, max}` objects
/// (either side optional); every other key maps through unchanged.
pub fn to_api_filter(filter: &FilterValue) -> Value {
    let mut api = Map::new();
    // Field names that have at least one bound key, deduplicated.
    let mut range_fields: BTreeSet<String> = BTreeSet::new();

    for (key, entry) in filter.iter() {
        if let Some(field) = key
            .strip_prefix("min_")
            .or_else(|| key.strip_prefix("max_"))
        {
            range_fields.insert(field.to_owned());
        } else {
            api.insert(key.clone(), entry_to_json(entry));
        }
    }

    for field in range_fields {
        let mut range = Map::new();
        if let Some(min) = filter.get(&format!("min_{field}")) {
            range.insert("min".to_owned(), entry_to_json(min));
        }
        if let Some(max) = filter.get(&format!("max_{field}")) {
            range.insert("max".to_owned(), entry_to_json(max));
        }
        if !range.is_empty() {
            api.insert(field, Value::Object(range));
        }
    }

    Value::Object(api)
}

/// Nested API form → flat editing form.
///
/// `{min, max}` objects explode into `min_<field>`/`max_<field>` keys;
/// everything else maps through as-is. Values the editing form cannot
/// represent (nested objects that are not ranges, nulls) are skipped --
/// the UI decides how to display what survives.
pub fn from_api_filter(api: &Value) -> FilterValue {
    let mut filter = FilterValue::new();
    let Some(object) = api.as_object() else {
        return filter;
    };

    for (key, value) in object {
        match value {
            Value::Object(inner) if inner.contains_key("min") || inner.contains_key("max") => {
                if let Some(min) = inner.get("min").and_then(json_to_entry) {
                    filter.update(&format!("min_{key}"), Some(min));
                }
                if let Some(max) = inner.get("max").and_then(json_to_entry) {
                    filter.update(&format!("max_{key}"), Some(max));
                }
            }
            _ => {
                if let Some(entry) = json_to_entry(value) {
                    filter.update(key, Some(entry));
                }
            }
        }
    }

    filter
}

fn json_to_entry(value: &Value) -> Option<FilterEntry> {
    serde_json::from_value(value.clone()).ok()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn flat_to_nested_collects_range_pairs() {
        let mut filter = FilterValue::new();
        filter.update("min_age", Some(25.0.into()));
        filter.update("max_age", Some(94.0.into()));
        filter.update("gender", Some("female".into()));
        filter.update(
            "blood_group",
            Some(vec!["AB-".to_owned(), "O-".to_owned()].into()),
        );

        assert_eq!(
            to_api_filter(&filter),
            json!({
                "age": {"min": 25.0, "max": 94.0},
                "gender": "female",
                "blood_group": ["AB-", "O-"]
            })
        );
    }

    #[test]
    fn one_sided_ranges_keep_only_the_present_bound() {
        let mut filter = FilterValue::new();
        filter.update("min_age", Some(30.0.into()));

        assert_eq!(to_api_filter(&filter), json!({"age": {"min": 30.0}}));
    }

    #[test]
    fn nested_to_flat_explodes_ranges() {
        let api = json!({
            "age": {"min": 25, "max": 94},
            "gender": "female"
        });

        let filter = from_api_filter(&api);
        assert_eq!(filter.get("min_age").unwrap().as_number(), Some(25.0));
        assert_eq!(filter.get("max_age").unwrap().as_number(), Some(94.0));
        assert_eq!(filter.get("gender").unwrap().as_text(), Some("female"));
    }

    #[test]
    fn round_trip_preserves_meaning() {
        let mut filter = FilterValue::new();
        filter.update("min_height", Some(150.0.into()));
        filter.update("max_height", Some(190.0.into()));
        filter.update("eye_color", Some(vec!["green".to_owned(), "blue".to_owned()].into()));

        let back = from_api_filter(&to_api_filter(&filter));
        assert_eq!(back, filter);
    }

    #[test]
    fn non_object_input_yields_empty_filter() {
        assert!(from_api_filter(&json!(null)).is_empty());
        assert!(from_api_filter(&json!([1, 2])).is_empty());
    }
}
