// ── Query parameter codec ──
//
// The only producer of wire filter params. Screens hand a `FilterValue`
// to `encode` and pass the result to the API layer; nothing else in the
// codebase builds filter query strings.

use super::value::{format_number, FilterEntry, FilterValue};

/// Wire representation: repeated key/value pairs, ready for
/// `reqwest::RequestBuilder::query`. Array membership serializes as one
/// `<field>_in[]` pair per element.
pub type QueryParams = Vec<(String, String)>;

/// Encode a filter into wire query parameters.
///
/// Per-key rules, in precedence order:
/// 1. `*_mode` keys are UI state, dropped.
/// 2. Empty values are dropped (a minimal-form map has none, but encode
///    does not trust its input).
/// 3. `min_`/`max_` prefixed keys pass through unchanged.
/// 4. Array values re-emit as repeated `<field>_in[]` pairs, insertion
///    order preserved, duplicates kept.
/// 5. Everything else passes through as `<field>=value`.
///
/// A field carrying both an exact value and an explicit `"exact"` mode
/// flag encodes only the exact key -- the flag is never emitted.
pub fn encode(filter: &FilterValue) -> QueryParams {
    let mut params = QueryParams::new();

    for (key, entry) in filter.iter() {
        if key.ends_with("_mode") {
            continue;
        }
        if entry.is_empty() {
            continue;
        }

        // `min_`/`max_` bound keys hold scalars by construction and fall
        // through the scalar arms unchanged, ahead of any array handling.
        match entry {
            FilterEntry::Many(items) => {
                let param_key = format!("{key}_in[]");
                for item in items {
                    params.push((param_key.clone(), item.clone()));
                }
            }
            FilterEntry::Number(n) => {
                params.push((key.clone(), format_number(*n)));
            }
            FilterEntry::Text(s) => {
                params.push((key.clone(), s.clone()));
            }
        }
    }

    params
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn pair(k: &str, v: &str) -> (String, String) {
        (k.to_owned(), v.to_owned())
    }

    #[test]
    fn mode_keys_are_dropped() {
        let mut filter = FilterValue::new();
        filter.use_exact_mode("age");
        filter.set_exact("age", Some(30.0));

        assert_eq!(encode(&filter), vec![pair("age", "30")]);
    }

    #[test]
    fn bound_keys_pass_through() {
        let mut filter = FilterValue::new();
        filter.set_numeric_range("age", (18.0, 99.0), 25.0, 40.0);

        assert_eq!(
            encode(&filter),
            vec![pair("min_age", "25"), pair("max_age", "40")]
        );
    }

    #[test]
    fn arrays_become_repeated_in_suffix_pairs() {
        let mut filter = FilterValue::new();
        filter.select_options(
            "blood_group",
            vec!["AB-".to_owned(), "O-".to_owned(), "AB-".to_owned()],
        );

        // Insertion order preserved, duplicates kept.
        assert_eq!(
            encode(&filter),
            vec![
                pair("blood_group_in[]", "AB-"),
                pair("blood_group_in[]", "O-"),
                pair("blood_group_in[]", "AB-"),
            ]
        );
    }

    #[test]
    fn scalar_selection_encodes_without_suffix() {
        // The scalar collapse happened at the FilterValue layer; encode
        // only uses the array suffix for values still stored as arrays.
        let mut filter = FilterValue::new();
        filter.select_options("gender", vec!["female".to_owned()]);

        assert_eq!(encode(&filter), vec![pair("gender", "female")]);
    }

    #[test]
    fn end_to_end_age_and_gender_scenario() {
        let mut filter = FilterValue::new();
        filter.set_numeric_range("age", (18.0, 99.0), 25.0, 40.0);
        filter.select_options("gender", vec!["female".to_owned(), "male".to_owned()]);
        filter.select_options("gender", vec!["female".to_owned()]);

        // After narrowing back to one selection the value is scalar again.
        assert_eq!(
            encode(&filter),
            vec![
                pair("min_age", "25"),
                pair("max_age", "40"),
                pair("gender", "female"),
            ]
        );
    }

    #[test]
    fn encode_is_stable_on_minimal_input() {
        let mut filter = FilterValue::new();
        filter.update("min_age", Some(25.0.into()));
        filter.update("gender", Some("female".into()));

        // Encoding twice yields the identical pair set -- no
        // double-encoding artifacts.
        assert_eq!(encode(&filter), encode(&filter));
    }

    #[test]
    fn empty_filter_encodes_to_nothing() {
        assert!(encode(&FilterValue::new()).is_empty());
    }
}
