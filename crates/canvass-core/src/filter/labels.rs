// ── Field labels ──
//
// Display names for filter fields. Resolution order: caller-supplied
// overrides, then the built-in table, then a generic humanization of the
// field name.

use std::collections::HashMap;

/// Built-in labels for the prospect store's known fields.
const DEFAULT_LABELS: &[(&str, &str)] = &[
    ("age", "Age"),
    ("height", "Height (cm)"),
    ("weight", "Weight (kg)"),
    ("birth_date", "Birth Date"),
    ("source", "Source"),
    ("gender", "Gender"),
    ("blood_group", "Blood Group"),
    ("eye_color", "Eye Color"),
    ("hair_color", "Hair Color"),
    ("address.city", "City"),
    ("address.state", "State"),
    ("address.country", "Country"),
    ("address.plz", "Postal Code"),
    ("address.latitude", "Latitude"),
    ("address.longitude", "Longitude"),
];

/// Resolve the display label for a field.
pub fn label_for(field: &str, overrides: &HashMap<String, String>) -> String {
    if let Some(label) = overrides.get(field) {
        return label.clone();
    }
    if let Some((_, label)) = DEFAULT_LABELS.iter().find(|(name, _)| *name == field) {
        return (*label).to_owned();
    }
    humanize(field)
}

/// Fallback: `address.plz_code` → `Address Plz Code`.
fn humanize(field: &str) -> String {
    field
        .replace(['.', '_'], " ")
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_win() {
        let mut overrides = HashMap::new();
        overrides.insert("age".to_owned(), "Years".to_owned());
        assert_eq!(label_for("age", &overrides), "Years");
    }

    #[test]
    fn builtin_table_is_second() {
        assert_eq!(label_for("blood_group", &HashMap::new()), "Blood Group");
        assert_eq!(label_for("address.plz", &HashMap::new()), "Postal Code");
    }

    #[test]
    fn humanization_is_the_fallback() {
        assert_eq!(label_for("hair_type", &HashMap::new()), "Hair Type");
        assert_eq!(label_for("company.branch_name", &HashMap::new()), "Company Branch Name");
    }
}
