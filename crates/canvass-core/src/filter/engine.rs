// ── Criteria-driven filter engine ──
//
// Binds a resolved `FilterSchema` to the `FilterValue` being edited.
// `controls()` maps every schema variant to exactly one control
// descriptor -- the single dispatch point between the server-declared
// field shape and whatever renders it. All edits go through the engine,
// which keeps the value canonical after every change.

use std::collections::HashMap;

use super::labels::label_for;
use super::schema::{numeric_step, FieldSchema, FilterSchema};
use super::value::{FilterEntry, FilterValue};

/// The numeric sub-mode a range field is currently in, with the state a
/// control needs to render it.
#[derive(Debug, Clone, PartialEq)]
pub enum NumericMode {
    /// Two-thumb slider between the domain bounds.
    Range { low: f64, high: f64 },
    /// Single exact-value input, possibly still empty.
    Exact { value: Option<f64> },
}

/// Render descriptor for one filterable field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldControl {
    MultiSelect {
        field: String,
        label: String,
        options: Vec<String>,
        selected: Vec<String>,
    },
    NumericRange {
        field: String,
        label: String,
        domain_min: f64,
        domain_max: f64,
        step: f64,
        mode: NumericMode,
    },
    DateRange {
        field: String,
        label: String,
        domain_min: String,
        domain_max: String,
        from: Option<String>,
        to: Option<String>,
    },
    TextRange {
        field: String,
        label: String,
        min_hint: String,
        max_hint: String,
        low: Option<String>,
        high: Option<String>,
    },
}

impl FieldControl {
    pub fn field(&self) -> &str {
        match self {
            Self::MultiSelect { field, .. }
            | Self::NumericRange { field, .. }
            | Self::DateRange { field, .. }
            | Self::TextRange { field, .. } => field,
        }
    }
}

/// Schema-driven filter editor.
pub struct FilterEngine {
    schema: FilterSchema,
    value: FilterValue,
    labels: HashMap<String, String>,
}

impl FilterEngine {
    pub fn new(schema: FilterSchema) -> Self {
        Self {
            schema,
            value: FilterValue::new(),
            labels: HashMap::new(),
        }
    }

    /// Caller-supplied label overrides, consulted before the built-in
    /// table.
    pub fn with_labels(mut self, labels: HashMap<String, String>) -> Self {
        self.labels = labels;
        self
    }

    /// Start editing from an existing value (e.g. a campaign's persisted
    /// filter run through `from_api_filter`).
    pub fn with_value(mut self, value: FilterValue) -> Self {
        self.value = value;
        self
    }

    pub fn schema(&self) -> &FilterSchema {
        &self.schema
    }

    /// The canonical filter value after the latest edit.
    pub fn value(&self) -> &FilterValue {
        &self.value
    }

    pub fn into_value(self) -> FilterValue {
        self.value
    }

    pub fn label(&self, field: &str) -> String {
        label_for(field, &self.labels)
    }

    // ── Rendering contract ──────────────────────────────────────────

    /// One control descriptor per schema field, in schema order.
    pub fn controls(&self) -> Vec<FieldControl> {
        self.schema
            .iter()
            .map(|(field, schema)| self.control_for(field, schema))
            .collect()
    }

    fn control_for(&self, field: &str, schema: &FieldSchema) -> FieldControl {
        let label = self.label(field);
        match schema {
            FieldSchema::Options(options) => FieldControl::MultiSelect {
                field: field.to_owned(),
                label,
                options: options.clone(),
                selected: self.value.selections(field),
            },
            FieldSchema::NumericRange { min, max } => {
                let mode = if self.value.is_exact_mode(field) {
                    NumericMode::Exact {
                        value: self.value.get(field).and_then(FilterEntry::as_number),
                    }
                } else {
                    let (low, high) = self.value.numeric_range(field, (*min, *max));
                    NumericMode::Range { low, high }
                };
                FieldControl::NumericRange {
                    field: field.to_owned(),
                    label,
                    domain_min: *min,
                    domain_max: *max,
                    step: numeric_step(field),
                    mode,
                }
            }
            FieldSchema::DateRange { min, max } => FieldControl::DateRange {
                field: field.to_owned(),
                label,
                domain_min: min.clone(),
                domain_max: max.clone(),
                from: self.value.min_bound(field).map(str::to_owned),
                to: self.value.max_bound(field).map(str::to_owned),
            },
            FieldSchema::StringRange { min, max } => FieldControl::TextRange {
                field: field.to_owned(),
                label,
                min_hint: min.clone(),
                max_hint: max.clone(),
                low: self.value.min_bound(field).map(str::to_owned),
                high: self.value.max_bound(field).map(str::to_owned),
            },
        }
    }

    // ── Edits ───────────────────────────────────────────────────────

    /// Multi-select change for an option field.
    pub fn select_options(&mut self, field: &str, selections: Vec<String>) {
        self.value.select_options(field, selections);
    }

    /// Move both thumbs of a numeric range. Ignored for fields that are
    /// not numeric ranges -- the engine only edits what the schema
    /// declares.
    pub fn set_numeric_range(&mut self, field: &str, low: f64, high: f64) {
        if let Some(FieldSchema::NumericRange { min, max }) = self.schema.get(field) {
            self.value.set_numeric_range(field, (*min, *max), low, high);
        }
    }

    /// Set or clear the exact value of a numeric field.
    pub fn set_exact(&mut self, field: &str, value: Option<f64>) {
        if matches!(self.schema.get(field), Some(FieldSchema::NumericRange { .. })) {
            self.value.set_exact(field, value);
        }
    }

    pub fn use_exact_mode(&mut self, field: &str) {
        self.value.use_exact_mode(field);
    }

    pub fn use_range_mode(&mut self, field: &str) {
        self.value.use_range_mode(field);
    }

    /// Set or clear one bound of a date or string range.
    pub fn set_min_bound(&mut self, field: &str, value: Option<String>) {
        self.value.set_min_bound(field, value);
    }

    pub fn set_max_bound(&mut self, field: &str, value: Option<String>) {
        self.value.set_max_bound(field, value);
    }

    /// Replace the whole value (e.g. "clear filters").
    pub fn set_value(&mut self, value: FilterValue) {
        self.value = value;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn schema() -> FilterSchema {
        FilterSchema::from_wire(
            serde_json::from_str(
                r#"{
                    "age": {"min": 18, "max": 99},
                    "gender": ["male", "female"],
                    "birth_date": {"min": "1950-01-01", "max": "2007-12-31"},
                    "address.plz": {"min": "01067", "max": "99998"}
                }"#,
            )
            .unwrap(),
        )
    }

    #[test]
    fn one_control_per_schema_field_in_order() {
        let engine = FilterEngine::new(schema());
        let controls = engine.controls();

        let fields: Vec<&str> = controls.iter().map(FieldControl::field).collect();
        assert_eq!(fields, ["age", "gender", "birth_date", "address.plz"]);

        assert!(matches!(controls[0], FieldControl::NumericRange { .. }));
        assert!(matches!(controls[1], FieldControl::MultiSelect { .. }));
        assert!(matches!(controls[2], FieldControl::DateRange { .. }));
        assert!(matches!(controls[3], FieldControl::TextRange { .. }));
    }

    fn age_mode(engine: &FilterEngine) -> NumericMode {
        let controls = engine.controls();
        let FieldControl::NumericRange { mode, .. } = &controls[0] else {
            panic!("expected numeric control");
        };
        mode.clone()
    }

    #[test]
    fn numeric_control_reflects_mode_switches() {
        let mut engine = FilterEngine::new(schema());

        engine.set_numeric_range("age", 25.0, 40.0);
        assert_eq!(age_mode(&engine), NumericMode::Range { low: 25.0, high: 40.0 });
        let controls = engine.controls();
        let FieldControl::NumericRange { step, .. } = &controls[0] else {
            panic!("expected numeric control");
        };
        assert_eq!(*step, 1.0);

        engine.use_exact_mode("age");
        // Exact mode starts without a value.
        assert_eq!(age_mode(&engine), NumericMode::Exact { value: None });

        engine.set_exact("age", Some(33.0));
        assert_eq!(age_mode(&engine), NumericMode::Exact { value: Some(33.0) });
    }

    #[test]
    fn edits_to_undeclared_fields_are_ignored() {
        let mut engine = FilterEngine::new(schema());
        engine.set_numeric_range("shoe_size", 38.0, 44.0);
        engine.set_exact("shoe_size", Some(40.0));
        assert!(engine.value().is_empty());
    }

    #[test]
    fn persisted_value_restores_exact_mode_without_flag() {
        let mut value = FilterValue::new();
        value.update("age", Some(30.0.into()));

        let engine = FilterEngine::new(schema()).with_value(value);
        assert_eq!(age_mode(&engine), NumericMode::Exact { value: Some(30.0) });
    }

    #[test]
    fn labels_resolve_through_override_chain() {
        let mut labels = HashMap::new();
        labels.insert("age".to_owned(), "Alter".to_owned());
        let engine = FilterEngine::new(schema()).with_labels(labels);

        assert_eq!(engine.label("age"), "Alter");
        assert_eq!(engine.label("gender"), "Gender");
        assert_eq!(engine.label("address.plz"), "Postal Code");
    }
}
