// ── Filter value ──
//
// The flat editing form of a prospect filter: `min_age`/`max_age` bound
// keys, exact-match scalars, multi-select arrays, and `<field>_mode` UI
// flags. The map is always in minimal form -- no key ever holds an empty
// string, empty array, or other semantically-empty value. Every mutation
// funnels through `update`, which re-establishes the invariant.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One stored constraint value.
///
/// Untagged so the map round-trips with the `prospect_filter` JSON
/// persisted on campaigns (`{"age": 25, "gender": ["a", "b"]}`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterEntry {
    Number(f64),
    Text(String),
    Many(Vec<String>),
}

impl FilterEntry {
    /// Semantically empty: the minimal-form invariant deletes these.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Number(_) => false,
            Self::Text(s) => s.is_empty(),
            Self::Many(items) => items.is_empty(),
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// The selected options regardless of scalar-vs-array storage.
    pub fn as_selections(&self) -> Vec<String> {
        match self {
            Self::Text(s) => vec![s.clone()],
            Self::Many(items) => items.clone(),
            Self::Number(n) => vec![format_number(*n)],
        }
    }
}

impl From<f64> for FilterEntry {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<String> for FilterEntry {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&str> for FilterEntry {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

impl From<Vec<String>> for FilterEntry {
    fn from(items: Vec<String>) -> Self {
        Self::Many(items)
    }
}

/// Flat filter map in minimal form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterValue {
    entries: IndexMap<String, FilterEntry>,
}

/// Marker value of a `<field>_mode` key when the field is pinned to exact
/// matching.
pub const EXACT_MODE: &str = "exact";

impl FilterValue {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Key naming ──────────────────────────────────────────────────

    /// Lower bound key for a numeric field: dots are kept
    /// (`min_address.latitude`).
    pub fn numeric_min_key(field: &str) -> String {
        format!("min_{field}")
    }

    /// Upper bound key for a numeric field.
    pub fn numeric_max_key(field: &str) -> String {
        format!("max_{field}")
    }

    /// Bound keys for date and string ranges replace dots with
    /// underscores (`address.opened` → `min_address_opened`).
    pub fn bound_min_key(field: &str) -> String {
        format!("min_{}", field.replace('.', "_"))
    }

    pub fn bound_max_key(field: &str) -> String {
        format!("max_{}", field.replace('.', "_"))
    }

    /// UI-only mode flag key. Never encoded onto the wire.
    pub fn mode_key(field: &str) -> String {
        format!("{field}_mode")
    }

    // ── Reads ───────────────────────────────────────────────────────

    pub fn get(&self, key: &str) -> Option<&FilterEntry> {
        self.entries.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FilterEntry)> {
        self.entries.iter()
    }

    // ── Single mutation entry point ─────────────────────────────────

    /// Merge one key, then prune every semantically-empty entry.
    ///
    /// `None` deletes the key. The prune runs over the whole map, not just
    /// the touched key, so the minimal-form invariant holds after every
    /// single edit -- not just at submit time.
    pub fn update(&mut self, key: &str, value: Option<FilterEntry>) {
        match value {
            Some(entry) => {
                self.entries.insert(key.to_owned(), entry);
            }
            None => {
                self.entries.shift_remove(key);
            }
        }
        self.prune();
    }

    /// Drop all entries. Screens use this for the "clear filters" action.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    fn prune(&mut self) {
        self.entries.retain(|_, entry| !entry.is_empty());
    }

    // ── Option fields ───────────────────────────────────────────────

    /// Apply a multi-select change: zero selections clears the field, one
    /// collapses to a scalar (the common exact-match case), two or more
    /// store as an array.
    pub fn select_options(&mut self, field: &str, mut selections: Vec<String>) {
        let value = match selections.len() {
            0 => None,
            1 => selections.pop().map(FilterEntry::Text),
            _ => Some(FilterEntry::Many(selections)),
        };
        self.update(field, value);
    }

    /// Current selections for an option field, tolerant of scalar storage.
    pub fn selections(&self, field: &str) -> Vec<String> {
        self.get(field).map(FilterEntry::as_selections).unwrap_or_default()
    }

    // ── Numeric range / exact sub-modes ─────────────────────────────

    /// Whether a numeric field is in exact mode.
    ///
    /// Explicit flag wins; otherwise an exact value with neither bound
    /// present infers exact mode. The inference is deliberate: filters
    /// loaded from persisted campaign JSON carry exact values but no mode
    /// flags.
    pub fn is_exact_mode(&self, field: &str) -> bool {
        if self
            .get(&Self::mode_key(field))
            .and_then(FilterEntry::as_text)
            == Some(EXACT_MODE)
        {
            return true;
        }
        self.contains(field)
            && !self.contains(&Self::numeric_min_key(field))
            && !self.contains(&Self::numeric_max_key(field))
    }

    /// Switch a numeric field to range mode: the exact value and the mode
    /// flag go away, bounds are untouched.
    pub fn use_range_mode(&mut self, field: &str) {
        self.entries.shift_remove(field);
        self.entries.shift_remove(&Self::mode_key(field));
        self.prune();
    }

    /// Switch a numeric field to exact mode: both bounds go away and the
    /// flag is pinned. No default exact value is filled in -- the field
    /// starts empty.
    pub fn use_exact_mode(&mut self, field: &str) {
        self.entries.shift_remove(&Self::numeric_min_key(field));
        self.entries.shift_remove(&Self::numeric_max_key(field));
        self.entries
            .insert(Self::mode_key(field), FilterEntry::Text(EXACT_MODE.to_owned()));
        self.prune();
    }

    /// Set or clear the exact value of a numeric field.
    pub fn set_exact(&mut self, field: &str, value: Option<f64>) {
        self.update(field, value.map(FilterEntry::Number));
    }

    /// Move both range thumbs in one state transition.
    ///
    /// A bound sitting at the schema's domain extreme is no constraint at
    /// all: the key is omitted rather than stored, which keeps the map
    /// minimal and avoids sending a vacuous bound to the server. Updating
    /// both bounds atomically prevents a torn read where only one side
    /// reflects the new thumb position.
    // Exact comparison is intentional: thumb positions at the extremes are
    // produced from these same domain values, not computed.
    #[allow(clippy::float_cmp)]
    pub fn set_numeric_range(
        &mut self,
        field: &str,
        domain: (f64, f64),
        low: f64,
        high: f64,
    ) {
        let (domain_min, domain_max) = domain;
        let min_key = Self::numeric_min_key(field);
        let max_key = Self::numeric_max_key(field);

        if low == domain_min {
            self.entries.shift_remove(&min_key);
        } else {
            self.entries.insert(min_key, FilterEntry::Number(low));
        }
        if high == domain_max {
            self.entries.shift_remove(&max_key);
        } else {
            self.entries.insert(max_key, FilterEntry::Number(high));
        }
        self.prune();
    }

    /// Current thumb positions, defaulting to the domain extremes.
    pub fn numeric_range(&self, field: &str, domain: (f64, f64)) -> (f64, f64) {
        let low = self
            .get(&Self::numeric_min_key(field))
            .and_then(FilterEntry::as_number)
            .unwrap_or(domain.0);
        let high = self
            .get(&Self::numeric_max_key(field))
            .and_then(FilterEntry::as_number)
            .unwrap_or(domain.1);
        (low, high)
    }

    // ── Date / string range bounds ──────────────────────────────────

    /// Set or clear one bound of a date or string range. Bounds are
    /// independent; no min ≤ max validation happens here -- the server is
    /// the source of truth for range validity.
    pub fn set_min_bound(&mut self, field: &str, value: Option<String>) {
        self.update(&Self::bound_min_key(field), value.map(FilterEntry::Text));
    }

    pub fn set_max_bound(&mut self, field: &str, value: Option<String>) {
        self.update(&Self::bound_max_key(field), value.map(FilterEntry::Text));
    }

    pub fn min_bound(&self, field: &str) -> Option<&str> {
        self.get(&Self::bound_min_key(field))
            .and_then(FilterEntry::as_text)
    }

    pub fn max_bound(&self, field: &str) -> Option<&str> {
        self.get(&Self::bound_max_key(field))
            .and_then(FilterEntry::as_text)
    }
}

/// Render a float the way the wire expects: integral values lose the
/// trailing `.0` (Rust's shortest-round-trip `Display` already does this).
pub fn format_number(n: f64) -> String {
    format!("{n}")
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    // Minimal-form invariant: no empty values survive any update sequence.
    #[test]
    fn update_prunes_empty_values_everywhere() {
        let mut filter = FilterValue::new();
        filter.update("gender", Some("female".into()));
        filter.update("note", Some("".into()));
        filter.update("tags", Some(Vec::<String>::new().into()));

        assert_eq!(filter.len(), 1);
        assert!(filter.contains("gender"));
        assert!(!filter.contains("note"));
        assert!(!filter.contains("tags"));

        filter.update("gender", None);
        assert!(filter.is_empty());
    }

    #[test]
    fn selection_collapse_scalar_array_scalar() {
        let mut filter = FilterValue::new();

        filter.select_options("blood_group", vec!["A-".to_owned()]);
        assert_eq!(filter.get("blood_group"), Some(&FilterEntry::Text("A-".to_owned())));

        filter.select_options("blood_group", vec!["A-".to_owned(), "B+".to_owned()]);
        assert_eq!(
            filter.get("blood_group"),
            Some(&FilterEntry::Many(vec!["A-".to_owned(), "B+".to_owned()]))
        );

        filter.select_options("blood_group", vec!["B+".to_owned()]);
        assert_eq!(filter.get("blood_group"), Some(&FilterEntry::Text("B+".to_owned())));

        filter.select_options("blood_group", Vec::new());
        assert!(!filter.contains("blood_group"));
    }

    #[test]
    fn selections_tolerate_scalar_storage() {
        let mut filter = FilterValue::new();
        filter.update("gender", Some("female".into()));
        assert_eq!(filter.selections("gender"), vec!["female".to_owned()]);
    }

    // Mutual exclusion: mode switches clear the other representation.
    #[test]
    fn mode_switches_are_mutually_exclusive() {
        let mut filter = FilterValue::new();
        filter.set_numeric_range("age", (18.0, 99.0), 25.0, 40.0);
        assert!(filter.contains("min_age") && filter.contains("max_age"));

        filter.use_exact_mode("age");
        assert!(!filter.contains("min_age"));
        assert!(!filter.contains("max_age"));
        assert!(filter.is_exact_mode("age"));
        // No default exact value is auto-populated.
        assert!(!filter.contains("age"));

        filter.set_exact("age", Some(30.0));
        assert!(filter.contains("age"));

        filter.use_range_mode("age");
        assert!(!filter.contains("age"));
        assert!(!filter.contains("age_mode"));
        assert!(!filter.is_exact_mode("age"));
    }

    #[test]
    fn exact_mode_inferred_from_lone_exact_value() {
        // A persisted campaign filter: exact value, no mode flag.
        let mut filter = FilterValue::new();
        filter.update("age", Some(30.0.into()));
        assert!(filter.is_exact_mode("age"));

        // A bound present flips the inference back to range mode.
        filter.update("min_age", Some(20.0.into()));
        assert!(!filter.is_exact_mode("age"));
    }

    // Domain-extreme omission.
    #[test]
    fn bounds_at_domain_extremes_are_omitted() {
        let mut filter = FilterValue::new();
        filter.set_numeric_range("age", (0.0, 100.0), 0.0, 100.0);
        assert!(filter.is_empty());

        filter.set_numeric_range("age", (0.0, 100.0), 0.0, 60.0);
        assert!(!filter.contains("min_age"));
        assert_eq!(filter.get("max_age").unwrap().as_number(), Some(60.0));

        // Dragging back to the extreme removes the stored bound again.
        filter.set_numeric_range("age", (0.0, 100.0), 0.0, 100.0);
        assert!(filter.is_empty());
    }

    #[test]
    fn both_bounds_move_in_one_transition() {
        let mut filter = FilterValue::new();
        filter.set_numeric_range("height", (100.0, 220.0), 150.0, 190.0);
        assert_eq!(filter.numeric_range("height", (100.0, 220.0)), (150.0, 190.0));
        assert_eq!(filter.len(), 2);
    }

    #[test]
    fn numeric_bound_keys_keep_dots() {
        let mut filter = FilterValue::new();
        filter.set_numeric_range("address.latitude", (-90.0, 90.0), 48.0, 52.0);
        assert!(filter.contains("min_address.latitude"));
        assert!(filter.contains("max_address.latitude"));
    }

    #[test]
    fn date_bound_keys_replace_dots() {
        let mut filter = FilterValue::new();
        filter.set_min_bound("address.opened", Some("2020-01-01".to_owned()));
        assert!(filter.contains("min_address_opened"));
        assert_eq!(filter.min_bound("address.opened"), Some("2020-01-01"));

        filter.set_min_bound("address.opened", None);
        assert!(filter.is_empty());
    }

    #[test]
    fn round_trips_as_plain_json_map() {
        let mut filter = FilterValue::new();
        filter.update("min_age", Some(25.0.into()));
        filter.update("gender", Some("female".into()));
        filter.update(
            "blood_group",
            Some(vec!["AB-".to_owned(), "O-".to_owned()].into()),
        );

        let json = serde_json::to_value(&filter).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "min_age": 25.0,
                "gender": "female",
                "blood_group": ["AB-", "O-"]
            })
        );

        let back: FilterValue = serde_json::from_value(json).unwrap();
        assert_eq!(back, filter);
    }

    #[test]
    fn format_number_drops_integral_fraction() {
        assert_eq!(format_number(25.0), "25");
        assert_eq!(format_number(0.01), "0.01");
        assert_eq!(format_number(0.000_001), "0.000001");
    }
}
