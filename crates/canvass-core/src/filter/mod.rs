// ── Dynamic search-filter subsystem ──
//
// schema:    server-declared field shapes, resolved to a tagged union
// value:     the flat editing form with its minimal-form invariant
// engine:    schema x value -> control descriptors + canonical edits
// params:    FilterValue -> wire query parameters (the only encoder)
// transform: flat editing form <-> nested persistence form
// labels:    display-name resolution

mod engine;
mod labels;
mod params;
mod schema;
mod transform;
mod value;

pub use engine::{FieldControl, FilterEngine, NumericMode};
pub use labels::label_for;
pub use params::{encode, QueryParams};
pub use schema::{is_date_field, numeric_step, FieldSchema, FilterSchema};
pub use transform::{from_api_filter, to_api_filter};
pub use value::{format_number, FilterEntry, FilterValue, EXACT_MODE};
