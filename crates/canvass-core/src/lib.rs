//! Domain logic for the canvass admin console.
//!
//! The heart of the crate is the dynamic search-filter subsystem
//! ([`filter`]): a schema-driven engine that renders whatever fields the
//! server declares, keeps the filter map in minimal form, and encodes it
//! onto the wire. Around it sit the injectable TTL cache ([`cache`]), the
//! debounced match counter ([`counter`]), the generic list/table contract
//! ([`list`]), and the [`Console`] facade that wires them to the API
//! client.

pub mod cache;
pub mod config;
mod console;
pub mod counter;
mod error;
pub mod filter;
pub mod list;

pub use cache::{CacheOptions, CacheService, CacheStats};
pub use config::{ConsoleConfig, Credentials, TlsVerification};
pub use console::Console;
pub use counter::{CountSource, CountState, MatchCounter};
pub use error::CoreError;
pub use filter::{FieldControl, FieldSchema, FilterEngine, FilterSchema, FilterValue};
pub use list::{DeleteFlow, DeleteTarget, ListService, ListState, SelectionState};

// Wire types re-exported for consumers that only depend on core.
pub use canvass_api::{models, PageMeta, PageRequest, Paginated};
