//! Async client for the Canvass campaign-platform admin API.
//!
//! Wire-level concerns only: transport construction, session/CSRF auth,
//! typed endpoint calls, pagination envelopes, and error translation.
//! Domain logic (filters, caching, list orchestration) lives in
//! `canvass-core`.

mod auth;
mod campaigns;
mod client;
pub mod error;
mod landingpages;
pub mod models;
pub mod pagination;
mod prospects;
pub mod transport;

pub use client::AdminClient;
pub use error::Error;
pub use pagination::{PageLinks, PageMeta, PageRequest, Paginated};
pub use prospects::PROSPECT_FILTER_PATH;
