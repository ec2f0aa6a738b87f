// Wire models for the admin API.
//
// Shapes mirror the backend's JSON exactly; field renames are applied where
// the wire casing differs from Rust convention. Domain-level helpers live
// in `canvass-core` -- this file stays a faithful transcription of the wire.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

// ── Campaigns ───────────────────────────────────────────────────────

/// A marketing campaign as returned by `/api/campaigns`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Campaign {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub start_date: String,
    pub end_date: String,
    pub status: String,
    /// Persisted prospect filter in the nested API form
    /// (`{"age": {"min": 25, "max": 40}, "gender": "female"}`).
    /// `canvass_core::filter::from_api_filter` turns this into the flat
    /// editing form.
    #[serde(default)]
    pub prospect_filter: serde_json::Value,
    pub slug: String,
    #[serde(default)]
    pub landingpage_id: Option<String>,
    #[serde(default)]
    pub landingpage: Option<LandingpageRef>,
}

/// Abbreviated landing page reference embedded in a campaign.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LandingpageRef {
    pub id: String,
    pub title: String,
}

/// Payload for creating or updating a campaign.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CampaignDraft {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub start_date: String,
    pub end_date: String,
    pub status: String,
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub landingpage_id: Option<String>,
    #[serde(default)]
    pub prospect_filter: serde_json::Value,
}

// ── Landing pages ───────────────────────────────────────────────────

/// A content section of a landing page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LandingpageSection {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub cta_text: String,
    #[serde(default)]
    pub cta_url: String,
}

/// A landing page as returned by `/api/landingpages`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Landingpage {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub headline: String,
    #[serde(default)]
    pub subline: String,
    #[serde(default)]
    pub sections: Vec<LandingpageSection>,
    /// Campaigns currently pointing at this page. The delete screen uses
    /// this to warn about dangling references.
    #[serde(default)]
    pub campaigns: Vec<Campaign>,
}

/// Payload for creating or updating a landing page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LandingpageDraft {
    pub title: String,
    #[serde(default)]
    pub headline: String,
    #[serde(default)]
    pub subline: String,
    #[serde(default)]
    pub sections: Vec<LandingpageSection>,
}

// ── Prospects ───────────────────────────────────────────────────────

/// A prospect record. The prospect store uses camelCase on the wire,
/// unlike the rest of the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prospect {
    pub id: String,
    pub gender: String,
    pub age: u32,
    pub birth_date: String,
    #[serde(default)]
    pub image: String,
    pub blood_group: String,
    pub height: f64,
    pub weight: f64,
    #[serde(default)]
    pub eye_color: String,
    #[serde(default)]
    pub hair_color: String,
    #[serde(default)]
    pub hair_type: String,
    pub address: ProspectAddress,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProspectAddress {
    #[serde(default)]
    pub address: String,
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub plz: String,
    pub country: String,
    #[serde(default)]
    pub latitude: f64,
    #[serde(default)]
    pub longitude: f64,
}

// ── Search criteria ─────────────────────────────────────────────────

/// One bound of a `{min, max}` criteria range. The backend mixes numeric
/// ranges (age, height) and string ranges (dates, postal codes) in the
/// same response, so bounds are number-or-string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RangeBound {
    Number(f64),
    Text(String),
}

/// One filterable field's criteria: either an enumerated option list or a
/// `{min, max}` domain range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CriteriaValue {
    Options(Vec<String>),
    Range { min: RangeBound, max: RangeBound },
}

/// Response of `GET /api/prospects/search-criteria`: field name (dot paths
/// allowed, e.g. `address.city`) to criteria. Field order is meaningful --
/// screens render fields in the order the server declares them.
pub type SearchCriteria = IndexMap<String, CriteriaValue>;

// ── Outbox ──────────────────────────────────────────────────────────

/// Result of `POST /api/campaigns/{id}/send-emails`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailSendReport {
    #[serde(default)]
    pub message: String,
    pub emails_sent: u64,
    pub total_emails_sent: u64,
    pub notified_prospects: u64,
    pub available_prospects: u64,
    pub total_prospects: u64,
}

/// Delivery counters from `GET /api/campaigns/{id}/send-emails/sent`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentEmailStats {
    pub total_emails_sent: u64,
    pub notified_prospects: u64,
    pub available_prospects: u64,
    pub total_prospects: u64,
}

// ── Session ─────────────────────────────────────────────────────────

/// The authenticated admin user, from `GET /api/user`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminUser {
    pub id: String,
    pub name: String,
    pub email: String,
}
