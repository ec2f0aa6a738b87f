// Campaign endpoints
//
// CRUD on /api/campaigns plus the email-outbox operations hanging off a
// single campaign.

use tracing::debug;

use crate::client::AdminClient;
use crate::error::Error;
use crate::models::{Campaign, CampaignDraft, EmailSendReport, SentEmailStats};
use crate::pagination::{PageRequest, Paginated};

impl AdminClient {
    /// List campaigns, one page at a time.
    ///
    /// `GET /api/campaigns?page=<n>&per_page=<n>`
    pub async fn list_campaigns(&self, page: PageRequest) -> Result<Paginated<Campaign>, Error> {
        debug!(page = page.page, "listing campaigns");
        self.get_json("api/campaigns", &page.query_pairs()).await
    }

    /// Fetch a single campaign.
    ///
    /// `GET /api/campaigns/{id}`
    pub async fn get_campaign(&self, id: &str) -> Result<Campaign, Error> {
        self.get_json(&format!("api/campaigns/{id}"), &[]).await
    }

    /// Create a campaign.
    ///
    /// `POST /api/campaigns` -- validation failures come back as
    /// [`Error::Validation`](crate::error::Error::Validation).
    pub async fn create_campaign(&self, draft: &CampaignDraft) -> Result<Campaign, Error> {
        debug!(title = %draft.title, "creating campaign");
        self.post_json("api/campaigns", &[], draft).await
    }

    /// Update a campaign.
    ///
    /// `PUT /api/campaigns/{id}`
    pub async fn update_campaign(
        &self,
        id: &str,
        draft: &CampaignDraft,
    ) -> Result<Campaign, Error> {
        debug!(id, "updating campaign");
        self.put_json(&format!("api/campaigns/{id}"), draft).await
    }

    /// Delete a campaign.
    ///
    /// `DELETE /api/campaigns/{id}`
    pub async fn delete_campaign(&self, id: &str) -> Result<(), Error> {
        debug!(id, "deleting campaign");
        self.delete(&format!("api/campaigns/{id}")).await
    }

    // ── Outbox ──────────────────────────────────────────────────────

    /// Send campaign emails to matching prospects.
    ///
    /// `POST /api/campaigns/{id}/send-emails[?force=true]` -- `force`
    /// re-sends to prospects that were already notified.
    pub async fn send_campaign_emails(
        &self,
        id: &str,
        force: bool,
    ) -> Result<EmailSendReport, Error> {
        debug!(id, force, "sending campaign emails");
        let query: Vec<(String, String)> = if force {
            vec![("force".to_owned(), "true".to_owned())]
        } else {
            Vec::new()
        };
        self.post_json(
            &format!("api/campaigns/{id}/send-emails"),
            &query,
            &serde_json::json!({}),
        )
        .await
    }

    /// Delivery counters for a campaign's outbox.
    ///
    /// `GET /api/campaigns/{id}/send-emails/sent`
    pub async fn sent_email_stats(&self, id: &str) -> Result<SentEmailStats, Error> {
        self.get_json(&format!("api/campaigns/{id}/send-emails/sent"), &[])
            .await
    }
}
