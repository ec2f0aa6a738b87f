// Landing page endpoints
//
// CRUD on /api/landingpages.

use tracing::debug;

use crate::client::AdminClient;
use crate::error::Error;
use crate::models::{Landingpage, LandingpageDraft};
use crate::pagination::{PageRequest, Paginated};

impl AdminClient {
    /// List landing pages, one page at a time.
    ///
    /// `GET /api/landingpages?page=<n>&per_page=<n>`
    pub async fn list_landingpages(
        &self,
        page: PageRequest,
    ) -> Result<Paginated<Landingpage>, Error> {
        debug!(page = page.page, "listing landing pages");
        self.get_json("api/landingpages", &page.query_pairs()).await
    }

    /// Fetch a single landing page with its sections and linked campaigns.
    ///
    /// `GET /api/landingpages/{id}`
    pub async fn get_landingpage(&self, id: &str) -> Result<Landingpage, Error> {
        self.get_json(&format!("api/landingpages/{id}"), &[]).await
    }

    /// Create a landing page.
    ///
    /// `POST /api/landingpages`
    pub async fn create_landingpage(
        &self,
        draft: &LandingpageDraft,
    ) -> Result<Landingpage, Error> {
        debug!(title = %draft.title, "creating landing page");
        self.post_json("api/landingpages", &[], draft).await
    }

    /// Update a landing page.
    ///
    /// `PUT /api/landingpages/{id}`
    pub async fn update_landingpage(
        &self,
        id: &str,
        draft: &LandingpageDraft,
    ) -> Result<Landingpage, Error> {
        debug!(id, "updating landing page");
        self.put_json(&format!("api/landingpages/{id}"), draft).await
    }

    /// Delete a landing page.
    ///
    /// `DELETE /api/landingpages/{id}`
    pub async fn delete_landingpage(&self, id: &str) -> Result<(), Error> {
        debug!(id, "deleting landing page");
        self.delete(&format!("api/landingpages/{id}")).await
    }
}
