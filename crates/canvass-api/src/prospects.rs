// Prospect endpoints
//
// Read-only access to the prospect store: paginated listing with filter
// query params, the server-declared search criteria, and the match-count
// side channel.

use tracing::debug;

use crate::client::AdminClient;
use crate::error::Error;
use crate::models::{Prospect, SearchCriteria};
use crate::pagination::{PageRequest, Paginated};

/// Path the match counter queries with `per_page=1`.
pub const PROSPECT_FILTER_PATH: &str = "api/prospects/filter";

impl AdminClient {
    /// List prospects matching the given filter query pairs.
    ///
    /// `GET /api/prospects?page=<n>&per_page=<n>&<encoded filter>` --
    /// `filter` is whatever `canvass_core::filter::encode` produced; this
    /// layer never constructs filter params by hand.
    pub async fn list_prospects(
        &self,
        page: PageRequest,
        filter: &[(String, String)],
    ) -> Result<Paginated<Prospect>, Error> {
        debug!(page = page.page, filters = filter.len(), "listing prospects");
        let mut query = page.query_pairs();
        query.extend_from_slice(filter);
        self.get_json("api/prospects", &query).await
    }

    /// The server-declared filterable fields and their domains.
    ///
    /// `GET /api/prospects/search-criteria` -- field order in the response
    /// is the order screens render controls in.
    pub async fn prospect_search_criteria(&self) -> Result<SearchCriteria, Error> {
        debug!("fetching prospect search criteria");
        self.get_json("api/prospects/search-criteria", &[]).await
    }

    /// How many prospects match the encoded filter.
    ///
    /// `GET /api/prospects/filter?<filter>&per_page=1`, count read from
    /// `meta.total` so no rows are transferred.
    pub async fn count_prospects(&self, filter: &[(String, String)]) -> Result<u64, Error> {
        self.count_matching(PROSPECT_FILTER_PATH, filter).await
    }
}
