// ── Console orchestration ──
//
// Single entry point owning the API client and the cache. Screens ask it
// for wired services (entity lists, the criteria schema, match counters,
// outbox operations) and never touch the wire layer directly. Cheaply
// cloneable; clones share the client and the cache.

use std::sync::Arc;

use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use tracing::debug;

use canvass_api::models::{
    AdminUser, Campaign, CampaignDraft, EmailSendReport, Landingpage, LandingpageDraft, Prospect,
    SentEmailStats,
};
use canvass_api::transport::{TlsMode, TransportConfig};
use canvass_api::{AdminClient, PageRequest, Paginated};

use crate::cache::{tags, CacheOptions, CacheService};
use crate::config::{ConsoleConfig, Credentials, TlsVerification};
use crate::counter::{CountSource, MatchCounter};
use crate::error::CoreError;
use crate::filter::{self, FilterSchema, FilterValue, QueryParams};
use crate::list::{EntityRemover, ListService, PageSource};

/// Admin console facade over one platform connection.
#[derive(Clone)]
pub struct Console {
    api: Arc<AdminClient>,
    cache: CacheService,
}

impl Console {
    /// Build a console from connection config. Does not authenticate --
    /// call [`sign_in`](Self::sign_in) before hitting `/api/*` routes.
    pub fn new(config: &ConsoleConfig) -> Result<Self, CoreError> {
        let transport = TransportConfig {
            tls: match &config.tls {
                TlsVerification::SystemDefaults => TlsMode::System,
                TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
                TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
            },
            timeout: config.timeout,
            cookie_jar: None,
        };
        let api = AdminClient::new(config.base_url.clone(), &transport)?;
        Ok(Self {
            api: Arc::new(api),
            cache: CacheService::new(),
        })
    }

    /// Wrap an existing client (tests use this with a mock server).
    pub fn from_client(api: AdminClient) -> Self {
        Self {
            api: Arc::new(api),
            cache: CacheService::new(),
        }
    }

    pub fn cache(&self) -> &CacheService {
        &self.cache
    }

    pub fn api(&self) -> &Arc<AdminClient> {
        &self.api
    }

    // ── Session ─────────────────────────────────────────────────────

    pub async fn sign_in(&self, credentials: &Credentials) -> Result<(), CoreError> {
        self.api
            .login(&credentials.email, &credentials.password)
            .await?;
        Ok(())
    }

    pub async fn sign_out(&self) -> Result<(), CoreError> {
        self.api.logout().await?;
        self.cache.clear();
        Ok(())
    }

    /// The signed-in admin, cached under the `user` tag.
    pub async fn current_user(&self) -> Result<AdminUser, CoreError> {
        let api = Arc::clone(&self.api);
        self.cache
            .get_or_fetch("user:self", CacheOptions::default(), || async move {
                api.current_user().await.map_err(CoreError::from)
            })
            .await
    }

    // ── Entity lists ────────────────────────────────────────────────

    /// The campaigns list screen's service: cached pages, delete wired.
    pub fn campaigns(&self) -> ListService<Campaign> {
        ListService::new(
            Arc::new(CampaignPages {
                api: Arc::clone(&self.api),
            }),
            self.cache.clone(),
            "campaigns:list",
            tags::CAMPAIGNS,
        )
        .with_remover(Arc::new(CampaignRemover {
            api: Arc::clone(&self.api),
        }))
    }

    /// The landing pages list screen's service.
    pub fn landingpages(&self) -> ListService<Landingpage> {
        ListService::new(
            Arc::new(LandingpagePages {
                api: Arc::clone(&self.api),
            }),
            self.cache.clone(),
            "landingpages:list",
            tags::LANDINGPAGES,
        )
        .with_remover(Arc::new(LandingpageRemover {
            api: Arc::clone(&self.api),
        }))
    }

    /// The prospects list screen's service for one filter. The cache key
    /// carries the encoded filter so differently-filtered pages never
    /// collide. Prospects are read-only: no remover.
    pub fn prospects(&self, filter: &FilterValue) -> ListService<Prospect> {
        let query = filter::encode(filter);
        let key_suffix: String = query
            .iter()
            .map(|(k, v)| format!("&{k}={v}"))
            .collect();
        ListService::new(
            Arc::new(ProspectPages {
                api: Arc::clone(&self.api),
                query,
            }),
            self.cache.clone(),
            format!("prospects:list{key_suffix}"),
            tags::PROSPECTS,
        )
    }

    // ── Filtering ───────────────────────────────────────────────────

    /// The prospect filter schema, resolved and cached for the session.
    ///
    /// A fetch failure is terminal for filter screens: they render a "no
    /// criteria available" state, never a partial field set.
    pub async fn criteria(&self) -> Result<FilterSchema, CoreError> {
        let api = Arc::clone(&self.api);
        self.cache
            .get_or_fetch("prospects:criteria", CacheOptions::default(), || async move {
                let wire = api
                    .prospect_search_criteria()
                    .await
                    .map_err(|e| CoreError::CriteriaUnavailable {
                        reason: e.to_string(),
                    })?;
                debug!(fields = wire.len(), "resolved search criteria");
                Ok(FilterSchema::from_wire(wire))
            })
            .await
    }

    /// One-shot match count for a filter.
    pub async fn count_prospects(&self, filter: &FilterValue) -> Result<u64, CoreError> {
        let query = filter::encode(filter);
        Ok(self.api.count_prospects(&query).await?)
    }

    /// A debounced counter for interactive filter editing.
    pub fn match_counter(&self) -> MatchCounter {
        MatchCounter::spawn(Some(Arc::new(ProspectCounts {
            api: Arc::clone(&self.api),
        })))
    }

    // ── Mutations (cache-invalidating) ──────────────────────────────

    pub async fn create_campaign(&self, draft: &CampaignDraft) -> Result<Campaign, CoreError> {
        let created = self.api.create_campaign(draft).await?;
        self.cache.invalidate_by_tags(&[tags::CAMPAIGNS]);
        Ok(created)
    }

    pub async fn update_campaign(
        &self,
        id: &str,
        draft: &CampaignDraft,
    ) -> Result<Campaign, CoreError> {
        let updated = self.api.update_campaign(id, draft).await?;
        self.cache.invalidate_by_tags(&[tags::CAMPAIGNS]);
        Ok(updated)
    }

    pub async fn get_campaign(&self, id: &str) -> Result<Campaign, CoreError> {
        Ok(self.api.get_campaign(id).await?)
    }

    pub async fn create_landingpage(
        &self,
        draft: &LandingpageDraft,
    ) -> Result<Landingpage, CoreError> {
        let created = self.api.create_landingpage(draft).await?;
        self.cache.invalidate_by_tags(&[tags::LANDINGPAGES]);
        Ok(created)
    }

    pub async fn update_landingpage(
        &self,
        id: &str,
        draft: &LandingpageDraft,
    ) -> Result<Landingpage, CoreError> {
        let updated = self.api.update_landingpage(id, draft).await?;
        self.cache.invalidate_by_tags(&[tags::LANDINGPAGES]);
        Ok(updated)
    }

    pub async fn get_landingpage(&self, id: &str) -> Result<Landingpage, CoreError> {
        Ok(self.api.get_landingpage(id).await?)
    }

    // ── Outbox ──────────────────────────────────────────────────────

    pub async fn send_campaign_emails(
        &self,
        id: &str,
        force: bool,
    ) -> Result<EmailSendReport, CoreError> {
        Ok(self.api.send_campaign_emails(id, force).await?)
    }

    pub async fn sent_email_stats(&self, id: &str) -> Result<SentEmailStats, CoreError> {
        Ok(self.api.sent_email_stats(id).await?)
    }
}

// ── Wire adapters ───────────────────────────────────────────────────

struct CampaignPages {
    api: Arc<AdminClient>,
}

impl PageSource<Campaign> for CampaignPages {
    fn fetch_page(&self, req: PageRequest) -> BoxFuture<'_, Result<Paginated<Campaign>, CoreError>> {
        async move { self.api.list_campaigns(req).await.map_err(CoreError::from) }.boxed()
    }
}

struct CampaignRemover {
    api: Arc<AdminClient>,
}

impl EntityRemover for CampaignRemover {
    fn delete<'a>(&'a self, id: &'a str) -> BoxFuture<'a, Result<(), CoreError>> {
        async move { self.api.delete_campaign(id).await.map_err(CoreError::from) }.boxed()
    }
}

struct LandingpagePages {
    api: Arc<AdminClient>,
}

impl PageSource<Landingpage> for LandingpagePages {
    fn fetch_page(
        &self,
        req: PageRequest,
    ) -> BoxFuture<'_, Result<Paginated<Landingpage>, CoreError>> {
        async move {
            self.api
                .list_landingpages(req)
                .await
                .map_err(CoreError::from)
        }
        .boxed()
    }
}

struct LandingpageRemover {
    api: Arc<AdminClient>,
}

impl EntityRemover for LandingpageRemover {
    fn delete<'a>(&'a self, id: &'a str) -> BoxFuture<'a, Result<(), CoreError>> {
        async move {
            self.api
                .delete_landingpage(id)
                .await
                .map_err(CoreError::from)
        }
        .boxed()
    }
}

struct ProspectPages {
    api: Arc<AdminClient>,
    query: QueryParams,
}

impl PageSource<Prospect> for ProspectPages {
    fn fetch_page(&self, req: PageRequest) -> BoxFuture<'_, Result<Paginated<Prospect>, CoreError>> {
        async move {
            self.api
                .list_prospects(req, &self.query)
                .await
                .map_err(CoreError::from)
        }
        .boxed()
    }
}

struct ProspectCounts {
    api: Arc<AdminClient>,
}

impl CountSource for ProspectCounts {
    async fn count(&self, query: QueryParams) -> Result<u64, CoreError> {
        self.api
            .count_prospects(&query)
            .await
            .map_err(CoreError::from)
    }
}
