// ── Generic list/table contract ──
//
// Every entity screen plugs into the same loop: load a page (or all
// pages), publish state through a watch channel, track row selection,
// and run deletes through a confirm -> delete -> invalidate -> reload
// pipeline. Screens differ only in the `PageSource`/`EntityRemover`
// adapters they hand in.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use futures_util::future::{try_join_all, BoxFuture};
use tokio::sync::watch;
use tracing::{debug, warn};

use canvass_api::{PageRequest, Paginated};

use crate::cache::{CacheOptions, CacheService};
use crate::error::CoreError;

/// Upper bound on the fetch-all fan-out. A result set wider than this is
/// refused rather than hammered with concurrent page requests.
pub const MAX_FETCH_ALL_PAGES: u32 = 50;

/// Supplies pages of one entity type.
pub trait PageSource<T>: Send + Sync {
    fn fetch_page(&self, req: PageRequest) -> BoxFuture<'_, Result<Paginated<T>, CoreError>>;
}

/// Deletes one entity by id.
pub trait EntityRemover: Send + Sync {
    fn delete<'a>(&'a self, id: &'a str) -> BoxFuture<'a, Result<(), CoreError>>;
}

/// What the table renders right now.
///
/// `Failed` replaces the table wholesale; recovery is a full reload, not
/// per-field patching.
#[derive(Debug)]
pub enum ListState<T> {
    Loading,
    Ready(Arc<Paginated<T>>),
    Failed(String),
}

impl<T> Clone for ListState<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Loading => Self::Loading,
            Self::Ready(page) => Self::Ready(Arc::clone(page)),
            Self::Failed(msg) => Self::Failed(msg.clone()),
        }
    }
}

/// The load the service ran last, so `reload` can repeat it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LastLoad {
    None,
    Page(PageRequest),
    All { per_page: u32 },
}

/// Reusable list loader for one entity screen.
pub struct ListService<T> {
    source: Arc<dyn PageSource<T>>,
    remover: Option<Arc<dyn EntityRemover>>,
    cache: CacheService,
    cache_prefix: String,
    tag: String,
    state_tx: watch::Sender<ListState<T>>,
    last_load: Mutex<LastLoad>,
}

impl<T: Send + Sync + 'static> ListService<T> {
    /// `cache_prefix` keys this screen's pages; it must contain `tag` so
    /// tag invalidation reaches them.
    pub fn new(
        source: Arc<dyn PageSource<T>>,
        cache: CacheService,
        cache_prefix: impl Into<String>,
        tag: impl Into<String>,
    ) -> Self {
        let (state_tx, _) = watch::channel(ListState::Loading);
        Self {
            source,
            remover: None,
            cache,
            cache_prefix: cache_prefix.into(),
            tag: tag.into(),
            state_tx,
            last_load: Mutex::new(LastLoad::None),
        }
    }

    pub fn with_remover(mut self, remover: Arc<dyn EntityRemover>) -> Self {
        self.remover = Some(remover);
        self
    }

    pub fn state(&self) -> ListState<T> {
        self.state_tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ListState<T>> {
        self.state_tx.subscribe()
    }

    // ── Loading ─────────────────────────────────────────────────────

    /// Load one page through the cache.
    pub async fn load(&self, req: PageRequest) -> Result<Arc<Paginated<T>>, CoreError> {
        self.remember(LastLoad::Page(req));
        let key = format!(
            "{}:page={}:per_page={}",
            self.cache_prefix, req.page, req.per_page
        );
        let source = Arc::clone(&self.source);
        self.run(self.cache.get_or_fetch(&key, CacheOptions::default(), || async move {
            source.fetch_page(req).await.map(Arc::new)
        }))
        .await
    }

    /// Load the entire result set.
    ///
    /// Fetches page 1; when the metadata says more pages exist, fetches
    /// the rest concurrently and concatenates in page order. Used when a
    /// screen wants client-side sort/filter over the full set instead of
    /// server pagination.
    pub async fn load_all(&self, per_page: u32) -> Result<Arc<Paginated<T>>, CoreError> {
        self.remember(LastLoad::All { per_page });
        let key = format!("{}:all:per_page={per_page}", self.cache_prefix);
        let source = Arc::clone(&self.source);
        self.run(self.cache.get_or_fetch(&key, CacheOptions::default(), || async move {
            fetch_all(&*source, per_page).await.map(Arc::new)
        }))
        .await
    }

    /// Repeat the last load with a fresh fetch (the cached copy for that
    /// load is dropped first). This is both the manual-retry path and the
    /// revalidation step after a mutation.
    pub async fn reload(&self) -> Result<Arc<Paginated<T>>, CoreError> {
        let last = *self.last_load.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        match last {
            LastLoad::Page(req) => {
                self.cache.invalidate(&format!(
                    "{}:page={}:per_page={}",
                    self.cache_prefix, req.page, req.per_page
                ));
                self.load(req).await
            }
            LastLoad::All { per_page } => {
                self.cache
                    .invalidate(&format!("{}:all:per_page={per_page}", self.cache_prefix));
                self.load_all(per_page).await
            }
            LastLoad::None => self.load(PageRequest::default()).await,
        }
    }

    async fn run(
        &self,
        fut: impl Future<Output = Result<Arc<Paginated<T>>, CoreError>>,
    ) -> Result<Arc<Paginated<T>>, CoreError> {
        let _ = self.state_tx.send(ListState::Loading);
        match fut.await {
            Ok(page) => {
                let _ = self.state_tx.send(ListState::Ready(Arc::clone(&page)));
                Ok(page)
            }
            Err(e) => {
                let _ = self.state_tx.send(ListState::Failed(e.to_string()));
                Err(e)
            }
        }
    }

    fn remember(&self, load: LastLoad) {
        *self
            .last_load
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = load;
    }

    // ── Deletion ────────────────────────────────────────────────────

    /// Delete one entity, then invalidate this screen's cache tag and
    /// revalidate.
    ///
    /// There is no optimistic removal: on failure the item stays in the
    /// list untouched. A revalidation failure after a successful delete
    /// is reported through the list state (error panel with retry), not
    /// as a delete failure.
    pub async fn delete(&self, id: &str) -> Result<(), CoreError> {
        let remover = self.remover.as_ref().ok_or_else(|| {
            CoreError::Internal(format!("no remover configured for '{}'", self.tag))
        })?;

        remover.delete(id).await?;
        debug!(id, tag = %self.tag, "deleted; invalidating and revalidating");
        self.cache.invalidate(&self.tag);

        if let Err(e) = self.reload().await {
            warn!(error = %e, "revalidation after delete failed");
        }
        Ok(())
    }
}

async fn fetch_all<T>(
    source: &dyn PageSource<T>,
    per_page: u32,
) -> Result<Paginated<T>, CoreError> {
    let first = source.fetch_page(PageRequest::new(1, per_page)).await?;
    let last_page = first.meta.last_page;

    if last_page <= 1 {
        return Ok(first);
    }
    if last_page > MAX_FETCH_ALL_PAGES {
        return Err(CoreError::TooManyPages {
            pages: last_page,
            limit: MAX_FETCH_ALL_PAGES,
        });
    }

    let rest = try_join_all(
        (2..=last_page).map(|page| source.fetch_page(PageRequest::new(page, per_page))),
    )
    .await?;

    let mut data = first.data;
    for page in rest {
        data.extend(page.data);
    }

    // Collapse the metadata to a single synthetic page so the
    // `data.len() <= per_page` invariant still holds.
    let mut meta = first.meta;
    meta.current_page = 1;
    meta.last_page = 1;
    meta.per_page = u32::try_from(data.len()).unwrap_or(u32::MAX).max(1);

    Ok(Paginated {
        data,
        meta,
        links: canvass_api::PageLinks::default(),
    })
}

// ── Row selection ───────────────────────────────────────────────────

/// Selected row ids for bulk actions.
#[derive(Debug, Default, Clone)]
pub struct SelectionState {
    selected: HashSet<String>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle(&mut self, id: &str) {
        if !self.selected.remove(id) {
            self.selected.insert(id.to_owned());
        }
    }

    pub fn select_all<'a>(&mut self, ids: impl IntoIterator<Item = &'a str>) {
        self.selected.extend(ids.into_iter().map(str::to_owned));
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.contains(id)
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn ids(&self) -> Vec<String> {
        self.selected.iter().cloned().collect()
    }
}

// ── Delete confirmation flow ────────────────────────────────────────

/// The entity a confirmation dialog is naming.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteTarget {
    pub id: String,
    pub title: String,
}

/// Confirm-before-delete state machine.
///
/// `request` opens the dialog; `confirm` runs the delete pipeline and
/// closes only on success -- a failure clears the busy flag but leaves
/// the dialog open for retry or cancel.
#[derive(Debug, Default)]
pub struct DeleteFlow {
    target: Option<DeleteTarget>,
    deleting: bool,
}

impl DeleteFlow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open the dialog for one entity.
    pub fn request(&mut self, id: impl Into<String>, title: impl Into<String>) {
        self.target = Some(DeleteTarget {
            id: id.into(),
            title: title.into(),
        });
        self.deleting = false;
    }

    pub fn is_open(&self) -> bool {
        self.target.is_some()
    }

    pub fn is_deleting(&self) -> bool {
        self.deleting
    }

    pub fn target(&self) -> Option<&DeleteTarget> {
        self.target.as_ref()
    }

    /// Close without deleting.
    pub fn cancel(&mut self) {
        self.target = None;
        self.deleting = false;
    }

    /// Run the delete through the list service.
    pub async fn confirm<T: Send + Sync + 'static>(
        &mut self,
        list: &ListService<T>,
    ) -> Result<(), CoreError> {
        let Some(target) = self.target.clone() else {
            return Ok(());
        };

        self.deleting = true;
        match list.delete(&target.id).await {
            Ok(()) => {
                self.deleting = false;
                self.target = None;
                Ok(())
            }
            Err(e) => {
                self.deleting = false;
                Err(e)
            }
        }
    }
}
