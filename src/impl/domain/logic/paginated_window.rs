use std::{
    collections::HashSet,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use tracing::{debug, warn};

use crate::{
    domain::{logic::search_filter::search_loaded, repositories::collection_repository::CollectionRepository},
    entities::{
        CollectionPath, Cursor, FetchPageError, FilterConfig, LedgerRecord, LedgerSettings, Page,
        WindowState,
    },
};

type Patch<R> = Arc<dyn Fn(&mut Vec<R>) + Send + Sync>;

/// Incrementally loaded view over one collection.
///
/// The window never reports errors to its caller: a missing index raises
/// [`index_error`](Self::index_error), any other failure just ends the fetch
/// with no new data. At most one fetch is in flight; a fetch whose result
/// arrives after the window was re-initialized, refreshed or disposed is
/// dropped.
pub struct PaginatedWindow<R, C>
where
    R: LedgerRecord,
    C: CollectionRepository<R>,
{
    repository: C,
    page_size: usize,
    inner: Mutex<Inner<R>>,
}

struct Inner<R: LedgerRecord> {
    binding: Option<Binding<R>>,
    state: WindowState<R>,
    generation: u64,
    // Local edits made while a fetch is in flight, replayed onto its records.
    pending_patches: Vec<Patch<R>>,
    disposed: bool,
}

struct Binding<R: LedgerRecord> {
    path: CollectionPath,
    config: FilterConfig<R::SortField>,
}

impl<R: LedgerRecord> Clone for Binding<R> {
    fn clone(&self) -> Self {
        Self {
            path: self.path.clone(),
            config: self.config.clone(),
        }
    }
}

enum FetchKind {
    Replace,
    Append,
}

struct FetchRequest<R: LedgerRecord> {
    generation: u64,
    binding: Binding<R>,
    cursor: Option<Cursor>,
    kind: FetchKind,
}

impl<R, C> PaginatedWindow<R, C>
where
    R: LedgerRecord,
    C: CollectionRepository<R>,
{
    pub fn new(repository: C, page_size: usize) -> Self {
        Self {
            repository,
            page_size: page_size.max(1),
            inner: Mutex::new(Inner {
                binding: None,
                state: WindowState::default(),
                generation: 0,
                pending_patches: Vec::new(),
                disposed: false,
            }),
        }
    }

    pub fn with_settings(repository: C, settings: &LedgerSettings) -> Self {
        Self::new(repository, settings.page_size)
    }

    fn lock(&self) -> MutexGuard<'_, Inner<R>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Bind the window to `path` and `config`, drop everything loaded so far
    /// and fetch the first page.
    pub async fn initialize(&self, path: CollectionPath, config: FilterConfig<R::SortField>) {
        let request = {
            let mut inner = self.lock();
            if inner.disposed {
                return;
            }
            inner.generation += 1;
            inner.state = WindowState::default();
            inner.pending_patches.clear();
            let binding = Binding { path, config };
            inner.binding = Some(binding.clone());
            if !binding.path.is_bound() {
                debug!(collection = %binding.path, "no owner bound, skipping fetch");
                return;
            }
            inner.state.loading = true;
            FetchRequest {
                generation: inner.generation,
                binding,
                cursor: None,
                kind: FetchKind::Replace,
            }
        };
        self.run_fetch(request).await;
    }

    /// Re-initialize only if the path or the filter identity changed.
    /// Returns whether a reload happened.
    ///
    /// A change outside the identity (sort direction) is still recorded and
    /// used by the next fetch.
    pub async fn sync(&self, path: CollectionPath, config: FilterConfig<R::SortField>) -> bool {
        {
            let mut inner = self.lock();
            if inner.disposed {
                return false;
            }
            if let Some(binding) = inner.binding.as_mut() {
                if binding.path == path && binding.config.identity() == config.identity() {
                    binding.config = config;
                    return false;
                }
            }
        }
        self.initialize(path, config).await;
        true
    }

    /// Fetch the next page and append it. No-op while a fetch is in flight,
    /// when the last page was short, or when nothing is bound.
    pub async fn load_more(&self) {
        let request = {
            let mut inner = self.lock();
            if inner.disposed || inner.state.loading || !inner.state.has_more {
                return;
            }
            let Some(binding) = inner.binding.clone() else {
                return;
            };
            if !binding.path.is_bound() {
                return;
            }
            inner.state.loading = true;
            inner.state.index_error = false;
            FetchRequest {
                generation: inner.generation,
                binding,
                cursor: inner.state.cursor.clone(),
                kind: FetchKind::Append,
            }
        };
        self.run_fetch(request).await;
    }

    /// Reload from the first page with the current binding.
    pub async fn refresh(&self) {
        let binding = self.lock().binding.clone();
        if let Some(Binding { path, config }) = binding {
            self.initialize(path, config).await;
        }
    }

    /// Patch the loaded records in place, without fetching. Used to mirror a
    /// successful add/update/delete made elsewhere.
    ///
    /// If a fetch is in flight, the patch is also applied to that fetch's
    /// records when they arrive. Records the replay duplicates are dropped
    /// by id, keeping the first copy, so an insert made during a fetch shows
    /// up once whichever page the store also returns it in.
    pub fn set_data<F>(&self, updater: F)
    where
        F: Fn(&mut Vec<R>) + Send + Sync + 'static,
    {
        let mut inner = self.lock();
        if inner.disposed {
            return;
        }
        updater(&mut inner.state.data);
        if inner.state.loading {
            inner.pending_patches.push(Arc::new(updater));
        }
    }

    /// Detach the window. Results still in flight are dropped and every
    /// later call is a no-op.
    pub fn dispose(&self) {
        let mut inner = self.lock();
        inner.disposed = true;
        inner.generation += 1;
        inner.binding = None;
        inner.pending_patches.clear();
        inner.state = WindowState {
            has_more: false,
            ..WindowState::default()
        };
    }

    async fn run_fetch(&self, request: FetchRequest<R>) {
        let FetchRequest {
            generation,
            binding,
            cursor,
            kind,
        } = request;
        debug!(
            collection = %binding.path,
            generation,
            cursor = ?cursor.as_ref().map(Cursor::token),
            "fetching page"
        );
        let result = self
            .repository
            .fetch_page(&binding.path, &binding.config, self.page_size, cursor.as_ref())
            .await;

        let mut inner = self.lock();
        if inner.disposed || inner.generation != generation {
            debug!(collection = %binding.path, generation, "dropping stale page");
            return;
        }
        inner.state.loading = false;
        let patches = std::mem::take(&mut inner.pending_patches);
        match result {
            Ok(Page {
                mut records,
                cursor,
                is_full,
            }) => {
                for patch in &patches {
                    patch(&mut records);
                }
                debug!(
                    collection = %binding.path,
                    generation,
                    received = records.len(),
                    is_full,
                    "page applied"
                );
                match kind {
                    FetchKind::Replace => {
                        inner.state.data = records;
                        inner.state.cursor = cursor;
                    }
                    FetchKind::Append => {
                        inner.state.data.extend(records);
                        if cursor.is_some() {
                            inner.state.cursor = cursor;
                        }
                    }
                }
                if !patches.is_empty() {
                    dedupe_by_id(&mut inner.state.data);
                }
                inner.state.has_more = is_full;
            }
            Err(FetchPageError::IndexMissing {
                collection_path,
                details,
            }) => {
                warn!(collection = %collection_path, %details, "missing index for list query");
                inner.state.index_error = true;
            }
            Err(FetchPageError::Store(e)) => {
                warn!(collection = %binding.path, error = ?e, "page fetch failed");
            }
        }
    }

    // Read access.
    // ---

    pub fn data(&self) -> Vec<R> {
        self.lock().state.data.clone()
    }

    pub fn loading(&self) -> bool {
        self.lock().state.loading
    }

    pub fn has_more(&self) -> bool {
        self.lock().state.has_more
    }

    pub fn index_error(&self) -> bool {
        self.lock().state.index_error
    }

    pub fn snapshot(&self) -> WindowState<R> {
        self.lock().state.clone()
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn config(&self) -> Option<FilterConfig<R::SortField>> {
        self.lock().binding.as_ref().map(|b| b.config.clone())
    }

    /// Loaded records narrowed by the bound search term. Records not loaded
    /// yet are never part of the result.
    pub fn search_results(&self) -> Vec<R> {
        let inner = self.lock();
        let term = inner
            .binding
            .as_ref()
            .and_then(|b| b.config.search_term.as_deref());
        search_loaded(&inner.state.data, term)
    }
}

fn dedupe_by_id<R: LedgerRecord>(records: &mut Vec<R>) {
    let mut seen = HashSet::new();
    records.retain(|r| seen.insert(r.id().clone()));
}
