use super::{CacheEvent, CacheNotifier};
use crate::error::EngineError;
use crate::model::{AnnotationSet, PageNumber, WordId};
use crate::service::DocumentService;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

#[derive(Default)]
struct AnnotationState {
    entries: HashMap<PageNumber, Arc<AnnotationSet>>,
    /// Last ticket handed out per page.
    issued: HashMap<PageNumber, u64>,
    /// Ticket of the refresh that produced the current entry.
    applied: HashMap<PageNumber, u64>,
}

/// Per-page annotation snapshots, refreshed independently of page content.
pub struct AnnotationCache {
    service: Arc<dyn DocumentService>,
    state: Mutex<AnnotationState>,
    notifier: CacheNotifier,
}

impl AnnotationCache {
    pub fn new(service: Arc<dyn DocumentService>, notifier: CacheNotifier) -> Self {
        Self {
            service,
            state: Mutex::new(AnnotationState::default()),
            notifier,
        }
    }

    pub fn get(&self, page: PageNumber) -> Option<Arc<AnnotationSet>> {
        self.state.lock().entries.get(&page).cloned()
    }

    pub fn contains(&self, page: PageNumber) -> bool {
        self.state.lock().entries.contains_key(&page)
    }

    fn issue_ticket(&self, page: PageNumber) -> u64 {
        let mut state = self.state.lock();
        let ticket = state.issued.entry(page).or_default();
        *ticket += 1;
        *ticket
    }

    /// Fetches annotations for `word_ids` and replaces the page's entry.
    ///
    /// An empty id list stores an empty set without touching the network. On
    /// failure the previous entry stays in place. A response that arrives
    /// after a later-issued refresh for the same page was stored is dropped,
    /// and the newer entry is returned instead.
    pub async fn refresh(
        &self,
        page: PageNumber,
        word_ids: Vec<WordId>,
    ) -> Result<Arc<AnnotationSet>, EngineError> {
        let ticket = self.issue_ticket(page);
        let set = if word_ids.is_empty() {
            AnnotationSet::default()
        } else {
            let variations = self
                .service
                .fetch_variations(&word_ids)
                .await
                .map_err(|source| {
                    warn!(page = page.get(), "Annotation refresh failed: {source}");
                    EngineError::AnnotationRefreshFailed { page, source }
                })?;
            AnnotationSet::from_variations(variations)
        };

        let set = Arc::new(set);
        {
            let mut state = self.state.lock();
            let applied = state.applied.get(&page).copied().unwrap_or(0);
            if applied > ticket {
                debug!(page = page.get(), ticket, applied, "Dropped stale annotation refresh");
                if let Some(current) = state.entries.get(&page) {
                    return Ok(Arc::clone(current));
                }
            }
            state.applied.insert(page, ticket);
            state.entries.insert(page, Arc::clone(&set));
        }
        debug!(
            page = page.get(),
            entries = set.len(),
            "Replaced annotation set"
        );
        self.notifier.publish(CacheEvent::AnnotationsReplaced(page));
        Ok(set)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ServiceError;
    use crate::model::{AnnotationKey, Narrator, NarratorId, PageContent, Variation};
    use crate::service::fake::{FakeService, variation};
    use async_trait::async_trait;
    use tokio::sync::Notify;

    fn page(n: u32) -> PageNumber {
        PageNumber::new(i64::from(n)).expect("positive")
    }

    fn cache_with(service: &Arc<FakeService>) -> AnnotationCache {
        let service: Arc<dyn DocumentService> = service.clone();
        AnnotationCache::new(service, CacheNotifier::new())
    }

    fn key(word: u64, narrator: u64) -> AnnotationKey {
        AnnotationKey {
            word_id: WordId(word),
            narrator_id: NarratorId(narrator),
        }
    }

    #[tokio::test]
    async fn empty_word_list_skips_the_network() {
        let service = Arc::new(FakeService::new());
        let cache = cache_with(&service);

        let set = cache.refresh(page(1), Vec::new()).await.expect("refresh");

        assert!(set.is_empty());
        assert!(cache.contains(page(1)));
        assert!(service.variation_requests().is_empty());
    }

    #[tokio::test]
    async fn refresh_replaces_the_entry_wholesale() {
        let service = Arc::new(FakeService::new());
        let cache = cache_with(&service);
        service.set_variations(vec![variation(1, 1, "a"), variation(2, 1, "b")]);
        cache
            .refresh(page(4), vec![WordId(1), WordId(2)])
            .await
            .expect("first");

        service.set_variations(vec![variation(2, 1, "c")]);
        let set = cache
            .refresh(page(4), vec![WordId(1), WordId(2)])
            .await
            .expect("second");

        assert_eq!(set.len(), 1);
        assert_eq!(set.get(&key(1, 1)), None);
        assert_eq!(set.get(&key(2, 1)), Some("c"));
        assert_eq!(service.variation_requests().len(), 2);
    }

    #[tokio::test]
    async fn failed_refresh_keeps_the_previous_entry() {
        let service = Arc::new(FakeService::new());
        let cache = cache_with(&service);
        service.set_variations(vec![variation(9, 2, "kept")]);
        cache.refresh(page(6), vec![WordId(9)]).await.expect("first");

        service.set_fail_variations(true);
        let err = cache
            .refresh(page(6), vec![WordId(9)])
            .await
            .expect_err("fails");

        assert!(matches!(err, EngineError::AnnotationRefreshFailed { .. }));
        let set = cache.get(page(6)).expect("still cached");
        assert_eq!(set.get(&key(9, 2)), Some("kept"));
    }

    /// Holds the first variations call until released; later calls answer
    /// with the saved annotation right away.
    struct OutOfOrderService {
        calls: Mutex<usize>,
        release: Notify,
    }

    #[async_trait]
    impl DocumentService for OutOfOrderService {
        async fn fetch_page(&self, page: PageNumber) -> Result<PageContent, ServiceError> {
            Ok(crate::model::sample_page(page.get()))
        }

        async fn fetch_variations(
            &self,
            _word_ids: &[WordId],
        ) -> Result<Vec<Variation>, ServiceError> {
            let call = {
                let mut calls = self.calls.lock();
                *calls += 1;
                *calls
            };
            if call == 1 {
                self.release.notified().await;
                return Ok(Vec::new());
            }
            Ok(vec![variation(1, 1, "saved")])
        }

        async fn fetch_narrators(&self) -> Result<Vec<Narrator>, ServiceError> {
            Ok(Vec::new())
        }

        async fn create_variation(&self, _variation: &Variation) -> Result<(), ServiceError> {
            Ok(())
        }

        async fn delete_variation(&self, _key: AnnotationKey) -> Result<(), ServiceError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn late_response_does_not_replace_a_newer_refresh() {
        let service = Arc::new(OutOfOrderService {
            calls: Mutex::new(0),
            release: Notify::new(),
        });
        let dyn_service: Arc<dyn DocumentService> = service.clone();
        let cache = AnnotationCache::new(dyn_service, CacheNotifier::new());

        let older = cache.refresh(page(3), vec![WordId(1)]);
        let newer = async {
            let set = cache.refresh(page(3), vec![WordId(1)]).await;
            service.release.notify_one();
            set
        };
        let (older, newer) = tokio::join!(older, newer);

        assert_eq!(newer.expect("newer").get(&key(1, 1)), Some("saved"));
        assert_eq!(older.expect("older").get(&key(1, 1)), Some("saved"));
        let cached = cache.get(page(3)).expect("cached");
        assert_eq!(cached.get(&key(1, 1)), Some("saved"));
    }

    #[tokio::test]
    async fn refresh_notifies_observers() {
        let service = Arc::new(FakeService::new());
        let cache = cache_with(&service);
        let mut events = cache.notifier.subscribe();

        cache.refresh(page(2), vec![WordId(5)]).await.expect("refresh");

        assert_eq!(
            events.try_recv().expect("event"),
            CacheEvent::AnnotationsReplaced(page(2))
        );
    }
}
