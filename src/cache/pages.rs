use super::{CacheEvent, CacheNotifier};
use crate::error::ServiceError;
use crate::model::{PageContent, PageNumber};
use crate::service::DocumentService;
use futures::FutureExt;
use futures::future::{self, BoxFuture, Shared};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

pub type PageResult = Result<Arc<PageContent>, ServiceError>;

/// One outstanding page fetch. Every clone resolves to the same result.
pub type PageFetch = Shared<BoxFuture<'static, PageResult>>;

/// Outcome of [`PageStore::request`].
pub enum FetchTicket {
    /// Already cached.
    Ready(Arc<PageContent>),
    /// Another caller's fetch is still running; no new request was made.
    Joined(PageFetch),
    /// This call started the network request.
    Started(PageFetch),
}

impl FetchTicket {
    pub fn is_new_request(&self) -> bool {
        matches!(self, FetchTicket::Started(_))
    }

    pub fn into_future(self) -> PageFetch {
        match self {
            FetchTicket::Ready(content) => future::ready(Ok(content)).boxed().shared(),
            FetchTicket::Joined(fetch) | FetchTicket::Started(fetch) => fetch,
        }
    }
}

#[derive(Default)]
struct PageState {
    pages: HashMap<PageNumber, Arc<PageContent>>,
    in_flight: HashMap<PageNumber, PageFetch>,
}

/// Never-evicting page cache with per-page fetch deduplication.
pub struct PageStore {
    service: Arc<dyn DocumentService>,
    state: Mutex<PageState>,
    notifier: CacheNotifier,
}

impl PageStore {
    pub fn new(service: Arc<dyn DocumentService>, notifier: CacheNotifier) -> Self {
        Self {
            service,
            state: Mutex::new(PageState::default()),
            notifier,
        }
    }

    pub fn get(&self, page: PageNumber) -> Option<Arc<PageContent>> {
        self.state.lock().pages.get(&page).cloned()
    }

    pub fn contains(&self, page: PageNumber) -> bool {
        self.state.lock().pages.contains_key(&page)
    }

    pub fn is_in_flight(&self, page: PageNumber) -> bool {
        self.state.lock().in_flight.contains_key(&page)
    }

    pub fn cached_pages(&self) -> usize {
        self.state.lock().pages.len()
    }

    /// Resolves `page` from the cache, joins the running fetch for it, or
    /// starts one.
    ///
    /// A started fetch is spawned onto the runtime, so dropping the returned
    /// future does not cancel it. Must be called from within a tokio runtime.
    pub fn request(self: &Arc<Self>, page: PageNumber) -> FetchTicket {
        let mut state = self.state.lock();
        if let Some(content) = state.pages.get(&page) {
            return FetchTicket::Ready(Arc::clone(content));
        }
        if let Some(fetch) = state.in_flight.get(&page) {
            debug!(page = page.get(), "Joined in-flight page fetch");
            return FetchTicket::Joined(fetch.clone());
        }

        let store = Arc::clone(self);
        let fetch = async move {
            let result = store.service.fetch_page(page).await.map(Arc::new);
            store.finish(page, &result);
            result
        }
        .boxed()
        .shared();
        state.in_flight.insert(page, fetch.clone());
        drop(state);

        debug!(page = page.get(), "Started page fetch");
        tokio::spawn(fetch.clone());
        FetchTicket::Started(fetch)
    }

    pub fn fetch_if_absent(self: &Arc<Self>, page: PageNumber) -> PageFetch {
        self.request(page).into_future()
    }

    /// Runs before the shared result reaches any waiter.
    fn finish(&self, page: PageNumber, result: &PageResult) {
        {
            let mut state = self.state.lock();
            state.in_flight.remove(&page);
            if let Ok(content) = result {
                state.pages.insert(page, Arc::clone(content));
            }
        }
        match result {
            Ok(content) => {
                debug!(
                    page = page.get(),
                    words = content.word_count(),
                    "Stored page"
                );
                self.notifier.publish(CacheEvent::PageStored(page));
            }
            Err(err) => warn!(page = page.get(), "Page fetch failed: {err}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::fake::FakeService;

    fn page(n: u32) -> PageNumber {
        PageNumber::new(i64::from(n)).expect("positive")
    }

    fn store_with(service: &Arc<FakeService>) -> Arc<PageStore> {
        let service: Arc<dyn DocumentService> = service.clone();
        Arc::new(PageStore::new(service, CacheNotifier::new()))
    }

    #[tokio::test]
    async fn cached_page_is_served_without_new_requests() {
        let service = Arc::new(FakeService::new());
        let store = store_with(&service);

        let first = store.fetch_if_absent(page(3)).await.expect("fetch");
        let again = store.fetch_if_absent(page(3)).await.expect("cached");
        let direct = store.get(page(3)).expect("stored");

        assert!(Arc::ptr_eq(&first, &again));
        assert!(Arc::ptr_eq(&first, &direct));
        assert_eq!(service.page_requests(3), 1);
        assert!(matches!(store.request(page(3)), FetchTicket::Ready(_)));
    }

    #[tokio::test]
    async fn concurrent_requests_share_one_fetch() {
        let service = Arc::new(FakeService::new());
        let store = store_with(&service);
        service.hold();

        let first = store.request(page(5));
        let second = store.request(page(5));
        let third = store.fetch_if_absent(page(5));
        assert!(first.is_new_request());
        assert!(matches!(second, FetchTicket::Joined(_)));
        assert!(store.is_in_flight(page(5)));
        assert!(store.get(page(5)).is_none());

        service.release();
        let (a, b, c) = tokio::join!(first.into_future(), second.into_future(), third);
        let a = a.expect("first");
        assert!(Arc::ptr_eq(&a, &b.expect("second")));
        assert!(Arc::ptr_eq(&a, &c.expect("third")));
        assert_eq!(service.page_requests(5), 1);
        assert!(!store.is_in_flight(page(5)));
    }

    #[tokio::test]
    async fn failure_leaves_no_entry_and_allows_retry() {
        let service = Arc::new(FakeService::new());
        let store = store_with(&service);
        service.fail_page(7);

        let err = store.fetch_if_absent(page(7)).await.expect_err("fails");
        assert_eq!(err, ServiceError::Status(503));
        assert!(store.get(page(7)).is_none());
        assert!(!store.is_in_flight(page(7)));

        service.heal_page(7);
        store.fetch_if_absent(page(7)).await.expect("retry succeeds");
        assert!(store.contains(page(7)));
        assert_eq!(service.page_requests(7), 2);
    }

    #[tokio::test]
    async fn waiters_on_a_failed_fetch_share_the_error() {
        let service = Arc::new(FakeService::new());
        let store = store_with(&service);
        service.fail_page(2);
        service.hold();

        let first = store.fetch_if_absent(page(2));
        let second = store.fetch_if_absent(page(2));
        service.release();
        let (a, b) = tokio::join!(first, second);
        assert_eq!(a.expect_err("first"), b.expect_err("second"));
        assert_eq!(service.page_requests(2), 1);
    }

    #[tokio::test]
    async fn dropped_fetch_still_populates_the_store() {
        let service = Arc::new(FakeService::new());
        let store = store_with(&service);
        let mut events = store.notifier.subscribe();

        drop(store.request(page(11)));

        assert_eq!(
            events.recv().await.expect("event"),
            CacheEvent::PageStored(page(11))
        );
        assert!(store.contains(page(11)));
        assert_eq!(store.cached_pages(), 1);
    }
}
