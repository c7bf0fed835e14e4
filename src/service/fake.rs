use super::DocumentService;
use crate::error::ServiceError;
use crate::model::{
    AnnotationKey, Narrator, NarratorId, PageContent, PageNumber, Variation, WordId, sample_page,
};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use tokio::sync::watch;

/// In-memory service that records every call.
///
/// Page responses can be held back with [`FakeService::hold`] until
/// [`FakeService::release`] so tests can observe in-flight state.
pub(crate) struct FakeService {
    state: Mutex<FakeState>,
    gate: watch::Sender<bool>,
}

#[derive(Default)]
struct FakeState {
    page_requests: HashMap<PageNumber, usize>,
    variation_requests: Vec<Vec<WordId>>,
    failing_pages: HashSet<PageNumber>,
    fail_variations: bool,
    variations: Vec<Variation>,
    narrators: Vec<Narrator>,
    created: Vec<Variation>,
    deleted: Vec<AnnotationKey>,
}

impl FakeService {
    pub(crate) fn new() -> Self {
        let (gate, _) = watch::channel(true);
        Self {
            state: Mutex::new(FakeState::default()),
            gate,
        }
    }

    pub(crate) fn hold(&self) {
        self.gate.send_replace(false);
    }

    pub(crate) fn release(&self) {
        self.gate.send_replace(true);
    }

    pub(crate) fn fail_page(&self, page: u32) {
        self.state.lock().failing_pages.insert(page_number(page));
    }

    pub(crate) fn heal_page(&self, page: u32) {
        self.state.lock().failing_pages.remove(&page_number(page));
    }

    pub(crate) fn set_fail_variations(&self, fail: bool) {
        self.state.lock().fail_variations = fail;
    }

    pub(crate) fn set_variations(&self, variations: Vec<Variation>) {
        self.state.lock().variations = variations;
    }

    pub(crate) fn set_narrators(&self, narrators: Vec<Narrator>) {
        self.state.lock().narrators = narrators;
    }

    pub(crate) fn page_requests(&self, page: u32) -> usize {
        self.state
            .lock()
            .page_requests
            .get(&page_number(page))
            .copied()
            .unwrap_or(0)
    }

    pub(crate) fn total_page_requests(&self) -> usize {
        self.state.lock().page_requests.values().sum()
    }

    pub(crate) fn requested_pages(&self) -> Vec<u32> {
        let mut pages: Vec<u32> = self
            .state
            .lock()
            .page_requests
            .keys()
            .map(|page| page.get())
            .collect();
        pages.sort_unstable();
        pages
    }

    pub(crate) fn variation_requests(&self) -> Vec<Vec<WordId>> {
        self.state.lock().variation_requests.clone()
    }

    pub(crate) fn created(&self) -> Vec<Variation> {
        self.state.lock().created.clone()
    }

    pub(crate) fn deleted(&self) -> Vec<AnnotationKey> {
        self.state.lock().deleted.clone()
    }

    async fn wait_for_gate(&self) {
        let mut rx = self.gate.subscribe();
        let _ = rx.wait_for(|open| *open).await;
    }
}

fn page_number(page: u32) -> PageNumber {
    PageNumber::new(i64::from(page)).expect("test page numbers are positive")
}

#[async_trait]
impl DocumentService for FakeService {
    async fn fetch_page(&self, page: PageNumber) -> Result<PageContent, ServiceError> {
        *self.state.lock().page_requests.entry(page).or_default() += 1;
        self.wait_for_gate().await;
        if self.state.lock().failing_pages.contains(&page) {
            return Err(ServiceError::Status(503));
        }
        Ok(sample_page(page.get()))
    }

    async fn fetch_variations(&self, word_ids: &[WordId]) -> Result<Vec<Variation>, ServiceError> {
        let mut state = self.state.lock();
        state.variation_requests.push(word_ids.to_vec());
        if state.fail_variations {
            return Err(ServiceError::Transport("connection reset".into()));
        }
        Ok(state
            .variations
            .iter()
            .filter(|variation| word_ids.contains(&variation.word_id))
            .cloned()
            .collect())
    }

    async fn fetch_narrators(&self) -> Result<Vec<Narrator>, ServiceError> {
        Ok(self.state.lock().narrators.clone())
    }

    async fn create_variation(&self, variation: &Variation) -> Result<(), ServiceError> {
        let mut state = self.state.lock();
        state.created.push(variation.clone());
        state.variations.retain(|existing| existing.key() != variation.key());
        state.variations.push(variation.clone());
        Ok(())
    }

    async fn delete_variation(&self, key: AnnotationKey) -> Result<(), ServiceError> {
        let mut state = self.state.lock();
        state.deleted.push(key);
        state.variations.retain(|existing| existing.key() != key);
        Ok(())
    }
}

pub(crate) fn variation(word: u64, narrator: u64, content: &str) -> Variation {
    Variation {
        word_id: WordId(word),
        narrator_id: NarratorId(narrator),
        content: content.to_string(),
    }
}
