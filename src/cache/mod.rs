//! Process-wide caches for page content and annotations.
//!
//! Both caches keep a single copy of their data behind a short
//! `parking_lot` lock so renderers can read without awaiting. Writers publish a
//! [`CacheEvent`] on the shared [`CacheNotifier`] so observers can re-render.

pub mod annotations;
pub mod pages;

pub use annotations::AnnotationCache;
pub use pages::{FetchTicket, PageFetch, PageStore};

use crate::model::PageNumber;
use tokio::sync::broadcast;

const EVENT_CAPACITY: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheEvent {
    PageStored(PageNumber),
    AnnotationsReplaced(PageNumber),
}

#[derive(Debug, Clone)]
pub struct CacheNotifier {
    sender: broadcast::Sender<CacheEvent>,
}

impl CacheNotifier {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(EVENT_CAPACITY);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<CacheEvent> {
        self.sender.subscribe()
    }

    /// Having no subscribers is not an error.
    pub(crate) fn publish(&self, event: CacheEvent) {
        let _ = self.sender.send(event);
    }
}

impl Default for CacheNotifier {
    fn default() -> Self {
        Self::new()
    }
}
