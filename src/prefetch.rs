//! Keeps a window of pages around the reading position resident.

use crate::cache::PageStore;
use crate::model::PageNumber;
use std::ops::RangeInclusive;
use std::sync::Arc;
use tracing::debug;

/// What one `schedule` call did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefetchPlan {
    pub window: RangeInclusive<u32>,
    /// Pages for which a new network request was started, in issue order.
    pub issued: Vec<PageNumber>,
}

pub struct PrefetchScheduler {
    store: Arc<PageStore>,
    radius: u32,
}

impl PrefetchScheduler {
    pub fn new(store: Arc<PageStore>, radius: u32) -> Self {
        Self { store, radius }
    }

    pub fn window(&self, focus: PageNumber) -> RangeInclusive<u32> {
        let start = focus.get().saturating_sub(self.radius).max(1);
        let end = focus.get().saturating_add(self.radius);
        start..=end
    }

    /// Fire-and-forget: nothing here awaits a fetch.
    ///
    /// The direct neighbours go first so the swipe panes fill before the rest
    /// of the window.
    pub fn schedule(&self, focus: PageNumber) -> PrefetchPlan {
        let window = self.window(focus);
        let mut issued = Vec::new();

        let neighbours = [focus.previous(), focus.next()];
        let rest = window.clone().filter_map(|n| PageNumber::new(i64::from(n)));
        for page in neighbours.into_iter().flatten().chain(rest) {
            if self.store.contains(page) || self.store.is_in_flight(page) {
                continue;
            }
            if self.store.request(page).is_new_request() {
                issued.push(page);
            }
        }

        debug!(
            focus = focus.get(),
            start = *window.start(),
            end = *window.end(),
            issued = issued.len(),
            "Scheduled prefetch"
        );
        PrefetchPlan { window, issued }
    }
}
