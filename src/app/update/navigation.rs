use super::super::state::{App, PageView};
use super::Effect;
use crate::cache::CacheEvent;
use crate::cache::pages::PageResult;
use crate::error::{EngineError, ServiceError};
use crate::model::PageNumber;
use tracing::{debug, info, warn};

impl App {
    /// Moves to `requested`. Non-positive input is rejected without touching
    /// any state.
    pub fn go_to(&mut self, requested: i64) -> Result<Vec<Effect>, EngineError> {
        let page = PageNumber::new(requested).ok_or(EngineError::InvalidPage { requested })?;
        let mut effects = Vec::new();
        self.show_page(page, &mut effects);
        Ok(effects)
    }

    pub fn next_page(&mut self) -> Vec<Effect> {
        let mut effects = Vec::new();
        if let Some(next) = self.reader.current_page.next() {
            self.show_page(next, &mut effects);
        }
        effects
    }

    /// No-op on the first page.
    pub fn previous_page(&mut self) -> Vec<Effect> {
        let mut effects = Vec::new();
        if let Some(previous) = self.reader.current_page.previous() {
            self.show_page(previous, &mut effects);
        }
        effects
    }

    pub(super) fn handle_go_to(&mut self, requested: i64, effects: &mut Vec<Effect>) {
        match self.go_to(requested) {
            Ok(more) => effects.extend(more),
            Err(err) => warn!(requested, "Ignoring navigation request: {err}"),
        }
    }

    pub(super) fn handle_next_page(&mut self, effects: &mut Vec<Effect>) {
        effects.extend(self.next_page());
    }

    pub(super) fn handle_previous_page(&mut self, effects: &mut Vec<Effect>) {
        effects.extend(self.previous_page());
    }

    /// Render state is settled before any network work is requested;
    /// `Prefetch` is always the last effect.
    pub(in crate::app) fn show_page(&mut self, page: PageNumber, effects: &mut Vec<Effect>) {
        self.reader.current_page = page;
        self.reader.touch();

        let cached = match self.pages.get(page) {
            Some(content) => {
                if !self.annotations.contains(page) && self.narrators.filter_active() {
                    effects.push(Effect::RefreshAnnotations {
                        page,
                        word_ids: content.word_ids(),
                    });
                }
                self.reader.view = PageView::Ready(content);
                true
            }
            None => {
                self.reader.view = PageView::Loading;
                effects.push(Effect::LoadPage(page));
                false
            }
        };

        for neighbour in [page.previous(), page.next()].into_iter().flatten() {
            if !self.pages.contains(neighbour) {
                effects.push(Effect::LoadNeighbour(neighbour));
            }
        }

        info!(page = page.get(), cached, "Navigated to page");
        effects.push(Effect::Prefetch(page));
    }

    pub(super) fn handle_page_loaded(
        &mut self,
        page: PageNumber,
        result: PageResult,
        effects: &mut Vec<Effect>,
    ) {
        if page != self.reader.current_page {
            debug!(
                page = page.get(),
                current = self.reader.current_page.get(),
                "Ignoring arrival for a page that is no longer current"
            );
            return;
        }
        match result {
            Ok(content) => {
                if self.narrators.filter_active() {
                    effects.push(Effect::RefreshAnnotations {
                        page,
                        word_ids: content.word_ids(),
                    });
                }
                self.reader.view = PageView::Ready(content);
            }
            Err(source) => {
                let err = EngineError::FetchFailed { page, source };
                warn!(page = page.get(), "{err}");
                self.reader.view = PageView::Failed(err);
            }
        }
        self.reader.touch();
    }

    pub(super) fn handle_neighbour_loaded(
        &mut self,
        page: PageNumber,
        result: Result<(), ServiceError>,
    ) {
        match result {
            Ok(()) => debug!(page = page.get(), "Neighbour pane ready"),
            Err(err) => warn!(page = page.get(), "Neighbour fetch failed: {err}"),
        }
    }

    pub(super) fn handle_cache_changed(&mut self, event: CacheEvent) {
        let current = self.reader.current_page;
        match event {
            CacheEvent::PageStored(page) => {
                if page == current && self.reader.view.is_loading() {
                    if let Some(content) = self.pages.get(page) {
                        self.reader.view = PageView::Ready(content);
                    }
                }
                if page.get().abs_diff(current.get()) <= 1 {
                    self.reader.touch();
                }
            }
            CacheEvent::AnnotationsReplaced(page) => {
                if page == current {
                    self.reader.touch();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::super::state::testing::{Fixture, page};
    use super::*;
    use crate::model::NarratorId;

    fn is_prefetch(effect: &Effect) -> bool {
        matches!(effect, Effect::Prefetch(_))
    }

    #[tokio::test]
    async fn cached_page_renders_immediately_without_requests() {
        let fixture = Fixture::new();
        fixture.warm(&[19, 20]).await;
        let mut app = fixture.app(19, &[]);
        let before = fixture.service.total_page_requests();

        let effects = app.go_to(20).expect("valid page");

        assert_eq!(app.current_page(), page(20));
        assert!(matches!(app.view(), PageView::Ready(_)));
        assert!(!effects.iter().any(|e| matches!(e, Effect::LoadPage(_))));
        assert!(
            !effects
                .iter()
                .any(|e| matches!(e, Effect::RefreshAnnotations { .. }))
        );
        assert_eq!(effects, vec![Effect::LoadNeighbour(page(21)), Effect::Prefetch(page(20))]);
        assert_eq!(fixture.service.total_page_requests(), before);
    }

    #[tokio::test]
    async fn cached_page_with_filter_refreshes_missing_annotations() {
        let fixture = Fixture::new();
        fixture.warm(&[8]).await;
        let mut app = fixture.app(1, &[NarratorId(2)]);

        let effects = app.go_to(8).expect("valid page");

        let refresh = effects
            .iter()
            .find(|e| matches!(e, Effect::RefreshAnnotations { .. }))
            .expect("refresh requested");
        let expected_ids = fixture.pages.get(page(8)).expect("cached").word_ids();
        assert_eq!(
            refresh,
            &Effect::RefreshAnnotations {
                page: page(8),
                word_ids: expected_ids
            }
        );
        assert!(effects.last().is_some_and(is_prefetch));
    }

    #[tokio::test]
    async fn cached_annotations_are_reused() {
        let fixture = Fixture::new();
        fixture.warm(&[8]).await;
        fixture
            .annotations
            .refresh(page(8), Vec::new())
            .await
            .expect("seed annotations");
        let mut app = fixture.app(1, &[NarratorId(2)]);

        let effects = app.go_to(8).expect("valid page");

        assert!(
            !effects
                .iter()
                .any(|e| matches!(e, Effect::RefreshAnnotations { .. }))
        );
    }

    #[test]
    fn miss_shows_loading_and_requests_the_page() {
        let fixture = Fixture::new();
        let mut app = fixture.app(19, &[]);

        let effects = app.go_to(30).expect("valid page");

        assert!(app.view().is_loading());
        assert_eq!(
            effects,
            vec![
                Effect::LoadPage(page(30)),
                Effect::LoadNeighbour(page(29)),
                Effect::LoadNeighbour(page(31)),
                Effect::Prefetch(page(30)),
            ]
        );
    }

    #[test]
    fn non_positive_pages_are_rejected_without_state_change() {
        let fixture = Fixture::new();
        let mut app = fixture.app(19, &[]);
        let revision = app.revision();

        assert_eq!(
            app.go_to(0).expect_err("zero"),
            EngineError::InvalidPage { requested: 0 }
        );
        assert!(app.go_to(-3).is_err());
        assert_eq!(app.current_page(), page(19));
        assert_eq!(app.revision(), revision);
    }

    #[test]
    fn previous_is_a_no_op_on_first_page() {
        let fixture = Fixture::new();
        let mut app = fixture.app(1, &[]);

        assert!(app.previous_page().is_empty());
        assert_eq!(app.current_page(), page(1));

        let effects = app.next_page();
        assert_eq!(app.current_page(), page(2));
        assert!(effects.last().is_some_and(is_prefetch));
    }

    #[test]
    fn arrival_renders_and_chains_refresh_when_filtered() {
        let fixture = Fixture::new();
        let mut app = fixture.app(4, &[NarratorId(1)]);
        let content = std::sync::Arc::new(crate::model::sample_page(4));

        let mut effects = Vec::new();
        app.handle_page_loaded(page(4), Ok(content.clone()), &mut effects);

        assert!(matches!(app.view(), PageView::Ready(_)));
        assert_eq!(
            effects,
            vec![Effect::RefreshAnnotations {
                page: page(4),
                word_ids: content.word_ids()
            }]
        );
    }

    #[test]
    fn stale_arrivals_do_not_replace_the_view() {
        let fixture = Fixture::new();
        let mut app = fixture.app(4, &[]);
        app.go_to(5).expect("valid page");

        let mut effects = Vec::new();
        let content = std::sync::Arc::new(crate::model::sample_page(4));
        app.handle_page_loaded(page(4), Ok(content), &mut effects);

        assert!(app.view().is_loading());
        assert!(effects.is_empty());
    }

    #[test]
    fn failed_fetch_surfaces_an_error_view() {
        let fixture = Fixture::new();
        let mut app = fixture.app(4, &[]);

        let mut effects = Vec::new();
        app.handle_page_loaded(page(4), Err(ServiceError::Status(500)), &mut effects);

        match app.view() {
            PageView::Failed(EngineError::FetchFailed { page: failed, source }) => {
                assert_eq!(*failed, page(4));
                assert_eq!(*source, ServiceError::Status(500));
            }
            other => panic!("unexpected view {other:?}"),
        }
    }
}
