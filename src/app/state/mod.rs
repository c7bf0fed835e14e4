mod narrators;
mod reader;

use super::update::Effect;
use crate::cache::{AnnotationCache, PageStore};
use crate::config::AppConfig;
use crate::diff::{DiffSegment, compare};
use crate::gesture::{DrawerMachine, DrawerState, PaneOffsets, SwipeMachine};
use crate::model::{AnnotationSet, Narrator, NarratorId, PageContent, PageNumber, WordId};
use crate::settings::{KeyValueStore, load_selected_narrators};
use std::sync::Arc;
use tracing::info;

pub(in crate::app) use narrators::NarratorState;
pub use reader::PageView;
pub(in crate::app) use reader::ReaderState;

/// Which machine owns the pointer between down and up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(in crate::app) enum GestureOwner {
    Drawer,
    Swipe,
}

/// Content for the three swipe panes plus their current offsets.
#[derive(Debug, Clone)]
pub struct Panes {
    pub previous: Option<Arc<PageContent>>,
    pub current: Option<Arc<PageContent>>,
    pub next: Option<Arc<PageContent>>,
    pub offsets: PaneOffsets,
}

/// Core engine state composed of sub-models.
pub struct App {
    pub(super) config: AppConfig,
    pub(super) pages: Arc<PageStore>,
    pub(super) annotations: Arc<AnnotationCache>,
    pub(super) reader: ReaderState,
    pub(super) narrators: NarratorState,
    pub(super) drawer: DrawerMachine,
    pub(super) swipe: SwipeMachine,
    pub(super) gesture: Option<GestureOwner>,
}

impl App {
    /// Builds the engine at the configured start page.
    ///
    /// The returned effects load the narrator list and the first page; the
    /// caller runs them like any other batch.
    pub fn bootstrap(
        config: AppConfig,
        pages: Arc<PageStore>,
        annotations: Arc<AnnotationCache>,
        settings: &dyn KeyValueStore,
    ) -> (App, Vec<Effect>) {
        let start = config.start_page();
        let selected = load_selected_narrators(settings);
        info!(
            start = start.get(),
            selected_narrators = selected.len(),
            radius = config.prefetch_radius,
            "Bootstrapping pager"
        );
        let mut app = App {
            drawer: DrawerMachine::new(config.drawer()),
            swipe: SwipeMachine::new(config.swipe(), config.viewport_width),
            reader: ReaderState::new(start),
            narrators: NarratorState {
                available: Vec::new(),
                selected,
            },
            gesture: None,
            pages,
            annotations,
            config,
        };
        let mut effects = vec![Effect::LoadNarrators];
        app.show_page(start, &mut effects);
        (app, effects)
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn current_page(&self) -> PageNumber {
        self.reader.current_page
    }

    pub fn view(&self) -> &PageView {
        &self.reader.view
    }

    pub fn revision(&self) -> u64 {
        self.reader.revision
    }

    pub fn page_store(&self) -> &Arc<PageStore> {
        &self.pages
    }

    pub fn annotation_cache(&self) -> &Arc<AnnotationCache> {
        &self.annotations
    }

    /// Annotation snapshot for the current page, if one was fetched.
    pub fn annotations(&self) -> Option<Arc<AnnotationSet>> {
        self.annotations.get(self.reader.current_page)
    }

    pub fn narrators(&self) -> &[Narrator] {
        &self.narrators.available
    }

    pub fn selected_narrators(&self) -> &[NarratorId] {
        &self.narrators.selected
    }

    /// Text to show for `word` on the current page under the narrator filter.
    pub fn visible_variant(&self, word: WordId) -> Option<(NarratorId, String)> {
        let set = self.annotations()?;
        set.variant_for(word, &self.narrators.selected)
            .map(|(narrator, text)| (narrator, text.to_string()))
    }

    /// Compares the current page's text for `word` with the variant the
    /// narrator filter selects. `None` when the word has no visible variant.
    pub fn visible_variant_diff(&self, word: WordId) -> Option<(NarratorId, Vec<DiffSegment>)> {
        let content = self.reader.view.content()?;
        let original = content.word(word)?;
        let (narrator, variant) = self.visible_variant(word)?;
        Some((narrator, compare(&original.content, &variant)))
    }

    pub fn drawer(&self) -> DrawerState {
        self.drawer.state()
    }

    pub fn drawer_machine(&self) -> &DrawerMachine {
        &self.drawer
    }

    pub fn swipe(&self) -> &SwipeMachine {
        &self.swipe
    }

    pub fn panes(&self) -> Panes {
        let page = self.reader.current_page;
        Panes {
            previous: page.previous().and_then(|prev| self.pages.get(prev)),
            current: self.reader.view.content().cloned(),
            next: page.next().and_then(|next| self.pages.get(next)),
            offsets: self.swipe.pane_offsets(),
        }
    }

    /// Whether frame ticks are needed.
    pub fn is_animating(&self) -> bool {
        self.drawer.is_animating() || self.swipe.is_animating()
    }
}

#[cfg(test)]
pub(in crate::app) mod testing {
    use super::*;
    use crate::cache::CacheNotifier;
    use crate::service::DocumentService;
    use crate::service::fake::FakeService;
    use crate::settings::MemoryStore;

    pub(in crate::app) fn page(n: u32) -> PageNumber {
        PageNumber::new(i64::from(n)).expect("positive")
    }

    pub(in crate::app) struct Fixture {
        pub(in crate::app) service: Arc<FakeService>,
        pub(in crate::app) pages: Arc<PageStore>,
        pub(in crate::app) annotations: Arc<AnnotationCache>,
    }

    impl Fixture {
        pub(in crate::app) fn new() -> Self {
            let service = Arc::new(FakeService::new());
            let dyn_service: Arc<dyn DocumentService> = service.clone();
            let notifier = CacheNotifier::new();
            Self {
                pages: Arc::new(PageStore::new(dyn_service.clone(), notifier.clone())),
                annotations: Arc::new(AnnotationCache::new(dyn_service, notifier)),
                service,
            }
        }

        pub(in crate::app) async fn warm(&self, pages: &[u32]) {
            for n in pages {
                self.pages
                    .fetch_if_absent(page(*n))
                    .await
                    .expect("warm page");
            }
        }

        pub(in crate::app) fn app(&self, start_page: u32, selected: &[NarratorId]) -> App {
            let config = AppConfig {
                start_page,
                ..AppConfig::default()
            };
            let store = MemoryStore::default();
            crate::settings::save_selected_narrators(&store, selected).expect("seed selection");
            let (app, _) = App::bootstrap(
                config,
                Arc::clone(&self.pages),
                Arc::clone(&self.annotations),
                &store,
            );
            app
        }
    }
}
