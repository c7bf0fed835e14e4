use crate::error::EngineError;
use crate::model::{PageContent, PageNumber};
use std::sync::Arc;

/// What the current pane shows.
#[derive(Debug, Clone)]
pub enum PageView {
    Loading,
    Ready(Arc<PageContent>),
    Failed(EngineError),
}

impl PageView {
    pub fn is_loading(&self) -> bool {
        matches!(self, PageView::Loading)
    }

    pub fn content(&self) -> Option<&Arc<PageContent>> {
        match self {
            PageView::Ready(content) => Some(content),
            _ => None,
        }
    }
}

/// Reader-related model.
pub struct ReaderState {
    pub(in crate::app) current_page: PageNumber,
    pub(in crate::app) view: PageView,
    /// Bumped whenever anything a renderer shows for the panes changes.
    pub(in crate::app) revision: u64,
}

impl ReaderState {
    pub(in crate::app) fn new(start: PageNumber) -> Self {
        Self {
            current_page: start,
            view: PageView::Loading,
            revision: 0,
        }
    }

    pub(in crate::app) fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }
}
